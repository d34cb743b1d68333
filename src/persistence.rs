use crate::error::{EngineError, Result};
use crate::model_presets::GrayScottParameters;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

pub const DEFAULT_STATE_FILE: &str = "rd_state.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(rename = "U")]
    pub u: Vec<Vec<f64>>,
    #[serde(rename = "V")]
    pub v: Vec<Vec<f64>>,
    #[serde(rename = "Du")]
    pub du: f64,
    #[serde(rename = "Dv")]
    pub dv: f64,
    pub f: f64,
    pub k: f64,
}

impl StateRecord {
    pub fn parameters(&self) -> GrayScottParameters {
        GrayScottParameters::new(self.du, self.dv, self.f, self.k)
    }
}

pub fn save_state(path: impl AsRef<Path>, record: &StateRecord) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, record)?;
    writer.flush()?;

    debug!("wrote {}x{} state to {}", record.u.len(), record.u.len(), path.display());
    Ok(())
}

/// Reads a record written by [`save_state`]. A missing file is reported as
/// [`EngineError::PersistenceNotFound`].
pub fn load_state(path: impl AsRef<Path>) -> Result<StateRecord> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => EngineError::PersistenceNotFound(path.to_path_buf()),
        _ => EngineError::Io(e),
    })?;

    let record = serde_json::from_reader(BufReader::new(file))?;
    Ok(record)
}
