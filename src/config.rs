use crate::error::{EngineError, Result};
use crate::model_presets::{DEFAULT_GRID_SIZE, GrayScottParameters};
use crate::persistence::DEFAULT_STATE_FILE;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_STEPS_PER_FRAME: usize = 20;
pub const DEFAULT_FRAMES: usize = 200;

/// Runtime settings for the headless driver, read from `RD_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub grid_size: usize,
    pub steps_per_frame: usize,
    pub frames: usize,
    pub state_path: PathBuf,
    pub seed: Option<u64>,
    pub load_on_start: bool,
    pub parameters: GrayScottParameters,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            steps_per_frame: DEFAULT_STEPS_PER_FRAME,
            frames: DEFAULT_FRAMES,
            state_path: PathBuf::from(DEFAULT_STATE_FILE),
            seed: None,
            load_on_start: false,
            parameters: GrayScottParameters::default(),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let grid_size = parse_or(get("RD_GRID_SIZE"), "RD_GRID_SIZE", defaults.grid_size)?;
        if grid_size == 0 {
            return Err(EngineError::config("RD_GRID_SIZE must be at least 1"));
        }

        let parameters = GrayScottParameters {
            du: parse_or(get("RD_DU"), "RD_DU", defaults.parameters.du)?,
            dv: parse_or(get("RD_DV"), "RD_DV", defaults.parameters.dv)?,
            f: parse_or(get("RD_F"), "RD_F", defaults.parameters.f)?,
            k: parse_or(get("RD_K"), "RD_K", defaults.parameters.k)?,
        };

        Ok(Self {
            grid_size,
            steps_per_frame: parse_or(
                get("RD_STEPS_PER_FRAME"),
                "RD_STEPS_PER_FRAME",
                defaults.steps_per_frame,
            )?,
            frames: parse_or(get("RD_FRAMES"), "RD_FRAMES", defaults.frames)?,
            state_path: get("RD_STATE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_path),
            seed: get("RD_SEED")
                .map(|raw| parse_value(&raw, "RD_SEED"))
                .transpose()?,
            load_on_start: parse_or(get("RD_LOAD_ON_START"), "RD_LOAD_ON_START", false)?,
            parameters,
        })
    }

    /// Steps the driver runs in total, saturating instead of overflowing.
    pub fn total_steps(&self) -> usize {
        self.frames.saturating_mul(self.steps_per_frame)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T> {
    match raw {
        Some(raw) => parse_value(&raw, key),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(raw: &str, key: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| EngineError::config(format!("{} has an invalid value '{}'", key, raw)))
}
