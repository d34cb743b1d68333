pub mod config;
pub mod control;
pub mod error;
pub mod gray_scott_model;
pub mod grid;
pub mod model_presets;
pub mod persistence;
pub mod session;
mod utils;

// Re-export commonly used items
pub use config::Config;
pub use control::{ControlCommand, Direction, ParameterSpec};
pub use error::{EngineError, Result};
pub use gray_scott_model::{ChemicalSpecies, Parameter, ReactionDiffusionSystem};
pub use grid::{Grid, GridStats};
pub use model_presets::GrayScottParameters;
pub use persistence::StateRecord;
pub use session::{Notice, Session};
