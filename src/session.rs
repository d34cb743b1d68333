use crate::config::Config;
use crate::control::ControlCommand;
use crate::error::Result;
use crate::gray_scott_model::{Parameter, ReactionDiffusionSystem};
use crate::model_presets::GrayScottParameters;
use crate::persistence::{load_state, save_state};
use circular_queue::CircularQueue;
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

pub const HISTORY_CAPACITY: usize = 100;

/// What the operator should be told after a command went through.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    ParameterChanged(Parameter, f64),
    Reset,
    Saved(PathBuf),
    Loaded(PathBuf),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ParameterChanged(parameter, value) => write!(f, "{}: {:.4}", parameter, value),
            Notice::Reset => f.write_str("Simulation reset"),
            Notice::Saved(path) => write!(f, "Simulation state saved to {}", path.display()),
            Notice::Loaded(path) => write!(f, "Simulation state loaded from {}", path.display()),
        }
    }
}

/// Drives a [`ReactionDiffusionSystem`] frame by frame and applies
/// [`ControlCommand`]s to it.
pub struct Session {
    system: ReactionDiffusionSystem,
    steps_per_frame: usize,
    state_path: PathBuf,
    history: CircularQueue<GrayScottParameters>,
    frames: usize,
}

impl Session {
    pub fn new(system: ReactionDiffusionSystem, steps_per_frame: usize, state_path: PathBuf) -> Self {
        Self {
            system,
            steps_per_frame,
            state_path,
            history: CircularQueue::with_capacity(HISTORY_CAPACITY),
            frames: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let system = match config.seed {
            Some(seed) => {
                ReactionDiffusionSystem::with_seed(config.grid_size, config.parameters, seed)
            }
            None => ReactionDiffusionSystem::new(config.grid_size, config.parameters),
        };
        Self::new(system, config.steps_per_frame, config.state_path.clone())
    }

    /// Runs one frame worth of steps and records the parameters in effect.
    pub fn advance_frame(&mut self) {
        self.system.step_n(self.steps_per_frame);
        self.history.push(self.system.parameters());
        self.frames += 1;
    }

    /// Applies `command`. Persistence failures are logged and returned; the
    /// system is left as it was.
    pub fn handle(&mut self, command: ControlCommand) -> Result<Notice> {
        let result = self.apply(command);
        match &result {
            Ok(notice) => info!("{}", notice),
            Err(e) => warn!("{:?} failed: {}", command, e),
        }
        result
    }

    fn apply(&mut self, command: ControlCommand) -> Result<Notice> {
        match command {
            ControlCommand::SetParameter(parameter, _) | ControlCommand::Adjust(parameter, _) => {
                let current = self.system.get_parameter(parameter);
                let (parameter, value) = command
                    .target_value(current)
                    .unwrap_or((parameter, current));
                self.system.set_parameter(parameter, value);
                Ok(Notice::ParameterChanged(parameter, value))
            }
            ControlCommand::Reset => {
                self.system.reset_with(self.system.size(), defaults());
                Ok(Notice::Reset)
            }
            ControlCommand::Save => {
                save_state(&self.state_path, &self.system.export_state())?;
                Ok(Notice::Saved(self.state_path.clone()))
            }
            ControlCommand::Load => {
                let record = load_state(&self.state_path)?;
                self.system.import_state(&record)?;
                Ok(Notice::Loaded(self.state_path.clone()))
            }
        }
    }

    pub fn system(&self) -> &ReactionDiffusionSystem {
        &self.system
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn steps_per_frame(&self) -> usize {
        self.steps_per_frame
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Parameter snapshots of the most recent frames, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &GrayScottParameters> {
        self.history.asc_iter()
    }

    /// History of a single parameter, oldest first.
    pub fn parameter_history(&self, parameter: Parameter) -> Vec<f64> {
        self.history()
            .map(|params| match parameter {
                Parameter::DiffusionU => params.du,
                Parameter::DiffusionV => params.dv,
                Parameter::Feed => params.f,
                Parameter::Kill => params.k,
            })
            .collect()
    }
}

fn defaults() -> GrayScottParameters {
    let spec = |parameter: Parameter| parameter.spec().default;
    GrayScottParameters::new(
        spec(Parameter::DiffusionU),
        spec(Parameter::DiffusionV),
        spec(Parameter::Feed),
        spec(Parameter::Kill),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{Direction, OPERATOR_MAX};
    use crate::error::EngineError;
    use tempfile::tempdir;

    fn session_at(path: PathBuf) -> Session {
        let system = ReactionDiffusionSystem::with_seed(16, GrayScottParameters::default(), 21);
        Session::new(system, 20, path)
    }

    #[test]
    fn test_advance_frame_records_history() {
        let dir = tempdir().unwrap();
        let mut session = session_at(dir.path().join("state.json"));

        session.advance_frame();
        session.handle(ControlCommand::SetParameter(Parameter::Feed, 0.05)).unwrap();
        session.advance_frame();

        assert_eq!(session.frames(), 2);
        assert_eq!(session.parameter_history(Parameter::Feed), vec![0.035, 0.05]);
    }

    #[test]
    fn test_history_is_bounded() {
        let dir = tempdir().unwrap();
        let system = ReactionDiffusionSystem::with_seed(4, GrayScottParameters::default(), 1);
        let mut session = Session::new(system, 1, dir.path().join("state.json"));

        for _ in 0..HISTORY_CAPACITY + 25 {
            session.advance_frame();
        }
        assert_eq!(session.history().count(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_parameter_commands_apply_operator_limits() {
        let dir = tempdir().unwrap();
        let mut session = session_at(dir.path().join("state.json"));

        let notice = session
            .handle(ControlCommand::SetParameter(Parameter::DiffusionU, 0.9))
            .unwrap();
        assert_eq!(notice, Notice::ParameterChanged(Parameter::DiffusionU, OPERATOR_MAX));

        session
            .handle(ControlCommand::Adjust(Parameter::Kill, Direction::Down))
            .unwrap();
        assert!((session.system().parameters().k - 0.0649).abs() < 1e-12);
    }

    #[test]
    fn test_reset_restores_default_parameters() {
        let dir = tempdir().unwrap();
        let mut session = session_at(dir.path().join("state.json"));
        session.handle(ControlCommand::SetParameter(Parameter::Feed, 0.1)).unwrap();

        assert_eq!(session.handle(ControlCommand::Reset).unwrap(), Notice::Reset);
        assert_eq!(session.system().parameters(), GrayScottParameters::default());
        assert_eq!(session.system().size(), 16);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut session = session_at(path.clone());
        session.advance_frame();

        assert_eq!(
            session.handle(ControlCommand::Save).unwrap(),
            Notice::Saved(path.clone())
        );
        let saved = session.system().export_state();

        session.advance_frame();
        session.handle(ControlCommand::Reset).unwrap();
        assert_ne!(session.system().export_state(), saved);

        assert_eq!(
            session.handle(ControlCommand::Load).unwrap(),
            Notice::Loaded(path)
        );
        assert_eq!(session.system().export_state(), saved);
    }

    #[test]
    fn test_load_without_saved_state() {
        let dir = tempdir().unwrap();
        let mut session = session_at(dir.path().join("missing.json"));
        let before = session.system().export_state();

        assert!(matches!(
            session.handle(ControlCommand::Load),
            Err(EngineError::PersistenceNotFound(_))
        ));
        assert_eq!(session.system().export_state(), before);
    }

    #[test]
    fn test_notice_text() {
        let notice = Notice::ParameterChanged(Parameter::Feed, 0.035);
        assert_eq!(notice.to_string(), "f: 0.0350");
    }
}
