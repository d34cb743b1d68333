use log::{debug, error, info, warn};
use reaction_diffusion_engine::{Config, ControlCommand, EngineError, Session};
use std::process;
use std::time::Instant;

const LOG_EVERY_N_FRAMES: usize = 20;

fn run(config: &Config) -> Result<(), EngineError> {
    let mut session = Session::from_config(config);
    info!(
        "{0}x{0} grid, {1} steps per frame, {2:?}",
        config.grid_size,
        config.steps_per_frame,
        session.system().parameters()
    );

    if config.load_on_start {
        match session.handle(ControlCommand::Load) {
            Ok(_) => {}
            Err(EngineError::PersistenceNotFound(path)) => {
                warn!("No saved state found at {}, starting fresh", path.display())
            }
            Err(e) => return Err(e),
        }
    }

    let started = Instant::now();
    for frame in 1..=config.frames {
        session.advance_frame();

        if frame % LOG_EVERY_N_FRAMES == 0 || frame == config.frames {
            let u = session.system().u().stats();
            let v = session.system().v().stats();
            debug!(
                "frame {}: U [{:.4}, {:.4}] mean {:.4}, V [{:.4}, {:.4}] mean {:.4}",
                frame, u.min, u.max, u.mean, v.min, v.max, v.mean
            );
        }
    }

    let elapsed = started.elapsed();
    let steps = config.total_steps();
    info!(
        "{} steps in {:.2?} ({:.1} steps/s)",
        steps,
        elapsed,
        steps as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    session.handle(ControlCommand::Save)?;
    Ok(())
}

fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };

    if let Err(e) = run(&config) {
        error!("{}", e);
        process::exit(1);
    }
}
