use serde::{Deserialize, Serialize};

pub const DEFAULT_GRID_SIZE: usize = 200;

pub const DEFAULT_DIFFUSION_U: f64 = 0.16;
pub const DEFAULT_DIFFUSION_V: f64 = 0.08;
pub const DEFAULT_FEED: f64 = 0.035;
pub const DEFAULT_KILL: f64 = 0.065;

pub const SPOTS: (f64, f64) = (0.035, 0.065);
pub const MITOSIS: (f64, f64) = (0.0367, 0.0649);
pub const CORAL: (f64, f64) = (0.0545, 0.062);
pub const WORMS: (f64, f64) = (0.078, 0.061);

/// The four scalars of the Gray-Scott reaction: diffusion rates of U and V,
/// feed rate `f` and kill rate `k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrayScottParameters {
    pub du: f64,
    pub dv: f64,
    pub f: f64,
    pub k: f64,
}

impl GrayScottParameters {
    pub fn new(du: f64, dv: f64, f: f64, k: f64) -> Self {
        Self { du, dv, f, k }
    }

    /// A named `(f, k)` preset with the default diffusion rates.
    pub fn with_feed_kill((f, k): (f64, f64)) -> Self {
        Self {
            f,
            k,
            ..Self::default()
        }
    }
}

impl Default for GrayScottParameters {
    fn default() -> Self {
        Self {
            du: DEFAULT_DIFFUSION_U,
            dv: DEFAULT_DIFFUSION_V,
            f: DEFAULT_FEED,
            k: DEFAULT_KILL,
        }
    }
}
