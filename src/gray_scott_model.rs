use crate::error::{EngineError, Result};
use crate::grid::Grid;
use crate::model_presets::GrayScottParameters;
use crate::persistence::StateRecord;
use crate::utils::clamp_unit;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Integration step applied to every update. Fixed for stability at the default parameters.
pub const TIME_STEP: f64 = 0.9;

pub const SEED_PATCH_COUNT: usize = 10;
pub const SEED_PATCH_HALF_WIDTH: usize = 3;
pub const SEED_PATCH_U: f64 = 0.5;
pub const SEED_PATCH_V: f64 = 0.25;

const INITIAL_U_RANGE: std::ops::Range<f64> = 0.5..1.0;
const INITIAL_V_RANGE: std::ops::Range<f64> = 0.0..0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChemicalSpecies {
    U,
    V,
}

/// The scalars a control surface may read and write by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    DiffusionU,
    DiffusionV,
    Feed,
    Kill,
}

impl Parameter {
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::DiffusionU => "Du",
            Parameter::DiffusionV => "Dv",
            Parameter::Feed => "f",
            Parameter::Kill => "k",
        }
    }

    pub fn all() -> [Parameter; 4] {
        use Parameter::*;
        [DiffusionU, DiffusionV, Feed, Kill]
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = EngineError;

    fn from_str(name: &str) -> Result<Self> {
        Parameter::all()
            .into_iter()
            .find(|parameter| parameter.name() == name)
            .ok_or_else(|| EngineError::config(format!("unknown parameter '{}'", name)))
    }
}

/// Two-species Gray-Scott system on a square toroidal grid.
///
/// U and V always share the same dimensions and every cell stays in `[0, 1]`
/// after each `reset` and `step`. Parameters are stored as given; range
/// enforcement belongs to whoever drives the system.
pub struct ReactionDiffusionSystem {
    size: usize,
    params: GrayScottParameters,
    u: Grid,
    v: Grid,
    next_u: Grid,
    next_v: Grid,
    rng: SmallRng,
}

impl ReactionDiffusionSystem {
    pub fn new(size: usize, params: GrayScottParameters) -> Self {
        Self::from_rng(size, params, SmallRng::from_entropy())
    }

    /// Same as [`new`](Self::new) but every `reset` draws from a seeded generator.
    pub fn with_seed(size: usize, params: GrayScottParameters, seed: u64) -> Self {
        Self::from_rng(size, params, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(size: usize, params: GrayScottParameters, mut rng: SmallRng) -> Self {
        let (u, v) = seeded_grids(size, &mut rng);
        Self {
            size,
            params,
            u,
            v,
            next_u: Grid::filled(size, 0.0),
            next_v: Grid::filled(size, 0.0),
            rng,
        }
    }

    /// Builds a system around existing concentration grids.
    pub fn from_grids(u: Grid, v: Grid, params: GrayScottParameters) -> Result<Self> {
        check_shapes(&u, &v)?;
        let size = u.size();
        Ok(Self {
            size,
            params,
            u,
            v,
            next_u: Grid::filled(size, 0.0),
            next_v: Grid::filled(size, 0.0),
            rng: SmallRng::from_entropy(),
        })
    }

    /// Replaces both grids with fresh random fields at the current size and
    /// keeps the current parameters.
    pub fn reset(&mut self) {
        self.reset_with(self.size, self.params);
    }

    /// Replaces both grids with fresh random fields of `size`×`size` and
    /// installs `params`.
    ///
    /// U starts uniform in `[0.5, 1.0)`, V uniform in `[0.0, 0.2)`, then ten
    /// 6×6 seed patches are stamped onto both at random centres.
    pub fn reset_with(&mut self, size: usize, params: GrayScottParameters) {
        let (u, v) = seeded_grids(size, &mut self.rng);
        self.size = size;
        self.params = params;
        self.u = u;
        self.v = v;
        self.next_u = Grid::filled(size, 0.0);
        self.next_v = Grid::filled(size, 0.0);

        debug!("reset {0}x{0} grid with {1:?}", size, params);
    }

    /// Advances the system by one time unit.
    ///
    /// Every new cell is computed from the previous U and V only; the results
    /// land in scratch grids which are then swapped in.
    pub fn step(&mut self) {
        let size = self.size;
        if size == 0 {
            return;
        }

        let GrayScottParameters { du, dv, f, k } = self.params;
        let (u, v) = (&self.u, &self.v);

        self.next_u
            .as_mut_slice()
            .par_chunks_mut(size)
            .zip(self.next_v.as_mut_slice().par_chunks_mut(size))
            .enumerate()
            .for_each(|(row, (next_u_row, next_v_row))| {
                for col in 0..size {
                    let u_value = u.get(row, col);
                    let v_value = v.get(row, col);
                    let reaction = u_value * v_value * v_value;

                    let delta_u = du * u.laplacian_at(row, col) - reaction + f * (1.0 - u_value);
                    let delta_v = dv * v.laplacian_at(row, col) + reaction - (f + k) * v_value;

                    next_u_row[col] = clamp_unit(u_value + delta_u * TIME_STEP);
                    next_v_row[col] = clamp_unit(v_value + delta_v * TIME_STEP);
                }
            });

        std::mem::swap(&mut self.u, &mut self.next_u);
        std::mem::swap(&mut self.v, &mut self.next_v);
    }

    pub fn step_n(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn grid(&self, cs: ChemicalSpecies) -> &Grid {
        match cs {
            ChemicalSpecies::U => &self.u,
            ChemicalSpecies::V => &self.v,
        }
    }

    pub fn u(&self) -> &Grid {
        &self.u
    }

    pub fn v(&self) -> &Grid {
        &self.v
    }

    pub fn parameters(&self) -> GrayScottParameters {
        self.params
    }

    pub fn set_parameters(&mut self, params: GrayScottParameters) {
        self.params = params;
    }

    pub fn get_parameter(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::DiffusionU => self.params.du,
            Parameter::DiffusionV => self.params.dv,
            Parameter::Feed => self.params.f,
            Parameter::Kill => self.params.k,
        }
    }

    /// Stores `value` as is. No range check happens here.
    pub fn set_parameter(&mut self, parameter: Parameter, value: f64) {
        let slot = match parameter {
            Parameter::DiffusionU => &mut self.params.du,
            Parameter::DiffusionV => &mut self.params.dv,
            Parameter::Feed => &mut self.params.f,
            Parameter::Kill => &mut self.params.k,
        };
        *slot = value;
    }

    pub fn get_parameter_by_name(&self, name: &str) -> Result<f64> {
        Ok(self.get_parameter(name.parse()?))
    }

    pub fn set_parameter_by_name(&mut self, name: &str, value: f64) -> Result<()> {
        self.set_parameter(name.parse()?, value);
        Ok(())
    }

    pub fn export_state(&self) -> StateRecord {
        StateRecord {
            u: self.u.to_rows(),
            v: self.v.to_rows(),
            du: self.params.du,
            dv: self.params.dv,
            f: self.params.f,
            k: self.params.k,
        }
    }

    /// Replaces grids and parameters from `record`.
    ///
    /// The imported shape becomes the new size, provided U and V are the same
    /// non-empty square. On error nothing is modified.
    pub fn import_state(&mut self, record: &StateRecord) -> Result<()> {
        let u = Grid::from_rows(&record.u)?;
        let v = Grid::from_rows(&record.v)?;
        check_shapes(&u, &v)?;

        if u.size() != self.size {
            debug!("import changes grid size from {} to {}", self.size, u.size());
        }

        self.size = u.size();
        self.next_u = Grid::filled(self.size, 0.0);
        self.next_v = Grid::filled(self.size, 0.0);
        self.u = u;
        self.v = v;
        self.params = record.parameters();
        Ok(())
    }
}

fn check_shapes(u: &Grid, v: &Grid) -> Result<()> {
    if u.size() != v.size() {
        return Err(EngineError::config(format!(
            "U is {0}x{0} but V is {1}x{1}",
            u.size(),
            v.size()
        )));
    }
    Ok(())
}

fn seeded_grids<R: Rng>(size: usize, rng: &mut R) -> (Grid, Grid) {
    let mut u = Grid::random(size, INITIAL_U_RANGE, rng);
    let mut v = Grid::random(size, INITIAL_V_RANGE, rng);

    if size > 0 {
        for _ in 0..SEED_PATCH_COUNT {
            let row = rng.gen_range(0..size);
            let col = rng.gen_range(0..size);
            u.fill_patch(row, col, SEED_PATCH_HALF_WIDTH, SEED_PATCH_U);
            v.fill_patch(row, col, SEED_PATCH_HALF_WIDTH, SEED_PATCH_V);
        }
    }

    (u, v)
}
