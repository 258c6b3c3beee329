use rand::distributions::{Distribution, Uniform};
use rand_distr::{Exp, Normal};
use rand_pcg::Pcg64Mcg;

use crate::utils::errors::SimulationError;

/// The random number capability used throughout a batch.  A single stream
/// is threaded by mutable reference through population generation, so that
/// a fixed seed reproduces every trial of every precinct.
pub trait RandomSource: std::fmt::Debug {
    /// Uniform integer over the inclusive range `[lower, upper]`.
    fn uniform_int(&mut self, lower: i64, upper: i64) -> Result<i64, SimulationError>;
    /// Uniform double over the half-open range `[lower, upper)`.
    fn uniform_double(&mut self, lower: f64, upper: f64) -> Result<f64, SimulationError>;
    /// Exponential draw with rate `lambda` (mean `1 / lambda`), rounded to
    /// the nearest whole second.
    fn exponential_int(&mut self, lambda: f64) -> Result<u64, SimulationError>;
    fn normal(&mut self, mean: f64, dev: f64) -> Result<f64, SimulationError>;
}

/// `SeededRandom` is the production `RandomSource`, a PCG stream seeded
/// from the configuration seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg64Mcg,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg64Mcg::new(u128::from(seed)),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn uniform_int(&mut self, lower: i64, upper: i64) -> Result<i64, SimulationError> {
        if lower > upper {
            return Err(SimulationError::InvalidUniformBounds {
                lower: lower as f64,
                upper: upper as f64,
            });
        }
        Ok(Uniform::new_inclusive(lower, upper).sample(&mut self.rng))
    }

    fn uniform_double(&mut self, lower: f64, upper: f64) -> Result<f64, SimulationError> {
        if !(lower < upper) || !lower.is_finite() || !upper.is_finite() {
            return Err(SimulationError::InvalidUniformBounds { lower, upper });
        }
        Ok(Uniform::new(lower, upper).sample(&mut self.rng))
    }

    fn exponential_int(&mut self, lambda: f64) -> Result<u64, SimulationError> {
        let variate = Exp::new(lambda)?.sample(&mut self.rng).round();
        if variate.is_finite() && variate > 0.0 {
            Ok(variate as u64)
        } else if variate.is_finite() {
            Ok(0)
        } else {
            Err(SimulationError::ExpError(rand_distr::ExpError::LambdaTooSmall))
        }
    }

    fn normal(&mut self, mean: f64, dev: f64) -> Result<f64, SimulationError> {
        Ok(Normal::new(mean, dev)?.sample(&mut self.rng))
    }
}
