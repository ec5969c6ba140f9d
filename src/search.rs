use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::{
    integrate, mission_weight, EmissionModel, Error, FuelFlowModel, IntegrationResult,
    MissionWeightBudget, PerformanceLimits, ProcessedTrajectory, WeightPolicy,
};

/// Parameters of the linear scan over the fuel factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The first fuel factor tried
    pub seed: f64,
    /// Increment of the fuel factor after a failed try
    pub step: f64,
    /// Maximum number of tries, including the first one
    pub max_tries: usize,
    /// Wall-clock limit of the whole search
    #[serde(default)]
    pub max_duration: Option<Duration>,
}

impl SearchConfig {
    /// Starts low and steps coarsely: short missions get a tight trip fuel.
    pub fn accurate() -> Self {
        Self {
            seed: 0.01,
            step: 0.02,
            max_tries: 100,
            max_duration: None,
        }
    }

    /// Starts at 10% and steps finely: fewer tries for long missions.
    pub fn fast() -> Self {
        Self {
            seed: 0.1,
            step: 0.01,
            max_tries: 100,
            max_duration: None,
        }
    }

    /// The fuel factor of the `attempt`-th try (zero-based)
    pub fn fuel_factor(&self, attempt: usize) -> f64 {
        self.seed + self.step * attempt as f64
    }

    fn validate(&self) -> Result<(), Error> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if self.max_tries == 0 {
            return Err(Error::InvalidConfig("max_tries must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::accurate()
    }
}

/// The first feasible fuel factor found by [`search`] and the mission flown with it.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelFactorSearchResult {
    pub fuel_factor: f64,
    /// Number of tries, including the successful one
    pub attempts: usize,
    pub budget: MissionWeightBudget,
    pub result: IntegrationResult,
}

/// Searches the smallest tried fuel factor `seed + k * step` for which the trajectory is
/// flown without exhausting the trip fuel.
///
/// The scan only moves up, and only [`Error::FuelExhausted`] causes another try. The
/// result is the first feasible factor, which is the smallest feasible multiple of `step`
/// above `seed` only if feasibility is monotonic in the fuel factor. It may leave up to one
/// `step` of trip fuel unburned.
/// # Errors
/// * any non-retryable error, unchanged, except the two below
/// * [`Error::MissionInfeasible`] when the tries run out, or when a later try no longer fits
///   under MTOW or the maximum fuel capacity
/// * [`Error::Timeout`] when `max_duration` elapses
pub fn search<F, E>(
    trajectory: &ProcessedTrajectory,
    limits: &PerformanceLimits,
    payload_factor: f64,
    policy: &WeightPolicy,
    config: &SearchConfig,
    fuel_flow: &F,
    emission: &E,
) -> Result<FuelFactorSearchResult, Error>
where
    F: FuelFlowModel + ?Sized,
    E: EmissionModel + ?Sized,
{
    config.validate()?;
    let started = Instant::now();

    let mut last_error = None;
    for attempt in 0..config.max_tries {
        if let Some(limit) = config.max_duration {
            if attempt > 0 && started.elapsed() > limit {
                return Err(Error::Timeout {
                    tries: attempt,
                    limit_s: limit.as_secs_f64(),
                });
            }
        }

        let fuel_factor = config.fuel_factor(attempt);
        let outcome = mission_weight(limits, payload_factor, fuel_factor, policy)
            .and_then(|budget| {
                integrate(trajectory, &budget, limits, fuel_flow, emission)
                    .map(|result| (budget, result))
            });

        match outcome {
            Ok((budget, result)) => {
                log::debug!("fuel factor {fuel_factor:.3} feasible after {} tries", attempt + 1);
                return Ok(FuelFactorSearchResult {
                    fuel_factor,
                    attempts: attempt + 1,
                    budget,
                    result,
                });
            }
            Err(e) if e.is_retryable() => {
                log::debug!("fuel factor {fuel_factor:.3}: {e}");
                last_error = Some(e);
            }
            // more trip fuel no longer fits the aircraft
            Err(e @ (Error::ExceedsMTOW { .. } | Error::ExceedsMFC { .. })) if attempt > 0 => {
                return Err(Error::MissionInfeasible {
                    tries: attempt + 1,
                    last_fuel_factor: fuel_factor,
                    last_error: Box::new(e),
                })
            }
            Err(e) => return Err(e),
        }
    }

    match last_error {
        Some(e) => Err(Error::MissionInfeasible {
            tries: config.max_tries,
            last_fuel_factor: config.fuel_factor(config.max_tries - 1),
            last_error: Box::new(e),
        }),
        None => Err(Error::InvalidConfig("max_tries must be at least 1".to_string())),
    }
}
