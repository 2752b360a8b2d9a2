use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;

use crate::cancel::Interruption;

/// How a computation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Finished,
    Cancelled,
}

/// Partial or final result of a [`SeriesComputation`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub completed_steps: u32,
    pub total_steps: u32,
    pub value: f64,
}

/// Sums `1/k^2` one term per step (converges to pi^2/6), checking for
/// interruption before every step.
pub struct SeriesComputation {
    steps: u32,
    step_delay: Duration,
}

impl SeriesComputation {
    pub fn new(steps: u32, step_delay: Duration) -> Self {
        Self { steps, step_delay }
    }

    /// Abort returns the partial sum computed so far.
    pub fn run(&self, interruption: &mut Interruption) -> RunReport {
        let mut value = 0.0;

        for step in 0..self.steps {
            if interruption.check().is_err() {
                warn!("Stopped after {}/{} steps", step, self.steps);
                return self.report(RunStatus::Cancelled, step, value);
            }

            let k = f64::from(step + 1);
            value += 1.0 / (k * k);
            debug!("Step {}/{}: {:.8}", step + 1, self.steps, value);

            if !self.step_delay.is_zero() {
                thread::sleep(self.step_delay);
            }
        }

        info!("Finished {} steps", self.steps);
        self.report(RunStatus::Finished, self.steps, value)
    }

    fn report(&self, status: RunStatus, completed_steps: u32, value: f64) -> RunReport {
        RunReport {
            status,
            completed_steps,
            total_steps: self.steps,
            value,
        }
    }
}
