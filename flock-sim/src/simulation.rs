use flock_core::{FlockConfig, FlockStd};
use flock_shared::FlockSettings;

use crate::config;
use crate::error::{Result, SimError};
use crate::output::SnapshotWriter;

const PROGRESS_INTERVAL: usize = 100;

/// What the run does when a snapshot cannot be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteFailurePolicy {
    /// Stop and return the error
    #[default]
    Abort,
    /// Log the lost frame and keep stepping
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub steps: usize,
    pub frames_written: usize,
    pub dropped_frames: usize,
}

/// Runs a flock for `total_steps` steps, handing each step's positions to a writer
pub struct Simulation {
    flock: FlockStd,
    policy: WriteFailurePolicy,
}

impl Simulation {
    pub fn new(config: FlockConfig) -> Self {
        Self::from_flock(FlockStd::new(config))
    }

    /// Validates `settings` before placing the birds.
    pub fn from_settings(settings: &FlockSettings) -> Result<Self> {
        config::validate(settings)?;
        Ok(Self::new(FlockConfig::from(settings)))
    }

    pub fn from_flock(flock: FlockStd) -> Self {
        Self {
            flock,
            policy: WriteFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: WriteFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn flock(&self) -> &FlockStd {
        &self.flock
    }

    /// Steps the flock and writes a snapshot after every step, labeled with
    /// the 0-based index of the step just taken.
    pub fn run<W>(&mut self, writer: &mut W) -> Result<RunSummary>
    where
        W: SnapshotWriter + ?Sized,
    {
        let config = self.flock.config;
        let mut summary = RunSummary::default();

        log::info!(
            "Running {} birds for {} steps (dt = {})",
            config.bird_count,
            config.total_steps,
            config.time_step
        );

        for step in 0..config.total_steps {
            self.flock.step();
            summary.steps += 1;

            match writer.write(step, &self.flock.positions()) {
                Ok(()) => summary.frames_written += 1,
                Err(source) => match self.policy {
                    WriteFailurePolicy::Abort => {
                        // Keep the frames that did make it out
                        if let Err(finish_error) = writer.finish() {
                            log::warn!("Failed to finalize output: {}", finish_error);
                        }
                        return Err(SimError::Snapshot { step, source });
                    }
                    WriteFailurePolicy::Skip => {
                        log::warn!("Dropping snapshot for step {}: {}", step, source);
                        summary.dropped_frames += 1;
                    }
                },
            }

            if (step + 1) % PROGRESS_INTERVAL == 0 {
                log::debug!("Completed step {}/{}", step + 1, config.total_steps);
            }
        }

        if let Err(source) = writer.finish() {
            match self.policy {
                WriteFailurePolicy::Abort => return Err(SimError::Finish(source)),
                WriteFailurePolicy::Skip => log::warn!("Failed to finalize output: {}", source),
            }
        }

        log::info!(
            "Finished {} steps: {} frames written, {} dropped",
            summary.steps,
            summary.frames_written,
            summary.dropped_frames
        );
        Ok(summary)
    }
}
