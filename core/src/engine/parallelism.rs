use crate::constants::MAX_WORKERS;
use crate::types::PipelineError;

/// Parallelism configuration for one operation.
///
/// - `workers`: size of the worker group (ranks). Fixed for the whole operation.
/// - `threads_per_worker`: local execution units each rank uses for its blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub workers: usize,
    pub threads_per_worker: usize,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self::dynamic(None, None)
    }
}

impl ParallelismProfile {
    pub fn single_threaded() -> Self {
        Self {
            workers: 1,
            threads_per_worker: 1,
        }
    }

    pub fn new(workers: usize, threads_per_worker: usize) -> Result<Self, PipelineError> {
        let profile = Self { workers, threads_per_worker };
        profile.validate()?;
        Ok(profile)
    }

    /// Fill unspecified dimensions from the host.
    ///
    /// One worker by default; local threads default to all cores but one,
    /// split evenly across workers, never below one.
    pub fn dynamic(workers: Option<usize>, threads_per_worker: Option<usize>) -> Self {
        let cores = num_cpus::get();
        let workers = workers.unwrap_or(1).clamp(1, MAX_WORKERS);
        let threads_per_worker = threads_per_worker
            .unwrap_or_else(|| (cores.saturating_sub(1) / workers).max(1))
            .max(1);

        Self { workers, threads_per_worker }
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(PipelineError::Validation(format!(
                "invalid worker count: {}, must be within 1..={}",
                self.workers, MAX_WORKERS
            )));
        }
        if self.threads_per_worker == 0 {
            return Err(PipelineError::Validation(
                "threads per worker must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
