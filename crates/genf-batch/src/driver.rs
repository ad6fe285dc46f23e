//! Batch driver: run many single-file jobs on a bounded worker pool.
//!
//! Every job is independent. A failure is recorded in that job's outcome and
//! never stops or rolls back the others. Outcomes come back in input order.

use crate::plan::Job;
use genf_core::config::BatchConfig;
use genf_core::Direction;
use genf_crypto::{DecryptError, EncryptError, Engine, FileReport, Password, ProgressFn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Per-file progress callback (path, direction, bytes_done, bytes_total)
pub type BatchProgress = Arc<dyn Fn(&Path, Direction, u64, u64) + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("encrypt: {0}")]
    Encrypt(#[from] EncryptError),

    #[error("decrypt: {0}")]
    Decrypt(#[from] DecryptError),
}

#[derive(Debug)]
pub struct JobOutcome {
    pub path: PathBuf,
    pub direction: Direction,
    pub result: Result<FileReport, JobError>,
    pub elapsed: Duration,
}

impl JobOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[JobOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        Self {
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

pub struct BatchDriver {
    engine: Engine,
    pool: rayon::ThreadPool,
}

impl BatchDriver {
    /// `workers == 0` sizes the pool to the number of logical CPUs.
    pub fn new(workers: usize) -> anyhow::Result<Self> {
        Self::with_engine(Engine::default(), workers)
    }

    pub fn from_config(config: &BatchConfig) -> anyhow::Result<Self> {
        Self::new(config.workers)
    }

    pub fn with_engine(engine: Engine, workers: usize) -> anyhow::Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("genf-worker-{i}"))
            .build()
            .map_err(|e| anyhow::anyhow!("building worker pool: {e}"))?;
        debug!(threads = pool.current_num_threads(), "batch driver ready");
        Ok(Self { engine, pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `jobs` with one password, each job on its own worker.
    pub fn run(
        &self,
        password: &Password,
        jobs: &[Job],
        progress: Option<BatchProgress>,
    ) -> Vec<JobOutcome> {
        info!(jobs = jobs.len(), workers = self.workers(), "starting batch");
        let outcomes: Vec<JobOutcome> = self.pool.install(|| {
            jobs.par_iter()
                .map(|job| self.run_one(password, job, progress.clone()))
                .collect()
        });

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch finished"
        );
        outcomes
    }

    fn run_one(&self, password: &Password, job: &Job, progress: Option<BatchProgress>) -> JobOutcome {
        let started = Instant::now();
        let callback: Option<ProgressFn> = progress.map(|cb| {
            let path = job.path.clone();
            let direction = job.direction;
            Box::new(move |done: u64, total: u64, _msg: &str| cb(&path, direction, done, total))
                as ProgressFn
        });

        let result = match job.direction {
            Direction::Encrypt => self
                .engine
                .encrypt_file(password, &job.path, callback.as_ref())
                .map_err(JobError::from),
            Direction::Decrypt => self
                .engine
                .decrypt_file(password, &job.path, callback.as_ref())
                .map_err(JobError::from),
        };
        let elapsed = started.elapsed();

        match &result {
            Ok(report) => debug!(
                path = %job.path.display(),
                output = %report.output.display(),
                elapsed_ms = elapsed.as_millis() as u64,
                "{} finished",
                job.direction.label()
            ),
            Err(e) => warn!(
                path = %job.path.display(),
                error = %e,
                "{} failed",
                job.direction.label()
            ),
        }

        JobOutcome {
            path: job.path.clone(),
            direction: job.direction,
            result,
            elapsed,
        }
    }
}
