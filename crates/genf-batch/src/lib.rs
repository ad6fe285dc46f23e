//! genf-batch: everything between "the user picked some paths" and the
//! per-file engine calls
//!
//! # Overview
//! - `scan`: recursive directory listing with ignore rules
//! - `plan`: split paths into encrypt / decrypt candidates, parse selections
//! - `driver`: run jobs independently on a worker pool, one outcome per file

pub mod driver;
pub mod plan;
pub mod scan;

pub use driver::{BatchDriver, BatchProgress, BatchSummary, JobError, JobOutcome};
pub use plan::{parse_selection, plan_jobs, select, Candidate, Job, JobPlan};
pub use scan::{collect_files, resolve_args, ArgPaths, ScanOptions};
