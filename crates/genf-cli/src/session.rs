//! One CLI invocation's worth of state: config, worker pool, scan rules.

use anyhow::{bail, Context, Result};
use genf_batch::scan::absolute;
use genf_batch::{collect_files, BatchDriver, BatchSummary, Candidate, JobOutcome, JobPlan, ScanOptions};
use genf_core::config::{expand_tilde, GenfConfig};
use genf_core::Direction;
use genf_crypto::is_container_name;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::progress::{fmt_bytes, FileBars};
use crate::prompt;

pub struct Session {
    config: GenfConfig,
    driver: BatchDriver,
    scan: ScanOptions,
}

impl Session {
    pub fn new(config: GenfConfig) -> Result<Self> {
        let driver = BatchDriver::from_config(&config.batch).context("starting worker pool")?;
        // The executable may live in the directory being scanned
        let scan = ScanOptions::from_config(&config.batch, std::env::current_exe().ok());
        Ok(Self {
            config,
            driver,
            scan,
        })
    }

    pub fn scan_options(&self) -> &ScanOptions {
        &self.scan
    }

    /// Explicit directory, else `batch.work_dir`, else the current directory.
    pub fn work_dir(&self, explicit: Option<&Path>) -> PathBuf {
        let dir = explicit
            .map(Path::to_path_buf)
            .or_else(|| self.config.batch.work_dir.as_deref().map(expand_tilde))
            .unwrap_or_else(|| PathBuf::from("."));
        absolute(&dir)
    }

    /// Candidates for a single-direction command.
    ///
    /// File arguments are taken as given. Directory arguments are scanned and
    /// contribute only files that fit `direction` (`.ge` files for decrypt,
    /// everything else for encrypt).
    pub fn gather(&self, paths: &[PathBuf], direction: Direction) -> Result<JobPlan> {
        let want_containers = direction == Direction::Decrypt;
        let mut files = Vec::new();
        for path in paths {
            if path.is_dir() {
                let found = collect_files(path, &self.scan)?;
                files.extend(
                    found
                        .into_iter()
                        .filter(|f| is_container_name(f) == want_containers),
                );
            } else {
                files.push(absolute(path));
            }
        }

        let mut seen = HashSet::new();
        let candidates: Vec<Candidate> = files
            .into_iter()
            .filter(|f| seen.insert(f.clone()))
            .map(|path| Candidate {
                path,
                counterpart_exists: false,
            })
            .collect();
        debug!(count = candidates.len(), %direction, "gathered files");

        Ok(match direction {
            Direction::Encrypt => JobPlan {
                encrypt: candidates,
                decrypt: Vec::new(),
            },
            Direction::Decrypt => JobPlan {
                encrypt: Vec::new(),
                decrypt: candidates,
            },
        })
    }

    /// Ask for the password, optionally list and confirm, then run the plan.
    ///
    /// Returns an empty summary when there is nothing to do or the user
    /// declines at the confirmation prompt.
    pub fn process(&self, plan: &JobPlan, confirm: bool) -> Result<BatchSummary> {
        if plan.is_empty() {
            println!("\nNo files selected.");
            return Ok(BatchSummary::default());
        }

        let password = prompt::password("\nPassword: ")?;
        if password.is_empty() {
            bail!("password must not be empty");
        }
        if !plan.encrypt.is_empty() {
            let again = prompt::password("Confirm password: ")?;
            if !password.matches(&again) {
                bail!("passwords do not match");
            }
        }

        if confirm {
            print_list("Encrypt", &plan.encrypt);
            print_list("Decrypt", &plan.decrypt);
            if !prompt::confirm("\nProceed? (y/n): ")? {
                return Ok(BatchSummary::default());
            }
        }

        let jobs = plan.jobs();
        let bars = FileBars::default();
        let outcomes = self.driver.run(&password, &jobs, Some(bars.callback()));
        bars.clear();

        report(&outcomes);
        Ok(BatchSummary::from_outcomes(&outcomes))
    }
}

fn print_list(heading: &str, candidates: &[Candidate]) {
    if candidates.is_empty() {
        return;
    }
    println!("\n{heading} ({}):", candidates.len());
    for (i, c) in candidates.iter().enumerate() {
        println!("{} {}", i + 1, c.path.display());
    }
}

/// One line per file, numbered within its direction.
fn report(outcomes: &[JobOutcome]) {
    let total = |d: Direction| outcomes.iter().filter(|o| o.direction == d).count();
    let (enc_total, dec_total) = (total(Direction::Encrypt), total(Direction::Decrypt));
    let (mut enc_n, mut dec_n) = (0, 0);

    println!();
    for o in outcomes {
        let (n, of) = match o.direction {
            Direction::Encrypt => {
                enc_n += 1;
                (enc_n, enc_total)
            }
            Direction::Decrypt => {
                dec_n += 1;
                (dec_n, dec_total)
            }
        };
        match &o.result {
            Ok(r) => println!(
                "{} ({n}/{of}): {}  {} in {:.2}s",
                o.direction,
                o.path.display(),
                fmt_bytes(r.summary.plaintext_bytes),
                o.elapsed.as_secs_f64()
            ),
            Err(e) => println!("{} ({n}/{of}): {}  error: {e}", o.direction, o.path.display()),
        }
    }
}

/// Non-zero exit when any file failed
pub fn fail_on_errors(summary: &BatchSummary) -> Result<()> {
    if summary.failed > 0 {
        bail!(
            "{} of {} files failed",
            summary.failed,
            summary.failed + summary.succeeded
        );
    }
    Ok(())
}
