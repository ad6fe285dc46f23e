//! Interactive menu: an explicit command loop over one working directory.
//!
//! The directory is rescanned on every pick, so files created by the
//! previous round show up (and are marked) immediately.

use anyhow::Result;
use genf_batch::{collect_files, plan_jobs, select, Candidate, JobPlan};
use genf_core::Direction;
use std::io::{self, Write};
use std::path::Path;

use crate::prompt;
use crate::session::Session;

pub fn title(dir: &Path) -> String {
    format!("----- genf file encryption ({}) -----", dir.display())
}

pub fn run(session: &Session, dir: &Path) -> Result<()> {
    loop {
        println!("{}", title(dir));
        println!("1. Encrypt files");
        println!("2. Decrypt files");
        println!("3. Clear screen");
        println!("q. Quit");
        let Some(choice) = prompt::read_line("Choose: ")? else {
            return Ok(());
        };

        match choice.trim() {
            "1" => pick_and_process(session, dir, Direction::Encrypt)?,
            "2" => pick_and_process(session, dir, Direction::Decrypt)?,
            "3" => {
                clear_screen();
                continue;
            }
            "q" | "Q" => return Ok(()),
            _ => {}
        }
        println!();
    }
}

/// Per-round failures (bad password, scan error) are shown and the menu
/// carries on. Only stdin failures end the loop.
fn pick_and_process(session: &Session, dir: &Path, direction: Direction) -> Result<()> {
    let files = match collect_files(dir, session.scan_options()) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("error: {e:#}");
            return Ok(());
        }
    };
    let plan = plan_jobs(&files);
    let candidates = match direction {
        Direction::Encrypt => &plan.encrypt,
        Direction::Decrypt => &plan.decrypt,
    };
    if candidates.is_empty() {
        println!("\nNothing to {direction} in {}", dir.display());
        return Ok(());
    }

    let chosen = choose(candidates, direction)?;
    if chosen.is_empty() {
        return Ok(());
    }
    let plan = match direction {
        Direction::Encrypt => JobPlan {
            encrypt: chosen,
            decrypt: Vec::new(),
        },
        Direction::Decrypt => JobPlan {
            encrypt: Vec::new(),
            decrypt: chosen,
        },
    };

    if let Err(e) = session.process(&plan, true) {
        eprintln!("\nerror: {e:#}");
    }
    Ok(())
}

fn choose(candidates: &[Candidate], direction: Direction) -> Result<Vec<Candidate>> {
    println!("\nFiles to {direction}:");
    for line in listing(candidates, direction) {
        println!("{line}");
    }
    let input = prompt::read_line("\nSelect numbers separated by / (e.g. 1/2/3): ")?
        .unwrap_or_default();
    Ok(select(candidates, &input))
}

/// Numbered lines, counterpart marks, and the trailing "all" entry
fn listing(candidates: &[Candidate], direction: Direction) -> Vec<String> {
    let mark = match direction {
        Direction::Encrypt => "(already encrypted)",
        Direction::Decrypt => "(already decrypted)",
    };
    let mut lines: Vec<String> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if c.counterpart_exists {
                format!("{} {} {mark}", i + 1, c.path.display())
            } else {
                format!("{} {}", i + 1, c.path.display())
            }
        })
        .collect();
    lines.push(format!("{} all", candidates.len() + 1));
    lines
}

fn clear_screen() {
    print!("\x1b[2J\x1b[H");
    let _ = io::stdout().flush();
}
