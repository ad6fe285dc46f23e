//! Job planning: which paths get encrypted, which get decrypted.
//!
//! A path ending in `.ge` is a decrypt candidate, anything else an encrypt
//! candidate. Each candidate notes whether its counterpart (`x` ↔ `x.ge`) is
//! in the same listing, which the menu shows as "already done".

use genf_core::Direction;
use genf_crypto::{decrypted_path, encrypted_path};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// The other side of this pair is also present in the listing
    pub counterpart_exists: bool,
}

/// One unit of batch work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub path: PathBuf,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPlan {
    pub encrypt: Vec<Candidate>,
    pub decrypt: Vec<Candidate>,
}

impl JobPlan {
    pub fn is_empty(&self) -> bool {
        self.encrypt.is_empty() && self.decrypt.is_empty()
    }

    /// Encrypt jobs first, then decrypt jobs, each in listing order.
    pub fn jobs(&self) -> Vec<Job> {
        let enc = self.encrypt.iter().map(|c| Job {
            path: c.path.clone(),
            direction: Direction::Encrypt,
        });
        let dec = self.decrypt.iter().map(|c| Job {
            path: c.path.clone(),
            direction: Direction::Decrypt,
        });
        enc.chain(dec).collect()
    }
}

/// De-duplicate `paths` (first occurrence wins) and split by suffix.
pub fn plan_jobs(paths: &[PathBuf]) -> JobPlan {
    let mut seen = HashSet::new();
    let unique: Vec<&PathBuf> = paths.iter().filter(|p| seen.insert(p.as_path())).collect();

    let mut plan = JobPlan::default();
    for path in unique {
        match decrypted_path(path) {
            Some(plain) => plan.decrypt.push(Candidate {
                path: path.clone(),
                counterpart_exists: seen.contains(plain.as_path()),
            }),
            None => plan.encrypt.push(Candidate {
                path: path.clone(),
                counterpart_exists: seen.contains(encrypted_path(path).as_path()),
            }),
        }
    }
    plan
}

/// Parse a menu selection such as `1/3/4` against a list of `len` entries.
///
/// Entries are 1-based and `/`-separated. Non-numbers, out-of-range values
/// and repeats are ignored. `len + 1` means "all" and selects every entry
/// in order, regardless of what came before it.
pub fn parse_selection(input: &str, len: usize) -> Vec<usize> {
    let mut picked = Vec::new();
    let mut seen = HashSet::new();
    for token in input.split('/') {
        let Ok(n) = token.trim().parse::<usize>() else {
            continue;
        };
        if n == len + 1 {
            return (0..len).collect();
        }
        if n == 0 || n > len {
            continue;
        }
        if seen.insert(n - 1) {
            picked.push(n - 1);
        }
    }
    picked
}

/// Candidates chosen by a selection string, in the order they were typed.
pub fn select(candidates: &[Candidate], input: &str) -> Vec<Candidate> {
    parse_selection(input, candidates.len())
        .into_iter()
        .map(|i| candidates[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_split_by_suffix() {
        let plan = plan_jobs(&paths(&["/d/a.txt", "/d/b.txt.ge", "/d/c.bin"]));
        assert_eq!(plan.encrypt.len(), 2);
        assert_eq!(plan.decrypt.len(), 1);
        assert_eq!(plan.decrypt[0].path, PathBuf::from("/d/b.txt.ge"));
    }

    #[test]
    fn test_counterpart_marks() {
        let plan = plan_jobs(&paths(&["/d/a.txt", "/d/a.txt.ge", "/d/b.txt", "/d/c.txt.ge"]));

        let enc: Vec<_> = plan.encrypt.iter().map(|c| c.counterpart_exists).collect();
        let dec: Vec<_> = plan.decrypt.iter().map(|c| c.counterpart_exists).collect();
        assert_eq!(enc, vec![true, false]);
        assert_eq!(dec, vec![true, false]);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let plan = plan_jobs(&paths(&["/d/a.txt", "/d/b.txt", "/d/a.txt"]));
        let listed: Vec<_> = plan.encrypt.iter().map(|c| c.path.clone()).collect();
        assert_eq!(listed, paths(&["/d/a.txt", "/d/b.txt"]));
    }

    #[test]
    fn test_jobs_encrypt_then_decrypt() {
        let plan = plan_jobs(&paths(&["/d/x.ge", "/d/y"]));
        let jobs = plan.jobs();
        assert_eq!(jobs[0].direction, Direction::Encrypt);
        assert_eq!(jobs[0].path, PathBuf::from("/d/y"));
        assert_eq!(jobs[1].direction, Direction::Decrypt);
        assert!(!plan.is_empty());
        assert!(plan_jobs(&[]).is_empty());
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1/3", 4), vec![0, 2]);
        assert_eq!(parse_selection(" 2 / 2 /1", 4), vec![1, 0]);
        assert_eq!(parse_selection("0/9/x//", 4), Vec::<usize>::new());
        assert_eq!(parse_selection("5", 4), vec![0, 1, 2, 3]);
        assert_eq!(parse_selection("2/5", 4), vec![0, 1, 2, 3]);
        assert_eq!(parse_selection("", 4), Vec::<usize>::new());
    }

    #[test]
    fn test_select() {
        let plan = plan_jobs(&paths(&["/a", "/b", "/c"]));
        let chosen = select(&plan.encrypt, "3/1");
        assert_eq!(chosen[0].path, PathBuf::from("/c"));
        assert_eq!(chosen[1].path, PathBuf::from("/a"));
    }
}
