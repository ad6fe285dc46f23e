// ── Progress bar helpers ──────────────────────────────────────────────────────

use genf_batch::BatchProgress;
use genf_core::Direction;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One byte-progress bar per file in flight, created on its first report.
#[derive(Default)]
pub struct FileBars {
    multi: MultiProgress,
    bars: Arc<Mutex<HashMap<PathBuf, ProgressBar>>>,
}

impl FileBars {
    /// Callback for the batch driver
    pub fn callback(&self) -> BatchProgress {
        let multi = self.multi.clone();
        let bars = self.bars.clone();
        Arc::new(move |path: &Path, direction: Direction, done: u64, total: u64| {
            let mut bars = bars.lock().unwrap_or_else(|e| e.into_inner());
            let bar = bars
                .entry(path.to_path_buf())
                .or_insert_with(|| multi.add(make_progress_bar(path, direction, total)));
            bar.set_position(done);
            if done >= total {
                bar.finish_and_clear();
            }
        })
    }

    pub fn clear(&self) {
        let bars = self.bars.lock().unwrap_or_else(|e| e.into_inner());
        for bar in bars.values() {
            bar.finish_and_clear();
        }
        let _ = self.multi.clear();
    }
}

fn make_progress_bar(path: &Path, direction: Direction, total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{prefix:.bold} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {wide_msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    pb.set_prefix(direction.label());
    pb.set_message(
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn fmt_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
