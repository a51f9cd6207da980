//! Verify command implementation.
//!
//! Replays every script twice in parallel and checks the runs agree, and
//! that the final fingerprint matches the one recorded in the script file.

use super::CliError;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Deserialize;
use shadowops::{Script, run_script};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A script file with an optional golden fingerprint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoldenScript {
    #[serde(flatten)]
    script: Script,
    #[serde(default)]
    expected_fingerprint: Option<u64>,
}

/// Per-thread verification tally, merged at the end.
#[derive(Debug, Default)]
struct VerifyStats {
    checked: u64,
    failures: Vec<String>,
}

impl VerifyStats {
    fn check(&mut self, path: &Path) {
        self.checked += 1;
        if let Err(reason) = verify_one(path) {
            self.failures.push(format!("{}: {reason}", path.display()));
        }
    }

    fn merge(&mut self, other: Self) {
        self.checked += other.checked;
        self.failures.extend(other.failures);
    }
}

fn verify_one(path: &Path) -> Result<u64, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read failed: {e}"))?;
    let golden: GoldenScript =
        serde_json::from_str(&text).map_err(|e| format!("parse failed: {e}"))?;

    let first = run_script(&golden.script);
    let second = run_script(&golden.script);
    if first != second {
        return Err(format!(
            "replay diverged ({:#018x} vs {:#018x})",
            first.fingerprint, second.fingerprint
        ));
    }

    match golden.expected_fingerprint {
        Some(expected) if expected != first.fingerprint => Err(format!(
            "fingerprint {:#018x}, expected {expected:#018x}",
            first.fingerprint
        )),
        _ => Ok(first.fingerprint),
    }
}

/// Execute the verify command.
///
/// # Errors
///
/// Returns an error if any script fails verification.
pub(crate) fn execute(
    scripts: &[PathBuf],
    threads: Option<usize>,
    progress: bool,
) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(scripts.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} scripts")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    let stats = scripts
        .par_iter()
        .fold(VerifyStats::default, |mut local, path| {
            local.check(path);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(VerifyStats::default, |mut a, b| {
            a.merge(b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    for failure in &stats.failures {
        println!("FAIL {failure}");
    }
    println!(
        "{} scripts checked, {} failed ({:.2}s)",
        stats.checked,
        stats.failures.len(),
        duration.as_secs_f64()
    );

    if stats.failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::new(format!(
            "{} of {} scripts failed verification",
            stats.failures.len(),
            stats.checked
        )))
    }
}
