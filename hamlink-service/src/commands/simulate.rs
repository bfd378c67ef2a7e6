use anyhow::{Context, Result};
use bytes::Bytes;
use colored::*;
use hamlink_core::{Segment, SegmentMeta};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use tracing::{info, warn};

use crate::config::ServiceConfig;

/// Aggregate outcome of repeated offline runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub runs: usize,
    pub payload_len: usize,
    pub frames_per_run: usize,
    pub lost: usize,
    pub delivered: usize,
    pub failed: usize,
    pub with_error: usize,
    pub frames_corrupted: usize,
    pub frames_corrected: usize,
}

impl SimulationStats {
    pub fn loss_rate(&self) -> f64 {
        ratio(self.lost, self.runs)
    }

    pub fn frame_error_rate(&self) -> f64 {
        ratio(self.frames_corrupted, self.delivered * self.frames_per_run)
    }

    pub fn segment_error_rate(&self) -> f64 {
        ratio(self.with_error, self.delivered)
    }
}

fn ratio(n: usize, d: usize) -> f64 {
    if d == 0 {
        0.0
    } else {
        n as f64 / d as f64
    }
}

pub fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))
    }
}

/// Run the pipeline `runs` times over one payload without forwarding anything.
pub fn run(payload: &[u8], config: &ServiceConfig, runs: usize, progress: bool) -> Result<SimulationStats> {
    config.validate()?;
    let pipeline = config.pipeline()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let segment = Segment::new(
        SegmentMeta {
            sender: "simulate".to_string(),
            time: String::new(),
            seg_count: 1,
            seg_num: 0,
        },
        Bytes::copy_from_slice(payload),
    );

    let bar = if progress {
        let pb = ProgressBar::new(runs as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} runs")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(pb)
    } else {
        None
    };

    let mut stats = SimulationStats {
        runs,
        payload_len: payload.len(),
        ..SimulationStats::default()
    };

    for _ in 0..runs {
        match pipeline.run(&segment, &mut rng) {
            Ok(Some(report)) => {
                stats.delivered += 1;
                stats.frames_per_run = report.injection.frames;
                stats.frames_corrupted += report.injection.corrupted;
                stats.frames_corrected += report.decode.corrected;
                if report.outcome.has_error {
                    stats.with_error += 1;
                }
            }
            Ok(None) => stats.lost += 1,
            Err(e) => {
                warn!("Run failed: {}", e);
                stats.failed += 1;
            }
        }
        if let Some(pb) = &bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    Ok(stats)
}

pub fn execute(input: &str, config: &ServiceConfig, runs: usize, json: bool, progress: bool) -> Result<()> {
    let payload = read_input(input)?;
    info!(
        "Simulating {} runs over {} bytes (loss {}%, frame error {}%)",
        runs,
        payload.len(),
        config.message_loss,
        config.frame_error
    );

    let stats = run(&payload, config, runs, progress)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\n=== Simulation Results ===");
    println!("Runs:               {}", stats.runs);
    println!("Payload:            {} bytes / {} frames", stats.payload_len, stats.frames_per_run);
    println!("Lost:               {} ({:.2}%)", stats.lost, stats.loss_rate() * 100.0);
    println!("Delivered:          {}", stats.delivered);
    println!("Failed:             {}", stats.failed);
    println!(
        "Frames corrupted:   {} ({:.2}%)",
        stats.frames_corrupted,
        stats.frame_error_rate() * 100.0
    );
    println!("Frames corrected:   {}", stats.frames_corrected);

    println!("\n=== Summary ===");
    if stats.with_error == 0 {
        println!("{} Every delivered segment decoded exactly", "✓".green());
    } else {
        println!(
            "{} {} delivered segments still differ after correction ({:.2}%)",
            "✗".red(),
            stats.with_error,
            stats.segment_error_rate() * 100.0
        );
    }

    Ok(())
}
