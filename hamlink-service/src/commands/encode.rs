use anyhow::{Context, Result};
use hamlink_core::{ForwardErrorCorrection, HammingCodec};
use std::fmt::Write as _;
use std::fs;
use tracing::info;

use super::simulate::read_input;

/// One frame per line: index, codeword as 4 hex digits, 15-bit binary.
pub fn render(payload: &[u8], max_payload: usize) -> Result<String> {
    let frames = HammingCodec::new(max_payload)
        .encode(payload)
        .context("Failed to encode payload")?;

    let mut out = String::new();
    for (i, frame) in frames.iter().enumerate() {
        writeln!(
            out,
            "{:>6}  {}  {:015b}",
            i,
            hex::encode(frame.word().to_be_bytes()),
            frame.word()
        )?;
    }
    Ok(out)
}

pub fn execute(input: &str, output: Option<&str>, max_payload: usize) -> Result<()> {
    let payload = read_input(input)?;
    let listing = render(&payload, max_payload)?;

    match output {
        Some(path) => {
            fs::write(path, &listing)
                .with_context(|| format!("Failed to write output file: {}", path))?;
            info!("Wrote {} frames to {}", listing.lines().count(), path);
        }
        None => print!("{}", listing),
    }

    Ok(())
}
