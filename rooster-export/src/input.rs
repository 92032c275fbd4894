use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use rooster_parser::Exporter;

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_document(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read labels from stdin")?;
        return Ok(text);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Reads every input as one batch of labels and concatenates the batches in order.
pub fn read_labels(inputs: &[PathBuf]) -> Result<Vec<String>> {
    let stdin = [PathBuf::from("-")];
    let inputs = if inputs.is_empty() { &stdin[..] } else { inputs };

    let mut labels = Vec::new();
    for (idx, path) in inputs.iter().enumerate() {
        let batch = Exporter::labels_from_document(&read_document(path)?);
        info!(
            "Read {} labels from batch {}/{} ({})",
            batch.len(),
            idx + 1,
            inputs.len(),
            path.display()
        );
        labels.extend(batch);
    }

    Ok(labels)
}

pub fn write_output(output: Option<&Path>, body: &str) -> Result<()> {
    match output {
        Some(path) if !is_stdin(path) => {
            fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
        }
        _ => io::stdout()
            .lock()
            .write_all(body.as_bytes())
            .context("Failed to write to stdout"),
    }
}
