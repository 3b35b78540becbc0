use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value as JsonValue;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Parse an optional `--metadata` argument as a JSON object.
pub fn parse_metadata(raw: Option<&str>) -> anyhow::Result<Option<JsonValue>> {
    match raw {
        None => Ok(None),
        Some(raw) => {
            let value: JsonValue =
                serde_json::from_str(raw).context("Metadata must be valid JSON")?;
            if !value.is_object() {
                anyhow::bail!("Metadata must be a JSON object, got: {}", raw);
            }
            Ok(Some(value))
        }
    }
}

/// Parse a comma-separated frame index list, e.g. "5,10,20,30,45".
pub fn parse_indexes(raw: &str) -> anyhow::Result<Vec<u64>> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse()
                .with_context(|| format!("Invalid frame index: {}", part))
        })
        .collect()
}

/// Output paths for a batch of frames: `<dir>/frame_<index>.png`.
pub fn frame_paths(dir: &Path, indexes: &[u64]) -> Vec<PathBuf> {
    indexes
        .iter()
        .map(|index| dir.join(format!("frame_{}.png", index)))
        .collect()
}
