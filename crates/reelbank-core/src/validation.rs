//! Input validation
//!
//! Checks performed client-side before a request is built, so obviously bad
//! calls fail without a round trip.

use crate::error::{Error, Result};

pub const MAX_NAME_LENGTH: usize = 255;

/// Asset, dataset, and project names must be non-blank and within the
/// platform's length limit.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("Name must not be empty".to_string()));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(Error::InvalidInput(format!(
            "Name exceeds {} characters: {}",
            MAX_NAME_LENGTH, name
        )));
    }
    Ok(())
}

/// Batch calls pair parallel slices one-to-one; reject length mismatches
/// before anything is sent.
pub fn validate_parallel_lens(left: usize, right: usize, what: &str) -> Result<()> {
    if left != right {
        return Err(Error::InvalidInput(format!(
            "Mismatched batch lengths for {}: {} vs {}",
            what, left, right
        )));
    }
    Ok(())
}
