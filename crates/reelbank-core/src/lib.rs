//! Reelbank Core Library
//!
//! This crate provides the domain models, error taxonomy, client configuration,
//! and input validation shared by the Reelbank client and CLI crates.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::{
    Dataset, FramePayload, NameConflict, Project, ProjectKind, RemoveReport, VideoAsset,
};
