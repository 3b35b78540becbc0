//! Data models for the remote media platform
//!
//! These mirror the JSON shapes the platform returns. Projects and datasets
//! are created once and never mutated; video assets are created by upload,
//! read by get/list/download, and destroyed individually or in batch. Frames
//! are not modelled as persisted entities: a frame is addressed by
//! `(video id, frame index)` and materialized on demand.

mod dataset;
mod project;
mod video;

pub use dataset::*;
pub use project::*;
pub use video::*;
