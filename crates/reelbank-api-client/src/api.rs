//! Domain methods for the Reelbank API client.
//!
//! Response types live in `reelbank_core::models`. Control flow is strictly
//! sequential: each method awaits one request and returns. The `*_batch`
//! style methods (`upload_video_paths`, `upload_video_hashes`,
//! `download_frame_paths`, `download_frames_pixels`, `remove_videos`) send a
//! single request covering all items.
//!
//! Contracts the server side is held to:
//! - path and hash batch uploads are atomic: the server applies all entries
//!   or rejects the whole batch naming the failing entry;
//! - `remove_videos` continues past missing ids and reports them;
//! - `list_videos` returns insertion order, stable across calls within a
//!   session.

use std::path::Path;

use base64::Engine as _;
use image::RgbImage;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::{api_prefix, fs, ApiClient};
use reelbank_core::validation::{validate_name, validate_parallel_lens};
use reelbank_core::{
    Dataset, Error, FramePayload, NameConflict, Project, ProjectKind, RemoveReport, Result,
    VideoAsset,
};

impl ApiClient {
    /// Create a project in the configured workspace.
    ///
    /// Under `NameConflict::Rename` the server disambiguates a colliding
    /// name with a suffix; under `Reject` the call fails with
    /// `Error::Conflict`.
    pub async fn create_project(
        &self,
        name: &str,
        kind: ProjectKind,
        on_conflict: NameConflict,
    ) -> Result<Project> {
        validate_name(name)?;
        tracing::debug!(name, %kind, "creating project");

        let body = serde_json::json!({
            "workspace_id": self.workspace_id(),
            "name": name,
            "kind": kind,
        });
        self.post_json(
            &format!("{}/projects", api_prefix()),
            &[("on_conflict", on_conflict.to_string())],
            &body,
        )
        .await
    }

    /// Create a dataset under a project. Same conflict policy semantics as
    /// [`create_project`](Self::create_project).
    pub async fn create_dataset(
        &self,
        project_id: Uuid,
        name: &str,
        on_conflict: NameConflict,
    ) -> Result<Dataset> {
        validate_name(name)?;
        tracing::debug!(%project_id, name, "creating dataset");

        let body = serde_json::json!({ "name": name });
        self.post_json(
            &format!("{}/projects/{}/datasets", api_prefix(), project_id),
            &[("on_conflict", on_conflict.to_string())],
            &body,
        )
        .await
    }

    /// Upload a video from a local file path, with optional key-value
    /// metadata. Fails with `Error::NotFound` when the path does not exist,
    /// before anything is sent.
    pub async fn upload_video_path(
        &self,
        dataset_id: Uuid,
        name: &str,
        path: impl AsRef<Path>,
        metadata: Option<JsonValue>,
    ) -> Result<VideoAsset> {
        validate_name(name)?;
        let path = path.as_ref();
        tracing::debug!(%dataset_id, name, path = %path.display(), "uploading video by path");

        let buffer = fs::read_file(path).await?;
        let filename = fs::file_name(path)?;

        let mut form = reqwest::multipart::Form::new()
            .text("name", name.to_string())
            .part(
                "file",
                reqwest::multipart::Part::bytes(buffer).file_name(filename),
            );
        if let Some(metadata) = metadata {
            form = form.text("metadata", metadata.to_string());
        }

        self.post_multipart(
            &format!("{}/datasets/{}/videos", api_prefix(), dataset_id),
            form,
        )
        .await
    }

    /// Upload several videos in one multipart request. `names` and `paths`
    /// pair one-to-one; the result preserves input order. The batch is
    /// atomic: the server applies all entries or rejects the batch.
    pub async fn upload_video_paths(
        &self,
        dataset_id: Uuid,
        names: &[String],
        paths: &[impl AsRef<Path>],
    ) -> Result<Vec<VideoAsset>> {
        validate_parallel_lens(names.len(), paths.len(), "names/paths")?;
        for name in names {
            validate_name(name)?;
        }
        tracing::debug!(%dataset_id, count = names.len(), "uploading video batch by path");

        let mut form = reqwest::multipart::Form::new()
            .text("names", serde_json::to_string(names)?);
        for (name, path) in names.iter().zip(paths) {
            let buffer = fs::read_file(path.as_ref()).await?;
            form = form.part(
                "file",
                reqwest::multipart::Part::bytes(buffer).file_name(name.clone()),
            );
        }

        self.post_multipart(
            &format!("{}/datasets/{}/videos/batch", api_prefix(), dataset_id),
            form,
        )
        .await
    }

    /// Register previously-uploaded bytes into a dataset by content hash,
    /// without retransmission. Fails with `Error::NotFound` when the hash is
    /// unknown to the platform.
    pub async fn upload_video_hash(
        &self,
        dataset_id: Uuid,
        name: &str,
        hash: &str,
        metadata: Option<JsonValue>,
    ) -> Result<VideoAsset> {
        validate_name(name)?;
        tracing::debug!(%dataset_id, name, hash, "uploading video by hash");

        let mut body = serde_json::json!({ "name": name, "hash": hash });
        if let Some(metadata) = metadata {
            body["metadata"] = metadata;
        }
        self.post_json(
            &format!("{}/datasets/{}/videos/by-hash", api_prefix(), dataset_id),
            &[],
            &body,
        )
        .await
    }

    /// Batched hash registration: one JSON request for all entries. Pass an
    /// empty `metadatas` slice to attach no metadata; otherwise it pairs
    /// one-to-one with `names` and `hashes`. Atomic like
    /// [`upload_video_paths`](Self::upload_video_paths).
    pub async fn upload_video_hashes(
        &self,
        dataset_id: Uuid,
        names: &[String],
        hashes: &[String],
        metadatas: &[JsonValue],
    ) -> Result<Vec<VideoAsset>> {
        validate_parallel_lens(names.len(), hashes.len(), "names/hashes")?;
        if !metadatas.is_empty() {
            validate_parallel_lens(names.len(), metadatas.len(), "names/metadatas")?;
        }
        for name in names {
            validate_name(name)?;
        }
        tracing::debug!(%dataset_id, count = names.len(), "uploading video batch by hash");

        let items: Vec<JsonValue> = names
            .iter()
            .zip(hashes)
            .enumerate()
            .map(|(i, (name, hash))| {
                let mut item = serde_json::json!({ "name": name, "hash": hash });
                if let Some(metadata) = metadatas.get(i) {
                    item["metadata"] = metadata.clone();
                }
                item
            })
            .collect();

        self.post_json(
            &format!(
                "{}/datasets/{}/videos/by-hash/batch",
                api_prefix(),
                dataset_id
            ),
            &[],
            &serde_json::json!({ "items": items }),
        )
        .await
    }

    /// Fetch a video's metadata by id.
    pub async fn get_video_by_id(&self, id: Uuid) -> Result<VideoAsset> {
        self.get(&format!("{}/videos/{}", api_prefix(), id), &[])
            .await
    }

    /// Fetch a video's metadata by name within a dataset.
    pub async fn get_video_by_name(&self, dataset_id: Uuid, name: &str) -> Result<VideoAsset> {
        validate_name(name)?;
        let videos: Vec<VideoAsset> = self
            .get(
                &format!("{}/datasets/{}/videos", api_prefix(), dataset_id),
                &[("name", name.to_string())],
            )
            .await?;
        videos.into_iter().next().ok_or_else(|| {
            Error::NotFound(format!(
                "No video named {} in dataset {}",
                name, dataset_id
            ))
        })
    }

    /// List all videos in a dataset, in the server's insertion order.
    pub async fn list_videos(&self, dataset_id: Uuid) -> Result<Vec<VideoAsset>> {
        self.get(
            &format!("{}/datasets/{}/videos", api_prefix(), dataset_id),
            &[],
        )
        .await
    }

    /// Download the full video bytes to a local path, overwriting any
    /// existing file and creating parent directories.
    pub async fn download_video_path(&self, id: Uuid, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(%id, path = %path.display(), "downloading video");

        let bytes = self
            .get_bytes(&format!("{}/videos/{}/download", api_prefix(), id))
            .await?;
        fs::write_bytes(path, &bytes).await
    }

    /// Download a single decoded frame as a PNG file. Fails with
    /// `Error::FrameOutOfRange` when `frame_index` is at or beyond the
    /// asset's frame count.
    pub async fn download_frame_path(
        &self,
        id: Uuid,
        frame_index: u64,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(%id, frame_index, path = %path.display(), "downloading frame");

        let bytes = self
            .get_bytes(&format!(
                "{}/videos/{}/frames/{}",
                api_prefix(),
                id,
                frame_index
            ))
            .await?;
        fs::write_bytes(path, &bytes).await
    }

    /// Download several frames in one request, writing each to the
    /// corresponding path. `frame_indexes` and `paths` pair one-to-one.
    pub async fn download_frame_paths(
        &self,
        id: Uuid,
        frame_indexes: &[u64],
        paths: &[impl AsRef<Path>],
    ) -> Result<()> {
        validate_parallel_lens(frame_indexes.len(), paths.len(), "frame_indexes/paths")?;

        let frames = self.fetch_frames(id, frame_indexes).await?;
        for (bytes, path) in frames.iter().zip(paths) {
            fs::write_bytes(path.as_ref(), bytes).await?;
        }
        Ok(())
    }

    /// Download a single frame decoded into an RGB pixel buffer
    /// (height x width x 3).
    pub async fn download_frame_pixels(&self, id: Uuid, frame_index: u64) -> Result<RgbImage> {
        let bytes = self
            .get_bytes(&format!(
                "{}/videos/{}/frames/{}",
                api_prefix(),
                id,
                frame_index
            ))
            .await?;
        decode_rgb(&bytes)
    }

    /// Download several frames in one request, decoded into RGB pixel
    /// buffers in the order requested.
    pub async fn download_frames_pixels(
        &self,
        id: Uuid,
        frame_indexes: &[u64],
    ) -> Result<Vec<RgbImage>> {
        let frames = self.fetch_frames(id, frame_indexes).await?;
        frames.iter().map(|bytes| decode_rgb(bytes)).collect()
    }

    /// Delete a single video.
    pub async fn remove_video(&self, id: Uuid) -> Result<()> {
        tracing::debug!(%id, "removing video");
        self.delete(&format!("{}/videos/{}", api_prefix(), id)).await
    }

    /// Delete several videos in one request. Missing ids do not abort the
    /// batch; they come back in the report's `missing` list.
    pub async fn remove_videos(&self, ids: &[Uuid]) -> Result<RemoveReport> {
        tracing::debug!(count = ids.len(), "removing video batch");

        let report: RemoveReport = self
            .post_json(
                &format!("{}/videos/delete", api_prefix()),
                &[],
                &serde_json::json!({ "ids": ids }),
            )
            .await?;
        if !report.all_removed() {
            tracing::warn!(missing = ?report.missing, "batch delete skipped missing ids");
        }
        Ok(report)
    }

    /// One round trip for a set of frames: the server returns base64 PNG
    /// payloads tagged with their indexes, which are checked against the
    /// request before the bytes are handed back in request order.
    async fn fetch_frames(&self, id: Uuid, frame_indexes: &[u64]) -> Result<Vec<Vec<u8>>> {
        tracing::debug!(%id, count = frame_indexes.len(), "downloading frame batch");

        let payloads: Vec<FramePayload> = self
            .post_json(
                &format!("{}/videos/{}/frames/batch", api_prefix(), id),
                &[],
                &serde_json::json!({ "indexes": frame_indexes }),
            )
            .await?;

        if payloads.len() != frame_indexes.len() {
            return Err(Error::Decode(format!(
                "Frame batch returned {} payloads for {} requested indexes",
                payloads.len(),
                frame_indexes.len()
            )));
        }

        frame_indexes
            .iter()
            .zip(payloads)
            .map(|(requested, payload)| {
                if payload.index != *requested {
                    return Err(Error::Decode(format!(
                        "Frame batch out of order: expected index {}, got {}",
                        requested, payload.index
                    )));
                }
                base64::engine::general_purpose::STANDARD
                    .decode(&payload.image_base64)
                    .map_err(|e| Error::Decode(format!("Invalid frame payload: {}", e)))
            })
            .collect()
    }
}

fn decode_rgb(bytes: &[u8]) -> Result<RgbImage> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| Error::Decode(format!("Failed to decode frame image: {}", e)))?;
    Ok(decoded.to_rgb8())
}
