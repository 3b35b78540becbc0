//! In-process mock of the remote media platform.
//!
//! Serves the subset of the Reelbank API the client exercises, backed by an
//! in-memory store. Frames are synthesized deterministically from the frame
//! index so pixel-level assertions are possible. Request counters let tests
//! verify that batch operations really are a single round trip.

// Shared by several test targets; not every target uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine as _;
use chrono::Utc;
use image::RgbImage;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use reelbank_api_client::{ApiClient, ClientConfig};

pub const FRAME_WIDTH: u32 = 32;
pub const FRAME_HEIGHT: u32 = 18;
pub const FRAME_COUNT: u64 = 60;

#[derive(Clone)]
pub struct StoredVideo {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub name: String,
    pub hash: String,
    pub metadata: JsonValue,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct Counters {
    pub multipart_uploads: usize,
    pub frame_batch_requests: usize,
    pub hash_batch_requests: usize,
}

#[derive(Default)]
struct Inner {
    project_names: Vec<String>,
    dataset_names: HashMap<Uuid, Vec<String>>,
    videos: Vec<StoredVideo>,
    counters: Counters,
}

#[derive(Clone, Default)]
pub struct Platform(Arc<Mutex<Inner>>);

/// Running mock server plus a client pointed at it.
pub struct TestPlatform {
    pub client: ApiClient,
    platform: Platform,
}

impl TestPlatform {
    pub fn counters(&self) -> Counters {
        let inner = self.platform.0.lock().unwrap();
        Counters {
            multipart_uploads: inner.counters.multipart_uploads,
            frame_batch_requests: inner.counters.frame_batch_requests,
            hash_batch_requests: inner.counters.hash_batch_requests,
        }
    }

    pub fn stored_bytes(&self, id: Uuid) -> Option<Vec<u8>> {
        let inner = self.platform.0.lock().unwrap();
        inner
            .videos
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.bytes.clone())
    }
}

/// Start the mock platform on an ephemeral port and return a client for it.
pub async fn setup() -> TestPlatform {
    let platform = Platform::default();
    let app = router(platform.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock server");
    });

    let config = ClientConfig::new(format!("http://{}", addr), "test-token", 100);
    let client = ApiClient::new(config).expect("build client");
    TestPlatform { client, platform }
}

/// Deterministic PNG for a frame index, so tests can compare pixels.
pub fn frame_png(index: u64) -> Vec<u8> {
    let img = frame_image(index);
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .expect("encode frame png");
    png
}

pub fn frame_image(index: u64) -> RgbImage {
    RgbImage::from_fn(FRAME_WIDTH, FRAME_HEIGHT, |x, y| {
        image::Rgb([
            (index as u32 % 256) as u8,
            (x % 256) as u8,
            (y % 256) as u8,
        ])
    })
}

/// Toy content digest: stable for identical bytes, distinct enough for tests.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut acc: u64 = 1469598103934665603;
    for b in bytes {
        acc ^= *b as u64;
        acc = acc.wrapping_mul(1099511628211);
    }
    format!("fnv1a:{:016x}", acc)
}

fn router(platform: Platform) -> Router {
    Router::new()
        .route("/api/v1/projects", post(create_project))
        .route("/api/v1/projects/{id}/datasets", post(create_dataset))
        .route("/api/v1/datasets/{id}/videos", post(upload_videos).get(list_videos))
        .route("/api/v1/datasets/{id}/videos/batch", post(upload_videos_batch))
        .route("/api/v1/datasets/{id}/videos/by-hash", post(upload_hash))
        .route(
            "/api/v1/datasets/{id}/videos/by-hash/batch",
            post(upload_hashes_batch),
        )
        .route("/api/v1/videos/{id}", get(get_video).delete(delete_video))
        .route("/api/v1/videos/{id}/download", get(download_video))
        .route("/api/v1/videos/{id}/frames/{index}", get(download_frame))
        .route("/api/v1/videos/{id}/frames/batch", post(download_frames_batch))
        .route("/api/v1/videos/delete", post(delete_videos_batch))
        .with_state(platform)
}

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    (status, Json(json!({ "code": code, "message": message }))).into_response()
}

fn not_found(message: String) -> Response {
    error_response(StatusCode::NOT_FOUND, "NOT_FOUND", message)
}

/// Apply the on_conflict policy to a requested name against taken names.
fn resolve_name(
    requested: &str,
    taken: &[String],
    params: &HashMap<String, String>,
) -> Result<String, Response> {
    if !taken.iter().any(|n| n == requested) {
        return Ok(requested.to_string());
    }
    match params.get("on_conflict").map(String::as_str) {
        Some("rename") => {
            let mut suffix = 2;
            loop {
                let candidate = format!("{}_{}", requested, suffix);
                if !taken.iter().any(|n| n == &candidate) {
                    return Ok(candidate);
                }
                suffix += 1;
            }
        }
        _ => Err(error_response(
            StatusCode::CONFLICT,
            "NAME_CONFLICT",
            format!("Name already exists: {}", requested),
        )),
    }
}

fn video_json(video: &StoredVideo) -> JsonValue {
    json!({
        "id": video.id,
        "dataset_id": video.dataset_id,
        "name": video.name,
        "hash": video.hash,
        "file_size": video.bytes.len(),
        "frame_count": FRAME_COUNT,
        "frame_width": FRAME_WIDTH,
        "frame_height": FRAME_HEIGHT,
        "duration": FRAME_COUNT as f64 / 30.0,
        "metadata": video.metadata,
        "uploaded_at": Utc::now(),
    })
}

async fn create_project(
    State(platform): State<Platform>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<JsonValue>,
) -> Response {
    let mut inner = platform.0.lock().unwrap();
    let requested = body["name"].as_str().unwrap_or_default().to_string();
    let name = match resolve_name(&requested, &inner.project_names, &params) {
        Ok(name) => name,
        Err(resp) => return resp,
    };
    inner.project_names.push(name.clone());
    Json(json!({
        "id": Uuid::new_v4(),
        "workspace_id": body["workspace_id"],
        "name": name,
        "kind": body["kind"],
        "created_at": Utc::now(),
    }))
    .into_response()
}

async fn create_dataset(
    State(platform): State<Platform>,
    Path(project_id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<JsonValue>,
) -> Response {
    let mut inner = platform.0.lock().unwrap();
    let requested = body["name"].as_str().unwrap_or_default().to_string();
    let taken = inner
        .dataset_names
        .get(&project_id)
        .cloned()
        .unwrap_or_default();
    let name = match resolve_name(&requested, &taken, &params) {
        Ok(name) => name,
        Err(resp) => return resp,
    };
    inner
        .dataset_names
        .entry(project_id)
        .or_default()
        .push(name.clone());
    Json(json!({
        "id": Uuid::new_v4(),
        "project_id": project_id,
        "name": name,
        "created_at": Utc::now(),
    }))
    .into_response()
}

async fn upload_videos(
    State(platform): State<Platform>,
    Path(dataset_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Response {
    let mut name = String::new();
    let mut metadata = JsonValue::Null;
    let mut bytes = Vec::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = field.text().await.unwrap(),
            "metadata" => {
                metadata = serde_json::from_str(&field.text().await.unwrap()).unwrap()
            }
            "file" => bytes = field.bytes().await.unwrap().to_vec(),
            _ => {}
        }
    }

    let mut inner = platform.0.lock().unwrap();
    inner.counters.multipart_uploads += 1;
    let video = StoredVideo {
        id: Uuid::new_v4(),
        dataset_id,
        name,
        hash: content_hash(&bytes),
        metadata,
        bytes,
    };
    let response = video_json(&video);
    inner.videos.push(video);
    Json(response).into_response()
}

async fn upload_videos_batch(
    State(platform): State<Platform>,
    Path(dataset_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Response {
    let mut names: Vec<String> = Vec::new();
    let mut files: Vec<Vec<u8>> = Vec::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "names" => names = serde_json::from_str(&field.text().await.unwrap()).unwrap(),
            "file" => files.push(field.bytes().await.unwrap().to_vec()),
            _ => {}
        }
    }

    if names.len() != files.len() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_INPUT",
            format!("{} names for {} files", names.len(), files.len()),
        );
    }

    let mut inner = platform.0.lock().unwrap();
    inner.counters.multipart_uploads += 1;
    let mut response = Vec::new();
    for (name, bytes) in names.into_iter().zip(files) {
        let video = StoredVideo {
            id: Uuid::new_v4(),
            dataset_id,
            name,
            hash: content_hash(&bytes),
            metadata: JsonValue::Null,
            bytes,
        };
        response.push(video_json(&video));
        inner.videos.push(video);
    }
    Json(response).into_response()
}

fn register_hash(
    inner: &mut Inner,
    dataset_id: Uuid,
    name: &str,
    hash: &str,
    metadata: JsonValue,
) -> Result<JsonValue, Response> {
    let bytes = inner
        .videos
        .iter()
        .find(|v| v.hash == hash)
        .map(|v| v.bytes.clone())
        .ok_or_else(|| not_found(format!("Unknown content hash: {}", hash)))?;
    let video = StoredVideo {
        id: Uuid::new_v4(),
        dataset_id,
        name: name.to_string(),
        hash: hash.to_string(),
        metadata,
        bytes,
    };
    let response = video_json(&video);
    inner.videos.push(video);
    Ok(response)
}

async fn upload_hash(
    State(platform): State<Platform>,
    Path(dataset_id): Path<Uuid>,
    Json(body): Json<JsonValue>,
) -> Response {
    let mut inner = platform.0.lock().unwrap();
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let hash = body["hash"].as_str().unwrap_or_default().to_string();
    let metadata = body.get("metadata").cloned().unwrap_or(JsonValue::Null);
    match register_hash(&mut inner, dataset_id, &name, &hash, metadata) {
        Ok(video) => Json(video).into_response(),
        Err(resp) => resp,
    }
}

async fn upload_hashes_batch(
    State(platform): State<Platform>,
    Path(dataset_id): Path<Uuid>,
    Json(body): Json<JsonValue>,
) -> Response {
    let mut inner = platform.0.lock().unwrap();
    inner.counters.hash_batch_requests += 1;

    let items = body["items"].as_array().cloned().unwrap_or_default();
    // Atomic: validate every hash before registering any entry.
    for item in &items {
        let hash = item["hash"].as_str().unwrap_or_default();
        if !inner.videos.iter().any(|v| v.hash == hash) {
            return not_found(format!("Unknown content hash: {}", hash));
        }
    }

    let mut response = Vec::new();
    for item in items {
        let name = item["name"].as_str().unwrap_or_default().to_string();
        let hash = item["hash"].as_str().unwrap_or_default().to_string();
        let metadata = item.get("metadata").cloned().unwrap_or(JsonValue::Null);
        match register_hash(&mut inner, dataset_id, &name, &hash, metadata) {
            Ok(video) => response.push(video),
            Err(resp) => return resp,
        }
    }
    Json(response).into_response()
}

async fn get_video(State(platform): State<Platform>, Path(id): Path<Uuid>) -> Response {
    let inner = platform.0.lock().unwrap();
    match inner.videos.iter().find(|v| v.id == id) {
        Some(video) => Json(video_json(video)).into_response(),
        None => not_found(format!("No video with id {}", id)),
    }
}

async fn list_videos(
    State(platform): State<Platform>,
    Path(dataset_id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let inner = platform.0.lock().unwrap();
    let name_filter = params.get("name");
    let videos: Vec<JsonValue> = inner
        .videos
        .iter()
        .filter(|v| v.dataset_id == dataset_id)
        .filter(|v| name_filter.map_or(true, |n| &v.name == n))
        .map(video_json)
        .collect();
    Json(videos).into_response()
}

async fn download_video(State(platform): State<Platform>, Path(id): Path<Uuid>) -> Response {
    let inner = platform.0.lock().unwrap();
    match inner.videos.iter().find(|v| v.id == id) {
        Some(video) => video.bytes.clone().into_response(),
        None => not_found(format!("No video with id {}", id)),
    }
}

async fn download_frame(
    State(platform): State<Platform>,
    Path((id, index)): Path<(Uuid, u64)>,
) -> Response {
    let inner = platform.0.lock().unwrap();
    if !inner.videos.iter().any(|v| v.id == id) {
        return not_found(format!("No video with id {}", id));
    }
    if index >= FRAME_COUNT {
        return error_response(
            StatusCode::RANGE_NOT_SATISFIABLE,
            "FRAME_OUT_OF_RANGE",
            format!("Frame {} out of range 0..{}", index, FRAME_COUNT),
        );
    }
    frame_png(index).into_response()
}

async fn download_frames_batch(
    State(platform): State<Platform>,
    Path(id): Path<Uuid>,
    Json(body): Json<JsonValue>,
) -> Response {
    let mut inner = platform.0.lock().unwrap();
    inner.counters.frame_batch_requests += 1;

    if !inner.videos.iter().any(|v| v.id == id) {
        return not_found(format!("No video with id {}", id));
    }
    let indexes: Vec<u64> = body["indexes"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|v| v.as_u64())
        .collect();
    if let Some(bad) = indexes.iter().find(|i| **i >= FRAME_COUNT) {
        return error_response(
            StatusCode::RANGE_NOT_SATISFIABLE,
            "FRAME_OUT_OF_RANGE",
            format!("Frame {} out of range 0..{}", bad, FRAME_COUNT),
        );
    }

    let payloads: Vec<JsonValue> = indexes
        .iter()
        .map(|index| {
            json!({
                "index": index,
                "image_base64":
                    base64::engine::general_purpose::STANDARD.encode(frame_png(*index)),
            })
        })
        .collect();
    Json(payloads).into_response()
}

async fn delete_video(State(platform): State<Platform>, Path(id): Path<Uuid>) -> Response {
    let mut inner = platform.0.lock().unwrap();
    let before = inner.videos.len();
    inner.videos.retain(|v| v.id != id);
    if inner.videos.len() == before {
        return not_found(format!("No video with id {}", id));
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_videos_batch(
    State(platform): State<Platform>,
    Json(body): Json<JsonValue>,
) -> Response {
    let mut inner = platform.0.lock().unwrap();
    let ids: Vec<Uuid> = body["ids"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|v| v.as_str().and_then(|s| s.parse().ok()))
        .collect();

    let mut removed = Vec::new();
    let mut missing = Vec::new();
    for id in ids {
        let before = inner.videos.len();
        inner.videos.retain(|v| v.id != id);
        if inner.videos.len() < before {
            removed.push(id);
        } else {
            missing.push(id);
        }
    }
    Json(json!({ "removed": removed, "missing": missing })).into_response()
}
