//! Guided tour of the video collection API: creates a project with two
//! datasets, uploads videos by path and by content hash (singly and in
//! batch), then downloads a video and a range of its frames into a fresh
//! result directory.
//!
//! Expects Penguins.mp4, Swans.mp4, and Toucan.mp4 under the original
//! directory. Configure with REELBANK_API_TOKEN, REELBANK_WORKSPACE_ID,
//! REELBANK_API_URL, and optionally REELBANK_ORIGINAL_DIR /
//! REELBANK_RESULT_DIR (default videos/original and videos/result).

use std::path::PathBuf;

use anyhow::Context;
use reelbank_api_client::{fs, ApiClient, NameConflict, ProjectKind};
use reelbank_cli::{frame_paths, init_tracing};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let original_dir = PathBuf::from(
        std::env::var("REELBANK_ORIGINAL_DIR").unwrap_or_else(|_| "videos/original".to_string()),
    );
    let result_dir = PathBuf::from(
        std::env::var("REELBANK_RESULT_DIR").unwrap_or_else(|_| "videos/result".to_string()),
    );

    let client = ApiClient::from_env().context(
        "Failed to create API client. Set REELBANK_API_TOKEN and REELBANK_WORKSPACE_ID",
    )?;

    fs::reset_dir(&result_dir).await?;

    // Project with two sibling datasets.
    let project = client
        .create_project("Animals", ProjectKind::Videos, NameConflict::Rename)
        .await?;
    println!("Created project {} ({})", project.name, project.id);

    let dataset = client
        .create_dataset(project.id, "Birds", NameConflict::Rename)
        .await?;
    let dataset_2 = client
        .create_dataset(project.id, "Birds_2", NameConflict::Rename)
        .await?;
    println!("Created datasets {} and {}", dataset.name, dataset_2.name);

    // Upload one video with metadata and read it back.
    let meta = json!({ "my-field-1": "my-value-1", "my-field-2": "my-value-2" });
    let penguins = client
        .upload_video_path(
            dataset.id,
            "Penguins",
            original_dir.join("Penguins.mp4"),
            Some(meta),
        )
        .await?;
    let penguins = client.get_video_by_id(penguins.id).await?;
    println!("Uploaded {} (hash {})", penguins.name, penguins.hash);

    // Register the same bytes into the second dataset without retransfer.
    let penguins_2 = client
        .upload_video_hash(dataset_2.id, "Penguins_2", &penguins.hash, None)
        .await?;
    println!("Registered {} from hash", penguins_2.name);

    // Batch upload the rest of the directory in one request.
    let names: Vec<String> = ["Penguins.mp4", "Swans.mp4", "Toucan.mp4"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let paths: Vec<PathBuf> = names.iter().map(|name| original_dir.join(name)).collect();
    let uploaded = client.upload_video_paths(dataset.id, &names, &paths).await?;
    println!("Batch uploaded {} videos", uploaded.len());

    // Mirror every video of the first dataset into the second by hash,
    // carrying a name -> frame height metadata map per entry.
    let videos = client.list_videos(dataset.id).await?;
    let listed_names: Vec<String> = videos.iter().map(|v| v.name.clone()).collect();
    let hashes: Vec<String> = videos.iter().map(|v| v.hash.clone()).collect();
    let metadatas: Vec<serde_json::Value> = videos
        .iter()
        .map(|v| {
            let mut map = serde_json::Map::new();
            map.insert(v.name.clone(), json!(v.frame_height));
            serde_json::Value::Object(map)
        })
        .collect();
    let mirrored = client
        .upload_video_hashes(dataset_2.id, &listed_names, &hashes, &metadatas)
        .await?;
    println!("Mirrored {} videos into {}", mirrored.len(), dataset_2.name);

    // Download the registered copy and a selection of its frames.
    let save_path = result_dir.join(format!("{}.mp4", penguins_2.name));
    client.download_video_path(penguins_2.id, &save_path).await?;
    println!("Downloaded video to {}", save_path.display());

    client
        .download_frame_path(penguins_2.id, 15, result_dir.join("frame.png"))
        .await?;

    let frame_indexes = [5u64, 10, 20, 30, 45];
    let save_paths = frame_paths(&result_dir, &frame_indexes);
    client
        .download_frame_paths(penguins_2.id, &frame_indexes, &save_paths)
        .await?;
    println!("Downloaded {} frames to {}", save_paths.len(), result_dir.display());

    Ok(())
}
