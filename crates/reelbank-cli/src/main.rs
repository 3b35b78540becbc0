//! Reelbank CLI — command-line client for the Reelbank video platform.
//!
//! Set REELBANK_API_TOKEN, REELBANK_WORKSPACE_ID, and REELBANK_API_URL
//! (or rely on the localhost default). Every facade operation is exposed as
//! a subcommand; responses print as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reelbank_api_client::{fs, ApiClient, NameConflict, ProjectKind};
use reelbank_cli::{frame_paths, init_tracing, parse_indexes, parse_metadata};
use serde::Serialize;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "reelbank", about = "Reelbank API CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project operations
    Project {
        #[command(subcommand)]
        sub: ProjectCommands,
    },
    /// Dataset operations
    Dataset {
        #[command(subcommand)]
        sub: DatasetCommands,
    },
    /// Video asset operations
    Video {
        #[command(subcommand)]
        sub: VideoCommands,
    },
    /// Frame download operations
    Frame {
        #[command(subcommand)]
        sub: FrameCommands,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a video collection project in the configured workspace
    Create {
        /// Project name
        name: String,
        /// Fail instead of renaming when the name is taken
        #[arg(long)]
        reject_conflict: bool,
    },
}

#[derive(Subcommand)]
enum DatasetCommands {
    /// Create a dataset under a project
    Create {
        /// Parent project UUID
        project_id: Uuid,
        /// Dataset name
        name: String,
        /// Fail instead of renaming when the name is taken
        #[arg(long)]
        reject_conflict: bool,
    },
}

#[derive(Subcommand)]
enum VideoCommands {
    /// Upload a video from a local path
    Upload {
        /// Target dataset UUID
        dataset_id: Uuid,
        /// Asset name
        name: String,
        /// Path to the video file
        path: PathBuf,
        /// Key-value metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Upload several videos in one request, named after their files
    UploadBatch {
        /// Target dataset UUID
        dataset_id: Uuid,
        /// Paths to the video files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Register previously-uploaded bytes by content hash
    UploadHash {
        /// Target dataset UUID
        dataset_id: Uuid,
        /// Asset name
        name: String,
        /// Content hash of already-uploaded bytes
        hash: String,
        /// Key-value metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Register several hashes in one request
    UploadHashBatch {
        /// Target dataset UUID
        dataset_id: Uuid,
        /// Asset names, one per hash
        #[arg(long = "name", required = true)]
        names: Vec<String>,
        /// Content hashes, one per name
        #[arg(long = "hash", required = true)]
        hashes: Vec<String>,
    },
    /// Get a video by id
    Get {
        /// Video UUID
        id: Uuid,
    },
    /// Get a video by name within a dataset
    GetByName {
        /// Dataset UUID
        dataset_id: Uuid,
        /// Asset name
        name: String,
    },
    /// List all videos in a dataset
    List {
        /// Dataset UUID
        dataset_id: Uuid,
    },
    /// Download full video bytes to a local path
    Download {
        /// Video UUID
        id: Uuid,
        /// Destination file path
        path: PathBuf,
    },
    /// Delete a video
    Delete {
        /// Video UUID
        id: Uuid,
    },
    /// Delete several videos in one request
    DeleteBatch {
        /// Video UUIDs
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
}

#[derive(Subcommand)]
enum FrameCommands {
    /// Download a single frame as a PNG file
    Download {
        /// Video UUID
        id: Uuid,
        /// Zero-based frame index
        index: u64,
        /// Destination file path
        path: PathBuf,
    },
    /// Download several frames in one request to <dir>/frame_<index>.png
    DownloadBatch {
        /// Video UUID
        id: Uuid,
        /// Comma-separated frame indexes, e.g. 5,10,20,30,45
        indexes: String,
        /// Destination directory (recreated empty first)
        dir: PathBuf,
    },
    /// Decode a frame and print its pixel dimensions
    Inspect {
        /// Video UUID
        id: Uuid,
        /// Zero-based frame index
        index: u64,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn conflict_policy(reject: bool) -> NameConflict {
    if reject {
        NameConflict::Reject
    } else {
        NameConflict::Rename
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let client = ApiClient::from_env().context(
        "Failed to create API client. Set REELBANK_API_TOKEN and REELBANK_WORKSPACE_ID",
    )?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Project { sub } => match sub {
            ProjectCommands::Create {
                name,
                reject_conflict,
            } => {
                let project = client
                    .create_project(&name, ProjectKind::Videos, conflict_policy(reject_conflict))
                    .await?;
                print_json(&project)?;
            }
        },
        Commands::Dataset { sub } => match sub {
            DatasetCommands::Create {
                project_id,
                name,
                reject_conflict,
            } => {
                let dataset = client
                    .create_dataset(project_id, &name, conflict_policy(reject_conflict))
                    .await?;
                print_json(&dataset)?;
            }
        },
        Commands::Video { sub } => run_video(&client, sub).await?,
        Commands::Frame { sub } => run_frame(&client, sub).await?,
    }

    Ok(())
}

async fn run_video(client: &ApiClient, command: VideoCommands) -> anyhow::Result<()> {
    match command {
        VideoCommands::Upload {
            dataset_id,
            name,
            path,
            metadata,
        } => {
            let metadata = parse_metadata(metadata.as_deref())?;
            let asset = client
                .upload_video_path(dataset_id, &name, &path, metadata)
                .await?;
            print_json(&asset)?;
        }
        VideoCommands::UploadBatch { dataset_id, paths } => {
            let names = paths
                .iter()
                .map(|p| fs::file_name(p))
                .collect::<Result<Vec<_>, _>>()?;
            let assets = client.upload_video_paths(dataset_id, &names, &paths).await?;
            print_json(&assets)?;
        }
        VideoCommands::UploadHash {
            dataset_id,
            name,
            hash,
            metadata,
        } => {
            let metadata = parse_metadata(metadata.as_deref())?;
            let asset = client
                .upload_video_hash(dataset_id, &name, &hash, metadata)
                .await?;
            print_json(&asset)?;
        }
        VideoCommands::UploadHashBatch {
            dataset_id,
            names,
            hashes,
        } => {
            let assets = client
                .upload_video_hashes(dataset_id, &names, &hashes, &[])
                .await?;
            print_json(&assets)?;
        }
        VideoCommands::Get { id } => {
            let asset = client.get_video_by_id(id).await?;
            print_json(&asset)?;
        }
        VideoCommands::GetByName { dataset_id, name } => {
            let asset = client.get_video_by_name(dataset_id, &name).await?;
            print_json(&asset)?;
        }
        VideoCommands::List { dataset_id } => {
            let assets = client.list_videos(dataset_id).await?;
            print_json(&assets)?;
        }
        VideoCommands::Download { id, path } => {
            client.download_video_path(id, &path).await?;
            print_json(&serde_json::json!({
                "success": true,
                "message": format!("Video {} written to {}", id, path.display()),
            }))?;
        }
        VideoCommands::Delete { id } => {
            client.remove_video(id).await?;
            print_json(&serde_json::json!({
                "success": true,
                "message": format!("Video {} deleted", id),
            }))?;
        }
        VideoCommands::DeleteBatch { ids } => {
            let report = client.remove_videos(&ids).await?;
            print_json(&report)?;
        }
    }
    Ok(())
}

async fn run_frame(client: &ApiClient, command: FrameCommands) -> anyhow::Result<()> {
    match command {
        FrameCommands::Download { id, index, path } => {
            client.download_frame_path(id, index, &path).await?;
            print_json(&serde_json::json!({
                "success": true,
                "message": format!("Frame {} written to {}", index, path.display()),
            }))?;
        }
        FrameCommands::DownloadBatch { id, indexes, dir } => {
            let indexes = parse_indexes(&indexes)?;
            fs::reset_dir(&dir).await?;
            let paths = frame_paths(&dir, &indexes);
            client.download_frame_paths(id, &indexes, &paths).await?;
            print_json(&serde_json::json!({
                "success": true,
                "written": paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
            }))?;
        }
        FrameCommands::Inspect { id, index } => {
            let pixels = client.download_frame_pixels(id, index).await?;
            print_json(&serde_json::json!({
                "index": index,
                "width": pixels.width(),
                "height": pixels.height(),
                "channels": 3,
            }))?;
        }
    }
    Ok(())
}
