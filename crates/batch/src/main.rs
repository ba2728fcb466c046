//! Headless batch runner: image folder in, GLB folder out.
//!
//! Configuration comes from `HY3D_*` environment variables (or a `.env`
//! file next to the binary), mirroring the host node's widgets:
//!
//! * `HY3D_SECRET_ID` / `HY3D_SECRET_KEY` — required credentials.
//! * `HY3D_INPUT_DIR` — folder scanned for images (default `input`).
//! * `HY3D_OUTPUT_DIR` — folder models land in (default `output`).
//! * `HY3D_REGION`, `HY3D_MAX_IMAGES`, `HY3D_MAX_WAIT_SECS`,
//!   `HY3D_FACE_COUNT`, `HY3D_ENABLE_PBR`, `HY3D_GENERATE_TYPE`,
//!   `HY3D_POLYGON_TYPE` — optional overrides.

use std::time::Duration;

use anyhow::Context;
use hy3d_core::credentials::{Credentials, DEFAULT_REGION};
use hy3d_core::request::{GenerateType, PolygonType};
use hy3d_node::config::validate_max_wait;
use hy3d_node::{run_batch, BatchOptions, Generator, NodeConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hy3d_batch=info,hy3d_node=info,hy3d_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (config, options) = load_from_env()?;
    let generator = Generator::new(config)?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received; finishing current item");
            signal_cancel.cancel();
        }
    });

    let summary = run_batch(&generator, &options, &cancel).await?;
    println!("{}", summary.render());

    if summary.succeeded() == 0 {
        anyhow::bail!("every batch item failed");
    }
    Ok(())
}

/// Assemble node configuration and batch options from the environment.
fn load_from_env() -> anyhow::Result<(NodeConfig, BatchOptions)> {
    let credentials = Credentials::new(
        std::env::var("HY3D_SECRET_ID").context("HY3D_SECRET_ID is not set")?,
        std::env::var("HY3D_SECRET_KEY").context("HY3D_SECRET_KEY is not set")?,
    );

    let input_dir = env_or("HY3D_INPUT_DIR", "input");
    let output_dir = env_or("HY3D_OUTPUT_DIR", "output");

    let mut config = NodeConfig::new(credentials, output_dir);
    config.region = env_or("HY3D_REGION", DEFAULT_REGION);

    if let Ok(raw) = std::env::var("HY3D_MAX_WAIT_SECS") {
        let secs: u64 = raw.parse().context("HY3D_MAX_WAIT_SECS is not a number")?;
        validate_max_wait(secs)?;
        config.poll.max_wait = Duration::from_secs(secs);
    }

    let mut options = BatchOptions::new(input_dir);
    if let Ok(raw) = std::env::var("HY3D_MAX_IMAGES") {
        options.max_images = raw.parse().context("HY3D_MAX_IMAGES is not a number")?;
    }
    if let Ok(raw) = std::env::var("HY3D_FACE_COUNT") {
        options.face_count = raw.parse().context("HY3D_FACE_COUNT is not a number")?;
    }
    if let Ok(raw) = std::env::var("HY3D_ENABLE_PBR") {
        options.enable_pbr = raw == "1" || raw.eq_ignore_ascii_case("true");
    }
    if let Ok(raw) = std::env::var("HY3D_GENERATE_TYPE") {
        options.generate_type = GenerateType::from_name(&raw)?;
    }
    if let Ok(raw) = std::env::var("HY3D_POLYGON_TYPE") {
        options.polygon_type = PolygonType::from_name(&raw)?;
    }

    Ok((config, options))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
