//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::{load_config, load_store};

pub async fn cmd_serve(
    data_dir: &Path,
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Pulse API server...");
    println!("   Data: {}", data_dir.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = load_config(config_path)?;
    let store = load_store(data_dir)?;

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    pulse_server::serve(store, config, host, port, static_dir_str).await?;

    Ok(())
}
