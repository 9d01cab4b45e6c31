//! Terminal battle client.
//!
//! Composition root: reads configuration from the environment (`.env`
//! supported), sets up file logging, loads content, starts a battle on the
//! runtime and plays it from the terminal.
//!
//! # Examples
//!
//! ```bash
//! # Interactive run as an Arcanist
//! BATTLE_ARCHETYPE=arcanist cargo run -p battle-cli
//!
//! # Replay a seed without prompts
//! BATTLE_SEED=42 BATTLE_AUTOPLAY=true cargo run -p battle-cli
//! ```
mod config;
mod content;
mod logging;
mod play;
mod render;

use anyhow::Result;
use battle_runtime::{BattleRuntime, TracingSink};

use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _log_guard =
        logging::setup_logging(config.session_id.as_deref(), config.log_dir.as_deref())?;
    tracing::info!(?config, "Starting battle client");

    let content = content::load_content(config.config_path.as_deref())?;
    let archetype = content.player_archetype(&config.archetype);

    let mut builder = BattleRuntime::builder()
        .content(content)
        .player_archetype(archetype.clone())
        .presentation(TracingSink);
    if let Some(seed) = config.seed {
        builder = builder.seed(seed);
    }
    let runtime = builder.build().await?;

    println!("Playing as {archetype} (seed {}).", runtime.seed());
    for line in runtime
        .opening_report()
        .events
        .iter()
        .filter_map(render::describe)
    {
        println!("  {line}");
    }

    let handle = runtime.handle();
    play::play(&handle, config.autoplay).await?;
    drop(handle);

    runtime.shutdown().await?;
    tracing::info!("Client shutdown complete");
    Ok(())
}
