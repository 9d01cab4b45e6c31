//! Terminal host configuration.
use std::env;
use std::path::PathBuf;

/// Configuration required to start a battle from the terminal.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Player archetype name, matched case-insensitively.
    pub archetype: String,
    /// Fixed battle seed; random when unset.
    pub seed: Option<u64>,
    /// Content directory, or a single `config.toml` overriding the rules.
    pub config_path: Option<PathBuf>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    /// Play without prompting: first ready attack, first offer.
    pub autoplay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            archetype: "Brawler".to_owned(),
            seed: None,
            config_path: None,
            session_id: None,
            log_dir: None,
            autoplay: false,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_ARCHETYPE` - Player archetype (default: Brawler)
    /// - `BATTLE_SEED` - Battle seed for replays (default: random)
    /// - `BATTLE_CONFIG_PATH` - Content directory or config.toml (default: embedded data)
    /// - `BATTLE_SESSION_ID` - Session identifier for log files (default: timestamp)
    /// - `BATTLE_LOG_DIR` - Log directory (default: platform cache directory)
    /// - `BATTLE_AUTOPLAY` - Play automatically (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(archetype) = lookup("BATTLE_ARCHETYPE").filter(|s| !s.trim().is_empty()) {
            config.archetype = archetype.trim().to_owned();
        }
        config.seed = lookup("BATTLE_SEED").and_then(|s| s.trim().parse().ok());
        config.config_path = lookup("BATTLE_CONFIG_PATH").map(PathBuf::from);
        config.session_id = lookup("BATTLE_SESSION_ID");
        config.log_dir = lookup("BATTLE_LOG_DIR").map(PathBuf::from);

        // Setting the variable without a value also counts as "true".
        config.autoplay = match lookup("BATTLE_AUTOPLAY") {
            Some(value) => value.trim().parse().unwrap_or(value.trim().is_empty()),
            None => false,
        };

        config
    }
}
