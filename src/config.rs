use std::time::Duration;
use std::{fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::app::layout::{DEFAULT_SCALE, MAX_SCALE, MIN_SCALE, SCALE_LIMIT};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_PREFS_FILE: &str = ".artpick/prefs.txt";
pub const DEFAULT_USER_AGENT: &str = "artpick/thumbs";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub prefs_path: PathBuf,
    pub user_agent: String,
    pub fetch_timeout: Option<Duration>,
    pub min_scale: u32,
    pub max_scale: u32,
    pub default_scale: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prefs_path: PathBuf::from(DEFAULT_PREFS_FILE),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout: None,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            default_scale: DEFAULT_SCALE,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    prefs_path: Option<String>,
    user_agent: Option<String>,
    fetch_timeout_secs: Option<u64>,
    min_scale: Option<u32>,
    max_scale: Option<u32>,
    default_scale: Option<u32>,
}

pub fn load_config() -> AppConfig {
    let cfg_path = PathBuf::from(CONFIG_FILE);
    match fs::read_to_string(&cfg_path) {
        Ok(raw) => {
            let cfg = parse_config(&raw);
            info!("Loaded config from {}", cfg_path.display());
            cfg
        }
        Err(_) => {
            info!("No {CONFIG_FILE} found; using defaults");
            AppConfig::default()
        }
    }
}

/// Merge a JSON document over the defaults. Malformed input yields defaults.
pub fn parse_config(raw: &str) -> AppConfig {
    let mut cfg = AppConfig::default();

    let parsed = match serde_json::from_str::<RawConfig>(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("Failed to parse {CONFIG_FILE} ({err}). Using defaults.");
            return cfg;
        }
    };

    if let Some(p) = parsed.prefs_path.filter(|p| !p.trim().is_empty()) {
        cfg.prefs_path = PathBuf::from(p);
    }
    if let Some(ua) = parsed.user_agent.filter(|s| !s.trim().is_empty()) {
        cfg.user_agent = ua;
    }
    cfg.fetch_timeout = parsed
        .fetch_timeout_secs
        .filter(|&s| s > 0)
        .map(Duration::from_secs);
    if let Some(n) = parsed.min_scale {
        cfg.min_scale = n.max(1);
    }
    if let Some(n) = parsed.max_scale {
        cfg.max_scale = n;
    }
    if cfg.max_scale > SCALE_LIMIT || cfg.min_scale > SCALE_LIMIT {
        warn!("scale bounds above {SCALE_LIMIT}; capping.");
        cfg.min_scale = cfg.min_scale.min(SCALE_LIMIT);
        cfg.max_scale = cfg.max_scale.min(SCALE_LIMIT);
    }
    if cfg.max_scale < cfg.min_scale {
        warn!(
            "max_scale {} below min_scale {}; using min_scale for both.",
            cfg.max_scale, cfg.min_scale
        );
        cfg.max_scale = cfg.min_scale;
    }
    if let Some(n) = parsed.default_scale {
        cfg.default_scale = n;
    }
    cfg.default_scale = cfg.default_scale.clamp(cfg.min_scale, cfg.max_scale);

    cfg
}
