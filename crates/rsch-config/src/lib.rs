//! Two-section INI configuration loading.
//!
//! Search order: `$CONFIG_PATH`, then `$HOME/.config/reddit-scheduler/config.ini`.
//! A missing file or a missing required key is a fatal bootstrap error — the
//! caller is expected to log it and exit non-zero.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ini::Ini;

/// `[General]` section.
#[derive(Debug, Clone)]
pub struct GeneralConfig {
    pub port: u16,
    pub post_interval: f64,
    pub dry_run: bool,
    pub debug: bool,
}

/// `[RedditAPI]` section.
#[derive(Debug, Clone)]
pub struct RedditApiConfig {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    pub reddit: RedditApiConfig,
}

/// Search path in priority order, skipping entries that have no source
/// (e.g. `$CONFIG_PATH` unset).
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(p) = std::env::var("CONFIG_PATH") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(home) = std::env::var("HOME") {
        paths.push(Path::new(&home).join(".config/reddit-scheduler/config.ini"));
    }
    paths
}

/// Load and validate the config, applying the `DEBUG`/`DRY_RUN` environment
/// overrides.
pub fn load() -> Result<Config> {
    let paths = search_paths();
    let found = paths.iter().find(|p| p.exists());
    let Some(path) = found else {
        let search = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        bail!("could not find a config file. search path is: {search}");
    };

    let ini = Ini::load_from_file(path)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;

    let general_section = ini
        .section(Some("General"))
        .with_context(|| "config file missing section: General")?;
    let reddit_section = ini
        .section(Some("RedditAPI"))
        .with_context(|| "config file missing section: RedditAPI")?;

    let port = required(general_section, "Port")?
        .parse::<u16>()
        .context("General.Port is not a valid u16")?;
    let post_interval = required(general_section, "PostInterval")?
        .parse::<f64>()
        .context("General.PostInterval is not a valid float")?;
    let mut dry_run = required(general_section, "DryRun")?
        .parse::<bool>()
        .context("General.DryRun is not a valid bool")?;
    let mut debug = general_section
        .get("Debug")
        .map(|v| v.parse::<bool>())
        .transpose()
        .context("General.Debug is not a valid bool")?
        .unwrap_or(false);

    if std::env::var("DEBUG").is_ok() {
        debug = true;
    }
    if std::env::var("DRY_RUN").is_ok() {
        dry_run = true;
    }

    let reddit = RedditApiConfig {
        username: required(reddit_section, "Username")?.to_string(),
        password: required(reddit_section, "Password")?.to_string(),
        client_id: required(reddit_section, "ClientId")?.to_string(),
        client_secret: required(reddit_section, "ClientSecret")?.to_string(),
    };

    Ok(Config {
        general: GeneralConfig {
            port,
            post_interval,
            dry_run,
            debug,
        },
        reddit,
    })
}

fn required<'a>(section: &'a ini::Properties, key: &str) -> Result<&'a str> {
    section
        .get(key)
        .with_context(|| format!("config file missing required key: {key}"))
}

/// `DB_PATH` override, defaulting to `$HOME/.config/reddit-scheduler/database.sqlite`.
pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var("DB_PATH") {
        return Ok(PathBuf::from(p));
    }
    let home = std::env::var("HOME").context("HOME is not set and DB_PATH is not overridden")?;
    Ok(Path::new(&home).join(".config/reddit-scheduler/database.sqlite"))
}
