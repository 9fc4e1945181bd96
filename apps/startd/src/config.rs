use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_START_MENU_DIR: &str = r"C:\ProgramData\Microsoft\Windows\Start Menu\Programs";
const PINNED_SUFFIX: &str = r"Microsoft\Internet Explorer\Quick Launch\User Pinned\StartMenu";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub start_menu_dir: PathBuf,
    pub pinned_dir: PathBuf,
    /// Shortcut extension without the leading dot, e.g. `lnk`.
    pub shortcut_extension: String,
    pub cell_px: f32,
    pub page_gap_px: f32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pinned_dir = match var("PINNED_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => {
                let app_data = var("APPDATA").context(
                    "Required environment variable 'APPDATA' is not set (or set PINNED_DIR)",
                )?;
                PathBuf::from(app_data).join(PINNED_SUFFIX)
            }
        };

        let shortcut_extension = var("SHORTCUT_EXTENSION")
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .unwrap_or_else(|| "lnk".to_string());
        anyhow::ensure!(
            !shortcut_extension.is_empty(),
            "SHORTCUT_EXTENSION must not be empty"
        );

        Ok(Config {
            start_menu_dir: var("START_MENU_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_START_MENU_DIR)),
            pinned_dir,
            shortcut_extension,
            cell_px: parse_or(&var, "TILE_CELL_PX", 124.0)?,
            page_gap_px: parse_or(&var, "PAGE_GAP_PX", 10.0)?,
            port: parse_or(&var, "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
