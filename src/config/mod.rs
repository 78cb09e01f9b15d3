use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::element::{clamp_font_size, DEFAULT_FONT_SIZE};
use crate::entry::{DEFAULT_MOOD_GLYPH, MAX_CANVAS_PHOTOS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "dakku";
const APP_CONFIG_FILE: &str = "config.json";

/// Host-level overrides from `config.json`. Absent fields keep the built-in
/// editor defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub default_font_size: Option<f64>,
    #[serde(default)]
    pub max_canvas_photos: Option<usize>,
    #[serde(default)]
    pub default_mood_glyph: Option<String>,
}

/// Editor defaults a session runs with, after config overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDefaults {
    pub default_font_size: f64,
    pub max_canvas_photos: usize,
    pub default_mood_glyph: String,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            default_font_size: DEFAULT_FONT_SIZE,
            max_canvas_photos: MAX_CANVAS_PHOTOS,
            default_mood_glyph: DEFAULT_MOOD_GLYPH.to_string(),
        }
    }
}

impl SessionDefaults {
    /// Overrides are sanitized here so sessions never see an out-of-range
    /// font size or an empty mood glyph.
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut defaults = Self::default();
        if let Some(size) = config.default_font_size {
            defaults.default_font_size = clamp_font_size(size);
        }
        if let Some(max) = config.max_canvas_photos {
            defaults.max_canvas_photos = max;
        }
        if let Some(glyph) = &config.default_mood_glyph {
            if !glyph.is_empty() {
                defaults.default_mood_glyph = glyph.clone();
            }
        }
        defaults
    }
}

pub fn load_editor_config() -> EditorConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_editor_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_editor_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> EditorConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return EditorConfig::default(),
    };
    if !path.exists() {
        return EditorConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            EditorConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            EditorConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
