//! Application settings management
//!
//! This module provides settings persistence, loading, and updating.
//! Settings live in `settings.json` under the app data directory.

use crate::{Result, StoreError};
use edit_engine::{FindReplaceOptions, KeyChord};
use render_model::HighlightClasses;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Find and replace settings
    pub find_replace: FindReplaceSettings,
}

/// Find and replace settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FindReplaceSettings {
    /// Key chord that opens the panel, e.g. `Mod-f`
    pub open_panel_shortcut: String,
    /// Whether closing the panel drops the query and matches
    pub clear_on_close: bool,
    /// Delay between selecting a match and scrolling it into view
    pub scroll_delay_ms: u64,
    /// Class on every highlighted match
    pub highlight_class: String,
    /// Appended to `highlight_class` for the active match
    pub active_highlight_suffix: String,
}

impl Default for FindReplaceSettings {
    fn default() -> Self {
        Self {
            open_panel_shortcut: "Mod-f".to_string(),
            clear_on_close: true,
            scroll_delay_ms: 100,
            highlight_class: render_model::DEFAULT_HIGHLIGHT_CLASS.to_string(),
            active_highlight_suffix: render_model::DEFAULT_ACTIVE_SUFFIX.to_string(),
        }
    }
}

impl FindReplaceSettings {
    /// Command options. An unparseable shortcut falls back to `Mod-f`.
    pub fn options(&self) -> FindReplaceOptions {
        let open_shortcut = match KeyChord::parse(&self.open_panel_shortcut) {
            Ok(chord) => chord,
            Err(e) => {
                tracing::warn!(
                    shortcut = %self.open_panel_shortcut,
                    "Invalid shortcut, using default: {}",
                    e
                );
                KeyChord::default()
            }
        };
        FindReplaceOptions {
            clear_on_close: self.clear_on_close,
            open_shortcut,
        }
    }

    /// Reject settings that would only fall back to defaults at runtime
    pub fn validate(&self) -> Result<()> {
        KeyChord::parse(&self.open_panel_shortcut)?;
        if self.highlight_class.trim().is_empty() {
            return Err(StoreError::InvalidFormat(
                "highlight_class must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn highlight_classes(&self) -> HighlightClasses {
        HighlightClasses::new(self.highlight_class.clone(), &self.active_highlight_suffix)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }
}

/// Settings manager for loading, saving, and updating application settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: AppSettings,
}

impl SettingsManager {
    /// Create a new settings manager with the given app data directory
    pub fn new(app_data_dir: PathBuf) -> Self {
        let settings_path = app_data_dir.join("settings.json");
        Self {
            settings_path,
            current: AppSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }

    fn apply_loaded(&mut self, content: &str) {
        match serde_json::from_str::<AppSettings>(content) {
            Ok(settings) => {
                self.current = settings;
            }
            Err(e) => {
                // Log the error but use defaults
                tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                self.current = AppSettings::default();
            }
        }
    }

    /// Load settings from disk, or return defaults if file doesn't exist
    pub async fn load(&mut self) -> Result<&AppSettings> {
        if self.settings_path.exists() {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            self.apply_loaded(&content);
        } else {
            self.current = AppSettings::default();
        }
        Ok(&self.current)
    }

    /// Load settings synchronously (for use during app startup)
    pub fn load_sync(&mut self) -> Result<&AppSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            self.apply_loaded(&content);
        } else {
            self.current = AppSettings::default();
        }
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub async fn save(&self) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    /// Save settings synchronously
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &AppSettings {
        &self.current
    }

    /// Validate, then update and save to disk
    pub async fn update(&mut self, settings: AppSettings) -> Result<()> {
        settings.find_replace.validate()?;
        self.current = settings;
        self.save().await
    }

    /// Validate, then update and save synchronously
    pub fn update_sync(&mut self, settings: AppSettings) -> Result<()> {
        settings.find_replace.validate()?;
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults synchronously
    pub fn reset_sync(&mut self) -> Result<&AppSettings> {
        self.current = AppSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }

    /// Update only the find and replace settings
    pub async fn update_find_replace(&mut self, find_replace: FindReplaceSettings) -> Result<()> {
        find_replace.validate()?;
        self.current.find_replace = find_replace;
        self.save().await
    }
}
