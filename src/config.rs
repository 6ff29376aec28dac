use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Everything the app reads from the environment, resolved once at startup
/// and passed down explicitly. Nothing below this layer touches `env` or
/// guesses paths.
#[derive(Clone, Debug)]
pub struct Config {
    /// Program used for document editing sessions.
    pub editor: String,
    /// User keybinding overrides, merged over the defaults when present.
    pub keybindings_path: PathBuf,
    /// Accepted-query history file.
    pub history_path: PathBuf,
    /// Log file; the terminal belongs to the UI, so logs never go to stderr.
    pub log_path: PathBuf,
}

impl Config {
    /// Resolves the config from an optional directory override and editor
    /// flag. Fails only when no config directory can be determined at all.
    pub fn resolve(config_dir: Option<PathBuf>, editor_flag: Option<String>) -> Result<Self> {
        let dir = match config_dir {
            Some(dir) => dir,
            None => dirs::config_dir()
                .context("no config directory for this platform")?
                .join("mongotui"),
        };

        let editor = editor_flag
            .or_else(|| env::var("EDITOR").ok().filter(|e| !e.is_empty()))
            .or_else(|| env::var("VISUAL").ok().filter(|e| !e.is_empty()))
            .unwrap_or_else(|| "vi".to_string());

        Ok(Self {
            editor,
            keybindings_path: dir.join("keybindings.json"),
            history_path: dir.join("history.txt"),
            log_path: dir.join("mongotui.log"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let config =
            Config::resolve(Some(PathBuf::from("/tmp/mt")), Some("nano".to_string())).unwrap();
        assert_eq!(config.keybindings_path, PathBuf::from("/tmp/mt/keybindings.json"));
        assert_eq!(config.history_path, PathBuf::from("/tmp/mt/history.txt"));
        assert_eq!(config.editor, "nano");
    }

    #[test]
    fn test_editor_flag_beats_environment() {
        let config =
            Config::resolve(Some(PathBuf::from("/tmp/mt")), Some("hx".to_string())).unwrap();
        assert_eq!(config.editor, "hx");
    }
}
