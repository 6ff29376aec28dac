use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Most entries kept in the history file; the oldest entry gives way first.
const MAX_HISTORY: usize = 10;

/// Accepted queries persisted across sessions, newest last. Backs the
/// history modal behind the query bar.
pub struct QueryHistory {
    path: PathBuf,
}

impl QueryHistory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Entries in file order (oldest first). A missing file is an empty
    /// history, not an error.
    pub fn load(&self) -> Result<Vec<String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading history {}", self.path.display()));
            }
        };
        Ok(raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.to_string())
            .collect())
    }

    /// Appends `text`, dropping any previous occurrence and the oldest
    /// entries beyond the cap.
    pub fn save(&self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let mut entries: Vec<String> = self
            .load()?
            .into_iter()
            .filter(|entry| entry != text)
            .collect();
        entries.push(text.to_string());
        while entries.len() > MAX_HISTORY {
            entries.remove(0);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut contents = entries.join("\n");
        contents.push('\n');
        fs::write(&self.path, contents)
            .with_context(|| format!("writing history {}", self.path.display()))
    }
}
