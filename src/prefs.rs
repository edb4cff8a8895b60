use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn interval_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 150,
            Difficulty::Medium => 100,
            Difficulty::Hard => 50,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms())
    }

    pub fn from_interval_ms(ms: u64) -> Option<Difficulty> {
        Difficulty::ALL.into_iter().find(|d| d.interval_ms() == ms)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// The two values that outlive a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub high_score: u32,
}

impl Preferences {
    pub fn validate(&self) -> Result<()> {
        if Difficulty::from_interval_ms(self.tick_interval_ms).is_none() {
            bail!(
                "tick_interval_ms must be one of 150, 100 or 50, got {}",
                self.tick_interval_ms
            );
        }
        Ok(())
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_interval_ms(self.tick_interval_ms).unwrap_or_default()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.tick_interval_ms = difficulty.interval_ms();
    }

    /// Raises the high score if `score` beats it. Returns whether it did.
    pub fn record_score(&mut self, score: u32) -> bool {
        if score > self.high_score {
            self.high_score = score;
            return true;
        }
        false
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            tick_interval_ms: Difficulty::default().interval_ms(),
            high_score: 0,
        }
    }
}

/// Keeps `Preferences` in a YAML file.
pub struct PrefsStore {
    path: PathBuf,
}

impl PrefsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PrefsStore { path: path.into() }
    }

    /// Reads the stored preferences, falling back to defaults when the file
    /// does not exist yet.
    pub fn load(&self) -> Result<Preferences> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No preferences at {}, using defaults", self.path.display());
                return Ok(Preferences::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read preferences from {}", self.path.display()))
            }
        };

        let prefs: Preferences = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Malformed preferences in {}", self.path.display()))?;
        prefs.validate().context("Invalid preferences")?;

        debug!("Loaded {:?}", prefs);
        Ok(prefs)
    }

    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        prefs.validate().context("Refusing to save invalid preferences")?;

        let content = serde_yaml_ng::to_string(prefs).context("Failed to serialize preferences")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))?;

        debug!("Saved {:?} to {}", prefs, self.path.display());
        Ok(())
    }

    /// Saves, logging a failure instead of returning it. A lost write costs
    /// the stored value, never the game. Returns whether the write happened.
    pub fn save_or_warn(&self, prefs: &Preferences) -> bool {
        match self.save(prefs) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not save preferences to {}: {:#}", self.path.display(), e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_presets() {
        assert_eq!(Difficulty::Easy.interval_ms(), 150);
        assert_eq!(Difficulty::Medium.interval_ms(), 100);
        assert_eq!(Difficulty::Hard.interval(), Duration::from_millis(50));
        assert_eq!(Difficulty::from_interval_ms(150), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_interval_ms(75), None);
    }

    #[test]
    fn record_score_only_raises() {
        let mut prefs = Preferences::default();
        assert!(prefs.record_score(30));
        assert!(!prefs.record_score(20));
        assert!(!prefs.record_score(30));
        assert_eq!(prefs.high_score, 30);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::new(dir.path().join("nope.yaml"));
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn saved_preferences_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::new(dir.path().join("prefs.yaml"));

        let mut prefs = Preferences::default();
        prefs.set_difficulty(Difficulty::Hard);
        prefs.record_score(120);
        store.save(&prefs).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, prefs);
        assert_eq!(loaded.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn unwritable_path_only_warns() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::new(dir.path().join("missing").join("prefs.yaml"));
        assert!(!store.save_or_warn(&Preferences::default()));

        let store = PrefsStore::new(dir.path().join("prefs.yaml"));
        assert!(store.save_or_warn(&Preferences::default()));
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.yaml");

        std::fs::write(&path, "tick_interval_ms: 75\nhigh_score: 10\n").unwrap();
        assert!(PrefsStore::new(&path).load().is_err());

        std::fs::write(&path, "high_score: [1, 2]\n").unwrap();
        assert!(PrefsStore::new(&path).load().is_err());
    }

    #[test]
    fn high_score_defaults_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.yaml");
        std::fs::write(&path, "tick_interval_ms: 150\n").unwrap();

        let prefs = PrefsStore::new(&path).load().unwrap();
        assert_eq!(prefs.difficulty(), Difficulty::Easy);
        assert_eq!(prefs.high_score, 0);
    }
}
