//! Configuration for the interview engine.

use std::path::{Path, PathBuf};

use ink_core::MatcherConfig;
use serde::{Deserialize, Serialize};

use crate::error::{InterviewError, InterviewResult};

/// File name looked up in the project root when no config path is given.
pub const CONFIG_FILE_NAME: &str = "ink.toml";

/// Configuration for an interview engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Story project root that artifact paths are relative to.
    pub root: PathBuf,
    /// Optional directory of extra or overriding script files.
    pub scripts_dir: Option<PathBuf>,
    /// Fuzzy command matching tunables.
    pub matcher: MatcherConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            scripts_dir: None,
            matcher: MatcherConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set the project root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the scripts directory.
    pub fn with_scripts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scripts_dir = Some(dir.into());
        self
    }

    /// Set the matcher threshold (clamped to 0.0-1.0).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.matcher = self.matcher.with_threshold(threshold);
        self
    }

    /// Load a config file.
    ///
    /// A relative `root` or `scripts_dir` in the file is resolved against the
    /// file's directory. A missing file yields the defaults rooted there.
    pub fn load(path: &Path) -> InterviewResult<Self> {
        let base = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        if !path.exists() {
            return Ok(Self::default().with_root(base));
        }

        let text = std::fs::read_to_string(path).map_err(|e| InterviewError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config: Self = toml::from_str(&text).map_err(|e| InterviewError::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        config.root = base.join(&config.root);
        config.scripts_dir = config.scripts_dir.map(|dir| base.join(dir));
        config.matcher = config.matcher.clamped();
        Ok(config)
    }

    /// Load `ink.toml` from a project root, or defaults if absent.
    pub fn discover(root: &Path) -> InterviewResult<Self> {
        Self::load(&root.join(CONFIG_FILE_NAME))
    }
}
