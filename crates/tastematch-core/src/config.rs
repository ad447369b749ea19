//! Configuration loader, typed pipeline settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_PIPELINE__DELIMITER`). Provides
//! helpers to expand `~` and `${VAR}` and to resolve relative paths against
//! the directory the configuration was loaded from.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_DELIMITER: &str = " | ";
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_TABLE: &str = "recommendation";

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    /// Load `config.toml` and its environment overlay from `dir`.
    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: dir.to_path_buf() };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.settings()?.pipeline.validate()?;
        Ok(())
    }
}

/// Every typed section of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

/// How many restaurants each user keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Selection {
    /// The `k` best restaurants per user, or all of them when fewer exist.
    TopK { k: usize },
    /// Every restaurant for every user, ranked but never truncated.
    CrossProduct,
}

impl Default for Selection {
    fn default() -> Self {
        Self::TopK { k: DEFAULT_TOP_K }
    }
}

/// Secondary ordering applied when two restaurants score the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Ascending restaurant id, numeric when both ids are integers.
    #[default]
    RestaurantId,
    /// Order of first appearance in the restaurant rows.
    ProfileOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Joins an entity's tag names into its characteristic text. Tag names
    /// must not contain it.
    pub delimiter: String,
    pub selection: Selection,
    pub tie_break: TieBreak,
    /// Leave zero-score matches out of the ranked lists.
    pub drop_zero_scores: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            selection: Selection::default(),
            tie_break: TieBreak::default(),
            drop_zero_scores: false,
        }
    }
}

impl PipelineSettings {
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(Error::InvalidConfig("pipeline.delimiter must not be empty".into()));
        }
        // A delimiter made only of word characters would glue adjacent tags into one token.
        if self.delimiter.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(Error::InvalidConfig(format!(
                "pipeline.delimiter {:?} must contain whitespace or punctuation",
                self.delimiter
            )));
        }
        if self.selection == (Selection::TopK { k: 0 }) {
            return Err(Error::InvalidConfig("pipeline.selection.k must be at least 1".into()));
        }
        Ok(())
    }
}

/// Newline-delimited JSON files holding the tag rows of each side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub user_rows: String,
    pub restaurant_rows: String,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            user_rows: "data/user_tags.jsonl".to_string(),
            restaurant_rows: "data/restaurant_tags.jsonl".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// LanceDB database directory.
    pub uri: String,
    pub table: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { uri: "data/lancedb".to_string(), table: DEFAULT_TABLE.to_string() }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
