//! Configuration for the relsql CLI
//!
//! Handles loading `relsql.toml`: compile strictness plus the models to
//! compile against, either as LoopBack model JSON files or inline tables.

use relsql_core::{CompileOptions, ModelDefinition, ModelRegistry, RelsqlError, Strictness};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "relsql.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RELSQL_CONFIG";

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Reject unknown properties and relations instead of skipping them
    #[serde(default)]
    pub strict: bool,

    /// Glob(s) of LoopBack model JSON files, relative to the config file
    #[serde(default)]
    pub models: Option<ModelGlobs>,

    /// Inline model definitions
    #[serde(default, rename = "model")]
    pub inline: Vec<ModelDefinition>,

    #[serde(skip)]
    base_dir: PathBuf,
}

/// Model file pattern(s)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModelGlobs {
    One(String),
    Many(Vec<String>),
}

impl ModelGlobs {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            Self::One(s) => std::slice::from_ref(s).iter().map(String::as_str),
            Self::Many(v) => v.iter().map(String::as_str),
        }
    }
}

impl Config {
    /// Load from `$RELSQL_CONFIG`, falling back to `relsql.toml`
    pub fn load() -> Result<Self, Error> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load_from(Path::new(&path)),
            _ => Self::load_from(Path::new(CONFIG_FILE)),
        }
    }

    /// Load from specific path
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.into())
            } else {
                Error::Io(path.into(), e)
            }
        })?;

        let mut config: Self =
            toml::from_str(&content).map_err(|e| Error::Parse(path.into(), e))?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.models.is_none() && self.inline.is_empty() {
            return Err(Error::NoModels);
        }
        for pattern in self.models.iter().flat_map(ModelGlobs::iter) {
            glob::Pattern::new(pattern).map_err(|e| Error::Glob(pattern.into(), e))?;
        }
        Ok(())
    }

    #[inline]
    pub fn strictness(&self) -> Strictness {
        if self.strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        }
    }

    pub fn options(&self) -> CompileOptions {
        CompileOptions {
            strictness: self.strictness(),
        }
    }

    /// Model patterns display string
    pub fn models_display(&self) -> String {
        match &self.models {
            Some(ModelGlobs::One(s)) => s.clone(),
            Some(ModelGlobs::Many(v)) => v.join(", "),
            None => "(inline only)".into(),
        }
    }

    /// Resolve model files (with glob support), sorted
    pub fn model_files(&self) -> Result<Vec<PathBuf>, Error> {
        let mut files = Vec::new();

        for pattern in self.models.iter().flat_map(ModelGlobs::iter) {
            let full = self.base_dir.join(pattern);
            let full = full.to_string_lossy();
            match glob::glob(&full) {
                Ok(paths) => files.extend(paths.filter_map(Result::ok)),
                Err(e) => return Err(Error::Glob(pattern.into(), e)),
            }
        }

        if files.is_empty() && self.inline.is_empty() {
            return Err(Error::NoModelFiles(self.models_display()));
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Every model: files first, then inline definitions
    pub fn model_definitions(&self) -> Result<Vec<ModelDefinition>, Error> {
        let mut models = Vec::new();
        for path in self.model_files()? {
            let content =
                std::fs::read_to_string(&path).map_err(|e| Error::Io(path.clone(), e))?;
            let model = ModelDefinition::from_loopback_str(&content)
                .map_err(|e| Error::Model(path.clone(), e))?;
            models.push(model);
        }
        models.extend(self.inline.iter().cloned());
        Ok(models)
    }

    /// Validated registry of every configured model
    pub fn registry(&self) -> Result<ModelRegistry, Error> {
        ModelRegistry::new(self.model_definitions()?).map_err(Error::Registry)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("no models configured: set `models` or add a [[model]] table")]
    NoModels,

    #[error("invalid glob '{0}': {1}")]
    Glob(String, #[source] glob::PatternError),

    #[error("no model files found: {0}")]
    NoModelFiles(String),

    #[error("invalid model {}: {}", .0.display(), .1)]
    Model(PathBuf, #[source] RelsqlError),

    #[error("invalid models: {0}")]
    Registry(#[source] RelsqlError),
}

pub type ConfigError = Error;

// ============================================================================
// Tests
// ============================================================================
