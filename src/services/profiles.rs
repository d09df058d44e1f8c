use crate::core::{CoreError, ProfileCatalog};
use crate::models::Profile;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading the profile dataset
#[derive(Debug, Error)]
pub enum ProfileSourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(#[from] CoreError),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),
}

/// On-disk encodings of the profile dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// A JSON array of profiles, or an object with a `profiles` array
    Json,
    /// `[[profiles]]` tables
    Toml,
}

impl DatasetFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, ProfileSourceError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(DatasetFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(DatasetFormat::Toml),
            other => Err(ProfileSourceError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    List(Vec<Profile>),
    Wrapped { profiles: Vec<Profile> },
}

#[derive(Deserialize)]
struct TomlDocument {
    #[serde(default)]
    profiles: Vec<Profile>,
}

/// Read-only source of researcher profiles
///
/// The dataset is read once at startup; the resulting catalog is never
/// written back.
pub struct ProfileSource;

impl ProfileSource {
    /// Load and validate the catalog from a dataset file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ProfileCatalog, ProfileSourceError> {
        let path = path.as_ref();
        let format = DatasetFormat::from_path(path)?;

        let contents = std::fs::read_to_string(path).map_err(|source| ProfileSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::parse(&contents, format)?;

        tracing::info!("Loaded {} profiles from {}", catalog.len(), path.display());

        Ok(catalog)
    }

    /// Parse dataset contents already in memory
    pub fn parse(contents: &str, format: DatasetFormat) -> Result<ProfileCatalog, ProfileSourceError> {
        let profiles = match format {
            DatasetFormat::Json => match serde_json::from_str::<JsonDocument>(contents)? {
                JsonDocument::List(profiles) => profiles,
                JsonDocument::Wrapped { profiles } => profiles,
            },
            DatasetFormat::Toml => toml::from_str::<TomlDocument>(contents)?.profiles,
        };

        Ok(ProfileCatalog::new(profiles)?)
    }
}
