//! Destinations for a run's feature collection.
//!
//! The pipeline hands each run's collection to exactly one
//! [`FeatureSink`], exactly once.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use dispatch_map_config::SinkConfig;
use dispatch_map_feature_models::MapFeatureCollection;
use reqwest::header::CONTENT_TYPE;

/// Errors raised while delivering a collection.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Writing to a file or stdout failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The collection could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The receiving endpoint rejected the collection.
    #[error("Sink responded with HTTP {status}")]
    Status {
        /// Numeric status code.
        status: u16,
    },
}

/// Accepts a finished feature collection.
#[async_trait]
pub trait FeatureSink: Send + Sync {
    /// Delivers `collection`. An empty collection is a valid submission.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if delivery fails.
    async fn submit(&self, collection: &MapFeatureCollection) -> Result<(), SinkError>;
}

/// Builds the sink described by `config`.
///
/// # Errors
///
/// Returns [`SinkError::Http`] if the HTTP client for an HTTP sink cannot
/// be built.
pub fn from_config(config: &SinkConfig) -> Result<Box<dyn FeatureSink>, SinkError> {
    Ok(match config {
        SinkConfig::Stdout => Box::new(StdoutSink),
        SinkConfig::File { path } => Box::new(FileSink::new(path.clone())),
        SinkConfig::Http { url } => Box::new(HttpSink::new(url.clone())?),
    })
}

/// Prints the collection as indented `GeoJSON` on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

#[async_trait]
impl FeatureSink for StdoutSink {
    async fn submit(&self, collection: &MapFeatureCollection) -> Result<(), SinkError> {
        println!("{}", collection.to_json_pretty()?);
        Ok(())
    }
}

/// Writes the collection to a file.
///
/// The file is written next to its destination under a temporary name and
/// then renamed, so readers never observe a partial collection.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "features".into(), |n| n.to_string_lossy().into_owned());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl FeatureSink for FileSink {
    async fn submit(&self, collection: &MapFeatureCollection) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = collection.to_json()?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        log::info!(
            "Wrote {} feature(s) to {}",
            collection.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// POSTs the collection as `GeoJSON` to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpSink {
    http: reqwest::Client,
    url: String,
}

impl HttpSink {
    /// # Errors
    ///
    /// Returns [`SinkError::Http`] if the HTTP client cannot be built.
    pub fn new(url: String) -> Result<Self, SinkError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            url,
        })
    }
}

#[async_trait]
impl FeatureSink for HttpSink {
    async fn submit(&self, collection: &MapFeatureCollection) -> Result<(), SinkError> {
        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/geo+json")
            .body(collection.to_json()?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Sink {} rejected collection: HTTP {status}", self.url);
            return Err(SinkError::Status {
                status: status.as_u16(),
            });
        }

        log::info!("Submitted {} feature(s) to {}", collection.len(), self.url);
        Ok(())
    }
}

/// Keeps every submitted collection in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    submissions: Mutex<Vec<MapFeatureCollection>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every collection submitted so far, oldest first.
    #[must_use]
    pub fn submissions(&self) -> Vec<MapFeatureCollection> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl FeatureSink for MemorySink {
    async fn submit(&self, collection: &MapFeatureCollection) -> Result<(), SinkError> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(collection.clone());
        Ok(())
    }
}
