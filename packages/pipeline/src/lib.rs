#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! One dispatch run: fetch per agency, extract features, submit once.
//!
//! [`collect`] gathers features and errors for every configured agency.
//! [`run`] submits the resulting collection to a [`sink::FeatureSink`]
//! and then fails if any agency reported an error.

pub mod errors;
pub mod extract;
pub mod sink;

#[cfg(test)]
mod test_fixtures;

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dispatch_map_client::DispatchSource;
use dispatch_map_config::DispatchConfig;
use dispatch_map_dispatch_models::{AgencyRef, DataType, DispatchResponse, FetchMode};
use dispatch_map_feature_models::{MapFeature, MapFeatureCollection};
use futures::{StreamExt, stream};

pub use errors::{RunError, RunErrorKind, RunErrors};
pub use sink::{FeatureSink, SinkError};

/// Summary of a run whose collection was submitted without any agency
/// errors.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Number of agencies queried.
    pub agencies: usize,
    /// Number of features submitted.
    pub features: usize,
}

/// Why a run did not complete cleanly.
#[derive(Debug, thiserror::Error)]
pub enum RunFailure {
    /// The collection was submitted, but one or more agencies failed.
    #[error("{0}")]
    Aggregated(RunErrors),

    /// The collection could not be submitted. The message also lists any
    /// agency errors recorded during the run.
    #[error("{}", submit_message(.source, .errors))]
    Submit {
        #[source]
        source: SinkError,
        /// Agency errors recorded before the submission was attempted.
        errors: RunErrors,
    },
}

impl RunFailure {
    /// Agency errors recorded during the run.
    #[must_use]
    pub const fn errors(&self) -> &RunErrors {
        match self {
            Self::Aggregated(errors) | Self::Submit { errors, .. } => errors,
        }
    }
}

fn submit_message(source: &SinkError, errors: &RunErrors) -> String {
    if errors.is_empty() {
        format!("Failed to submit feature collection: {source}")
    } else {
        format!("Failed to submit feature collection: {source}\n{errors}")
    }
}

/// Features and errors produced by one API call.
#[derive(Debug, Default)]
struct Outcome {
    features: Vec<MapFeature>,
    errors: Vec<RunError>,
}

async fn query(
    source: &dyn DispatchSource,
    data_type: DataType,
    label: String,
    codes: Vec<String>,
) -> Outcome {
    log::debug!("Fetching {data_type} for {label}");

    match source.fetch(data_type, &codes).await {
        Ok(response) => from_response(label, &response),
        Err(e) => Outcome {
            features: vec![],
            errors: vec![RunError::from_fetch(label, data_type, &e)],
        },
    }
}

fn from_response(label: String, response: &DispatchResponse) -> Outcome {
    let features = extract::extract(response);
    log::info!(
        "{label}: {} record(s), {} feature(s)",
        response.record_count(),
        features.len()
    );

    let errors = if response.success() {
        vec![]
    } else {
        vec![RunError::api_reported(label, response.error())]
    };

    Outcome { features, errors }
}

fn batch_label(agencies: &[AgencyRef]) -> String {
    let codes: Vec<&str> = agencies.iter().map(|a| a.id.as_str()).collect();
    format!("batch [{}]", codes.join(", "))
}

/// Queries every configured agency and gathers the resulting features and
/// errors.
///
/// Agencies are processed in configured order and their features appear
/// in that order, whatever the configured concurrency. An agency that
/// fails contributes an error and never stops the others.
pub async fn collect(
    config: &DispatchConfig,
    source: &dyn DispatchSource,
) -> (MapFeatureCollection, RunErrors) {
    let data_type = config.data_type;

    let outcomes: Vec<Outcome> = match config.fetch_mode {
        FetchMode::PerAgency => {
            stream::iter(config.agencies.iter())
                .map(|agency| query(source, data_type, agency.label(), vec![agency.id.clone()]))
                .buffered(config.concurrency.max(1))
                .collect()
                .await
        }
        FetchMode::Batch => {
            if config.agencies.is_empty() {
                vec![]
            } else {
                let codes = config.agencies.iter().map(|a| a.id.clone()).collect();
                vec![query(source, data_type, batch_label(&config.agencies), codes).await]
            }
        }
    };

    let mut collection = MapFeatureCollection::new();
    let mut errors = RunErrors::new();
    for outcome in outcomes {
        collection.extend(outcome.features);
        errors.extend(outcome.errors);
    }

    (collection, errors)
}

/// Runs one full cycle: collect, submit exactly once, then report.
///
/// The collection is submitted even when some agencies failed, including
/// when it is empty.
///
/// # Errors
///
/// * [`RunFailure::Submit`] if the sink rejects the collection
/// * [`RunFailure::Aggregated`] if any agency recorded an error
pub async fn run(
    config: &DispatchConfig,
    source: &dyn DispatchSource,
    sink: &dyn FeatureSink,
) -> Result<RunReport, RunFailure> {
    let started_at = Utc::now();
    let start = Instant::now();

    log::info!(
        "Starting {} run for {} agenc{}",
        config.data_type,
        config.agencies.len(),
        if config.agencies.len() == 1 { "y" } else { "ies" }
    );

    let (collection, errors) = collect(config, source).await;

    if let Err(e) = sink.submit(&collection).await {
        log::error!("Failed to submit feature collection: {e}");
        return Err(RunFailure::Submit { source: e, errors });
    }

    let elapsed = start.elapsed();
    log::info!(
        "Submitted {} feature(s) in {:.1}s with {} error(s)",
        collection.len(),
        elapsed.as_secs_f64(),
        errors.len()
    );

    if !errors.is_empty() {
        return Err(RunFailure::Aggregated(errors));
    }

    Ok(RunReport {
        started_at,
        elapsed,
        agencies: config.agencies.len(),
        features: collection.len(),
    })
}
