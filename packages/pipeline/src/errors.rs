//! Per-agency run errors and their end-of-run aggregation.

use std::fmt;

use dispatch_map_client::FetchError;
use dispatch_map_dispatch_models::DataType;

/// What went wrong for one agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunErrorKind {
    /// The API could not be reached.
    Transport,
    /// The API answered with a non-2xx status.
    HttpStatus,
    /// The response body did not match the expected shape.
    SchemaValidation,
    /// The response parsed but reported `Success: false`.
    ApiReported,
}

/// A recorded failure for one agency (or one batch request).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    /// Agency label, e.g. `"Jefferson County (JC)"`.
    pub agency: String,
    pub kind: RunErrorKind,
    pub message: String,
}

impl RunError {
    /// Records a failed API call.
    #[must_use]
    pub fn from_fetch(agency: impl Into<String>, data_type: DataType, error: &FetchError) -> Self {
        let (kind, message) = match error {
            FetchError::Transport(e) => (
                RunErrorKind::Transport,
                format!("Failed to reach API for {data_type}: {e}"),
            ),
            FetchError::HttpStatus { status, reason, .. } => (
                RunErrorKind::HttpStatus,
                format!("Failed to fetch {data_type}: {status} {reason}"),
            ),
            FetchError::Schema { message } => (
                RunErrorKind::SchemaValidation,
                format!("Invalid {data_type} response: {message}"),
            ),
        };
        Self {
            agency: agency.into(),
            kind,
            message,
        }
    }

    /// Records a response that reported `Success: false`.
    #[must_use]
    pub fn api_reported(agency: impl Into<String>, error: Option<&str>) -> Self {
        Self {
            agency: agency.into(),
            kind: RunErrorKind::ApiReported,
            message: format!("API Error: {}", error.unwrap_or("Unknown error")),
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.agency, self.message)
    }
}

/// Ordered list of errors recorded during a run. Not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunErrors {
    errors: Vec<RunError>,
}

impl RunErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: RunError) {
        log::error!("{error}");
        self.errors.push(error);
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RunError> {
        self.errors.iter()
    }

    /// Summary with a count line followed by one error per line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{} error(s) occurred:", self.errors.len());
        for error in &self.errors {
            out.push('\n');
            out.push_str(&error.to_string());
        }
        out
    }
}

impl Extend<RunError> for RunErrors {
    fn extend<T: IntoIterator<Item = RunError>>(&mut self, iter: T) {
        for error in iter {
            self.push(error);
        }
    }
}

impl<'a> IntoIterator for &'a RunErrors {
    type Item = &'a RunError;
    type IntoIter = std::slice::Iter<'a, RunError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for RunErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
