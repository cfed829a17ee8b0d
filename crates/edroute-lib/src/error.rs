use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the edroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Short message shown for any remote failure that carries no detail of its own.
pub const PLOT_ERROR_MESSAGE: &str = "Error while trying to plot a route, please try again.";

/// Short message shown when the poll budget runs out.
pub const TIMEOUT_MESSAGE: &str =
    "The query to Spansh was too long and timed out, please try again.";

/// Short message shown for unreadable route files.
pub const FILE_ERROR_MESSAGE: &str = "An error occurred while reading the file.";

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// No known header signature matched the file's header line.
    #[error("unrecognized route file header: {header:?}")]
    UnrecognizedFormat { header: String },

    /// The import path has an extension no parser handles.
    #[error("unsupported route file type: {path}")]
    UnsupportedFileType { path: PathBuf },

    /// User supplied plot parameters were rejected before any request was sent.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The routing service answered 400 with a structured error message.
    #[error("route service rejected the request: {message}")]
    RouteRejected {
        message: String,
        source_system: bool,
        destination_system: bool,
    },

    /// Terminal status other than success, or a body that could not be understood.
    #[error("route service request failed{}: {message}", format_status(.status))]
    RemoteRequest {
        status: Option<u16>,
        message: String,
    },

    /// Every poll answered "not ready".
    #[error("route service did not finish after {attempts} polls")]
    RemoteTimeout { attempts: u32 },

    /// Reading or writing one of the persisted files failed.
    #[error("failed to access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A route file exists but its contents cannot be turned into a route.
    #[error("malformed route data at line {line}: {message}")]
    MalformedRoute { line: usize, message: String },

    /// An operation needed at least one waypoint.
    #[error("route is empty")]
    EmptyRoute,

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for route storage")]
    ProjectDirsUnavailable,

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV reader and writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Error::MalformedRoute {
            line,
            message: message.into(),
        }
    }

    /// One short, human readable line suitable for a status label.
    ///
    /// Full diagnostics belong in the log; this is what the pilot sees.
    pub fn user_message(&self) -> String {
        match self {
            Error::RouteRejected { message, .. } => message.clone(),
            Error::RemoteTimeout { .. } => TIMEOUT_MESSAGE.to_string(),
            Error::RemoteRequest { .. } | Error::Http(_) | Error::Json(_) => {
                PLOT_ERROR_MESSAGE.to_string()
            }
            Error::UnrecognizedFormat { .. } => "Could not detect file format".to_string(),
            Error::UnsupportedFileType { .. } => "Unsupported file type".to_string(),
            Error::InvalidInput { message } => message.clone(),
            Error::EmptyRoute => "No route planned".to_string(),
            Error::FileAccess { .. }
            | Error::MalformedRoute { .. }
            | Error::Csv(_)
            | Error::ProjectDirsUnavailable => FILE_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the failure came from talking to the routing service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::RouteRejected { .. }
                | Error::RemoteRequest { .. }
                | Error::RemoteTimeout { .. }
                | Error::Http(_)
                | Error::Json(_)
        )
    }
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}
