/// Generic message shown when neither the server nor the transport says anything useful.
pub const GENERIC_PLOT_FAILURE: &str =
    "Failed to generate plot. Please check your input and try again.";

/// Message used when a 2xx response does not carry a drawable figure.
pub const INVALID_PLOT_DATA: &str = "invalid plot data structure";

/// Form field that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Lattice,
    KPoints,
    Path,
    Config,
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormField::Lattice => "lattice vectors",
            FormField::KPoints => "k-points",
            FormField::Path => "path",
            FormField::Config => "config",
        };
        f.write_str(name)
    }
}

/// Synchronous validation failure raised before any request is sent.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("invalid {field}: {reason}")]
pub struct BuildError {
    pub field: FormField,
    pub reason: String,
}

impl BuildError {
    pub fn new(field: FormField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Text for the blocking alert.
    pub fn alert_text(&self) -> String {
        format!("Invalid JSON format in Lattice Vectors, K-Points or Path ({self})")
    }
}

/// Failure talking to the plot service.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("undecodable response: {0}")]
    Decode(String),
    #[error("{0}")]
    InvalidShape(String),
}

impl ApiError {
    /// Prefers the server-supplied detail, then this error's message, then a generic string.
    pub fn user_message(&self) -> String {
        if let ApiError::Status {
            detail: Some(detail),
            ..
        } = self
        {
            if !detail.trim().is_empty() {
                return detail.clone();
            }
        }
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_PLOT_FAILURE.to_string()
        } else {
            message
        }
    }
}

/// Failure while turning a figure into drawable geometry.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("malformed trace {trace}: {reason}")]
    MalformedTrace { trace: usize, reason: String },
    #[error("renderer panicked: {0}")]
    Panicked(String),
    #[error("projected {0} has non-finite coordinates")]
    NonFinite(&'static str),
}

/// Failure while writing a PNG or SVG snapshot.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("drawing failure: {0}")]
    Draw(String),
}

pub type BuildResult<T> = Result<T, BuildError>;
pub type ApiResult<T> = Result<T, ApiError>;
pub type RenderResult<T> = Result<T, RenderError>;
pub type ExportResult<T> = Result<T, ExportError>;
