use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// The job file is structurally valid JSON but does not describe a
    /// renderable job (missing contract, empty billboard list, ...).
    InvalidJob(String),
    /// No usable font face was found and the caller asked for strict
    /// resolution. Lenient rendering never produces this; it falls back to
    /// estimated widths instead.
    Font(String),
    Qr(String),
    /// The viewer could not be launched. The message carries remediation
    /// text (the path of the written document), since there is no retry.
    Present(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::Json(err) => write!(f, "invalid json: {}", err),
            Error::InvalidJob(message) => write!(f, "invalid job: {}", message),
            Error::Font(message) => write!(f, "font error: {}", message),
            Error::Qr(message) => write!(f, "qr encoding failed: {}", message),
            Error::Present(message) => write!(f, "could not present document: {}", message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Json(value)
    }
}
