use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

// Errors reach the frontend as their stable `ERR_*` code only; the
// human-readable `Display` form is what gets logged on the Rust side.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No filename provided")]
    NoFilename,
    #[error("No file data or path provided")]
    NoData,
    #[error("No content type provided")]
    NoContentType,
    #[error("Invalid Base64 data: {0}")]
    DataInvalid(String),
    #[error("Array length mismatch: {filenames} filenames but {payloads} payloads")]
    ArrayLengthMismatch { filenames: usize, payloads: usize },
    #[error("Failed to cache file: {0}")]
    FileCaching(String),
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Failed to interact with native sharing API: {0}")]
    NativeShare(String),
    #[error("Failed to hand off to the UI thread: {0}")]
    UiHandoff(String),
    #[error("Tauri API error: {0}")]
    Tauri(#[from] tauri::Error),
}

impl Error {
    /// The stable code surfaced to callers as the rejection reason.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NoFilename => "ERR_PARAM_NO_FILENAME",
            Error::NoData => "ERR_PARAM_NO_DATA",
            Error::NoContentType => "ERR_PARAM_NO_CONTENT_TYPE",
            Error::DataInvalid(_) => "ERR_PARAM_DATA_INVALID",
            Error::ArrayLengthMismatch { .. } => "ERR_PARAM_ARRAY_LENGTH_MISMATCH",
            Error::FileCaching(_) => "ERR_FILE_CACHING_FAILED",
            Error::FileNotFound(_) => "ERR_LOCAL_FILE_NOT_FOUND",
            Error::NativeShare(_) | Error::Tauri(_) => "ERR_NATIVE_SHARE",
            Error::UiHandoff(_) => "ERR_UI_HANDOFF",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::FileCaching(err.to_string())
    }
}

#[cfg(mobile)]
impl From<tauri::plugin::mobile::PluginInvokeError> for Error {
    fn from(err: tauri::plugin::mobile::PluginInvokeError) -> Self {
        Error::NativeShare(err.to_string())
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.code())
    }
}
