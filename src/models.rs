use serde::{Deserialize, Serialize};

/// Android-only options for a single file share.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidShareOptions {
    /// Overrides the default share sheet title.
    pub chooser_title: Option<String>,
}

/// Options for sharing one file.
///
/// Exactly one payload form is used: `base64_data` when it is non-empty,
/// otherwise `path`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareFileOptions {
    /// The filename, including its extension.
    pub filename: Option<String>,
    /// The Base64 encoded file contents.
    pub base64_data: Option<String>,
    /// A local path or `file://` URI of an existing file.
    pub path: Option<String>,
    pub content_type: Option<String>,
    pub android: Option<AndroidShareOptions>,
}

/// A content type applied to every file, or one per file by position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ContentTypeOption {
    Single(String),
    PerFile(Vec<String>),
}

impl ContentTypeOption {
    pub fn single(&self) -> Option<&str> {
        match self {
            ContentTypeOption::Single(value) => Some(value),
            ContentTypeOption::PerFile(_) => None,
        }
    }

    pub fn per_file(&self) -> Option<&[String]> {
        match self {
            ContentTypeOption::Single(_) => None,
            ContentTypeOption::PerFile(values) => Some(values),
        }
    }
}

/// Options for sharing several files at once.
///
/// Two input shapes are accepted: `files` (paths or URIs of existing files),
/// or the paired `filename_array` / `base64_data_array`. When both are given,
/// `files` is used.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareMultipleFileOptions {
    pub files: Option<Vec<String>>,
    pub filename_array: Option<Vec<String>>,
    pub base64_data_array: Option<Vec<String>>,
    pub content_type: Option<ContentTypeOption>,
    /// Title of the share chooser.
    pub dialog_title: Option<String>,
}
