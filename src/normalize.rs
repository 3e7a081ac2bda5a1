use std::path::{Path, PathBuf};

use log::debug;
use tauri::Url;

use crate::codec::decode_base64;
use crate::content_type;
use crate::models::{ContentTypeOption, ShareMultipleFileOptions};
use crate::{Error, Result};

/// A reference to a file that already exists outside the plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileReference {
    /// A local filesystem path. `file://` URIs are converted to this form.
    Path(PathBuf),
    /// Any other URI (e.g. `content://`), handed to the native layer as-is.
    Uri(Url),
}

impl FileReference {
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => FileReference::Path(path),
                Err(()) => FileReference::Uri(url),
            },
            // A one letter scheme is a Windows drive prefix such as `C:\`.
            Ok(url) if url.scheme().len() > 1 => FileReference::Uri(url),
            _ => FileReference::Path(PathBuf::from(raw)),
        }
    }

    /// The last segment of the path, if it has one. A path ending in a
    /// separator names a directory and has none.
    pub fn file_name(&self) -> Option<String> {
        match self {
            FileReference::Path(path) if ends_with_separator(path) => None,
            FileReference::Path(path) => path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_owned),
            FileReference::Uri(url) => url
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_owned),
        }
    }

    /// Fails with [`Error::FileNotFound`] when a local path does not point at
    /// a file. URIs cannot be checked from Rust and always pass.
    pub fn ensure_exists(&self) -> Result<()> {
        match self {
            FileReference::Path(path) if !path.is_file() => {
                Err(Error::FileNotFound(path.display().to_string()))
            }
            _ => Ok(()),
        }
    }

    /// The form handed over to the native share sheet.
    pub fn to_native_string(&self) -> String {
        match self {
            FileReference::Path(path) => path.to_string_lossy().into_owned(),
            FileReference::Uri(url) => url.to_string(),
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            FileReference::Path(path) => Some(path),
            FileReference::Uri(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Reference(FileReference),
    Bytes(Vec<u8>),
}

/// One file of a share request, ready to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFileEntry {
    pub display_name: String,
    pub content_type: String,
    pub source: FileSource,
}

/// The two accepted encodings of a multi-file request.
#[derive(Debug, Clone, Copy)]
pub enum MultiShareSource<'a> {
    References(&'a [String]),
    Payloads {
        filenames: &'a [String],
        payloads: &'a [String],
    },
}

impl<'a> MultiShareSource<'a> {
    pub fn from_options(options: &'a ShareMultipleFileOptions) -> Result<Self> {
        let files = non_empty(options.files.as_deref());
        let filenames = non_empty(options.filename_array.as_deref());
        let payloads = non_empty(options.base64_data_array.as_deref());

        if let Some(files) = files {
            return Ok(MultiShareSource::References(files));
        }
        if filenames.is_none() && payloads.is_none() {
            return Err(Error::NoFilename);
        }
        let filenames = filenames.unwrap_or_default();
        let payloads = payloads.unwrap_or_default();
        if filenames.len() != payloads.len() {
            return Err(Error::ArrayLengthMismatch {
                filenames: filenames.len(),
                payloads: payloads.len(),
            });
        }
        Ok(MultiShareSource::Payloads {
            filenames,
            payloads,
        })
    }
}

fn non_empty(values: Option<&[String]>) -> Option<&[String]> {
    values.filter(|v| !v.is_empty())
}

/// Reconciles both input shapes into entries in request order.
pub fn normalize(options: &ShareMultipleFileOptions) -> Result<Vec<NormalizedFileEntry>> {
    let source = MultiShareSource::from_options(options)?;
    let type_override = options.content_type.as_ref();
    let explicit = type_override.and_then(ContentTypeOption::single);
    let positional = type_override.and_then(ContentTypeOption::per_file);

    let entries: Vec<NormalizedFileEntry> = match source {
        MultiShareSource::References(files) => files
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let reference = FileReference::parse(raw);
                let display_name = reference
                    .file_name()
                    .unwrap_or_else(|| format!("file_{index}"));
                NormalizedFileEntry {
                    content_type: content_type::resolve(&display_name, explicit, positional, index),
                    display_name,
                    source: FileSource::Reference(reference),
                }
            })
            .collect(),
        MultiShareSource::Payloads {
            filenames,
            payloads,
        } => filenames
            .iter()
            .zip(payloads)
            .enumerate()
            .map(|(index, (filename, payload))| {
                Ok(NormalizedFileEntry {
                    display_name: filename.clone(),
                    content_type: content_type::resolve(filename, explicit, positional, index),
                    source: FileSource::Bytes(decode_base64(payload)?),
                })
            })
            .collect::<Result<Vec<_>>>()?,
    };
    debug!("normalized share request into {} entries", entries.len());
    Ok(entries)
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_str()
        .and_then(|raw| raw.chars().last())
        .is_some_and(std::path::is_separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn references_keep_order_and_infer_types() {
        let options = ShareMultipleFileOptions {
            files: Some(strings(&["/a.png", "/b.pdf"])),
            ..Default::default()
        };
        let entries = normalize(&options).unwrap();
        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.display_name.as_str(), e.content_type.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("a.png", "image/png"), ("b.pdf", "application/pdf")]
        );
        assert_eq!(
            entries[0].source,
            FileSource::Reference(FileReference::Path(PathBuf::from("/a.png")))
        );
    }

    #[test]
    fn references_take_single_content_type_override() {
        let options = ShareMultipleFileOptions {
            files: Some(strings(&["/a.png", "/b.pdf"])),
            content_type: Some(ContentTypeOption::Single("text/csv".into())),
            ..Default::default()
        };
        let entries = normalize(&options).unwrap();
        assert!(entries.iter().all(|e| e.content_type == "text/csv"));
    }

    #[test]
    fn unnamed_references_get_placeholder_names() {
        let options = ShareMultipleFileOptions {
            files: Some(strings(&["content://media/", "/tmp/report.txt"])),
            ..Default::default()
        };
        let entries = normalize(&options).unwrap();
        assert_eq!(entries[0].display_name, "file_0");
        assert_eq!(entries[1].display_name, "report.txt");
        assert!(matches!(
            entries[0].source,
            FileSource::Reference(FileReference::Uri(_))
        ));
    }

    #[test]
    fn directory_paths_get_placeholder_names() {
        let options = ShareMultipleFileOptions {
            files: Some(strings(&["/tmp/report.txt", "/tmp/exports/"])),
            ..Default::default()
        };
        let entries = normalize(&options).unwrap();
        assert_eq!(entries[0].display_name, "report.txt");
        assert_eq!(entries[1].display_name, "file_1");
    }

    #[test]
    fn payloads_decode_in_order() {
        let first = vec![0u8, 159, 146, 150, 255];
        let second = b"{\"ok\":true}".to_vec();
        let options = ShareMultipleFileOptions {
            filename_array: Some(strings(&["blob.bin", "data.json"])),
            base64_data_array: Some(vec![
                general_purpose::STANDARD.encode(&first),
                general_purpose::STANDARD.encode(&second),
            ]),
            content_type: Some(ContentTypeOption::PerFile(strings(&["application/x-raw"]))),
            ..Default::default()
        };
        let entries = normalize(&options).unwrap();
        assert_eq!(entries[0].source, FileSource::Bytes(first));
        assert_eq!(entries[0].content_type, "application/x-raw");
        assert_eq!(entries[1].source, FileSource::Bytes(second));
        assert_eq!(entries[1].content_type, content_type::DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn payload_length_mismatch_fails() {
        let options = ShareMultipleFileOptions {
            filename_array: Some(strings(&["a.txt", "b.txt"])),
            base64_data_array: Some(strings(&["aGk="])),
            ..Default::default()
        };
        let err = normalize(&options).unwrap_err();
        assert_eq!(err.code(), "ERR_PARAM_ARRAY_LENGTH_MISMATCH");
    }

    #[test]
    fn half_present_payload_shape_is_a_mismatch() {
        let options = ShareMultipleFileOptions {
            filename_array: Some(strings(&["a.txt"])),
            ..Default::default()
        };
        let err = normalize(&options).unwrap_err();
        assert_eq!(err.code(), "ERR_PARAM_ARRAY_LENGTH_MISMATCH");
    }

    #[test]
    fn malformed_payload_fails() {
        let options = ShareMultipleFileOptions {
            filename_array: Some(strings(&["a.txt"])),
            base64_data_array: Some(strings(&["%%%"])),
            ..Default::default()
        };
        let err = normalize(&options).unwrap_err();
        assert_eq!(err.code(), "ERR_PARAM_DATA_INVALID");
    }

    #[test]
    fn empty_request_has_no_filename() {
        let err = normalize(&ShareMultipleFileOptions::default()).unwrap_err();
        assert_eq!(err.code(), "ERR_PARAM_NO_FILENAME");

        let options = ShareMultipleFileOptions {
            files: Some(Vec::new()),
            filename_array: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(normalize(&options).unwrap_err().code(), "ERR_PARAM_NO_FILENAME");
    }

    #[test]
    fn file_uris_become_paths() {
        #[cfg(not(windows))]
        assert_eq!(
            FileReference::parse("file:///tmp/x.png"),
            FileReference::Path(PathBuf::from("/tmp/x.png"))
        );
        assert_eq!(
            FileReference::parse("relative/y.txt"),
            FileReference::Path(PathBuf::from("relative/y.txt"))
        );
    }
}
