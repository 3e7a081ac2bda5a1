use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use serde::de::DeserializeOwned;
use tauri::{plugin::PluginApi, AppHandle, Manager, Runtime};

use crate::cache::sanitize_file_name;
use crate::config::Config;
use crate::host::{DownloadSink, DownloadSource, ShareTarget};
use crate::normalize::FileReference;
use crate::processor::ShareRequestProcessor;
use crate::{models::*, Error, Result};

/// Desktop has no share sheet, so shared files are downloaded into the
/// user's Downloads directory instead.
pub fn init<R: Runtime, C: DeserializeOwned>(
    app: &AppHandle<R>,
    _api: PluginApi<R, C>,
    config: &Config,
) -> Result<FileSharer<R>> {
    let downloads = app
        .path()
        .download_dir()
        .or_else(|_| app.path().home_dir().map(|home| home.join("Downloads")))?;
    info!("file-sharer downloads go to {}", downloads.display());
    let target = ShareTarget::Download {
        sink: Arc::new(DownloadDirSink::new(downloads)),
        stagger: config.download_stagger(),
    };
    Ok(FileSharer {
        processor: ShareRequestProcessor::new(target, config.default_dialog_title.clone()),
        _runtime: PhantomData,
    })
}

/// Access to the file sharer APIs.
pub struct FileSharer<R: Runtime> {
    processor: ShareRequestProcessor,
    _runtime: PhantomData<fn() -> R>,
}

impl<R: Runtime> FileSharer<R> {
    pub async fn share(&self, options: ShareFileOptions) -> Result<()> {
        self.processor.share(options).await
    }

    pub async fn share_multiple(&self, options: ShareMultipleFileOptions) -> Result<()> {
        self.processor.share_multiple(options).await
    }
}

/// Writes downloads into a directory, never overwriting an existing file.
pub struct DownloadDirSink {
    dir: PathBuf,
}

impl DownloadDirSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl DownloadSink for DownloadDirSink {
    fn download(&self, source: DownloadSource, filename: &str, content_type: &str) -> Result<()> {
        let name = sanitize_file_name(filename)?;
        fs::create_dir_all(&self.dir)?;
        let destination = match source {
            DownloadSource::Bytes(bytes) => {
                let (destination, mut output) = create_unique(&self.dir, name)?;
                output.write_all(&bytes)?;
                destination
            }
            DownloadSource::File(FileReference::Path(path)) => {
                let mut input = File::open(&path)?;
                let (destination, mut output) = create_unique(&self.dir, name)?;
                io::copy(&mut input, &mut output)?;
                destination
            }
            DownloadSource::File(FileReference::Uri(url)) => {
                return Err(Error::NativeShare(format!(
                    "Cannot download {} on desktop",
                    url
                )));
            }
        };
        info!(
            "downloaded {} ({}) to {}",
            filename,
            content_type,
            destination.display()
        );
        Ok(())
    }
}

/// Creates `name`, or `stem (n).ext` for the first free `n`, the way browsers
/// name repeated downloads. The file is created exclusively, so a concurrent
/// download of the same name moves on to the next number.
fn create_unique(dir: &Path, name: &str) -> io::Result<(PathBuf, File)> {
    for candidate in candidates(dir, name) {
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free name for {} in {}", name, dir.display()),
    ))
}

fn candidates<'a>(dir: &'a Path, name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
    let path = Path::new(name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    let extension = path.extension().and_then(|e| e.to_str());
    std::iter::once(dir.join(name)).chain((1..u32::MAX).map(move |n| match extension {
        Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
        None => dir.join(format!("{} ({})", stem, n)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_bytes_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DownloadDirSink::new(dir.path().to_path_buf());

        sink.download(DownloadSource::Bytes(b"one".to_vec()), "notes.txt", "text/plain")
            .unwrap();
        sink.download(DownloadSource::Bytes(b"two".to_vec()), "notes.txt", "text/plain")
            .unwrap();

        assert_eq!(fs::read(dir.path().join("notes.txt")).unwrap(), b"one");
        assert_eq!(fs::read(dir.path().join("notes (1).txt")).unwrap(), b"two");
    }

    #[test]
    fn copies_referenced_files() {
        let source_dir = tempfile::tempdir().unwrap();
        let original = source_dir.path().join("photo.png");
        fs::write(&original, b"png").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let sink = DownloadDirSink::new(dir.path().join("Downloads"));

        sink.download(
            DownloadSource::File(FileReference::Path(original)),
            "photo.png",
            "image/png",
        )
        .unwrap();

        assert_eq!(fs::read(dir.path().join("Downloads/photo.png")).unwrap(), b"png");
    }

    #[test]
    fn keeps_downloads_inside_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let downloads = dir.path().join("Downloads");
        let sink = DownloadDirSink::new(downloads.clone());

        sink.download(DownloadSource::Bytes(vec![0]), "../escape.bin", "application/octet-stream")
            .unwrap();

        assert!(downloads.join("escape.bin").is_file());
        assert!(!dir.path().join("escape.bin").exists());
    }

    #[test]
    fn numbers_files_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README"), b"").unwrap();
        let (path, _file) = create_unique(dir.path(), "README").unwrap();
        assert_eq!(path, dir.path().join("README (1)"));
    }

    #[test]
    fn skips_names_taken_between_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let (first, _held) = create_unique(dir.path(), "report.pdf").unwrap();
        let (second, _) = create_unique(dir.path(), "report.pdf").unwrap();
        fs::write(dir.path().join("report (2).pdf"), b"kept").unwrap();

        let sink = DownloadDirSink::new(dir.path().to_path_buf());
        sink.download(DownloadSource::Bytes(b"new".to_vec()), "report.pdf", "application/pdf")
            .unwrap();

        assert_eq!(first, dir.path().join("report.pdf"));
        assert_eq!(second, dir.path().join("report (1).pdf"));
        assert_eq!(fs::read(dir.path().join("report (2).pdf")).unwrap(), b"kept");
        assert_eq!(fs::read(dir.path().join("report (3).pdf")).unwrap(), b"new");
    }

    #[test]
    fn missing_source_file_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DownloadDirSink::new(dir.path().to_path_buf());

        let err = sink
            .download(
                DownloadSource::File(FileReference::Path(dir.path().join("gone.png"))),
                "gone.png",
                "image/png",
            )
            .unwrap_err();

        assert_eq!(err.code(), "ERR_FILE_CACHING_FAILED");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
