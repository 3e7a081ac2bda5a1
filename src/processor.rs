use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::cache::FileCache;
use crate::codec::decode_base64;
use crate::host::{
    DownloadSink, DownloadSource, NativeShareSheet, PresentOptions, ShareTarget, UiHandoff,
};
use crate::models::{ShareFileOptions, ShareMultipleFileOptions};
use crate::normalize::{self, FileReference, FileSource, NormalizedFileEntry};
use crate::{Error, Result};

/// Validates share requests and dispatches them to the host platform.
///
/// Blocking file work runs on the tokio blocking pool of the current
/// runtime, or on Tauri's runtime when called outside of one.
pub struct ShareRequestProcessor {
    target: ShareTarget,
    default_title: String,
}

impl ShareRequestProcessor {
    pub fn new(target: ShareTarget, default_title: impl Into<String>) -> Self {
        Self {
            target,
            default_title: default_title.into(),
        }
    }

    /// Shares a single file.
    ///
    /// Parameters are checked in order: filename, payload, content type. On
    /// mobile this resolves once the share sheet is closed; on desktop once
    /// the file has been downloaded, with any download error returned.
    pub async fn share(&self, options: ShareFileOptions) -> Result<()> {
        let entry = single_entry(&options).inspect_err(|e| warn!("share rejected: {}", e))?;
        let title = options
            .android
            .and_then(|android| android.chooser_title)
            .filter(|title| !title.is_empty());
        match &self.target {
            ShareTarget::Native {
                sheet,
                handoff,
                cache,
            } => {
                self.present_native(sheet, handoff, cache, vec![entry], title)
                    .await
            }
            ShareTarget::Download { sink, .. } => {
                info!("downloading {}", entry.display_name);
                let sink = Arc::clone(sink);
                run_blocking(move || download_entry(sink.as_ref(), entry))
                    .await
                    .inspect_err(|e| error!("download failed: {}", e))
            }
        }
    }

    /// Shares several files in one go.
    ///
    /// On mobile every file is prepared before the share sheet opens and any
    /// failure aborts the whole request. On desktop the downloads are only
    /// scheduled; this returns before any of them has run.
    pub async fn share_multiple(&self, options: ShareMultipleFileOptions) -> Result<()> {
        let entries =
            normalize::normalize(&options).inspect_err(|e| warn!("share rejected: {}", e))?;
        let title = options.dialog_title.filter(|title| !title.is_empty());
        match &self.target {
            ShareTarget::Native {
                sheet,
                handoff,
                cache,
            } => self.present_native(sheet, handoff, cache, entries, title).await,
            ShareTarget::Download { sink, stagger } => {
                info!("scheduling {} download(s)", entries.len());
                schedule_downloads(sink, *stagger, entries);
                Ok(())
            }
        }
    }

    async fn present_native(
        &self,
        sheet: &Arc<dyn NativeShareSheet>,
        handoff: &Arc<dyn UiHandoff>,
        cache: &FileCache,
        entries: Vec<NormalizedFileEntry>,
        title: Option<String>,
    ) -> Result<()> {
        let cache = cache.clone();
        let (files, content_types) = run_blocking(move || materialize(&cache, entries)).await?;
        let options = PresentOptions {
            chooser_title: Some(title.unwrap_or_else(|| self.default_title.clone())),
            content_types,
        };
        info!("presenting share sheet with {} file(s)", files.len());
        present_on_ui(handoff.as_ref(), Arc::clone(sheet), files, options).await
    }
}

fn single_entry(options: &ShareFileOptions) -> Result<NormalizedFileEntry> {
    let filename = non_empty(options.filename.as_deref()).ok_or(Error::NoFilename)?;
    let base64_data = non_empty(options.base64_data.as_deref());
    let path = non_empty(options.path.as_deref());
    if base64_data.is_none() && path.is_none() {
        return Err(Error::NoData);
    }
    let content_type = non_empty(options.content_type.as_deref()).ok_or(Error::NoContentType)?;

    let source = match base64_data {
        Some(data) => FileSource::Bytes(decode_base64(data)?),
        None => {
            let reference = FileReference::parse(path.unwrap_or_default());
            reference.ensure_exists()?;
            FileSource::Reference(reference)
        }
    };
    Ok(NormalizedFileEntry {
        display_name: filename.to_owned(),
        content_type: content_type.to_owned(),
        source,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Turns every entry into a file reference, writing raw bytes to the cache.
/// Stops at the first failure so nothing is shown for a partial batch.
fn materialize(
    cache: &FileCache,
    entries: Vec<NormalizedFileEntry>,
) -> Result<(Vec<FileReference>, Vec<String>)> {
    let mut files = Vec::with_capacity(entries.len());
    let mut content_types = Vec::with_capacity(entries.len());
    for entry in entries {
        let reference = match entry.source {
            FileSource::Reference(reference) => {
                reference.ensure_exists().inspect_err(|e| error!("{}", e))?;
                reference
            }
            FileSource::Bytes(bytes) => {
                FileReference::Path(cache.materialize(&entry.display_name, &bytes)?)
            }
        };
        files.push(reference);
        content_types.push(entry.content_type);
    }
    debug!("materialized {} file(s) in {}", files.len(), cache.dir().display());
    Ok((files, content_types))
}

async fn present_on_ui(
    handoff: &dyn UiHandoff,
    sheet: Arc<dyn NativeShareSheet>,
    files: Vec<FileReference>,
    options: PresentOptions,
) -> Result<()> {
    let (tx, rx) = oneshot::channel();
    handoff.submit(Box::new(move || {
        let result = sheet.present(&files, &options);
        let _ = tx.send(result);
    }))?;
    let result = rx
        .await
        .map_err(|_| Error::UiHandoff("UI context dropped the share task".to_string()))?;
    match &result {
        Ok(()) => debug!("share sheet closed"),
        Err(e) => error!("share sheet failed: {}", e),
    }
    result
}

fn download_entry(sink: &dyn DownloadSink, entry: NormalizedFileEntry) -> Result<()> {
    let source = match entry.source {
        FileSource::Bytes(bytes) => DownloadSource::Bytes(bytes),
        FileSource::Reference(reference) => DownloadSource::File(reference),
    };
    sink.download(source, &entry.display_name, &entry.content_type)
}

fn schedule_downloads(
    sink: &Arc<dyn DownloadSink>,
    stagger: Duration,
    entries: Vec<NormalizedFileEntry>,
) {
    for (index, entry) in entries.into_iter().enumerate() {
        let sink = Arc::clone(sink);
        let delay = stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
        spawn_detached(async move {
            tokio::time::sleep(delay).await;
            let name = entry.display_name.clone();
            if let Err(e) = run_blocking(move || download_entry(sink.as_ref(), entry)).await {
                error!("download of {} failed: {}", name, e);
            }
        });
    }
}

fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(future);
        }
        Err(_) => {
            tauri::async_runtime::spawn(future);
        }
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let joined = match Handle::try_current().ok() {
        Some(handle) => handle.spawn_blocking(task).await.map_err(|e| e.to_string()),
        None => tauri::async_runtime::spawn_blocking(task)
            .await
            .map_err(|e| e.to_string()),
    };
    joined.map_err(|e| Error::FileCaching(format!("Background file task failed: {}", e)))?
}
