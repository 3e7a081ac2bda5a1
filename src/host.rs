//! Capabilities the host platform provides to the share processor.
//!
//! A processor dispatches to exactly one [`ShareTarget`]: the native share
//! sheet (mobile) or a file download (desktop). Adding a platform means
//! implementing one of these traits, not branching inside the processor.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::FileCache;
use crate::normalize::FileReference;
use crate::Result;

/// Options for one share sheet presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentOptions {
    pub chooser_title: Option<String>,
    /// Content type of each file, aligned with the file list.
    pub content_types: Vec<String>,
}

/// Presents the OS share sheet.
///
/// `present` runs on the UI context (see [`UiHandoff`]) and returns once the
/// sheet has been shown and closed.
pub trait NativeShareSheet: Send + Sync + 'static {
    fn present(&self, files: &[FileReference], options: &PresentOptions) -> Result<()>;
}

pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// Submits work to the context that owns the platform UI.
///
/// `submit` must not run the task inline on the caller's thread when that
/// would block it; completion is signalled by the task itself.
pub trait UiHandoff: Send + Sync + 'static {
    fn submit(&self, task: UiTask) -> Result<()>;
}

/// What a download writes out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadSource {
    Bytes(Vec<u8>),
    File(FileReference),
}

/// Writes out a file download. Blocking; the processor runs it on the
/// blocking pool and only waits for it on single-file shares.
pub trait DownloadSink: Send + Sync + 'static {
    fn download(&self, source: DownloadSource, filename: &str, content_type: &str) -> Result<()>;
}

pub enum ShareTarget {
    Native {
        sheet: Arc<dyn NativeShareSheet>,
        handoff: Arc<dyn UiHandoff>,
        cache: FileCache,
    },
    Download {
        sink: Arc<dyn DownloadSink>,
        /// Entry `i` is downloaded after `stagger * i`.
        stagger: Duration,
    },
}
