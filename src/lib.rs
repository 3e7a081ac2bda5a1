//! # tauri-plugin-file-sharer
//!
//! A Tauri plugin to share files through the native share sheet on iOS and Android.
//! On desktop there is no share sheet, so the same calls download the files into the
//! user's Downloads directory instead.
//!
//! Files are given either as Base64 content or as a path to a file that already exists.
//! Base64 content is decoded into the app cache directory before the share sheet opens;
//! those files are left for the OS to reclaim.
//!
//! ## Installation
//!
//! ```sh
//! # Cargo.toml
//! [dependencies]
//! tauri-plugin-file-sharer = { git = "https://github.com/vnidrop/plugin-file-sharer" }
//! ```
//!
//! ## Usage
//!
//! ### Rust
//!
//! ```rust,ignore
//! // src/main.rs
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(tauri_plugin_file_sharer::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! The plugin reads optional settings from `tauri.conf.json`:
//!
//! ```json
//! {
//!   "plugins": {
//!     "file-sharer": {
//!       "downloadStaggerMs": 100,
//!       "cacheDirName": "file-sharer",
//!       "defaultDialogTitle": "Share"
//!     }
//!   }
//! }
//! ```
//!
//! ### Frontend (JavaScript/TypeScript)
//!
//! ```js
//! import { invoke } from '@tauri-apps/api/core';
//!
//! // One file from Base64 content
//! await invoke('plugin:file-sharer|share', {
//!   options: { filename: 'notes.txt', contentType: 'text/plain', base64Data: 'aGVsbG8=' },
//! });
//!
//! // Several files already on disk
//! await invoke('plugin:file-sharer|share_multiple', {
//!   options: { files: ['/path/a.png', '/path/b.pdf'], dialogTitle: 'Send to' },
//! });
//!
//! // Several files from Base64 content
//! await invoke('plugin:file-sharer|share_multiple', {
//!   options: { filenameArray: ['a.txt', 'b.json'], base64DataArray: ['YQ==', 'e30='] },
//! });
//! ```
//!
//! Failures reject with one of the `ERR_*` codes listed on [`Error::code`].

use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

pub use models::*;

#[cfg(desktop)]
mod desktop;
#[cfg(mobile)]
mod mobile;

mod cache;
mod codec;
mod commands;
mod config;
mod error;
mod models;
mod processor;

pub mod content_type;
pub mod host;
pub mod normalize;

pub use cache::FileCache;
pub use config::Config;
pub use error::{Error, Result};
pub use processor::ShareRequestProcessor;

#[cfg(desktop)]
use desktop::FileSharer;
#[cfg(mobile)]
use mobile::FileSharer;

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the file sharer APIs.
pub trait FileSharerExt<R: Runtime> {
    fn file_sharer(&self) -> &FileSharer<R>;
}

impl<R: Runtime, T: Manager<R>> crate::FileSharerExt<R> for T {
    fn file_sharer(&self) -> &FileSharer<R> {
        self.state::<FileSharer<R>>().inner()
    }
}

/// Initializes the plugin.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new("file-sharer")
        .invoke_handler(tauri::generate_handler![
            commands::share,
            commands::share_multiple,
        ])
        .setup(|app, api| {
            let config = api.config().clone().unwrap_or_default();
            #[cfg(mobile)]
            let file_sharer = mobile::init(app, api, &config)?;
            #[cfg(desktop)]
            let file_sharer = desktop::init(app, api, &config)?;
            app.manage(file_sharer);
            Ok(())
        })
        .build()
}
