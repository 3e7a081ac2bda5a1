use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tauri::{
    plugin::{PluginApi, PluginHandle},
    AppHandle, Manager, Runtime,
};

use crate::cache::FileCache;
use crate::config::Config;
use crate::host::{NativeShareSheet, PresentOptions, ShareTarget, UiHandoff, UiTask};
use crate::normalize::FileReference;
use crate::processor::ShareRequestProcessor;
use crate::{models::*, Result};

#[cfg(target_os = "android")]
const PLUGIN_IDENTIFIER: &str = "plugin.filesharer";

#[cfg(target_os = "ios")]
tauri::ios_plugin_binding!(init_plugin_file_sharer);

// initializes the Kotlin or Swift plugin classes
pub fn init<R: Runtime, C: DeserializeOwned>(
    app: &AppHandle<R>,
    api: PluginApi<R, C>,
    config: &Config,
) -> Result<FileSharer<R>> {
    #[cfg(target_os = "android")]
    let handle = api.register_android_plugin(PLUGIN_IDENTIFIER, "FileSharerPlugin")?;
    #[cfg(target_os = "ios")]
    let handle = api.register_ios_plugin(init_plugin_file_sharer)?;

    let cache = FileCache::new(app.path().app_cache_dir()?.join(&config.cache_dir_name));
    let target = ShareTarget::Native {
        sheet: Arc::new(MobileShareSheet(handle)),
        handoff: Arc::new(BridgeHandoff),
        cache,
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

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PresentPayload {
    files: Vec<String>,
    content_types: Vec<String>,
    title: Option<String>,
}

struct MobileShareSheet<R: Runtime>(PluginHandle<R>);

impl<R: Runtime> NativeShareSheet for MobileShareSheet<R> {
    fn present(&self, files: &[FileReference], options: &PresentOptions) -> Result<()> {
        let payload = PresentPayload {
            files: files.iter().map(FileReference::to_native_string).collect(),
            content_types: options.content_types.clone(),
            title: options.chooser_title.clone(),
        };
        // The native side resolves with an empty object once the sheet closes.
        self.0
            .run_mobile_plugin::<serde_json::Value>("presentShareSheet", payload)
            .map(|_| ())
            .map_err(Into::into)
    }
}

/// The Kotlin and Swift plugins move presentation onto their main queue
/// themselves, so the blocking bridge call only needs a worker thread.
struct BridgeHandoff;

impl UiHandoff for BridgeHandoff {
    fn submit(&self, task: UiTask) -> Result<()> {
        tauri::async_runtime::spawn_blocking(task);
        Ok(())
    }
}
