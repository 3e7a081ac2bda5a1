use tauri::{command, AppHandle, Runtime};

use crate::{error, models, FileSharerExt};

#[command]
pub async fn share<R: Runtime>(
    app: AppHandle<R>,
    options: models::ShareFileOptions,
) -> Result<(), error::Error> {
    app.file_sharer().share(options).await
}

#[command]
pub async fn share_multiple<R: Runtime>(
    app: AppHandle<R>,
    options: models::ShareMultipleFileOptions,
) -> Result<(), error::Error> {
    app.file_sharer().share_multiple(options).await
}
