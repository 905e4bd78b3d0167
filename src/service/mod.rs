/// Edit service module
///
/// This module talks to the remote editing service:
/// - HTTP client, multipart upload and error-body parsing (client.rs)
/// - The full submission task: upload, decode, cache to disk (this file)

pub mod client;
#[cfg(test)]
pub(crate) mod stub;

pub use client::EditClient;

use std::path::PathBuf;

use crate::error::EditError;
use crate::state::data::EditedImage;
use crate::state::results;
use crate::state::session::{EditRequest, SubmissionToken};

/// Run one submission to completion
///
/// Returns the token alongside the outcome so the session can match the
/// completion to its request. Failing to cache the result on disk is not
/// an error; the result is still returned, just without a saved path.
pub async fn run_edit(
    client: EditClient,
    request: EditRequest,
    results_dir: PathBuf,
) -> (SubmissionToken, Result<EditedImage, EditError>) {
    let token = request.token;
    (token, edit_and_cache(&client, request, &results_dir).await)
}

async fn edit_and_cache(
    client: &EditClient,
    request: EditRequest,
    results_dir: &std::path::Path,
) -> Result<EditedImage, EditError> {
    let bytes = client.edit(request).await?;
    let mut image = EditedImage::decode(bytes)?;

    match results::save_result(results_dir, &image).await {
        Ok(path) => {
            tracing::debug!("💾 Saved result to {}", path.display());
            image.saved_to = Some(path);
        }
        Err(e) => {
            tracing::warn!(
                "⚠️  Could not cache result in {}: {}",
                results_dir.display(),
                e
            );
        }
    }

    Ok(image)
}
