use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;
use crate::error::{EditError, GENERIC_API_ERROR};
use crate::state::session::EditRequest;

/// Body of a failed edit response
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Body of the service root
#[derive(Deserialize)]
struct RootBody {
    message: String,
}

/// HTTP client for the edit service
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct EditClient {
    http: Client,
    edit_url: String,
    root_url: String,
}

impl EditClient {
    pub fn new(config: &Config) -> Result<Self, EditError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            edit_url: config.edit_endpoint(),
            root_url: config.root_endpoint(),
        })
    }

    pub fn edit_url(&self) -> &str {
        &self.edit_url
    }

    /// Upload an image and prompt, returning the edited image bytes
    ///
    /// Sends `image` (file part) and `prompt` (text) as multipart form data.
    /// Any 2xx body is returned whole; other statuses become `Remote` errors
    /// carrying the body's `error` field or the generic fallback.
    pub async fn edit(&self, request: EditRequest) -> Result<Bytes, EditError> {
        let length = request.image.len() as u64;
        let part = Part::stream_with_length(request.image, length)
            .file_name(request.file_name)
            .mime_str(request.mime_type)?;

        let form = Form::new()
            .part("image", part)
            .text("prompt", request.prompt);

        let response = self.http.post(&self.edit_url).multipart(form).send().await?;
        let response = check_status(response).await?;

        Ok(response.bytes().await?)
    }

    /// Ask the service root for its greeting message
    pub async fn health(&self) -> Result<String, EditError> {
        let response = self.http.get(&self.root_url).send().await?;
        let body = check_status(response).await?.bytes().await?;

        serde_json::from_slice::<RootBody>(&body)
            .map(|root| root.message)
            .map_err(|e| EditError::MalformedResponse(e.to_string()))
    }
}

/// Turn a non-2xx response into a `Remote` error
///
/// The error body is read leniently: if it cannot be read at all the
/// message falls back like any other unparseable body.
async fn check_status(response: Response) -> Result<Response, EditError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    Err(EditError::Remote {
        status: status.as_u16(),
        message: remote_error_message(&body),
    })
}

/// Extract the user-facing message from a failed response body
pub fn remote_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| GENERIC_API_ERROR.to_string())
}
