/// The edit session: one record holding all UI-facing state
///
/// The application owns exactly one `Session` and mutates it only
/// through the transitions below. Nothing here performs I/O; `submit`
/// hands back an `EditRequest` that the caller turns into the network
/// call, and `complete` applies whatever came back.
use bytes::Bytes;

use super::data::{EditedImage, PendingImage};
use super::gallery::Gallery;
use crate::error::EditError;

/// Identifies one submission from start to completion
pub type SubmissionToken = u64;

/// Lifecycle of an edit request
///
/// `Succeeded` and `Failed` are passed through on completion and
/// reported to the caller; the session itself rests in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting { token: SubmissionToken },
    Succeeded,
    Failed,
}

/// Everything needed to issue one edit request
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub token: SubmissionToken,
    pub file_name: String,
    pub mime_type: &'static str,
    pub image: Bytes,
    pub prompt: String,
}

#[derive(Debug)]
pub struct Session {
    pending: Option<PendingImage>,
    prompt: String,
    state: SubmissionState,
    /// Most recent successful result
    edited: Option<EditedImage>,
    /// Whether `edited` is shown; cleared by new selections and submissions
    edited_visible: bool,
    error: Option<String>,
    gallery: Gallery,
    dragging: bool,
    next_token: SubmissionToken,
}

impl Session {
    /// Start a session, optionally showing a result restored from a previous run
    ///
    /// The restored result is displayed but never enters the gallery.
    pub fn new(restored: Option<EditedImage>) -> Self {
        Self {
            pending: None,
            prompt: String::new(),
            state: SubmissionState::Idle,
            edited_visible: restored.is_some(),
            edited: restored,
            error: None,
            gallery: Gallery::new(),
            dragging: false,
            next_token: 1,
        }
    }

    /// Apply the outcome of a file pick or drop
    ///
    /// Any previous pending image, displayed result and error are cleared.
    /// An in-flight request is not affected.
    pub fn select_image(&mut self, loaded: Result<PendingImage, EditError>) {
        self.edited_visible = false;
        self.error = None;
        self.pending = None;
        self.dragging = false;

        match loaded {
            Ok(image) => self.pending = Some(image),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn set_prompt(&mut self, prompt: String) {
        self.prompt = prompt;
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        self.pending.is_some() && !self.is_submitting()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting { .. })
    }

    /// Try to start a submission
    ///
    /// Returns `None` if a request is already in flight (nothing changes),
    /// or if the image or prompt is missing (the validation message is set).
    pub fn submit(&mut self) -> Option<EditRequest> {
        if self.is_submitting() {
            return None;
        }

        let pending = match &self.pending {
            Some(pending) if !self.prompt.is_empty() => pending,
            _ => {
                self.error = Some(EditError::missing_input().to_string());
                return None;
            }
        };

        let token = self.next_token;
        self.next_token += 1;

        let request = EditRequest {
            token,
            file_name: pending.file_name.clone(),
            mime_type: pending.mime_type(),
            image: pending.bytes.clone(),
            prompt: self.prompt.clone(),
        };

        self.error = None;
        self.edited_visible = false;
        self.state = SubmissionState::Submitting { token };

        Some(request)
    }

    /// Apply the result of a finished request
    ///
    /// Results are applied in completion order, even if the user has
    /// picked another image since. Returns the state that was passed through.
    pub fn complete(
        &mut self,
        token: SubmissionToken,
        result: Result<EditedImage, EditError>,
    ) -> SubmissionState {
        if self.state == (SubmissionState::Submitting { token }) {
            self.state = SubmissionState::Idle;
        }

        match result {
            Ok(image) => {
                self.gallery.prepend(image.clone());
                self.edited = Some(image);
                self.edited_visible = true;
                self.error = None;
                SubmissionState::Succeeded
            }
            Err(e) => {
                self.error = Some(e.to_string());
                SubmissionState::Failed
            }
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn pending(&self) -> Option<&PendingImage> {
        self.pending.as_ref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Latest successful result, shown or not
    pub fn edited(&self) -> Option<&EditedImage> {
        self.edited.as_ref()
    }

    /// Result currently on screen
    pub fn displayed_result(&self) -> Option<&EditedImage> {
        self.edited.as_ref().filter(|_| self.edited_visible)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
