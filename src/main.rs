use iced::widget::{column, container, row, scrollable, text};
use iced::{event, window, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod service;
mod state;
mod ui;

use config::Config;
use error::EditError;
use service::EditClient;
use state::data::{EditedImage, PendingImage, SUPPORTED_EXTENSIONS};
use state::session::{Session, SubmissionState, SubmissionToken};
use state::store::{FileStore, KeyValueStore};

/// Main application state
struct MirageApp {
    config: Config,
    /// The edit session (input, submission state, results)
    session: Session,
    /// Cross-run store holding the last result reference
    store: FileStore,
    client: EditClient,
    results_dir: PathBuf,
    dark: bool,
    /// Service reachability line shown in the footer
    status: String,
    upload_hint: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the theme toggle
    ToggleTheme,
    /// User clicked "Choose Image"
    PickImage,
    /// A file is being dragged over the window
    FileHovered,
    /// The drag left the window without dropping
    FilesHoveredLeft,
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    PromptChanged(String),
    Submit,
    /// Background edit request finished
    EditFinished(SubmissionToken, Result<EditedImage, EditError>),
    /// Startup health check finished
    HealthChecked(Result<String, EditError>),
}

impl MirageApp {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::load();

        // The app cannot do anything useful without an HTTP client
        let client = EditClient::new(&config).expect("Failed to build HTTP client");

        let store = FileStore::open(config::data_dir().join("store.json"));
        let restored = restore_last_result(&store, &config.persist_key);
        let session = Session::new(restored);

        tracing::info!(
            "🎨 Mirage client initialized (service: {}, store: {})",
            client.edit_url(),
            store.path().display()
        );

        let upload_hint = format!(
            "PNG, JPG, GIF, WEBP or BMP up to {}MB",
            config.max_upload_bytes / (1024 * 1024)
        );

        let health_client = client.clone();
        let app = MirageApp {
            config,
            session,
            store,
            client,
            results_dir: config::results_dir(),
            dark: true,
            status: "Checking service...".to_string(),
            upload_hint,
        };

        (
            app,
            Task::perform(async move { health_client.health().await }, Message::HealthChecked),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ToggleTheme => {
                self.dark = !self.dark;
                Task::none()
            }
            Message::PickImage => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select an Image to Edit")
                    .add_filter("Images", &SUPPORTED_EXTENSIONS)
                    .pick_file();

                if let Some(path) = file {
                    self.load_image(&path);
                }

                Task::none()
            }
            Message::FileHovered => {
                self.session.set_dragging(true);
                Task::none()
            }
            Message::FilesHoveredLeft => {
                self.session.set_dragging(false);
                Task::none()
            }
            Message::FileDropped(path) => {
                self.load_image(&path);
                Task::none()
            }
            Message::PromptChanged(prompt) => {
                self.session.set_prompt(prompt);
                Task::none()
            }
            Message::Submit => {
                let Some(request) = self.session.submit() else {
                    if let Some(error) = self.session.error() {
                        tracing::warn!("⚠️  Submission rejected: {}", error);
                    }
                    return Task::none();
                };

                tracing::info!(
                    "🚀 Submitting #{} ({}, {} bytes) with prompt {:?}",
                    request.token,
                    request.file_name,
                    request.image.len(),
                    request.prompt
                );

                Task::perform(
                    service::run_edit(self.client.clone(), request, self.results_dir.clone()),
                    |(token, result)| Message::EditFinished(token, result),
                )
            }
            Message::EditFinished(token, result) => {
                if let Err(e) = &result {
                    tracing::error!("❌ Edit #{} failed ({}): {}", token, e.kind(), e);
                }

                let outcome = self.session.complete(token, result);

                if outcome == SubmissionState::Succeeded {
                    tracing::info!(
                        "✅ Edit #{} complete, {} in gallery",
                        token,
                        self.session.gallery().len()
                    );
                    self.persist_last_result();
                }

                Task::none()
            }
            Message::HealthChecked(result) => {
                self.status = match result {
                    Ok(message) => format!("Service online: {}", message),
                    Err(e) => {
                        tracing::warn!("⚠️  Service health check failed: {}", e);
                        format!("Service unreachable: {}", e)
                    }
                };
                Task::none()
            }
        }
    }

    /// Read, validate and install a picked or dropped file
    fn load_image(&mut self, path: &Path) {
        let loaded = PendingImage::load(path, self.config.max_upload_bytes);

        match &loaded {
            Ok(image) => tracing::info!(
                "📷 Selected {} ({:?}, {} bytes)",
                image.file_name,
                image.format,
                image.bytes.len()
            ),
            Err(e) => tracing::warn!("⚠️  Rejected {}: {}", path.display(), e),
        }

        self.session.select_image(loaded);
    }

    /// Remember the current result for the next run (best-effort)
    ///
    /// A result that never reached the disk cache cannot be restored, so
    /// any older reference is dropped rather than left pointing at a
    /// previous image.
    fn persist_last_result(&mut self) {
        let key = &self.config.persist_key;

        let outcome = match self.session.edited().and_then(|image| image.saved_to.as_ref()) {
            Some(path) => {
                self.store
                    .set(key, &path.to_string_lossy(), self.config.persist_days)
            }
            None => {
                tracing::warn!("⚠️  Latest result was not cached, clearing stored reference");
                self.store.remove(key)
            }
        };

        if let Err(e) = outcome {
            tracing::warn!("⚠️  Could not persist last result: {}", e);
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let panels = row![
            ui::panels::input_panel(&self.session, &self.upload_hint),
            ui::panels::image_panels(&self.session),
        ]
        .spacing(32);

        let content = column![ui::panels::header(self.dark), panels]
            .push_maybe(ui::gallery::gallery_view(self.session.gallery()))
            .push(text(&self.status).size(12))
            .spacing(32)
            .padding(32);

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Window file drag-and-drop events
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        if self.dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// Look up the persisted reference and reload the result it points to
///
/// The stored value is a path into the results cache; if the file has
/// been cleaned up since, the reference is dropped.
fn restore_last_result(store: &impl KeyValueStore, key: &str) -> Option<EditedImage> {
    let value = store.get(key)?;

    match EditedImage::restore(Path::new(&value)) {
        Some(image) => {
            tracing::info!("🔁 Restored last result from {}", value);
            Some(image)
        }
        None => {
            tracing::warn!("⚠️  Stored result {} no longer resolves, ignoring", value);
            None
        }
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mirage_client=info")),
        )
        .init();

    iced::application("Mirage", MirageApp::update, MirageApp::view)
        .theme(MirageApp::theme)
        .subscription(MirageApp::subscription)
        .centered()
        .run_with(MirageApp::new)
}
