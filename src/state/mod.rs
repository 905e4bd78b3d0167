/// State management module
///
/// This module handles all application state, including:
/// - Image data structures (data.rs)
/// - The edit session and its submission state machine (session.rs)
/// - Session gallery of results (gallery.rs)
/// - Key/value persistence across runs (store.rs)
/// - On-disk cache of edited results (results.rs)

pub mod data;
pub mod gallery;
pub mod results;
pub mod session;
pub mod store;
