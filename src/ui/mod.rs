/// View building blocks
///
/// - Header, input form and preview panes (panels.rs)
/// - Gallery grid (gallery.rs)

pub mod gallery;
pub mod panels;
