mod document_view;
mod status_bar;

pub use document_view::DocumentWidget;
pub use status_bar::StatusBarWidget;
