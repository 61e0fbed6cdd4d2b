//! Web front-end for docchat
//!
//! Serves the chat page and a small JSON API over per-session conversations.

mod config;
mod context;
mod error;
mod page;
mod server;
mod ui;

#[cfg(test)]
mod test_support;


pub use config::{
    DEFAULT_BIND, DEFAULT_PDF_DIR, DEFAULT_SESSION_IDLE_MINUTES, PageText, WebConfig,
};
pub use context::{AppContext, SharedSession};
pub use error::WebError;
pub use page::{PageView, load_logo, markdown_to_html, render_message, render_page};
pub use server::{AskResponse, HistoryResponse, SESSION_COOKIE, create_app, serve};
pub use ui::{display_banner, print_warning};

// Re-export core types
pub use docchat_core::{Error, Result};
