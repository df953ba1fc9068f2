// Template context structures for Askama templates, organized by view.

use crate::auth::session::{Flash, SessionContext};
use crate::config::AppConfig;

/// Common context shared by all pages.
/// Templates access these as `ctx.app_name`, `ctx.flash`, etc.
pub struct PageContext {
    pub app_name: String,
    pub authenticated: bool,
    pub flash: Option<Flash>,
    pub csrf_token: String,
    /// Shown as a badge on the table tab.
    pub record_count: usize,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &SessionContext, config: &AppConfig, current_path: &str, record_count: usize) -> Self {
        Self {
            app_name: config.app_name.clone(),
            authenticated: session.is_authenticated(),
            flash: session.take_flash(),
            csrf_token: session.csrf_token(),
            record_count,
            current_path: current_path.to_string(),
        }
    }

    /// Whether a navigation tab points at the current page.
    pub fn is_active(&self, path: &str) -> bool {
        self.current_path == path
    }
}

mod common;
mod record;

pub use common::*;
pub use record::*;
