// Template context structures for Askama templates, split by audience.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{get_username, take_flash};
use crate::config::AdminSite;

pub mod admin;
pub mod public;

pub use admin::*;
pub use public::*;

/// Common context shared by all admin console pages.
/// Templates access these as `ctx.username`, `ctx.site.site_header`, etc.
pub struct AdminContext {
    pub username: String,
    pub flash: Option<String>,
    pub csrf_token: String,
    pub site: AdminSite,
    pub current_path: String,
}

impl AdminContext {
    pub fn build(session: &Session, site: &AdminSite, current_path: &str) -> Self {
        Self {
            username: get_username(session).unwrap_or_default(),
            flash: take_flash(session),
            csrf_token: csrf::get_or_create_token(session),
            site: site.clone(),
            current_path: current_path.to_string(),
        }
    }

    /// Sidebar highlighting.
    pub fn is_active(&self, prefix: &str) -> bool {
        self.current_path.starts_with(prefix)
    }
}
