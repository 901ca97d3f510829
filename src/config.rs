use actix_web::cookie::Key;

use crate::media::MediaConfig;

/// Branding shown by the admin console. Built once at startup.
#[derive(Debug, Clone)]
pub struct AdminSite {
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
}

impl Default for AdminSite {
    fn default() -> Self {
        Self {
            site_header: "Memory Slideshow Administration".to_string(),
            site_title: "Memory Admin".to_string(),
            index_title: "Welcome to Memory Slideshow Administration".to_string(),
        }
    }
}

/// Process configuration, read from the environment (and `.env` if present).
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub session_key: Key,
    pub static_root: String,
    pub media: MediaConfig,
    pub admin_site: AdminSite,
    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let defaults = AdminSite::default();
        let admin_site = AdminSite {
            site_header: env_or("SITE_HEADER", &defaults.site_header),
            site_title: env_or("SITE_TITLE", &defaults.site_title),
            index_title: env_or("INDEX_TITLE", &defaults.index_title),
        };

        Ok(Self {
            database_url,
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:8080"),
            session_key: session_key_from_env(),
            static_root: env_or("STATIC_ROOT", "static"),
            media: MediaConfig::new(env_or("MEDIA_ROOT", "media"), &env_or("MEDIA_URL", "/media")),
            admin_site,
            admin_username: env_or("ADMIN_USERNAME", "admin"),
            admin_password: env_or("ADMIN_PASSWORD", "admin123"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

// Session encryption key: SESSION_KEY keeps language choices and logins valid across restarts.
fn session_key_from_env() -> Key {
    match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    }
}
