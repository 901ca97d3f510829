use crate::errors::AppError;

/// Where stored media lives on disk and under which URL prefix it is served.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub root: String,
    pub url_prefix: String,
}

impl MediaConfig {
    pub fn new(root: impl Into<String>, url_prefix: &str) -> Self {
        let trimmed = url_prefix.trim_end_matches('/');
        Self {
            root: root.into(),
            url_prefix: if trimmed.is_empty() { "/media".to_string() } else { trimmed.to_string() },
        }
    }

    /// Public URL for a stored media reference.
    pub fn url(&self, reference: &str) -> String {
        format!("{}/{}", self.url_prefix, reference.trim_start_matches('/'))
    }

    /// Like [`MediaConfig::url`], but empty references resolve to nothing.
    pub fn url_opt(&self, reference: Option<&str>) -> Option<String> {
        reference
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(|r| self.url(r))
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self::new("media", "/media")
    }
}

/// Storage path for a file belonging to the slideshow with `slug`.
///
/// Both slideshow-level media (main image, music) and slide media are keyed by
/// the owning slideshow's slug, which is why slugs never change after creation.
pub fn upload_path(slug: &str, filename: &str) -> String {
    format!("slideshows/{slug}/{filename}")
}

/// Normalize a media reference typed into an admin form.
///
/// A bare filename is placed under the slideshow's upload directory; a value
/// that already contains a directory is kept as-is. Empty input means "no file".
pub fn normalize_reference(slug: &str, input: &str) -> Result<Option<String>, AppError> {
    let trimmed = input.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.split('/').any(|part| part == "..") {
        return Err(AppError::Validation(format!("Invalid media path: {trimmed}")));
    }
    if trimmed.contains('/') {
        Ok(Some(trimmed.to_string()))
    } else {
        Ok(Some(upload_path(slug, trimmed)))
    }
}
