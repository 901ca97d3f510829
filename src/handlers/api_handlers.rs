use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::i18n;
use crate::media::MediaConfig;
use crate::models::slide;
use crate::models::slideshow::SlideshowView;
use super::public_handlers::{LangQuery, find_visible};

/// GET /api/v1/slideshows/{slug}: the slide player's view model as JSON.
/// Reads do not count as visits here.
pub async fn slideshow(
    pool: web::Data<PgPool>,
    media: web::Data<MediaConfig>,
    session: Session,
    path: web::Path<String>,
    query: web::Query<LangQuery>,
) -> Result<HttpResponse, AppError> {
    let show = match find_visible(&pool, &session, &path).await {
        Ok(show) => show,
        Err(AppError::NotFound) => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "error": "Slideshow not found"
            })));
        }
        Err(e) => return Err(e),
    };
    let lang = i18n::resolve_language(&session, query.lang.as_deref());
    let slides = slide::find_for_slideshow(&pool, show.id).await?;

    Ok(HttpResponse::Ok().json(SlideshowView::build(&show, &slides, lang, &media)))
}
