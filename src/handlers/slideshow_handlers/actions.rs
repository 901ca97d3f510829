use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::csrf;
use crate::errors::AppError;
use crate::handlers::admin_handlers::{ActionForm, redirect_with_flash};
use crate::models::slideshow;

const LIST: &str = "/admin/slideshows";

/// POST /admin/slideshows/actions: bulk actions on the selected slideshows.
pub async fn run(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let form = ActionForm::from_pairs(form.into_inner());
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if form.ids.is_empty() {
        return Ok(redirect_with_flash(
            &session,
            LIST,
            "Items must be selected in order to perform actions on them. No items have been changed.",
        ));
    }

    let msg = match form.action.as_str() {
        "make_public" => {
            let updated = slideshow::set_public(&pool, &form.ids, true).await?;
            format!("{updated} slideshow(s) marked as public.")
        }
        "make_private" => {
            let updated = slideshow::set_public(&pool, &form.ids, false).await?;
            format!("{updated} slideshow(s) marked as private.")
        }
        "duplicate" => {
            let mut count = 0;
            for id in &form.ids {
                match slideshow::duplicate(&pool, *id).await {
                    Ok(_) => count += 1,
                    // Deleted since the list was rendered
                    Err(AppError::NotFound) => log::warn!("Slideshow {id} vanished before it could be duplicated"),
                    Err(e) => return Err(e),
                }
            }
            format!("{count} slideshow(s) duplicated successfully.")
        }
        _ => "No action selected.".to_string(),
    };

    Ok(redirect_with_flash(&session, LIST, msg))
}
