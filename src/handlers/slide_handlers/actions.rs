use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::csrf;
use crate::errors::AppError;
use crate::handlers::admin_handlers::{ActionForm, redirect_with_flash};
use crate::models::slide::{self, Direction, MediaType};

const LIST: &str = "/admin/slides";

/// POST /admin/slides/actions: reorder or retype the selected slides.
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
        "move_up" => {
            let moved = slide::move_slides(&pool, &form.ids, Direction::Up).await?;
            log::debug!("Bulk move up: {moved} of {} slides moved", form.ids.len());
            "Selected slides moved up.".to_string()
        }
        "move_down" => {
            let moved = slide::move_slides(&pool, &form.ids, Direction::Down).await?;
            log::debug!("Bulk move down: {moved} of {} slides moved", form.ids.len());
            "Selected slides moved down.".to_string()
        }
        "to_image" => {
            let updated = slide::set_media_type(&pool, &form.ids, MediaType::Image).await?;
            format!("{updated} slide(s) changed to image type.")
        }
        _ => "No action selected.".to_string(),
    };

    Ok(redirect_with_flash(&session, LIST, msg))
}
