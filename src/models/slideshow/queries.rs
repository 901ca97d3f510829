use std::collections::HashSet;

use sqlx::{Connection, PgConnection, PgPool};

use crate::errors::{AppError, is_unique_violation};
use crate::i18n::Localized;
use crate::media;
use super::slug;
use super::types::*;

/// Unique constraint guarding `slideshows.slug`.
pub const SLUG_CONSTRAINT: &str = "slideshows_slug_key";

/// Allocation rounds before a slug race is reported instead of retried.
const MAX_SLUG_ATTEMPTS: u32 = 5;

/// Column width of `slideshows.title`.
const MAX_TITLE_LEN: usize = 200;

const SELECT_SLIDESHOW: &str = "\
    SELECT s.id, s.owner_id, s.title, s.title_fa, s.date_of_birth, s.date_of_death, \
           s.description, s.description_fa, s.main_image, s.music, \
           s.profile_theme, s.slide_theme, s.slug, s.created_at, s.is_public, s.visit_count \
    FROM slideshows s";

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Slideshow>, AppError> {
    let row = sqlx::query_as::<_, SlideshowRow>(&format!("{SELECT_SLIDESHOW} WHERE s.slug = $1"))
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Slideshow::from))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Slideshow>, AppError> {
    let mut conn = pool.acquire().await?;
    find_by_id_with(&mut conn, id).await
}

async fn find_by_id_with(conn: &mut PgConnection, id: i64) -> Result<Option<Slideshow>, AppError> {
    let row = sqlx::query_as::<_, SlideshowRow>(&format!("{SELECT_SLIDESHOW} WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(Slideshow::from))
}

/// Slugs already in use that a candidate for `base` could collide with.
async fn taken_slugs(conn: &mut PgConnection, base: &str) -> Result<HashSet<String>, sqlx::Error> {
    let pattern = format!("{}%", slug::shared_prefix(base));
    let rows: Vec<String> = sqlx::query_scalar("SELECT slug FROM slideshows WHERE slug LIKE $1")
        .bind(pattern)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Create a slideshow, allocating its slug from the English title.
pub async fn create(pool: &PgPool, new: &NewSlideshow) -> Result<Slideshow, AppError> {
    let mut tx = pool.begin().await?;
    let created = create_with(&mut tx, new).await?;
    tx.commit().await?;
    Ok(created)
}

/// Create inside the caller's transaction.
///
/// Allocations sharing a slug prefix are serialized by an advisory lock
/// held until that transaction ends, so each one sees the slugs committed
/// before it. The unique constraint stays the final arbiter for writers
/// that bypass the lock: a collision there triggers a fresh allocation.
pub async fn create_with(conn: &mut PgConnection, new: &NewSlideshow) -> Result<Slideshow, AppError> {
    let base = slug::base_slug(&new.title.en)?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(slug::shared_prefix(&base))
        .execute(&mut *conn)
        .await?;

    for attempt in 1..=MAX_SLUG_ATTEMPTS {
        let taken = taken_slugs(conn, &base).await?;
        let slug = slug::allocate(&base, |s| taken.contains(s));

        let main_image = match &new.main_image {
            Some(r) => media::normalize_reference(&slug, r)?,
            None => None,
        };
        let music = match &new.music {
            Some(r) => media::normalize_reference(&slug, r)?,
            None => None,
        };

        // Savepoint, so a lost race does not poison an enclosing transaction.
        let mut sp = conn.begin().await?;
        let inserted = sqlx::query_as::<_, SlideshowRow>(
            "INSERT INTO slideshows \
                 (owner_id, title, title_fa, date_of_birth, date_of_death, description, description_fa, \
                  main_image, music, profile_theme, slide_theme, slug, is_public) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING id, owner_id, title, title_fa, date_of_birth, date_of_death, \
                       description, description_fa, main_image, music, \
                       profile_theme, slide_theme, slug, created_at, is_public, visit_count",
        )
        .bind(new.owner_id)
        .bind(new.title.en.trim())
        .bind(new.title.fa.trim())
        .bind(new.date_of_birth)
        .bind(new.date_of_death)
        .bind(&new.description.en)
        .bind(&new.description.fa)
        .bind(main_image)
        .bind(music)
        .bind(new.profile_theme.as_str())
        .bind(new.slide_theme.as_str())
        .bind(&slug)
        .bind(new.is_public)
        .fetch_one(&mut *sp)
        .await;

        match inserted {
            Ok(row) => {
                sp.commit().await?;
                log::info!("Created slideshow {} with slug '{}'", row.id, row.slug);
                return Ok(row.into());
            }
            Err(e) if is_unique_violation(&e, SLUG_CONSTRAINT) => {
                sp.rollback().await?;
                log::warn!("Slug '{slug}' was taken concurrently (attempt {attempt}), reallocating");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Consistency(format!(
        "could not allocate a unique slug for '{base}' after {MAX_SLUG_ATTEMPTS} attempts"
    )))
}

/// Update the editable fields. The slug is deliberately absent from the statement.
pub async fn update(pool: &PgPool, id: i64, upd: &SlideshowUpdate) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE slideshows SET owner_id = $1, title = $2, title_fa = $3, \
             date_of_birth = $4, date_of_death = $5, description = $6, description_fa = $7, \
             main_image = $8, music = $9, profile_theme = $10, slide_theme = $11, is_public = $12 \
         WHERE id = $13",
    )
    .bind(upd.owner_id)
    .bind(upd.title.en.trim())
    .bind(upd.title.fa.trim())
    .bind(upd.date_of_birth)
    .bind(upd.date_of_death)
    .bind(&upd.description.en)
    .bind(&upd.description.fa)
    .bind(&upd.main_image)
    .bind(&upd.music)
    .bind(upd.profile_theme.as_str())
    .bind(upd.slide_theme.as_str())
    .bind(upd.is_public)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a slideshow; its slides go with it (FK cascade).
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM slideshows WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Count one visit and return the new total.
///
/// A single `visit_count + 1` statement, so simultaneous viewers never lose
/// each other's increments. Callers have already loaded the slideshow, so a
/// missing row means it was deleted in between.
pub async fn increment_visit_count(pool: &PgPool, id: i64) -> Result<i64, AppError> {
    let count: Option<i64> = sqlx::query_scalar(
        "UPDATE slideshows SET visit_count = visit_count + 1 WHERE id = $1 RETURNING visit_count",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    count.ok_or_else(|| {
        AppError::Consistency(format!("slideshow {id} vanished before its visit was counted"))
    })
}

/// Bulk visibility change. Returns the number of slideshows updated.
pub async fn set_public(pool: &PgPool, ids: &[i64], is_public: bool) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE slideshows SET is_public = $1 WHERE id = ANY($2)")
        .bind(is_public)
        .bind(ids)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Copy a slideshow and all its slides into a new, private slideshow.
///
/// The copy is titled "<title> (Copy)", gets a freshly allocated slug and a
/// zero visit count; slides keep their media, captions and order values.
pub async fn duplicate(pool: &PgPool, id: i64) -> Result<Slideshow, AppError> {
    let mut tx = pool.begin().await?;

    let source = find_by_id_with(&mut tx, id).await?.ok_or(AppError::NotFound)?;

    let copy_title = copy_title(&source.title.en);
    let new = NewSlideshow {
        owner_id: source.owner_id,
        title: Localized::new(copy_title, source.title.fa.clone()),
        date_of_birth: source.date_of_birth,
        date_of_death: source.date_of_death,
        description: source.description.clone(),
        main_image: source.main_image.clone(),
        music: source.music.clone(),
        profile_theme: source.profile_theme,
        slide_theme: source.slide_theme,
        is_public: false,
    };
    let copy = create_with(&mut tx, &new).await?;

    let copied = sqlx::query(
        "INSERT INTO slides (slideshow_id, media_type, media_file, caption, caption_fa, sort_order) \
         SELECT $1, media_type, media_file, caption, caption_fa, sort_order \
         FROM slides WHERE slideshow_id = $2 ORDER BY sort_order, id",
    )
    .bind(copy.id)
    .bind(source.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    log::info!(
        "Duplicated slideshow {} as {} ('{}', {} slides)",
        source.id,
        copy.id,
        copy.slug,
        copied.rows_affected()
    );
    Ok(copy)
}

fn copy_title(title: &str) -> String {
    const SUFFIX: &str = " (Copy)";
    let room = MAX_TITLE_LEN - SUFFIX.chars().count();
    let stem: String = title.trim().chars().take(room).collect();
    format!("{stem}{SUFFIX}")
}

/// Admin list: newest first, with owner and slide count.
pub async fn find_paginated(
    pool: &PgPool,
    page: i64,
    per_page: i64,
    filter: &SlideshowFilter,
) -> Result<SlideshowPage, AppError> {
    #[derive(sqlx::FromRow)]
    struct Row {
        #[sqlx(flatten)]
        slideshow: SlideshowRow,
        owner_username: String,
        slide_count: i64,
    }

    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let offset = (page - 1) * per_page;

    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{q}%"));
    let theme = filter.theme.map(|t| t.as_str());

    const WHERE: &str = "\
        WHERE ($1::TEXT IS NULL \
               OR s.title ILIKE $1 OR s.title_fa ILIKE $1 OR s.slug ILIKE $1 \
               OR u.username ILIKE $1 OR u.email ILIKE $1 \
               OR s.description ILIKE $1 OR s.description_fa ILIKE $1) \
          AND ($2::BOOLEAN IS NULL OR s.is_public = $2) \
          AND ($3::BIGINT IS NULL OR s.owner_id = $3) \
          AND ($4::TEXT IS NULL OR s.profile_theme = $4 OR s.slide_theme = $4)";

    let total_count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM slideshows s JOIN users u ON u.id = s.owner_id {WHERE}"
    ))
    .bind(&search)
    .bind(filter.is_public)
    .bind(filter.owner_id)
    .bind(theme)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, Row>(&format!(
        "SELECT s.id, s.owner_id, s.title, s.title_fa, s.date_of_birth, s.date_of_death, \
                s.description, s.description_fa, s.main_image, s.music, \
                s.profile_theme, s.slide_theme, s.slug, s.created_at, s.is_public, s.visit_count, \
                u.username AS owner_username, \
                (SELECT COUNT(*) FROM slides sl WHERE sl.slideshow_id = s.id) AS slide_count \
         FROM slideshows s JOIN users u ON u.id = s.owner_id \
         {WHERE} \
         ORDER BY s.created_at DESC, s.id DESC \
         LIMIT $5 OFFSET $6"
    ))
    .bind(&search)
    .bind(filter.is_public)
    .bind(filter.owner_id)
    .bind(theme)
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|r| SlideshowListItem {
            slideshow: r.slideshow.into(),
            owner_username: r.owner_username,
            slide_count: r.slide_count,
        })
        .collect();

    let total_pages = (total_count + per_page - 1) / per_page;

    Ok(SlideshowPage { items, page, per_page, total_count, total_pages })
}

/// (id, title) pairs for the slide form's slideshow dropdown.
pub async fn find_choices(pool: &PgPool) -> Result<Vec<(i64, String)>, AppError> {
    let rows: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, title FROM slideshows ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_title_appends_suffix_within_column() {
        assert_eq!(copy_title("Jane Doe"), "Jane Doe (Copy)");
        let long = "x".repeat(250);
        assert_eq!(copy_title(&long).chars().count(), MAX_TITLE_LEN);
    }
}
