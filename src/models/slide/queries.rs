use sqlx::PgPool;

use crate::errors::AppError;
use super::ordering::{self, Direction, SlidePosition};
use super::types::*;

const SELECT_SLIDE: &str = "\
    SELECT sl.id, sl.slideshow_id, sl.media_type, sl.media_file, sl.caption, sl.caption_fa, sl.sort_order \
    FROM slides sl";

/// Slides of one slideshow in display order.
pub async fn find_for_slideshow(pool: &PgPool, slideshow_id: i64) -> Result<Vec<Slide>, AppError> {
    let rows = sqlx::query_as::<_, SlideRow>(&format!(
        "{SELECT_SLIDE} WHERE sl.slideshow_id = $1 ORDER BY sl.sort_order, sl.id"
    ))
    .bind(slideshow_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Slide::from).collect())
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Slide>, AppError> {
    let row = sqlx::query_as::<_, SlideRow>(&format!("{SELECT_SLIDE} WHERE sl.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Slide::from))
}

/// Create a slide; without an explicit order it goes after the current last one.
pub async fn create(pool: &PgPool, input: &SlideInput) -> Result<Slide, AppError> {
    let row = sqlx::query_as::<_, SlideRow>(
        "INSERT INTO slides (slideshow_id, media_type, media_file, caption, caption_fa, sort_order) \
         VALUES ($1, $2, $3, $4, $5, \
                 COALESCE($6, (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM slides WHERE slideshow_id = $1))) \
         RETURNING id, slideshow_id, media_type, media_file, caption, caption_fa, sort_order",
    )
    .bind(input.slideshow_id)
    .bind(input.media_type.as_str())
    .bind(&input.media_file)
    .bind(&input.caption.en)
    .bind(&input.caption.fa)
    .bind(input.order)
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}

/// Full edit of a slide. Without an explicit order the current one is kept.
pub async fn update(pool: &PgPool, id: i64, input: &SlideInput) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE slides SET slideshow_id = $1, media_type = $2, media_file = $3, \
             caption = $4, caption_fa = $5, sort_order = COALESCE($6, sort_order) \
         WHERE id = $7",
    )
    .bind(input.slideshow_id)
    .bind(input.media_type.as_str())
    .bind(&input.media_file)
    .bind(&input.caption.en)
    .bind(&input.caption.fa)
    .bind(input.order)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM slides WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Bulk action: set the selected slides' media type to image.
pub async fn set_media_type(pool: &PgPool, ids: &[i64], media_type: MediaType) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE slides SET media_type = $1 WHERE id = ANY($2)")
        .bind(media_type.as_str())
        .bind(ids)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Swap one slide with its neighbour in the given direction.
///
/// The parent slideshow row is locked first, then its slide rows in id
/// order. Moves within one slideshow therefore serialize and always take
/// their locks in the same sequence, whatever the current positions are.
/// Returns false when there is nothing to swap with (or the slide is gone).
pub async fn move_slide(pool: &PgPool, slide_id: i64, dir: Direction) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    let slideshow_id: Option<i64> = sqlx::query_scalar(
        "SELECT s.id FROM slideshows s \
         WHERE s.id = (SELECT slideshow_id FROM slides WHERE id = $1) \
         FOR UPDATE",
    )
    .bind(slide_id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some(slideshow_id) = slideshow_id else {
        return Ok(false);
    };

    let siblings = sqlx::query_as::<_, SlidePosition>(
        "SELECT id, slideshow_id, sort_order FROM slides \
         WHERE slideshow_id = $1 \
         ORDER BY id \
         FOR UPDATE",
    )
    .bind(slideshow_id)
    .fetch_all(&mut *tx)
    .await?;

    let Some(target) = siblings.iter().find(|s| s.id == slide_id).copied() else {
        return Ok(false);
    };
    let Some(other) = ordering::neighbour(&siblings, &target, dir) else {
        return Ok(false);
    };

    sqlx::query("UPDATE slides SET sort_order = $1 WHERE id = $2")
        .bind(other.order)
        .bind(target.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE slides SET sort_order = $1 WHERE id = $2")
        .bind(target.order)
        .bind(other.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    log::debug!(
        "Moved slide {} {:?}: order {} <-> {} (slide {})",
        target.id, dir, target.order, other.order, other.id
    );
    Ok(true)
}

/// Move a selection of slides, one swap per slide, in the batch order the
/// direction requires. Returns how many slides actually moved.
pub async fn move_slides(pool: &PgPool, ids: &[i64], dir: Direction) -> Result<usize, AppError> {
    let selected = sqlx::query_as::<_, SlidePosition>(
        "SELECT id, slideshow_id, sort_order FROM slides WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    let mut moved = 0;
    for id in ordering::batch_sequence(&selected, dir) {
        if move_slide(pool, id, dir).await? {
            moved += 1;
        }
    }
    Ok(moved)
}

#[derive(sqlx::FromRow)]
struct ListRow {
    #[sqlx(flatten)]
    slide: SlideRow,
    slideshow_title: String,
    slideshow_slug: String,
    owner_username: String,
}

impl From<ListRow> for SlideListItem {
    fn from(r: ListRow) -> Self {
        SlideListItem {
            slide: r.slide.into(),
            slideshow_title: r.slideshow_title,
            slideshow_slug: r.slideshow_slug,
            owner_username: r.owner_username,
        }
    }
}

/// Admin slide list, ordered by slideshow then position.
pub async fn find_paginated(
    pool: &PgPool,
    page: i64,
    per_page: i64,
    filter: &SlideFilter,
) -> Result<SlidePage, AppError> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 200);
    let offset = (page - 1) * per_page;

    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{q}%"));
    let media_type = filter.media_type.map(|m| m.as_str());

    const FROM_WHERE: &str = "\
        FROM slides sl \
        JOIN slideshows s ON s.id = sl.slideshow_id \
        JOIN users u ON u.id = s.owner_id \
        WHERE ($1::BIGINT IS NULL OR sl.slideshow_id = $1) \
          AND ($2::TEXT IS NULL OR sl.media_type = $2) \
          AND ($3::TEXT IS NULL \
               OR sl.caption ILIKE $3 OR sl.caption_fa ILIKE $3 \
               OR s.title ILIKE $3 OR s.title_fa ILIKE $3 \
               OR u.username ILIKE $3 OR s.slug ILIKE $3)";

    let total_count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {FROM_WHERE}"))
        .bind(filter.slideshow_id)
        .bind(media_type)
        .bind(&search)
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query_as::<_, ListRow>(&format!(
        "SELECT sl.id, sl.slideshow_id, sl.media_type, sl.media_file, sl.caption, sl.caption_fa, sl.sort_order, \
                s.title AS slideshow_title, s.slug AS slideshow_slug, u.username AS owner_username \
         {FROM_WHERE} \
         ORDER BY sl.slideshow_id, sl.sort_order, sl.id \
         LIMIT $4 OFFSET $5"
    ))
    .bind(filter.slideshow_id)
    .bind(media_type)
    .bind(&search)
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total_pages = (total_count + per_page - 1) / per_page;

    Ok(SlidePage {
        items: rows.into_iter().map(SlideListItem::from).collect(),
        page,
        per_page,
        total_count,
        total_pages,
    })
}

/// Every slideshow that has slides, with its slides in display order.
pub async fn find_groups(pool: &PgPool) -> Result<Vec<SlideGroup>, AppError> {
    let rows = sqlx::query_as::<_, ListRow>(
        "SELECT sl.id, sl.slideshow_id, sl.media_type, sl.media_file, sl.caption, sl.caption_fa, sl.sort_order, \
                s.title AS slideshow_title, s.slug AS slideshow_slug, u.username AS owner_username \
         FROM slides sl \
         JOIN slideshows s ON s.id = sl.slideshow_id \
         JOIN users u ON u.id = s.owner_id \
         ORDER BY s.created_at DESC, s.id DESC, sl.sort_order, sl.id",
    )
    .fetch_all(pool)
    .await?;

    let mut groups: Vec<SlideGroup> = Vec::new();
    for row in rows {
        let item = SlideListItem::from(row);
        match groups.last_mut() {
            Some(g) if g.slideshow_id == item.slide.slideshow_id => g.slides.push(item.slide),
            _ => groups.push(SlideGroup {
                slideshow_id: item.slide.slideshow_id,
                title: item.slideshow_title,
                slug: item.slideshow_slug,
                owner_username: item.owner_username,
                slides: vec![item.slide],
            }),
        }
    }
    Ok(groups)
}
