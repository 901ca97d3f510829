//! Slide ordering against the database: single swaps, batch moves, appends.

mod common;

use memoir::i18n::Localized;
use memoir::models::slide::{self, Direction, MediaType, SlideFilter, SlideInput};
use common::*;

/// A slideshow with slides A..D at orders 1..4. Returns (slideshow id, slide ids).
async fn four_slides(pool: &sqlx::PgPool) -> (i64, Vec<i64>) {
    let owner = insert_user(pool, "owner", false).await;
    let show = insert_slideshow(pool, owner, "Ordering").await;
    let mut ids = Vec::new();
    for (order, caption) in (1..).zip(["A", "B", "C", "D"]) {
        ids.push(insert_slide(pool, show.id, order, caption).await.id);
    }
    (show.id, ids)
}

#[tokio::test]
async fn test_move_up_swaps_with_previous() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let (show, ids) = four_slides(pool).await;

    assert!(slide::move_slide(pool, ids[2], Direction::Up).await.expect("move"));
    assert_eq!(captions_in_order(pool, show).await, ["A", "C", "B", "D"]);

    let c = slide::find_by_id(pool, ids[2]).await.expect("find").expect("exists");
    let b = slide::find_by_id(pool, ids[1]).await.expect("find").expect("exists");
    assert_eq!((c.order, b.order), (2, 3));
}

#[tokio::test]
async fn test_moves_past_the_ends_are_noops() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let (show, ids) = four_slides(pool).await;

    assert!(!slide::move_slide(pool, ids[0], Direction::Up).await.expect("move"));
    assert!(!slide::move_slide(pool, ids[3], Direction::Down).await.expect("move"));
    assert!(!slide::move_slide(pool, 999_999, Direction::Down).await.expect("move"));
    assert_eq!(captions_in_order(pool, show).await, ["A", "B", "C", "D"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_all_succeed() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let owner = insert_user(pool, "owner", false).await;
    let show = insert_slideshow(pool, owner, "Busy").await;
    let mut ids = Vec::new();
    for (order, caption) in (1..).zip(["A", "B", "C", "D", "E", "F"]) {
        ids.push(insert_slide(pool, show.id, order, caption).await.id);
    }

    let mut handles = Vec::new();
    for i in 0..120 {
        let pool = pool.clone();
        let id = ids[i % ids.len()];
        let dir = if i % 2 == 0 { Direction::Up } else { Direction::Down };
        handles.push(tokio::spawn(async move { slide::move_slide(&pool, id, dir).await }));
    }
    for handle in handles {
        handle.await.expect("join").expect("move never fails");
    }

    let mut orders: Vec<i32> = slide::find_for_slideshow(pool, show.id)
        .await
        .expect("slides")
        .into_iter()
        .map(|s| s.order)
        .collect();
    orders.sort();
    assert_eq!(orders, [1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_batch_move_down_keeps_selection_together() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let (show, ids) = four_slides(pool).await;

    let moved = slide::move_slides(pool, &[ids[1], ids[2]], Direction::Down).await.expect("move");
    assert_eq!(moved, 2);
    assert_eq!(captions_in_order(pool, show).await, ["A", "D", "B", "C"]);
}

#[tokio::test]
async fn test_batch_move_up_processes_in_ascending_order() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let (show, ids) = four_slides(pool).await;

    slide::move_slides(pool, &[ids[2], ids[1]], Direction::Up).await.expect("move");
    assert_eq!(captions_in_order(pool, show).await, ["B", "C", "A", "D"]);
}

#[tokio::test]
async fn test_batch_spanning_slideshows() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let (first, first_ids) = four_slides(pool).await;
    let owner = insert_user(pool, "other", false).await;
    let second = insert_slideshow(pool, owner, "Second").await;
    let x = insert_slide(pool, second.id, 1, "X").await;
    insert_slide(pool, second.id, 2, "Y").await;

    slide::move_slides(pool, &[first_ids[0], x.id], Direction::Down).await.expect("move");
    assert_eq!(captions_in_order(pool, first).await, ["B", "A", "C", "D"]);
    assert_eq!(captions_in_order(pool, second.id).await, ["Y", "X"]);
}

#[tokio::test]
async fn test_create_without_order_appends() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let (show, _) = four_slides(pool).await;

    let input = SlideInput {
        slideshow_id: show,
        media_type: MediaType::Video,
        media_file: "slideshows/ordering/clip.mp4".to_string(),
        caption: Localized::new("E".to_string(), String::new()),
        order: None,
    };
    let created = slide::create(pool, &input).await.expect("create");
    assert_eq!(created.order, 5);
    assert_eq!(captions_in_order(pool, show).await, ["A", "B", "C", "D", "E"]);
}

#[tokio::test]
async fn test_first_slide_gets_order_one() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let owner = insert_user(pool, "owner", false).await;
    let show = insert_slideshow(pool, owner, "Empty").await;

    let input = SlideInput {
        slideshow_id: show.id,
        media_type: MediaType::Image,
        media_file: "slideshows/empty/one.jpg".to_string(),
        caption: Localized::default(),
        order: None,
    };
    assert_eq!(slide::create(pool, &input).await.expect("create").order, 1);
}

#[tokio::test]
async fn test_bulk_change_to_image() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let (show, ids) = four_slides(pool).await;

    let input = SlideInput {
        slideshow_id: show,
        media_type: MediaType::Gif,
        media_file: "slideshows/ordering/anim.gif".to_string(),
        caption: Localized::new("G".to_string(), String::new()),
        order: None,
    };
    let gif = slide::create(pool, &input).await.expect("create");

    let updated = slide::set_media_type(pool, &[gif.id, ids[0]], MediaType::Image).await.expect("update");
    assert_eq!(updated, 2);
    let reloaded = slide::find_by_id(pool, gif.id).await.expect("find").expect("exists");
    assert_eq!(reloaded.media_type, MediaType::Image);
}

#[tokio::test]
async fn test_grouped_and_filtered_listing() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let (show, _) = four_slides(pool).await;

    let groups = slide::find_groups(pool).await.expect("groups");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].slideshow_id, show);
    assert_eq!(groups[0].slides.len(), 4);
    assert_eq!(groups[0].owner_username, "owner");

    let filter = SlideFilter { search: Some("c".to_string()), slideshow_id: Some(show), ..Default::default() };
    let page = slide::find_paginated(pool, 1, 50, &filter).await.expect("page");
    // Neither the title "Ordering" nor the owner name contains a "c".
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].slide.caption.en, "C");
}
