//! Public pages and the JSON API: language resolution, visit counting,
//! visibility and not-found handling.

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use memoir::models::slideshow;
use common::*;

fn body_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[actix_web::test]
async fn test_lang_param_is_remembered_in_session() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let owner = insert_user(pool, "owner", false).await;
    insert_slideshow(pool, owner, "Jane Doe").await;
    let app = init_app!(pool);

    let req = test::TestRequest::get().uri("/slideshows/jane-doe/?lang=fa").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp).expect("language stored in session");
    let html = body_text(&test::read_body(resp).await);
    assert!(html.contains(r#"lang="fa" dir="rtl""#));
    // 2024-03-20 is the first day of 1403 in the Jalali calendar.
    assert!(html.contains("1403/01/01"));
    assert!(html.contains("Jane Doe (fa)"));

    // No parameter: the session decides.
    let req = test::TestRequest::get().uri("/slideshows/jane-doe/").cookie(cookie.clone()).to_request();
    let html = body_text(&test::call_and_read_body(&app, req).await);
    assert!(html.contains(r#"lang="fa""#));

    // Unsupported parameter: still the session value.
    let req = test::TestRequest::get().uri("/slideshows/jane-doe/?lang=de").cookie(cookie).to_request();
    let html = body_text(&test::call_and_read_body(&app, req).await);
    assert!(html.contains(r#"lang="fa""#));
}

#[actix_web::test]
async fn test_unsupported_lang_without_session_is_english() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let owner = insert_user(pool, "owner", false).await;
    insert_slideshow(pool, owner, "Jane Doe").await;
    let app = init_app!(pool);

    let req = test::TestRequest::get().uri("/slideshows/jane-doe/?lang=xx").to_request();
    let html = body_text(&test::call_and_read_body(&app, req).await);
    assert!(html.contains(r#"lang="en" dir="ltr""#));
    assert!(html.contains("2024-03-20"));
}

#[actix_web::test]
async fn test_legacy_routes_force_language() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let owner = insert_user(pool, "owner", false).await;
    let show = insert_slideshow(pool, owner, "Jane Doe").await;
    insert_slide(pool, show.id, 1, "first").await;

    let app = init_app!(pool);

    let req = test::TestRequest::get().uri("/slideshows/jane-doe/show/fa/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp).expect("language stored in session");
    let html = body_text(&test::read_body(resp).await);
    assert!(html.contains("first fa"));

    let req = test::TestRequest::get().uri("/slideshows/jane-doe/en/").cookie(cookie).to_request();
    let html = body_text(&test::call_and_read_body(&app, req).await);
    assert!(html.contains(r#"lang="en""#));
}

#[actix_web::test]
async fn test_slides_page_lists_slides_in_order() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let owner = insert_user(pool, "owner", false).await;
    let show = insert_slideshow(pool, owner, "Jane Doe").await;
    insert_slide(pool, show.id, 2, "second").await;
    insert_slide(pool, show.id, 1, "first").await;
    insert_slide(pool, show.id, 3, "third").await;
    let app = init_app!(pool);

    let req = test::TestRequest::get().uri("/slideshows/jane-doe/show/").to_request();
    let html = body_text(&test::call_and_read_body(&app, req).await);
    let first = html.find(">first<").expect("first caption");
    let second = html.find(">second<").expect("second caption");
    let third = html.find(">third<").expect("third caption");
    assert!(first < second && second < third);
}

#[actix_web::test]
async fn test_profile_start_button_autoplays_the_player() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let owner = insert_user(pool, "owner", false).await;
    let show = insert_slideshow(pool, owner, "Jane Doe").await;
    insert_slide(pool, show.id, 1, "first").await;
    let app = init_app!(pool);

    let req = test::TestRequest::get().uri("/slideshows/jane-doe/?lang=en").to_request();
    let html = body_text(&test::call_and_read_body(&app, req).await);
    assert!(html.contains("/slideshows/jane-doe/show/?lang=en&amp;autoplay=true"));

    let req = test::TestRequest::get().uri("/slideshows/jane-doe/show/?lang=en&autoplay=true").to_request();
    let html = body_text(&test::call_and_read_body(&app, req).await);
    assert!(html.contains(r#"data-autoplay="true""#));
    assert!(html.contains(r#"<script src="/static/js/slide.js"></script>"#));
    assert!(html.contains(r#"data-action="next""#));
    assert!(html.contains(r#"data-order="1" data-type="image""#));

    let req = test::TestRequest::get().uri("/slideshows/jane-doe/show/fa/").to_request();
    let html = body_text(&test::call_and_read_body(&app, req).await);
    assert!(html.contains(r#"data-autoplay="false""#));
    assert!(html.contains("توقف"));
}

#[actix_web::test]
async fn test_each_page_view_counts_once() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let owner = insert_user(pool, "owner", false).await;
    let show = insert_slideshow(pool, owner, "Jane Doe").await;
    let app = init_app!(pool);

    for uri in ["/slideshows/jane-doe/", "/slideshows/jane-doe/show/", "/slideshows/jane-doe/fa/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
    // The API is a read without a visit.
    let req = test::TestRequest::get().uri("/api/v1/slideshows/jane-doe").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let reloaded = slideshow::find_by_id(pool, show.id).await.expect("find").expect("exists");
    assert_eq!(reloaded.visit_count, 3);
}

#[actix_web::test]
async fn test_api_returns_localized_view() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let owner = insert_user(pool, "owner", false).await;
    let show = insert_slideshow(pool, owner, "Jane Doe").await;
    insert_slide(pool, show.id, 2, "second").await;
    insert_slide(pool, show.id, 1, "first").await;
    let app = init_app!(pool);

    let req = test::TestRequest::get().uri("/api/v1/slideshows/jane-doe?lang=fa").to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["slug"], "jane-doe");
    assert_eq!(json["lang"], "fa");
    assert_eq!(json["title"], "Jane Doe (fa)");
    assert_eq!(json["died"]["date"], "1403/01/01");
    assert_eq!(json["slide_theme"], "serene");
    assert_eq!(json["slides"][0]["caption"], "first fa");
    assert_eq!(json["slides"][1]["caption"], "second fa");
    assert_eq!(json["main_image_url"], "/media/slideshows/jane-doe/portrait.jpg");
}

#[actix_web::test]
async fn test_unknown_slug_is_not_found() {
    let Some(db) = setup_test_db().await else { return };
    let app = init_app!(db.pool());

    let req = test::TestRequest::get().uri("/slideshows/nobody/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let html = body_text(&test::read_body(resp).await);
    assert!(html.contains("404"));

    let req = test::TestRequest::get().uri("/api/v1/slideshows/nobody").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_private_slideshow_is_hidden_from_visitors() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();
    let owner = insert_user(pool, "owner", false).await;
    let show = insert_slideshow(pool, owner, "Jane Doe").await;
    slideshow::set_public(pool, &[show.id], false).await.expect("set_public");
    let app = init_app!(pool);

    for uri in ["/slideshows/jane-doe/", "/slideshows/jane-doe/show/", "/api/v1/slideshows/jane-doe"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let reloaded = slideshow::find_by_id(pool, show.id).await.expect("find").expect("exists");
    assert_eq!(reloaded.visit_count, 0);
}
