// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};
use std::collections::BTreeSet;

#[actix_web::test]
async fn tag_create_edit_delete_flow() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let req = test::TestRequest::get().uri("/tags/new").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = common::form_post("/tags/new", "name=Cat").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location_header(&resp), "/tags");
    assert!(common::notice_cookie_set(&resp));

    let tags = harness.repo.tags().await.expect("tags");
    assert_eq!(tags.len(), 1);
    let cat = &tags[0];
    assert_eq!(cat.name, "Cat");

    let req = test::TestRequest::get().uri("/tags").to_request();
    let resp = test::call_service(&app, req).await;
    let html = common::read_html(resp).await;
    assert!(html.contains("Cat"));

    let req = common::form_post(&format!("/tags/{}/edit", cat.id), "name=Kitten").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location_header(&resp), "/tags");
    assert_eq!(harness.repo.tag(cat.id).await.expect("tag").name, "Kitten");

    let req = common::form_post(&format!("/tags/{}/delete", cat.id), "").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location_header(&resp), "/tags");

    assert!(harness.repo.tags().await.expect("tags").is_empty());
}

#[actix_web::test]
async fn duplicate_tag_name_bounces_back_to_form() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    harness.repo.create_tag("Cat").await.expect("tag");

    let req = common::form_post("/tags/new", "name=Cat").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location_header(&resp), "/tags/new");
    assert!(common::notice_cookie_set(&resp));

    assert_eq!(harness.repo.tags().await.expect("tags").len(), 1);
}

#[actix_web::test]
async fn renaming_tag_to_taken_name_bounces_back() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let cat = harness.repo.create_tag("Cat").await.expect("tag");
    harness.repo.create_tag("Dog").await.expect("tag");

    let req = common::form_post(&format!("/tags/{}/edit", cat.id), "name=Dog").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        common::location_header(&resp),
        format!("/tags/{}/edit", cat.id)
    );
    assert_eq!(harness.repo.tag(cat.id).await.expect("tag").name, "Cat");
}

#[actix_web::test]
async fn tag_page_lists_its_posts() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let jane = harness
        .repo
        .create_user("Jane", "Doe", None)
        .await
        .expect("user");
    let cat = harness.repo.create_tag("Cat").await.expect("tag");
    let post = harness
        .repo
        .create_post(
            jane.id,
            "Cat Post!",
            "Hello Cat",
            &BTreeSet::from([cat.id]),
        )
        .await
        .expect("post");

    let req = test::TestRequest::get()
        .uri(&format!("/tags/{}", cat.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = common::read_html(resp).await;
    assert!(html.contains("<h1>Cat</h1>"));
    assert!(html.contains("Cat Post!"));

    // Deleting the post empties the tag's listing.
    harness.repo.delete_post(post.id).await.expect("delete");
    let req = test::TestRequest::get()
        .uri(&format!("/tags/{}", cat.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let html = common::read_html(resp).await;
    assert!(!html.contains("Cat Post!"));
}

#[actix_web::test]
async fn missing_tag_pages_are_404() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    for uri in ["/tags/999", "/tags/999/edit"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "GET {}", uri);
    }

    let req = common::form_post("/tags/999/delete", "").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
