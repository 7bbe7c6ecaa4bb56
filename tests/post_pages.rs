// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::{http::StatusCode, test};

#[actix_web::test]
async fn post_create_edit_delete_flow() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let jane = harness
        .repo
        .create_user("Jane", "Doe", None)
        .await
        .expect("user");
    let cat = harness.repo.create_tag("Cat").await.expect("tag");
    let dog = harness.repo.create_tag("Dog").await.expect("tag");

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}/posts/new", jane.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = common::read_html(resp).await;
    assert!(html.contains("Cat"));
    assert!(html.contains("Dog"));

    let req = common::form_post(
        &format!("/users/{}/posts", jane.id),
        &format!("title=Hello&content=World&tags={}&tags={}", cat.id, dog.id),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = common::location_header(&resp);
    assert!(location.starts_with("/posts/"));
    assert!(common::notice_cookie_set(&resp));

    let posts = harness.repo.posts_by_user(jane.id).await.expect("posts");
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.title, "Hello");

    let req = test::TestRequest::get().uri(&location).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = common::read_html(resp).await;
    assert!(html.contains("<h1>Hello</h1>"));
    assert!(html.contains("World"));
    assert!(html.contains("Jane Doe"));
    assert!(html.contains("Cat"));
    assert!(html.contains("Dog"));

    // Swap the tag set from {Cat, Dog} to {Dog} while editing the title.
    let req = common::form_post(
        &format!("/posts/{}/edit", post.id),
        &format!("title=Hello+again&content=World&tags={}", dog.id),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location_header(&resp), format!("/posts/{}", post.id));

    let updated = harness.repo.post(post.id).await.expect("post");
    assert_eq!(updated.title, "Hello again");
    let tags = harness.repo.tags_for_post(post.id).await.expect("tags");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "Dog");

    let req = common::form_post(&format!("/posts/{}/delete", post.id), "").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location_header(&resp), format!("/users/{}", jane.id));

    assert!(harness.repo.posts_by_user(jane.id).await.expect("posts").is_empty());
    assert!(harness.repo.posts_for_tag(dog.id).await.expect("posts").is_empty());
}

#[actix_web::test]
async fn post_without_title_bounces_back_to_form() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let jane = harness
        .repo
        .create_user("Jane", "Doe", None)
        .await
        .expect("user");

    let req = common::form_post(
        &format!("/users/{}/posts", jane.id),
        "title=&content=World",
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        common::location_header(&resp),
        format!("/users/{}/posts/new", jane.id)
    );

    assert!(harness.repo.posts_by_user(jane.id).await.expect("posts").is_empty());
}

#[actix_web::test]
async fn post_for_missing_user_is_404() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let req = test::TestRequest::get().uri("/users/999/posts/new").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = common::form_post("/users/999/posts", "title=Hello&content=World").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn post_with_stale_tag_id_is_404_and_rolled_back() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let jane = harness
        .repo
        .create_user("Jane", "Doe", None)
        .await
        .expect("user");

    // A tag deleted between form render and submit.
    let req = common::form_post(
        &format!("/users/{}/posts", jane.id),
        "title=Hello&content=World&tags=999",
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert!(harness.repo.posts_by_user(jane.id).await.expect("posts").is_empty());
}

#[actix_web::test]
async fn non_numeric_tag_id_is_bad_request() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    let jane = harness
        .repo
        .create_user("Jane", "Doe", None)
        .await
        .expect("user");

    let req = common::form_post(
        &format!("/users/{}/posts", jane.id),
        "title=Hello&content=World&tags=abc",
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_post_pages_are_404() {
    let harness = common::TestHarness::new().await;
    let app = test::init_service(common::build_test_app(harness.app_bundle())).await;

    for uri in ["/posts/999", "/posts/999/edit"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "GET {}", uri);
    }

    let req = common::form_post("/posts/999/delete", "").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
