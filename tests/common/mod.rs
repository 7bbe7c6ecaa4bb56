// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use inklet::app_state::AppState;
use inklet::blog::{BlogRepo, schema};
use inklet::bootstrap;
use inklet::config::ValidatedConfig;
use inklet::runtime_paths::RuntimePaths;
use inklet::site;
use inklet::util::test_fixtures::TestFixtureRoot;
use std::sync::Arc;

pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub config: Arc<ValidatedConfig>,
    pub runtime_paths: RuntimePaths,
    pub app_state: Arc<AppState>,
    pub repo: BlogRepo,
}

#[derive(Clone)]
pub struct AppBundle {
    pub config: Arc<ValidatedConfig>,
    pub app_state: Arc<AppState>,
    pub repo: BlogRepo,
}

impl TestHarness {
    pub async fn new() -> Self {
        let fixture = TestFixtureRoot::new_unique("site-test-suite").expect("fixture root");
        let result = bootstrap::bootstrap_runtime(fixture.path()).expect("bootstrap");

        let config = Arc::new(result.validated_config);
        let pool = schema::connect(&result.runtime_paths.database_file, 2)
            .await
            .expect("pool");
        schema::init_schema(&pool).await.expect("schema");

        let repo = BlogRepo::new(pool);
        let app_state = Arc::new(AppState::new(&config.app.name));

        Self {
            fixture,
            config,
            runtime_paths: result.runtime_paths,
            app_state,
            repo,
        }
    }

    pub fn app_bundle(&self) -> AppBundle {
        AppBundle {
            config: self.config.clone(),
            app_state: self.app_state.clone(),
            repo: self.repo.clone(),
        }
    }
}

pub fn build_test_app(
    bundle: AppBundle,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(bundle.config))
        .app_data(web::Data::from(bundle.app_state))
        .app_data(web::Data::new(bundle.repo))
        .configure(site::configure)
        .default_service(web::route().to(site::default_not_found))
}

pub fn form_post(uri: &str, payload: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload(payload.to_string())
}

pub fn location_header(resp: &ServiceResponse) -> String {
    resp.headers()
        .get("Location")
        .expect("location header")
        .to_str()
        .expect("location string")
        .to_string()
}

pub fn notice_cookie_set(resp: &ServiceResponse) -> bool {
    resp.response()
        .cookies()
        .any(|cookie| cookie.name() == "inklet_notice" && !cookie.value().is_empty())
}

pub async fn read_html(resp: ServiceResponse) -> String {
    let body = test::read_body(resp).await;
    String::from_utf8_lossy(&body).to_string()
}
