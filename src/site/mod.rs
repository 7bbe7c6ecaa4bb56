// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod error;
pub mod forms;
pub mod notice;
pub mod posts;
pub mod tags;
pub mod users;

use crate::app_state::AppState;
use crate::templates::render_minijinja_template;
use actix_web::{HttpRequest, HttpResponse, Result, web};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(redirect_to_user_list));
    users::configure(cfg);
    posts::configure(cfg);
    tags::configure(cfg);
}

async fn redirect_to_user_list() -> Result<HttpResponse> {
    Ok(notice::redirect("/users"))
}

pub async fn default_not_found(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    error::serve_404(
        &app_state.error_renderer,
        Some(app_state.templates.as_ref()),
    )
}

/// Render a page template; a pending notice cookie is cleared alongside the
/// response so the message shows exactly once.
pub(crate) fn render_page(
    req: &HttpRequest,
    app_state: &AppState,
    template: &str,
    context: minijinja::Value,
) -> Result<HttpResponse> {
    let had_notice = req.cookie(notice::NOTICE_COOKIE).is_some();
    match render_minijinja_template(app_state.templates.as_ref(), template, context) {
        Ok(html) => {
            let mut builder = HttpResponse::Ok();
            builder.content_type("text/html; charset=utf-8");
            if had_notice {
                builder.cookie(notice::clearing_cookie());
            }
            Ok(builder.body(html))
        }
        Err(e) => {
            log::error!("Failed to render template '{}': {}", template, e);
            error::serve_500(
                &app_state.error_renderer,
                Some(app_state.templates.as_ref()),
            )
        }
    }
}
