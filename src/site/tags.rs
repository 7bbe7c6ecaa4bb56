// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::app_state::AppState;
use crate::blog::{BlogError, BlogRepo};
use crate::config::ValidatedConfig;
use crate::site::notice::{self, NoticeLevel};
use crate::site::{error, forms::FormData, render_page};
use actix_web::{HttpRequest, HttpResponse, Result, web};
use minijinja::{Value, context};

pub fn configure(cfg: &mut web::ServiceConfig) {
    // "/tags/new" must register ahead of "/tags/{id}".
    cfg.route("/tags", web::get().to(index))
        .route("/tags/new", web::get().to(new_form))
        .route("/tags/new", web::post().to(create))
        .route("/tags/{id}", web::get().to(show))
        .route("/tags/{id}/edit", web::get().to(edit_form))
        .route("/tags/{id}/edit", web::post().to(update))
        .route("/tags/{id}/delete", web::post().to(delete));
}

async fn index(
    req: HttpRequest,
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
    repo: web::Data<BlogRepo>,
) -> Result<HttpResponse> {
    let tags = match repo.tags().await {
        Ok(tags) => tags,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    render_page(
        &req,
        &app_state,
        "tags_index.html",
        context! {
            app_name => &config.app.name,
            notice => Value::from_serialize(notice::take_notice(&req)),
            tags => Value::from_serialize(&tags),
        },
    )
}

async fn new_form(
    req: HttpRequest,
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse> {
    render_page(
        &req,
        &app_state,
        "tag_new.html",
        context! {
            app_name => &config.app.name,
            notice => Value::from_serialize(notice::take_notice(&req)),
        },
    )
}

async fn create(
    app_state: web::Data<AppState>,
    repo: web::Data<BlogRepo>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let form = match FormData::parse(&body) {
        Ok(form) => form,
        Err(err) => return Ok(error::serve_400(&err.to_string())),
    };

    match repo.create_tag(form.value("name")).await {
        Ok(tag) => {
            log::info!("Tag {} created", tag.id);
            Ok(notice::redirect_with_notice(
                "/tags",
                NoticeLevel::Success,
                &format!("Tag '{}' added!", tag.name),
            ))
        }
        Err(BlogError::Validation(message)) => Ok(notice::redirect_with_notice(
            "/tags/new",
            NoticeLevel::Danger,
            &message,
        )),
        Err(BlogError::DuplicateTagName(name)) => Ok(notice::redirect_with_notice(
            "/tags/new",
            NoticeLevel::Danger,
            &format!("Tag name '{}' is already taken", name),
        )),
        Err(err) => error::serve_blog_error(&err, &app_state),
    }
}

async fn show(
    req: HttpRequest,
    path: web::Path<i64>,
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
    repo: web::Data<BlogRepo>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let tag = match repo.tag(id).await {
        Ok(tag) => tag,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    let posts = match repo.posts_for_tag(tag.id).await {
        Ok(posts) => posts,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    render_page(
        &req,
        &app_state,
        "tag_show.html",
        context! {
            app_name => &config.app.name,
            notice => Value::from_serialize(notice::take_notice(&req)),
            tag => Value::from_serialize(&tag),
            posts => Value::from_serialize(&posts),
        },
    )
}

async fn edit_form(
    req: HttpRequest,
    path: web::Path<i64>,
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
    repo: web::Data<BlogRepo>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let tag = match repo.tag(id).await {
        Ok(tag) => tag,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    render_page(
        &req,
        &app_state,
        "tag_edit.html",
        context! {
            app_name => &config.app.name,
            notice => Value::from_serialize(notice::take_notice(&req)),
            tag => Value::from_serialize(&tag),
        },
    )
}

async fn update(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
    repo: web::Data<BlogRepo>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let form = match FormData::parse(&body) {
        Ok(form) => form,
        Err(err) => return Ok(error::serve_400(&err.to_string())),
    };

    match repo.update_tag(id, form.value("name")).await {
        Ok(tag) => Ok(notice::redirect_with_notice(
            "/tags",
            NoticeLevel::Success,
            &format!("Tag '{}' updated", tag.name),
        )),
        Err(BlogError::Validation(message)) => Ok(notice::redirect_with_notice(
            &format!("/tags/{}/edit", id),
            NoticeLevel::Danger,
            &message,
        )),
        Err(BlogError::DuplicateTagName(name)) => Ok(notice::redirect_with_notice(
            &format!("/tags/{}/edit", id),
            NoticeLevel::Danger,
            &format!("Tag name '{}' is already taken", name),
        )),
        Err(err) => error::serve_blog_error(&err, &app_state),
    }
}

async fn delete(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
    repo: web::Data<BlogRepo>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let tag = match repo.tag(id).await {
        Ok(tag) => tag,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    match repo.delete_tag(id).await {
        Ok(()) => {
            log::info!("Tag {} deleted", id);
            Ok(notice::redirect_with_notice(
                "/tags",
                NoticeLevel::Danger,
                &format!("Tag '{}' deleted", tag.name),
            ))
        }
        Err(err) => error::serve_blog_error(&err, &app_state),
    }
}
