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
    // "/users/new" must register ahead of "/users/{id}".
    cfg.route("/users", web::get().to(index))
        .route("/users", web::post().to(create))
        .route("/users/new", web::get().to(new_form))
        .route("/users/{id}", web::get().to(show))
        .route("/users/{id}/edit", web::get().to(edit_form))
        .route("/users/{id}/edit", web::post().to(update))
        .route("/users/{id}/delete", web::post().to(delete));
}

async fn index(
    req: HttpRequest,
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
    repo: web::Data<BlogRepo>,
) -> Result<HttpResponse> {
    let users = match repo.users().await {
        Ok(users) => users,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    render_page(
        &req,
        &app_state,
        "users_index.html",
        context! {
            app_name => &config.app.name,
            notice => Value::from_serialize(notice::take_notice(&req)),
            users => Value::from_serialize(&users),
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
        "user_new.html",
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

    match repo
        .create_user(
            form.value("first_name"),
            form.value("last_name"),
            Some(form.value("image_url")),
        )
        .await
    {
        Ok(user) => {
            log::info!("User {} created", user.id);
            Ok(notice::redirect_with_notice(
                "/users",
                NoticeLevel::Success,
                &format!("User {} {} added!", user.first_name, user.last_name),
            ))
        }
        Err(BlogError::Validation(message)) => Ok(notice::redirect_with_notice(
            "/users/new",
            NoticeLevel::Danger,
            &message,
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
    let user = match repo.user(id).await {
        Ok(user) => user,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    let posts = match repo.posts_by_user(user.id).await {
        Ok(posts) => posts,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    render_page(
        &req,
        &app_state,
        "user_show.html",
        context! {
            app_name => &config.app.name,
            notice => Value::from_serialize(notice::take_notice(&req)),
            user => Value::from_serialize(&user),
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
    let user = match repo.user(id).await {
        Ok(user) => user,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    render_page(
        &req,
        &app_state,
        "user_edit.html",
        context! {
            app_name => &config.app.name,
            notice => Value::from_serialize(notice::take_notice(&req)),
            user => Value::from_serialize(&user),
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

    match repo
        .update_user(
            id,
            form.value("first_name"),
            form.value("last_name"),
            form.value("image_url"),
        )
        .await
    {
        Ok(user) => Ok(notice::redirect_with_notice(
            "/users",
            NoticeLevel::Success,
            &format!("User {} {} updated", user.first_name, user.last_name),
        )),
        Err(BlogError::Validation(message)) => Ok(notice::redirect_with_notice(
            &format!("/users/{}/edit", id),
            NoticeLevel::Danger,
            &message,
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
    // Fetched first so the farewell message can name the user.
    let user = match repo.user(id).await {
        Ok(user) => user,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    match repo.delete_user(id).await {
        Ok(()) => {
            log::info!("User {} deleted with all owned posts", id);
            Ok(notice::redirect_with_notice(
                "/users",
                NoticeLevel::Danger,
                &format!("{} {} deleted", user.first_name, user.last_name),
            ))
        }
        Err(err) => error::serve_blog_error(&err, &app_state),
    }
}
