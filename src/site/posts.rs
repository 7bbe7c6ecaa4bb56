// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::app_state::AppState;
use crate::blog::{BlogError, BlogRepo, Post, Tag};
use crate::config::ValidatedConfig;
use crate::site::notice::{self, NoticeLevel};
use crate::site::{error, forms::FormData, render_page};
use actix_web::{HttpRequest, HttpResponse, Result, web};
use minijinja::{Value, context};
use serde::Serialize;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{id}/posts/new", web::get().to(new_form))
        .route("/users/{id}/posts", web::post().to(create))
        .route("/posts/{id}", web::get().to(show))
        .route("/posts/{id}/edit", web::get().to(edit_form))
        .route("/posts/{id}/edit", web::post().to(update))
        .route("/posts/{id}/delete", web::post().to(delete));
}

// Checkbox row for the tag picker on the post forms.
#[derive(Debug, Serialize)]
struct TagChoice {
    id: i64,
    name: String,
    checked: bool,
}

fn tag_choices(all_tags: Vec<Tag>, selected: &[Tag]) -> Vec<TagChoice> {
    all_tags
        .into_iter()
        .map(|tag| {
            let checked = selected.iter().any(|s| s.id == tag.id);
            TagChoice {
                id: tag.id,
                name: tag.name,
                checked,
            }
        })
        .collect()
}

fn format_created_at(post: &Post) -> String {
    post.created_at.format("%Y-%m-%d %H:%M UTC").to_string()
}

async fn new_form(
    req: HttpRequest,
    path: web::Path<i64>,
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
    repo: web::Data<BlogRepo>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let user = match repo.user(user_id).await {
        Ok(user) => user,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    let tags = match repo.tags().await {
        Ok(tags) => tags,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    render_page(
        &req,
        &app_state,
        "post_new.html",
        context! {
            app_name => &config.app.name,
            notice => Value::from_serialize(notice::take_notice(&req)),
            user => Value::from_serialize(&user),
            tags => Value::from_serialize(&tag_choices(tags, &[])),
        },
    )
}

async fn create(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
    repo: web::Data<BlogRepo>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let form = match FormData::parse(&body) {
        Ok(form) => form,
        Err(err) => return Ok(error::serve_400(&err.to_string())),
    };
    let tag_ids = match form.id_set("tags") {
        Ok(ids) => ids,
        Err(err) => return Ok(error::serve_400(&err.to_string())),
    };

    match repo
        .create_post(user_id, form.value("title"), form.value("content"), &tag_ids)
        .await
    {
        Ok(post) => {
            log::info!("Post {} created for user {}", post.id, user_id);
            Ok(notice::redirect_with_notice(
                &format!("/posts/{}", post.id),
                NoticeLevel::Success,
                &format!("Post '{}' added!", post.title),
            ))
        }
        Err(BlogError::Validation(message)) => Ok(notice::redirect_with_notice(
            &format!("/users/{}/posts/new", user_id),
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
    let post = match repo.post(id).await {
        Ok(post) => post,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    let author = match repo.user(post.user_id).await {
        Ok(user) => user,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    let tags = match repo.tags_for_post(post.id).await {
        Ok(tags) => tags,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    let created_at = format_created_at(&post);
    render_page(
        &req,
        &app_state,
        "post_show.html",
        context! {
            app_name => &config.app.name,
            notice => Value::from_serialize(notice::take_notice(&req)),
            post => Value::from_serialize(&post),
            created_at => created_at,
            author => Value::from_serialize(&author),
            tags => Value::from_serialize(&tags),
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
    let post = match repo.post(id).await {
        Ok(post) => post,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    let selected = match repo.tags_for_post(post.id).await {
        Ok(tags) => tags,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    let all_tags = match repo.tags().await {
        Ok(tags) => tags,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    render_page(
        &req,
        &app_state,
        "post_edit.html",
        context! {
            app_name => &config.app.name,
            notice => Value::from_serialize(notice::take_notice(&req)),
            post => Value::from_serialize(&post),
            tags => Value::from_serialize(&tag_choices(all_tags, &selected)),
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
    let tag_ids = match form.id_set("tags") {
        Ok(ids) => ids,
        Err(err) => return Ok(error::serve_400(&err.to_string())),
    };

    match repo
        .update_post(id, form.value("title"), form.value("content"), &tag_ids)
        .await
    {
        Ok(post) => Ok(notice::redirect_with_notice(
            &format!("/posts/{}", post.id),
            NoticeLevel::Success,
            &format!("Post '{}' updated", post.title),
        )),
        Err(BlogError::Validation(message)) => Ok(notice::redirect_with_notice(
            &format!("/posts/{}/edit", id),
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
    let post = match repo.post(id).await {
        Ok(post) => post,
        Err(err) => return error::serve_blog_error(&err, &app_state),
    };
    match repo.delete_post(id).await {
        Ok(()) => {
            log::info!("Post {} deleted", id);
            Ok(notice::redirect_with_notice(
                &format!("/users/{}", post.user_id),
                NoticeLevel::Danger,
                &format!("Post '{}' deleted", post.title),
            ))
        }
        Err(err) => error::serve_blog_error(&err, &app_state),
    }
}
