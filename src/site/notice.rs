// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

pub const NOTICE_COOKIE: &str = "inklet_notice";
const NOTICE_MAX_AGE_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Danger,
}

impl NoticeLevel {
    fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Danger => "danger",
        }
    }
}

/// A transient message carried across one redirect, shown once.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub level: String,
    pub message: String,
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header(("Location", location))
        .finish()
}

pub fn redirect_with_notice(location: &str, level: NoticeLevel, message: &str) -> HttpResponse {
    let payload = format!("{}:{}", level.as_str(), urlencoding::encode(message));
    let cookie = Cookie::build(NOTICE_COOKIE, payload)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(NOTICE_MAX_AGE_SECONDS))
        .finish();
    HttpResponse::Found()
        .insert_header(("Location", location))
        .cookie(cookie)
        .finish()
}

/// The notice pending on this request, if any. Unknown levels and mangled
/// payloads are dropped rather than rendered.
pub fn take_notice(req: &HttpRequest) -> Option<Notice> {
    let cookie = req.cookie(NOTICE_COOKIE)?;
    let (level, encoded) = cookie.value().split_once(':')?;
    if level != "success" && level != "danger" {
        return None;
    }
    let message = urlencoding::decode(encoded).ok()?.into_owned();
    Some(Notice {
        level: level.to_string(),
        message,
    })
}

pub fn clearing_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(NOTICE_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}
