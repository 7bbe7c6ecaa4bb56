// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Placeholder shown for users who never supplied a profile image.
pub const DEFAULT_IMAGE_URL: &str = "https://bit.ly/2RD7Vny";

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_TAG_NAME_CHARS: usize = 30;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

// Join rows carry no identity of their own; the pair is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostTag {
    pub post_id: i64,
    pub tag_id: i64,
}

#[derive(Debug)]
pub enum BlogError {
    UserNotFound(i64),
    PostNotFound(i64),
    TagNotFound(i64),
    Validation(String),
    DuplicateTagName(String),
    Storage(sqlx::Error),
}

impl BlogError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BlogError::UserNotFound(_) | BlogError::PostNotFound(_) | BlogError::TagNotFound(_)
        )
    }
}

impl fmt::Display for BlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlogError::UserNotFound(id) => write!(f, "User not found: {}", id),
            BlogError::PostNotFound(id) => write!(f, "Post not found: {}", id),
            BlogError::TagNotFound(id) => write!(f, "Tag not found: {}", id),
            BlogError::Validation(msg) => write!(f, "{}", msg),
            BlogError::DuplicateTagName(name) => write!(f, "Tag name already exists: {}", name),
            BlogError::Storage(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for BlogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlogError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for BlogError {
    fn from(err: sqlx::Error) -> Self {
        BlogError::Storage(err)
    }
}

pub fn validate_user_names(first_name: &str, last_name: &str) -> Result<(), BlogError> {
    validate_required("First name", first_name, MAX_NAME_CHARS)?;
    validate_required("Last name", last_name, MAX_NAME_CHARS)
}

pub fn validate_post_fields(title: &str, content: &str) -> Result<(), BlogError> {
    validate_required("Title", title, MAX_TITLE_CHARS)?;
    if content.is_empty() {
        return Err(BlogError::Validation("Content is required".to_string()));
    }
    Ok(())
}

pub fn validate_tag_name(name: &str) -> Result<(), BlogError> {
    validate_required("Tag name", name, MAX_TAG_NAME_CHARS)
}

fn validate_required(field: &str, value: &str, max_chars: usize) -> Result<(), BlogError> {
    if value.is_empty() {
        return Err(BlogError::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > max_chars {
        return Err(BlogError::Validation(format!(
            "{} must be at most {} characters",
            field, max_chars
        )));
    }
    Ok(())
}

/// A blank or whitespace-only image URL falls back to the placeholder.
pub fn normalize_image_url(image_url: Option<&str>) -> String {
    match image_url.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => DEFAULT_IMAGE_URL.to_string(),
    }
}
