// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{
    BlogError, Post, Tag, User, normalize_image_url, validate_post_fields, validate_tag_name,
    validate_user_names,
};
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::{Sqlite, Transaction};
use std::collections::BTreeSet;

/// All persistence goes through this repository. One call is one logical
/// operation; multi-statement mutations run inside a single transaction so a
/// failure mid-cascade leaves nothing half-deleted.
#[derive(Clone)]
pub struct BlogRepo {
    pool: SqlitePool,
}

impl BlogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        image_url: Option<&str>,
    ) -> Result<User, BlogError> {
        validate_user_names(first_name, last_name)?;
        let image_url = normalize_image_url(image_url);
        let result =
            sqlx::query("INSERT INTO users (first_name, last_name, image_url) VALUES (?1, ?2, ?3)")
                .bind(first_name)
                .bind(last_name)
                .bind(&image_url)
                .execute(&self.pool)
                .await?;
        Ok(User {
            id: result.last_insert_rowid(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            image_url,
        })
    }

    pub async fn user(&self, id: i64) -> Result<User, BlogError> {
        sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, image_url FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BlogError::UserNotFound(id))
    }

    pub async fn users(&self) -> Result<Vec<User>, BlogError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, image_url FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// Full overwrite of all three fields; a blank image URL normalizes to
    /// the placeholder, same as on create.
    pub async fn update_user(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
        image_url: &str,
    ) -> Result<User, BlogError> {
        validate_user_names(first_name, last_name)?;
        let image_url = normalize_image_url(Some(image_url));
        let result = sqlx::query(
            "UPDATE users SET first_name = ?1, last_name = ?2, image_url = ?3 WHERE id = ?4",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(&image_url)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(BlogError::UserNotFound(id));
        }
        Ok(User {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            image_url,
        })
    }

    /// Cascade: the user's posts' tag associations, then the posts, then the
    /// user row, all in one transaction.
    pub async fn delete_user(&self, id: i64) -> Result<(), BlogError> {
        let mut tx = self.pool.begin().await?;
        if !user_exists(&mut tx, id).await? {
            return Err(BlogError::UserNotFound(id));
        }
        sqlx::query("DELETE FROM post_tags WHERE post_id IN (SELECT id FROM posts WHERE user_id = ?1)")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM posts WHERE user_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn create_post(
        &self,
        user_id: i64,
        title: &str,
        content: &str,
        tag_ids: &BTreeSet<i64>,
    ) -> Result<Post, BlogError> {
        validate_post_fields(title, content)?;
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;
        if !user_exists(&mut tx, user_id).await? {
            return Err(BlogError::UserNotFound(user_id));
        }
        let result =
            sqlx::query("INSERT INTO posts (title, content, created_at, user_id) VALUES (?1, ?2, ?3, ?4)")
                .bind(title)
                .bind(content)
                .bind(created_at)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        let post_id = result.last_insert_rowid();
        attach_tags(&mut tx, post_id, tag_ids).await?;
        tx.commit().await?;
        Ok(Post {
            id: post_id,
            title: title.to_string(),
            content: content.to_string(),
            created_at,
            user_id,
        })
    }

    pub async fn post(&self, id: i64) -> Result<Post, BlogError> {
        sqlx::query_as::<_, Post>(
            "SELECT id, title, content, created_at, user_id FROM posts WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BlogError::PostNotFound(id))
    }

    /// Overwrites title and content, then replaces the tag-association set
    /// wholesale. The replacement is part of the same transaction; there is
    /// no window where the post has a partially swapped tag set.
    pub async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        tag_ids: &BTreeSet<i64>,
    ) -> Result<Post, BlogError> {
        validate_post_fields(title, content)?;
        let mut tx = self.pool.begin().await?;
        let existing = sqlx::query_as::<_, Post>(
            "SELECT id, title, content, created_at, user_id FROM posts WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BlogError::PostNotFound(id))?;
        sqlx::query("UPDATE posts SET title = ?1, content = ?2 WHERE id = ?3")
            .bind(title)
            .bind(content)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM post_tags WHERE post_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        attach_tags(&mut tx, id, tag_ids).await?;
        tx.commit().await?;
        Ok(Post {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created_at: existing.created_at,
            user_id: existing.user_id,
        })
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), BlogError> {
        let mut tx = self.pool.begin().await?;
        let known = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if known == 0 {
            return Err(BlogError::PostNotFound(id));
        }
        sqlx::query("DELETE FROM post_tags WHERE post_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM posts WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn create_tag(&self, name: &str) -> Result<Tag, BlogError> {
        validate_tag_name(name)?;
        let result = sqlx::query("INSERT INTO tags (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await;
        match result {
            Ok(done) => Ok(Tag {
                id: done.last_insert_rowid(),
                name: name.to_string(),
            }),
            Err(err) if is_unique_violation(&err) => {
                Err(BlogError::DuplicateTagName(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn tag(&self, id: i64) -> Result<Tag, BlogError> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(BlogError::TagNotFound(id))
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, BlogError> {
        Ok(
            sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY name")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    pub async fn update_tag(&self, id: i64, name: &str) -> Result<Tag, BlogError> {
        validate_tag_name(name)?;
        let result = sqlx::query("UPDATE tags SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await;
        match result {
            Ok(done) if done.rows_affected() == 0 => Err(BlogError::TagNotFound(id)),
            Ok(_) => Ok(Tag {
                id,
                name: name.to_string(),
            }),
            Err(err) if is_unique_violation(&err) => {
                Err(BlogError::DuplicateTagName(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete_tag(&self, id: i64) -> Result<(), BlogError> {
        let mut tx = self.pool.begin().await?;
        let known = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if known == 0 {
            return Err(BlogError::TagNotFound(id));
        }
        sqlx::query("DELETE FROM post_tags WHERE tag_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tags WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn posts_by_user(&self, user_id: i64) -> Result<Vec<Post>, BlogError> {
        Ok(sqlx::query_as::<_, Post>(
            "SELECT id, title, content, created_at, user_id FROM posts WHERE user_id = ?1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn tags_for_post(&self, post_id: i64) -> Result<Vec<Tag>, BlogError> {
        Ok(sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name FROM tags t \
             JOIN post_tags pt ON pt.tag_id = t.id \
             WHERE pt.post_id = ?1 ORDER BY t.name",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn posts_for_tag(&self, tag_id: i64) -> Result<Vec<Post>, BlogError> {
        Ok(sqlx::query_as::<_, Post>(
            "SELECT p.id, p.title, p.content, p.created_at, p.user_id FROM posts p \
             JOIN post_tags pt ON pt.post_id = p.id \
             WHERE pt.tag_id = ?1 ORDER BY p.id",
        )
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

async fn user_exists(tx: &mut Transaction<'_, Sqlite>, id: i64) -> Result<bool, BlogError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?1")
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(count > 0)
}

// Every tag id must reference an existing tag; a stale id fails the whole
// enclosing transaction rather than silently shrinking the set.
async fn attach_tags(
    tx: &mut Transaction<'_, Sqlite>,
    post_id: i64,
    tag_ids: &BTreeSet<i64>,
) -> Result<(), BlogError> {
    for &tag_id in tag_ids {
        let known = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE id = ?1")
            .bind(tag_id)
            .fetch_one(&mut **tx)
            .await?;
        if known == 0 {
            return Err(BlogError::TagNotFound(tag_id));
        }
        sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?1, ?2)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
