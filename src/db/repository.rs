//! Database repository for read-side content queries and accounts.
//!
//! Every query is parameterized; each call acquires a pooled connection for
//! the duration of one statement and releases it on return.

use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};

use crate::errors::AppError;
use crate::i18n::Locale;
use crate::models::{
    ContentSectionItem, Event, EventType, NavigationRow, NewsArticle, Page, StaffMember, User,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: AnyPool,
}

impl Repository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Round-trip a trivial statement to prove the database answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ==================== ACCOUNTS ====================

    /// Find a user by username.
    pub async fn find_user(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, role FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Whether a username or email is already taken.
    pub async fn user_exists(&self, username: &str, email: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users WHERE username = ? OR email = ?")
            .bind(username)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.try_get("n")?;
        Ok(n > 0)
    }

    /// Insert a new user. A unique-constraint violation surfaces as `Conflict`.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                "Username or email already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    // ==================== TRANSLATIONS ====================

    /// Flat `{key: value}` map for a locale.
    pub async fn translations(&self, locale: Locale) -> Result<BTreeMap<String, String>, AppError> {
        let rows = sqlx::query(
            "SELECT translation_key, translation_value FROM translations WHERE locale = ?",
        )
        .bind(locale.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<(String, String), AppError> {
                Ok((
                    row.try_get::<String, _>("translation_key")?,
                    row.try_get::<String, _>("translation_value")?,
                ))
            })
            .collect()
    }

    // ==================== PAGES & NAVIGATION ====================

    /// List published pages for a locale.
    pub async fn list_pages(&self, locale: Locale) -> Result<Vec<Page>, AppError> {
        let rows = sqlx::query(
            "SELECT id, slug, title, content, position FROM pages WHERE locale = ? AND is_published = 1 ORDER BY position, id",
        )
        .bind(locale.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(page_from_row).collect()
    }

    /// Get a published page by slug.
    pub async fn get_page(&self, slug: &str, locale: Locale) -> Result<Option<Page>, AppError> {
        let row = sqlx::query(
            "SELECT id, slug, title, content, position FROM pages WHERE slug = ? AND locale = ? AND is_published = 1",
        )
        .bind(slug)
        .bind(locale.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(page_from_row).transpose()
    }

    /// Active navigation rows for a locale, flat.
    pub async fn navigation_rows(&self, locale: Locale) -> Result<Vec<NavigationRow>, AppError> {
        let rows = sqlx::query(
            "SELECT id, parent_id, label, url, position FROM navigation_items WHERE locale = ? AND is_active = 1 ORDER BY position, id",
        )
        .bind(locale.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<NavigationRow, AppError> {
                Ok(NavigationRow {
                    id: row.try_get("id")?,
                    parent_id: row.try_get("parent_id")?,
                    label: row.try_get("label")?,
                    url: row.try_get("url")?,
                    position: row.try_get("position")?,
                })
            })
            .collect()
    }

    // ==================== STAFF & CONTENT ====================

    /// Active staff for a locale ordered by position.
    pub async fn list_staff(&self, locale: Locale) -> Result<Vec<StaffMember>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, name, role, image_url, email, phone, bio, is_director, is_active, position
               FROM school_staff WHERE locale = ? AND is_active = 1 ORDER BY position, id"#,
        )
        .bind(locale.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(staff_from_row).collect()
    }

    /// Content sections of one page for a locale ordered by position.
    pub async fn content_sections(
        &self,
        page_key: &str,
        locale: Locale,
    ) -> Result<Vec<ContentSectionItem>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, section_key, title, content, image_url, position
               FROM content_sections WHERE page_key = ? AND locale = ? ORDER BY position, id"#,
        )
        .bind(page_key)
        .bind(locale.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ContentSectionItem, AppError> {
                Ok(ContentSectionItem {
                    id: row.try_get("id")?,
                    section_key: row.try_get("section_key")?,
                    title: row.try_get("title")?,
                    content: row.try_get("content")?,
                    image_url: row.try_get("image_url")?,
                    position: row.try_get("position")?,
                })
            })
            .collect()
    }

    // ==================== NEWS & EVENTS ====================

    /// Newest published articles first.
    pub async fn list_news(&self, locale: Locale, limit: i64) -> Result<Vec<NewsArticle>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, title, excerpt, content, image_url, published_at
               FROM news WHERE locale = ? AND is_published = 1
               ORDER BY published_at DESC, id DESC LIMIT ?"#,
        )
        .bind(locale.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(news_from_row).collect()
    }

    /// One published article by id.
    pub async fn get_news(&self, id: i64) -> Result<Option<NewsArticle>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, title, excerpt, content, image_url, published_at
               FROM news WHERE id = ? AND is_published = 1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(news_from_row).transpose()
    }

    /// Events on or after `from` (`YYYY-MM-DD`), soonest first.
    pub async fn upcoming_events(
        &self,
        locale: Locale,
        from: &str,
        limit: i64,
    ) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, title, description, event_date, start_time, end_time, event_type, location
               FROM events WHERE locale = ? AND event_date >= ?
               ORDER BY event_date, start_time, id LIMIT ?"#,
        )
        .bind(locale.as_str())
        .bind(from)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<Event, AppError> {
                let event_type: String = row.try_get("event_type")?;
                Ok(Event {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    description: row
                        .try_get::<Option<String>, _>("description")?
                        .unwrap_or_default(),
                    date: row.try_get("event_date")?,
                    start_time: row
                        .try_get::<Option<String>, _>("start_time")?
                        .unwrap_or_default(),
                    end_time: row
                        .try_get::<Option<String>, _>("end_time")?
                        .unwrap_or_default(),
                    event_type: EventType::from_db(&event_type),
                    location: row.try_get("location")?,
                })
            })
            .collect()
    }

    // ==================== IMAGES ====================

    /// Relative file path stored for an image key.
    pub async fn image_path(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT file_path FROM images WHERE image_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => Some(row.try_get("file_path")?),
            None => None,
        })
    }
}

/// Integer flag columns (`INT` 0/1) as booleans.
fn flag(row: &AnyRow, column: &str) -> Result<bool, sqlx::Error> {
    Ok(row.try_get::<i64, _>(column)? != 0)
}

fn user_from_row(row: &AnyRow) -> Result<User, AppError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: row.try_get("role")?,
    })
}

fn page_from_row(row: &AnyRow) -> Result<Page, AppError> {
    Ok(Page {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: row.try_get("title")?,
        content: row
            .try_get::<Option<String>, _>("content")?
            .unwrap_or_default(),
        position: row.try_get("position")?,
    })
}

fn staff_from_row(row: &AnyRow) -> Result<StaffMember, AppError> {
    Ok(StaffMember {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        role: row.try_get("role")?,
        image_url: row
            .try_get::<Option<String>, _>("image_url")?
            .unwrap_or_default(),
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        bio: row.try_get("bio")?,
        is_director: flag(row, "is_director")?,
        is_active: flag(row, "is_active")?,
        position: row.try_get("position")?,
    })
}

fn news_from_row(row: &AnyRow) -> Result<NewsArticle, AppError> {
    Ok(NewsArticle {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        excerpt: row
            .try_get::<Option<String>, _>("excerpt")?
            .unwrap_or_default(),
        content: row
            .try_get::<Option<String>, _>("content")?
            .unwrap_or_default(),
        image_url: row.try_get("image_url")?,
        published_at: row.try_get("published_at")?,
    })
}
