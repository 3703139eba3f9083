//! Database module.
//!
//! MySQL is the production store; SQLite is accepted through the same `Any`
//! pool for local runs and tests. Both dialects get idempotent migrations.

mod repository;

pub use repository::*;

use std::path::Path;

use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;

/// SQL dialect behind a connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("mysql:") || url.starts_with("mariadb:") {
            Some(Dialect::MySql)
        } else if url.starts_with("sqlite:") {
            Some(Dialect::Sqlite)
        } else {
            None
        }
    }

    fn primary_key(&self) -> &'static str {
        match self {
            Dialect::MySql => "BIGINT PRIMARY KEY AUTO_INCREMENT",
            Dialect::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(database_url: &str, pool_size: u32) -> Result<AnyPool, sqlx::Error> {
    install_default_drivers();

    let dialect = Dialect::from_url(database_url).ok_or_else(|| {
        sqlx::Error::Configuration(format!("unsupported database URL scheme: {database_url}").into())
    })?;

    if dialect == Dialect::Sqlite {
        ensure_sqlite_parent(database_url).await;
    }

    let pool = AnyPoolOptions::new()
        .max_connections(pool_size)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(database_url)
        .await?;

    run_migrations(&pool, dialect).await?;

    Ok(pool)
}

/// Make sure the directory of a file-backed SQLite URL exists.
async fn ensure_sqlite_parent(database_url: &str) {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return;
    }
    if let Some(parent) = Path::new(path).parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }
}

/// Run database migrations.
async fn run_migrations(pool: &AnyPool, dialect: Dialect) -> Result<(), sqlx::Error> {
    for statement in schema(dialect) {
        sqlx::query(&statement).execute(pool).await?;
    }
    tracing::debug!("Database schema is up to date ({:?})", dialect);
    Ok(())
}

/// One statement per entry; MySQL rejects multi-statement prepared queries.
fn schema(dialect: Dialect) -> Vec<String> {
    let pk = dialect.primary_key();

    vec![
        format!(
            r#"CREATE TABLE IF NOT EXISTS users (
                id {pk},
                username VARCHAR(100) NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                role VARCHAR(50) NOT NULL,
                created_at VARCHAR(40) NOT NULL
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS translations (
                id {pk},
                locale VARCHAR(5) NOT NULL,
                translation_key VARCHAR(255) NOT NULL,
                translation_value TEXT NOT NULL,
                UNIQUE (locale, translation_key)
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS pages (
                id {pk},
                locale VARCHAR(5) NOT NULL,
                slug VARCHAR(150) NOT NULL,
                title VARCHAR(255) NOT NULL,
                content TEXT,
                position INT NOT NULL DEFAULT 0,
                is_published INT NOT NULL DEFAULT 1
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS navigation_items (
                id {pk},
                locale VARCHAR(5) NOT NULL,
                parent_id BIGINT,
                label VARCHAR(255) NOT NULL,
                url VARCHAR(500) NOT NULL,
                position INT NOT NULL DEFAULT 0,
                is_active INT NOT NULL DEFAULT 1
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS school_staff (
                id {pk},
                locale VARCHAR(5) NOT NULL,
                name VARCHAR(255) NOT NULL,
                role VARCHAR(255) NOT NULL,
                image_url VARCHAR(500),
                email VARCHAR(255),
                phone VARCHAR(50),
                bio TEXT,
                is_director INT NOT NULL DEFAULT 0,
                is_active INT NOT NULL DEFAULT 1,
                position INT NOT NULL DEFAULT 0
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS content_sections (
                id {pk},
                page_key VARCHAR(100) NOT NULL,
                locale VARCHAR(5) NOT NULL,
                section_key VARCHAR(100) NOT NULL,
                title VARCHAR(255),
                content TEXT,
                image_url VARCHAR(500),
                position INT NOT NULL DEFAULT 0
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS news (
                id {pk},
                locale VARCHAR(5) NOT NULL,
                title VARCHAR(255) NOT NULL,
                excerpt TEXT,
                content TEXT,
                image_url VARCHAR(500),
                published_at VARCHAR(40) NOT NULL,
                is_published INT NOT NULL DEFAULT 1
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS events (
                id {pk},
                locale VARCHAR(5) NOT NULL,
                title VARCHAR(255) NOT NULL,
                description TEXT,
                event_date VARCHAR(10) NOT NULL,
                start_time VARCHAR(5),
                end_time VARCHAR(5),
                event_type VARCHAR(30) NOT NULL DEFAULT 'other',
                location VARCHAR(255)
            )"#
        ),
        format!(
            r#"CREATE TABLE IF NOT EXISTS images (
                id {pk},
                image_key VARCHAR(150) NOT NULL UNIQUE,
                file_path VARCHAR(500) NOT NULL,
                alt_text VARCHAR(255)
            )"#
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_url() {
        assert_eq!(
            Dialect::from_url("mysql://root@localhost:3306/school_cms"),
            Some(Dialect::MySql)
        );
        assert_eq!(
            Dialect::from_url("sqlite:./data/cms.sqlite?mode=rwc"),
            Some(Dialect::Sqlite)
        );
        assert_eq!(Dialect::from_url("postgres://localhost/db"), None);
    }

    #[test]
    fn test_schema_uses_dialect_primary_key() {
        let mysql = schema(Dialect::MySql);
        let sqlite = schema(Dialect::Sqlite);
        assert_eq!(mysql.len(), sqlite.len());
        assert!(mysql.iter().all(|s| s.contains("AUTO_INCREMENT")));
        assert!(sqlite.iter().all(|s| s.contains("AUTOINCREMENT")));
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_rejected() {
        let err = init_database("postgres://localhost/db", 1).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::Configuration(_)));
    }
}
