use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use async_trait::async_trait;
use domain::{Event, EventId, EventRepository, NewEvent, RepositoryError};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    FromRow, SqlitePool,
};

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    RepositoryError::storage(err.to_string())
}

/// 创建 SQLite 连接池，数据库文件不存在时自动创建
pub async fn create_sqlite_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    let file_path = sqlite_file_path(database_url);
    if let Some(parent) = file_path
        .as_deref()
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// 从连接串中取出文件路径，内存数据库返回 None
fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(PathBuf::from(path))
}

#[derive(Debug, FromRow)]
struct EventRecord {
    id: i64,
    title: String,
    host: String,
    public_description: String,
    vault_details: String,
    is_published: bool,
}

impl From<EventRecord> for Event {
    fn from(value: EventRecord) -> Self {
        Event {
            id: EventId::from(value.id),
            title: value.title,
            host: value.host,
            public_description: value.public_description,
            vault_details: value.vault_details,
            is_published: value.is_published,
        }
    }
}

#[derive(Clone)]
pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create(&self, event: NewEvent) -> Result<Event, RepositoryError> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            INSERT INTO events (title, host, public_description, vault_details, is_published)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, host, public_description, vault_details, is_published
            "#,
        )
        .bind(&event.title)
        .bind(&event.host)
        .bind(&event.public_description)
        .bind(&event.vault_details)
        .bind(event.is_published)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(Event::from(record))
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, title, host, public_description, vault_details, is_published
            FROM events
            WHERE id = ?
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.map(Event::from))
    }

    async fn list_all(&self) -> Result<Vec<Event>, RepositoryError> {
        let records = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, title, host, public_description, vault_details, is_published
            FROM events
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(records.into_iter().map(Event::from).collect())
    }
}
