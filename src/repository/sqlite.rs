use chrono::prelude::*;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::fmt::Display;
use std::time::Duration;

use crate::models::todo::{ListFilter, TodoItem};
use crate::repository::schema::todos;
use crate::repository::Repository;
use crate::store::StoreError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const IN_MEMORY_URL: &str = ":memory:";
const BUSY_TIMEOUT_MS: u32 = 5_000;

type DBPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
type DBConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct ConnectionOptions;

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"))
            .map_err(r2d2::Error::QueryError)
    }
}

/// SQLite-backed todo table behind an r2d2 pool.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: DBPool,
}

impl SqliteRepository {
    /// Opens `database_url` and applies pending migrations.
    ///
    /// An in-memory database lives inside a single connection, so the pool
    /// is pinned to one connection that is never recycled.
    pub fn new(database_url: &str, pool_size: u32) -> anyhow::Result<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let builder = DBPool::builder().connection_customizer(Box::new(ConnectionOptions));
        let builder = if database_url == IN_MEMORY_URL {
            builder.max_size(1).idle_timeout(None).max_lifetime(None)
        } else {
            builder
                .max_size(pool_size.max(1))
                .connection_timeout(Duration::from_secs(30))
        };
        let pool: DBPool = builder.build(manager)?;

        let mut conn = pool.get()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("failed to run migrations: {e}"))?;
        tracing::info!(count = applied.len(), "database migrations applied");

        Ok(SqliteRepository { pool })
    }

    fn conn(&self) -> Result<DBConnection, StoreError> {
        self.pool.get().map_err(storage_error)
    }
}

fn storage_error(err: impl Display) -> StoreError {
    tracing::error!(error = %err, "todo storage failure");
    StoreError::Storage(err.to_string())
}

impl Repository for SqliteRepository {
    fn list(&self, filter: ListFilter) -> Result<Vec<TodoItem>, StoreError> {
        let mut conn = self.conn()?;
        let mut query = todos::table.order(todos::id.asc()).into_boxed();
        match filter {
            ListFilter::Active => query = query.filter(todos::is_deleted.eq(false)),
            ListFilter::Deleted => query = query.filter(todos::is_deleted.eq(true)),
            ListFilter::All => {}
        }
        query.load::<TodoItem>(&mut conn).map_err(storage_error)
    }

    fn insert(&self, title: &str) -> Result<TodoItem, StoreError> {
        let mut conn = self.conn()?;
        conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(todos::table)
                .values((
                    todos::title.eq(title),
                    todos::completed.eq(false),
                    todos::is_deleted.eq(false),
                    todos::created_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;
            todos::table.order(todos::id.desc()).first::<TodoItem>(conn)
        })
        .map_err(storage_error)
    }

    fn set_title(&self, id: i32, title: &str) -> Result<Option<TodoItem>, StoreError> {
        let mut conn = self.conn()?;
        conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            let changed = diesel::update(todos::table.find(id))
                .set(todos::title.eq(title))
                .execute(conn)?;
            if changed == 0 {
                return Ok(None);
            }
            todos::table.find(id).first::<TodoItem>(conn).optional()
        })
        .map_err(storage_error)
    }

    fn swap_deleted(&self, id: i32, is_deleted: bool) -> Result<Option<bool>, StoreError> {
        let mut conn = self.conn()?;
        conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            let previous = todos::table
                .find(id)
                .select(todos::is_deleted)
                .first::<bool>(conn)
                .optional()?;
            if previous.is_some_and(|previous| previous != is_deleted) {
                diesel::update(todos::table.find(id))
                    .set(todos::is_deleted.eq(is_deleted))
                    .execute(conn)?;
            }
            Ok(previous)
        })
        .map_err(storage_error)
    }
}
