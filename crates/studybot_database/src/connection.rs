//! Database connection utilities.

use crate::DatabaseResult;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use studybot_error::{DatabaseError, DatabaseErrorKind};
use tracing::{debug, info, instrument};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Pool of SQLite connections.
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const IN_MEMORY: &str = ":memory:";

/// Applies per-connection pragmas whenever the pool opens a connection.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    file_backed: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        configure_sqlite_conn(conn, self.file_backed).map_err(diesel::r2d2::Error::QueryError)
    }
}

fn configure_sqlite_conn(conn: &mut SqliteConnection, file_backed: bool) -> QueryResult<()> {
    diesel::sql_query("PRAGMA busy_timeout=5000;").execute(conn)?;
    if file_backed {
        // WAL lets the reward tick read while a join is writing
        diesel::sql_query("PRAGMA journal_mode=WAL;").execute(conn)?;
        diesel::sql_query("PRAGMA synchronous=NORMAL;").execute(conn)?;
    }
    diesel::sql_query("PRAGMA foreign_keys=ON;").execute(conn)?;
    Ok(())
}

/// Open a pool for `database_url` and bring the schema up to date.
///
/// `database_url` is a file path, or `:memory:` for a private in-memory
/// database. An in-memory database lives in a single connection that the
/// pool never recycles.
///
/// # Errors
///
/// Returns an error if the pool cannot open a connection or a migration fails.
#[instrument]
pub fn establish_pool(database_url: &str, max_connections: u32) -> DatabaseResult<SqlitePool> {
    let in_memory = database_url == IN_MEMORY;
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);

    let builder = Pool::builder().connection_customizer(Box::new(SqlitePragmas {
        file_backed: !in_memory,
    }));
    let builder = if in_memory {
        builder
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        builder.max_size(max_connections.max(1))
    };

    let pool = builder
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;

    run_migrations(&pool)?;
    info!(in_memory, "Database ready");
    Ok(pool)
}

fn run_migrations(pool: &SqlitePool) -> DatabaseResult<()> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;
    debug!(count = applied.len(), "Applied migrations");
    Ok(())
}
