use sqlx::PgPool;

/// Executes SQL queries against the connection pool.
///
/// Each query is a plain struct with its own `kanau::processor::Processor`
/// impl on this type, so call sites read as `db.process(GetUserById { .. })`.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
