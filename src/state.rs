use crate::db::DbPool;

/// Shared state handed to every handler. The pool is the only in-process
/// shared resource; requests are otherwise independent.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
}
