pub mod item;
pub mod store;
pub mod tag;
pub mod user;

use sqlx::error::ErrorKind;

pub use item::SqliteItemRepository;
pub use store::SqliteStoreRepository;
pub use tag::SqliteTagRepository;
pub use user::SqliteUserRepository;

/// Constraint that rejected a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Violation {
    /// Unique or primary key constraint, with the driver's message
    /// (SQLite names the offending `table.column` there).
    Unique(String),
    ForeignKey,
}

/// Classify a write failure as an integrity violation, if it is one.
pub(crate) fn violation(err: &sqlx::Error) -> Option<Violation> {
    let db_err = err.as_database_error()?;

    match db_err.kind() {
        ErrorKind::UniqueViolation => Some(Violation::Unique(db_err.message().to_string())),
        ErrorKind::ForeignKeyViolation => Some(Violation::ForeignKey),
        _ => None,
    }
}
