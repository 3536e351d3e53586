use sea_orm::{DbErr, SqlErr};

/// `true` when the database rejected a write because of a unique index.
///
/// Used to turn a lost check-then-insert race into a 409 instead of a 500.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
