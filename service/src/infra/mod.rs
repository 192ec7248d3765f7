//! Infrastructure layer.

pub mod database;
pub mod mailer;
pub mod quotes;

pub use self::{database::Database, mailer::Mailer, quotes::Quotes};
#[cfg(feature = "postgres")]
pub use self::database::{postgres, Postgres};
