//! SQLite rule store: schema, read queries and reference catalogue seeding

pub mod init;
pub mod models;
pub mod rules;
pub mod seed;

pub use init::*;
pub use models::*;
pub use rules::*;
pub use seed::*;
