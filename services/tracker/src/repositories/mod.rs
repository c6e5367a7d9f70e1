//! Repositories for database operations

pub mod issue;
pub mod user;

pub use issue::IssueRepository;
pub use user::UserRepository;
