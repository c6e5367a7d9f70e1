//! Tracker service models

pub mod issue;
pub mod user;

// Re-export for convenience
pub use issue::{
    CreateIssueRequest, Issue, IssueFilter, IssueListing, IssuePage, IssueQuery,
    IssueStatistics, NewIssue, Priority, Severity, Status, UpdateIssueRequest,
};
pub use user::{
    LoginRequest, LoginResponse, NewUser, RegisterRequest, UpdateProfileRequest, UpdateUser, User,
};
