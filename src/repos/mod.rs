pub mod error;
pub mod topic_repo;
pub mod user_repo;
