pub mod activity_log_repository;
pub mod identity_repository;
pub mod usage_repository;
