pub mod error;
pub mod repositories;

pub use error::{DbError, Result};
pub use repositories::activity_log_repository::ActivityLogRepository;
pub use repositories::identity_repository::IdentityRepository;
pub use repositories::usage_repository::{UsageReportRow, UsageRepository};
