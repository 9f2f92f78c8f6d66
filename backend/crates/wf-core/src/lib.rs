pub mod error;
pub mod models;

pub use error::{CoreError, Result};
pub use models::activity_entry::ActivityEntry;
pub use models::email;
pub use models::identity::{Identity, PublicIdentity};
pub use models::role::Role;
pub use models::usage_counter::UsageCounter;

pub use error_location::ErrorLocation;

#[cfg(test)]
mod tests;
