pub mod activity_entry;
pub mod email;
pub mod identity;
pub mod role;
pub mod usage_counter;
