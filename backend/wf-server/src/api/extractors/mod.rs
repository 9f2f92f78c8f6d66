pub mod admin_identity;
pub mod auth_identity;
pub mod client_meta;
