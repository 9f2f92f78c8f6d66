#![allow(dead_code)]


pub use test_db::create_test_pool;

use wf_core::Identity;

/// Build an unsaved identity fixture
pub fn new_identity(email: &str) -> Identity {
    Identity::new(
        "Test User".to_string(),
        email.to_string(),
        "$argon2id$v=19$m=19456,t=2,p=1$c3R1YnNhbHQ$c3R1Ymhhc2g".to_string(),
    )
}
