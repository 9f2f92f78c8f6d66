use crate::{Identity, PublicIdentity, Role};

#[test]
fn new_identity_has_defaults() {
    let identity = Identity::new(
        "Ada Lovelace".to_string(),
        "ada@example.com".to_string(),
        "$argon2id$stub".to_string(),
    );

    assert_eq!(identity.role, Role::User);
    assert!(identity.is_active);
    assert!(identity.refresh_token.is_none());
    assert_eq!(identity.created_at, identity.updated_at);
}

#[test]
fn public_projection_drops_credentials() {
    let identity = Identity::new(
        "Ada Lovelace".to_string(),
        "ada@example.com".to_string(),
        "$argon2id$stub".to_string(),
    );

    let public = PublicIdentity::from(identity.clone());
    let json = serde_json::to_value(&public).unwrap();

    assert_eq!(json["email"], "ada@example.com");
    assert!(json.get("password_hash").is_none());
    assert!(json.get("refresh_token").is_none());
}
