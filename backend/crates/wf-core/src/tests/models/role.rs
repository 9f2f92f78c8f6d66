use crate::Role;

use std::str::FromStr;

#[test]
fn given_known_strings_when_parsed_then_roundtrip() {
    assert_eq!(Role::from_str("user").unwrap(), Role::User);
    assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    assert_eq!(Role::User.as_str(), "user");
    assert_eq!(Role::Admin.as_str(), "admin");
}

#[test]
fn given_unknown_string_when_parsed_then_error() {
    let result = Role::from_str("superuser");
    assert!(result.is_err());
}

#[test]
fn default_role_is_user() {
    assert_eq!(Role::default(), Role::User);
}
