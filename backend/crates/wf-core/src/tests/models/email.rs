use crate::email;

#[test]
fn accepts_ordinary_addresses() {
    assert!(email::is_well_formed("a@x.com"));
    assert!(email::is_well_formed("first.last@sub.domain.org"));
}

#[test]
fn rejects_malformed_addresses() {
    assert!(!email::is_well_formed(""));
    assert!(!email::is_well_formed("no-at-sign"));
    assert!(!email::is_well_formed("@x.com"));
    assert!(!email::is_well_formed("a@"));
    assert!(!email::is_well_formed("a@nodot"));
    assert!(!email::is_well_formed("a@x..com"));
    assert!(!email::is_well_formed("a b@x.com"));
}
