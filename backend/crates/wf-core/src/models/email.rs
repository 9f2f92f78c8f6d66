//! Email well-formedness check applied before any identity write.

/// Returns true when `value` looks like a deliverable address.
///
/// This is a shape check (one `@`, non-empty local part, dotted domain,
/// no whitespace), not RFC 5322 validation. Lookup uses case-sensitive
/// equality, so no normalization happens here.
pub fn is_well_formed(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    // Domain needs at least one dot with labels on both sides
    domain.split('.').count() >= 2 && domain.split('.').all(|label| !label.is_empty())
}
