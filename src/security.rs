use subtle::ConstantTimeEq;

/// Compare a secret presented by a caller with the configured one without
/// leaking how many leading bytes matched.
///
/// An empty configured secret never matches, so a blank `WEBHOOK_SECRET`
/// cannot be satisfied by omitting the header.
pub fn constant_time_compare(provided: &str, expected: &str) -> bool {
    if expected.is_empty() || provided.len() != expected.len() {
        return false;
    }
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
