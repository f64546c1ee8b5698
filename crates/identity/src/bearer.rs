//! Bearer token extraction.

const SCHEME: &str = "bearer";

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively and must be followed by a single
/// space and a non-empty token.
///
/// # Arguments
/// * `header` - Raw header value, e.g. `"Bearer eyJhbGciOi..."`
///
/// # Returns
/// The token, or `None` if the header is not a bearer credential.
pub fn bearer_token(header: &str) -> Option<&str> {
    let scheme_len: usize = SCHEME.len();
    if header.len() <= scheme_len + 1 || !header.is_char_boundary(scheme_len) {
        return None;
    }
    let (scheme, rest) = header.split_at(scheme_len);
    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return None;
    }
    let token: &str = rest.strip_prefix(' ')?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
