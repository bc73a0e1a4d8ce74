//! Username validation mirroring backend constraints.
//!
//! These rules match the backend's `Username` type. Keeping them in sync
//! ensures generated names are always accepted by the backend.
//!
//! - Length between 3 and 32 characters
//! - Letters, digits, and underscores only

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

/// Validates a username against backend constraints.
///
/// # Examples
///
/// ```
/// use example_data::is_valid_username;
///
/// assert!(is_valid_username("ada_lovelace"));
/// assert!(is_valid_username("user_123"));
/// assert!(!is_valid_username("ab"));
/// assert!(!is_valid_username("o'brien"));
/// ```
#[must_use]
pub fn is_valid_username(name: &str) -> bool {
    let length = name.chars().count();
    (USERNAME_MIN..=USERNAME_MAX).contains(&length) && name.chars().all(is_valid_username_char)
}

const fn is_valid_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Turns an arbitrary name into a lowercase username candidate.
///
/// Whitespace becomes underscores and other invalid characters are dropped.
pub(crate) fn sanitize_username(candidate: &str) -> String {
    candidate
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if is_valid_username_char(c) {
                Some(c.to_ascii_lowercase())
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc", true)]
    #[case("a_b_c_123", true)]
    #[case("ab", false)]
    #[case("has space", false)]
    #[case("xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx", false)]
    #[case("xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx", true)]
    fn validates_usernames(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_valid_username(name), expected);
    }

    #[rstest]
    #[case("Ada Lovelace", "ada_lovelace")]
    #[case("O'Brien", "obrien")]
    #[case("Zoë Smith", "zo_smith")]
    fn sanitizes_candidates(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_username(input), expected);
    }
}
