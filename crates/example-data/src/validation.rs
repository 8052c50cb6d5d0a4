//! Field validation mirroring the document store's collection validators.
//!
//! These rules match the `$jsonSchema` validators the provisioner attaches to
//! the `users` and `courses` collections. Keeping them in sync ensures fixture
//! records are accepted by the storage engine when seeded.
//!
//! # Validation Rules
//!
//! - Email: must match [`EMAIL_PATTERN`]
//! - Username: between [`USERNAME_MIN`] and [`USERNAME_MAX`] characters
//! - Course title: between [`TITLE_MIN`] and [`TITLE_MAX`] characters
//! - Course description: between [`DESCRIPTION_MIN`] and [`DESCRIPTION_MAX`]
//!   characters

use std::sync::OnceLock;

use regex::Regex;

/// Pattern every user email must match.
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 50;

/// Minimum allowed length for a course title.
pub const TITLE_MIN: usize = 1;

/// Maximum allowed length for a course title.
pub const TITLE_MAX: usize = 200;

/// Minimum allowed length for a course description.
pub const DESCRIPTION_MIN: usize = 1;

/// Maximum allowed length for a course description.
pub const DESCRIPTION_MAX: usize = 1000;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(EMAIL_PATTERN)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validates an email address against [`EMAIL_PATTERN`].
///
/// # Examples
///
/// ```
/// use example_data::is_valid_email;
///
/// assert!(is_valid_email("alice.brown@student.com"));
/// assert!(!is_valid_email("alice.brown@student"));
/// assert!(!is_valid_email("not an email"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Validates a username length.
///
/// # Examples
///
/// ```
/// use example_data::is_valid_username;
///
/// assert!(is_valid_username("abrown"));
/// assert!(!is_valid_username("ab"));
/// ```
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    within(username, USERNAME_MIN, USERNAME_MAX)
}

/// Validates a course title length.
#[must_use]
pub fn is_valid_title(title: &str) -> bool {
    within(title, TITLE_MIN, TITLE_MAX)
}

/// Validates a course description length.
#[must_use]
pub fn is_valid_description(description: &str) -> bool {
    within(description, DESCRIPTION_MIN, DESCRIPTION_MAX)
}

// The storage engine counts UTF-8 code points for `minLength`/`maxLength`.
fn within(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}
