//! Storage-assigned record identifiers.

use std::fmt;

use thiserror::Error;

/// Length of the hexadecimal form of a document identifier.
const RECORD_ID_LEN: usize = 24;

/// Validation error for [`RecordId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record id '{value}' must be {RECORD_ID_LEN} lowercase hexadecimal characters")]
pub struct RecordIdError {
    pub value: String,
}

/// Identifier of a stored document in its 24-character hexadecimal form.
///
/// Adapters convert it to and from the store's native identifier type; the
/// domain only compares and forwards it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Validate and construct a [`RecordId`].
    ///
    /// # Examples
    /// ```
    /// use provisioner::domain::RecordId;
    ///
    /// let id = RecordId::new("65f0c0ffee0000000000beef").expect("valid id");
    /// assert_eq!(id.as_str(), "65f0c0ffee0000000000beef");
    /// assert!(RecordId::new("not-hex").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, RecordIdError> {
        let value = value.into();
        let well_formed = value.len() == RECORD_ID_LEN
            && value
                .bytes()
                .all(|byte| byte.is_ascii_digit() || matches!(byte, b'a'..=b'f'));
        if well_formed {
            Ok(Self(value))
        } else {
            Err(RecordIdError { value })
        }
    }

    /// Borrow the hexadecimal form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
