use core::{fmt, str::FromStr};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{EncodingError, Error, FlakeId, Result};

impl FlakeId {
    /// Length of the text form.
    pub const TEXT_LEN: usize = 11;

    /// Encodes the binary form as unpadded URL-safe base64.
    ///
    /// The output is always [`FlakeId::TEXT_LEN`] characters drawn from
    /// `A-Z`, `a-z`, `0-9`, `-` and `_`.
    ///
    /// # Example
    ///
    /// ```
    /// use flakeid::FlakeId;
    ///
    /// let id = FlakeId::from_integer(6_335_079_166_850_929_824);
    /// assert_eq!(id.to_text(), "V-q48AQglKA");
    /// ```
    pub fn to_text(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_bytes())
    }

    /// Decodes the text form produced by [`FlakeId::to_text`].
    ///
    /// Decoding is strict: padding characters and a final symbol carrying
    /// non-zero trailing bits are rejected, so every accepted string is the
    /// exact encoding of the returned ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] if the input is not exactly
    /// [`FlakeId::TEXT_LEN`] characters or is not valid URL-safe base64. The
    /// decoder's [`base64::DecodeError`] is kept as
    /// [`EncodingError::InvalidSymbol`].
    ///
    /// # Example
    ///
    /// ```
    /// use flakeid::FlakeId;
    ///
    /// let id = FlakeId::from_text("V-q48AQglKA").unwrap();
    /// assert_eq!(id.timestamp(), 3_020_801_146_913);
    /// assert_eq!(id.sequence(), 37);
    /// assert_eq!(id.generator_id(), 160);
    /// assert!(FlakeId::from_text("V-q48AQglKA=").is_err());
    /// ```
    pub fn from_text(s: &str) -> Result<Self> {
        let len = s.chars().count();
        if len != Self::TEXT_LEN {
            return Err(EncodingError::InvalidLength {
                expected: Self::TEXT_LEN,
                actual: len,
            }
            .into());
        }
        let bytes = URL_SAFE_NO_PAD.decode(s).map_err(EncodingError::from)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for FlakeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

impl TryFrom<&str> for FlakeId {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

impl From<FlakeId> for String {
    fn from(id: FlakeId) -> Self {
        id.to_text()
    }
}
