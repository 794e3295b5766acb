use core::fmt;

use base64::DecodeError;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The bit field a [`Error::FieldOutOfRange`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Timestamp,
    Sequence,
    GeneratorId,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timestamp => "timestamp",
            Self::Sequence => "sequence",
            Self::GeneratorId => "generator id",
        })
    }
}

/// Why a byte or text encoding was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodingError {
    /// The input did not have the fixed length of the form being decoded.
    InvalidLength {
        /// Required length: bytes for the binary form, characters for the
        /// text form.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
    /// The text contained a symbol outside the URL-safe base64 alphabet, a
    /// padding character, or non-canonical trailing bits.
    InvalidSymbol(DecodeError),
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, actual } => {
                write!(f, "invalid length: expected {expected}, got {actual}")
            }
            Self::InvalidSymbol(err) => write!(f, "invalid symbol: {err}"),
        }
    }
}

impl core::error::Error for EncodingError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidSymbol(err) => Some(err),
            Self::InvalidLength { .. } => None,
        }
    }
}

impl From<DecodeError> for EncodingError {
    fn from(err: DecodeError) -> Self {
        Self::InvalidSymbol(err)
    }
}

/// All errors `flakeid` can produce.
///
/// Every error is local and synchronous. None of them leave a [`Generator`]
/// in a modified state, so a failed call can always be retried.
///
/// [`Generator`]: crate::Generator
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A supplied field does not fit its bit width.
    ///
    /// Raised when building an ID from parts and when configuring a
    /// generator. Decoding a raw integer never produces this error.
    FieldOutOfRange {
        /// The offending field.
        field: Field,
        /// The rejected value.
        value: u64,
        /// The largest accepted value.
        max: u64,
    },

    /// A byte string or text string could not be decoded.
    InvalidEncoding(EncodingError),

    /// The sequence for the current tick is exhausted and the generator was
    /// configured not to wait for the next tick.
    ///
    /// Treat this as backpressure: retry after a short delay.
    SequenceOverflow {
        /// The tick whose sequence space is used up.
        timestamp: u64,
        /// The last sequence value issued in that tick.
        sequence: u16,
    },

    /// The clock reads a tick earlier than the last one this generator
    /// issued. This includes readings before the configured origin.
    ClockRegression {
        /// The current tick, possibly negative.
        now: i64,
        /// The last tick issued.
        last: u64,
    },

    /// The current tick no longer fits in the timestamp field.
    TimestampOverflow {
        /// The tick that was read.
        tick: u64,
    },

    /// The generator lock was poisoned by a panicking thread.
    ///
    /// Only exists with the standard library mutex; `parking_lot` mutexes do
    /// not poison.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    LockPoisoned,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldOutOfRange { field, value, max } => {
                write!(f, "{field} out of range: {value} > {max}")
            }
            Self::InvalidEncoding(err) => write!(f, "invalid encoding: {err}"),
            Self::SequenceOverflow {
                timestamp,
                sequence,
            } => write!(
                f,
                "sequence overflow at timestamp {timestamp} (last sequence {sequence})"
            ),
            Self::ClockRegression { now, last } => {
                write!(f, "clock regression: now {now}, last issued {last}")
            }
            Self::TimestampOverflow { tick } => write!(f, "timestamp overflow: {tick}"),
            #[cfg(not(feature = "parking-lot"))]
            Self::LockPoisoned => f.write_str("generator lock poisoned"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidEncoding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EncodingError> for Error {
    fn from(err: EncodingError) -> Self {
        Self::InvalidEncoding(err)
    }
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::PoisonError;
#[cfg(not(feature = "parking-lot"))]
// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<T>> for Error {
    fn from(_: PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_field() {
        let err = Error::FieldOutOfRange {
            field: Field::GeneratorId,
            value: 256,
            max: 255,
        };
        assert_eq!(err.to_string(), "generator id out of range: 256 > 255");
    }

    #[test]
    fn encoding_error_is_the_source() {
        use core::error::Error as _;

        let err = Error::from(EncodingError::InvalidLength {
            expected: 8,
            actual: 3,
        });
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("invalid length: expected 8, got 3")
        );
    }

    #[test]
    fn decoder_error_stays_matchable() {
        use core::error::Error as _;

        let err = EncodingError::from(DecodeError::InvalidByte(1, b'+'));
        assert_eq!(
            err,
            EncodingError::InvalidSymbol(DecodeError::InvalidByte(1, b'+'))
        );
        assert_eq!(
            err.source().map(ToString::to_string),
            Some(DecodeError::InvalidByte(1, b'+').to_string())
        );
    }
}
