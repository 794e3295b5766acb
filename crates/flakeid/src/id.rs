use core::fmt;

use crate::{EncodingError, Error, Field, Result};

/// A 64-bit time-ordered identifier.
///
/// The canonical form is a single `u64`. Fields are packed least-significant
/// first:
///
/// ```text
///  Bit Index:  63          63 62           21 20          10 9            0
///              +-------------+---------------+--------------+--------------+
///  Field:      | reserved(1) | timestamp(42) | sequence(11) | generator(10)|
///              +-------------+---------------+--------------+--------------+
///              |<---------- MSB ---------- 64 bits --------- LSB --------->|
/// ```
///
/// Generator ids are limited to `0..=255`, so an ID built by this crate always
/// carries its generator id in the low byte with bits 8 and 9 clear. Raw
/// integers decode losslessly even when reserved bits are set; see
/// [`FlakeId::is_canonical`].
///
/// Ordering and equality follow the canonical integer, which makes IDs sort
/// by timestamp, then sequence, then generator id.
///
/// # Example
///
/// ```
/// use flakeid::FlakeId;
///
/// let id = FlakeId::from_parts(3_020_801_146_913, 37, 160).unwrap();
/// assert_eq!(id.to_integer(), 6_335_079_166_850_929_824);
/// assert_eq!(id.to_bytes(), [0x57, 0xEA, 0xB8, 0xF0, 0x04, 0x20, 0x94, 0xA0]);
/// assert_eq!(id.to_text(), "V-q48AQglKA");
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FlakeId {
    id: u64,
}

impl FlakeId {
    /// Width of the generator field in bits.
    pub const GENERATOR_BITS: u32 = 10;

    /// Width of the sequence field in bits.
    pub const SEQUENCE_BITS: u32 = 11;

    /// Width of the timestamp field in bits.
    pub const TIMESTAMP_BITS: u32 = 42;

    /// Largest generator id accepted by [`FlakeId::from_parts`] and
    /// [`GeneratorConfig::new`](crate::GeneratorConfig::new).
    pub const MAX_GENERATOR_ID: u16 = 0xff;

    /// Largest sequence value within one tick.
    pub const MAX_SEQUENCE: u16 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Largest representable timestamp.
    pub const MAX_TIMESTAMP: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 10-bit generator field. Occupies bits 0 through 9.
    pub const GENERATOR_MASK: u64 = (1 << Self::GENERATOR_BITS) - 1;

    /// Bitmask for the 11-bit sequence field. Occupies bits 10 through 20.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Bitmask for the 42-bit timestamp field. Occupies bits 21 through 62.
    pub const TIMESTAMP_MASK: u64 = Self::MAX_TIMESTAMP;

    /// Number of bits to shift the sequence to its position (bit 10).
    pub const SEQUENCE_SHIFT: u32 = Self::GENERATOR_BITS;

    /// Number of bits to shift the timestamp to its position (bit 21).
    pub const TIMESTAMP_SHIFT: u32 = Self::GENERATOR_BITS + Self::SEQUENCE_BITS;

    /// Bits that an ID produced by this crate never sets: bit 63 and the
    /// generator bits above [`FlakeId::MAX_GENERATOR_ID`].
    pub const RESERVED_MASK: u64 = (1 << 63) | (Self::GENERATOR_MASK & !0xff);

    /// Length of the binary form.
    pub const BYTES_LEN: usize = 8;

    /// The smallest ID.
    pub const MIN: Self = Self { id: 0 };

    /// The largest ID.
    pub const MAX: Self = Self { id: u64::MAX };

    /// Packs already validated fields.
    pub(crate) const fn pack(timestamp: u64, sequence: u16, generator_id: u16) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let sequence = (sequence as u64 & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        let generator_id = generator_id as u64 & Self::GENERATOR_MASK;
        Self {
            id: timestamp | sequence | generator_id,
        }
    }

    /// Builds an ID from its fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOutOfRange`] if `timestamp` exceeds
    /// [`FlakeId::MAX_TIMESTAMP`], `sequence` exceeds
    /// [`FlakeId::MAX_SEQUENCE`], or `generator_id` exceeds
    /// [`FlakeId::MAX_GENERATOR_ID`].
    pub fn from_parts(timestamp: u64, sequence: u16, generator_id: u16) -> Result<Self> {
        check_timestamp(timestamp)?;
        check_sequence(sequence)?;
        check_generator_id(generator_id)?;
        Ok(Self::pack(timestamp, sequence, generator_id))
    }

    /// Wraps a canonical integer. Every `u64` is a valid ID.
    pub const fn from_integer(id: u64) -> Self {
        Self { id }
    }

    /// Returns the canonical integer.
    pub const fn to_integer(&self) -> u64 {
        self.id
    }

    /// Decodes the 8-byte big-endian binary form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEncoding`] unless `bytes` is exactly 8 bytes
    /// long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; Self::BYTES_LEN] =
            bytes.try_into().map_err(|_| EncodingError::InvalidLength {
                expected: Self::BYTES_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self::from_be_bytes(bytes))
    }

    /// Infallible counterpart of [`FlakeId::from_bytes`].
    pub const fn from_be_bytes(bytes: [u8; Self::BYTES_LEN]) -> Self {
        Self {
            id: u64::from_be_bytes(bytes),
        }
    }

    /// Returns the 8-byte big-endian binary form.
    pub const fn to_bytes(&self) -> [u8; Self::BYTES_LEN] {
        self.id.to_be_bytes()
    }

    /// Extracts the timestamp, in ticks since the generator's origin.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the per-tick sequence number.
    pub const fn sequence(&self) -> u16 {
        ((self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK) as u16
    }

    /// Extracts the generator id.
    pub const fn generator_id(&self) -> u16 {
        (self.id & Self::GENERATOR_MASK) as u16
    }

    /// Returns `true` if no reserved bit is set, i.e. the ID could have been
    /// produced by [`FlakeId::from_parts`].
    pub const fn is_canonical(&self) -> bool {
        self.id & Self::RESERVED_MASK == 0
    }
}

pub(crate) fn check_timestamp(timestamp: u64) -> Result<()> {
    check(Field::Timestamp, timestamp, FlakeId::MAX_TIMESTAMP)
}

pub(crate) fn check_sequence(sequence: u16) -> Result<()> {
    check(
        Field::Sequence,
        u64::from(sequence),
        u64::from(FlakeId::MAX_SEQUENCE),
    )
}

pub(crate) fn check_generator_id(generator_id: u16) -> Result<()> {
    check(
        Field::GeneratorId,
        u64::from(generator_id),
        u64::from(FlakeId::MAX_GENERATOR_ID),
    )
}

fn check(field: Field, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(Error::FieldOutOfRange { field, value, max });
    }
    Ok(())
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("id", &format_args!("{self}"))
            .field("raw", &format_args!("{:#018x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("sequence", &self.sequence())
            .field("generator_id", &self.generator_id())
            .finish()
    }
}

impl From<u64> for FlakeId {
    fn from(id: u64) -> Self {
        Self::from_integer(id)
    }
}

impl From<FlakeId> for u64 {
    fn from(id: FlakeId) -> Self {
        id.to_integer()
    }
}

impl From<[u8; FlakeId::BYTES_LEN]> for FlakeId {
    fn from(bytes: [u8; FlakeId::BYTES_LEN]) -> Self {
        Self::from_be_bytes(bytes)
    }
}

impl From<FlakeId> for [u8; FlakeId::BYTES_LEN] {
    fn from(id: FlakeId) -> Self {
        id.to_bytes()
    }
}

impl TryFrom<&[u8]> for FlakeId {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}
