//! Compact, sortable 64-bit identifiers.
//!
//! A [`FlakeId`] packs a 42-bit timestamp, an 11-bit per-tick sequence and a
//! generator id into one `u64`. IDs from one [`Generator`] strictly increase;
//! IDs from generators with distinct ids never collide. Every ID has three
//! interchangeable forms: the integer, 8 big-endian bytes, and 11 characters
//! of unpadded URL-safe base64.
//!
//! ```
//! use flakeid::{FlakeId, GeneratorConfig};
//!
//! let id = FlakeId::from_parts(3_020_801_146_913, 37, 160).unwrap();
//! assert_eq!(id.to_integer(), 6_335_079_166_850_929_824);
//! assert_eq!(id.to_bytes(), [0x57, 0xEA, 0xB8, 0xF0, 0x04, 0x20, 0x94, 0xA0]);
//! assert_eq!(id.to_text(), "V-q48AQglKA");
//!
//! let generator = GeneratorConfig::new(160).unwrap().build().unwrap();
//! let next = generator.next().unwrap();
//! assert_eq!(next.generator_id(), 160);
//! ```

mod config;
mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
pub mod serde;
mod text;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
