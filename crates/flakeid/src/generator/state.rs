use core::cmp::Ordering;

use crate::{Error, FlakeId, Result};

/// A snapshot of a generator's last issued `(timestamp, sequence)` pair.
///
/// Persist it and feed it back through
/// [`GeneratorConfig::timestamp_last`] and [`GeneratorConfig::sequence`] to
/// resume after a restart without reissuing IDs, even if the clock stepped
/// back while the process was down.
///
/// [`GeneratorConfig::timestamp_last`]: crate::GeneratorConfig::timestamp_last
/// [`GeneratorConfig::sequence`]: crate::GeneratorConfig::sequence
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Checkpoint {
    /// Last issued tick.
    pub timestamp_last: u64,
    /// Last issued sequence within that tick.
    pub sequence: u16,
}

/// The mutable half of a generator. The seeded value counts as issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct State {
    pub(crate) last_tick: u64,
    pub(crate) sequence: u16,
}

/// Outcome of offering a clock reading to [`State::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    /// Commit this state and issue it.
    Issue(State),
    /// The current tick has no sequence room left.
    Exhausted,
    /// The reading is behind the last issued tick.
    Behind,
}

impl State {
    pub(crate) const fn new(last_tick: u64, sequence: u16) -> Self {
        Self {
            last_tick,
            sequence,
        }
    }

    /// Computes the successor state for a reading of `now` ticks. Pure; the
    /// caller decides whether to commit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] when a new tick no longer fits the
    /// timestamp field.
    pub(crate) fn advance(self, now: i64) -> Result<Advance> {
        // `last_tick` never exceeds 42 bits, so the cast is lossless.
        match now.cmp(&(self.last_tick as i64)) {
            Ordering::Greater => {
                let tick = now as u64;
                if tick > FlakeId::MAX_TIMESTAMP {
                    return Err(Error::TimestampOverflow { tick });
                }
                Ok(Advance::Issue(Self::new(tick, 0)))
            }
            Ordering::Equal if self.sequence < FlakeId::MAX_SEQUENCE => Ok(Advance::Issue(
                Self::new(self.last_tick, self.sequence + 1),
            )),
            Ordering::Equal => Ok(Advance::Exhausted),
            Ordering::Less => Ok(Advance::Behind),
        }
    }

    pub(crate) const fn to_id(self, generator_id: u16) -> FlakeId {
        FlakeId::pack(self.last_tick, self.sequence, generator_id)
    }

    pub(crate) const fn checkpoint(self) -> Checkpoint {
        Checkpoint {
            timestamp_last: self.last_tick,
            sequence: self.sequence,
        }
    }
}
