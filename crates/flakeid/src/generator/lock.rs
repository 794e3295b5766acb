use core::time::Duration;
use std::{sync::Arc, thread};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, FlakeId, Resolution, Result, SystemClock, TimeSource,
    generator::{
        Checkpoint, Mutex, MutexGuard,
        state::{Advance, State},
    },
};

/// A thread-safe generator of [`FlakeId`]s.
///
/// The `(last_tick, sequence)` pair lives behind a mutex. Reading the clock,
/// comparing against the last tick and committing the new pair happen as one
/// critical section, so concurrent callers never observe the same pair.
///
/// Build one with [`GeneratorConfig`]. Cloning a generator shares its state:
/// clones draw from the same sequence space and stay mutually unique.
///
/// ## Guarantees
/// - Successful calls to [`Generator::next`], ordered by lock acquisition,
///   return strictly increasing IDs.
/// - A failed call changes nothing.
///
/// ## Blocking
/// With `wait_on_overflow` enabled (the default), a caller that finds the
/// current tick's sequence exhausted sleeps, still holding the lock, until the
/// clock moves past that tick. A clock that steps back during the wait ends it
/// with [`Error::ClockRegression`]. The wait has no timeout and cannot be
/// cancelled; callers that need bounded latency should disable waiting and
/// treat [`Error::SequenceOverflow`] as backpressure.
///
/// # Example
///
/// ```
/// use flakeid::GeneratorConfig;
///
/// let generator = GeneratorConfig::new(7).unwrap().build().unwrap();
/// let a = generator.next().unwrap();
/// let b = generator.next().unwrap();
/// assert!(a < b);
/// assert_eq!(a.generator_id(), 7);
/// ```
///
/// [`GeneratorConfig`]: crate::GeneratorConfig
#[derive(Debug)]
pub struct Generator<T = SystemClock>
where
    T: TimeSource,
{
    generator_id: u16,
    timestamp_offset: i64,
    resolution: Resolution,
    wait_on_overflow: bool,
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<State>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<State>>,
    time: T,
}

impl<T> Generator<T>
where
    T: TimeSource,
{
    /// Assembles a generator from fields the config already validated.
    pub(crate) fn from_parts(
        generator_id: u16,
        timestamp_offset: i64,
        resolution: Resolution,
        wait_on_overflow: bool,
        seed: State,
        time: T,
    ) -> Self {
        Self {
            generator_id,
            timestamp_offset,
            resolution,
            wait_on_overflow,
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(seed))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(seed)),
            time,
        }
    }

    /// Allocates the next ID.
    ///
    /// # Errors
    ///
    /// - [`Error::SequenceOverflow`] if the current tick is exhausted and the
    ///   generator does not wait on overflow.
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issued tick, including while waiting for the next tick.
    /// - [`Error::TimestampOverflow`] if the current tick no longer fits in
    ///   the timestamp field.
    /// - [`Error::LockPoisoned`] if another caller panicked while holding the
    ///   lock (standard library mutex only).
    ///
    /// None of these change the generator's state.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next(&self) -> Result<FlakeId> {
        let mut state = self.lock()?;
        let mut waiting = false;

        loop {
            let millis = self.time.current_millis();
            let now = self.resolution.tick(millis, self.timestamp_offset);

            match state
                .advance(now)
                .map_err(Self::cold_timestamp_overflow)?
            {
                Advance::Issue(next) => {
                    *state = next;
                    return Ok(next.to_id(self.generator_id));
                }
                Advance::Exhausted if self.wait_on_overflow => {
                    if !waiting {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(tick = state.last_tick, "sequence exhausted, waiting");
                        waiting = true;
                    }
                    self.sleep_until_after(state.last_tick, millis);
                }
                Advance::Exhausted => {
                    return Err(Error::SequenceOverflow {
                        timestamp: state.last_tick,
                        sequence: state.sequence,
                    });
                }
                Advance::Behind => return Err(Self::cold_clock_behind(now, state.last_tick)),
            }
        }
    }

    /// Returns the last issued `(timestamp, sequence)` pair.
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`] if another caller panicked while holding the
    /// lock (standard library mutex only).
    pub fn checkpoint(&self) -> Result<Checkpoint> {
        Ok(self.lock()?.checkpoint())
    }

    /// The generator id stamped into every ID.
    pub const fn generator_id(&self) -> u16 {
        self.generator_id
    }

    /// Seconds added to clock readings before converting them to ticks.
    pub const fn timestamp_offset(&self) -> i64 {
        self.timestamp_offset
    }

    /// The tick length.
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Whether [`Generator::next`] blocks when a tick's sequence runs out.
    pub const fn wait_on_overflow(&self) -> bool {
        self.wait_on_overflow
    }

    /// The time source this generator reads.
    pub const fn time_source(&self) -> &T {
        &self.time
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    /// Sleeps until the tick after `last` should have started, at least one
    /// millisecond.
    fn sleep_until_after(&self, last: u64, millis: u64) {
        let wait = self
            .resolution
            .millis_until(last + 1, millis, self.timestamp_offset)
            .max(1);
        thread::sleep(Duration::from_millis(wait));
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: i64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(now, last, "clock moved backwards");
        Error::ClockRegression { now, last }
    }

    #[cold]
    #[inline(never)]
    fn cold_timestamp_overflow(err: Error) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %err, "timestamp field exhausted");
        err
    }
}

impl<T> Clone for Generator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            generator_id: self.generator_id,
            timestamp_offset: self.timestamp_offset,
            resolution: self.resolution,
            wait_on_overflow: self.wait_on_overflow,
            state: Arc::clone(&self.state),
            time: self.time.clone(),
        }
    }
}
