use crate::{
    DEFAULT_TIMESTAMP_OFFSET, Generator, Resolution, Result, SystemClock, TimeSource,
    generator::State,
    id::{check_generator_id, check_sequence, check_timestamp},
};

/// Builder for a [`Generator`].
///
/// Setters consume and return the config so they chain; each getter mirrors
/// one setter. Nothing is shared with the generator after [`build`].
///
/// | Setting            | Default                           |
/// |--------------------|-----------------------------------|
/// | `timestamp_offset` | [`DEFAULT_TIMESTAMP_OFFSET`]      |
/// | `timestamp_last`   | `0`                               |
/// | `sequence`         | `0`                               |
/// | wait on overflow   | `true`                            |
/// | resolution         | [`Resolution::Millisecond`]       |
///
/// # Example
///
/// ```
/// use flakeid::{GeneratorConfig, Resolution};
///
/// let config = GeneratorConfig::new(42)
///     .unwrap()
///     .timestamp_offset(0)
///     .timestamp_in_seconds()
///     .not_wait_sequence();
/// assert_eq!(config.get_resolution(), Resolution::Second);
/// assert!(!config.get_wait_sequence());
///
/// let generator = config.build().unwrap();
/// assert_eq!(generator.next().unwrap().generator_id(), 42);
/// ```
///
/// [`build`]: GeneratorConfig::build
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeneratorConfig {
    generator_id: u16,
    timestamp_offset: i64,
    timestamp_last: u64,
    sequence: u16,
    wait_sequence: bool,
    resolution: Resolution,
}

impl GeneratorConfig {
    /// Starts a config for `generator_id` with every other setting at its
    /// default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOutOfRange`] if `generator_id` exceeds
    /// [`FlakeId::MAX_GENERATOR_ID`].
    ///
    /// [`Error::FieldOutOfRange`]: crate::Error::FieldOutOfRange
    /// [`FlakeId::MAX_GENERATOR_ID`]: crate::FlakeId::MAX_GENERATOR_ID
    pub fn new(generator_id: u16) -> Result<Self> {
        check_generator_id(generator_id)?;
        Ok(Self {
            generator_id,
            timestamp_offset: DEFAULT_TIMESTAMP_OFFSET,
            timestamp_last: 0,
            sequence: 0,
            wait_sequence: true,
            resolution: Resolution::Millisecond,
        })
    }

    /// Sets the seconds added to every clock reading, which places tick 0 at
    /// a custom origin. Use `0` for the UNIX epoch.
    #[must_use]
    pub const fn timestamp_offset(mut self, offset: i64) -> Self {
        self.timestamp_offset = offset;
        self
    }

    /// Sets the last tick a previous generator issued.
    #[must_use]
    pub const fn timestamp_last(mut self, timestamp: u64) -> Self {
        self.timestamp_last = timestamp;
        self
    }

    /// Sets the last sequence a previous generator issued in
    /// `timestamp_last`.
    #[must_use]
    pub const fn sequence(mut self, sequence: u16) -> Self {
        self.sequence = sequence;
        self
    }

    /// Resumes from a [`Checkpoint`](crate::Checkpoint), setting both
    /// `timestamp_last` and `sequence`.
    #[must_use]
    pub const fn resume_from(self, checkpoint: crate::Checkpoint) -> Self {
        self.timestamp_last(checkpoint.timestamp_last)
            .sequence(checkpoint.sequence)
    }

    /// Block in [`Generator::next`] until the next tick when a tick's
    /// sequence is exhausted.
    #[must_use]
    pub const fn wait_sequence(mut self) -> Self {
        self.wait_sequence = true;
        self
    }

    /// Fail with [`Error::SequenceOverflow`] instead of blocking.
    ///
    /// [`Error::SequenceOverflow`]: crate::Error::SequenceOverflow
    #[must_use]
    pub const fn not_wait_sequence(mut self) -> Self {
        self.wait_sequence = false;
        self
    }

    /// Count ticks in seconds.
    #[must_use]
    pub const fn timestamp_in_seconds(self) -> Self {
        self.resolution(Resolution::Second)
    }

    /// Count ticks in milliseconds.
    #[must_use]
    pub const fn timestamp_in_millisecond(self) -> Self {
        self.resolution(Resolution::Millisecond)
    }

    /// Sets the tick length.
    #[must_use]
    pub const fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// The generator id stamped into every ID.
    pub const fn get_generator_id(&self) -> u16 {
        self.generator_id
    }

    /// Seconds added to clock readings; `0` counts from the UNIX epoch.
    pub const fn get_timestamp_offset(&self) -> i64 {
        self.timestamp_offset
    }

    /// The last tick a previous generator issued.
    pub const fn get_timestamp_last(&self) -> u64 {
        self.timestamp_last
    }

    /// The last sequence issued in `timestamp_last`.
    pub const fn get_sequence(&self) -> u16 {
        self.sequence
    }

    /// Whether the built generator blocks when a tick's sequence runs out.
    pub const fn get_wait_sequence(&self) -> bool {
        self.wait_sequence
    }

    /// The tick length.
    pub const fn get_resolution(&self) -> Resolution {
        self.resolution
    }

    /// Whether ticks are counted in seconds.
    pub const fn is_timestamp_in_seconds(&self) -> bool {
        matches!(self.resolution, Resolution::Second)
    }

    /// Builds a generator reading the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOutOfRange`] if `timestamp_last` or `sequence`
    /// does not fit its field.
    ///
    /// [`Error::FieldOutOfRange`]: crate::Error::FieldOutOfRange
    pub fn build(self) -> Result<Generator<SystemClock>> {
        self.build_with_clock(SystemClock)
    }

    /// Builds a generator reading `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOutOfRange`] if `timestamp_last` or `sequence`
    /// does not fit its field.
    ///
    /// [`Error::FieldOutOfRange`]: crate::Error::FieldOutOfRange
    pub fn build_with_clock<T: TimeSource>(self, time: T) -> Result<Generator<T>> {
        check_timestamp(self.timestamp_last)?;
        check_sequence(self.sequence)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            generator_id = self.generator_id,
            timestamp_offset = self.timestamp_offset,
            resolution = ?self.resolution,
            wait_sequence = self.wait_sequence,
            timestamp_last = self.timestamp_last,
            sequence = self.sequence,
            "built generator"
        );

        Ok(Generator::from_parts(
            self.generator_id,
            self.timestamp_offset,
            self.resolution,
            self.wait_sequence,
            State::new(self.timestamp_last, self.sequence),
            time,
        ))
    }
}
