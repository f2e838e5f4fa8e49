//! Generation-stamped caches for the derived stages of a measurement.
//!
//! Every input of a measurement has a slot in an [`InvalidationClock`] that
//! remembers the generation at which it last changed. A [`CacheSlot`]
//! records the generation it was filled at; it is fresh while none of the
//! inputs its [`Stage`] depends on changed afterwards.
//!
//! # Example
//! ```ignore
//! let mut clock = InvalidationClock::default();
//! let mut slot = CacheSlot::default();
//! slot.store(clock.generation(), 42);
//! assert!(slot.is_fresh(&clock, Stage::Spline));
//! clock.touch(Input::Knots);
//! assert!(!slot.is_fresh(&clock, Stage::Spline));
//! ```

/// Configuration or data a derived stage can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    Knots,
    Strategy,
    ResamplingPower,
    Method,
    NormalizationIndex,
    HighestCoefficient,
}

impl Input {
    pub const ALL: [Self; 6] = [
        Self::Knots,
        Self::Strategy,
        Self::ResamplingPower,
        Self::Method,
        Self::NormalizationIndex,
        Self::HighestCoefficient,
    ];

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Derived structures, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Spline,
    Interpolated,
    Resampled,
    Descriptor,
    Reconstruction,
}

impl Stage {
    pub const ALL: [Self; 5] = [
        Self::Spline,
        Self::Interpolated,
        Self::Resampled,
        Self::Descriptor,
        Self::Reconstruction,
    ];

    /// Transitive inputs of this stage.
    #[must_use]
    pub const fn inputs(self) -> &'static [Input] {
        match self {
            Self::Spline | Self::Interpolated => &[Input::Knots, Input::Strategy],
            Self::Resampled => &[
                Input::Knots,
                Input::Strategy,
                Input::ResamplingPower,
                Input::Method,
            ],
            Self::Descriptor => &[
                Input::Knots,
                Input::Strategy,
                Input::ResamplingPower,
                Input::Method,
                Input::NormalizationIndex,
            ],
            Self::Reconstruction => &Input::ALL,
        }
    }

    #[must_use]
    pub fn depends_on(self, input: Input) -> bool {
        self.inputs().contains(&input)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spline => "spline",
            Self::Interpolated => "interpolated outline",
            Self::Resampled => "resampled outline",
            Self::Descriptor => "descriptor",
            Self::Reconstruction => "reconstruction",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Monotonic generation counter plus the last change of every input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationClock {
    generation: u64,
    changed_at: [u64; 6],
}

impl Default for InvalidationClock {
    fn default() -> Self {
        Self {
            generation: 1,
            changed_at: [1; 6],
        }
    }
}

impl InvalidationClock {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks `input` as changed and returns the new generation.
    pub fn touch(&mut self, input: Input) -> u64 {
        self.generation += 1;
        self.changed_at[input.slot()] = self.generation;
        self.generation
    }

    #[must_use]
    pub const fn changed_at(&self, input: Input) -> u64 {
        self.changed_at[input.slot()]
    }

    /// Newest change among the inputs of `stage`.
    #[must_use]
    pub fn stage_changed_at(&self, stage: Stage) -> u64 {
        stage
            .inputs()
            .iter()
            .map(|input| self.changed_at(*input))
            .max()
            .unwrap_or(0)
    }
}

/// A lazily filled value stamped with the generation it was computed at.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSlot<T> {
    entry: Option<(u64, T)>,
}

impl<T> Default for CacheSlot<T> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<T> CacheSlot<T> {
    #[must_use]
    pub fn is_fresh(&self, clock: &InvalidationClock, stage: Stage) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|(stamp, _)| *stamp >= clock.stage_changed_at(stage))
    }

    /// The stored value if it is still fresh for `stage`.
    #[must_use]
    pub fn get(&self, clock: &InvalidationClock, stage: Stage) -> Option<&T> {
        if self.is_fresh(clock, stage) {
            self.entry.as_ref().map(|(_, value)| value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn stamp(&self) -> Option<u64> {
        self.entry.as_ref().map(|(stamp, _)| *stamp)
    }

    pub fn store(&mut self, generation: u64, value: T) {
        self.entry = Some((generation, value));
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

/// Cache statistics for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutlineCacheStats {
    hits: [usize; 5],
    misses: [usize; 5],
}

impl OutlineCacheStats {
    pub fn record_hit(&mut self, stage: Stage) {
        self.hits[stage.slot()] += 1;
    }

    pub fn record_miss(&mut self, stage: Stage) {
        self.misses[stage.slot()] += 1;
    }

    #[must_use]
    pub const fn hits(&self, stage: Stage) -> usize {
        self.hits[stage.slot()]
    }

    /// Number of times `stage` was (re)computed.
    #[must_use]
    pub const fn misses(&self, stage: Stage) -> usize {
        self.misses[stage.slot()]
    }

    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.hits.iter().sum()
    }

    #[must_use]
    pub fn total_misses(&self) -> usize {
        self.misses.iter().sum()
    }

    /// Returns the cache hit rate as a value between 0.0 and 1.0.
    /// Returns 0.0 if no cache accesses have been made.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_hits() + self.total_misses();
        if total == 0 {
            0.0
        } else {
            self.total_hits() as f64 / total as f64
        }
    }
}
