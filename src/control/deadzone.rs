//! Deadzone-aware indicator classification.
//!
//! A raw potentiometer sample falls into one of three bands:
//!
//! ```text
//!   0 ─────────── min ════════ max ─────────── 65535
//!        Low           Dead          High
//!   (inverted ramp)  (centred)   (direct ramp)
//! ```
//!
//! Both deadzone boundaries belong to the dead band.  The [`Classifier`]
//! turns a sample into a [`LevelSet`] for either the one-LED or the
//! three-LED indicator; the single-LED case is the three-LED policy
//! collapsed onto one channel with no centre light.

use serde::Serialize;

use super::mapping::map_range;
use crate::config::IndicatorConfig;
use crate::error::ConfigError;

/// Full-scale 16-bit duty / sample value.
pub const FULL_SCALE: u16 = u16::MAX;

/// Physical indicator layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndicatorMode {
    /// One LED: brightness grows with distance from centre, dark when centred.
    Single,
    /// Three LEDs: low-side, centre, high-side.
    Triple,
}

impl IndicatorMode {
    pub const fn channel_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Triple => 3,
        }
    }
}

/// Which side of the deadzone a sample lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Dead,
    High,
}

/// Closed interval of raw samples treated as "centred".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadzone {
    min: u16,
    max: u16,
}

impl Deadzone {
    pub fn new(min: u16, max: u16) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::DeadzoneInverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    pub fn contains(&self, sample: u16) -> bool {
        (self.min..=self.max).contains(&sample)
    }

    pub fn classify(&self, sample: u16) -> Band {
        if self.contains(sample) {
            Band::Dead
        } else if sample < self.min {
            Band::Low
        } else {
            Band::High
        }
    }
}

/// Per-channel levels of the three-LED indicator.
///
/// At most one field is non-zero: `low` below the deadzone, `dead` inside
/// it, `high` above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TripleLevels {
    pub low: u16,
    pub dead: u16,
    pub high: u16,
}

impl TripleLevels {
    /// Levels in physical channel order (low, dead, high).
    pub const fn as_array(&self) -> [u16; 3] {
        [self.low, self.dead, self.high]
    }

    /// Number of channels that are lit.
    pub fn lit_count(&self) -> usize {
        self.as_array().iter().filter(|&&l| l > 0).count()
    }
}

/// One tick's worth of indicator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSet {
    Single(u16),
    Triple(TripleLevels),
}

impl LevelSet {
    pub fn channel_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Triple(_) => 3,
        }
    }

    /// Levels in physical channel order.
    pub fn channels(&self) -> impl Iterator<Item = u16> {
        let (levels, n) = match *self {
            Self::Single(level) => ([level, 0, 0], 1),
            Self::Triple(t) => (t.as_array(), 3),
        };
        levels.into_iter().take(n)
    }
}

/// Sample → indicator levels, for either indicator layout.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    deadzone: Deadzone,
    mode: IndicatorMode,
    dead_intensity: u16,
}

impl Classifier {
    pub fn new(deadzone: Deadzone, mode: IndicatorMode, dead_intensity: u16) -> Self {
        Self {
            deadzone,
            mode,
            dead_intensity,
        }
    }

    pub fn from_config(cfg: &IndicatorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(cfg.deadzone()?, cfg.mode, cfg.dead_intensity))
    }

    pub fn mode(&self) -> IndicatorMode {
        self.mode
    }

    pub fn deadzone(&self) -> Deadzone {
        self.deadzone
    }

    /// Compute this tick's levels for the configured layout.
    pub fn levels(&self, sample: u16) -> LevelSet {
        match self.mode {
            IndicatorMode::Single => LevelSet::Single(self.single_level(sample)),
            IndicatorMode::Triple => LevelSet::Triple(self.triple_levels(sample)),
        }
    }

    /// One-LED policy: dark when centred, brighter the further off-centre.
    pub fn single_level(&self, sample: u16) -> u16 {
        match self.deadzone.classify(sample) {
            Band::Dead => 0,
            Band::Low => self.low_ramp(sample),
            Band::High => self.high_ramp(sample),
        }
    }

    /// Three-LED policy: exactly one branch lights exactly one channel.
    pub fn triple_levels(&self, sample: u16) -> TripleLevels {
        match self.deadzone.classify(sample) {
            Band::Dead => TripleLevels {
                dead: self.dead_intensity,
                ..TripleLevels::default()
            },
            Band::Low => TripleLevels {
                low: self.low_ramp(sample),
                ..TripleLevels::default()
            },
            Band::High => TripleLevels {
                high: self.high_ramp(sample),
                ..TripleLevels::default()
            },
        }
    }

    // Only called for samples strictly below `min`, so `min > 0` here.
    fn low_ramp(&self, sample: u16) -> u16 {
        saturate(map_range(
            i64::from(sample),
            0,
            i64::from(self.deadzone.min),
            i64::from(FULL_SCALE),
            0,
        ))
    }

    // Only called for samples strictly above `max`, so `max < 65535` here.
    fn high_ramp(&self, sample: u16) -> u16 {
        saturate(map_range(
            i64::from(sample),
            i64::from(self.deadzone.max),
            i64::from(FULL_SCALE),
            0,
            i64::from(FULL_SCALE),
        ))
    }
}

fn saturate(level: i64) -> u16 {
    level.clamp(0, i64::from(FULL_SCALE)) as u16
}
