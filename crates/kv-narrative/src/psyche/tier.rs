//! Derived labels over the psychological scalars.
//!
//! All of these are pure functions of a current value. They are recomputed
//! on every read and never stored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Four-way stability bucket over sanity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StabilityTier {
    /// Below the first boundary.
    Fractured,
    /// Between the first and second boundary.
    Paranoid,
    /// Between the second and third boundary.
    Distracted,
    /// At or above the third boundary.
    Clear,
}

impl StabilityTier {
    /// Classify `value` against ascending `boundaries`.
    pub fn from_value(value: i32, boundaries: [i32; 3]) -> Self {
        if value < boundaries[0] {
            Self::Fractured
        } else if value < boundaries[1] {
            Self::Paranoid
        } else if value < boundaries[2] {
            Self::Distracted
        } else {
            Self::Clear
        }
    }

    /// A short line for the status display.
    pub fn description(self) -> &'static str {
        match self {
            Self::Fractured => "Reality is coming apart at the seams.",
            Self::Paranoid => "Everyone is watching. Everyone is lying.",
            Self::Distracted => "Your thoughts keep slipping sideways.",
            Self::Clear => "Your mind is steady.",
        }
    }
}

impl fmt::Display for StabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fractured => write!(f, "Fractured"),
            Self::Paranoid => write!(f, "Paranoid"),
            Self::Distracted => write!(f, "Distracted"),
            Self::Clear => write!(f, "Clear"),
        }
    }
}

/// Five-way clarity label over sanity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClarityLabel {
    /// Below the lowest threshold.
    Lost,
    /// At or above the fourth threshold.
    Critical,
    /// At or above the third threshold.
    Fraying,
    /// At or above the second threshold.
    Clouded,
    /// At or above the first threshold.
    Lucid,
}

impl ClarityLabel {
    /// Classify `value` against descending `thresholds`.
    pub fn from_value(value: i32, thresholds: [i32; 4]) -> Self {
        if value >= thresholds[0] {
            Self::Lucid
        } else if value >= thresholds[1] {
            Self::Clouded
        } else if value >= thresholds[2] {
            Self::Fraying
        } else if value >= thresholds[3] {
            Self::Critical
        } else {
            Self::Lost
        }
    }
}

impl fmt::Display for ClarityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lucid => write!(f, "Lucid"),
            Self::Clouded => write!(f, "Clouded"),
            Self::Fraying => write!(f, "Fraying"),
            Self::Critical => write!(f, "Critical"),
            Self::Lost => write!(f, "Lost"),
        }
    }
}

/// How stress shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StressSymptom {
    /// Below 25.
    Calm,
    /// 25–49.
    Tense,
    /// 50–74.
    Strained,
    /// 75 and up.
    Overloaded,
}

impl StressSymptom {
    /// Classify a stress value.
    pub fn from_value(stress: i32) -> Self {
        match stress {
            ..25 => Self::Calm,
            25..50 => Self::Tense,
            50..75 => Self::Strained,
            _ => Self::Overloaded,
        }
    }
}

/// How doubt shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DoubtSymptom {
    /// Below 30.
    Confident,
    /// 30–59.
    Uncertain,
    /// 60 and up.
    Paranoid,
}

impl DoubtSymptom {
    /// Classify a doubt value.
    pub fn from_value(doubt: i32) -> Self {
        match doubt {
            ..30 => Self::Confident,
            30..60 => Self::Uncertain,
            _ => Self::Paranoid,
        }
    }
}

/// How obsession shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObsessionSymptom {
    /// Below 30.
    Detached,
    /// 30–59.
    Fixated,
    /// 60 and up.
    Obsessed,
}

impl ObsessionSymptom {
    /// Classify an obsession value.
    pub fn from_value(obsession: i32) -> Self {
        match obsession {
            ..30 => Self::Detached,
            30..60 => Self::Fixated,
            _ => Self::Obsessed,
        }
    }
}

macro_rules! debug_display {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        })*
    };
}

debug_display!(StressSymptom, DoubtSymptom, ObsessionSymptom);
