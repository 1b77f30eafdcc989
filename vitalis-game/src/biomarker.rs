//! Biomarker model: the regulated physiological quantities and their
//! classification bands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    GLUCOSE_CRITICAL, GLUCOSE_NORMAL, GLUCOSE_START, PH_CRITICAL, PH_NORMAL, PH_START,
    TEMPERATURE_CRITICAL, TEMPERATURE_NORMAL, TEMPERATURE_START, TREND_STABLE_EPSILON,
};
use crate::data::ContentError;

/// Closed set of regulated systems. Content referencing anything else fails
/// at deserialization time and never reaches the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodySystem {
    Glucose,
    Ph,
    Temperature,
}

impl BodySystem {
    pub const ALL: [Self; 3] = [Self::Glucose, Self::Ph, Self::Temperature];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Glucose => "glucose",
            Self::Ph => "ph",
            Self::Temperature => "temperature",
        }
    }
}

impl fmt::Display for BodySystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodySystem {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "glucose" => Ok(Self::Glucose),
            "ph" => Ok(Self::Ph),
            "temperature" => Ok(Self::Temperature),
            _ => Err(()),
        }
    }
}

impl From<BodySystem> for String {
    fn from(value: BodySystem) -> Self {
        value.as_str().to_string()
    }
}

/// Inclusive `[low, high]` band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Inclusive containment test; values exactly on a bound are inside.
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl From<(f64, f64)> for Range {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

/// Direction of the most recent value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Stable,
    Increasing,
    Decreasing,
}

impl Trend {
    /// Classify a delta. Magnitudes strictly below the stability epsilon are
    /// flat; at exactly the epsilon the sign wins.
    #[must_use]
    pub fn from_delta(delta: f64) -> Self {
        if delta.abs() < TREND_STABLE_EPSILON {
            Self::Stable
        } else if delta > 0.0 {
            Self::Increasing
        } else {
            Self::Decreasing
        }
    }
}

/// Classification band a reading currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiomarkerZone {
    /// Inside the normal range.
    Stable,
    /// Outside normal but still inside the critical band.
    Caution,
    /// Strictly outside the critical band.
    Critical,
}

/// One regulated physiological quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biomarker {
    pub system: BodySystem,
    pub current_value: f64,
    pub normal_range: Range,
    pub critical_range: Range,
    #[serde(default)]
    pub is_critical: bool,
    #[serde(default)]
    pub trend: Trend,
    pub last_update: DateTime<Utc>,
}

impl Biomarker {
    #[must_use]
    pub fn new(system: BodySystem, value: f64, normal_range: Range, critical_range: Range) -> Self {
        Self {
            system,
            current_value: value,
            normal_range,
            critical_range,
            is_critical: !critical_range.contains(value),
            trend: Trend::Stable,
            last_update: Utc::now(),
        }
    }

    /// Shift the reading by a signed delta, reclassifying from the literal
    /// delta that was applied.
    pub fn apply_delta(&mut self, delta: f64) {
        self.current_value += delta;
        self.reclassify(delta);
    }

    /// Overwrite the reading, deriving the trend from the difference.
    pub fn set_value(&mut self, value: f64) {
        let delta = value - self.current_value;
        self.current_value = value;
        self.reclassify(delta);
    }

    fn reclassify(&mut self, delta: f64) {
        self.is_critical = !self.critical_range.contains(self.current_value);
        self.trend = Trend::from_delta(delta);
        self.last_update = Utc::now();
    }

    /// Whether the reading sits inside the normal range.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.normal_range.contains(self.current_value)
    }

    #[must_use]
    pub fn zone(&self) -> BiomarkerZone {
        if !self.critical_range.contains(self.current_value) {
            BiomarkerZone::Critical
        } else if self.normal_range.contains(self.current_value) {
            BiomarkerZone::Stable
        } else {
            BiomarkerZone::Caution
        }
    }

    /// Authoring-time invariant checks: ordered bounds, and the normal band
    /// strictly inside the critical band.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when a range is inverted or the bands do not
    /// nest.
    pub fn validate(&self) -> Result<(), ContentError> {
        for range in [self.normal_range, self.critical_range] {
            if range.low > range.high {
                return Err(ContentError::InvertedRange {
                    system: self.system,
                    low: range.low,
                    high: range.high,
                });
            }
        }
        if self.normal_range.low <= self.critical_range.low
            || self.normal_range.high >= self.critical_range.high
        {
            return Err(ContentError::RangeNesting {
                system: self.system,
            });
        }
        Ok(())
    }
}

/// Fixed record of exactly three biomarkers, one per system. Lookup by
/// system is total, so the resolver's effect application can never miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub glucose: Biomarker,
    pub ph: Biomarker,
    pub temperature: Biomarker,
}

impl Vitals {
    /// Textbook starting physiology for a fresh session.
    #[must_use]
    pub fn starting() -> Self {
        Self {
            glucose: Biomarker::new(
                BodySystem::Glucose,
                GLUCOSE_START,
                GLUCOSE_NORMAL.into(),
                GLUCOSE_CRITICAL.into(),
            ),
            ph: Biomarker::new(BodySystem::Ph, PH_START, PH_NORMAL.into(), PH_CRITICAL.into()),
            temperature: Biomarker::new(
                BodySystem::Temperature,
                TEMPERATURE_START,
                TEMPERATURE_NORMAL.into(),
                TEMPERATURE_CRITICAL.into(),
            ),
        }
    }

    #[must_use]
    pub const fn get(&self, system: BodySystem) -> &Biomarker {
        match system {
            BodySystem::Glucose => &self.glucose,
            BodySystem::Ph => &self.ph,
            BodySystem::Temperature => &self.temperature,
        }
    }

    pub const fn get_mut(&mut self, system: BodySystem) -> &mut Biomarker {
        match system {
            BodySystem::Glucose => &mut self.glucose,
            BodySystem::Ph => &mut self.ph,
            BodySystem::Temperature => &mut self.temperature,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Biomarker> {
        [&self.glucose, &self.ph, &self.temperature].into_iter()
    }

    /// Number of systems strictly outside their critical band.
    #[must_use]
    pub fn critical_count(&self) -> usize {
        self.iter().filter(|marker| marker.is_critical).count()
    }

    /// Number of systems inside their normal range.
    #[must_use]
    pub fn stable_count(&self) -> usize {
        self.iter().filter(|marker| marker.is_stable()).count()
    }

    #[must_use]
    pub fn all_stable(&self) -> bool {
        self.iter().all(Biomarker::is_stable)
    }

    /// Validate the authoring invariants of every system.
    ///
    /// # Errors
    ///
    /// Returns the first `ContentError` found.
    pub fn validate(&self) -> Result<(), ContentError> {
        for marker in self.iter() {
            marker.validate()?;
        }
        Ok(())
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::starting()
    }
}
