//! Discretised level shared by the bar and dial readouts.
//!
//! A reading is clamped into `[min, max]` and mapped onto `0..=divisions`:
//!
//! ```text
//! level = round((value - min) * divisions / (max - min))
//! ```
//!
//! so `min` always shows as level 0 and `max` as the full scale. Readouts draw
//! their indicator proportional to [`Level::fraction`].
//!
//! Requesting zero divisions selects continuous mode: the readout resolves the
//! division count to one level per pixel of indicator travel once its size is
//! known, via [`Level::resolve_continuous`].

use crate::error::{Result, check_range};

/// Clamped, discretised reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Level {
    min: f64,
    max: f64,
    divisions: u32,
    continuous: bool,
    /// Last accepted reading, clamped into range.
    value: f64,
    level: u32,
}

impl Level {
    /// Level over `[min, max]` with `divisions` steps (0 for continuous).
    pub fn new(min: f64, max: f64, divisions: u32) -> Result<Self> {
        check_range(min, max)?;
        Ok(Self {
            min,
            max,
            divisions,
            continuous: divisions == 0,
            value: min,
            level: 0,
        })
    }

    /// Clamp `value` into range and recompute the level. NaN is ignored.
    pub fn update(&mut self, value: f64) -> u32 {
        if value.is_nan() {
            return self.level;
        }
        self.value = value.clamp(self.min, self.max);
        self.level = self.level_for(self.value);
        self.level
    }

    /// Set the level directly, clamped into `0..=divisions`.
    pub fn set_level(&mut self, level: i64) -> u32 {
        self.level = level.clamp(0, i64::from(self.divisions)) as u32;
        self.value = if self.divisions == 0 {
            self.min
        } else {
            self.min + f64::from(self.level) * (self.max - self.min) / f64::from(self.divisions)
        };
        self.level
    }

    /// Resolve continuous mode to one division per pixel of `travel`.
    ///
    /// Does nothing when divisions were given explicitly. The last reading is
    /// re-scaled onto the new division count.
    pub fn resolve_continuous(&mut self, travel: u32) {
        if !self.continuous {
            return;
        }
        self.divisions = travel.max(1);
        self.level = self.level_for(self.value);
    }

    pub const fn level(&self) -> u32 { self.level }

    pub const fn divisions(&self) -> u32 { self.divisions }

    pub const fn min(&self) -> f64 { self.min }

    pub const fn max(&self) -> f64 { self.max }

    /// Last reading after clamping.
    pub const fn value(&self) -> f64 { self.value }

    /// `level / divisions`, in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.divisions == 0 { 0.0 } else { f64::from(self.level) / f64::from(self.divisions) }
    }

    fn level_for(&self, value: f64) -> u32 {
        let scaled = (value - self.min) * f64::from(self.divisions) / (self.max - self.min);
        (scaled.round() as u32).min(self.divisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_bar_scenario() {
        let mut level = Level::new(0.0, 200.0, 100).unwrap();
        assert_eq!(level.update(132.0), 66, "round(132 * 100 / 200)");
        assert_eq!(level.update(250.0), 100, "Above max saturates");
        assert_eq!(level.update(-10.0), 0, "Below min saturates");
    }

    #[test]
    fn test_clamp_law() {
        for (min, max, divisions) in [(0.0, 1.0, 1), (-50.0, 50.0, 7), (10.0, 10.5, 1000)] {
            let mut level = Level::new(min, max, divisions).unwrap();
            assert_eq!(level.update(min), 0);
            assert_eq!(level.update(max), divisions);
            assert_eq!(level.update(min - 1.0), 0);
            assert_eq!(level.update(max + 1.0), divisions);
            assert_eq!(level.update(f64::INFINITY), divisions);
            assert_eq!(level.update(f64::NEG_INFINITY), 0);

            for requested in [-5, 0, 1, i64::from(divisions), i64::from(divisions) + 3, i64::MAX] {
                let set = level.set_level(requested);
                assert!(set <= divisions, "set_level({requested}) gave {set} of {divisions}");
            }
        }
    }

    #[test]
    fn test_set_level_tracks_value() {
        let mut level = Level::new(0.0, 10.0, 5).unwrap();
        assert_eq!(level.set_level(2), 2);
        assert!((level.value() - 4.0).abs() < 1e-9);
        assert!((level.fraction() - 0.4).abs() < 1e-9);
        assert_eq!(level.set_level(-1), 0);
    }

    #[test]
    fn test_nan_is_ignored() {
        let mut level = Level::new(0.0, 10.0, 10).unwrap();
        level.update(3.0);
        assert_eq!(level.update(f64::NAN), 3);
    }

    #[test]
    fn test_rejects_bad_range() {
        assert!(matches!(Level::new(5.0, 1.0, 10), Err(Error::InvalidRange { .. })));
        assert!(matches!(Level::new(1.0, 1.0, 10), Err(Error::InvalidRange { .. })));
        assert!(Level::new(0.0, f64::NAN, 10).is_err());
    }

    #[test]
    fn test_continuous_resolves_from_travel() {
        let mut level = Level::new(0.0, 100.0, 0).unwrap();
        level.update(50.0);
        assert_eq!(level.level(), 0, "Unresolved continuous level stays at zero");

        level.resolve_continuous(80);
        assert_eq!(level.divisions(), 80);
        assert_eq!(level.level(), 40, "Last reading is re-scaled");

        let mut fixed = Level::new(0.0, 100.0, 10).unwrap();
        fixed.resolve_continuous(80);
        assert_eq!(fixed.divisions(), 10, "Explicit divisions are kept");
    }
}
