//! Synthetic data sources for demo panels and tests.

use core::f64::consts::TAU;
use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use rand::Rng;

use super::{SinkSet, Source};
use crate::colors::{GREEN, ORANGE, RED};
use crate::error::{Error, Result, check_range};
use crate::readouts::{Capabilities, Image, Location, Readout, Update};
use crate::task::Flow;

// =============================================================================
// Numbers
// =============================================================================

/// Uniform random reading in `[min, max)`, the same value for every sink.
#[derive(Clone, Debug)]
pub struct RandomNumbers {
    min: f64,
    max: f64,
}

impl RandomNumbers {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        check_range(min, max)?;
        Ok(Self { min, max })
    }
}

impl Source for RandomNumbers {
    fn produces(&self) -> Capabilities { Capabilities::NUMBER }

    fn produce(&mut self, sinks: &mut SinkSet) -> Flow {
        let value = rand::rng().random_range(self.min..self.max);
        sinks.broadcast(&Update::Number(value));
        Flow::Continue
    }
}

/// Simulated sensor sweeping sinusoidally between `min` and `max`.
#[derive(Clone, Debug)]
pub struct SineSensor {
    min: f64,
    max: f64,
    /// Work units per full sweep.
    period: u32,
    step: u32,
}

impl SineSensor {
    /// Sensor starting at mid-range; a zero `period` is treated as one step.
    pub fn new(min: f64, max: f64, period: u32) -> Result<Self> {
        check_range(min, max)?;
        Ok(Self {
            min,
            max,
            period: period.max(1),
            step: 0,
        })
    }

    /// Reading for the current step.
    pub fn reading(&self) -> f64 {
        let mid = (self.min + self.max) / 2.0;
        let amplitude = (self.max - self.min) / 2.0;
        mid + amplitude * (TAU * f64::from(self.step) / f64::from(self.period)).sin()
    }
}

impl Source for SineSensor {
    fn produces(&self) -> Capabilities { Capabilities::NUMBER }

    fn produce(&mut self, sinks: &mut SinkSet) -> Flow {
        let value = self.reading();
        sinks.broadcast(&Update::Number(value));
        self.step = (self.step + 1) % self.period;
        Flow::Continue
    }
}

// =============================================================================
// Colors and Images
// =============================================================================

/// Random color, the same for every color sink.
#[derive(Clone, Debug, Default)]
pub struct RandomColors;

fn random_color(rng: &mut impl Rng) -> Rgb565 {
    Rgb565::new(rng.random_range(0..32), rng.random_range(0..64), rng.random_range(0..32))
}

impl Source for RandomColors {
    fn produces(&self) -> Capabilities { Capabilities::COLOR }

    fn produce(&mut self, sinks: &mut SinkSet) -> Flow {
        sinks.broadcast(&Update::Color(random_color(&mut rand::rng())));
        Flow::Continue
    }
}

/// Random-pixel images of a fixed size.
#[derive(Clone, Debug)]
pub struct RandomImages {
    width: u32,
    height: u32,
}

impl RandomImages {
    /// Rejects a size whose pixel count does not fit in `u32`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width.checked_mul(height).is_none() {
            return Err(Error::ImageTooLarge { width, height });
        }
        Ok(Self { width, height })
    }
}

impl Source for RandomImages {
    fn produces(&self) -> Capabilities { Capabilities::IMAGE }

    fn produce(&mut self, sinks: &mut SinkSet) -> Flow {
        let mut rng = rand::rng();
        let count = self.width as usize * self.height as usize;
        let pixels = (0..count).map(|_| random_color(&mut rng)).collect();
        match Image::new(self.width, self.height, pixels) {
            Ok(image) => {
                sinks.broadcast(&Update::Image(image));
            }
            Err(err) => tracing::error!(%err, "random image"),
        }
        Flow::Continue
    }
}

// =============================================================================
// Text
// =============================================================================

/// Independent random hex address for each string sink.
#[derive(Clone, Debug, Default)]
pub struct Addresses;

impl Source for Addresses {
    fn produces(&self) -> Capabilities { Capabilities::STRING }

    fn produce(&mut self, sinks: &mut SinkSet) -> Flow {
        let mut rng = rand::rng();
        sinks.for_each_accepting(Capabilities::STRING, |_, readout| {
            let address: u32 = rng.random();
            readout.update(&Update::Text(format!("0x{address:08X}")));
        });
        Flow::Continue
    }
}

// =============================================================================
// Locations
// =============================================================================

/// Position wandering forward with small random turns.
#[derive(Clone, Debug)]
pub struct RandomWalk {
    x: f64,
    y: f64,
    bearing: f64,
    /// Distance moved per work unit.
    speed: f64,
    /// Largest turn per work unit, in degrees.
    max_turn: f64,
}

impl RandomWalk {
    pub fn new(speed: f64, max_turn: f64) -> Result<Self> {
        if !speed.is_finite() || !max_turn.is_finite() {
            return Err(Error::InvalidRange {
                min: speed,
                max: max_turn,
            });
        }
        Ok(Self {
            x: 0.0,
            y: 0.0,
            bearing: 0.0,
            speed,
            max_turn: max_turn.abs(),
        })
    }

    /// Current location.
    pub fn location(&self) -> Location { Location::known(self.x, self.y, self.bearing) }

    /// Turn by `turn` degrees and move `distance` along the new bearing.
    pub fn advance(&mut self, turn: f64, distance: f64) -> Location {
        self.bearing = (self.bearing + turn).rem_euclid(360.0);
        let (sin, cos) = self.bearing.to_radians().sin_cos();
        // Bearing 0 is north (+y), 90 is east (+x)
        self.x += distance * sin;
        self.y += distance * cos;
        self.location()
    }

    fn step(&mut self) -> Location {
        let turn = if self.max_turn > 0.0 {
            rand::rng().random_range(-self.max_turn..=self.max_turn)
        } else {
            0.0
        };
        self.advance(turn, self.speed)
    }
}

impl Source for RandomWalk {
    fn produces(&self) -> Capabilities { Capabilities::LOCATION }

    fn produce(&mut self, sinks: &mut SinkSet) -> Flow {
        let location = self.step();
        sinks.broadcast(&Update::Location(location));
        Flow::Continue
    }
}

// =============================================================================
// Vehicle Datum
// =============================================================================

/// Warning color for a reading against two ascending thresholds.
pub fn threshold_color(value: f64, warning: f64, critical: f64) -> Rgb565 {
    if value >= critical {
        RED
    } else if value >= warning {
        ORANGE
    } else {
        GREEN
    }
}

/// One speed reading plus position, fanned out by sink capability.
///
/// Each unit draws a speed in `[min, max)` and drives the walk that far.
/// Number sinks get the speed, color sinks its threshold color, string sinks
/// a summary line and location sinks the new fix.
#[derive(Clone, Debug)]
pub struct DatumSource {
    min: f64,
    max: f64,
    warning: f64,
    critical: f64,
    walk: RandomWalk,
}

impl DatumSource {
    pub fn new(min: f64, max: f64, warning: f64, critical: f64) -> Result<Self> {
        check_range(min, max)?;
        check_range(warning, critical)?;
        Ok(Self {
            min,
            max,
            warning,
            critical,
            walk: RandomWalk::new(0.0, 15.0)?,
        })
    }

    fn emit(&mut self, sinks: &SinkSet, speed: f64, turn: f64) {
        let location = self.walk.advance(turn, speed / 10.0);
        sinks.broadcast(&Update::Number(speed));
        sinks.broadcast(&Update::Color(threshold_color(speed, self.warning, self.critical)));

        let mut line = String::new();
        let _ = write!(line, "SPD {speed:.1}");
        if let Some(bearing) = location.bearing() {
            let _ = write!(line, " HDG {bearing:03.0}");
        }
        sinks.broadcast(&Update::Text(line));
        sinks.broadcast(&Update::Location(location));
    }
}

impl Source for DatumSource {
    fn produces(&self) -> Capabilities {
        Capabilities::NUMBER | Capabilities::COLOR | Capabilities::STRING | Capabilities::LOCATION
    }

    fn produce(&mut self, sinks: &mut SinkSet) -> Flow {
        let mut rng = rand::rng();
        let speed = rng.random_range(self.min..self.max);
        let turn = rng.random_range(-15.0..=15.0);
        self.emit(sinks, speed, turn);
        Flow::Continue
    }
}
