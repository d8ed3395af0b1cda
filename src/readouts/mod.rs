//! Passive display widgets fed by typed updates.
//!
//! A readout declares which kinds of [`Update`] it accepts as a
//! [`Capabilities`] set. Generators check that set once, when the readout is
//! registered, and afterwards only push the updates it accepts.
//!
//! | Readout | Accepts |
//! |---------|---------|
//! | [`BarReadout`] | number |
//! | [`DialReadout`] | number |
//! | [`ColorReadout`] | color |
//! | [`ImageReadout`] | image |
//! | [`BufferReadout`] | string, number |
//! | [`CompassReadout`] | location |
//! | [`MinimapReadout`] | location |
//!
//! # Freezing
//!
//! Every readout carries a frozen flag. While it is set, [`Readout::update`]
//! ignores everything and the readout keeps showing what it showed when it was
//! frozen.
//!
//! # Sharing
//!
//! A readout usually sits in the widget tree and in one or more generators at
//! the same time, so it is shared as `Arc<Mutex<R>>`. [`share`] builds the
//! typed handle; it coerces to [`SharedReadout`] for registration.

mod bar;
mod buffer;
mod color;
mod compass;
mod dial;
mod image;
pub mod level;
mod minimap;

use std::ops::BitOr;
use std::sync::{Arc, Mutex, MutexGuard};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::colors::{GRAY, text_color_for};
use crate::config::READOUT_INSET;
use crate::error::{Error, Result};
use crate::shape::Shape;
use crate::widget::{Widget, lock};

pub use bar::{BarConfig, BarReadout, Orientation};
pub use buffer::{BufferConfig, BufferReadout};
pub use color::{ColorConfig, ColorReadout};
pub use compass::{CompassConfig, CompassReadout, heading_text};
pub use dial::{DialConfig, DialReadout};
pub use image::{ImageConfig, ImageReadout};
pub use level::Level;
pub use minimap::{MinimapConfig, MinimapReadout};

// =============================================================================
// Capabilities
// =============================================================================

/// Set of update kinds a readout accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);
    pub const NUMBER: Self = Self(1 << 0);
    pub const COLOR: Self = Self(1 << 1);
    pub const IMAGE: Self = Self(1 << 2);
    pub const STRING: Self = Self(1 << 3);
    pub const LOCATION: Self = Self(1 << 4);

    pub const fn union(self, other: Self) -> Self { Self(self.0 | other.0) }

    /// Kinds present in both sets.
    pub const fn intersection(self, other: Self) -> Self { Self(self.0 & other.0) }

    /// Whether every kind in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }

    pub const fn is_empty(self) -> bool { self.0 == 0 }

    /// Whether an update of this kind may be pushed to a sink with these capabilities.
    pub const fn accepts(self, update: &Update) -> bool { self.contains(update.capability()) }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self { self.union(rhs) }
}

// =============================================================================
// Update Payloads
// =============================================================================

/// Position plus heading, or nothing at all.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Location {
    #[default]
    Unknown,
    /// `bearing` in degrees clockwise from north.
    Known { x: f64, y: f64, bearing: f64 },
}

impl Location {
    /// Build a location from optional parts, which must be present or absent together.
    pub fn new(position: Option<(f64, f64)>, bearing: Option<f64>) -> Result<Self> {
        match (position, bearing) {
            (Some((x, y)), Some(bearing)) => Ok(Self::known(x, y, bearing)),
            (None, None) => Ok(Self::Unknown),
            _ => Err(Error::MismatchedLocation),
        }
    }

    /// Known location with the bearing normalised to `0.0..360.0`.
    pub fn known(x: f64, y: f64, bearing: f64) -> Self {
        Self::Known {
            x,
            y,
            bearing: bearing.rem_euclid(360.0),
        }
    }

    pub const fn position(&self) -> Option<(f64, f64)> {
        match *self {
            Self::Known { x, y, .. } => Some((x, y)),
            Self::Unknown => None,
        }
    }

    pub const fn bearing(&self) -> Option<f64> {
        match *self {
            Self::Known { bearing, .. } => Some(bearing),
            Self::Unknown => None,
        }
    }
}

/// Row-major RGB565 picture.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    size: Size,
    pixels: Arc<[Rgb565]>,
}

impl Image {
    /// Wrap `pixels`, which must hold exactly `width * height` entries.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb565>) -> Result<Self> {
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(Error::ImageSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            size: Size::new(width, height),
            pixels: pixels.into(),
        })
    }

    /// Single-color image.
    pub fn solid(width: u32, height: u32, color: Rgb565) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: vec![color; (width as usize) * (height as usize)].into(),
        }
    }

    pub const fn size(&self) -> Size { self.size }

    pub fn pixels(&self) -> &[Rgb565] { &self.pixels }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels.get((y * self.size.width + x) as usize).copied()
    }
}

/// One value pushed into a readout.
#[derive(Clone, Debug, PartialEq)]
pub enum Update {
    Number(f64),
    Color(Rgb565),
    Image(Image),
    Text(String),
    Location(Location),
}

impl Update {
    /// Capability a sink needs to receive this update.
    pub const fn capability(&self) -> Capabilities {
        match self {
            Self::Number(_) => Capabilities::NUMBER,
            Self::Color(_) => Capabilities::COLOR,
            Self::Image(_) => Capabilities::IMAGE,
            Self::Text(_) => Capabilities::STRING,
            Self::Location(_) => Capabilities::LOCATION,
        }
    }
}

// =============================================================================
// Readout Trait
// =============================================================================

/// A display widget updated through typed [`Update`]s.
pub trait Readout: Widget {
    /// Update kinds this readout accepts.
    fn capabilities(&self) -> Capabilities;

    fn is_frozen(&self) -> bool;

    fn set_frozen(&mut self, frozen: bool);

    /// Apply an accepted update unconditionally.
    fn apply(&mut self, update: &Update);

    /// Apply `update` unless frozen or of a kind this readout does not accept.
    fn update(&mut self, update: &Update) {
        if !self.is_frozen() && self.capabilities().accepts(update) {
            self.apply(update);
        }
    }
}

/// Readout shared between the widget tree and generator threads.
pub type SharedReadout = Arc<Mutex<dyn Readout>>;

/// Wrap a readout for sharing. The handle coerces to [`SharedReadout`].
pub fn share<R: Readout + 'static>(readout: R) -> Arc<Mutex<R>> { Arc::new(Mutex::new(readout)) }

/// Lock a shared readout, recovering it if an updater panicked.
pub fn lock_readout<R: Readout + ?Sized>(readout: &Mutex<R>) -> MutexGuard<'_, R> { lock(readout) }

// =============================================================================
// Common Body
// =============================================================================

/// State every readout has: label, area, background and frozen flag.
#[derive(Clone, Debug)]
pub(crate) struct Body {
    pub label: String,
    pub area: Rectangle,
    pub background: Rgb565,
    pub frozen: bool,
}

impl Body {
    pub fn new(label: &str, position: Point, size: Size, background: Rgb565) -> Self {
        Self {
            label: label.to_owned(),
            area: Rectangle::new(position, size),
            background,
            frozen: false,
        }
    }

    /// Absolute area for a parent frame at `origin`.
    pub fn absolute(&self, origin: Point) -> Rectangle { Rectangle::new(origin + self.area.top_left, self.area.size) }

    /// Area left for indicator geometry inside the frame.
    pub fn inner(&self, origin: Point) -> Rectangle { self.absolute(origin).offset(-(READOUT_INSET as i32)) }

    /// Background, frame and (if any) the label just below the top edge.
    pub fn render_frame(&self, origin: Point, out: &mut Vec<Shape>) {
        let area = self.absolute(origin);
        out.push(Shape::Rect {
            area,
            fill: self.background,
        });
        out.push(Shape::Frame {
            area,
            color: GRAY,
            width: 1,
        });
        if !self.label.is_empty() {
            out.push(Shape::label(
                self.label.clone(),
                Point::new(area.center().x, area.top_left.y + 10),
                text_color_for(self.background),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{RED, WHITE};

    #[test]
    fn test_capabilities_set_operations() {
        let caps = Capabilities::NUMBER | Capabilities::STRING;
        assert!(caps.contains(Capabilities::NUMBER));
        assert!(!caps.contains(Capabilities::COLOR));
        assert!(caps.intersection(Capabilities::COLOR).is_empty());
        assert!(Capabilities::NONE.is_empty());
        assert!(caps.accepts(&Update::Text("x".into())));
        assert!(!caps.accepts(&Update::Color(RED)));
    }

    #[test]
    fn test_location_parts_must_match() {
        assert_eq!(Location::new(None, None).unwrap(), Location::Unknown);
        assert!(matches!(Location::new(Some((1.0, 2.0)), None), Err(Error::MismatchedLocation)));
        assert!(matches!(Location::new(None, Some(90.0)), Err(Error::MismatchedLocation)));

        let known = Location::new(Some((1.0, 2.0)), Some(-90.0)).unwrap();
        assert_eq!(known.position(), Some((1.0, 2.0)));
        assert_eq!(known.bearing(), Some(270.0), "Bearing is normalised");
    }

    #[test]
    fn test_image_size_checked() {
        assert!(matches!(
            Image::new(2, 2, vec![RED; 3]),
            Err(Error::ImageSize { expected: 4, actual: 3 })
        ));
        let image = Image::new(2, 1, vec![RED, WHITE]).unwrap();
        assert_eq!(image.pixel(1, 0), Some(WHITE));
        assert_eq!(image.pixel(2, 0), None);
        assert_eq!(Image::solid(3, 3, RED).pixels().len(), 9);
    }

    #[test]
    fn test_update_capability() {
        assert_eq!(Update::Number(1.0).capability(), Capabilities::NUMBER);
        assert_eq!(Update::Location(Location::Unknown).capability(), Capabilities::LOCATION);
        assert_eq!(Update::Image(Image::solid(1, 1, RED)).capability(), Capabilities::IMAGE);
    }

    #[test]
    fn test_shared_handle_coerces_and_freezes() {
        let lamp = share(ColorReadout::new(ColorConfig::default()));
        let shared: SharedReadout = lamp.clone();
        lock_readout(&shared).set_frozen(true);
        lock_readout(&shared).update(&Update::Color(RED));
        assert_ne!(lock_readout(&lamp).color(), RED, "Frozen readout keeps its color");

        lock_readout(&shared).set_frozen(false);
        lock_readout(&shared).update(&Update::Color(RED));
        assert_eq!(lock_readout(&lamp).color(), RED);
    }
}
