//! Compass readout: bearing needle plus a heading such as `"NE 045"`.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::{Body, Capabilities, Location, Readout, Update};
use crate::colors::{BLACK, GRAY, RED, WHITE};
use crate::config::READOUT_INSET;
use crate::shape::{Anchor, LabelFont, Shape};
use crate::widget::Widget;

const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Shown while the location is unknown.
const NO_HEADING: &str = "---";

#[derive(Clone, Debug)]
pub struct CompassConfig {
    pub label: String,
    pub position: Point,
    pub size: Size,
    pub needle: Rgb565,
    pub background: Rgb565,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            position: Point::zero(),
            size: Size::new(80, 96),
            needle: WHITE,
            background: BLACK,
        }
    }
}

pub struct CompassReadout {
    body: Body,
    needle: Rgb565,
    location: Location,
}

impl CompassReadout {
    pub fn new(config: CompassConfig) -> Self {
        Self {
            body: Body::new(&config.label, config.position, config.size, config.background),
            needle: config.needle,
            location: Location::Unknown,
        }
    }

    pub const fn bearing(&self) -> Option<f64> { self.location.bearing() }

    /// Compass rose: the largest circle fitting above the heading line.
    fn rose(&self, origin: Point) -> Rectangle {
        let area = self.body.absolute(origin);
        let diameter = area
            .size
            .width
            .min(area.size.height.saturating_sub(16))
            .saturating_sub(2 * READOUT_INSET);
        Rectangle::new(
            Point::new(area.center().x - (diameter / 2) as i32, area.top_left.y + READOUT_INSET as i32),
            Size::new(diameter, diameter),
        )
    }
}

/// Eight-point heading text for a bearing in degrees, e.g. `"SW 220"`.
pub fn heading_text(bearing: Option<f64>) -> heapless::String<8> {
    let mut text = heapless::String::new();
    match bearing {
        Some(bearing) => {
            let bearing = bearing.rem_euclid(360.0);
            let point = ((bearing + 22.5) / 45.0) as usize % POINTS.len();
            let _ = write!(text, "{} {:03.0}", POINTS[point], bearing.round() % 360.0);
        }
        None => {
            let _ = text.push_str(NO_HEADING);
        }
    }
    text
}

impl Widget for CompassReadout {
    fn name(&self) -> &str { &self.body.label }

    fn bounds(&self) -> Rectangle { self.body.area }

    fn set_position(&mut self, position: Point) { self.body.area.top_left = position; }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        let area = self.body.absolute(origin);
        out.push(Shape::Rect {
            area,
            fill: self.body.background,
        });
        let rose = self.rose(origin);
        let center = rose.center();
        let radius = (rose.size.width / 2) as f64;
        out.push(Shape::Ring {
            area: rose,
            color: GRAY,
            width: 1,
        });
        out.push(Shape::Line {
            start: Point::new(center.x, rose.top_left.y),
            end: Point::new(center.x, rose.top_left.y + 4),
            color: RED,
            width: 2,
        });
        if let Some(bearing) = self.bearing() {
            let (sin, cos) = bearing.to_radians().sin_cos();
            let length = radius - 3.0;
            // Clockwise from north, screen y grows downward
            let tip = center + Point::new((sin * length).round() as i32, (-cos * length).round() as i32);
            out.push(Shape::Line {
                start: center,
                end: tip,
                color: self.needle,
                width: 2,
            });
        }
        out.push(Shape::Label {
            text: heading_text(self.bearing()).as_str().to_owned(),
            position: Point::new(area.center().x, area.top_left.y + area.size.height as i32 - 4),
            color: WHITE,
            font: LabelFont::Small,
            anchor: Anchor::Center,
        });
    }
}

impl Readout for CompassReadout {
    fn capabilities(&self) -> Capabilities { Capabilities::LOCATION }

    fn is_frozen(&self) -> bool { self.body.frozen }

    fn set_frozen(&mut self, frozen: bool) { self.body.frozen = frozen; }

    fn apply(&mut self, update: &Update) {
        if let Update::Location(location) = update {
            self.location = *location;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_text() {
        assert_eq!(heading_text(Some(0.0)).as_str(), "N 000");
        assert_eq!(heading_text(Some(45.0)).as_str(), "NE 045");
        assert_eq!(heading_text(Some(220.0)).as_str(), "SW 220");
        assert_eq!(heading_text(Some(359.7)).as_str(), "N 000", "Rounds back to north");
        assert_eq!(heading_text(Some(-90.0)).as_str(), "W 270");
        assert_eq!(heading_text(None).as_str(), "---");
    }

    #[test]
    fn test_location_updates_bearing() {
        let mut compass = CompassReadout::new(CompassConfig::default());
        assert_eq!(compass.bearing(), None);
        compass.update(&Update::Location(Location::known(3.0, 4.0, 90.0)));
        assert_eq!(compass.bearing(), Some(90.0));
        compass.update(&Update::Location(Location::Unknown));
        assert_eq!(compass.bearing(), None);
    }

    #[test]
    fn test_frozen_compass_keeps_bearing() {
        let mut compass = CompassReadout::new(CompassConfig::default());
        compass.update(&Update::Location(Location::known(0.0, 0.0, 10.0)));
        compass.set_frozen(true);
        compass.update(&Update::Location(Location::known(0.0, 0.0, 200.0)));
        assert_eq!(compass.bearing(), Some(10.0));
    }

    #[test]
    fn test_needle_points_east() {
        let mut compass = CompassReadout::new(CompassConfig::default());
        compass.update(&Update::Location(Location::known(0.0, 0.0, 90.0)));
        let mut shapes = Vec::new();
        compass.render(Point::zero(), &mut shapes);
        let needle = shapes
            .iter()
            .find_map(|shape| match shape {
                Shape::Line { start, end, width: 2, color } if *color == WHITE => Some((*start, *end)),
                _ => None,
            })
            .unwrap();
        assert_eq!(needle.0.y, needle.1.y, "East needle is horizontal");
        assert!(needle.1.x > needle.0.x);
    }
}
