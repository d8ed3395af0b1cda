//! Bar readout: a track filled in proportion to the current level.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::{Body, Capabilities, Level, Readout, Update};
use crate::colors::{BLACK, GRAY, GREEN, WHITE};
use crate::config::READOUT_INSET;
use crate::error::Result;
use crate::shape::{Anchor, LabelFont, Shape};
use crate::widget::Widget;

/// Direction the bar fills in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Fills upward from the bottom edge.
    #[default]
    Vertical,
    /// Fills rightward from the left edge.
    Horizontal,
}

#[derive(Clone, Debug)]
pub struct BarConfig {
    pub label: String,
    pub position: Point,
    pub size: Size,
    pub min: f64,
    pub max: f64,
    /// Number of steps; 0 means one step per pixel of travel.
    pub divisions: u32,
    pub orientation: Orientation,
    pub color: Rgb565,
    pub background: Rgb565,
    /// Print the current reading over the bar.
    pub show_value: bool,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            position: Point::zero(),
            size: Size::new(30, 100),
            min: 0.0,
            max: 100.0,
            divisions: 0,
            orientation: Orientation::Vertical,
            color: GREEN,
            background: BLACK,
            show_value: false,
        }
    }
}

/// Number readout drawn as a filling bar.
pub struct BarReadout {
    body: Body,
    level: Level,
    orientation: Orientation,
    color: Rgb565,
    show_value: bool,
}

impl BarReadout {
    pub fn new(config: BarConfig) -> Result<Self> {
        let mut level = Level::new(config.min, config.max, config.divisions)?;
        let body = Body::new(&config.label, config.position, config.size, config.background);
        level.resolve_continuous(travel(body.area.size, config.orientation));
        Ok(Self {
            body,
            level,
            orientation: config.orientation,
            color: config.color,
            show_value: config.show_value,
        })
    }

    pub const fn level(&self) -> &Level { &self.level }

    /// Set the level directly, bypassing the value scale. Ignored while frozen.
    pub fn set_level(&mut self, level: i64) {
        if !self.body.frozen {
            self.level.set_level(level);
        }
    }

    /// Filled part of the track for a parent frame at `origin`.
    pub fn fill_rect(&self, origin: Point) -> Rectangle {
        let track = self.body.inner(origin);
        let length = |full: u32| (self.level.fraction() * f64::from(full)).round() as u32;
        match self.orientation {
            Orientation::Vertical => {
                let h = length(track.size.height);
                Rectangle::new(
                    track.top_left + Point::new(0, (track.size.height - h) as i32),
                    Size::new(track.size.width, h),
                )
            }
            Orientation::Horizontal => Rectangle::new(track.top_left, Size::new(length(track.size.width), track.size.height)),
        }
    }
}

/// Pixels of indicator travel along the fill direction.
fn travel(size: Size, orientation: Orientation) -> u32 {
    let inset = 2 * READOUT_INSET;
    match orientation {
        Orientation::Vertical => size.height.saturating_sub(inset),
        Orientation::Horizontal => size.width.saturating_sub(inset),
    }
}

impl Widget for BarReadout {
    fn name(&self) -> &str { &self.body.label }

    fn bounds(&self) -> Rectangle { self.body.area }

    fn set_position(&mut self, position: Point) { self.body.area.top_left = position; }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        self.body.render_frame(origin, out);
        let track = self.body.inner(origin);
        out.push(Shape::Frame {
            area: track,
            color: GRAY,
            width: 1,
        });
        out.push(Shape::Rect {
            area: self.fill_rect(origin),
            fill: self.color,
        });
        if self.show_value {
            let mut text: heapless::String<16> = heapless::String::new();
            let _ = write!(text, "{:.0}", self.level.value());
            out.push(Shape::Label {
                text: text.as_str().to_owned(),
                position: track.center() + Point::new(0, 6),
                color: WHITE,
                font: LabelFont::Value,
                anchor: Anchor::Center,
            });
        }
    }
}

impl Readout for BarReadout {
    fn capabilities(&self) -> Capabilities { Capabilities::NUMBER }

    fn is_frozen(&self) -> bool { self.body.frozen }

    fn set_frozen(&mut self, frozen: bool) { self.body.frozen = frozen; }

    fn apply(&mut self, update: &Update) {
        if let Update::Number(value) = update {
            self.level.update(*value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(orientation: Orientation) -> BarReadout {
        BarReadout::new(BarConfig {
            size: Size::new(24, 104),
            min: 0.0,
            max: 200.0,
            divisions: 100,
            orientation,
            ..BarConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_number_updates_level() {
        let mut b = bar(Orientation::Vertical);
        b.update(&Update::Number(132.0));
        assert_eq!(b.level().level(), 66);
        b.update(&Update::Number(250.0));
        assert_eq!(b.level().level(), 100);
        b.update(&Update::Number(-10.0));
        assert_eq!(b.level().level(), 0);
    }

    #[test]
    fn test_frozen_bar_ignores_updates() {
        let mut b = bar(Orientation::Vertical);
        b.update(&Update::Number(100.0));
        b.set_frozen(true);
        for value in [0.0, 37.5, 500.0] {
            b.update(&Update::Number(value));
        }
        b.set_level(3);
        assert_eq!(b.level().level(), 50, "Frozen level must not move");

        b.set_frozen(false);
        b.update(&Update::Number(0.0));
        assert_eq!(b.level().level(), 0);
    }

    #[test]
    fn test_ignores_other_updates() {
        let mut b = bar(Orientation::Vertical);
        b.update(&Update::Text("132".into()));
        assert_eq!(b.level().level(), 0);
    }

    #[test]
    fn test_vertical_fill_grows_from_bottom() {
        let mut b = bar(Orientation::Vertical);
        b.update(&Update::Number(100.0));
        // Track is 20x100 at (2,2)
        let fill = b.fill_rect(Point::zero());
        assert_eq!(fill, Rectangle::new(Point::new(2, 52), Size::new(20, 50)));
    }

    #[test]
    fn test_horizontal_fill_grows_from_left() {
        let mut b = bar(Orientation::Horizontal);
        b.update(&Update::Number(200.0));
        let fill = b.fill_rect(Point::new(10, 0));
        assert_eq!(fill.top_left, Point::new(12, 2));
        assert_eq!(fill.size.width, 20);
    }

    #[test]
    fn test_continuous_uses_pixel_travel() {
        let b = BarReadout::new(BarConfig {
            size: Size::new(20, 64),
            ..BarConfig::default()
        })
        .unwrap();
        assert_eq!(b.level().divisions(), 60);
    }
}
