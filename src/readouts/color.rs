//! Color readout: a lamp showing the last color it was sent.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::{Body, Capabilities, Readout, Update};
use crate::colors::{BLACK, GRAY};
use crate::shape::Shape;
use crate::widget::Widget;

#[derive(Clone, Debug)]
pub struct ColorConfig {
    pub label: String,
    pub position: Point,
    pub size: Size,
    /// Color shown before the first update.
    pub initial: Rgb565,
    pub background: Rgb565,
    /// Draw a round lamp instead of filling the whole inner area.
    pub round: bool,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            position: Point::zero(),
            size: Size::new(30, 30),
            initial: GRAY,
            background: BLACK,
            round: true,
        }
    }
}

pub struct ColorReadout {
    body: Body,
    color: Rgb565,
    round: bool,
}

impl ColorReadout {
    pub fn new(config: ColorConfig) -> Self {
        Self {
            body: Body::new(&config.label, config.position, config.size, config.background),
            color: config.initial,
            round: config.round,
        }
    }

    pub const fn color(&self) -> Rgb565 { self.color }
}

impl Widget for ColorReadout {
    fn name(&self) -> &str { &self.body.label }

    fn bounds(&self) -> Rectangle { self.body.area }

    fn set_position(&mut self, position: Point) { self.body.area.top_left = position; }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        let area = self.body.inner(origin);
        out.push(Shape::Rect {
            area: self.body.absolute(origin),
            fill: self.body.background,
        });
        if self.round {
            out.push(Shape::Oval { area, fill: self.color });
        } else {
            out.push(Shape::Rect { area, fill: self.color });
        }
    }
}

impl Readout for ColorReadout {
    fn capabilities(&self) -> Capabilities { Capabilities::COLOR }

    fn is_frozen(&self) -> bool { self.body.frozen }

    fn set_frozen(&mut self, frozen: bool) { self.body.frozen = frozen; }

    fn apply(&mut self, update: &Update) {
        if let Update::Color(color) = update {
            self.color = *color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{GREEN, RED};

    #[test]
    fn test_shows_last_color_until_frozen() {
        let mut lamp = ColorReadout::new(ColorConfig::default());
        assert_eq!(lamp.color(), GRAY);

        lamp.update(&Update::Color(RED));
        assert_eq!(lamp.color(), RED);

        lamp.set_frozen(true);
        lamp.update(&Update::Color(GREEN));
        assert_eq!(lamp.color(), RED, "Frozen lamp keeps its color");
    }

    #[test]
    fn test_render_square_lamp() {
        let mut lamp = ColorReadout::new(ColorConfig {
            round: false,
            ..ColorConfig::default()
        });
        lamp.update(&Update::Color(GREEN));
        let mut shapes = Vec::new();
        lamp.render(Point::zero(), &mut shapes);
        assert!(matches!(shapes.last(), Some(Shape::Rect { fill, .. }) if *fill == GREEN));
    }
}
