//! Dial readout: a needle sweeping 270° across a round face.
//!
//! Level 0 points down-left (225°, counter-clockwise from the positive x
//! axis) and the full scale points down-right (-45°).

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::{Body, Capabilities, Level, Readout, Update};
use crate::colors::{BLACK, GRAY, YELLOW};
use crate::config::{DIAL_SWEEP_DEGREES, READOUT_INSET};
use crate::error::Result;
use crate::shape::Shape;
use crate::widget::Widget;

/// Needle angle at level 0, degrees counter-clockwise from the positive x axis.
const START_DEGREES: f32 = 225.0;

#[derive(Clone, Debug)]
pub struct DialConfig {
    pub label: String,
    pub position: Point,
    pub size: Size,
    pub min: f64,
    pub max: f64,
    /// Number of steps; 0 means one step per pixel of needle-tip travel.
    pub divisions: u32,
    pub needle: Rgb565,
    pub background: Rgb565,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            position: Point::zero(),
            size: Size::new(80, 80),
            min: 0.0,
            max: 100.0,
            divisions: 0,
            needle: YELLOW,
            background: BLACK,
        }
    }
}

/// Number readout drawn as a needle gauge.
pub struct DialReadout {
    body: Body,
    level: Level,
    needle: Rgb565,
}

impl DialReadout {
    pub fn new(config: DialConfig) -> Result<Self> {
        let mut level = Level::new(config.min, config.max, config.divisions)?;
        let body = Body::new(&config.label, config.position, config.size, config.background);
        let radius = face_diameter(body.area.size) / 2;
        let arc = DIAL_SWEEP_DEGREES.to_radians() * radius as f32;
        level.resolve_continuous(arc.round() as u32);
        Ok(Self {
            body,
            level,
            needle: config.needle,
        })
    }

    pub const fn level(&self) -> &Level { &self.level }

    /// Needle angle in degrees counter-clockwise from the positive x axis.
    pub fn needle_angle(&self) -> f32 { START_DEGREES - self.level.fraction() as f32 * DIAL_SWEEP_DEGREES }

    /// Dial face for a parent frame at `origin`.
    pub fn face(&self, origin: Point) -> Rectangle {
        let diameter = face_diameter(self.body.area.size);
        Rectangle::with_center(self.body.absolute(origin).center(), Size::new(diameter, diameter))
    }

    /// Needle tip for a parent frame at `origin`.
    pub fn needle_tip(&self, origin: Point) -> Point {
        let face = self.face(origin);
        let length = face.size.width as f32 / 2.0 - 2.0;
        let (sin, cos) = self.needle_angle().to_radians().sin_cos();
        // Screen y grows downward
        face.center() + Point::new((cos * length).round() as i32, (-sin * length).round() as i32)
    }
}

fn face_diameter(size: Size) -> u32 { size.width.min(size.height).saturating_sub(2 * READOUT_INSET) }

impl Widget for DialReadout {
    fn name(&self) -> &str { &self.body.label }

    fn bounds(&self) -> Rectangle { self.body.area }

    fn set_position(&mut self, position: Point) { self.body.area.top_left = position; }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        self.body.render_frame(origin, out);
        let face = self.face(origin);
        out.push(Shape::Ring {
            area: face,
            color: GRAY,
            width: 2,
        });
        out.push(Shape::Line {
            start: face.center(),
            end: self.needle_tip(origin),
            color: self.needle,
            width: 2,
        });
    }
}

impl Readout for DialReadout {
    fn capabilities(&self) -> Capabilities { Capabilities::NUMBER }

    fn is_frozen(&self) -> bool { self.body.frozen }

    fn set_frozen(&mut self, frozen: bool) { self.body.frozen = frozen; }

    fn apply(&mut self, update: &Update) {
        if let Update::Number(value) = update {
            self.level.update(*value);
        }
    }
}
