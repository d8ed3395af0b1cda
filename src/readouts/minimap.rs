//! Minimap readout: recent fixes drawn around the latest one.
//!
//! The map is centred on the most recent known location and shows everything
//! within `view_radius` world units of it; a radius of zero shows only the
//! current fix. Up to [`MINIMAP_TRAIL`] earlier fixes are kept as a trail.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Deque;

use super::{Body, Capabilities, Location, Readout, Update};
use crate::colors::{BLACK, GRAY, GREEN, YELLOW};
use crate::config::MINIMAP_TRAIL;
use crate::error::{Error, Result};
use crate::shape::Shape;
use crate::widget::Widget;

#[derive(Clone, Debug)]
pub struct MinimapConfig {
    pub label: String,
    pub position: Point,
    pub size: Size,
    /// World distance from the centre to the map edge.
    pub view_radius: f64,
    pub trail: Rgb565,
    pub marker: Rgb565,
    pub background: Rgb565,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            position: Point::zero(),
            size: Size::new(96, 96),
            view_radius: 100.0,
            trail: GREEN,
            marker: YELLOW,
            background: BLACK,
        }
    }
}

pub struct MinimapReadout {
    body: Body,
    view_radius: f64,
    trail_color: Rgb565,
    marker: Rgb565,
    current: Location,
    trail: Deque<(f64, f64), MINIMAP_TRAIL>,
}

impl MinimapReadout {
    /// Create a minimap, rejecting a negative or NaN view radius.
    pub fn new(config: MinimapConfig) -> Result<Self> {
        if config.view_radius.is_nan() || config.view_radius < 0.0 {
            return Err(Error::NegativeRadius(config.view_radius));
        }
        Ok(Self {
            body: Body::new(&config.label, config.position, config.size, config.background),
            view_radius: config.view_radius,
            trail_color: config.trail,
            marker: config.marker,
            current: Location::Unknown,
            trail: Deque::new(),
        })
    }

    pub const fn location(&self) -> Location { self.current }

    /// Number of earlier fixes kept.
    pub fn trail_len(&self) -> usize { self.trail.len() }

    /// Screen position of world point `(x, y)` for a parent frame at `origin`.
    ///
    /// `None` while no location is known or when the point lies outside the view.
    pub fn project(&self, origin: Point, x: f64, y: f64) -> Option<Point> {
        let (cx, cy) = self.current.position()?;
        let (dx, dy) = (x - cx, y - cy);
        let map = self.body.inner(origin);
        let center = map.center();
        if self.view_radius == 0.0 {
            return (dx == 0.0 && dy == 0.0).then_some(center);
        }
        if dx.abs() > self.view_radius || dy.abs() > self.view_radius {
            return None;
        }
        let half = f64::from(map.size.width.min(map.size.height)) / 2.0;
        let scale = half / self.view_radius;
        // World y points north, screen y grows downward
        Some(center + Point::new((dx * scale).round() as i32, (-dy * scale).round() as i32))
    }

    fn record(&mut self, location: Location) {
        if let Some(previous) = self.current.position() {
            if self.trail.is_full() {
                self.trail.pop_front();
            }
            let _ = self.trail.push_back(previous);
        }
        self.current = location;
    }
}

impl Widget for MinimapReadout {
    fn name(&self) -> &str { &self.body.label }

    fn bounds(&self) -> Rectangle { self.body.area }

    fn set_position(&mut self, position: Point) { self.body.area.top_left = position; }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        let area = self.body.absolute(origin);
        out.push(Shape::Rect {
            area,
            fill: self.body.background,
        });
        out.push(Shape::Frame {
            area,
            color: GRAY,
            width: 1,
        });
        for &(x, y) in self.trail.iter() {
            if let Some(dot) = self.project(origin, x, y) {
                out.push(Shape::Rect {
                    area: Rectangle::with_center(dot, Size::new(2, 2)),
                    fill: self.trail_color,
                });
            }
        }
        if let Location::Known { x, y, bearing } = self.current
            && let Some(fix) = self.project(origin, x, y)
        {
            out.push(Shape::Oval {
                area: Rectangle::with_center(fix, Size::new(5, 5)),
                fill: self.marker,
            });
            let (sin, cos) = bearing.to_radians().sin_cos();
            out.push(Shape::Line {
                start: fix,
                end: fix + Point::new((sin * 8.0).round() as i32, (-cos * 8.0).round() as i32),
                color: self.marker,
                width: 1,
            });
        }
    }
}

impl Readout for MinimapReadout {
    fn capabilities(&self) -> Capabilities { Capabilities::LOCATION }

    fn is_frozen(&self) -> bool { self.body.frozen }

    fn set_frozen(&mut self, frozen: bool) { self.body.frozen = frozen; }

    fn apply(&mut self, update: &Update) {
        if let Update::Location(location) = update {
            self.record(*location);
        }
    }
}
