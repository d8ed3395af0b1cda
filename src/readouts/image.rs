//! Image readout: shows the last picture it was sent, scaled to fit.

use std::sync::Arc;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::{Body, Capabilities, Image, Readout, Update};
use crate::colors::BLACK;
use crate::shape::Shape;
use crate::widget::Widget;

#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub label: String,
    pub position: Point,
    pub size: Size,
    pub background: Rgb565,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            position: Point::zero(),
            size: Size::new(64, 48),
            background: BLACK,
        }
    }
}

pub struct ImageReadout {
    body: Body,
    /// Last image, already scaled to the inner area.
    scaled: Option<Arc<[Rgb565]>>,
}

impl ImageReadout {
    pub fn new(config: ImageConfig) -> Self {
        Self {
            body: Body::new(&config.label, config.position, config.size, config.background),
            scaled: None,
        }
    }

    /// Scaled pixels currently shown, row-major over the inner area.
    pub fn pixels(&self) -> Option<&[Rgb565]> { self.scaled.as_deref() }

    fn inner_size(&self) -> Size { self.body.inner(Point::zero()).size }
}

/// Nearest-neighbour resample of `image` to `size`.
pub fn scale(image: &Image, size: Size) -> Arc<[Rgb565]> {
    let src = image.size();
    if src.width == 0 || src.height == 0 {
        return vec![BLACK; (size.width * size.height) as usize].into();
    }
    let mut pixels = Vec::with_capacity((size.width * size.height) as usize);
    for y in 0..size.height {
        let sy = y * src.height / size.height;
        for x in 0..size.width {
            let sx = x * src.width / size.width;
            pixels.push(image.pixel(sx, sy).unwrap_or(BLACK));
        }
    }
    pixels.into()
}

impl Widget for ImageReadout {
    fn name(&self) -> &str { &self.body.label }

    fn bounds(&self) -> Rectangle { self.body.area }

    fn set_position(&mut self, position: Point) { self.body.area.top_left = position; }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        out.push(Shape::Rect {
            area: self.body.absolute(origin),
            fill: self.body.background,
        });
        if let Some(pixels) = &self.scaled {
            out.push(Shape::Image {
                area: self.body.inner(origin),
                pixels: Arc::clone(pixels),
            });
        }
    }
}

impl Readout for ImageReadout {
    fn capabilities(&self) -> Capabilities { Capabilities::IMAGE }

    fn is_frozen(&self) -> bool { self.body.frozen }

    fn set_frozen(&mut self, frozen: bool) { self.body.frozen = frozen; }

    fn apply(&mut self, update: &Update) {
        if let Update::Image(image) = update {
            self.scaled = Some(scale(image, self.inner_size()));
        }
    }
}
