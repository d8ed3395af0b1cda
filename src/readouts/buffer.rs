//! Buffer readout: a scrolling log of the most recent text lines.
//!
//! Lines live in a fixed-capacity `heapless::Deque`; once it is full the oldest
//! line is dropped. Each line is cut to [`BUFFER_LINE_LENGTH`] characters.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::Deque;

use super::{Body, Capabilities, Readout, Update};
use crate::colors::{BLACK, GREEN};
use crate::config::{BUFFER_LINE_LENGTH, BUFFER_LINES};
use crate::shape::{Anchor, LabelFont, Shape};
use crate::widget::Widget;

/// Height of one 6x10 text line plus leading.
const LINE_HEIGHT: i32 = 11;

type Line = heapless::String<BUFFER_LINE_LENGTH>;

#[derive(Clone, Debug)]
pub struct BufferConfig {
    pub label: String,
    pub position: Point,
    pub size: Size,
    pub text: Rgb565,
    pub background: Rgb565,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            position: Point::zero(),
            size: Size::new(200, 92),
            text: GREEN,
            background: BLACK,
        }
    }
}

pub struct BufferReadout {
    body: Body,
    text: Rgb565,
    lines: Deque<Line, BUFFER_LINES>,
}

impl BufferReadout {
    pub fn new(config: BufferConfig) -> Self {
        Self {
            body: Body::new(&config.label, config.position, config.size, config.background),
            text: config.text,
            lines: Deque::new(),
        }
    }

    /// Lines currently held, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> { self.lines.iter().map(|line| line.as_str()) }

    fn push_line(&mut self, text: &str) {
        let mut line = Line::new();
        for c in text.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        if self.lines.is_full() {
            self.lines.pop_front();
        }
        let _ = self.lines.push_back(line);
    }

    /// Number of lines that fit the inner area.
    fn visible(&self) -> usize {
        let height = self.body.inner(Point::zero()).size.height as i32;
        (height / LINE_HEIGHT).max(0) as usize
    }
}

impl Widget for BufferReadout {
    fn name(&self) -> &str { &self.body.label }

    fn bounds(&self) -> Rectangle { self.body.area }

    fn set_position(&mut self, position: Point) { self.body.area.top_left = position; }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        out.push(Shape::Rect {
            area: self.body.absolute(origin),
            fill: self.body.background,
        });
        let inner = self.body.inner(origin);
        let skip = self.lines.len().saturating_sub(self.visible());
        for (row, line) in self.lines.iter().skip(skip).enumerate() {
            out.push(Shape::Label {
                text: line.as_str().to_owned(),
                position: inner.top_left + Point::new(1, 8 + row as i32 * LINE_HEIGHT),
                color: self.text,
                font: LabelFont::Small,
                anchor: Anchor::Left,
            });
        }
    }
}

impl Readout for BufferReadout {
    fn capabilities(&self) -> Capabilities { Capabilities::STRING | Capabilities::NUMBER }

    fn is_frozen(&self) -> bool { self.body.frozen }

    fn set_frozen(&mut self, frozen: bool) { self.body.frozen = frozen; }

    fn apply(&mut self, update: &Update) {
        match update {
            // A blank line still takes a row
            Update::Text(text) if text.is_empty() => self.push_line(""),
            Update::Text(text) => {
                for line in text.lines() {
                    self.push_line(line);
                }
            }
            Update::Number(value) => {
                let mut line = Line::new();
                let _ = write!(line, "{value:.2}");
                self.push_line(&line);
            }
            _ => {}
        }
    }
}
