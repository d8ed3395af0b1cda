//! Keyed container with free placement.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::GROUP_MARGIN;
use crate::control::Control;
use crate::shape::Shape;
use crate::widget::{Child, Widget};

/// Children stored under string keys at explicit offsets.
///
/// The group's size grows to cover every child added so far plus
/// [`GROUP_MARGIN`]; removing a child leaves the size as it was.
pub struct Group {
    name: String,
    area: Rectangle,
    keys: Vec<String>,
    children: Vec<Child>,
}

impl Group {
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            area: Rectangle::new(position, Size::zero()),
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add `child` under `key` at group-local `offset`.
    ///
    /// Returns `false` and drops `child` if `key` is already present.
    pub fn add(&mut self, key: impl Into<String>, mut child: Child, offset: Point) -> bool {
        let key = key.into();
        if self.keys.contains(&key) {
            tracing::warn!(group = %self.name, %key, "duplicate group key ignored");
            return false;
        }
        child.set_position(offset);
        self.grow_to(child.bounds());
        self.keys.push(key);
        self.children.push(child);
        true
    }

    /// Remove and return the child under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Child> {
        let index = self.index_of(key)?;
        self.keys.remove(index);
        Some(self.children.remove(index))
    }

    pub fn get(&self, key: &str) -> Option<&Child> { self.index_of(key).map(|index| &self.children[index]) }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Child> {
        self.index_of(key).map(|index| &mut self.children[index])
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> { self.keys.iter().map(String::as_str) }

    pub fn len(&self) -> usize { self.children.len() }

    pub fn is_empty(&self) -> bool { self.children.is_empty() }

    fn index_of(&self, key: &str) -> Option<usize> { self.keys.iter().position(|k| k == key) }

    fn grow_to(&mut self, child: Rectangle) {
        let Some(bottom_right) = child.bottom_right() else {
            return;
        };
        let margin = GROUP_MARGIN as i32;
        let width = (bottom_right.x + 1 + margin).max(0) as u32;
        let height = (bottom_right.y + 1 + margin).max(0) as u32;
        self.area.size.width = self.area.size.width.max(width);
        self.area.size.height = self.area.size.height.max(height);
    }
}

impl Widget for Group {
    fn name(&self) -> &str { &self.name }

    fn bounds(&self) -> Rectangle { self.area }

    fn set_position(&mut self, position: Point) { self.area.top_left = position; }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        let local = origin + self.area.top_left;
        for child in &self.children {
            child.render(local, out);
        }
    }
}

impl Control for Group {
    fn children(&self) -> &[Child] { &self.children }

    fn children_mut(&mut self) -> &mut [Child] { &mut self.children }
}
