//! Push buttons: the leaf controls of a control panel.
//!
//! All three kinds share one body (a colored rectangle with a centered label)
//! and differ only in how they react to press and release:
//!
//! | Kind | Press | Release |
//! |------|-------|---------|
//! | [`ButtonKind::Touch`] | brighten, run on-action once | restore, run off-action once |
//! | [`ButtonKind::Toggle`] | flip on/off, run the matching action once | nothing |
//! | [`ButtonKind::Hold`] | brighten, repeat on-action every interval | restore, stop repeating, run off-action once |
//!
//! # Actions
//!
//! Actions run on a background thread so dispatch returns immediately, even for
//! a hold button whose on-action repeats until release. A button runs at most
//! one action at a time: every press or release that changes state first
//! cancels whatever that button was still running. Cancellation is
//! cooperative, so a one-shot action always runs to completion while a repeat
//! loop ends at its next sleep.
//!
//! # Command Suffixes
//!
//! Touch and hold buttons answer `ON` / `OFF`; toggles answer
//! `SET_ACTIVE_TRUE` / `SET_ACTIVE_FALSE`. Dispatch prefixes the button's name,
//! which defaults to its label.

use std::sync::Arc;
use std::time::Duration;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::colors::{GRAY, STEEL, brighten, text_color_for};
use crate::config::HOLD_REPEAT_INTERVAL;
use crate::control::{Control, PointerKind};
use crate::error::{Result, check_interval};
use crate::shape::Shape;
use crate::task::{Flow, Worker};
use crate::widget::Widget;

/// Unit of work attached to a button transition.
pub type Action = Arc<dyn Fn() + Send + Sync>;

// =============================================================================
// Button Kinds
// =============================================================================

/// Press/release behaviour of a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonKind {
    /// Active while pressed.
    Touch,
    /// Each press flips the state.
    Toggle,
    /// Active while pressed, repeating the on-action every `interval`.
    Hold { interval: Duration },
}

impl ButtonKind {
    /// Hold button with the default repeat interval.
    pub const fn hold() -> Self {
        Self::Hold {
            interval: HOLD_REPEAT_INTERVAL,
        }
    }

    /// Command suffix reported when the button turns on.
    pub const fn on_suffix(self) -> &'static str {
        match self {
            Self::Toggle => "SET_ACTIVE_TRUE",
            Self::Touch | Self::Hold { .. } => "ON",
        }
    }

    /// Command suffix reported when the button turns off.
    pub const fn off_suffix(self) -> &'static str {
        match self {
            Self::Toggle => "SET_ACTIVE_FALSE",
            Self::Touch | Self::Hold { .. } => "OFF",
        }
    }
}

/// Settings for a new [`Button`].
#[derive(Clone, Debug)]
pub struct ButtonConfig {
    /// Name used in command paths. Defaults to the label when `None`.
    pub name: Option<String>,
    /// Text drawn on the button.
    pub label: String,
    pub position: Point,
    pub size: Size,
    /// Color while off/released.
    pub color: Rgb565,
    pub kind: ButtonKind,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            name: None,
            label: String::new(),
            position: Point::zero(),
            size: Size::new(60, 30),
            color: STEEL,
            kind: ButtonKind::Touch,
        }
    }
}

impl ButtonConfig {
    /// Config for a button of `kind` showing `label`, everything else default.
    pub fn new(label: impl Into<String>, kind: ButtonKind) -> Self {
        Self {
            label: label.into(),
            kind,
            ..Self::default()
        }
    }
}

// =============================================================================
// Action Runner
// =============================================================================

/// Holds the single action thread a button may have in flight.
#[derive(Debug, Default)]
pub struct ActionRunner {
    current: Option<Worker>,
}

impl ActionRunner {
    /// Signal the running action (if any) to stop, without waiting for it.
    pub fn cancel(&mut self) {
        if let Some(mut worker) = self.current.take() {
            worker.stop();
        }
    }

    /// Cancel the running action and run `action` once.
    pub fn run_once(&mut self, thread_name: &str, action: &Action) {
        self.cancel();
        let action = Arc::clone(action);
        self.start(Worker::spawn(thread_name, move |_| action()));
    }

    /// Cancel the running action and repeat `action` every `interval` until cancelled.
    pub fn run_repeating(&mut self, thread_name: &str, action: &Action, interval: Duration) {
        self.cancel();
        let action = Arc::clone(action);
        self.start(Worker::spawn_loop(thread_name, interval, move || {
            action();
            Flow::Continue
        }));
    }

    /// Whether an action thread is still running.
    pub fn is_running(&self) -> bool { self.current.as_ref().is_some_and(|worker| !worker.is_finished()) }

    fn start(&mut self, spawned: std::io::Result<Worker>) {
        match spawned {
            Ok(worker) => self.current = Some(worker),
            Err(err) => tracing::error!(%err, "failed to start button action"),
        }
    }
}

// =============================================================================
// Button
// =============================================================================

/// A labelled push button of one of the three [`ButtonKind`]s.
pub struct Button {
    name: String,
    label: String,
    kind: ButtonKind,
    area: Rectangle,
    base_color: Rgb565,
    active: bool,
    on_action: Option<Action>,
    off_action: Option<Action>,
    runner: ActionRunner,
}

impl Button {
    /// Create a button, rejecting a hold button with a zero repeat interval.
    pub fn new(config: ButtonConfig) -> Result<Self> {
        if let ButtonKind::Hold { interval } = config.kind {
            check_interval(interval)?;
        }
        Ok(Self {
            name: config.name.unwrap_or_else(|| config.label.clone()),
            label: config.label,
            kind: config.kind,
            area: Rectangle::new(config.position, config.size),
            base_color: config.color,
            active: false,
            on_action: None,
            off_action: None,
            runner: ActionRunner::default(),
        })
    }

    /// Attach the action run when the button turns on.
    #[must_use]
    pub fn with_on_action(mut self, action: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_action = Some(Arc::new(action));
        self
    }

    /// Attach the action run when the button turns off.
    #[must_use]
    pub fn with_off_action(mut self, action: impl Fn() + Send + Sync + 'static) -> Self {
        self.off_action = Some(Arc::new(action));
        self
    }

    pub fn label(&self) -> &str { &self.label }

    pub const fn kind(&self) -> ButtonKind { self.kind }

    /// Whether the button is pressed (touch/hold) or on (toggle).
    pub const fn is_active(&self) -> bool { self.active }

    /// Color currently shown: brightened while active.
    pub fn color(&self) -> Rgb565 { if self.active { brighten(self.base_color) } else { self.base_color } }

    /// Set the on/off state directly, without running any action.
    pub fn set_active(&mut self, active: bool) { self.active = active; }

    /// Change the button's size (used by grids when placing it).
    pub fn resize(&mut self, size: Size) { self.area.size = size; }

    /// Whether an action thread of this button is still running.
    pub fn action_running(&self) -> bool { self.runner.is_running() }

    fn turn_on(&mut self) -> Option<String> {
        self.active = true;
        self.runner.cancel();
        if let Some(action) = &self.on_action {
            tracing::debug!(button = %self.name, "starting on-action");
            match self.kind {
                ButtonKind::Hold { interval } => self.runner.run_repeating(&self.name, action, interval),
                ButtonKind::Touch | ButtonKind::Toggle => self.runner.run_once(&self.name, action),
            }
        }
        Some(self.kind.on_suffix().to_owned())
    }

    fn turn_off(&mut self) -> Option<String> {
        self.active = false;
        self.runner.cancel();
        if let Some(action) = &self.off_action {
            tracing::debug!(button = %self.name, "starting off-action");
            self.runner.run_once(&self.name, action);
        }
        Some(self.kind.off_suffix().to_owned())
    }
}

impl Widget for Button {
    fn name(&self) -> &str { &self.name }

    fn bounds(&self) -> Rectangle { self.area }

    fn set_position(&mut self, position: Point) { self.area.top_left = position; }

    fn render(&self, origin: Point, out: &mut Vec<Shape>) {
        let area = Rectangle::new(origin + self.area.top_left, self.area.size);
        let fill = self.color();
        out.push(Shape::Rect { area, fill });
        out.push(Shape::Frame {
            area,
            color: GRAY,
            width: 1,
        });
        if !self.label.is_empty() {
            // Baseline 3px below center roughly centers the 6x10 font
            out.push(Shape::label(
                self.label.clone(),
                area.center() + Point::new(0, 3),
                text_color_for(fill),
            ));
        }
    }
}

impl Control for Button {
    fn on_pointer(&mut self, kind: PointerKind, _hit: Option<usize>) -> Option<String> {
        match (self.kind, kind) {
            (ButtonKind::Touch | ButtonKind::Hold { .. }, PointerKind::Pressed) => self.turn_on(),
            (ButtonKind::Touch | ButtonKind::Hold { .. }, PointerKind::Released) => self.turn_off(),
            (ButtonKind::Toggle, PointerKind::Pressed) => {
                if self.active {
                    self.turn_off()
                } else {
                    self.turn_on()
                }
            }
            _ => None,
        }
    }
}
