//! Control-panel widgets for simulated vehicle dashboards.
//!
//! The crate provides three cooperating pieces:
//!
//! - A widget tree of [`controls`](control::Control) (buttons, grids, groups)
//!   whose pointer events bubble up as dotted command paths such as
//!   `"MAIN.LIGHTS.HEAD.SET_ACTIVE_TRUE"`.
//! - [`readouts`]: passive displays (bar, dial, color lamp, image, text
//!   buffer, compass, minimap) updated from any thread.
//! - Background loops: [`generators`] feeding synthetic or replayed data into
//!   readouts, and a [`processor`] draining queued commands.
//!
//! Nothing here owns a screen. Widgets describe themselves as a list of
//! [`Shape`](shape::Shape)s that [`Dashboard::draw`] rasterises onto any
//! `embedded-graphics` draw target.
//!
//! # Architecture
//!
//! ```text
//!   pointer ──► Dashboard ──► root Control ──► ... ──► Button
//!                   │                                     │
//!                   │◄──────── "ROOT.GRID.BTN.ON" ◄───────┘
//!                   ├──► text readouts
//!                   └──► Processor queue ──► handler (own thread)
//!
//!   Generator (own thread) ──► Source::produce ──► SinkSet ──► readouts
//! ```

// Crate-level lints: pixel math converts freely between integer and float types
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod control;
pub mod dashboard;
pub mod error;
pub mod generators;
pub mod processor;
pub mod readouts;
pub mod shape;
pub mod styles;
pub mod task;
pub mod widget;
pub mod widgets;

// Re-export commonly used items
pub use control::{Control, PointerKind};
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use generators::{Generator, SinkSet, Source};
pub use processor::Processor;
pub use readouts::{Capabilities, Readout, SharedReadout, Update, share};
pub use shape::Shape;
pub use widget::{Child, Panel, Widget};
