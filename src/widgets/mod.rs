//! Interactive widgets of the control panel.
//!
//! - [`button`]: touch, toggle and hold buttons with background actions
//! - [`grid`]: buttons laid out on a row/column grid, plus the arrow pad
//! - [`group`]: keyed container placing any children at free offsets
//!
//! Every widget here is a [`Control`](crate::control::Control): it receives
//! pointer events and contributes its name to the command path of whatever
//! it or its children report.

pub mod button;
pub mod grid;
pub mod group;

pub use button::{Action, ActionRunner, Button, ButtonConfig, ButtonKind};
pub use grid::{ARROWS, ButtonGrid, GridConfig, arrow_pad};
pub use group::Group;
