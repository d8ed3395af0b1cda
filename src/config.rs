//! Panel-wide configuration constants.
//!
//! Per-widget settings live in each widget's config struct (`BarConfig`,
//! `GridConfig`, ...). The values here are the shared defaults those structs
//! fall back to, plus the few constants the dispatch protocol depends on.

use std::time::Duration;

// =============================================================================
// Command Paths
// =============================================================================

/// Separator placed between control names in a command path (`"MPWR.CPWR.ON"`).
pub const PATH_SEPARATOR: char = '.';

// =============================================================================
// Timing Configuration
// =============================================================================

/// Default repeat interval of a hold button's on-action.
pub const HOLD_REPEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Default interval between two generator work units.
pub const GENERATOR_INTERVAL: Duration = Duration::from_millis(250);

/// Default interval between two processed commands.
pub const PROCESSOR_INTERVAL: Duration = Duration::from_millis(50);

/// Simulator frame time (~50 FPS).
pub const FRAME_TIME: Duration = Duration::from_millis(20);

// =============================================================================
// Display Configuration
// =============================================================================

/// Simulator display width in pixels.
pub const SCREEN_WIDTH: u32 = 320;

/// Simulator display height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

// =============================================================================
// Layout Configuration
// =============================================================================

/// Default gap between neighbouring cells of a button grid, in pixels.
pub const GRID_SPACING: u32 = 4;

/// Margin a group keeps around the union of its children, in pixels.
pub const GROUP_MARGIN: u32 = 4;

/// Inset between a readout's frame and its indicator geometry, in pixels.
pub const READOUT_INSET: u32 = 2;

/// Sweep of a dial readout's needle, in degrees (from 225° down to -45°).
pub const DIAL_SWEEP_DEGREES: f32 = 270.0;

// =============================================================================
// Readout Configuration
// =============================================================================

/// Lines kept by a buffer readout.
pub const BUFFER_LINES: usize = 8;

/// Maximum characters kept per buffer readout line.
pub const BUFFER_LINE_LENGTH: usize = 40;

/// Recent fixes drawn as a trail on a minimap readout.
pub const MINIMAP_TRAIL: usize = 32;

// =============================================================================
// Button Appearance
// =============================================================================

/// How far a pressed/on button's color moves toward white (0.0-1.0).
pub const BRIGHTEN_AMOUNT: f32 = 0.4;
