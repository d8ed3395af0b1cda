//! Desktop demo of the control-panel widgets.
//!
//! Hosts a small vehicle panel in an `embedded-graphics-simulator` window:
//! light switches and an arrow pad on the left, live readouts on the right,
//! and a log of every command path along the bottom. Mouse input is forwarded
//! to the panel; commands are echoed into the log and handled by a background
//! processor.
//!
//! ```text
//! ┌──────────────┬─────┬──────────┬──────────┐
//! │ LIGHTS grid  │ RPM │ SPD dial │ compass  │
//! │              │ bar ├──────────┤          │
//! ├──────────────┤     │ lamp     ├──────────┤
//! │ NAV pad      │     ├──────────┴──────────┤
//! │              │     │ minimap             │
//! ├──────────────┴─────┴─────────────────────┤
//! │ command log                              │
//! └──────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use dashboard_controls::colors::{BLACK, BLUE, RED, STEEL};
use dashboard_controls::config::{FRAME_TIME, GENERATOR_INTERVAL, HOLD_REPEAT_INTERVAL, PROCESSOR_INTERVAL, SCREEN_HEIGHT, SCREEN_WIDTH};
use dashboard_controls::generators::{DatumSource, Generator, SineSensor};
use dashboard_controls::readouts::{
    BarConfig, BarReadout, BufferConfig, BufferReadout, ColorConfig, ColorReadout, CompassConfig, CompassReadout,
    DialConfig, DialReadout, MinimapConfig, MinimapReadout, share,
};
use dashboard_controls::widgets::{Action, Button, ButtonConfig, ButtonGrid, ButtonKind, GridConfig, Group, arrow_pad};
use dashboard_controls::{Child, Dashboard, Processor, Result};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

fn lights() -> Result<ButtonGrid> {
    let mut grid = ButtonGrid::new(GridConfig {
        name: "LIGHTS".into(),
        size: Size::new(120, 64),
        rows: 2,
        cols: 2,
        ..GridConfig::default()
    })?;
    let buttons = [
        ("HEAD", ButtonKind::Toggle, 0, 0),
        ("FOG", ButtonKind::Toggle, 0, 1),
        ("HORN", ButtonKind::Touch, 1, 0),
        ("HAZ", ButtonKind::Toggle, 1, 1),
    ];
    for (label, kind, row, col) in buttons {
        let color = if label == "HAZ" { RED } else { STEEL };
        let button = Button::new(ButtonConfig {
            color,
            ..ButtonConfig::new(label, kind)
        })?
        .with_on_action(move || tracing::info!(light = label, "on"))
        .with_off_action(move || tracing::info!(light = label, "off"));
        grid.add_button(button, row, col, 1, 1);
    }
    Ok(grid)
}

fn nav_pad() -> Result<ButtonGrid> {
    arrow_pad(
        GridConfig {
            name: "NAV".into(),
            size: Size::new(90, 90),
            background: Some(BLUE),
            ..GridConfig::default()
        },
        HOLD_REPEAT_INTERVAL,
        |label| {
            let direction = label.to_owned();
            let action: Action = Arc::new(move || tracing::debug!(%direction, "steer"));
            Some(action)
        },
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    // ==========================================================================
    // Readouts
    // ==========================================================================

    let rpm = share(BarReadout::new(BarConfig {
        label: "RPM".into(),
        size: Size::new(28, 156),
        max: 7000.0,
        ..BarConfig::default()
    })?);
    let speed = share(DialReadout::new(DialConfig {
        label: "SPD".into(),
        size: Size::new(76, 64),
        max: 160.0,
        ..DialConfig::default()
    })?);
    let lamp = share(ColorReadout::new(ColorConfig {
        label: "WARN".into(),
        size: Size::new(76, 28),
        ..ColorConfig::default()
    }));
    let compass = share(CompassReadout::new(CompassConfig {
        label: "HDG".into(),
        size: Size::new(80, 96),
        ..CompassConfig::default()
    }));
    let map = share(MinimapReadout::new(MinimapConfig {
        label: "MAP".into(),
        size: Size::new(152, 56),
        view_radius: 60.0,
        ..MinimapConfig::default()
    })?);
    let log = share(BufferReadout::new(BufferConfig {
        label: "LOG".into(),
        size: Size::new(SCREEN_WIDTH - 8, 72),
        ..BufferConfig::default()
    }));

    // ==========================================================================
    // Widget Tree
    // ==========================================================================

    let mut root = Group::new("DASH", Point::zero());
    root.add("lights", Child::control(lights()?), Point::new(4, 4));
    root.add("nav", Child::control(nav_pad()?), Point::new(19, 72));
    root.add("rpm", Child::display(rpm.clone()), Point::new(128, 4));
    root.add("speed", Child::display(speed.clone()), Point::new(160, 4));
    root.add("lamp", Child::display(lamp.clone()), Point::new(160, 72));
    root.add("compass", Child::display(compass.clone()), Point::new(236, 4));
    root.add("map", Child::display(map.clone()), Point::new(160, 104));
    root.add("log", Child::display(log.clone()), Point::new(4, 164));

    let mut dashboard = Dashboard::new(root);
    dashboard.add_output("log", log);

    let mut processor = Processor::new(PROCESSOR_INTERVAL, |command| tracing::info!(%command, "handled"))?;
    processor.set_active(true)?;
    dashboard.set_processor(processor);

    // ==========================================================================
    // Background Data
    // ==========================================================================

    let mut engine = Generator::new("engine", SineSensor::new(800.0, 6500.0, 40)?, GENERATOR_INTERVAL)?;
    engine.add("rpm", rpm);

    let mut drive = Generator::new("drive", DatumSource::new(0.0, 160.0, 100.0, 130.0)?, GENERATOR_INTERVAL)?;
    drive.add("speed", speed);
    drive.add("lamp", lamp);
    drive.add("compass", compass);
    drive.add("map", map);

    engine.set_active(true)?;
    drive.set_active(true)?;

    // ==========================================================================
    // Main Loop
    // ==========================================================================

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Dashboard Controls", &output_settings);

    'running: loop {
        let frame_start = Instant::now();

        display.clear(BLACK).ok();
        dashboard.draw(&mut display).ok();
        window.update(&display);

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::MouseButtonDown { point, .. } => {
                    dashboard.press(point);
                }
                SimulatorEvent::MouseButtonUp { point, .. } => {
                    dashboard.release(point);
                }
                SimulatorEvent::MouseMove { point } => {
                    dashboard.motion(point);
                }
                _ => {}
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            thread::sleep(FRAME_TIME - elapsed);
        }
    }

    engine.set_active(false)?;
    drive.set_active(false)?;
    if let Some(mut processor) = dashboard.take_processor() {
        processor.set_active(false)?;
    }
    Ok(())
}
