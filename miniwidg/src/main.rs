//! miniwidg demo - a tuning panel with a nested child panel

use log::{error, info};
use miniwidg::{
    logging, run_with_config, HotkeyRegistry, Panel, PanelConfig, PanelError, SliderOptions,
};
use std::cell::Cell;
use std::rc::Rc;

fn main() {
    let mut config = PanelConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        PanelConfig::default()
    });
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // Initialize logging
    let _logger = match logging::initialize_logging(&config.logging, "demo") {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting miniwidg demo");
    HotkeyRegistry::init_global(&config.hotkeys);

    if let Err(e) = run_demo(config) {
        error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run_demo(config: PanelConfig) -> Result<(), PanelError> {
    let clicks = Rc::new(Cell::new(0u32));

    let mut panel = Panel::new("Control", (40, 40));
    let counter = Rc::clone(&clicks);
    panel.create_button(
        "Print",
        Some(Box::new(move || {
            counter.set(counter.get() + 1);
            info!("Print pressed {} time(s)", counter.get());
        })),
        Some('p'),
    )?;
    panel.create_check_button(
        "Pause",
        false,
        Some(Box::new(|paused: bool| info!("Paused: {}", paused))),
        Some('x'),
    )?;
    panel.add_separator();

    panel.start_container("Advanced", false)?;
    panel.create_slider(
        "Gain",
        SliderOptions::range(0.0, 4.0).step(0.1).default_value(1.0),
        Some(Box::new(|gain: f64| info!("Gain: {:.1}", gain))),
    )?;
    panel.create_menu(
        "Mode",
        ["linear", "quadratic", "cubic"],
        Some(Box::new(|mode: &str| info!("Mode: {}", mode))),
    )?;
    panel.end_container("Advanced")?;

    let mut colors = Panel::new("Colors", (320, 40));
    colors.create_slider("Red", SliderOptions::range(0.0, 255.0).step(1.0), None)?;
    colors.create_slider("Green", SliderOptions::range(0.0, 255.0).step(1.0), None)?;
    colors.create_slider("Blue", SliderOptions::range(0.0, 255.0).step(1.0), None)?;
    panel.attach(colors)?;

    let mut last_gain = None;
    run_with_config(
        panel,
        config,
        Some(Box::new(move |panel: &mut Panel| {
            let gain = panel.get_state("Gain")?.as_f64();
            if gain != last_gain {
                log::debug!("Gain observed in refresh loop: {:?}", gain);
                last_gain = gain;
            }
            Ok(())
        })),
    )
}
