//! miniwidg - minimalist widget based control panels
//!
//! Build a panel of buttons, toggles, sliders and menus for tweaking
//! parameters of a running program, bind global hotkeys to them, and nest
//! panels inside each other.
//!
//! ```no_run
//! use miniwidg::{run_with, Panel, SliderOptions};
//!
//! let mut panel = Panel::with_title("Tuning");
//! panel.create_slider("gain", SliderOptions::range(0.0, 4.0), None)?;
//! panel.create_check_button("enabled", true, None, Some('e'))?;
//!
//! run_with(panel, |panel| {
//!     let gain = panel.get_state("gain")?;
//!     log::debug!("gain = {}", gain);
//!     Ok(())
//! })?;
//! # Ok::<(), miniwidg::PanelError>(())
//! ```

pub mod app;
pub mod config;
pub mod constants;
pub mod hotkeys;
pub mod logging;
pub mod panel;
pub mod utils;

// Re-exports for convenience
pub use app::{run, run_with, run_with_config, PanelApp, RefreshHook};
pub use config::PanelConfig;
pub use hotkeys::HotkeyRegistry;
pub use panel::widget::{
    ButtonCallback, MenuCallback, SliderCallback, SliderOptions, ToggleCallback, WidgetValue,
};
pub use panel::{CloseOutcome, Interaction, Panel};
pub use utils::{PanelError, Result};
