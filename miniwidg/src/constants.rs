//! Application constants and configuration values

/// UI constants
pub mod ui {
    pub const DEFAULT_TITLE: &str = "Control";
    pub const DEFAULT_OFFSET: (i32, i32) = (0, 0);
    pub const MIN_PANEL_WIDTH: f32 = 160.0;
    pub const DEFAULT_SCALE_FACTOR: f32 = 1.0;
    pub const MAX_SCALE_FACTOR: f32 = 2.0;
    pub const MIN_SCALE_FACTOR: f32 = 0.5;
    pub const CHILD_WINDOW_SIZE: [f32; 2] = [240.0, 320.0];
}

/// Slider defaults
pub mod slider {
    pub const START: f64 = 0.0;
    pub const END: f64 = 1.0;
    pub const STEP: f64 = 0.01;
}

/// Update intervals in milliseconds
pub mod intervals {
    pub const UI_REFRESH: u64 = 16; // ~60 FPS
    pub const HOTKEY_POLL: u64 = 10;
}

/// Application metadata
pub mod app {
    pub const NAME: &str = "miniwidg";
    pub const DEFAULT_LOG_LEVEL: &str = "info";
    pub const LOG_FILE_MAX_SIZE: u64 = 10_000_000; // 10MB
    pub const LOG_FILE_MAX_COUNT: usize = 5;
}
