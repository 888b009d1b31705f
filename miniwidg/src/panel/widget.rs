//! Retained widget model rendered by egui every frame

use crate::constants::slider;
use std::fmt;

pub type ButtonCallback = Box<dyn FnMut()>;
pub type ToggleCallback = Box<dyn FnMut(bool)>;
pub type MenuCallback = Box<dyn FnMut(&str)>;
pub type SliderCallback = Box<dyn FnMut(f64)>;

/// Current value of a widget
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetValue {
    Toggle(bool),
    Choice(String),
    Slider(f64),
}

impl WidgetValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Toggle(selected) => Some(*selected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Choice(choice) => Some(choice),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Slider(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for WidgetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle(selected) => write!(f, "{}", selected),
            Self::Choice(choice) => f.write_str(choice),
            Self::Slider(value) => write!(f, "{}", value),
        }
    }
}

/// Slider range and presentation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderOptions {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    /// Initial value, `start` when unset
    pub default: Option<f64>,
    pub show_value: bool,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            start: slider::START,
            end: slider::END,
            step: slider::STEP,
            default: None,
            show_value: true,
        }
    }
}

impl SliderOptions {
    pub fn range(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            ..Default::default()
        }
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn default_value(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }

    pub fn show_value(mut self, show: bool) -> Self {
        self.show_value = show;
        self
    }

    /// Clamp into the range and round to the nearest step from `start`.
    /// Ranges may run backwards (`start > end`).
    pub fn snap(&self, value: f64) -> f64 {
        let (lo, hi) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        let clamped = value.clamp(lo, hi);
        if self.step <= 0.0 || !self.step.is_finite() {
            return clamped;
        }
        let steps = ((clamped - self.start) / self.step).round();
        let snapped = (self.start + steps * self.step).clamp(lo, hi);
        round_to(snapped, decimals(self.step).max(decimals(self.start)))
    }
}

/// Digits after the decimal point in the shortest representation of `value`
fn decimals(value: f64) -> i32 {
    let text = value.abs().to_string();
    text.split_once('.')
        .map_or(0, |(_, fraction)| fraction.len() as i32)
        .min(MAX_DECIMALS)
}

const MAX_DECIMALS: i32 = 15;

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// What a toggle does after flipping
pub(crate) enum ToggleAction {
    None,
    Callback(ToggleCallback),
    /// Show or hide the children of the named container
    Container(String),
    /// Show or hide the attached child panel at this index
    Attachment(usize),
}

pub(crate) enum WidgetKind {
    Button {
        callback: Option<ButtonCallback>,
    },
    Toggle {
        selected: bool,
        action: ToggleAction,
    },
    Menu {
        choices: Vec<String>,
        selected: usize,
        callback: Option<MenuCallback>,
    },
    Slider {
        value: f64,
        options: SliderOptions,
        callback: Option<SliderCallback>,
    },
}

impl WidgetKind {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Button { .. } => "button",
            Self::Toggle { .. } => "toggle",
            Self::Menu { .. } => "menu",
            Self::Slider { .. } => "slider",
        }
    }
}

pub(crate) struct Widget {
    pub(crate) label: String,
    /// Index of this widget's entry in the panel layout
    pub(crate) item: usize,
    pub(crate) kind: WidgetKind,
}

impl Widget {
    pub(crate) fn value(&self) -> Option<WidgetValue> {
        match &self.kind {
            WidgetKind::Toggle { selected, .. } => Some(WidgetValue::Toggle(*selected)),
            WidgetKind::Menu {
                choices, selected, ..
            } => choices.get(*selected).cloned().map(WidgetValue::Choice),
            WidgetKind::Slider { value, .. } => Some(WidgetValue::Slider(*value)),
            WidgetKind::Button { .. } => None,
        }
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("label", &self.label)
            .field("kind", &self.kind.kind_name())
            .field("value", &self.value())
            .finish()
    }
}

/// One row of the single-column panel layout
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LayoutItem {
    Widget(String),
    Label(String),
    Separator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_rounds_to_step() {
        let options = SliderOptions::range(0.0, 10.0).step(0.5);
        assert_eq!(options.snap(3.3), 3.5);
        assert_eq!(options.snap(-4.0), 0.0);
        assert_eq!(options.snap(12.0), 10.0);
    }

    #[test]
    fn test_snap_reversed_range() {
        let options = SliderOptions::range(1.0, -1.0).step(0.25);
        assert_eq!(options.snap(0.3), 0.25);
        assert_eq!(options.snap(5.0), 1.0);
        assert_eq!(options.snap(-5.0), -1.0);
    }

    #[test]
    fn test_snap_decimal_steps_read_back_exactly() {
        let tenths = SliderOptions::range(0.0, 4.0).step(0.1);
        assert_eq!(tenths.snap(0.3), 0.3);
        assert_eq!(tenths.snap(0.7), 0.7);
        assert_eq!(tenths.snap(2.94), 2.9);

        let hundredths = SliderOptions::default();
        assert_eq!(hundredths.snap(0.07), 0.07);
        assert_eq!(hundredths.snap(0.29), 0.29);
        assert_eq!(hundredths.snap(0.555), 0.56);

        let offset = SliderOptions::range(0.05, 1.0).step(0.1);
        assert_eq!(offset.snap(0.33), 0.35);
    }

    #[test]
    fn test_decimals() {
        assert_eq!(decimals(0.1), 1);
        assert_eq!(decimals(0.01), 2);
        assert_eq!(decimals(2.0), 0);
        assert_eq!(decimals(-0.25), 2);
    }

    #[test]
    fn test_snap_without_step() {
        let options = SliderOptions::range(0.0, 1.0).step(0.0);
        assert_eq!(options.snap(0.123), 0.123);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(WidgetValue::Toggle(true).as_bool(), Some(true));
        assert_eq!(WidgetValue::Choice("x".into()).as_str(), Some("x"));
        assert_eq!(WidgetValue::Slider(0.5).as_f64(), Some(0.5));
        assert_eq!(WidgetValue::Slider(0.5).as_bool(), None);
        assert_eq!(WidgetValue::Choice("fast".into()).to_string(), "fast");
    }
}
