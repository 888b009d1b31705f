//! Control panels: named widgets, collapsible containers, hotkeys and
//! nested child panels.

pub mod container;
mod render;
pub mod widget;

use crate::constants::ui;
use crate::hotkeys::{HotkeyRegistry, PendingFlag};
use crate::utils::{PanelError, Result};
use container::Container;
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::atomic::Ordering;
use widget::{
    ButtonCallback, LayoutItem, MenuCallback, SliderCallback, SliderOptions, ToggleAction,
    ToggleCallback, Widget, WidgetKind, WidgetValue,
};

pub use render::Interaction;

pub type ExitCallback = Box<dyn FnMut()>;

/// Key bound to a widget; the flag is raised by the hotkey listener
struct HotkeyBinding {
    pending: PendingFlag,
    target: String,
}

/// Child panel nested in a parent, shown through the parent's toggle
struct Attachment {
    toggle: String,
    panel: Panel,
}

/// What happened when a panel's window asked to close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The exit callback ran; the window stays as it is
    Callback,
    /// Default handling: the panel was hidden
    Hidden,
}

/// A single window holding a column of widgets
pub struct Panel {
    title: String,
    offset: (i32, i32),
    visible: bool,
    destroyed: bool,

    widgets: HashMap<String, Widget>,
    layout: Vec<LayoutItem>,
    containers: BTreeMap<String, Container>,

    hotkeys: Option<HotkeyRegistry>,
    bindings: BTreeMap<char, HotkeyBinding>,

    exit_callback: Option<ExitCallback>,
    /// Name of the toggle controlling this panel in its parent
    parent_toggle: Option<String>,
    attachments: Vec<Attachment>,
}

impl Panel {
    pub fn new<S: Into<String>>(title: S, offset: (i32, i32)) -> Self {
        let title = title.into();
        debug!("Creating panel '{}' at {:?}", title, offset);

        Self {
            title,
            offset,
            visible: true,
            destroyed: false,
            widgets: HashMap::new(),
            layout: Vec::new(),
            containers: BTreeMap::new(),
            hotkeys: None,
            bindings: BTreeMap::new(),
            exit_callback: None,
            parent_toggle: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_title<S: Into<String>>(title: S) -> Self {
        Self::new(title, ui::DEFAULT_OFFSET)
    }

    /// Use `registry` for hotkeys instead of the process-wide one
    pub fn with_hotkey_registry(mut self, registry: HotkeyRegistry) -> Self {
        self.hotkeys = Some(registry);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// A panel is destroyed by the first refresh that finds it without widgets
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Toggle in the parent panel that shows this panel, if attached
    pub fn parent_toggle(&self) -> Option<&str> {
        self.parent_toggle.as_deref()
    }

    pub fn has_exit_callback(&self) -> bool {
        self.exit_callback.is_some()
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.widgets.contains_key(name)
    }

    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers.get(name)
    }

    /// Attached child panel by title
    pub fn child(&self, title: &str) -> Option<&Panel> {
        self.attachments
            .iter()
            .find(|a| a.panel.title == title)
            .map(|a| &a.panel)
    }

    pub fn child_mut(&mut self, title: &str) -> Option<&mut Panel> {
        self.attachments
            .iter_mut()
            .find(|a| a.panel.title == title)
            .map(|a| &mut a.panel)
    }

    /// Replace the default close handling with `callback`
    pub fn add_exit_callback<F: FnMut() + 'static>(&mut self, callback: F) {
        self.exit_callback = Some(Box::new(callback));
    }

    pub fn create_button(
        &mut self,
        name: &str,
        callback: Option<ButtonCallback>,
        hotkey: Option<char>,
    ) -> Result<()> {
        self.register_widget(name, WidgetKind::Button { callback })?;
        if let Some(key) = hotkey {
            self.add_hotkey(key, name);
        }
        Ok(())
    }

    /// Toggle starting at `default`. The callback sees the new state every
    /// time the toggle is invoked, never at creation.
    pub fn create_check_button(
        &mut self,
        name: &str,
        default: bool,
        callback: Option<ToggleCallback>,
        hotkey: Option<char>,
    ) -> Result<()> {
        let action = callback.map_or(ToggleAction::None, ToggleAction::Callback);
        self.register_widget(
            name,
            WidgetKind::Toggle {
                selected: default,
                action,
            },
        )?;
        if let Some(key) = hotkey {
            self.add_hotkey(key, name);
        }
        Ok(())
    }

    /// Dropdown captioned by `name`; the first choice starts selected
    pub fn create_menu<I, T>(
        &mut self,
        name: &str,
        choices: I,
        callback: Option<MenuCallback>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let choices: Vec<String> = choices.into_iter().map(|c| c.to_string()).collect();
        if choices.is_empty() {
            return Err(PanelError::EmptyMenu {
                name: name.to_string(),
            });
        }
        self.ensure_free(name)?;

        self.push_item(LayoutItem::Label(name.to_string()));
        self.register_widget(
            name,
            WidgetKind::Menu {
                choices,
                selected: 0,
                callback,
            },
        )
    }

    pub fn create_slider(
        &mut self,
        name: &str,
        options: SliderOptions,
        callback: Option<SliderCallback>,
    ) -> Result<()> {
        let value = options.snap(options.default.unwrap_or(options.start));
        self.register_widget(
            name,
            WidgetKind::Slider {
                value,
                options,
                callback,
            },
        )
    }

    pub fn add_separator(&mut self) {
        self.push_item(LayoutItem::Separator);
    }

    /// Open a collapsible group controlled by a toggle named `name`
    pub fn start_container(&mut self, name: &str, default: bool) -> Result<()> {
        self.create_check_button(name, default, None, None)?;
        self.containers
            .insert(name.to_string(), Container::new(default));
        debug!("Started container '{}' (default {})", name, default);
        Ok(())
    }

    /// Freeze the group's membership and let its toggle show/hide it
    pub fn end_container(&mut self, name: &str) -> Result<()> {
        let container = self
            .containers
            .get_mut(name)
            .ok_or_else(|| PanelError::container_not_found(name))?;
        container.open = false;
        debug!(
            "Closed container '{}' with {} item(s)",
            name,
            container.children.len()
        );

        if let Some(WidgetKind::Toggle { action, .. }) =
            self.widgets.get_mut(name).map(|w| &mut w.kind)
        {
            *action = ToggleAction::Container(name.to_string());
        }
        Ok(())
    }

    /// One iteration of panel bookkeeping, run once per frame before drawing
    pub fn refresh(&mut self) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }

        if self.widgets.is_empty() {
            info!("Panel '{}' has no widgets, destroying it", self.title);
            self.destroyed = true;
            return Ok(());
        }

        self.initialize_containers();
        self.consume_hotkeys();

        for attachment in &mut self.attachments {
            attachment.panel.refresh()?;
        }
        Ok(())
    }

    /// Current value of a toggle, menu or slider
    pub fn get_state(&self, name: &str) -> Result<WidgetValue> {
        let widget = self
            .widgets
            .get(name)
            .ok_or_else(|| PanelError::widget_not_found(name))?;

        widget
            .value()
            .ok_or_else(|| PanelError::unsupported(name, "get_state"))
    }

    /// Act as if the widget was clicked: run a button's callback, or flip a
    /// toggle and run its action
    pub fn invoke(&mut self, name: &str) -> Result<()> {
        let widget = self
            .widgets
            .get_mut(name)
            .ok_or_else(|| PanelError::widget_not_found(name))?;

        match &mut widget.kind {
            WidgetKind::Button { callback } => {
                if let Some(callback) = callback {
                    callback();
                }
                Ok(())
            }
            WidgetKind::Toggle { selected, .. } => {
                let state = !*selected;
                self.set_toggle(name, state, true)
            }
            other => Err(PanelError::unsupported(
                name,
                format!("invoke on {}", other.kind_name()),
            )),
        }
    }

    /// Set a toggle without firing its callback. Container and child-panel
    /// toggles still update what they show.
    pub fn set_check_button(&mut self, name: &str, state: bool) -> Result<()> {
        self.set_toggle(name, state, false)
    }

    /// Set a slider without firing its callback; the value is clamped and
    /// snapped to the slider's step
    pub fn set_slider(&mut self, name: &str, value: f64) -> Result<()> {
        match self.widget_kind_mut(name)? {
            WidgetKind::Slider {
                value: current,
                options,
                ..
            } => {
                *current = options.snap(value);
                Ok(())
            }
            other => Err(PanelError::unsupported(
                name,
                format!("set_slider on {}", other.kind_name()),
            )),
        }
    }

    /// Select `choice` in a menu without firing its callback
    pub fn set_menu(&mut self, name: &str, choice: &str) -> Result<()> {
        match self.widget_kind_mut(name)? {
            WidgetKind::Menu {
                choices, selected, ..
            } => {
                let index = choices.iter().position(|c| c == choice).ok_or_else(|| {
                    PanelError::UnknownChoice {
                        name: name.to_string(),
                        choice: choice.to_string(),
                    }
                })?;
                *selected = index;
                Ok(())
            }
            other => Err(PanelError::unsupported(
                name,
                format!("set_menu on {}", other.kind_name()),
            )),
        }
    }

    /// Text shown on the widget, including its hotkey
    pub fn label(&self, name: &str) -> Result<&str> {
        self.widgets
            .get(name)
            .map(|w| w.label.as_str())
            .ok_or_else(|| PanelError::widget_not_found(name))
    }

    /// Whether the widget is shown, i.e. no collapsed container hides it
    pub fn is_widget_visible(&self, name: &str) -> Result<bool> {
        let widget = self
            .widgets
            .get(name)
            .ok_or_else(|| PanelError::widget_not_found(name))?;
        Ok(!self.hidden_items().contains(&widget.item))
    }

    /// Nest `child` in this panel behind a toggle named after its title.
    /// The child starts hidden.
    pub fn attach(&mut self, mut child: Panel) -> Result<()> {
        let toggle = child.title.clone();
        self.create_check_button(&toggle, false, None, None)?;

        let index = self.attachments.len();
        if let Some(WidgetKind::Toggle { action, .. }) =
            self.widgets.get_mut(&toggle).map(|w| &mut w.kind)
        {
            *action = ToggleAction::Attachment(index);
        }

        child.parent_toggle = Some(toggle.clone());
        child.hide();
        info!("Attached panel '{}' to '{}'", toggle, self.title);
        self.attachments.push(Attachment {
            toggle,
            panel: child,
        });
        Ok(())
    }

    pub fn hide(&mut self) {
        if self.visible {
            debug!("Hiding panel '{}'", self.title);
        }
        self.visible = false;
    }

    pub fn unhide(&mut self) {
        if !self.visible {
            debug!("Showing panel '{}'", self.title);
        }
        self.visible = true;
    }

    /// Handle a close request on this panel's window
    pub fn on_closing(&mut self) -> CloseOutcome {
        if let Some(callback) = &mut self.exit_callback {
            callback();
            return CloseOutcome::Callback;
        }
        self.hide();
        CloseOutcome::Hidden
    }

    /// Close request on an attached child's window. Default handling also
    /// deselects the parent's toggle without running its action.
    pub fn close_child(&mut self, title: &str) -> Result<CloseOutcome> {
        let attachment = self
            .attachments
            .iter_mut()
            .find(|a| a.panel.title == title)
            .ok_or_else(|| PanelError::widget_not_found(title))?;

        let outcome = attachment.panel.on_closing();
        if outcome == CloseOutcome::Hidden {
            let toggle = attachment.toggle.clone();
            if let Ok(WidgetKind::Toggle { selected, .. }) = self.widget_kind_mut(&toggle) {
                *selected = false;
            }
        }
        Ok(outcome)
    }

    fn widget_kind_mut(&mut self, name: &str) -> Result<&mut WidgetKind> {
        self.widgets
            .get_mut(name)
            .map(|w| &mut w.kind)
            .ok_or_else(|| PanelError::widget_not_found(name))
    }

    fn set_toggle(&mut self, name: &str, state: bool, fire_callback: bool) -> Result<()> {
        enum FollowUp {
            Container(String),
            Attachment(usize),
        }

        let follow_up = match self.widget_kind_mut(name)? {
            WidgetKind::Toggle { selected, action } => {
                *selected = state;
                match action {
                    ToggleAction::None => None,
                    ToggleAction::Callback(callback) => {
                        if fire_callback {
                            callback(state);
                        }
                        None
                    }
                    ToggleAction::Container(container) => {
                        Some(FollowUp::Container(container.clone()))
                    }
                    ToggleAction::Attachment(index) => Some(FollowUp::Attachment(*index)),
                }
            }
            other => {
                return Err(PanelError::unsupported(
                    name,
                    format!("toggle on {}", other.kind_name()),
                ))
            }
        };

        match follow_up {
            Some(FollowUp::Container(container)) => {
                if let Some(container) = self.containers.get_mut(&container) {
                    container.expanded = state;
                }
            }
            Some(FollowUp::Attachment(index)) => {
                if let Some(attachment) = self.attachments.get_mut(index) {
                    if state {
                        attachment.panel.unhide();
                    } else {
                        attachment.panel.hide();
                    }
                }
            }
            None => {}
        }
        Ok(())
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.widgets.contains_key(name) {
            return Err(PanelError::duplicate_widget(name));
        }
        Ok(())
    }

    fn register_widget(&mut self, name: &str, kind: WidgetKind) -> Result<()> {
        self.ensure_free(name)?;
        debug!(
            "Panel '{}': adding {} '{}'",
            self.title,
            kind.kind_name(),
            name
        );

        let item = self.push_item(LayoutItem::Widget(name.to_string()));
        self.widgets.insert(
            name.to_string(),
            Widget {
                label: name.to_string(),
                item,
                kind,
            },
        );
        Ok(())
    }

    /// Append a layout row; every open container takes it as a child
    fn push_item(&mut self, item: LayoutItem) -> usize {
        let index = self.layout.len();
        self.layout.push(item);
        for container in self.containers.values_mut().filter(|c| c.open) {
            container.children.push(index);
        }
        index
    }

    fn add_hotkey(&mut self, key: char, name: &str) {
        let registry = self.hotkeys.get_or_insert_with(HotkeyRegistry::global);
        let pending = registry.bind(key);

        if let Some(previous) = self.bindings.insert(
            key,
            HotkeyBinding {
                pending,
                target: name.to_string(),
            },
        ) {
            warn!(
                "Hotkey '{}' moved from '{}' to '{}'",
                key, previous.target, name
            );
        }

        if let Some(widget) = self.widgets.get_mut(name) {
            widget.label = format!("{} ({})", name, key);
        }
    }

    fn initialize_containers(&mut self) {
        let pending: Vec<String> = self
            .containers
            .iter()
            .filter(|(_, c)| !c.initialized)
            .map(|(name, _)| name.clone())
            .collect();

        for name in pending {
            let state = match self.widgets.get(&name).map(|w| &w.kind) {
                Some(WidgetKind::Toggle { selected, .. }) => *selected,
                _ => continue,
            };
            if let Some(container) = self.containers.get_mut(&name) {
                // a container never closed has no visibility action yet
                if !container.open {
                    container.expanded = state;
                }
                container.initialized = true;
                debug!("Initialized container '{}' (expanded {})", name, container.expanded);
            }
        }
    }

    /// Invoke the target of every pending binding. A flag is only cleared
    /// right before its own target runs; a failing target is logged and the
    /// remaining bindings still fire.
    fn consume_hotkeys(&mut self) {
        let keys: Vec<char> = self.bindings.keys().copied().collect();

        for key in keys {
            let target = match self.bindings.get(&key) {
                Some(binding) if binding.pending.swap(false, Ordering::AcqRel) => {
                    binding.target.clone()
                }
                _ => continue,
            };

            info!("Hotkey '{}' triggered '{}' on panel '{}'", key, target, self.title);
            if let Err(e) = self.invoke(&target) {
                error!("Hotkey '{}' failed to invoke '{}': {}", key, target, e);
            }
        }
    }

    /// Layout rows hidden by a collapsed container
    fn hidden_items(&self) -> HashSet<usize> {
        self.containers
            .values()
            .filter(|c| !c.expanded)
            .flat_map(|c| c.children.iter().copied())
            .collect()
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::with_title(ui::DEFAULT_TITLE)
    }
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("title", &self.title)
            .field("offset", &self.offset)
            .field("visible", &self.visible)
            .field("destroyed", &self.destroyed)
            .field("widgets", &self.widgets)
            .field("containers", &self.containers)
            .field("hotkeys", &self.bindings.keys().collect::<Vec<_>>())
            .field(
                "children",
                &self
                    .attachments
                    .iter()
                    .map(|a| a.panel.title.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn panel() -> Panel {
        Panel::with_title("Test").with_hotkey_registry(HotkeyRegistry::detached())
    }

    #[test]
    fn test_missing_widget_is_lookup_failure() {
        let panel = panel();
        let err = panel.get_state("nope").unwrap_err();
        assert!(err.is_lookup_failure());
    }

    #[test]
    fn test_button_has_no_state() {
        let mut panel = panel();
        panel.create_button("Go", None, None).unwrap();
        assert!(matches!(
            panel.get_state("Go"),
            Err(PanelError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_check_button_default_and_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut panel = panel();
        panel
            .create_check_button(
                "Debug",
                true,
                Some(Box::new(move |state: bool| sink.borrow_mut().push(state))),
                None,
            )
            .unwrap();

        // creation never fires the callback
        assert!(seen.borrow().is_empty());
        assert_eq!(panel.get_state("Debug").unwrap(), WidgetValue::Toggle(true));

        panel.invoke("Debug").unwrap();
        panel.invoke("Debug").unwrap();
        assert_eq!(*seen.borrow(), vec![false, true]);

        panel.set_check_button("Debug", false).unwrap();
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(panel.get_state("Debug").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn test_menu_round_trip() {
        let mut panel = panel();
        panel.create_menu("Mode", [1, 2, 3], None).unwrap();
        assert_eq!(panel.get_state("Mode").unwrap().as_str(), Some("1"));

        panel.set_menu("Mode", "3").unwrap();
        assert_eq!(panel.get_state("Mode").unwrap().as_str(), Some("3"));
        assert!(matches!(
            panel.set_menu("Mode", "4"),
            Err(PanelError::UnknownChoice { .. })
        ));
    }

    #[test]
    fn test_empty_menu_is_rejected() {
        let mut panel = panel();
        let choices: Vec<String> = Vec::new();
        assert!(matches!(
            panel.create_menu("Mode", choices, None),
            Err(PanelError::EmptyMenu { .. })
        ));
        assert_eq!(panel.layout.len(), 0);
    }

    #[test]
    fn test_slider_default_and_snapping() {
        let mut panel = panel();
        panel
            .create_slider("Gain", SliderOptions::range(0.0, 2.0).step(0.5), None)
            .unwrap();
        assert_eq!(panel.get_state("Gain").unwrap().as_f64(), Some(0.0));

        panel.set_slider("Gain", 1.3).unwrap();
        assert_eq!(panel.get_state("Gain").unwrap().as_f64(), Some(1.5));

        panel
            .create_slider(
                "Bias",
                SliderOptions::default().default_value(0.25),
                None,
            )
            .unwrap();
        assert_eq!(panel.get_state("Bias").unwrap().as_f64(), Some(0.25));
    }

    #[test]
    fn test_slider_decimal_steps_round_trip() {
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&values);

        let mut panel = panel();
        panel
            .create_slider(
                "Gain",
                SliderOptions::range(0.0, 4.0).step(0.1).default_value(0.7),
                Some(Box::new(move |v: f64| sink.borrow_mut().push(v))),
            )
            .unwrap();
        assert_eq!(panel.get_state("Gain").unwrap().as_f64(), Some(0.7));

        panel.set_slider("Gain", 0.3).unwrap();
        assert_eq!(panel.get_state("Gain").unwrap().as_f64(), Some(0.3));

        panel
            .create_slider("Fine", SliderOptions::default(), None)
            .unwrap();
        for value in [0.07, 0.29, 0.58, 0.99] {
            panel.set_slider("Fine", value).unwrap();
            assert_eq!(panel.get_state("Fine").unwrap().as_f64(), Some(value));
        }

        panel
            .apply(Interaction::Slide("Gain".into(), 1.12))
            .unwrap();
        assert_eq!(*values.borrow(), vec![1.1]);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut panel = panel();
        panel.create_button("A", None, None).unwrap();
        assert!(matches!(
            panel.create_check_button("A", false, None, None),
            Err(PanelError::DuplicateWidget { .. })
        ));
        assert!(matches!(
            panel.create_menu("A", ["x"], None),
            Err(PanelError::DuplicateWidget { .. })
        ));
        assert_eq!(panel.layout.len(), 1);
    }

    #[test]
    fn test_invoke_slider_is_unsupported() {
        let mut panel = panel();
        panel
            .create_slider("Gain", SliderOptions::default(), None)
            .unwrap();
        assert!(matches!(
            panel.invoke("Gain"),
            Err(PanelError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_container_collects_rows_until_closed() {
        let mut panel = panel();
        panel.start_container("Advanced", false).unwrap();
        panel.create_button("Reset", None, None).unwrap();
        panel.create_menu("Mode", ["a", "b"], None).unwrap();
        panel.add_separator();
        panel.end_container("Advanced").unwrap();
        panel.create_button("Outside", None, None).unwrap();

        let container = panel.container("Advanced").unwrap();
        assert!(!container.is_open());
        // button, menu caption, menu, separator
        assert_eq!(container.len(), 4);
    }

    #[test]
    fn test_container_visibility_follows_toggle() {
        let mut panel = panel();
        panel.start_container("Advanced", false).unwrap();
        panel.create_button("Reset", None, None).unwrap();
        panel.end_container("Advanced").unwrap();

        // synced on first refresh only
        assert!(panel.is_widget_visible("Reset").unwrap());
        panel.refresh().unwrap();
        assert!(!panel.is_widget_visible("Reset").unwrap());
        assert!(panel.is_widget_visible("Advanced").unwrap());

        panel.invoke("Advanced").unwrap();
        assert!(panel.is_widget_visible("Reset").unwrap());
        panel.invoke("Advanced").unwrap();
        assert!(!panel.is_widget_visible("Reset").unwrap());
    }

    #[test]
    fn test_unclosed_container_keeps_children_visible() {
        let mut panel = panel();
        panel.start_container("Group", false).unwrap();
        panel.create_button("Inner", None, None).unwrap();
        panel.refresh().unwrap();

        assert!(panel.container("Group").unwrap().initialized);
        assert!(panel.is_widget_visible("Inner").unwrap());
        panel.invoke("Group").unwrap();
        assert!(panel.is_widget_visible("Inner").unwrap());
    }

    #[test]
    fn test_end_unknown_container() {
        let mut panel = panel();
        let err = panel.end_container("Ghost").unwrap_err();
        assert!(err.is_lookup_failure());
    }

    #[test]
    fn test_nested_container_hidden_by_either_level() {
        let mut panel = panel();
        panel.start_container("Outer", true).unwrap();
        panel.start_container("Inner", false).unwrap();
        panel.create_button("Deep", None, None).unwrap();
        panel.end_container("Inner").unwrap();
        panel.end_container("Outer").unwrap();
        panel.refresh().unwrap();

        assert!(panel.is_widget_visible("Inner").unwrap());
        assert!(!panel.is_widget_visible("Deep").unwrap());

        panel.invoke("Inner").unwrap();
        assert!(panel.is_widget_visible("Deep").unwrap());

        panel.invoke("Outer").unwrap();
        assert!(!panel.is_widget_visible("Inner").unwrap());
        assert!(!panel.is_widget_visible("Deep").unwrap());
    }

    #[test]
    fn test_hotkey_label_and_trigger() {
        let registry = HotkeyRegistry::detached();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);

        let mut panel = Panel::with_title("Keys").with_hotkey_registry(registry.clone());
        panel
            .create_button(
                "Fire",
                Some(Box::new(move || counter.set(counter.get() + 1))),
                Some('f'),
            )
            .unwrap();
        assert_eq!(panel.label("Fire").unwrap(), "Fire (f)");

        registry.notify_key('f');
        registry.notify_key('f');
        registry.notify_key('f');
        panel.refresh().unwrap();
        assert_eq!(clicks.get(), 1);

        panel.refresh().unwrap();
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_pending_hotkeys_all_fire_in_one_refresh() {
        let registry = HotkeyRegistry::detached();
        let fired = Rc::new(RefCell::new(Vec::new()));

        let mut panel = Panel::with_title("Keys").with_hotkey_registry(registry.clone());
        for (name, key) in [("One", '1'), ("Two", '2'), ("Three", '3')] {
            let sink = Rc::clone(&fired);
            panel
                .create_button(
                    name,
                    Some(Box::new(move || sink.borrow_mut().push(name))),
                    Some(key),
                )
                .unwrap();
        }
        panel.create_check_button("Mute", false, None, Some('m')).unwrap();

        registry.notify_key('3');
        registry.notify_key('1');
        registry.notify_key('m');
        panel.refresh().unwrap();

        assert_eq!(*fired.borrow(), vec!["One", "Three"]);
        assert_eq!(panel.get_state("Mute").unwrap().as_bool(), Some(true));
        assert!(panel.bindings.values().all(|b| !b.pending.load(Ordering::Acquire)));

        registry.notify_key('2');
        panel.refresh().unwrap();
        assert_eq!(*fired.borrow(), vec!["One", "Three", "Two"]);
    }

    #[test]
    fn test_failing_hotkey_target_does_not_drop_others() {
        let registry = HotkeyRegistry::detached();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);

        let mut panel = Panel::with_title("Keys").with_hotkey_registry(registry.clone());
        panel
            .create_button(
                "Fire",
                Some(Box::new(move || counter.set(counter.get() + 1))),
                Some('f'),
            )
            .unwrap();
        panel.create_slider("Gain", SliderOptions::default(), None).unwrap();
        // sliders cannot be invoked; bound ahead of 'f' in key order
        panel.add_hotkey('a', "Gain");

        registry.notify_key('a');
        registry.notify_key('f');
        panel.refresh().unwrap();

        assert_eq!(clicks.get(), 1);
        assert!(panel.bindings.values().all(|b| !b.pending.load(Ordering::Acquire)));
    }

    #[test]
    fn test_hotkey_flips_toggle() {
        let registry = HotkeyRegistry::detached();
        let mut panel = Panel::with_title("Keys").with_hotkey_registry(registry.clone());
        panel
            .create_check_button("Pause", false, None, Some('p'))
            .unwrap();

        registry.notify_key('p');
        panel.refresh().unwrap();
        assert_eq!(panel.get_state("Pause").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_default_panel() {
        let panel = Panel::default();
        assert_eq!(panel.title(), "Control");
        assert_eq!(panel.offset(), (0, 0));
        assert!(panel.is_visible());
    }

    #[test]
    fn test_empty_panel_is_destroyed() {
        let mut panel = panel();
        panel.add_separator();
        panel.refresh().unwrap();
        assert!(panel.is_destroyed());
    }

    #[test]
    fn test_attach_and_close_child() {
        let mut parent = panel();
        let mut child = Panel::with_title("Child");
        child.create_button("Inside", None, None).unwrap();
        parent.attach(child).unwrap();

        assert!(!parent.child("Child").unwrap().is_visible());
        assert_eq!(parent.child("Child").unwrap().parent_toggle(), Some("Child"));
        assert_eq!(parent.get_state("Child").unwrap().as_bool(), Some(false));

        parent.invoke("Child").unwrap();
        assert!(parent.child("Child").unwrap().is_visible());

        assert_eq!(parent.close_child("Child").unwrap(), CloseOutcome::Hidden);
        assert!(!parent.child("Child").unwrap().is_visible());
        assert_eq!(parent.get_state("Child").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn test_child_exit_callback_replaces_default() {
        let closed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&closed);

        let mut parent = panel();
        let mut child = Panel::with_title("Child");
        child.create_button("Inside", None, None).unwrap();
        child.add_exit_callback(move || flag.set(true));
        parent.attach(child).unwrap();
        parent.set_check_button("Child", true).unwrap();

        assert_eq!(parent.close_child("Child").unwrap(), CloseOutcome::Callback);
        assert!(closed.get());
        assert!(parent.child("Child").unwrap().is_visible());
        assert_eq!(parent.get_state("Child").unwrap().as_bool(), Some(true));
    }
}
