//! Drawing panels with egui and applying what the user did

use super::widget::{LayoutItem, WidgetKind};
use super::{CloseOutcome, Panel};
use crate::config::WindowConfig;
use crate::constants::ui;
use crate::utils::{PanelError, Result};
use egui::{ComboBox, Slider, ViewportBuilder, ViewportClass, ViewportCommand, ViewportId};
use log::{debug, error};

/// A user action collected while drawing, applied once the frame is laid out
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Button clicked or toggle flipped
    Invoke(String),
    /// Menu entry picked by index
    Choose(String, usize),
    /// Slider dragged to a value
    Slide(String, f64),
}

impl Panel {
    /// Window settings matching this panel's title and offset
    pub fn viewport_builder(&self, window: &WindowConfig) -> ViewportBuilder {
        ViewportBuilder::default()
            .with_title(self.title.clone())
            .with_position([self.offset.0 as f32, self.offset.1 as f32])
            .with_inner_size(ui::CHILD_WINDOW_SIZE)
            .with_min_inner_size([window.min_width, 40.0])
    }

    /// Viewport of the child titled `child` attached to the panel titled
    /// `parent_title`, drawn from the viewport `parent`
    pub fn child_viewport_id(
        parent: ViewportId,
        parent_title: &str,
        child: &str,
    ) -> ViewportId {
        ViewportId::from_hash_of(("miniwidg", parent, parent_title, child))
    }

    /// Apply a user action the way a click in the window would, callbacks
    /// included
    pub fn apply(&mut self, interaction: Interaction) -> Result<()> {
        match interaction {
            Interaction::Invoke(name) => self.invoke(&name),
            Interaction::Choose(name, index) => {
                let widget = self
                    .widgets
                    .get_mut(&name)
                    .ok_or_else(|| PanelError::widget_not_found(&name))?;
                match &mut widget.kind {
                    WidgetKind::Menu {
                        choices,
                        selected,
                        callback,
                    } => {
                        let Some(choice) = choices.get(index) else {
                            return Err(PanelError::UnknownChoice {
                                name,
                                choice: index.to_string(),
                            });
                        };
                        *selected = index;
                        debug!("Menu '{}' set to '{}'", name, choice);
                        if let Some(callback) = callback {
                            callback(choice.as_str());
                        }
                        Ok(())
                    }
                    other => Err(PanelError::unsupported(
                        &name,
                        format!("choose on {}", other.kind_name()),
                    )),
                }
            }
            Interaction::Slide(name, value) => {
                let widget = self
                    .widgets
                    .get_mut(&name)
                    .ok_or_else(|| PanelError::widget_not_found(&name))?;
                match &mut widget.kind {
                    WidgetKind::Slider {
                        value: current,
                        options,
                        callback,
                    } => {
                        let snapped = options.snap(value);
                        if snapped == *current {
                            return Ok(());
                        }
                        *current = snapped;
                        if let Some(callback) = callback {
                            callback(snapped);
                        }
                        Ok(())
                    }
                    other => Err(PanelError::unsupported(
                        &name,
                        format!("slide on {}", other.kind_name()),
                    )),
                }
            }
        }
    }

    /// Draw the visible rows into `ui` and return what the user did
    pub fn draw(&self, ui: &mut egui::Ui, window: &WindowConfig) -> Vec<Interaction> {
        let hidden = self.hidden_items();
        let mut interactions = Vec::new();

        ui.set_min_width(window.min_width);
        ui.vertical_centered_justified(|ui| {
            for (index, item) in self.layout.iter().enumerate() {
                if hidden.contains(&index) {
                    continue;
                }
                match item {
                    LayoutItem::Separator => {
                        ui.separator();
                    }
                    LayoutItem::Label(text) => {
                        ui.label(text);
                    }
                    LayoutItem::Widget(name) => {
                        if let Some(widget) = self.widgets.get(name) {
                            self.draw_widget(
                                ui,
                                name,
                                &widget.label,
                                &widget.kind,
                                &mut interactions,
                            );
                        }
                    }
                }
            }
        });

        interactions
    }

    fn draw_widget(
        &self,
        ui: &mut egui::Ui,
        name: &str,
        label: &str,
        kind: &WidgetKind,
        interactions: &mut Vec<Interaction>,
    ) {
        match kind {
            WidgetKind::Button { .. } => {
                if ui.button(label).clicked() {
                    interactions.push(Interaction::Invoke(name.to_string()));
                }
            }
            WidgetKind::Toggle { selected, .. } => {
                let mut checked = *selected;
                if ui.checkbox(&mut checked, label).changed() {
                    interactions.push(Interaction::Invoke(name.to_string()));
                }
            }
            WidgetKind::Menu {
                choices, selected, ..
            } => {
                let current = choices.get(*selected).map(String::as_str).unwrap_or_default();
                ComboBox::from_id_salt(("miniwidg_menu", name))
                    .selected_text(current)
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for (index, choice) in choices.iter().enumerate() {
                            if ui.selectable_label(index == *selected, choice).clicked()
                                && index != *selected
                            {
                                interactions.push(Interaction::Choose(name.to_string(), index));
                            }
                        }
                    });
            }
            WidgetKind::Slider { value, options, .. } => {
                let mut dragged = *value;
                let mut slider = Slider::new(&mut dragged, options.start..=options.end)
                    .text(label)
                    .show_value(options.show_value);
                if options.step > 0.0 {
                    slider = slider.step_by(options.step);
                }
                if ui.add(slider).changed() {
                    interactions.push(Interaction::Slide(name.to_string(), dragged));
                }
            }
        }
    }

    /// Draw this panel into the current viewport, then its visible children
    /// into viewports of their own
    pub fn show(&mut self, ctx: &egui::Context, window: &WindowConfig) -> Result<()> {
        let interactions = egui::CentralPanel::default()
            .show(ctx, |ui| self.draw(ui, window))
            .inner;

        for interaction in interactions {
            self.apply(interaction)?;
        }

        self.show_children(ctx, window)
    }

    fn show_children(&mut self, ctx: &egui::Context, window: &WindowConfig) -> Result<()> {
        let mut close_requests = Vec::new();
        let parent = ctx.viewport_id();

        for attachment in &mut self.attachments {
            let viewport_id =
                Self::child_viewport_id(parent, &self.title, &attachment.panel.title);
            let child = &mut attachment.panel;
            if !child.visible || child.destroyed {
                continue;
            }

            let builder = child.viewport_builder(window);
            let result =
                ctx.show_viewport_immediate(viewport_id, builder, |ctx, class| {
                    child.show_as_child(ctx, class, window)
                });

            match result {
                Ok(true) => close_requests.push(child.title.clone()),
                Ok(false) => {}
                Err(e) => error!("Panel '{}' failed to draw: {}", child.title, e),
            }
        }

        for title in close_requests {
            if self.close_child(&title)? == CloseOutcome::Hidden {
                debug!("Panel '{}' closed from its window", title);
            }
        }
        Ok(())
    }

    /// Draw an attached panel inside its own viewport, or as a floating
    /// window when the backend embeds viewports. Returns whether the user
    /// asked to close it.
    fn show_as_child(
        &mut self,
        ctx: &egui::Context,
        class: ViewportClass,
        window: &WindowConfig,
    ) -> Result<bool> {
        if matches!(class, ViewportClass::Embedded) {
            let mut open = true;
            let interactions = egui::Window::new(self.title.clone())
                .id(egui::Id::new(("miniwidg_window", &self.title)))
                .open(&mut open)
                .show(ctx, |ui| self.draw(ui, window))
                .and_then(|response| response.inner)
                .unwrap_or_default();

            for interaction in interactions {
                self.apply(interaction)?;
            }
            self.show_children(ctx, window)?;
            return Ok(!open);
        }

        self.show(ctx, window)?;
        let close_requested = ctx.input(|i| i.viewport().close_requested());
        if close_requested && self.has_exit_callback() {
            ctx.send_viewport_cmd(ViewportCommand::CancelClose);
        }
        Ok(close_requested)
    }
}
