//! Target Bitrate Dialog
//!
//! Modal dialog for setting the target bitrate: a numeric value plus a
//! K/M unit toggle (kilobits or megabits per second).

use gpui::{
    div, prelude::*, px, size, Bounds, Context, FocusHandle, KeyDownEvent, Render, SharedString,
    Window, WindowBounds, WindowOptions,
};

use crate::core::{BitrateSpec, BitrateUnit};
use crate::ui::Theme;

/// The Target Bitrate Dialog modal
pub struct BitrateDialog {
    /// Current input text (numeric string)
    text: String,
    /// Currently selected unit
    unit: BitrateUnit,
    /// Focus handle for keyboard input
    focus_handle: FocusHandle,
    /// Callback when Apply is pressed (sends value + unit)
    on_confirm: Option<Box<dyn Fn(u32, BitrateUnit) + 'static>>,
}

impl BitrateDialog {
    pub fn new(cx: &mut Context<Self>, current_value: u32, current_unit: BitrateUnit) -> Self {
        Self {
            text: current_value.to_string(),
            unit: current_unit,
            focus_handle: cx.focus_handle(),
            on_confirm: None,
        }
    }

    /// Open the Target Bitrate Dialog window
    ///
    /// The callback will be called with the new value and unit when Apply
    /// is pressed. Returns the window handle.
    pub fn open<F>(
        cx: &mut gpui::App,
        current_value: u32,
        current_unit: BitrateUnit,
        on_confirm: F,
    ) -> gpui::WindowHandle<Self>
    where
        F: Fn(u32, BitrateUnit) + 'static,
    {
        let bounds = Bounds::centered(None, size(px(320.), px(200.)), cx);

        cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                window_min_size: Some(size(px(320.), px(200.))),
                titlebar: Some(gpui::TitlebarOptions {
                    title: Some("Target Bitrate".into()),
                    appears_transparent: false,
                    traffic_light_position: None,
                }),
                ..Default::default()
            },
            |_window, cx| {
                cx.new(|cx| {
                    let mut dialog = BitrateDialog::new(cx, current_value, current_unit);
                    dialog.on_confirm = Some(Box::new(on_confirm));
                    dialog
                })
            },
        )
        .unwrap()
    }

    fn parse_value(&self) -> Option<u32> {
        self.text.parse::<u32>().ok()
    }

    /// Valid when value + unit form a well-formed spec (positive integer)
    fn is_valid(&self) -> bool {
        match self.parse_value() {
            Some(value) => BitrateSpec::new(value, self.unit).is_ok(),
            None => false,
        }
    }

    /// Handle a key press - returns true if the event was handled
    fn handle_key(
        &mut self,
        event: &KeyDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> bool {
        let keystroke = &event.keystroke;

        if keystroke.key == "backspace" {
            if !self.text.is_empty() {
                self.text.pop();
            }
            cx.notify();
            return true;
        }

        if keystroke.key == "escape" {
            self.cancel(window, cx);
            return true;
        }

        if keystroke.key == "enter" {
            if self.is_valid() {
                self.confirm(window, cx);
            }
            return true;
        }

        // Digit input only (mirrors the numeric filter of the entry field)
        if let Some(ref key_char) = keystroke.key_char {
            for c in key_char.chars() {
                if !c.is_ascii_digit() {
                    continue;
                }

                // Limit to reasonable length
                if self.text.len() >= 6 {
                    continue;
                }

                self.text.push(c);
            }
            cx.notify();
            return true;
        }

        false
    }

    fn toggle_unit(&mut self, cx: &mut Context<Self>) {
        self.unit = self.unit.toggled();
        cx.notify();
    }

    fn confirm(&mut self, window: &mut Window, _cx: &mut Context<Self>) {
        if let Some(value) = self.parse_value() {
            if BitrateSpec::new(value, self.unit).is_ok() {
                if let Some(ref on_confirm) = self.on_confirm {
                    on_confirm(value, self.unit);
                }
            }
        }
        window.remove_window();
    }

    fn cancel(&mut self, window: &mut Window, _cx: &mut Context<Self>) {
        window.remove_window();
    }
}

impl Render for BitrateDialog {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = Theme::from_appearance(window.appearance());
        let text_display = self.text.clone();
        let is_valid = self.is_valid();
        let unit_label = self.unit.as_str();

        // Focus the dialog on render
        if !self.focus_handle.is_focused(window) {
            self.focus_handle.focus(window);
        }

        div()
            .key_context("BitrateDialog")
            .track_focus(&self.focus_handle)
            .on_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                this.handle_key(event, window, cx);
            }))
            .size_full()
            .flex()
            .flex_col()
            .bg(theme.bg)
            .p_4()
            .gap_3()
            // Input row
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.text)
                            .child("Target bitrate:"),
                    )
                    .child(
                        div()
                            .id(SharedString::from("bitrate-input"))
                            .w(px(90.))
                            .h(px(36.))
                            .px_3()
                            .flex()
                            .items_center()
                            .bg(theme.bg_card)
                            .border_1()
                            .border_color(if is_valid || self.text.is_empty() {
                                theme.accent
                            } else {
                                theme.danger
                            })
                            .rounded_md()
                            .child(
                                div()
                                    .text_base()
                                    .text_color(theme.text)
                                    .child(if text_display.is_empty() {
                                        " ".to_string()
                                    } else {
                                        text_display
                                    }),
                            )
                            // Cursor
                            .child(div().w(px(2.)).h(px(20.)).bg(theme.accent).ml_px()),
                    )
                    // Unit toggle (K = kilobits/s, M = megabits/s)
                    .child(
                        div()
                            .id(SharedString::from("unit-toggle"))
                            .px_3()
                            .py_1()
                            .bg(theme.bg_card)
                            .text_color(theme.text)
                            .text_sm()
                            .rounded_md()
                            .border_1()
                            .border_color(theme.accent)
                            .cursor_pointer()
                            .hover(|s| s.bg(theme.bg_card_hover))
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.toggle_unit(cx);
                            }))
                            .child(unit_label),
                    ),
            )
            // Unit hint
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child("K = kilobits/s, M = megabits/s. Click the unit to switch."),
            )
            // Buttons
            .child(
                div()
                    .flex()
                    .justify_end()
                    .gap_2()
                    .mt_2()
                    .child(
                        div()
                            .id(SharedString::from("cancel-btn"))
                            .px_4()
                            .py_2()
                            .bg(theme.bg_card)
                            .text_color(theme.text)
                            .text_sm()
                            .rounded_md()
                            .border_1()
                            .border_color(theme.text_muted)
                            .cursor_pointer()
                            .hover(|s| s.bg(theme.bg_card_hover))
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.cancel(window, cx);
                            }))
                            .child("Cancel"),
                    )
                    .child(
                        div()
                            .id(SharedString::from("apply-btn"))
                            .px_4()
                            .py_2()
                            .bg(if is_valid { theme.accent } else { theme.bg_card })
                            .text_color(if is_valid {
                                gpui::white()
                            } else {
                                theme.text_muted
                            })
                            .text_sm()
                            .rounded_md()
                            .when(is_valid, |el| el.cursor_pointer())
                            .when(is_valid, |el| el.hover(|s| s.bg(theme.success)))
                            .on_click(cx.listener(|this, _, window, cx| {
                                if this.is_valid() {
                                    this.confirm(window, cx);
                                }
                            }))
                            .child("Apply"),
                    ),
            )
    }
}
