//! Minimum Size Dialog
//!
//! Modal dialog for setting the minimum file size (in megabytes) a video
//! must exceed to be compressed. Zero means every matching file
//! qualifies.

use gpui::{
    div, prelude::*, px, size, Bounds, Context, FocusHandle, KeyDownEvent, Render, SharedString,
    Window, WindowBounds, WindowOptions,
};

use crate::ui::Theme;

/// The Minimum Size Dialog modal
pub struct ThresholdDialog {
    /// Current input text (digits plus an optional decimal point)
    text: String,
    /// Focus handle for keyboard input
    focus_handle: FocusHandle,
    /// Callback when Apply is pressed (sends the threshold in MB)
    on_confirm: Option<Box<dyn Fn(f64) + 'static>>,
}

impl ThresholdDialog {
    pub fn new(cx: &mut Context<Self>, current_mb: f64) -> Self {
        Self {
            text: format_threshold(current_mb),
            focus_handle: cx.focus_handle(),
            on_confirm: None,
        }
    }

    /// Open the Minimum Size Dialog window
    pub fn open<F>(cx: &mut gpui::App, current_mb: f64, on_confirm: F) -> gpui::WindowHandle<Self>
    where
        F: Fn(f64) + 'static,
    {
        let bounds = Bounds::centered(None, size(px(320.), px(180.)), cx);

        cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                window_min_size: Some(size(px(320.), px(180.))),
                titlebar: Some(gpui::TitlebarOptions {
                    title: Some("Minimum Size".into()),
                    appears_transparent: false,
                    traffic_light_position: None,
                }),
                ..Default::default()
            },
            |_window, cx| {
                cx.new(|cx| {
                    let mut dialog = ThresholdDialog::new(cx, current_mb);
                    dialog.on_confirm = Some(Box::new(on_confirm));
                    dialog
                })
            },
        )
        .unwrap()
    }

    fn parse_threshold(&self) -> Option<f64> {
        self.text.parse::<f64>().ok().filter(|mb| *mb >= 0.0)
    }

    fn is_valid(&self) -> bool {
        self.parse_threshold().is_some()
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

        // Digits plus a single decimal point
        if let Some(ref key_char) = keystroke.key_char {
            for c in key_char.chars() {
                let is_dot = c == '.' && !self.text.contains('.');
                if !c.is_ascii_digit() && !is_dot {
                    continue;
                }

                if self.text.len() >= 8 {
                    continue;
                }

                self.text.push(c);
            }
            cx.notify();
            return true;
        }

        false
    }

    fn confirm(&mut self, window: &mut Window, _cx: &mut Context<Self>) {
        if let Some(mb) = self.parse_threshold() {
            if let Some(ref on_confirm) = self.on_confirm {
                on_confirm(mb);
            }
        }
        window.remove_window();
    }

    fn cancel(&mut self, window: &mut Window, _cx: &mut Context<Self>) {
        window.remove_window();
    }
}

/// Render a threshold without trailing zeros ("50", "12.5")
fn format_threshold(mb: f64) -> String {
    if mb == mb.trunc() {
        format!("{}", mb as u64)
    } else {
        format!("{}", mb)
    }
}

impl Render for ThresholdDialog {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = Theme::from_appearance(window.appearance());
        let text_display = self.text.clone();
        let is_valid = self.is_valid();

        if !self.focus_handle.is_focused(window) {
            self.focus_handle.focus(window);
        }

        div()
            .key_context("ThresholdDialog")
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
                            .child("Minimum size:"),
                    )
                    .child(
                        div()
                            .id(SharedString::from("threshold-input"))
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
                    .child(div().text_sm().text_color(theme.text).child("MB")),
            )
            // Hint
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child("Only files larger than this are compressed."),
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
