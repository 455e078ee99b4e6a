//! CompressorPanel component - The main application view
//!
//! Collects the run configuration (folders via drag-and-drop, bitrate and
//! minimum size via dialogs), starts the batch controller, and renders
//! progress coming back over the event channel. The batch thread never
//! touches this view; everything arrives through channels drained by a
//! polling loop on the UI side.

use gpui::{
    div, prelude::*, px, AsyncApp, Context, ExternalPaths, IntoElement, Render, SharedString,
    Timer, WeakEntity, Window,
};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use chrono::Local;

use crate::compression::{
    locate_ffmpeg, verify_ffmpeg, BatchController, BatchEvent, FileFailure,
};
use crate::core::{AppSettings, BitrateUnit};
use crate::ui::Theme;

use super::{BitrateDialog, ThresholdDialog};

/// Most recent failures shown under the progress bar
const VISIBLE_FAILURES: usize = 4;

/// The main compressor view
pub struct CompressorPanel {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    bitrate_value: u32,
    bitrate_unit: BitrateUnit,
    min_size_mb: f64,
    controller: BatchController,
    /// Set when the startup `ffmpeg -version` probe failed
    ffmpeg_warning: Option<String>,
    /// Events of the active run; cleared once `Finished` is drained
    events_rx: Option<mpsc::Receiver<BatchEvent>>,
    /// Result channel of an open bitrate dialog
    pending_bitrate_rx: Option<mpsc::Receiver<(u32, BitrateUnit)>>,
    /// Result channel of an open minimum-size dialog
    pending_threshold_rx: Option<mpsc::Receiver<f64>>,
    progress: (usize, usize),
    current_file: Option<String>,
    failures: Vec<FileFailure>,
    last_summary: Option<String>,
    fatal_error: Option<String>,
}

impl CompressorPanel {
    pub fn new(cx: &mut Context<Self>) -> Self {
        let settings = cx.global::<AppSettings>().clone();

        let ffmpeg_path = locate_ffmpeg();
        let ffmpeg_warning = verify_ffmpeg(&ffmpeg_path).err();
        if let Some(ref warning) = ffmpeg_warning {
            log::warn!("{}", warning);
        }

        let panel = Self {
            input_dir: settings.input_dir,
            output_dir: settings.output_dir,
            bitrate_value: settings.bitrate_value,
            bitrate_unit: settings.bitrate_unit,
            min_size_mb: settings.min_size_mb,
            controller: BatchController::new(ffmpeg_path),
            ffmpeg_warning,
            events_rx: None,
            pending_bitrate_rx: None,
            pending_threshold_rx: None,
            progress: (0, 0),
            current_file: None,
            failures: Vec::new(),
            last_summary: None,
            fatal_error: None,
        };

        Self::start_polling(cx);
        panel
    }

    /// Whether a run is active from the UI's point of view
    fn is_running(&self) -> bool {
        self.events_rx.is_some()
    }

    /// Start a polling loop that drains the dialog and batch channels
    ///
    /// Runs for the lifetime of the view; channel drains happen here, on
    /// the control path, never on the batch thread.
    fn start_polling(cx: &mut Context<Self>) {
        cx.spawn(|this: WeakEntity<Self>, cx: &mut AsyncApp| {
            let mut async_cx = cx.clone();
            async move {
                loop {
                    let cx_for_after_await = async_cx.clone();

                    Timer::after(Duration::from_millis(100)).await;

                    let alive = this
                        .update(&mut async_cx, |this, cx| {
                            if this.poll_updates() {
                                cx.notify();
                            }
                        })
                        .is_ok();

                    if !alive {
                        break;
                    }

                    let _ = cx_for_after_await.refresh();
                    async_cx = cx_for_after_await;
                }
            }
        })
        .detach();
    }

    /// Drain all pending channel messages; returns true if anything changed
    fn poll_updates(&mut self) -> bool {
        let mut updated = false;

        if let Some(rx) = self.pending_bitrate_rx.as_ref() {
            match rx.try_recv() {
                Ok((value, unit)) => {
                    log::info!("Target bitrate set to {}{}", value, unit);
                    self.bitrate_value = value;
                    self.bitrate_unit = unit;
                    self.pending_bitrate_rx = None;
                    updated = true;
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    // Dialog closed without applying
                    self.pending_bitrate_rx = None;
                }
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }

        if let Some(rx) = self.pending_threshold_rx.as_ref() {
            match rx.try_recv() {
                Ok(mb) => {
                    log::info!("Minimum size set to {} MB", mb);
                    self.min_size_mb = mb;
                    self.pending_threshold_rx = None;
                    updated = true;
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.pending_threshold_rx = None;
                }
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }

        if self.drain_batch_events() {
            updated = true;
        }

        updated
    }

    /// Apply queued batch events to the view state
    fn drain_batch_events(&mut self) -> bool {
        let Some(rx) = self.events_rx.as_ref() else {
            return false;
        };

        let mut had_events = false;
        let mut finished = false;

        while let Ok(event) = rx.try_recv() {
            had_events = true;
            match event {
                BatchEvent::Started { total } => {
                    self.progress = (0, total);
                }
                BatchEvent::FileStarted { filename, .. } => {
                    self.current_file = Some(filename);
                }
                BatchEvent::FileFailed { filename, message } => {
                    self.failures.push(FileFailure { filename, message });
                }
                BatchEvent::Progress { completed, total } => {
                    self.progress = (completed, total);
                }
                BatchEvent::Finished(report) => {
                    self.last_summary = Some(report.summary());
                    finished = true;
                }
            }
        }

        if finished {
            self.events_rx = None;
            self.current_file = None;
        }

        had_events
    }

    fn show_bitrate_dialog(&mut self, cx: &mut Context<Self>) {
        let (tx, rx) = mpsc::channel();
        self.pending_bitrate_rx = Some(rx);

        BitrateDialog::open(
            cx,
            self.bitrate_value,
            self.bitrate_unit,
            move |value, unit| {
                let _ = tx.send((value, unit));
            },
        );
    }

    fn show_threshold_dialog(&mut self, cx: &mut Context<Self>) {
        let (tx, rx) = mpsc::channel();
        self.pending_threshold_rx = Some(rx);

        ThresholdDialog::open(cx, self.min_size_mb, move |mb| {
            let _ = tx.send(mb);
        });
    }

    /// Build the run configuration and hand it to the controller
    fn start_compression(&mut self, cx: &mut Context<Self>) {
        let (Some(input_dir), Some(output_dir)) = (self.input_dir.clone(), self.output_dir.clone())
        else {
            self.fatal_error = Some("Select an input and an output folder first".to_string());
            cx.notify();
            return;
        };

        let config = crate::core::RunConfiguration {
            input_dir,
            output_dir,
            bitrate_value: self.bitrate_value,
            bitrate_unit: self.bitrate_unit,
            min_size_mb: self.min_size_mb,
        };

        match self.controller.start(config) {
            Ok(rx) => {
                self.events_rx = Some(rx);
                self.progress = (0, 0);
                self.current_file = None;
                self.failures.clear();
                self.last_summary = None;
                self.fatal_error = None;
                self.persist_settings(cx);
            }
            Err(e) => {
                log::error!("Could not start compression: {}", e);
                self.fatal_error = Some(e.to_string());
            }
        }
        cx.notify();
    }

    fn stop_compression(&mut self, cx: &mut Context<Self>) {
        log::info!("Stop requested; finishing the current file first");
        self.controller.request_cancel();
        cx.notify();
    }

    /// Remember the last-used configuration for the next launch
    fn persist_settings(&self, cx: &mut Context<Self>) {
        let settings = cx.global_mut::<AppSettings>();
        settings.input_dir = self.input_dir.clone();
        settings.output_dir = self.output_dir.clone();
        settings.bitrate_value = self.bitrate_value;
        settings.bitrate_unit = self.bitrate_unit;
        settings.min_size_mb = self.min_size_mb;
        settings.last_run_at = Some(Local::now());

        if let Err(e) = settings.save() {
            log::warn!("Failed to save settings: {}", e);
        }
    }

    fn folder_label(dir: &Option<PathBuf>) -> String {
        match dir {
            Some(path) => path.display().to_string(),
            None => "Drop a folder here".to_string(),
        }
    }

    fn status_line(&self) -> (String, bool) {
        if let Some(ref error) = self.fatal_error {
            return (error.clone(), true);
        }
        if self.is_running() {
            let (completed, total) = self.progress;
            let line = match self.current_file {
                Some(ref name) => format!("Compressing {} ({} of {})", name, completed, total),
                None => format!("Compressing... ({} of {})", completed, total),
            };
            return (line, false);
        }
        if let Some(ref summary) = self.last_summary {
            return (summary.clone(), false);
        }
        ("Ready".to_string(), false)
    }
}

impl Render for CompressorPanel {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = Theme::from_appearance(window.appearance());
        let running = self.is_running();
        let (completed, total) = self.progress;
        let fraction = if total > 0 {
            completed as f32 / total as f32
        } else {
            0.0
        };
        let (status_text, status_is_error) = self.status_line();

        let on_input_drop = cx.listener(|this, paths: &ExternalPaths, _window, cx| {
            if let Some(dir) = paths.paths().iter().find(|p| p.is_dir()) {
                this.input_dir = Some(dir.clone());
                this.fatal_error = None;
                cx.notify();
            }
        });
        let on_output_drop = cx.listener(|this, paths: &ExternalPaths, _window, cx| {
            if let Some(dir) = paths.paths().iter().find(|p| p.is_dir()) {
                this.output_dir = Some(dir.clone());
                this.fatal_error = None;
                cx.notify();
            }
        });

        div()
            .size_full()
            .flex()
            .flex_col()
            .bg(theme.bg)
            .p_4()
            .gap_3()
            // Input folder row (drop target)
            .child(
                div()
                    .id(SharedString::from("input-folder-row"))
                    .flex()
                    .items_center()
                    .gap_2()
                    .p_3()
                    .bg(theme.bg_card)
                    .border_1()
                    .border_color(theme.border)
                    .rounded_md()
                    .on_drop(on_input_drop)
                    .drag_over::<ExternalPaths>(move |style, _, _, _| {
                        style.border_color(theme.accent)
                    })
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.text_muted)
                            .child("Input folder:"),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(if self.input_dir.is_some() {
                                theme.text
                            } else {
                                theme.text_muted
                            })
                            .child(Self::folder_label(&self.input_dir)),
                    ),
            )
            // Output folder row (drop target)
            .child(
                div()
                    .id(SharedString::from("output-folder-row"))
                    .flex()
                    .items_center()
                    .gap_2()
                    .p_3()
                    .bg(theme.bg_card)
                    .border_1()
                    .border_color(theme.border)
                    .rounded_md()
                    .on_drop(on_output_drop)
                    .drag_over::<ExternalPaths>(move |style, _, _, _| {
                        style.border_color(theme.accent)
                    })
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.text_muted)
                            .child("Output folder:"),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(if self.output_dir.is_some() {
                                theme.text
                            } else {
                                theme.text_muted
                            })
                            .child(Self::folder_label(&self.output_dir)),
                    ),
            )
            // Settings row: bitrate and minimum size
            .child(
                div()
                    .flex()
                    .gap_3()
                    .child(
                        div()
                            .id(SharedString::from("bitrate-row"))
                            .flex_1()
                            .p_3()
                            .bg(theme.bg_card)
                            .border_1()
                            .border_color(theme.border)
                            .rounded_md()
                            .cursor_pointer()
                            .hover(|s| s.bg(theme.bg_card_hover))
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.show_bitrate_dialog(cx);
                            }))
                            .child(
                                div()
                                    .text_sm()
                                    .text_color(theme.text)
                                    .child(format!(
                                        "Target bitrate: {}{}",
                                        self.bitrate_value, self.bitrate_unit
                                    )),
                            ),
                    )
                    .child(
                        div()
                            .id(SharedString::from("threshold-row"))
                            .flex_1()
                            .p_3()
                            .bg(theme.bg_card)
                            .border_1()
                            .border_color(theme.border)
                            .rounded_md()
                            .cursor_pointer()
                            .hover(|s| s.bg(theme.bg_card_hover))
                            .on_click(cx.listener(|this, _, _window, cx| {
                                this.show_threshold_dialog(cx);
                            }))
                            .child(
                                div()
                                    .text_sm()
                                    .text_color(theme.text)
                                    .child(format!("Minimum size: {} MB", self.min_size_mb)),
                            ),
                    ),
            )
            // Progress bar
            .child(
                div()
                    .w_full()
                    .h(px(8.))
                    .rounded_md()
                    .overflow_hidden()
                    .bg(theme.progress_track)
                    .child(
                        div()
                            .w(gpui::relative(fraction))
                            .h_full()
                            .bg(theme.progress_fill),
                    ),
            )
            // Status line
            .child(
                div()
                    .text_sm()
                    .text_color(if status_is_error {
                        theme.danger
                    } else {
                        theme.text_muted
                    })
                    .child(status_text),
            )
            // ffmpeg availability warning
            .when_some(self.ffmpeg_warning.clone(), |el, warning| {
                el.child(div().text_xs().text_color(theme.danger).child(warning))
            })
            // Recent per-file failures
            .when(!self.failures.is_empty(), |el| {
                let shown = self
                    .failures
                    .iter()
                    .rev()
                    .take(VISIBLE_FAILURES)
                    .cloned()
                    .collect::<Vec<_>>();
                let hidden = self.failures.len().saturating_sub(shown.len());

                el.child(
                    div()
                        .flex()
                        .flex_col()
                        .gap_1()
                        .children(shown.into_iter().map(|failure| {
                            div()
                                .text_xs()
                                .text_color(theme.danger)
                                .child(format!("{}: {}", failure.filename, failure.message))
                        }))
                        .when(hidden > 0, |el| {
                            el.child(
                                div()
                                    .text_xs()
                                    .text_color(theme.text_muted)
                                    .child(format!("(+{} more, see the log)", hidden)),
                            )
                        }),
                )
            })
            // Spacer pushes the buttons to the bottom
            .child(div().flex_1())
            // Control buttons
            .child(
                div()
                    .flex()
                    .justify_center()
                    .gap_3()
                    .child(
                        div()
                            .id(SharedString::from("start-button"))
                            .px_4()
                            .py_2()
                            .bg(if running { theme.bg_card } else { theme.success })
                            .text_color(if running {
                                theme.text_muted
                            } else {
                                gpui::white()
                            })
                            .text_sm()
                            .rounded_md()
                            .when(!running, |el| {
                                el.cursor_pointer().hover(|s| s.bg(theme.success_hover))
                            })
                            .on_click(cx.listener(|this, _, _window, cx| {
                                if !this.is_running() {
                                    this.start_compression(cx);
                                }
                            }))
                            .child("Start Compressing"),
                    )
                    .child(
                        div()
                            .id(SharedString::from("stop-button"))
                            .px_4()
                            .py_2()
                            .bg(if running { theme.danger } else { theme.bg_card })
                            .text_color(if running {
                                gpui::white()
                            } else {
                                theme.text_muted
                            })
                            .text_sm()
                            .rounded_md()
                            .when(running, |el| {
                                el.cursor_pointer().hover(|s| s.bg(theme.danger_hover))
                            })
                            .on_click(cx.listener(|this, _, _window, cx| {
                                if this.is_running() {
                                    this.stop_compression(cx);
                                }
                            }))
                            .child("Stop"),
                    ),
            )
    }
}
