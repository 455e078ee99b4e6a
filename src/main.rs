//! Bulk Video Compressor - GPUI Application
//!
//! A desktop app that batch-compresses the videos in a folder to a
//! target bitrate using an ffmpeg subprocess.

mod actions;
mod compression;
mod core;
mod logging;
mod test_fixtures;
mod ui;

use gpui::{
    prelude::*, px, size, App, Application, Bounds, KeyBinding, Menu, MenuItem, WindowBounds,
    WindowOptions,
};

use actions::{About, OpenOutputDir, Quit};
use crate::core::AppSettings;
use ui::components::{AboutBox, CompressorPanel};

/// Build the application menus
fn build_menus() -> Vec<Menu> {
    vec![
        Menu {
            name: "Bulk Video Compressor".into(),
            items: vec![
                MenuItem::action("About Bulk Video Compressor", About),
                MenuItem::separator(),
                MenuItem::action("Quit", Quit),
            ],
        },
        Menu {
            name: "Options".into(),
            items: vec![MenuItem::action("Open Output Folder", OpenOutputDir)],
        },
    ]
}

fn main() {
    logging::init_logging();

    Application::new().run(|cx: &mut App| {
        // Last-used configuration (or defaults on first launch)
        cx.set_global(AppSettings::load());

        // Register action handlers
        cx.on_action(|_: &Quit, cx| cx.quit());
        cx.on_action(|_: &About, cx| {
            AboutBox::open(cx);
        });
        cx.on_action(|_: &OpenOutputDir, cx| {
            let output_dir = cx.global::<AppSettings>().output_dir.clone();
            match output_dir {
                Some(dir) if dir.exists() => {
                    let _ = std::process::Command::new("open").arg(&dir).spawn();
                }
                _ => log::info!("No output folder to open yet"),
            }
        });

        // Bind keyboard shortcuts
        cx.bind_keys([KeyBinding::new("cmd-q", Quit, None)]);

        cx.set_menus(build_menus());

        // Open the main window
        let bounds = Bounds::centered(None, size(px(700.), px(420.)), cx);

        let _window = cx
            .open_window(
                WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(bounds)),
                    window_min_size: Some(size(px(540.), px(360.))),
                    titlebar: Some(gpui::TitlebarOptions {
                        title: Some("Bulk Video Compressor".into()),
                        appears_transparent: false,
                        traffic_light_position: None,
                    }),
                    ..Default::default()
                },
                |_window, cx| cx.new(CompressorPanel::new),
            )
            .unwrap();

        // Quit the app when the main window is closed
        // This is appropriate for a single-window utility app
        cx.on_window_closed(|cx| {
            cx.quit();
        })
        .detach();

        cx.activate(true);
    });
}
