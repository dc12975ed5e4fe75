//! Minimal host loop driving scrim overlays.
//!
//! Opens a confirm dialog, "renders" the frame projection to stdout on
//! every redraw signal, and resolves the dialog from a background task
//! after a moment.

use std::fs::File;
use std::time::Duration;

use scrim::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

fn render(manager: &OverlayManager<&'static str>) {
    let frames = manager.frames();
    println!("-- {} overlay(s) registered --", frames.len());
    for frame in &frames {
        println!(
            "   [{}] {} open={} props={:?}",
            frame.token,
            frame.view,
            frame.open,
            frame.props.get("title"),
        );
    }
}

#[tokio::main]
async fn main() {
    let _ = WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create("dialogs.log").expect("create log file"),
    );

    let manager: OverlayManager<&'static str> = OverlayManager::new(
        ManagerConfig::new()
            .with_enter_delay(Duration::from_millis(50))
            .with_exit_delay(Duration::from_millis(300)),
    );
    let (tx, mut rx) = scrim::redraw::channel();
    manager.install_redraw(tx);

    let confirm = manager.create::<bool>(
        "confirm-dialog",
        OverlayOptions::new().with_prop("title", "Delete file?"),
    );
    let pending = confirm.open(Props::new().with("path", "/tmp/demo.txt"));

    // Stand-in for user interaction: the "rendered" side answers through
    // the frame projection, like a real host would.
    let interact = manager.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        if let Some(frame) = interact.frames().first() {
            frame.close_with(true);
        }
    });

    let mut result = pending.into_future();
    let outcome = loop {
        tokio::select! {
            outcome = &mut result => break outcome,
            signal = rx.recv() => {
                if signal.is_none() {
                    break Err(Rejected(None));
                }
                rx.drain();
                render(&manager);
            }
        }
    };
    println!("dialog outcome: {outcome:?}");

    // Drain the exit-delay window so the purge shows up too.
    while !manager.is_empty() {
        if rx.recv().await.is_none() {
            break;
        }
        rx.drain();
        render(&manager);
    }
}
