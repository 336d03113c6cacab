//! Animated terminal spinner implementing `ProgressIndicator`.
//!
//! The spinner redraws itself in place on a background render thread, so it
//! keeps moving while the foreground thread is blocked inside a bridge call.
//! Start/finish pairs may nest; the line is erased when the outermost
//! operation finishes.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use pontoon_core::ProgressIndicator;

use crate::style;

/// Frames drawn by the render thread, in order.
const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Delay between redraws.
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// State shared with the render thread.
struct SpinnerState {
    /// Nesting depth of start/finish pairs.
    depth: AtomicUsize,
    /// Whether the render thread should keep drawing.
    running: AtomicBool,
    /// Message shown next to the spinner glyph.
    message: Mutex<String>,
    /// Where frames are drawn. Stderr by default so stdout stays clean.
    writer: Mutex<Box<dyn Write + Send>>,
}

/// Terminal spinner with a background render thread.
pub struct TermSpinner {
    state: Arc<SpinnerState>,
    render: Mutex<Option<thread::JoinHandle<()>>>,
}

impl TermSpinner {
    /// Spinner drawing to stderr.
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }

    /// Spinner drawing to the given writer.
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            state: Arc::new(SpinnerState {
                depth: AtomicUsize::new(0),
                running: AtomicBool::new(false),
                message: Mutex::new(String::new()),
                writer: Mutex::new(writer),
            }),
            render: Mutex::new(None),
        }
    }

    /// Whether the spinner is currently drawing.
    pub fn is_active(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    fn stop_render_thread(&self) {
        self.state.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.render.lock().unwrap().take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                tracing::warn!("Spinner render thread panicked");
            }
        }
    }
}

impl Default for TermSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressIndicator for TermSpinner {
    fn on_start(&self, message: &str) {
        *self.state.message.lock().unwrap() = message.to_string();

        if self.state.depth.fetch_add(1, Ordering::SeqCst) == 0 {
            self.state.running.store(true, Ordering::SeqCst);
            let state = Arc::clone(&self.state);
            let handle = thread::Builder::new()
                .name("pontoon-spinner".to_string())
                .spawn(move || render_loop(state));
            match handle {
                Ok(handle) => *self.render.lock().unwrap() = Some(handle),
                Err(e) => tracing::warn!("Failed to start spinner render thread: {}", e),
            }
        }
    }

    fn on_finish(&self) {
        // Ignore finishes with no matching start rather than underflowing.
        let balanced = self
            .state
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| d.checked_sub(1));

        if balanced == Ok(1) {
            self.stop_render_thread();
        }
    }
}

impl Drop for TermSpinner {
    fn drop(&mut self) {
        // An unbalanced start must not leave the render thread spinning.
        self.stop_render_thread();
    }
}

fn render_loop(state: Arc<SpinnerState>) {
    let mut frame = 0;
    while state.running.load(Ordering::SeqCst) {
        {
            let message = state.message.lock().unwrap();
            let mut writer = state.writer.lock().unwrap();
            let _ = write!(
                writer,
                "{}{}{}{} {}",
                style::CLEAR_LINE,
                style::CYAN,
                FRAMES[frame % FRAMES.len()],
                style::RESET,
                message
            );
            let _ = writer.flush();
        }
        frame += 1;
        // Parked rather than slept so stopping does not wait out a frame.
        thread::park_timeout(FRAME_INTERVAL);
    }

    let mut writer = state.writer.lock().unwrap();
    let _ = write!(writer, "{}", style::CLEAR_LINE);
    let _ = writer.flush();
}
