//! Logging setup
//!
//! Events go to stderr, to `cinegrid.log` in the app directory, and to the
//! in-app console through [`ConsoleLayer`].

use std::fmt::Write as _;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Lines kept in the console panel
pub const CONSOLE_CAPACITY: usize = 500;

/// Forwards formatted events to the UI console
pub struct ConsoleLayer {
    sender: Sender<String>,
}

impl ConsoleLayer {
    pub fn new() -> (Self, Receiver<String>) {
        let (sender, receiver) = channel();
        (Self { sender }, receiver)
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let line = format!(
            "[{}] [{}] {}{}",
            chrono::Local::now().format("%H:%M:%S"),
            level_label(*event.metadata().level()),
            visitor.message,
            visitor.fields
        );
        // Receiver is gone once the window closes
        let _ = self.sender.send(line);
    }
}

fn level_label(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
/// Keep the returned guard alive for the file writer to flush.
pub fn init(log_dir: &Path, default_filter: &str) -> (Receiver<String>, Option<WorkerGuard>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (console, receiver) = ConsoleLayer::new();

    let file_appender = tracing_appender::rolling::never(log_dir, "cinegrid.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_writer))
        .with(console)
        .try_init();

    match result {
        Ok(()) => (receiver, Some(guard)),
        Err(e) => {
            eprintln!("Logging already initialized: {}", e);
            (receiver, None)
        }
    }
}
