use std::{
    io::{IsTerminal, Write},
    time::Duration,
};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

use coffee_core::utils::prelude::{Error, ErrorEmitterIO};

pub(crate) fn print_running(text: &str) {
    print_colourful_prefix("Running", Color::Magenta, text)
}

pub(crate) fn print_finished(duration: Duration) {
    print_colourful_prefix("Finished", Color::Green, &format!("in {}", seconds(duration)))
}

pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_millis() as f32 / 1000.)
}

pub fn print_colourful_prefix(prefix: &str, color: Color, text: &str) {
    let _ = write_colourful_prefix(prefix, color, text);
}

fn write_colourful_prefix(prefix: &str, color: Color, text: &str) -> std::io::Result<()> {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();
    buffer.set_color(
        ColorSpec::new()
            .set_intense(true)
            .set_bold(true)
            .set_fg(Some(color)),
    )?;
    write!(buffer, "{prefix: >11}")?;
    buffer.set_color(&ColorSpec::new())?;
    writeln!(buffer, " {text}")?;
    buffer_writer.print(&buffer)
}

pub fn stderr_buffer_writer() -> BufferWriter {
    BufferWriter::stderr(color_choice())
}

fn colour_forced() -> bool {
    if let Ok(force) = std::env::var("FORCE_COLOR") {
        !force.is_empty()
    } else {
        false
    }
}

fn color_choice() -> ColorChoice {
    if colour_forced() {
        ColorChoice::Always
    } else if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Prints every reported error to stderr, rendered or as bare `[line N]` text.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleErrorEmitter {
    pub plain: bool
}

impl ErrorEmitterIO for ConsoleErrorEmitter {
    fn emit_error(&self, error: Error) {
        if self.plain {
            eprintln!("{}", error.plain());
            return;
        }

        let buffer_writer = stderr_buffer_writer();
        let mut buffer = buffer_writer.buffer();

        let printed = error.pretty(&mut buffer)
            .and_then(|()| buffer_writer.print(&buffer));

        if let Err(err) = printed {
            tracing::warn!(%err, "unable to render diagnostic");
            eprintln!("{}", error.plain());
        }
    }
}
