
use std::fmt;
use std::io::Write;

use crate::frontend::lexer::Location;

/// Sink for user-facing diagnostics.
///
/// Messages are written as `<file>:<line> <message>` and counted. Reporting
/// never aborts the run; the driver checks `failed()` after the full pass to
/// decide the exit status.
pub struct Reporter<W: Write> {
    sink: W,
    count: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(sink: W) -> Reporter<W> {
        Reporter {
            sink,
            count: 0,
        }
    }

    pub fn report(&mut self, location: &Location, message: fmt::Arguments) {
        // A failing diagnostics stream must not take the compilation down
        let _ = writeln!(self.sink, "{} {}", location, message);

        self.count += 1;
    }

    pub fn error_count(&self) -> usize {
        self.count
    }

    pub fn failed(&self) -> bool {
        self.count > 0
    }
}
