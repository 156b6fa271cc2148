//! Stdout helpers shared by commands

use std::io::{self, Write};

/// Print a JSON document
pub fn print_json(s: &str) -> io::Result<()> {
    write_line(s)
}

/// Print one line of human-readable output
pub fn print_text(s: &str) -> io::Result<()> {
    write_line(s)
}

// Flushed per line so callers waiting on the output (tests, supervisors)
// see status lines while the lock is still held.
fn write_line(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")?;
    out.flush()
}
