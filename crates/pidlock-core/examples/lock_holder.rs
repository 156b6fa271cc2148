//! Helper binary that tries a PID lock once and reports the outcome
//!
//! Usage: lock_holder <lock_path> [--wait]
//!
//! Prints `acquired <pid>`, `contended`, or `failed <errno>` on stdout.
//! With `--wait` it then keeps the handle open until stdin reaches EOF,
//! which lets a test hold the lock in a separate process for as long as
//! it needs.

use pidlock_core::lock::{PidLock, TryLock};
use std::env;
use std::io::{self, Read, Write};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        usage();
    }
    let wait = match args.get(2).map(String::as_str) {
        None => false,
        Some("--wait") => true,
        Some(_) => usage(),
    };

    let mut lock = PidLock::new(&args[1]).expect("Failed to open lock file");

    let line = match lock.try_lock() {
        TryLock::Acquired(pid) => format!("acquired {}", pid),
        TryLock::Contended => "contended".to_string(),
        TryLock::Failed(e) => format!("failed {}", e.raw_os_error().unwrap_or(-1)),
    };

    let mut out = io::stdout().lock();
    writeln!(out, "{}", line).expect("Failed to write status");
    out.flush().expect("Failed to flush status");
    drop(out);

    if wait {
        let mut sink = Vec::new();
        io::stdin()
            .read_to_end(&mut sink)
            .expect("Failed to read stdin");
    }

    // Lock released and file removed via Drop
}

fn usage() -> ! {
    eprintln!("Usage: lock_holder <lock_path> [--wait]");
    std::process::exit(1);
}
