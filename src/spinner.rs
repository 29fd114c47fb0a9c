//! Activity spinner shown on stderr while a request is in flight.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static SPINNER_ACTIVE: AtomicBool = AtomicBool::new(false);
static SPINNER_HANDLE: Mutex<Option<std::thread::JoinHandle<()>>> = Mutex::new(None);

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn hide_spinner() {
    SPINNER_ACTIVE.store(false, Ordering::SeqCst);
    if let Ok(mut guard) = SPINNER_HANDLE.lock() {
        if let Some(handle) = guard.take() {
            let _ = handle.join();
        }
    }
    eprint!("\r\x1b[K");
    io::stderr().flush().ok();
}

/// Runs the spinner for the guard's lifetime. Nested guards are no-ops so an
/// outer spinner is never clobbered.
pub struct SpinnerGuard {
    did_start: bool,
}

impl SpinnerGuard {
    pub fn new(label: &str) -> Self {
        let was_inactive = SPINNER_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if was_inactive {
            let label = label.to_string();
            let handle = std::thread::spawn(move || {
                let mut i = 0;
                while SPINNER_ACTIVE.load(Ordering::SeqCst) {
                    eprint!("\r\x1b[2m{} {label}...\x1b[0m", FRAMES[i % FRAMES.len()]);
                    io::stderr().flush().ok();
                    i += 1;
                    std::thread::sleep(std::time::Duration::from_millis(80));
                }
            });
            if let Ok(mut guard) = SPINNER_HANDLE.lock() {
                *guard = Some(handle);
            }
            Self { did_start: true }
        } else {
            Self { did_start: false }
        }
    }
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        if self.did_start {
            hide_spinner();
        }
    }
}
