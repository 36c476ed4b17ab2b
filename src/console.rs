//! Diagnostic console used by the [`kprint!`] and [`kprintln!`] macros.
//!
//! The environment never owns an output device. Board code installs a sink (usually a UART
//! driver) with [`set_console`]; until then all output is discarded.

use core::fmt::{self, Write};

use spin::Mutex;

/// The installed console sink, if any.
static CONSOLE: Mutex<Option<&'static mut (dyn Write + Send)>> = Mutex::new(None);

/// Installs `sink` as the console, returning the previously installed one.
pub fn set_console(
    sink: &'static mut (dyn Write + Send),
) -> Option<&'static mut (dyn Write + Send)> {
    CONSOLE.lock().replace(sink)
}

/// Removes the installed console, returning it.
pub fn take_console() -> Option<&'static mut (dyn Write + Send)> {
    CONSOLE.lock().take()
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    // An interrupt handler may preempt a context that is halfway through a print, so
    // spinning here could deadlock. Drop the message instead.
    if let Some(mut console) = CONSOLE.try_lock() {
        if let Some(sink) = console.as_mut() {
            sink.write_fmt(args).ok();
        }
    }
}
