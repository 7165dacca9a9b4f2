//! Scoped capture of standard output and standard error.
//!
//! A [`CaptureGuard`] swaps in two fresh in-memory buffers for the current
//! thread and restores whatever was active before when it is finished or
//! dropped. Text written through [`write_str`] (and the `sandbox_print!`
//! family of macros) lands in the innermost active capture, or on the real
//! process streams when nothing is capturing.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::marker::PhantomData;

thread_local! {
    static CAPTURES: RefCell<Vec<CapturedOutput>> = const { RefCell::new(Vec::new()) };
}

/// Which of the two standard streams a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Everything written to the two streams while a capture was active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    fn push(&mut self, stream: Stream, text: &str) {
        match stream {
            Stream::Stdout => self.stdout.push_str(text),
            Stream::Stderr => self.stderr.push_str(text),
        }
    }
}

/// Writes text to the active capture, falling back to the real stream.
pub fn write_str(stream: Stream, text: &str) {
    let captured = CAPTURES.with(|stack| match stack.borrow_mut().last_mut() {
        Some(top) => {
            top.push(stream, text);
            true
        }
        None => false,
    });
    if captured {
        return;
    }
    // Nothing is capturing; a failed write to a closed stream is dropped.
    let _ = match stream {
        Stream::Stdout => std::io::stdout().write_all(text.as_bytes()),
        Stream::Stderr => std::io::stderr().write_all(text.as_bytes()),
    };
}

pub fn write_fmt(stream: Stream, args: fmt::Arguments<'_>) {
    match args.as_str() {
        Some(text) => write_str(stream, text),
        None => write_str(stream, &args.to_string()),
    }
}

/// True while at least one capture is active on this thread.
pub fn is_capturing() -> bool {
    CAPTURES.with(|stack| !stack.borrow().is_empty())
}

/// `fmt::Write` adapter over one of the streams.
#[derive(Debug, Clone, Copy)]
pub struct StreamWriter {
    stream: Stream,
}

impl StreamWriter {
    pub fn new(stream: Stream) -> Self {
        Self { stream }
    }
}

impl fmt::Write for StreamWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write_str(self.stream, s);
        Ok(())
    }
}

/// Redirects both streams into memory until finished or dropped.
pub struct CaptureGuard {
    depth: usize,
    finished: bool,
    _not_send: PhantomData<*const ()>,
}

impl CaptureGuard {
    pub fn begin() -> Self {
        let depth = CAPTURES.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(CapturedOutput::default());
            stack.len()
        });
        Self {
            depth,
            finished: false,
            _not_send: PhantomData,
        }
    }

    /// Ends the capture and hands back what was written.
    pub fn finish(mut self) -> CapturedOutput {
        self.finished = true;
        CAPTURES.with(|stack| {
            let mut stack = stack.borrow_mut();
            let output = stack.get(self.depth - 1).cloned().unwrap_or_default();
            stack.truncate(self.depth - 1);
            output
        })
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        CAPTURES.with(|stack| stack.borrow_mut().truncate(self.depth - 1));
    }
}

/// Prints to the sandbox's captured stdout.
#[macro_export]
macro_rules! sandbox_print {
    ($($arg:tt)*) => {
        $crate::sandbox::capture::write_fmt(
            $crate::sandbox::capture::Stream::Stdout,
            format_args!($($arg)*),
        )
    };
}

/// Prints a line to the sandbox's captured stdout.
#[macro_export]
macro_rules! sandbox_println {
    () => {
        $crate::sandbox::capture::write_str($crate::sandbox::capture::Stream::Stdout, "\n")
    };
    ($($arg:tt)*) => {
        $crate::sandbox::capture::write_fmt(
            $crate::sandbox::capture::Stream::Stdout,
            format_args!("{}\n", format_args!($($arg)*)),
        )
    };
}

/// Prints to the sandbox's captured stderr.
#[macro_export]
macro_rules! sandbox_eprint {
    ($($arg:tt)*) => {
        $crate::sandbox::capture::write_fmt(
            $crate::sandbox::capture::Stream::Stderr,
            format_args!($($arg)*),
        )
    };
}

/// Prints a line to the sandbox's captured stderr.
#[macro_export]
macro_rules! sandbox_eprintln {
    () => {
        $crate::sandbox::capture::write_str($crate::sandbox::capture::Stream::Stderr, "\n")
    };
    ($($arg:tt)*) => {
        $crate::sandbox::capture::write_fmt(
            $crate::sandbox::capture::Stream::Stderr,
            format_args!("{}\n", format_args!($($arg)*)),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_collects_both_streams_separately() {
        let guard = CaptureGuard::begin();
        write_str(Stream::Stdout, "out");
        crate::sandbox_eprintln!("err {}", 1);
        let output = guard.finish();
        assert_eq!(output.stdout, "out");
        assert_eq!(output.stderr, "err 1\n");
        assert!(!is_capturing());
    }

    #[test]
    fn nested_captures_restore_the_outer_buffer() {
        let outer = CaptureGuard::begin();
        crate::sandbox_print!("a");
        {
            let inner = CaptureGuard::begin();
            crate::sandbox_print!("b");
            assert_eq!(inner.finish().stdout, "b");
        }
        crate::sandbox_print!("c");
        assert_eq!(outer.finish().stdout, "ac");
    }

    #[test]
    fn dropped_guard_releases_the_capture() {
        {
            let _guard = CaptureGuard::begin();
            assert!(is_capturing());
        }
        assert!(!is_capturing());
    }
}
