//! Bounded formatted output
//!
//! Text is rendered in full into a scratch area before anything reaches
//! a window. Output longer than the scratch area is rejected whole.

use std::fmt::{self, Write};

use crate::error::{CursesError, Result};

/// A string that refuses to grow past `limit` characters
struct Scratch {
    text: String,
    chars: usize,
    limit: usize,
    overflowed: bool,
}

impl Write for Scratch {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let count = s.chars().count();
        if self.chars + count > self.limit {
            self.overflowed = true;
            return Err(fmt::Error);
        }
        self.chars += count;
        self.text.push_str(s);
        Ok(())
    }
}

/// Render `args` into at most `limit` characters.
///
/// Running out of room is [`CursesError::ScratchOverflow`]; an error
/// raised by a formatting impl is [`CursesError::Format`].
pub fn render_bounded(args: fmt::Arguments<'_>, limit: usize) -> Result<String> {
    let mut scratch = Scratch {
        text: String::new(),
        chars: 0,
        limit,
        overflowed: false,
    };
    if let Err(e) = scratch.write_fmt(args) {
        if scratch.overflowed {
            return Err(CursesError::ScratchOverflow { bound: limit });
        }
        return Err(CursesError::Format(e));
    }
    Ok(scratch.text)
}

/// Formatted output to the standard window.
///
/// ```no_run
/// # use cellcurses::{printw, Screen, MemoryBackend, ScriptedInput, Config};
/// # let mut scr = Screen::init(MemoryBackend::new(24, 80), ScriptedInput::new(), Config::default()).unwrap();
/// printw!(scr, "score: {}", 42).unwrap();
/// ```
#[macro_export]
macro_rules! printw {
    ($screen:expr, $($arg:tt)*) => {
        $screen.print(::std::format_args!($($arg)*))
    };
}

/// Formatted output to a window.
#[macro_export]
macro_rules! wprintw {
    ($screen:expr, $win:expr, $($arg:tt)*) => {
        $screen.wprint($win, ::std::format_args!($($arg)*))
    };
}

/// Move the standard window's cursor, then print.
#[macro_export]
macro_rules! mvprintw {
    ($screen:expr, $row:expr, $col:expr, $($arg:tt)*) => {
        $screen.mvprint($row, $col, ::std::format_args!($($arg)*))
    };
}

/// Move a window's cursor, then print.
#[macro_export]
macro_rules! mvwprintw {
    ($screen:expr, $win:expr, $row:expr, $col:expr, $($arg:tt)*) => {
        $screen.mvwprint($win, $row, $col, ::std::format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_within_bound() {
        let text = render_bounded(format_args!("{}-{}", 12, "ab"), 5).unwrap();
        assert_eq!(text, "12-ab");
    }

    #[test]
    fn test_render_overflow() {
        let err = render_bounded(format_args!("{}", "toolong"), 6).unwrap_err();
        assert!(matches!(err, CursesError::ScratchOverflow { bound: 6 }));
    }

    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn test_display_error_is_not_overflow() {
        let err = render_bounded(format_args!("{}", Broken), 100).unwrap_err();
        assert!(matches!(err, CursesError::Format(_)));
        assert_eq!(err.kind(), crate::error::ErrorKind::Usage);
    }

    #[test]
    fn test_bound_counts_chars_not_bytes() {
        let text = render_bounded(format_args!("héé"), 3).unwrap();
        assert_eq!(text, "héé");
    }
}
