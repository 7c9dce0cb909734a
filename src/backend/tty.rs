//! Terminal keyboard input (unix)
//!
//! Reads stdin through termios. `LINE_INPUT` maps to `ICANON` and
//! `PROCESSED_INPUT` to `ISIG`. The terminal's own echo stays off at all
//! times; echoing typed characters is the screen's job.

use std::collections::VecDeque;
use std::io;
use std::os::unix::io::AsRawFd;

use super::{InputMode, InputSource, ModeControl, TimeoutPolicy};
use crate::error::Result;
use crate::input::{InputParser, RawEvent};

/// How long to wait for the rest of an escape sequence (milliseconds)
const ESCAPE_TIMEOUT_MS: i32 = 50;

const READ_BUF_SIZE: usize = 256;

/// Keyboard input from the controlling terminal
pub struct TtyInput {
    fd: i32,
    /// Settings in force before we touched the terminal
    original: Option<libc::termios>,
    mode: InputMode,
    parser: InputParser,
    queue: VecDeque<RawEvent>,
    closed: bool,
}

impl TtyInput {
    /// Take over stdin. Does nothing to the terminal when stdin is not a
    /// TTY; reads then see whatever is piped in.
    pub fn new() -> Result<Self> {
        let fd = io::stdin().as_raw_fd();
        let mut input = Self {
            fd,
            original: None,
            mode: InputMode::LINE_INPUT | InputMode::PROCESSED_INPUT,
            parser: InputParser::new(),
            queue: VecDeque::new(),
            closed: false,
        };

        if unsafe { libc::isatty(fd) } != 0 {
            input.original = Some(input.get_attrs()?);
            input.apply()?;
        }
        Ok(input)
    }

    fn get_attrs(&self) -> io::Result<libc::termios> {
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(self.fd, &mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(termios)
        }
    }

    /// Push the current mode bits to the terminal
    fn apply(&mut self) -> io::Result<()> {
        let Some(original) = self.original else {
            return Ok(());
        };

        let mut termios = original;
        termios.c_lflag &= !(libc::ECHO | libc::ECHONL);
        if self.mode.contains(InputMode::LINE_INPUT) {
            termios.c_lflag |= libc::ICANON;
        } else {
            termios.c_lflag &= !libc::ICANON;
            // read() returns as soon as one byte is available
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;
        }
        if self.mode.contains(InputMode::PROCESSED_INPUT) {
            termios.c_lflag |= libc::ISIG;
            termios.c_iflag |= libc::ICRNL;
        } else {
            termios.c_lflag &= !(libc::ISIG | libc::IEXTEN);
            termios.c_iflag &= !(libc::ICRNL | libc::IXON);
        }

        unsafe {
            if libc::tcsetattr(self.fd, libc::TCSANOW, &termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    /// Wait up to `timeout_ms` (-1 for no limit) for stdin to become
    /// readable.
    fn wait_readable(&self, timeout_ms: i32) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        loop {
            let ready = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
            if ready < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            return Ok(ready > 0);
        }
    }

    /// Read what is available and feed it to the parser. Returns false
    /// at end of input.
    fn fill(&mut self) -> io::Result<bool> {
        let mut buf = [0u8; READ_BUF_SIZE];
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(true);
            }
            return Err(err);
        }
        if n == 0 {
            return Ok(false);
        }
        let bytes = &buf[..n as usize];
        log::trace!("read {} input bytes: {:02x?}", n, bytes);
        let events = self.parser.parse(bytes);
        self.queue.extend(events);
        Ok(true)
    }

    fn flush_parser(&mut self) {
        let events = self.parser.flush();
        self.queue.extend(events);
    }
}

impl InputSource for TtyInput {
    fn poll_event(&mut self, policy: TimeoutPolicy) -> Result<Option<RawEvent>> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                log::trace!("input event {:?}", event);
                return Ok(Some(event));
            }
            if self.closed {
                self.flush_parser();
                return Ok(self.queue.pop_front());
            }

            let timeout = if self.parser.has_pending() {
                ESCAPE_TIMEOUT_MS
            } else {
                match policy {
                    TimeoutPolicy::Immediate => 0,
                    TimeoutPolicy::Block => -1,
                }
            };

            if self.wait_readable(timeout)? {
                if !self.fill()? {
                    self.closed = true;
                }
            } else if self.parser.has_pending() {
                // Nothing followed the ESC in time
                self.flush_parser();
            } else {
                return Ok(None);
            }
        }
    }
}

impl ModeControl for TtyInput {
    fn set_input_mode_bits(&mut self, mask: InputMode) -> Result<()> {
        self.mode.insert(mask);
        self.apply()?;
        Ok(())
    }

    fn clear_input_mode_bits(&mut self, mask: InputMode) -> Result<()> {
        self.mode.remove(mask);
        self.apply()?;
        Ok(())
    }
}

impl Drop for TtyInput {
    fn drop(&mut self) {
        if let Some(ref original) = self.original {
            unsafe {
                libc::tcsetattr(self.fd, libc::TCSANOW, original);
            }
        }
    }
}
