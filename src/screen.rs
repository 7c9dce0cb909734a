//! The screen: windows, double-buffered output, colors and input
//!
//! A [`Screen`] owns a display backend and an input source, the color
//! table, the echo switch and every window. Windows are addressed by
//! [`WindowId`]; the standard window exists from [`Screen::init`] until
//! [`Screen::end`].
//!
//! Each window owns two backend surfaces. Writes always land on the
//! surface in the back role. [`Screen::wrefresh`] publishes it, copies
//! it forward onto the other surface and swaps the roles.
//!
//! A `Screen` is single-threaded: every call runs to completion and the
//! only blocking call is a read without no-delay mode.

use std::fmt;

use log::{debug, trace, warn};

use crate::backend::{
    CursorVisibility, DisplayBackend, InputMode, InputSource, ModeControl, TimeoutPolicy,
};
use crate::config::{Config, ScratchBound};
use crate::core::{
    color_pair, AttrWord, ColorPair, ColorTable, Rgb, Size, Window, WindowFlags, WindowId,
    WindowTable,
};
use crate::error::{CursesError, Result};
use crate::format::render_bounded;
use crate::input::{translate, Key};

pub struct Screen<B: DisplayBackend, I: InputSource + ModeControl> {
    backend: B,
    input: I,
    colors: ColorTable,
    echo: bool,
    windows: WindowTable,
    stdscr: WindowId,
    config: Config,
    cursor_visibility: CursorVisibility,
}

/// Allocate a window and both of its surfaces. Nothing is left behind
/// on failure.
fn alloc_window<B: DisplayBackend>(
    backend: &mut B,
    windows: &mut WindowTable,
    size: Size,
) -> Result<WindowId> {
    let first = backend.create_surface(size)?;
    let second = match backend.create_surface(size) {
        Ok(surface) => surface,
        Err(e) => {
            if let Err(cleanup) = backend.destroy_surface(first) {
                warn!("failed to release surface {:?}: {}", first, cleanup);
            }
            return Err(e);
        }
    };
    let id = windows.next_id();
    windows.insert(Window::new(id, size, [first, second]));
    debug!("created window {} ({}x{})", id, size.rows, size.cols);
    Ok(id)
}

/// Release both surfaces of a window, reporting the first failure.
fn release_window<B: DisplayBackend>(backend: &mut B, window: &Window) -> Result<()> {
    let mut result = Ok(());
    for surface in window.surfaces() {
        if let Err(e) = backend.destroy_surface(surface) {
            warn!("failed to release surface {:?} of window {}: {}", surface, window.id(), e);
            if result.is_ok() {
                result = Err(e);
            }
        }
    }
    debug!("deleted window {}", window.id());
    result
}

impl<B: DisplayBackend, I: InputSource + ModeControl> Screen<B, I> {
    /// Start a session: size the standard window to the display, put the
    /// input source in its base mode and show the blank standard window.
    ///
    /// Any backend fault here is returned; there is no usable screen
    /// without a standard window.
    pub fn init(mut backend: B, mut input: I, config: Config) -> Result<Self> {
        let mut size = backend.query_geometry()?;
        if size.rows == 0 || size.cols == 0 {
            size = config.fallback_size();
        }
        debug!(
            "initializing {} backend at {}x{}",
            backend.name(),
            size.rows,
            size.cols
        );

        input.clear_input_mode_bits(InputMode::all())?;

        let mut windows = WindowTable::new();
        let stdscr = alloc_window(&mut backend, &mut windows, size)?;
        let front = windows.get(stdscr)?.front_surface();
        backend.publish(front)?;

        Ok(Self {
            backend,
            input,
            colors: ColorTable::new(config.color_capabilities()),
            echo: config.echo,
            windows,
            stdscr,
            cursor_visibility: CursorVisibility::Normal,
            config,
        })
    }

    /// End the session: release every window, return the input source
    /// to line-buffered, signal-processing mode and restore the display.
    ///
    /// The backend and input source are handed back.
    pub fn end(mut self) -> Result<(B, I)> {
        let mut result = Ok(());
        for window in self.windows.drain() {
            if let Err(e) = release_window(&mut self.backend, &window) {
                result = result.and(Err(e));
            }
        }
        result = result.and(
            self.input
                .set_input_mode_bits(InputMode::LINE_INPUT | InputMode::PROCESSED_INPUT),
        );
        result = result.and(self.backend.restore());
        debug!("screen ended");
        result.map(|()| (self.backend, self.input))
    }

    // Accessors

    /// The standard window
    pub fn stdscr(&self) -> WindowId {
        self.stdscr
    }

    pub fn window(&self, id: WindowId) -> Result<&Window> {
        self.windows.get(id)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Size of the standard window
    pub fn size(&self) -> Size {
        self.windows
            .get(self.stdscr)
            .map(|w| w.size())
            .unwrap_or_default()
    }

    // Window lifecycle

    /// Create a window. Both dimensions must be nonzero.
    pub fn new_window(&mut self, rows: usize, cols: usize) -> Result<WindowId> {
        if rows == 0 || cols == 0 {
            return Err(CursesError::InvalidArgument(format!(
                "window size {}x{} is empty",
                rows, cols
            )));
        }
        alloc_window(&mut self.backend, &mut self.windows, Size::new(rows, cols))
    }

    /// Tear down a window and release its surfaces. The handle is dead
    /// afterwards. The standard window lives until [`end`](Self::end).
    pub fn delete_window(&mut self, id: WindowId) -> Result<()> {
        if id == self.stdscr {
            return Err(CursesError::InvalidArgument(
                "the standard window cannot be deleted".to_string(),
            ));
        }
        let window = self.windows.remove(id)?;
        release_window(&mut self.backend, &window)
    }

    // Output

    /// Write one character at the cursor and advance.
    ///
    /// `'\r'` moves to column 0 and `'\n'` to column 0 of the next row;
    /// neither writes a cell. Other characters take the window's
    /// attributes and wrap at the right edge. The cursor may come to
    /// rest one row past the bottom; writing there fails until the
    /// cursor is moved back inside.
    pub fn wadd_ch(&mut self, id: WindowId, ch: char) -> Result<()> {
        let win = self.windows.get_mut(id)?;
        match ch {
            '\r' => {
                win.carriage_return();
                return Ok(());
            }
            '\n' => {
                win.line_feed();
                return Ok(());
            }
            _ => {}
        }

        let (row, col) = win.cursor();
        if win.cursor_past_end() {
            return Err(win.out_of_bounds(row, col));
        }
        let mask = self.colors.device_mask(win.attrs());
        self.backend
            .write_cell(win.back_surface(), row, col, ch, mask)?;
        win.advance();
        Ok(())
    }

    pub fn add_ch(&mut self, ch: char) -> Result<()> {
        self.wadd_ch(self.stdscr, ch)
    }

    pub fn mvw_add_ch(&mut self, id: WindowId, row: usize, col: usize, ch: char) -> Result<()> {
        self.wmove(id, row, col)?;
        self.wadd_ch(id, ch)
    }

    pub fn mv_add_ch(&mut self, row: usize, col: usize, ch: char) -> Result<()> {
        self.mvw_add_ch(self.stdscr, row, col, ch)
    }

    /// Blank the back surface and home the cursor.
    pub fn erase(&mut self, id: WindowId) -> Result<()> {
        let win = self.windows.get_mut(id)?;
        self.backend.clear_surface(win.back_surface())?;
        win.home();
        Ok(())
    }

    /// Characters one formatted call may produce for `id`
    fn scratch_limit(&self, id: WindowId) -> Result<usize> {
        let target = self.windows.get(id)?;
        let bound = match self.config.scratch_bound {
            ScratchBound::TargetWindow => target.size(),
            ScratchBound::StandardWindow => self.windows.get(self.stdscr)?.size(),
        };
        Ok(bound.area())
    }

    /// Formatted output to a window. See [`wprintw!`](crate::wprintw).
    ///
    /// The whole text is rendered before any of it is written; text that
    /// does not fit the scratch area fails with nothing written.
    pub fn wprint(&mut self, id: WindowId, args: fmt::Arguments<'_>) -> Result<()> {
        let limit = self.scratch_limit(id)?;
        let text = render_bounded(args, limit)?;
        for ch in text.chars() {
            self.wadd_ch(id, ch)?;
        }
        Ok(())
    }

    pub fn print(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        self.wprint(self.stdscr, args)
    }

    /// Move, then print. If printing fails the cursor goes back to where
    /// it was before the call.
    pub fn mvwprint(
        &mut self,
        id: WindowId,
        row: usize,
        col: usize,
        args: fmt::Arguments<'_>,
    ) -> Result<()> {
        let saved = self.windows.get(id)?.cursor();
        self.wmove(id, row, col)?;
        if let Err(e) = self.wprint(id, args) {
            if let Ok(win) = self.windows.get_mut(id) {
                win.restore_cursor(saved);
            }
            return Err(e);
        }
        Ok(())
    }

    pub fn mvprint(&mut self, row: usize, col: usize, args: fmt::Arguments<'_>) -> Result<()> {
        self.mvwprint(self.stdscr, row, col, args)
    }

    // Refresh

    /// Show a window's back surface.
    ///
    /// 1. publish the back surface
    /// 2. put the visible cursor at the window's cursor
    /// 3. copy the published surface onto the other one
    /// 4. swap roles
    ///
    /// A failed publish changes nothing. Once publishing succeeds the
    /// roles are swapped even if a later step fails; that failure is
    /// still returned.
    pub fn wrefresh(&mut self, id: WindowId) -> Result<()> {
        let win = self.windows.get_mut(id)?;
        let back = win.back_surface();
        let front = win.front_surface();
        let bounds = win.bounds();

        self.backend.publish(back)?;

        let (row, col) = win.visible_cursor();
        let cursor_result = self.backend.set_cursor(back, row, col);

        let copy_result = match self.backend.read_region(back, bounds) {
            Ok(cells) => self.backend.write_region(front, bounds, &cells),
            Err(e) => Err(e),
        };

        win.flip();
        debug!("refreshed window {}", id);

        if let Err(e) = copy_result {
            warn!("window {}: copy to new back surface failed: {}", id, e);
            return Err(e);
        }
        cursor_result
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.wrefresh(self.stdscr)
    }

    // Cursor

    pub fn wmove(&mut self, id: WindowId, row: usize, col: usize) -> Result<()> {
        self.windows.get_mut(id)?.move_to(row, col)
    }

    pub fn move_to(&mut self, row: usize, col: usize) -> Result<()> {
        self.wmove(self.stdscr, row, col)
    }

    pub fn cursor(&self, id: WindowId) -> Result<(usize, usize)> {
        Ok(self.windows.get(id)?.cursor())
    }

    /// Change the visible cursor. Returns the previous setting.
    pub fn curs_set(&mut self, visibility: CursorVisibility) -> Result<CursorVisibility> {
        self.backend.set_cursor_visibility(visibility)?;
        Ok(std::mem::replace(&mut self.cursor_visibility, visibility))
    }

    // Attributes

    pub fn attrs(&self, id: WindowId) -> Result<AttrWord> {
        Ok(self.windows.get(id)?.attrs())
    }

    pub fn attr_on(&mut self, id: WindowId, attrs: impl Into<AttrWord>) -> Result<()> {
        self.windows.get_mut(id)?.attr_on(attrs.into());
        Ok(())
    }

    pub fn attr_off(&mut self, id: WindowId, attrs: impl Into<AttrWord>) -> Result<()> {
        self.windows.get_mut(id)?.attr_off(attrs.into());
        Ok(())
    }

    pub fn attr_set(&mut self, id: WindowId, attrs: impl Into<AttrWord>) -> Result<()> {
        self.windows.get_mut(id)?.attr_set(attrs.into());
        Ok(())
    }

    // Input

    /// Translate special keys into key codes on reads from `id`
    pub fn keypad(&mut self, id: WindowId, on: bool) -> Result<()> {
        self.windows.get_mut(id)?.set_flag(WindowFlags::KEYPAD, on);
        Ok(())
    }

    /// Make reads from `id` fail with `NoInput` instead of waiting
    pub fn nodelay(&mut self, id: WindowId, on: bool) -> Result<()> {
        self.windows.get_mut(id)?.set_flag(WindowFlags::NODELAY, on);
        Ok(())
    }

    pub fn echo(&mut self) {
        self.echo = true;
    }

    pub fn noecho(&mut self) {
        self.echo = false;
    }

    pub fn is_echo(&self) -> bool {
        self.echo
    }

    /// Character-at-a-time input with signal keys active
    pub fn cbreak(&mut self) -> Result<()> {
        self.input.clear_input_mode_bits(InputMode::LINE_INPUT)?;
        self.input.set_input_mode_bits(InputMode::PROCESSED_INPUT)
    }

    pub fn nocbreak(&mut self) -> Result<()> {
        self.input
            .set_input_mode_bits(InputMode::LINE_INPUT | InputMode::PROCESSED_INPUT)
    }

    /// Character-at-a-time input with signal keys delivered as input
    pub fn raw(&mut self) -> Result<()> {
        self.input
            .clear_input_mode_bits(InputMode::LINE_INPUT | InputMode::PROCESSED_INPUT)
    }

    pub fn noraw(&mut self) -> Result<()> {
        self.input
            .set_input_mode_bits(InputMode::LINE_INPUT | InputMode::PROCESSED_INPUT)
    }

    /// Read one key for a window.
    ///
    /// Key-up events are skipped. In no-delay mode a read with nothing
    /// pending fails with `NoInput`; otherwise it waits. With echo on the
    /// key's literal character is written to the standard window.
    pub fn wget_ch(&mut self, id: WindowId) -> Result<Key> {
        loop {
            let win = self.windows.get(id)?;
            let nodelay = win.nodelay();
            let keypad = win.keypad();
            let policy = if nodelay {
                TimeoutPolicy::Immediate
            } else {
                TimeoutPolicy::Block
            };

            let event = match self.input.poll_event(policy)? {
                Some(event) => event,
                None if nodelay => return Err(CursesError::NoInput),
                None => return Err(CursesError::InputClosed),
            };
            trace!("raw event {:?}", event);
            if !event.key_down {
                continue;
            }

            if self.echo {
                if let Some(ch) = event.ch {
                    if let Err(e) = self.wadd_ch(self.stdscr, ch) {
                        warn!("echo of {:?} failed: {}", ch, e);
                    }
                }
            }
            return Ok(translate(&event, keypad));
        }
    }

    pub fn get_ch(&mut self) -> Result<Key> {
        self.wget_ch(self.stdscr)
    }

    /// Move the window's cursor, then read from it
    pub fn mvwget_ch(&mut self, id: WindowId, row: usize, col: usize) -> Result<Key> {
        self.wmove(id, row, col)?;
        self.wget_ch(id)
    }

    pub fn mvget_ch(&mut self, row: usize, col: usize) -> Result<Key> {
        self.mvwget_ch(self.stdscr, row, col)
    }

    // Colors

    pub fn has_colors(&self) -> bool {
        self.colors.supports_color()
    }

    pub fn can_change_color(&self) -> bool {
        self.colors.can_redefine_colors()
    }

    /// Enter color mode. Pair 0 becomes white on black and the standard
    /// window's attributes are set to it.
    pub fn start_color(&mut self) -> Result<()> {
        self.colors.enable()?;
        self.windows.get_mut(self.stdscr)?.attr_set(color_pair(0));
        debug!("color mode started");
        Ok(())
    }

    pub fn init_color(&mut self, index: usize, r: u16, g: u16, b: u16) -> Result<()> {
        self.colors.define_color(index, Rgb::new(r, g, b))
    }

    pub fn init_pair(&mut self, pair: usize, fg: u8, bg: u8) -> Result<()> {
        self.colors.define_pair(pair, fg, bg)
    }

    pub fn pair_content(&self, pair: usize) -> Result<ColorPair> {
        self.colors.pair_colors(pair)
    }

    pub fn color_content(&self, index: usize) -> Result<Rgb> {
        self.colors.color_content(index)
    }

    /// Palette size
    pub fn colors(&self) -> usize {
        self.colors.colors()
    }

    /// Pair table size
    pub fn color_pairs(&self) -> usize {
        self.colors.color_pairs()
    }

    pub fn color_table(&self) -> &ColorTable {
        &self.colors
    }
}
