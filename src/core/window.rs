//! Windows and the window table
//!
//! A window is a fixed-size rectangular surface with its own cursor,
//! attribute word and input flags. It owns two backend surfaces: one
//! plays the primary (visible) role, the other the back role. Callers
//! never address a surface slot directly; they get the surface that
//! currently plays a role.

use std::collections::HashMap;
use std::fmt;

use super::attr::AttrWord;
use super::grid::{Rect, Size};
use crate::backend::SurfaceId;
use crate::error::{CursesError, Result};

/// Handle to a window issued by a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags::bitflags! {
    /// Per-window input flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowFlags: u8 {
        /// Translate special keys into key codes.
        const KEYPAD  = 1 << 0;
        /// Reads return immediately when no input is pending.
        const NODELAY = 1 << 1;
    }
}

/// A window on the display
#[derive(Debug, Clone)]
pub struct Window {
    id: WindowId,
    size: Size,
    /// Cursor (row, col)
    cursor: (usize, usize),
    attrs: AttrWord,
    flags: WindowFlags,
    /// Physical surfaces; which one is back is decided by `prim`
    surfaces: [SurfaceId; 2],
    /// Slot of the primary surface. The back slot is `1 - prim`.
    prim: usize,
}

impl Window {
    /// Create a window over two freshly created surfaces. The cursor
    /// starts at the origin, attributes are normal and both flags off.
    pub fn new(id: WindowId, size: Size, surfaces: [SurfaceId; 2]) -> Self {
        Self {
            id,
            size,
            cursor: (0, 0),
            attrs: AttrWord::NORMAL,
            flags: WindowFlags::empty(),
            surfaces,
            prim: 0,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows
    }

    pub fn cols(&self) -> usize {
        self.size.cols
    }

    /// The rectangle covering the whole window
    pub fn bounds(&self) -> Rect {
        Rect::full(self.size)
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.size.rows && col < self.size.cols
    }

    /// Move the cursor. Out-of-range requests fail and leave it alone.
    pub fn move_to(&mut self, row: usize, col: usize) -> Result<()> {
        if !self.contains(row, col) {
            return Err(self.out_of_bounds(row, col));
        }
        self.cursor = (row, col);
        Ok(())
    }

    pub(crate) fn out_of_bounds(&self, row: usize, col: usize) -> CursesError {
        CursesError::OutOfBounds {
            row,
            col,
            rows: self.size.rows,
            cols: self.size.cols,
        }
    }

    /// Restore a cursor saved earlier with [`cursor`](Self::cursor).
    pub(crate) fn restore_cursor(&mut self, cursor: (usize, usize)) {
        self.cursor = cursor;
    }

    /// Whether the cursor has wrapped past the last row
    pub fn cursor_past_end(&self) -> bool {
        self.cursor.0 >= self.size.rows
    }

    /// Cursor clamped into the window, for placing the visible cursor
    pub fn visible_cursor(&self) -> (usize, usize) {
        let (row, col) = self.cursor;
        (
            row.min(self.size.rows.saturating_sub(1)),
            col.min(self.size.cols.saturating_sub(1)),
        )
    }

    /// Advance past a written cell, wrapping to the next row at the
    /// right edge. The row may end up one past the last row.
    pub(crate) fn advance(&mut self) {
        let (row, col) = self.cursor;
        if col + 1 >= self.size.cols {
            self.cursor = (row + 1, 0);
        } else {
            self.cursor = (row, col + 1);
        }
    }

    pub(crate) fn carriage_return(&mut self) {
        self.cursor.1 = 0;
    }

    /// Column to 0, row down by one. The row stops one past the last row.
    pub(crate) fn line_feed(&mut self) {
        let row = (self.cursor.0 + 1).min(self.size.rows);
        self.cursor = (row, 0);
    }

    pub(crate) fn home(&mut self) {
        self.cursor = (0, 0);
    }

    // Attributes

    pub fn attrs(&self) -> AttrWord {
        self.attrs
    }

    pub fn attr_on(&mut self, attrs: AttrWord) {
        self.attrs |= attrs;
    }

    pub fn attr_off(&mut self, attrs: AttrWord) {
        self.attrs = self.attrs & !attrs;
    }

    pub fn attr_set(&mut self, attrs: AttrWord) {
        self.attrs = attrs;
    }

    // Flags

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    pub fn set_flag(&mut self, flag: WindowFlags, on: bool) {
        self.flags.set(flag, on);
    }

    pub fn keypad(&self) -> bool {
        self.flags.contains(WindowFlags::KEYPAD)
    }

    pub fn nodelay(&self) -> bool {
        self.flags.contains(WindowFlags::NODELAY)
    }

    // Buffer roles

    /// Surface currently playing the primary (visible) role
    pub fn front_surface(&self) -> SurfaceId {
        self.surfaces[self.prim]
    }

    /// Surface currently playing the back role; all writes go here
    pub fn back_surface(&self) -> SurfaceId {
        self.surfaces[1 - self.prim]
    }

    /// Both physical surfaces, for release at teardown
    pub(crate) fn surfaces(&self) -> [SurfaceId; 2] {
        self.surfaces
    }

    /// Swap roles: back becomes primary, primary becomes back.
    pub(crate) fn flip(&mut self) {
        self.prim = 1 - self.prim;
    }
}

/// Live windows keyed by handle
#[derive(Debug, Default)]
pub struct WindowTable {
    windows: HashMap<WindowId, Window>,
    next_id: u32,
}

impl WindowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next handle. Handles are never reused.
    pub fn next_id(&mut self) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, window: Window) {
        self.windows.insert(window.id(), window);
    }

    pub fn get(&self, id: WindowId) -> Result<&Window> {
        self.windows.get(&id).ok_or(CursesError::InvalidHandle(id))
    }

    pub fn get_mut(&mut self, id: WindowId) -> Result<&mut Window> {
        self.windows.get_mut(&id).ok_or(CursesError::InvalidHandle(id))
    }

    pub fn remove(&mut self, id: WindowId) -> Result<Window> {
        self.windows.remove(&id).ok_or(CursesError::InvalidHandle(id))
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Remove every window, in handle order
    pub fn drain(&mut self) -> Vec<Window> {
        let mut all: Vec<Window> = self.windows.drain().map(|(_, w)| w).collect();
        all.sort_by_key(|w| w.id());
        all
    }
}
