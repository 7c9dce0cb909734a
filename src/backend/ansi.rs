//! ANSI terminal backend
//!
//! Surfaces live in memory. Publishing a surface diffs it against what
//! the terminal currently shows and writes only the changed cells.
//! - 8 colors plus bright variants (SGR 30-37, 90-97, 40-47, 100-107)
//! - reverse video and underline
//! - cursor placement and the three cursor shapes

use std::collections::HashMap;
use std::io::Write;

use super::{CursorVisibility, DisplayBackend, SurfaceId};
use crate::core::{Cell, DeviceAttr, Grid, Rect, Size};
use crate::error::{CursesError, Result};

/// ANSI escape sequences
const CSI: &str = "\x1b[";

/// Backend writing ANSI sequences to `W`
pub struct AnsiBackend<W: Write> {
    out: W,
    /// Geometry used when the terminal cannot be asked
    fallback: Size,
    /// Geometry that overrides any query
    fixed: Option<Size>,
    surfaces: HashMap<SurfaceId, Grid>,
    next_surface: u32,
    visible: Option<SurfaceId>,
    /// What the terminal shows right now, if known
    shown: Option<Grid>,
    /// Attributes of the last cell written, to minimize escape codes
    current_attrs: Option<DeviceAttr>,
    cursor: (usize, usize),
    visibility: CursorVisibility,
    started: bool,
}

impl<W: Write> AnsiBackend<W> {
    pub fn new(out: W, fallback: Size) -> Self {
        Self {
            out,
            fallback,
            fixed: None,
            surfaces: HashMap::new(),
            next_surface: 0,
            visible: None,
            shown: None,
            current_attrs: None,
            cursor: (0, 0),
            visibility: CursorVisibility::Normal,
            started: false,
        }
    }

    /// Pin the geometry instead of asking the terminal
    pub fn with_geometry(mut self, size: Size) -> Self {
        self.fixed = Some(size);
        self
    }

    /// The underlying writer
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn grid(&self, surface: SurfaceId) -> Result<&Grid> {
        self.surfaces
            .get(&surface)
            .ok_or_else(|| CursesError::backend(format!("unknown surface {}", surface.0)))
    }

    fn grid_mut(&mut self, surface: SurfaceId) -> Result<&mut Grid> {
        self.surfaces
            .get_mut(&surface)
            .ok_or_else(|| CursesError::backend(format!("unknown surface {}", surface.0)))
    }

    fn emit(&mut self, output: &str) -> Result<()> {
        self.out.write_all(output.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// Initialize sequence, sent before the first frame
    fn init_sequence(&self) -> String {
        format!("{}0m{}2J{}H", CSI, CSI, CSI)
    }

    /// Shutdown sequence
    fn shutdown_sequence(&self) -> String {
        format!("{}0m{}?25h{}0 q{}2J{}H", CSI, CSI, CSI, CSI, CSI)
    }

    fn start(&mut self) -> Result<()> {
        if !self.started {
            let init = self.init_sequence() + &Self::cursor_sequence(self.visibility);
            self.emit(&init)?;
            self.started = true;
        }
        Ok(())
    }

    /// Generate cursor move sequence
    fn move_cursor(row: usize, col: usize) -> String {
        format!("{}{};{}H", CSI, row + 1, col + 1)
    }

    /// Generate SGR sequence for a device mask, or nothing if the mask is
    /// already in effect.
    fn sgr(&mut self, attrs: DeviceAttr) -> String {
        if self.current_attrs == Some(attrs) {
            return String::new();
        }
        self.current_attrs = Some(attrs);

        let mut codes: Vec<u8> = vec![0];
        if attrs.contains(DeviceAttr::UNDERSCORE) {
            codes.push(4);
        }
        if attrs.contains(DeviceAttr::REVERSE) {
            codes.push(7);
        }
        let fg_base = if attrs.contains(DeviceAttr::FG_INTENSITY) { 90 } else { 30 };
        codes.push(fg_base + color_index(attrs.fg_rgb()));
        let bg_base = if attrs.contains(DeviceAttr::BG_INTENSITY) { 100 } else { 40 };
        codes.push(bg_base + color_index(attrs.bg_rgb()));

        let code_strs: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        format!("{}{}m", CSI, code_strs.join(";"))
    }

    /// Render a single cell (SGR + character)
    fn render_cell(&mut self, cell: &Cell) -> String {
        let mut output = self.sgr(cell.attrs);
        // Control characters would corrupt the terminal
        let ch = cell.ch;
        if ch < ' ' || ch == '\x7f' {
            output.push(' ');
        } else {
            output.push(ch);
        }
        output
    }

    /// Output for showing `grid`, limited to cells that differ from
    /// what is on screen.
    fn render_changes(&mut self, grid: &Grid) -> String {
        let full = match &self.shown {
            Some(shown) => shown.size() != grid.size(),
            None => true,
        };

        let mut output = String::new();
        if full {
            self.current_attrs = None;
            output.push_str(&format!("{}0m{}2J", CSI, CSI));
        }

        let blank = Grid::new(grid.size());
        let previous = match &self.shown {
            Some(shown) if !full => shown.clone(),
            _ => blank,
        };

        let mut last: Option<(usize, usize)> = None;
        for (row, col, cell) in grid.iter_changed(&previous) {
            let need_move = match last {
                Some((lr, lc)) => !(row == lr && col == lc + 1),
                None => true,
            };
            if need_move {
                output.push_str(&Self::move_cursor(row, col));
            }
            output.push_str(&self.render_cell(cell));
            last = Some((row, col));
        }
        output
    }

    fn cursor_sequence(visibility: CursorVisibility) -> String {
        match visibility {
            CursorVisibility::Invisible => format!("{}?25l", CSI),
            CursorVisibility::Normal => format!("{}0 q{}?25h", CSI, CSI),
            CursorVisibility::VeryVisible => format!("{}1 q{}?25h", CSI, CSI),
        }
    }
}

/// ANSI color number (0-7) for red, green, blue channel bits
fn color_index((r, g, b): (bool, bool, bool)) -> u8 {
    u8::from(r) | u8::from(g) << 1 | u8::from(b) << 2
}

/// Query the terminal size via `ioctl(TIOCGWINSZ)`.
#[cfg(unix)]
fn terminal_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size::new(usize::from(ws.ws_row), usize::from(ws.ws_col)))
    } else {
        None
    }
}

#[cfg(not(unix))]
fn terminal_size() -> Option<Size> {
    None
}

impl<W: Write> DisplayBackend for AnsiBackend<W> {
    fn name(&self) -> &str {
        "ansi"
    }

    fn query_geometry(&mut self) -> Result<Size> {
        Ok(self.fixed.or_else(terminal_size).unwrap_or(self.fallback))
    }

    fn create_surface(&mut self, size: Size) -> Result<SurfaceId> {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.surfaces.insert(id, Grid::new(size));
        Ok(id)
    }

    fn destroy_surface(&mut self, surface: SurfaceId) -> Result<()> {
        self.surfaces
            .remove(&surface)
            .ok_or_else(|| CursesError::backend(format!("unknown surface {}", surface.0)))?;
        if self.visible == Some(surface) {
            self.visible = None;
        }
        Ok(())
    }

    fn clear_surface(&mut self, surface: SurfaceId) -> Result<()> {
        self.grid_mut(surface)?.clear();
        Ok(())
    }

    fn publish(&mut self, surface: SurfaceId) -> Result<()> {
        self.start()?;
        let grid = self.grid(surface)?.clone();
        let mut output = self.render_changes(&grid);
        let (row, col) = self.cursor;
        output.push_str(&Self::move_cursor(row, col));
        if let Err(e) = self.emit(&output) {
            // The terminal may hold any prefix of the output
            self.current_attrs = None;
            self.shown = None;
            return Err(e);
        }
        self.shown = Some(grid);
        self.visible = Some(surface);
        Ok(())
    }

    fn write_cell(
        &mut self,
        surface: SurfaceId,
        row: usize,
        col: usize,
        ch: char,
        attrs: DeviceAttr,
    ) -> Result<()> {
        if self.grid_mut(surface)?.set(row, col, ch, attrs) {
            Ok(())
        } else {
            Err(CursesError::backend(format!("cell ({}, {}) outside surface", row, col)))
        }
    }

    fn read_region(&mut self, surface: SurfaceId, rect: Rect) -> Result<Vec<Cell>> {
        self.grid(surface)?
            .read_region(rect)
            .ok_or_else(|| CursesError::backend("region outside surface"))
    }

    fn write_region(&mut self, surface: SurfaceId, rect: Rect, cells: &[Cell]) -> Result<()> {
        if self.grid_mut(surface)?.write_region(rect, cells) {
            Ok(())
        } else {
            Err(CursesError::backend("region outside surface"))
        }
    }

    fn set_cursor(&mut self, surface: SurfaceId, row: usize, col: usize) -> Result<()> {
        self.grid(surface)?;
        self.cursor = (row, col);
        if self.visible == Some(surface) {
            self.emit(&Self::move_cursor(row, col))?;
        }
        Ok(())
    }

    fn set_cursor_visibility(&mut self, visibility: CursorVisibility) -> Result<()> {
        self.visibility = visibility;
        self.emit(&Self::cursor_sequence(visibility))
    }

    fn restore(&mut self) -> Result<()> {
        if self.started {
            let shutdown = self.shutdown_sequence();
            self.emit(&shutdown)?;
            self.started = false;
            self.shown = None;
            self.current_attrs = None;
        }
        Ok(())
    }
}

impl<W: Write> Drop for AnsiBackend<W> {
    fn drop(&mut self) {
        if self.started {
            if let Err(e) = self.restore() {
                log::warn!("failed to restore terminal: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> AnsiBackend<Vec<u8>> {
        AnsiBackend::new(Vec::new(), Size::new(24, 80)).with_geometry(Size::new(5, 10))
    }

    fn output(backend: &AnsiBackend<Vec<u8>>) -> String {
        String::from_utf8_lossy(backend.writer()).into_owned()
    }

    #[test]
    fn test_fixed_geometry() {
        let mut backend = backend();
        assert_eq!(backend.query_geometry().unwrap(), Size::new(5, 10));
    }

    #[test]
    fn test_publish_renders_cells() {
        let mut backend = backend();
        let s = backend.create_surface(Size::new(5, 10)).unwrap();
        backend.write_cell(s, 1, 2, 'X', DeviceAttr::FG_RED).unwrap();
        backend.publish(s).unwrap();

        let out = output(&backend);
        assert!(out.contains("\x1b[2J"));
        assert!(out.contains("\x1b[2;3H"));
        assert!(out.contains("\x1b[0;31;40mX"));
    }

    #[test]
    fn test_publish_sends_only_changes() {
        let mut backend = backend();
        let a = backend.create_surface(Size::new(5, 10)).unwrap();
        let b = backend.create_surface(Size::new(5, 10)).unwrap();
        backend.write_cell(a, 0, 0, 'A', DeviceAttr::DEFAULT).unwrap();
        backend.publish(a).unwrap();
        let before = backend.writer().len();

        backend.write_cell(b, 0, 0, 'A', DeviceAttr::DEFAULT).unwrap();
        backend.write_cell(b, 4, 9, 'Z', DeviceAttr::DEFAULT).unwrap();
        backend.publish(b).unwrap();

        let out = String::from_utf8_lossy(&backend.writer()[before..]).into_owned();
        assert!(out.contains('Z'));
        assert!(!out.contains('A'));
    }

    /// Writer whose next `failures` writes fail
    struct FlakyWriter {
        data: Vec<u8>,
        failures: usize,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "write failed"));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_publish_after_failed_write_resends_colors() {
        let writer = FlakyWriter { data: Vec::new(), failures: 0 };
        let mut backend =
            AnsiBackend::new(writer, Size::new(24, 80)).with_geometry(Size::new(5, 10));
        let first = backend.create_surface(Size::new(5, 10)).unwrap();
        let second = backend.create_surface(Size::new(5, 10)).unwrap();
        backend.publish(first).unwrap();

        backend.write_cell(second, 0, 0, 'R', DeviceAttr::FG_RED).unwrap();
        backend.out.failures = 1;
        let err = backend.publish(second).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Backend);

        let before = backend.writer().data.len();
        backend.publish(second).unwrap();
        let out = String::from_utf8_lossy(&backend.writer().data[before..]).into_owned();
        assert!(out.contains("\x1b[0;31;40mR"));
    }

    #[test]
    fn test_sgr_mapping() {
        let mut backend = backend();
        let attrs = DeviceAttr::FG_RED
            | DeviceAttr::FG_GREEN
            | DeviceAttr::FG_INTENSITY
            | DeviceAttr::BG_BLUE
            | DeviceAttr::UNDERSCORE
            | DeviceAttr::REVERSE;
        assert_eq!(backend.sgr(attrs), "\x1b[0;4;7;93;44m");
        assert_eq!(backend.sgr(attrs), "");
    }

    #[test]
    fn test_control_chars_sanitized() {
        let mut backend = backend();
        let out = backend.render_cell(&Cell::new('\x07'));
        assert!(out.ends_with(' '));
    }

    #[test]
    fn test_cursor_visibility() {
        let mut backend = backend();
        backend.set_cursor_visibility(CursorVisibility::Invisible).unwrap();
        assert!(output(&backend).ends_with("\x1b[?25l"));
        backend.set_cursor_visibility(CursorVisibility::VeryVisible).unwrap();
        assert!(output(&backend).ends_with("\x1b[1 q\x1b[?25h"));
    }

    #[test]
    fn test_restore_after_start() {
        let mut backend = backend();
        backend.restore().unwrap();
        assert!(output(&backend).is_empty());

        let s = backend.create_surface(Size::new(5, 10)).unwrap();
        backend.publish(s).unwrap();
        backend.restore().unwrap();
        assert!(output(&backend).ends_with("\x1b[2J\x1b[H"));
    }
}
