//! In-memory backend and scripted input
//!
//! Keeps every surface as a [`Grid`] and records what has been
//! published. Used by the tests and the headless demo. Each operation
//! class can be made to fail on demand.

use std::collections::{HashMap, VecDeque};

use super::{
    CursorVisibility, DisplayBackend, InputMode, InputSource, ModeControl, SurfaceId,
    TimeoutPolicy,
};
use crate::core::{Cell, DeviceAttr, Grid, Rect, Size};
use crate::error::{CursesError, Result};
use crate::input::RawEvent;

/// Display backend that draws into memory
#[derive(Debug)]
pub struct MemoryBackend {
    geometry: Size,
    surfaces: HashMap<SurfaceId, Grid>,
    next_surface: u32,
    visible: Option<SurfaceId>,
    cursor: Option<(SurfaceId, usize, usize)>,
    visibility: CursorVisibility,
    restored: bool,
    publish_count: usize,
    /// Fail `publish` calls
    pub fail_publish: bool,
    /// Fail `read_region` calls
    pub fail_read: bool,
    /// Fail `write_cell` and `write_region` calls
    pub fail_write: bool,
    /// Fail `create_surface` calls
    pub fail_create: bool,
}

impl MemoryBackend {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            geometry: Size::new(rows, cols),
            surfaces: HashMap::new(),
            next_surface: 0,
            visible: None,
            cursor: None,
            visibility: CursorVisibility::Normal,
            restored: false,
            publish_count: 0,
            fail_publish: false,
            fail_read: false,
            fail_write: false,
            fail_create: false,
        }
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

    /// Contents of a surface
    pub fn surface(&self, surface: SurfaceId) -> Option<&Grid> {
        self.surfaces.get(&surface)
    }

    /// The surface currently shown
    pub fn visible_surface(&self) -> Option<SurfaceId> {
        self.visible
    }

    /// Contents of the surface currently shown
    pub fn visible_grid(&self) -> Option<&Grid> {
        self.visible.and_then(|id| self.surfaces.get(&id))
    }

    /// Character shown at a position
    pub fn visible_char(&self, row: usize, col: usize) -> Option<char> {
        self.visible_grid().and_then(|g| g.char_at(row, col))
    }

    /// Last visible cursor placement
    pub fn cursor(&self) -> Option<(SurfaceId, usize, usize)> {
        self.cursor
    }

    pub fn cursor_visibility(&self) -> CursorVisibility {
        self.visibility
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn publish_count(&self) -> usize {
        self.publish_count
    }

    pub fn is_restored(&self) -> bool {
        self.restored
    }
}

impl DisplayBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn query_geometry(&mut self) -> Result<Size> {
        Ok(self.geometry)
    }

    fn create_surface(&mut self, size: Size) -> Result<SurfaceId> {
        if self.fail_create {
            return Err(CursesError::backend("surface creation refused"));
        }
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.surfaces.insert(id, Grid::new(size));
        Ok(id)
    }

    fn destroy_surface(&mut self, surface: SurfaceId) -> Result<()> {
        self.surfaces
            .remove(&surface)
            .map(|_| ())
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
        if self.fail_publish {
            return Err(CursesError::backend("publish refused"));
        }
        self.grid(surface)?;
        self.visible = Some(surface);
        self.publish_count += 1;
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
        if self.fail_write {
            return Err(CursesError::backend("cell write refused"));
        }
        let grid = self.grid_mut(surface)?;
        if grid.set(row, col, ch, attrs) {
            Ok(())
        } else {
            Err(CursesError::backend(format!("cell ({}, {}) outside surface", row, col)))
        }
    }

    fn read_region(&mut self, surface: SurfaceId, rect: Rect) -> Result<Vec<Cell>> {
        if self.fail_read {
            return Err(CursesError::backend("region read refused"));
        }
        self.grid(surface)?
            .read_region(rect)
            .ok_or_else(|| CursesError::backend("region outside surface"))
    }

    fn write_region(&mut self, surface: SurfaceId, rect: Rect, cells: &[Cell]) -> Result<()> {
        if self.fail_write {
            return Err(CursesError::backend("region write refused"));
        }
        if self.grid_mut(surface)?.write_region(rect, cells) {
            Ok(())
        } else {
            Err(CursesError::backend("region outside surface"))
        }
    }

    fn set_cursor(&mut self, surface: SurfaceId, row: usize, col: usize) -> Result<()> {
        self.grid(surface)?;
        self.cursor = Some((surface, row, col));
        Ok(())
    }

    fn set_cursor_visibility(&mut self, visibility: CursorVisibility) -> Result<()> {
        self.visibility = visibility;
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.restored = true;
        Ok(())
    }
}

/// Input source that replays queued events
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<RawEvent>,
    mode: InputMode,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: impl IntoIterator<Item = RawEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            mode: InputMode::empty(),
        }
    }

    pub fn push(&mut self, event: RawEvent) {
        self.events.push_back(event);
    }

    /// Queue one key-down event per character
    pub fn push_str(&mut self, text: &str) {
        self.events.extend(text.chars().map(RawEvent::char));
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }
}

impl InputSource for ScriptedInput {
    /// A blocking poll on an empty script means the source has closed;
    /// there is nothing left to wait for.
    fn poll_event(&mut self, _policy: TimeoutPolicy) -> Result<Option<RawEvent>> {
        Ok(self.events.pop_front())
    }
}

impl ModeControl for ScriptedInput {
    fn set_input_mode_bits(&mut self, mask: InputMode) -> Result<()> {
        self.mode.insert(mask);
        Ok(())
    }

    fn clear_input_mode_bits(&mut self, mask: InputMode) -> Result<()> {
        self.mode.remove(mask);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surfaces_are_independent() {
        let mut backend = MemoryBackend::new(3, 4);
        let a = backend.create_surface(Size::new(3, 4)).unwrap();
        let b = backend.create_surface(Size::new(3, 4)).unwrap();
        assert_ne!(a, b);

        backend.write_cell(a, 1, 1, 'q', DeviceAttr::DEFAULT).unwrap();
        assert_eq!(backend.surface(a).unwrap().char_at(1, 1), Some('q'));
        assert_eq!(backend.surface(b).unwrap().char_at(1, 1), Some(' '));
    }

    #[test]
    fn test_publish_tracks_visible() {
        let mut backend = MemoryBackend::new(2, 2);
        let a = backend.create_surface(Size::new(2, 2)).unwrap();
        backend.write_cell(a, 0, 1, 'v', DeviceAttr::DEFAULT).unwrap();
        assert_eq!(backend.visible_char(0, 1), None);
        backend.publish(a).unwrap();
        assert_eq!(backend.visible_char(0, 1), Some('v'));
        assert_eq!(backend.publish_count(), 1);
    }

    #[test]
    fn test_fault_injection() {
        let mut backend = MemoryBackend::new(2, 2);
        let a = backend.create_surface(Size::new(2, 2)).unwrap();
        backend.fail_publish = true;
        assert!(backend.publish(a).is_err());
        backend.fail_read = true;
        assert!(backend.read_region(a, Rect::new(0, 0, 1, 1)).is_err());
        backend.fail_create = true;
        assert!(backend.create_surface(Size::new(1, 1)).is_err());
    }

    #[test]
    fn test_write_outside_surface_fails() {
        let mut backend = MemoryBackend::new(2, 2);
        let a = backend.create_surface(Size::new(2, 2)).unwrap();
        assert!(backend.write_cell(a, 2, 0, 'x', DeviceAttr::DEFAULT).is_err());
        assert!(backend.write_cell(SurfaceId(99), 0, 0, 'x', DeviceAttr::DEFAULT).is_err());
    }

    #[test]
    fn test_scripted_input() {
        let mut input = ScriptedInput::new();
        input.push_str("hi");
        assert_eq!(input.poll_event(TimeoutPolicy::Block).unwrap(), Some(RawEvent::char('h')));
        assert_eq!(input.pending(), 1);

        input.set_input_mode_bits(InputMode::LINE_INPUT | InputMode::PROCESSED_INPUT).unwrap();
        input.clear_input_mode_bits(InputMode::LINE_INPUT).unwrap();
        assert_eq!(input.mode(), InputMode::PROCESSED_INPUT);
    }
}
