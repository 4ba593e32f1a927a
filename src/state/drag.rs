// Two-state pointer-drag machine, one instance per draggable surface
// (board canvas and rotation handle). Mirrors the panning state the
// render loop reads between frames.
#[derive(Default, Debug, Clone)]
pub struct DragState {
    pub active: bool,
    pub last_x: f64,
    pub last_y: f64,
}

impl DragState {
    /// Pointer-down over the surface: record the anchor and start dragging.
    pub fn begin(&mut self, x: f64, y: f64) {
        self.active = true;
        self.last_x = x;
        self.last_y = y;
    }

    /// Pointer-move: yields the delta since the last sample while dragging,
    /// `None` otherwise. Advances the anchor so deltas are incremental.
    pub fn track(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !self.active {
            return None;
        }
        let dx = x - self.last_x;
        let dy = y - self.last_y;
        self.last_x = x;
        self.last_y = y;
        Some((dx, dy))
    }

    /// Pointer-up or pointer-cancel, wherever it lands.
    pub fn end(&mut self) {
        self.active = false;
    }
}
