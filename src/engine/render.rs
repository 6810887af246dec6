//! Render-side resource: the draw-command buffer.
//!
//! The ECS never touches the terminal. Render-stage systems write
//! [`DrawCommand`]s into a [`RenderBuffer`] resource; the terminal layer
//! drains the buffer after the tick and presents it however it likes.
//! Draining is ordered by `(layer, y, x)` so a frame's paint order is
//! deterministic regardless of system iteration order.

/// A single character cell to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// Character to render.
    pub ch: char,
    /// Color name understood by the terminal layer.
    pub color: &'static str,
}

impl Glyph {
    /// Creates a glyph.
    pub const fn new(ch: char, color: &'static str) -> Self {
        Self { ch, color }
    }
}

/// One deferred draw: a glyph at a screen position on a layer.
///
/// Layer 0 is the map floor; entities draw above it on layer 1 and UI
/// above that.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    /// Screen column.
    pub x: i32,
    /// Screen row.
    pub y: i32,
    /// What to draw.
    pub glyph: Glyph,
    /// Paint layer; higher layers draw over lower ones.
    pub layer: u8,
}

/// Accumulates draw commands during a tick.
#[derive(Default)]
pub struct RenderBuffer {
    commands: Vec<DrawCommand>,
}

impl RenderBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a draw command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Records a glyph draw at `(x, y)` on `layer`.
    pub fn draw(&mut self, x: i32, y: i32, glyph: Glyph, layer: u8) {
        self.push(DrawCommand { x, y, glyph, layer });
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Recorded commands in push order.
    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    /// Removes all commands in deterministic `(layer, y, x)` paint order.
    pub fn drain_sorted(&mut self) -> Vec<DrawCommand> {
        let mut commands = std::mem::take(&mut self.commands);
        commands.sort_by_key(|command| (command.layer, command.y, command.x));
        commands
    }

    /// Discards all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
