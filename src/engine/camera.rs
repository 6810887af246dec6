//! Camera viewport resource.
//!
//! Tracks the visible window into the game map and converts between world
//! and screen coordinates. Inserted as a resource; typically one system
//! re-centers it on the player each tick and the render stage uses it to
//! cull and translate draws.

/// A rectangular viewport into the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    /// Viewport width in cells.
    pub width: i32,
    /// Viewport height in cells.
    pub height: i32,
    /// Map width in cells, used to clamp scrolling.
    pub map_width: i32,
    /// Map height in cells, used to clamp scrolling.
    pub map_height: i32,
    /// World x of the viewport's top-left corner.
    pub x: i32,
    /// World y of the viewport's top-left corner.
    pub y: i32,
}

impl Camera {
    /// Creates a camera at the map origin.
    pub fn new(width: i32, height: i32, map_width: i32, map_height: i32) -> Self {
        Self { width, height, map_width, map_height, x: 0, y: 0 }
    }

    /// Centers the viewport on a world position, clamped to map edges.
    pub fn follow(&mut self, target_x: i32, target_y: i32) {
        let want_x = target_x - self.width / 2;
        let want_y = target_y - self.height / 2;
        self.x = want_x.clamp(0, (self.map_width - self.width).max(0));
        self.y = want_y.clamp(0, (self.map_height - self.height).max(0));
    }

    /// Converts a world position to screen coordinates.
    pub fn world_to_screen(&self, world_x: i32, world_y: i32) -> (i32, i32) {
        (world_x - self.x, world_y - self.y)
    }

    /// Converts a screen position to world coordinates.
    pub fn screen_to_world(&self, screen_x: i32, screen_y: i32) -> (i32, i32) {
        (screen_x + self.x, screen_y + self.y)
    }

    /// Returns `true` if a world position falls inside the viewport.
    pub fn is_visible(&self, world_x: i32, world_y: i32) -> bool {
        self.x <= world_x
            && world_x < self.x + self.width
            && self.y <= world_y
            && world_y < self.y + self.height
    }

    /// Visible world-space bounds as `(start_x, start_y, end_x, end_y)`,
    /// end-exclusive and clipped to the map.
    pub fn visible_bounds(&self) -> (i32, i32, i32, i32) {
        (
            self.x,
            self.y,
            (self.x + self.width).min(self.map_width),
            (self.y + self.height).min(self.map_height),
        )
    }
}
