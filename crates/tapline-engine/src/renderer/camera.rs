use glam::Vec2;

/// Maps browser pointer positions onto the game's world.
///
/// World space is Y-up with the camera center in the middle of the screen.
/// Screen space is in CSS pixels, origin top-left, Y-down.
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Visible width in world units.
    pub width: f32,
    /// Visible height in world units.
    pub height: f32,
    /// Camera center position in world space.
    pub center: Vec2,
    /// Viewport size in screen pixels.
    pub viewport: Vec2,
}

impl Camera2D {
    /// A camera showing `width × height` world units on a viewport of the same pixel size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: Vec2::ZERO,
            viewport: Vec2::new(width, height),
        }
    }

    /// Resize the viewport, fitting the whole game area while keeping its aspect.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32, game_width: f32, game_height: f32) {
        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            log::warn!("Ignoring resize to {}x{}", viewport_width, viewport_height);
            return;
        }
        let scale = (viewport_width / game_width).min(viewport_height / game_height);
        self.width = viewport_width / scale;
        self.height = viewport_height / scale;
        self.viewport = Vec2::new(viewport_width, viewport_height);
    }

    /// Map a screen-pixel position to world coordinates.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let n = screen / self.viewport;
        let half = Vec2::new(self.width, self.height) * 0.5;
        Vec2::new(
            self.center.x - half.x + n.x * self.width,
            self.center.y + half.y - n.y * self.height,
        )
    }
}
