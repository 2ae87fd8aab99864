use glam::Vec2;

/// Rectangle of the window, in physical pixels with the origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Maps a window position to normalised device coordinates of this
    /// viewport (x right, y up).
    pub fn to_ndc(&self, point: Vec2) -> Vec2 {
        let local = (point - Vec2::new(self.x, self.y)) / Vec2::new(self.width, self.height);
        Vec2::new(local.x * 2.0 - 1.0, 1.0 - local.y * 2.0)
    }
}

/// Splits the window into `count` full-width viewports stacked top to bottom
/// with `gap` pixels between neighbours.
pub fn stack_viewports(window: (u32, u32), count: usize, gap: u32) -> Vec<Viewport> {
    if count == 0 {
        return Vec::new();
    }
    let width = window.0.max(1) as f32;
    let gaps = gap as f32 * (count - 1) as f32;
    let height = ((window.1 as f32 - gaps) / count as f32).max(1.0);

    (0..count)
        .map(|index| Viewport {
            x: 0.0,
            y: index as f32 * (height + gap as f32),
            width,
            height,
        })
        .collect()
}
