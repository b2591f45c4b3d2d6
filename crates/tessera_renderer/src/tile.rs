//! Tile partitioning of the image.
//!
//! Divides the image into rectangles that are rendered independently,
//! one tile at a time per worker thread.

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 64;

/// A half-open rectangle `[x_start, x_end) × [y_start, y_end)` of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x_start: u32,
    pub y_start: u32,
    pub x_end: u32,
    pub y_end: u32,
}

impl Tile {
    /// Create a new tile.
    pub fn new(x_start: u32, y_start: u32, x_end: u32, y_end: u32) -> Self {
        Self {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }

    /// Width of the tile in pixels.
    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    /// Height of the tile in pixels.
    pub fn height(&self) -> u32 {
        self.y_end - self.y_start
    }

    /// True if pixel (x, y) lies inside the tile.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.x_start <= x && x < self.x_end && self.y_start <= y && y < self.y_end
    }
}

/// Generate tiles covering a `width × height` image, in row-major order.
///
/// Tiles on the right and top edges are clamped to the image, so they
/// are narrower or shorter when the image size is not a multiple of the
/// tile size.
pub fn generate_tiles(width: u32, height: u32, tile_width: u32, tile_height: u32) -> Vec<Tile> {
    debug_assert!(tile_width > 0 && tile_height > 0, "tile size must be non-zero");
    let mut tiles = Vec::new();

    let mut y = 0;
    while y < height {
        let y_end = height.min(y.saturating_add(tile_height));
        let mut x = 0;
        while x < width {
            let x_end = width.min(x.saturating_add(tile_width));
            tiles.push(Tile::new(x, y, x_end, y_end));
            x = x_end;
        }
        y = y_end;
    }

    tiles
}
