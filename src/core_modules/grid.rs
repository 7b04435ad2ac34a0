// THEORY:
// The `TileGrid` is the scheduler's source of truth. It owns the grid math that
// turns a rectangular region of the image into the ordered list of tiles the
// workers consume, and the quadrant math that carves an image up for the
// parallel strategy.
//
// Key architectural principles:
// 1.  **Raster Order**: tiles come out row-major, top to bottom, left to right.
//     Every consumer of a grid sees the same traversal, whether it is the single
//     sequential worker or one of the four quadrant workers walking its own
//     region.
// 2.  **Edge Clipping**: the last tile of a row or column is clamped to the
//     region boundary. A clipped tile may be smaller than `square_size` on a
//     side but it always contains at least one pixel, so downstream averaging
//     never sees an empty rectangle.
// 3.  **Quadrant Split**: the image is bisected at its width and height
//     midpoints. The four quadrants are disjoint and together cover the image,
//     which is what lets four workers write their regions concurrently without
//     sharing any pixel.

use crate::core_modules::tile::TileSpec;

/// Generates the tile grid for one rectangular region of an image.
pub struct TileGrid {
    /// The region being tiled, in image coordinates.
    region: TileSpec,
    /// The stride of the grid and the edge length of unclipped tiles.
    square_size: u32,
}

impl TileGrid {
    /// `square_size` must be at least 1; `PixelationPipeline` validates this
    /// before any grid is built.
    pub fn new(region: TileSpec, square_size: u32) -> Self {
        Self {
            region,
            square_size,
        }
    }

    /// Yields the region's tiles in raster order. Tiles on the right and
    /// bottom edges may be clipped; none are empty. An empty region yields no
    /// tiles.
    pub fn tiles(&self) -> impl Iterator<Item = TileSpec> + '_ {
        let TileSpec { x0, y0, x1, y1 } = self.region;
        let size = self.square_size;

        (y0..y1).step_by(size as usize).flat_map(move |tile_y| {
            (x0..x1).step_by(size as usize).map(move |tile_x| {
                TileSpec::new(
                    tile_x,
                    tile_y,
                    tile_x.saturating_add(size).min(x1),
                    tile_y.saturating_add(size).min(y1),
                )
            })
        })
    }

    /// Splits an image into its four quadrants: top-left, top-right,
    /// bottom-left, bottom-right. Midpoints round down, so the extra column
    /// and row of an odd-sized image land in the right and bottom quadrants.
    /// Quadrants of a degenerate image may be empty.
    pub fn quadrants(width: u32, height: u32) -> [TileSpec; 4] {
        let mid_x = width / 2;
        let mid_y = height / 2;

        [
            TileSpec::new(0, 0, mid_x, mid_y),
            TileSpec::new(mid_x, 0, width, mid_y),
            TileSpec::new(0, mid_y, mid_x, height),
            TileSpec::new(mid_x, mid_y, width, height),
        ]
    }
}
