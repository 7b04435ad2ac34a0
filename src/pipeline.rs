// THEORY:
// The `pipeline` module is the top-level API for the mosaic engine. It
// encapsulates the full stack (tile grid, averaging, scheduling) behind a
// single, easy-to-use interface: configure once, hand in a source buffer,
// receive the pixelated result.
//
// The pipeline never mutates the source. The result starts as a copy of the
// source and is overwritten tile by tile, so a partially processed run is
// always a valid image: original pixels where no tile has landed yet, averaged
// pixels where one has. Progress reporting and pacing are injected capabilities
// (`ProgressSink`, `tile_delay`), not part of the core loop, which keeps the
// engine testable without a display and without timing dependencies.

use crate::core_modules::grid::TileGrid;
use crate::parallel_pipeline;
use anyhow::{Result, ensure};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// Re-export key data structures for the public API.
pub use crate::core_modules::pixel::Pixel;
pub use crate::core_modules::pixel_buffer::PixelBuffer;
pub use crate::core_modules::tile::TileSpec;

pub const DEFAULT_SQUARE_SIZE: u32 = 10;

/// How tile work is scheduled across workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// One worker processes the full tile grid in raster order.
    #[default]
    Sequential,
    /// Four workers run concurrently, each owning one image quadrant.
    QuadrantParallel,
}

/// Configuration for the PixelationPipeline, fixed before a run begins.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Edge length of the averaging tiles, in pixels. Must be at least 1.
    pub square_size: u32,
    /// The scheduling strategy for tile work.
    pub strategy: ExecutionStrategy,
    /// Optional pause after each tile write, for watchable progress.
    /// `None` runs at full speed.
    pub tile_delay: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            square_size: DEFAULT_SQUARE_SIZE,
            strategy: ExecutionStrategy::default(),
            tile_delay: None,
        }
    }
}

/// The event emitted after each tile is written into the result.
#[derive(Debug, Clone, Copy)]
pub struct TileProgress {
    /// The rectangle that was just filled, in image coordinates.
    pub tile: TileSpec,
    /// The average color the rectangle was filled with.
    pub color: Pixel,
    /// Which worker wrote it: 0 for the sequential worker, the quadrant
    /// index (0..4) for parallel workers.
    pub worker: usize,
}

/// A display collaborator notified after every tile write. Parallel workers
/// call this concurrently; marshaling onto a presentation thread is the
/// implementor's concern.
pub trait ProgressSink: Send + Sync {
    fn tile_written(&self, progress: TileProgress);
}

/// Lets a collaborator drain progress events on its own task.
impl ProgressSink for mpsc::UnboundedSender<TileProgress> {
    fn tile_written(&self, progress: TileProgress) {
        let _ = self.send(progress);
    }
}

/// The main, top-level struct for the mosaic engine.
pub struct PixelationPipeline {
    config: PipelineConfig,
}

impl PixelationPipeline {
    /// Validates the configuration before any processing can start. A square
    /// size of zero would make the grid stride meaningless, so it is rejected
    /// here rather than surfacing as a hang or a divide-by-zero mid-run.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        ensure!(
            config.square_size >= 1,
            "square size must be at least 1, got {}",
            config.square_size
        );

        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Pixelates `source` and returns the result buffer. The source is never
    /// mutated. A zero-area source produces an empty result and no progress
    /// events.
    pub async fn run(
        &self,
        source: &PixelBuffer,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> Result<PixelBuffer> {
        match self.config.strategy {
            ExecutionStrategy::Sequential => Ok(self.run_sequential(source, sink).await),
            ExecutionStrategy::QuadrantParallel => {
                parallel_pipeline::run(
                    Arc::new(source.clone()),
                    self.config.square_size,
                    self.config.tile_delay,
                    sink,
                )
                .await
            }
        }
    }

    async fn run_sequential(
        &self,
        source: &PixelBuffer,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> PixelBuffer {
        let mut result = source.clone();
        let full_image = TileSpec::new(0, 0, source.width(), source.height());
        let grid = TileGrid::new(full_image, self.config.square_size);

        for tile in grid.tiles() {
            let color = tile.average_color(source);
            tile.fill(&mut result, color);

            if let Some(sink) = &sink {
                sink.tile_written(TileProgress {
                    tile,
                    color,
                    worker: 0,
                });
            }
            if let Some(delay) = self.config.tile_delay {
                tokio::time::sleep(delay).await;
            }
        }

        result
    }
}
