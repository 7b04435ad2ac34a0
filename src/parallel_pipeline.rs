use crate::core_modules::grid::TileGrid;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::core_modules::tile::TileSpec;
use crate::pipeline::{ProgressSink, TileProgress};
use anyhow::{Context, Result};
use futures::future;
use std::sync::Arc;
use std::time::Duration;

/// One worker per image quadrant, always.
pub const QUADRANT_WORKERS: usize = 4;

/// Pixelates `source` with four concurrent quadrant workers and returns the
/// recombined result.
///
/// Each worker owns a quadrant-local canvas for the duration of the run, so
/// no two workers ever touch the same pixel; the quadrants are blitted back
/// into the result only after every worker has finished. `square_size` must
/// be at least 1; `PixelationPipeline` validates this.
pub async fn run(
    source: Arc<PixelBuffer>,
    square_size: u32,
    tile_delay: Option<Duration>,
    sink: Option<Arc<dyn ProgressSink>>,
) -> Result<PixelBuffer> {
    let quadrants = TileGrid::quadrants(source.width(), source.height());
    let mut workers = Vec::with_capacity(QUADRANT_WORKERS);

    for (worker_id, quadrant) in quadrants.into_iter().enumerate() {
        let source = Arc::clone(&source);
        let sink = sink.clone();

        workers.push(tokio::spawn(async move {
            process_quadrant(worker_id, quadrant, &source, square_size, tile_delay, sink).await
        }));
    }

    let canvases = future::try_join_all(workers)
        .await
        .context("Quadrant worker failed")?;

    let mut result = (*source).clone();
    for (quadrant, canvas) in quadrants.iter().zip(canvases) {
        result.blit(&canvas, quadrant.x0, quadrant.y0);
    }

    Ok(result)
}

/// Walks one quadrant's tile grid in raster order, averaging from the shared
/// source and filling a quadrant-local canvas.
async fn process_quadrant(
    worker_id: usize,
    quadrant: TileSpec,
    source: &PixelBuffer,
    square_size: u32,
    tile_delay: Option<Duration>,
    sink: Option<Arc<dyn ProgressSink>>,
) -> PixelBuffer {
    let mut canvas = PixelBuffer::new(quadrant.width(), quadrant.height());
    let grid = TileGrid::new(quadrant, square_size);

    for tile in grid.tiles() {
        let color = tile.average_color(source);
        tile.relative_to(quadrant.x0, quadrant.y0).fill(&mut canvas, color);

        if let Some(sink) = &sink {
            sink.tile_written(TileProgress {
                tile,
                color,
                worker: worker_id,
            });
        }
        if let Some(delay) = tile_delay {
            tokio::time::sleep(delay).await;
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ExecutionStrategy, Pixel, PipelineConfig, PixelationPipeline};
    use tokio::sync::mpsc;

    fn uniform(width: u32, height: u32, pixel: Pixel) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buffer.set(x, y, pixel);
            }
        }
        buffer
    }

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buffer.set(
                    x,
                    y,
                    Pixel::new((x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) * 5 % 256) as u8),
                );
            }
        }
        buffer
    }

    fn pipeline(square_size: u32, strategy: ExecutionStrategy) -> PixelationPipeline {
        PixelationPipeline::new(PipelineConfig {
            square_size,
            strategy,
            tile_delay: None,
        })
        .unwrap()
    }

    // Quadrant boundaries that fall on the tile stride give both strategies
    // the same grid, so their outputs must match pixel for pixel.
    #[tokio::test]
    async fn matches_sequential_output_on_aligned_dimensions() {
        let source = gradient(24, 16);

        let sequential = pipeline(4, ExecutionStrategy::Sequential)
            .run(&source, None)
            .await
            .unwrap();
        let parallel = pipeline(4, ExecutionStrategy::QuadrantParallel)
            .run(&source, None)
            .await
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[tokio::test]
    async fn one_worker_per_quadrant_on_an_aligned_image() {
        let source = gradient(20, 20);
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let sink: Arc<dyn ProgressSink> = Arc::new(sender);

        run(Arc::new(source), 10, None, Some(sink)).await.unwrap();

        let mut events = Vec::new();
        while let Ok(progress) = receiver.try_recv() {
            events.push(progress);
        }

        assert_eq!(events.len(), QUADRANT_WORKERS);

        let mut workers: Vec<usize> = events.iter().map(|progress| progress.worker).collect();
        workers.sort_unstable();
        assert_eq!(workers, vec![0, 1, 2, 3]);

        let quadrants = TileGrid::quadrants(20, 20);
        for progress in &events {
            assert_eq!(progress.tile, quadrants[progress.worker]);
        }
    }

    #[tokio::test]
    async fn uniform_image_stays_uniform_on_odd_dimensions() {
        let color = Pixel::new(33, 66, 99);
        let source = uniform(7, 5, color);

        let result = run(Arc::new(source), 3, None, None).await.unwrap();

        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(result.get(x, y), color, "at ({x}, {y})");
            }
        }
    }

    #[tokio::test]
    async fn parallel_result_pixels_are_quadrant_tile_means() {
        let source = gradient(7, 5);

        let result = run(Arc::new(source.clone()), 3, None, None).await.unwrap();

        for quadrant in TileGrid::quadrants(7, 5) {
            for tile in TileGrid::new(quadrant, 3).tiles() {
                let expected = tile.average_color(&source);
                for y in tile.y0..tile.y1 {
                    for x in tile.x0..tile.x1 {
                        assert_eq!(result.get(x, y), expected, "at ({x}, {y})");
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn zero_area_source_recombines_to_an_empty_result() {
        let result = run(Arc::new(PixelBuffer::new(0, 0)), 10, None, None)
            .await
            .unwrap();

        assert!(result.is_empty());
    }
}
