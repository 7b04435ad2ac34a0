use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use pixel_mosaic::core_modules::utils::image_helper;
use pixel_mosaic::pipeline::{
    ExecutionStrategy, PipelineConfig, PixelationPipeline, ProgressSink,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Pixelates an image by replacing fixed-size square tiles with their
/// average color.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Image file to pixelate.
    input: PathBuf,

    /// Where to write the result. Without this, the result is saved as
    /// result.png (or the first alternative format that encodes).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Edge length of the averaging tiles, in pixels.
    #[arg(short, long, default_value_t = 10)]
    square_size: u32,

    /// Tile scheduling strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Sequential)]
    strategy: StrategyArg,

    /// Pause after each tile, in milliseconds, to make progress watchable.
    /// Zero disables the pause.
    #[arg(long, default_value_t = 10)]
    delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// One worker, tiles in raster order.
    Sequential,
    /// Four workers, one per image quadrant.
    Quadrant,
}

impl From<StrategyArg> for ExecutionStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Sequential => ExecutionStrategy::Sequential,
            StrategyArg::Quadrant => ExecutionStrategy::QuadrantParallel,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let source = image_helper::load(&args.input)?;
    info!(
        "Loaded {} ({}x{})",
        args.input.display(),
        source.width(),
        source.height()
    );

    if args.strategy == StrategyArg::Quadrant {
        info!("Quadrant strategy on {} available cores", num_cpus::get());
    }

    let pipeline = PixelationPipeline::new(PipelineConfig {
        square_size: args.square_size,
        strategy: args.strategy.into(),
        tile_delay: (args.delay_ms > 0).then(|| Duration::from_millis(args.delay_ms)),
    })?;

    // Drain progress events on a separate task, standing in for a display
    // collaborator redrawing after each tile.
    let (progress_sender, mut progress_receiver) = mpsc::unbounded_channel();
    let monitor = tokio::spawn(async move {
        let mut tiles = 0u64;
        while let Some(progress) = progress_receiver.recv().await {
            tiles += 1;
            debug!(
                "worker {} wrote ({}, {})..({}, {}) as ({}, {}, {})",
                progress.worker,
                progress.tile.x0,
                progress.tile.y0,
                progress.tile.x1,
                progress.tile.y1,
                progress.color.red,
                progress.color.green,
                progress.color.blue,
            );
        }
        tiles
    });

    let sink: Arc<dyn ProgressSink> = Arc::new(progress_sender);
    let result = pipeline.run(&source, Some(sink)).await?;
    let tiles = monitor.await?;
    info!("Processed {tiles} tiles");

    let written = match &args.output {
        Some(path) => {
            image_helper::save(&result, path)?;
            path.clone()
        }
        None => image_helper::save_preferred(&result, "result")?,
    };
    info!("Result image saved as {}", written.display());

    Ok(())
}
