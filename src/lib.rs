// THEORY:
// This file is the main entry point for the `pixel_mosaic` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (like the CLI binary).
//
// The primary goal is to export the `PixelationPipeline` and its associated data
// structures (`PipelineConfig`, `ExecutionStrategy`, `TileProgress`, etc.) as the
// clean, high-level interface for the whole mosaic engine. The internal modules
// (`core_modules`) hold the leaf data types and the grid math, keeping a clean
// separation between the arithmetic of the filter and the scheduling of its work.

pub mod core_modules;
pub mod pipeline;
pub mod parallel_pipeline;
