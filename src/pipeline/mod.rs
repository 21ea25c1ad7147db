//! Pipeline module for orchestrating terrain generation stages.
//!
//! Provides a trait-based architecture for modular terrain passes that can
//! be composed into a complete generation pipeline.

mod stage;

pub use stage::{
    GenerationStage, StageId, Pipeline, PipelineError,
    NoiseStage, SeaLevelStage, PowerLawStage, RiverStage, NormalsStage, ColourStage,
};
