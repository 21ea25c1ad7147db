//! Generation stage trait and pipeline orchestration.

use thiserror::Error;

use crate::mesh::MeshError;
use crate::terrain::{
    apply_colours, apply_debug_colours, apply_noise, apply_power_law, apply_sea_level,
    generate_rivers, TerrainConfig, TerrainMesh,
};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Fractal noise displacement.
    Noise,
    /// Sea clamping and land/sea partition.
    SeaLevel,
    /// Land height power law.
    PowerLaw,
    /// River tracing and lake filling.
    Rivers,
    /// Vertex normal computation.
    Normals,
    /// Vertex colouring.
    Colours,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Noise => "noise",
            StageId::SeaLevel => "sea-level",
            StageId::PowerLaw => "power-law",
            StageId::Rivers => "rivers",
            StageId::Normals => "normals",
            StageId::Colours => "colours",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, #[source] MeshError),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// A pass over a terrain mesh.
///
/// Stages run in the order they were added; a stage may only run once
/// every stage it depends on has completed.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, modifying the terrain in place.
    fn execute(&self, terrain: &mut TerrainMesh, config: &TerrainConfig) -> Result<(), PipelineError>;
}

fn failed(stage: &dyn GenerationStage) -> impl FnOnce(MeshError) -> PipelineError + '_ {
    move |e| PipelineError::StageFailed(stage.name().to_string(), e)
}

/// Orchestrates terrain stages.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    config: TerrainConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// The full terrain sequence: noise, sea level, power law, rivers,
    /// normals, colours.
    pub fn standard(config: TerrainConfig) -> Self {
        let mut pipeline = Self::new(config);
        pipeline
            .add_stage(NoiseStage)
            .add_stage(SeaLevelStage)
            .add_stage(PowerLawStage)
            .add_stage(RiverStage)
            .add_stage(NormalsStage)
            .add_stage(ColourStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Executes all stages in order on the given terrain.
    pub fn run(&self, terrain: &mut TerrainMesh) -> Result<(), PipelineError> {
        self.run_with_callbacks(terrain, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `terrain` - The terrain to generate
    /// * `on_stage_start` - Called with (name, index, total) when each stage begins
    /// * `on_stage_complete` - Called with (name, index, total) when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        terrain: &mut TerrainMesh,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            log::debug!("Running stage '{}'", stage.name());
            stage.execute(terrain, &self.config)?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Adds fractal noise to vertex heights.
pub struct NoiseStage;

impl GenerationStage for NoiseStage {
    fn id(&self) -> StageId {
        StageId::Noise
    }

    fn name(&self) -> &str {
        "Noise"
    }

    fn execute(&self, terrain: &mut TerrainMesh, config: &TerrainConfig) -> Result<(), PipelineError> {
        apply_noise(terrain, config).map_err(failed(self))
    }
}

/// Clamps to sea level and splits triangles into land and sea bands.
pub struct SeaLevelStage;

impl GenerationStage for SeaLevelStage {
    fn id(&self) -> StageId {
        StageId::SeaLevel
    }

    fn name(&self) -> &str {
        "Sea Level"
    }

    fn execute(&self, terrain: &mut TerrainMesh, _config: &TerrainConfig) -> Result<(), PipelineError> {
        apply_sea_level(terrain).map_err(failed(self))
    }
}

/// Applies the land height power law.
pub struct PowerLawStage;

impl GenerationStage for PowerLawStage {
    fn id(&self) -> StageId {
        StageId::PowerLaw
    }

    fn name(&self) -> &str {
        "Power Law"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::SeaLevel]
    }

    fn execute(&self, terrain: &mut TerrainMesh, config: &TerrainConfig) -> Result<(), PipelineError> {
        apply_power_law(terrain, config).map_err(failed(self))
    }
}

/// Traces rivers across the land band.
pub struct RiverStage;

impl GenerationStage for RiverStage {
    fn id(&self) -> StageId {
        StageId::Rivers
    }

    fn name(&self) -> &str {
        "Rivers"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::SeaLevel]
    }

    fn execute(&self, terrain: &mut TerrainMesh, config: &TerrainConfig) -> Result<(), PipelineError> {
        generate_rivers(terrain, config).map_err(failed(self))
    }
}

/// Recomputes vertex normals.
pub struct NormalsStage;

impl GenerationStage for NormalsStage {
    fn id(&self) -> StageId {
        StageId::Normals
    }

    fn name(&self) -> &str {
        "Normals"
    }

    fn execute(&self, terrain: &mut TerrainMesh, _config: &TerrainConfig) -> Result<(), PipelineError> {
        terrain.mesh.compute_vertex_normals().map_err(failed(self))
    }
}

/// Paints vertex colours, or the debug palette when colours are disabled.
pub struct ColourStage;

impl GenerationStage for ColourStage {
    fn id(&self) -> StageId {
        StageId::Colours
    }

    fn name(&self) -> &str {
        "Colours"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::SeaLevel, StageId::Normals]
    }

    fn execute(&self, terrain: &mut TerrainMesh, config: &TerrainConfig) -> Result<(), PipelineError> {
        let result = if config.debug_disable_colours {
            apply_debug_colours(terrain, config)
        } else {
            apply_colours(terrain, config)
        };
        result.map_err(failed(self))
    }
}
