//! Terramesh CLI - fractal planet and terrain mesh generator.
//!
//! Builds a subdivided icosahedron planet or flat terrain patch, runs the
//! terrain passes, optionally adds a cloud layer, and exports the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use terramesh::buffer::{TriangleBuffer, VertexBuffer};
use terramesh::cloud::{CloudConfig, CloudMesh};
use terramesh::export::{export_pov, export_raw, PovExportOptions, PovMesh};
use terramesh::mesh::{expected_triangle_count, expected_vertex_count};
use terramesh::pipeline::Pipeline;
use terramesh::terrain::{ObjectType, TerrainConfig, TerrainMesh, MAX_SUBDIVISIONS};

/// Fractal planet and terrain mesh generator.
#[derive(Parser)]
#[command(name = "terramesh")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a terrain mesh and export it.
    Generate {
        /// Terrain configuration file (JSON). Command line options override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use the rugged Earth-like preset instead of the defaults.
        #[arg(long, conflicts_with = "config")]
        earth_like: bool,

        /// Shape to generate.
        #[arg(long)]
        object: Option<ObjectKind>,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Subdivision levels applied to the base shape.
        #[arg(long)]
        subdivisions: Option<u32>,

        /// Number of rivers to trace.
        #[arg(long)]
        rivers: Option<u32>,

        /// Number of noise octaves (0 disables noise).
        #[arg(long)]
        noise_terms: Option<u8>,

        /// Add a cloud layer.
        #[arg(long)]
        clouds: bool,

        /// Cloud configuration file (JSON). Implies --clouds.
        #[arg(long)]
        cloud_config: Option<PathBuf>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "planet")]
        name: String,

        /// Export format.
        #[arg(short, long, default_value = "pov")]
        format: ExportFormat,

        /// POV-Ray: add a sea sphere or plane.
        #[arg(long)]
        sea_object: bool,

        /// POV-Ray: add atmosphere shells.
        #[arg(long)]
        atmosphere: bool,

        /// POV-Ray: write only land triangles.
        #[arg(long)]
        exclude_alternate_colour: bool,
    },

    /// Display mesh sizes for a subdivision level.
    Info {
        /// Subdivision levels applied to the icosahedron.
        #[arg(long, default_value = "6")]
        subdivisions: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ObjectKind {
    Planet,
    Hexagon,
    Square,
    Triangle,
}

impl From<ObjectKind> for ObjectType {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Planet => ObjectType::Planet,
            ObjectKind::Hexagon => ObjectType::FlatHexagon,
            ObjectKind::Square => ObjectType::FlatSquare,
            ObjectKind::Triangle => ObjectType::FlatTriangle,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// POV-Ray mesh2 scene.
    Pov,
    /// Packed vertex and triangle buffers with a JSON manifest.
    Raw,
}

/// Options of the `generate` command.
struct GenerateArgs {
    config: Option<PathBuf>,
    earth_like: bool,
    object: Option<ObjectKind>,
    seed: Option<u64>,
    subdivisions: Option<u32>,
    rivers: Option<u32>,
    noise_terms: Option<u8>,
    clouds: bool,
    cloud_config: Option<PathBuf>,
    output: PathBuf,
    name: String,
    format: ExportFormat,
    pov: PovExportOptions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Commands::Generate {
            config,
            earth_like,
            object,
            seed,
            subdivisions,
            rivers,
            noise_terms,
            clouds,
            cloud_config,
            output,
            name,
            format,
            sea_object,
            atmosphere,
            exclude_alternate_colour,
        } => run_generate(GenerateArgs {
            config,
            earth_like,
            object,
            seed,
            subdivisions,
            rivers,
            noise_terms,
            clouds,
            cloud_config,
            output,
            name,
            format,
            pov: PovExportOptions {
                exclude_alternate_colour,
                sea_object,
                atmosphere,
                ..Default::default()
            },
        }),
        Commands::Info { subdivisions } => {
            run_info(subdivisions);
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    // Generate seed if not provided
    let seed = args.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });

    let mut config = match &args.config {
        Some(path) => TerrainConfig::from_json_file(path)
            .with_context(|| format!("Failed to load terrain config {}", path.display()))?,
        None if args.earth_like => TerrainConfig::earth_like(seed),
        None => TerrainConfig::with_seed(seed),
    };
    if args.seed.is_some() {
        config.seed = seed;
        config.rivers_seed = seed;
    }
    if let Some(object) = args.object {
        config.object_type = object.into();
    }
    if let Some(subdivisions) = args.subdivisions {
        config.subdivisions = subdivisions;
    }
    if let Some(rivers) = args.rivers {
        config.rivers = rivers;
    }
    if let Some(noise_terms) = args.noise_terms {
        config.noise_terms = noise_terms;
    }

    let cloud_config = match &args.cloud_config {
        Some(path) => Some(
            CloudConfig::from_json_file(path)
                .with_context(|| format!("Failed to load cloud config {}", path.display()))?,
        ),
        None if args.clouds => Some(CloudConfig::with_seed(config.seed.wrapping_add(1))),
        None => None,
    };

    println!("Terramesh - Fractal Terrain Generator");
    println!("=====================================");
    println!("Object: {:?}", config.object_type);
    println!("Subdivisions: {}", config.subdivisions);
    println!("Seed: {}", config.seed);
    println!("Output: {}", args.output.display());

    let start = Instant::now();

    println!("\nBuilding base mesh...");
    let mut terrain = TerrainMesh::base(&config).context("Failed to build base mesh")?;

    println!("Running terrain pipeline...");
    let pipeline = Pipeline::standard(config.clone());
    pipeline
        .run_with_callbacks(
            &mut terrain,
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .context("Terrain generation failed")?;
    println!("Terrain: {}", terrain.stats());
    println!("Rivers cover {} vertices", terrain.river_vertices.len());

    let clouds = match &cloud_config {
        Some(cloud_config) => {
            println!("\nBuilding cloud layer...");
            let clouds = CloudMesh::build(&config, cloud_config).context("Failed to build clouds")?;
            println!("Clouds: {}", clouds.stats());
            Some(clouds)
        }
        None => None,
    };

    println!("Generation completed in {:.2?}", start.elapsed());

    println!("\nExporting...");
    let export_start = Instant::now();
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

    match args.format {
        ExportFormat::Pov => {
            let mut meshes = vec![PovMesh::terrain(&terrain.mesh)];
            if let Some(clouds) = &clouds {
                meshes.push(PovMesh::cloud(&clouds.mesh));
            }

            let path = args.output.join(format!("{}.pov", args.name));
            let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            let options = PovExportOptions {
                ocean: config.colours.ocean,
                ..args.pov
            };
            export_pov(&meshes, &mut writer, &options).context("Failed to export POV-Ray scene")?;
            println!("  Exported POV-Ray scene: {}", path.display());
        }
        ExportFormat::Raw => {
            let paths = export_raw(&terrain.mesh, &args.output, &args.name).context("Failed to export terrain")?;
            println!("  Exported terrain buffers: {}", paths.manifest.display());

            if let Some(clouds) = &clouds {
                let cloud_name = format!("{}_clouds", args.name);
                let paths = export_raw(&clouds.mesh, &args.output, &cloud_name).context("Failed to export clouds")?;
                println!("  Exported cloud buffers: {}", paths.manifest.display());
            }
        }
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("\nDone! Files saved to: {}", args.output.display());
    Ok(())
}

fn run_info(subdivisions: u32) {
    if subdivisions > MAX_SUBDIVISIONS {
        eprintln!("Error: Subdivisions must be at most {}", MAX_SUBDIVISIONS);
        std::process::exit(1);
    }

    let vertices = expected_vertex_count(subdivisions);
    let triangles = expected_triangle_count(subdivisions);
    let vertex_bytes = vertices * VertexBuffer::ELEMENT_SIZE;
    let triangle_bytes = triangles * TriangleBuffer::ELEMENT_SIZE;
    let mb = |bytes: usize| bytes as f64 / 1024.0 / 1024.0;

    println!("Terramesh - Mesh Size Info");
    println!("==========================");
    println!();
    println!("Subdivisions: {}", subdivisions);
    println!();
    println!("Element counts:");
    println!("  Vertices:  {:>12}", vertices);
    println!("  Triangles: {:>12}", triangles);
    println!();
    println!("Buffer sizes:");
    println!(
        "  Vertices ({:>2} bytes each):  {:>12} bytes ({:.2} MB)",
        VertexBuffer::ELEMENT_SIZE,
        vertex_bytes,
        mb(vertex_bytes)
    );
    println!(
        "  Triangles ({:>2} bytes each): {:>12} bytes ({:.2} MB)",
        TriangleBuffer::ELEMENT_SIZE,
        triangle_bytes,
        mb(triangle_bytes)
    );
    println!(
        "  Total:                     {:>12} bytes ({:.2} MB)",
        vertex_bytes + triangle_bytes,
        mb(vertex_bytes + triangle_bytes)
    );
}
