use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use pixloop_core::{Canvas, LoopMode, OutputFormat, PixloopConfig};
use pixloop_render::{SceneKind, SequenceBuilder};

mod report;

use report::SceneReport;

/// Pixloop: procedural pixel-art loop renderer.
#[derive(Parser)]
#[command(name = "pixloop", version, about = "Pixloop: procedural pixel-art loop renderer")]
struct Cli {
    /// Path to the config file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "pixloop.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Flags that override `[render]` values from the config file.
#[derive(clap::Args, Debug, Default)]
struct RenderOverrides {
    /// Entity seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames in the loop
    #[arg(long)]
    frames: Option<u64>,

    /// Playback rate in frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Render frames one after another instead of across the thread pool
    #[arg(long)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene (or `all`) to a looping animated image
    Render {
        /// Scene name, or `all`
        scene: String,

        /// Output file for one scene, output directory for `all`
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: gif or apng
        #[arg(short, long)]
        format: Option<String>,

        #[command(flatten)]
        overrides: RenderOverrides,
    },
    /// Render a single frame to PNG
    Frame {
        /// Scene name
        scene: String,

        /// Frame index
        index: u64,

        /// Output PNG path
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        overrides: RenderOverrides,
    },
    /// Show a scene's passes, entity counts, and content hash
    Inspect {
        /// Scene name
        scene: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        overrides: RenderOverrides,
    },
    /// Print the effective configuration as TOML
    Config,
    /// Show version and available scenes
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        );
    subscriber.init();

    let config = PixloopConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load config: {}", cli.config.display()))?;

    match cli.command {
        Commands::Render {
            scene,
            output,
            format,
            overrides,
        } => cmd_render(config, &scene, output, format, &overrides),
        Commands::Frame {
            scene,
            index,
            output,
            overrides,
        } => cmd_frame(config, &scene, index, output, &overrides),
        Commands::Inspect {
            scene,
            json,
            overrides,
        } => cmd_inspect(config, &scene, json, &overrides),
        Commands::Config => cmd_config(&config),
        Commands::Info => cmd_info(),
    }
}

fn apply_overrides(mut config: PixloopConfig, overrides: &RenderOverrides) -> PixloopConfig {
    let render = &mut config.render;
    if let Some(seed) = overrides.seed {
        render.entity_seed = seed;
    }
    if let Some(frames) = overrides.frames {
        render.total_frames = frames;
    }
    if let Some(fps) = overrides.fps {
        render.fps = fps;
    }
    if overrides.sequential {
        render.parallel = false;
    }
    config
}

/// `all` expands to every built-in scene.
fn resolve_scenes(name: &str) -> Result<Vec<SceneKind>> {
    if name.trim().eq_ignore_ascii_case("all") {
        return Ok(SceneKind::ALL.to_vec());
    }
    Ok(vec![name.parse::<SceneKind>()?])
}

/// Where one scene's animation is written.
fn output_path(
    scene: SceneKind,
    format: OutputFormat,
    output: Option<&Path>,
    multiple: bool,
    default_dir: &str,
) -> PathBuf {
    let file_name = format!("{}.{}", scene.name(), format.extension());
    match output {
        Some(dir) if multiple => dir.join(file_name),
        Some(path) => path.to_path_buf(),
        None => Path::new(default_dir).join(file_name),
    }
}

fn cmd_render(
    config: PixloopConfig,
    scene: &str,
    output: Option<PathBuf>,
    format: Option<String>,
    overrides: &RenderOverrides,
) -> Result<()> {
    let config = apply_overrides(config, overrides);
    let format = match format {
        Some(f) => f.parse::<OutputFormat>()?,
        None => config.output.format,
    };
    let scenes = resolve_scenes(scene)?;
    let multiple = scenes.len() > 1;
    let repeat = LoopMode::from_count(config.output.loop_count);

    for kind in scenes {
        let start = Instant::now();
        let path = output_path(kind, format, output.as_deref(), multiple, &config.output.dir);

        println!("▶ Rendering: {}", kind);
        let source = kind
            .build(&config.render)
            .with_context(|| format!("failed to build scene '{}'", kind))?;
        let sequence = SequenceBuilder::render(source.as_ref())
            .with_context(|| format!("failed to render scene '{}'", kind))?;
        println!(
            "   ├ {}x{}, {} frames @ {}fps",
            sequence.width,
            sequence.height,
            sequence.len(),
            sequence.fps
        );

        let mut encoder = pixloop_encode::encoder_for(format, &path);
        sequence
            .hand_off(encoder.as_mut(), repeat)
            .with_context(|| format!("failed to encode {}", path.display()))?;

        println!("   ├ Hash: {}", sequence.content_hash());
        println!(
            "   └ ✓ {} ({:.1}s)",
            path.display(),
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn write_png(canvas: Canvas, path: &Path) -> Result<()> {
    let (width, height) = (canvas.width(), canvas.height());
    let image = image::RgbImage::from_raw(width, height, canvas.into_raw())
        .context("canvas buffer does not match its dimensions")?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
    }
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn cmd_frame(
    config: PixloopConfig,
    scene: &str,
    index: u64,
    output: Option<PathBuf>,
    overrides: &RenderOverrides,
) -> Result<()> {
    let config = apply_overrides(config, overrides);
    let kind: SceneKind = scene.parse()?;
    let path = output.unwrap_or_else(|| {
        Path::new(&config.output.dir).join(format!("{}_{:03}.png", kind.name(), index))
    });

    let source = kind.build(&config.render)?;
    let canvas = SequenceBuilder::render_frame(source.as_ref(), index)?;
    write_png(canvas, &path)?;

    println!("✓ {} frame {} → {}", kind, index, path.display());
    Ok(())
}

fn cmd_inspect(
    config: PixloopConfig,
    scene: &str,
    json: bool,
    overrides: &RenderOverrides,
) -> Result<()> {
    let config = apply_overrides(config, overrides);
    let kind: SceneKind = scene.parse()?;
    let source = kind.build(&config.render)?;
    let sequence = SequenceBuilder::render(source.as_ref())?;
    let report = SceneReport::new(source.as_ref(), &sequence);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}

fn cmd_config(config: &PixloopConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("🎞  Pixloop");
    println!("   Version:   {}", env!("CARGO_PKG_VERSION"));
    println!("   Renderer:  CPU (rayon, one task per frame)");
    println!("   Formats:   gif, apng");
    println!("   Scenes:");
    for kind in SceneKind::ALL {
        println!("     - {}", kind);
    }
    Ok(())
}
