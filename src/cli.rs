use crate::color::ColorScale;
use crate::config::load_config;
use crate::ir::ChordData;
use crate::layout_dump::write_layout_dump;
use crate::render::{write_output_png, write_output_svg};
use crate::service::ChordDiagramService;
use crate::source::{load_chord_data, load_cohort_metadata, write_chunks};
use crate::stage::{ChordScene, RenderQueue, Stage};
use crate::theme::Theme;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pdvc", version, about = "Chord diagrams for cohort variable mappings")]
pub struct Args {
    /// Input chord JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for a single SVG.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Cohort metadata JSON supplying per-cohort colours
    #[arg(long = "colors")]
    pub colors: Option<PathBuf>,

    /// Maximum node count per chunk (overrides the config)
    #[arg(short = 's', long = "chunkSize")]
    pub chunk_size: Option<usize>,

    /// Chunk to draw
    #[arg(short = 'n', long = "index", default_value_t = 0)]
    pub index: usize,

    /// Draw every chunk into numbered outputs
    #[arg(short = 'a', long = "all", conflicts_with = "index")]
    pub all: bool,

    /// Write the chunk list as JSON
    #[arg(long = "chunksOut")]
    pub chunks_out: Option<PathBuf>,

    /// Write the computed layouts as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Render with this node index hovered
    #[arg(long = "hover")]
    pub hover: Option<usize>,

    /// PNG width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// PNG height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let data = load_chord_data(args.input.as_deref())?;
    let colors = resolve_colors(args.colors.as_deref(), &data, &config.theme)?;

    let mut service = ChordDiagramService::new(&config);
    let chunk_size = args.chunk_size.unwrap_or(service.default_chunk_size());
    let chunks = service.chunk_data(&data, chunk_size);
    log::info!("{} chunks at size {}", chunks.len(), chunk_size);

    if let Some(path) = &args.chunks_out {
        write_chunks(path, &chunks)?;
    }
    if chunks.is_empty() {
        return Err(anyhow::anyhow!("No nodes found in input"));
    }

    // One mount per drawn chunk; the batch path fills mount i with chunk i.
    let mount_count = if args.all { chunks.len() } else { 1 };
    let mut stage = Stage::with_mounts(service.mount_hook(), mount_count);
    if args.all {
        let mut queue = RenderQueue::new();
        service.schedule_chord_diagrams(&chunks, &stage, &mut queue);
        for report in service.run_scheduled(&mut queue, &mut stage, &colors) {
            report.result?;
        }
    } else {
        service.create_chord_diagrams(&chunks, args.index, &mut stage, &colors)?;
    }
    let scenes = collect_scenes(&stage);

    if let Some(path) = &args.dump_layout {
        let layouts: Vec<_> = scenes.iter().map(|scene| scene.layout.clone()).collect();
        write_layout_dump(path, &layouts)?;
    }

    let outputs = if args.all {
        resolve_multi_outputs(args.output.as_deref(), args.output_format, scenes.len())?
    } else {
        args.output.iter().cloned().collect()
    };

    for (idx, mut scene) in scenes.into_iter().enumerate() {
        if let Some(node) = args.hover {
            scene.mouse_over(node);
        }
        let svg = scene.to_svg();
        match args.output_format {
            OutputFormat::Svg => {
                write_output_svg(&svg, outputs.get(idx).map(PathBuf::as_path))?;
            }
            OutputFormat::Png => {
                let output = ensure_output(outputs.get(idx), "png")?;
                write_output_png(&svg, output, &config.render, &config.theme)?;
            }
        }
    }

    Ok(())
}

/// Metadata colours when given, otherwise the theme palette over the groups
/// of the whole document so a cohort keeps its colour across chunks.
fn resolve_colors(path: Option<&Path>, data: &ChordData, theme: &Theme) -> Result<ColorScale> {
    match path {
        Some(path) => Ok(ColorScale::from_metadata(&load_cohort_metadata(path)?)),
        None => Ok(ColorScale::new(data.groups(), theme.palette.clone())),
    }
}

fn collect_scenes(stage: &Stage) -> Vec<ChordScene> {
    stage
        .mounts()
        .iter()
        .filter_map(|mount| mount.scene().cloned())
        .collect()
}

fn ensure_output<'a>(output: Option<&'a PathBuf>, ext: &str) -> Result<&'a Path> {
    if let Some(path) = output {
        return Ok(path.as_path());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = match format {
        OutputFormat::Svg => "svg",
        OutputFormat::Png => "png",
    };
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required with --all"))?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("chord-{}.{}", idx + 1, ext)))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("chord");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((0..count)
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx + 1, ext)))
        .collect())
}
