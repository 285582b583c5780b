use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use titlecard::{
    BlockKind, CpuBackend, FontSet, HeuristicMeasurer, Project, TextMeasurer, compute_layout,
    export_still, export_video, layout::catalog::is_active, text_fits_margins,
};

#[derive(Parser, Debug)]
#[command(name = "titlecard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a project file with the editor defaults.
    Init(InitArgs),
    /// Print the computed layout as JSON.
    Layout(MeasureArgs),
    /// Report text blocks that overflow the side margins even at their minimum size.
    Check(MeasureArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Output project JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct MeasureArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory with `*-Regular`, `*-Bold` and `*-ExtraBold` font files. Without it widths are
    /// estimated.
    #[arg(long)]
    fonts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Font directory.
    #[arg(long)]
    fonts: PathBuf,

    /// Time in seconds from the start of the entrance. Defaults to the settled pose.
    #[arg(long)]
    time: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Font directory.
    #[arg(long)]
    fonts: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Init(args) => cmd_init(args),
        Command::Layout(args) => cmd_layout(args),
        Command::Check(args) => cmd_check(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_project(path: &Path) -> anyhow::Result<Project> {
    let project =
        Project::from_path(path).with_context(|| format!("load project '{}'", path.display()))?;
    project.validate()?;
    Ok(project)
}

fn load_backend(fonts: &Path) -> anyhow::Result<CpuBackend> {
    let set = FontSet::from_dir(fonts)
        .with_context(|| format!("load fonts from '{}'", fonts.display()))?;
    if !set.is_complete() {
        anyhow::bail!(
            "font directory '{}' is missing weights {:?}",
            fonts.display(),
            set.missing().iter().map(|w| w.value()).collect::<Vec<_>>()
        );
    }
    Ok(CpuBackend::new(&set)?)
}

fn measurer_for(fonts: Option<&Path>) -> anyhow::Result<Box<dyn TextMeasurer>> {
    let measurer: Box<dyn TextMeasurer> = match fonts {
        Some(dir) => Box::new(load_backend(dir)?),
        None => Box::new(HeuristicMeasurer::default()),
    };
    Ok(measurer)
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let json = Project::default().to_json_pretty()?;
    std::fs::write(&args.out, json)
        .with_context(|| format!("write project '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: MeasureArgs) -> anyhow::Result<()> {
    let project = load_project(&args.in_path)?;
    let mut measurer = measurer_for(args.fonts.as_deref())?;
    let canvas = project.export.canvas()?;
    let layout = compute_layout(&project.state, canvas, measurer.as_mut())?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn cmd_check(args: MeasureArgs) -> anyhow::Result<()> {
    let project = load_project(&args.in_path)?;
    let mut measurer = measurer_for(args.fonts.as_deref())?;
    let canvas = project.export.canvas()?;

    let mut overflowing = Vec::new();
    for kind in BlockKind::ORDER {
        let Some(text) = kind.text(&project.state) else {
            continue;
        };
        if !is_active(kind, &project.state)? {
            continue;
        }
        let fits = text_fits_margins(text, kind, canvas, measurer.as_mut())?;
        println!("{kind}: {}", if fits { "ok" } else { "overflows" });
        if !fits {
            overflowing.push(kind.as_str());
        }
    }
    if !overflowing.is_empty() {
        anyhow::bail!("text overflows the margins: {}", overflowing.join(", "));
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let project = load_project(&args.in_path)?;
    let backend = load_backend(&args.fonts)?;
    // Past the longest possible entrance everything is settled.
    let t = args.time.unwrap_or(f64::MAX);
    export_still(&project, backend, t, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let project = load_project(&args.in_path)?;
    let backend = load_backend(&args.fonts)?;
    let stats = export_video(&project, backend, &args.out)?;
    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames_rendered);
    Ok(())
}
