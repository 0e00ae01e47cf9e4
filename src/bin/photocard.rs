use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use photocard::{
    BatchJob, BatchThreading, CardPipeline, CardRequest, CardSink, CornerOffsets, Distortion,
    FileSink, OutputFormat, ParleyCaptionRenderer, PipelineSettings, decode_image, encode_card,
    render_batch, warp_with_distortion,
};

#[derive(Parser, Debug)]
#[command(name = "photocard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn one or more photos into styled cards.
    Card(CardArgs),
    /// Apply only the perspective warp to an image.
    Warp(WarpArgs),
}

#[derive(Parser, Debug)]
struct CardArgs {
    /// Input image (repeat for a batch).
    #[arg(long = "in", required = true)]
    in_paths: Vec<PathBuf>,

    /// Card request JSON (`{"options": {...}, "outputFormat": "png"}`).
    #[arg(long)]
    options: Option<PathBuf>,

    /// Directory that receives `card-<uuid>.<ext>` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// TTF/OTF font for the caption. Without it the caption is skipped.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Override the request's output format (png, jpg, webp).
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Override rayon worker threads for batches.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct WarpArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Default tilt-back.
    #[arg(long, conflicts_with = "offsets")]
    tilt: bool,

    /// Per-corner offsets as JSON, e.g. `{"tl":{"x":10,"y":5}}`.
    #[arg(long)]
    offsets: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Card(args) => cmd_card(args),
        Command::Warp(args) => cmd_warp(args),
    }
}

fn cmd_card(args: CardArgs) -> anyhow::Result<()> {
    let mut request = match &args.options {
        Some(path) => CardRequest::from_path(path)
            .with_context(|| format!("load card request '{}'", path.display()))?,
        None => CardRequest::default(),
    };
    if let Some(format) = args.format {
        request.output_format = format;
    }

    let font_bytes = match &args.font {
        Some(path) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
            // Fail early on a bad font instead of inside every worker.
            ParleyCaptionRenderer::new(bytes.clone())
                .with_context(|| format!("load font '{}'", path.display()))?;
            Some(bytes)
        }
        None => None,
    };
    let make_captions = || {
        font_bytes
            .as_ref()
            .and_then(|b| ParleyCaptionRenderer::new(b.clone()).ok())
    };

    let settings = PipelineSettings::from_env();
    let mut sink = FileSink::new(&args.out_dir);
    tracing::info!(dir = %sink.dir().display(), inputs = args.in_paths.len(), "rendering cards");

    if let [path] = args.in_paths.as_slice() {
        let source = load_image(path)?;
        let mut pipeline = CardPipeline::new(settings);
        let receipt = pipeline.run(source, &request, &mut make_captions(), &mut sink)?;
        eprintln!(
            "wrote {} ({}x{})",
            receipt.location, receipt.width, receipt.height
        );
        return Ok(());
    }

    let jobs = args
        .in_paths
        .iter()
        .map(|path| {
            Ok(BatchJob {
                source: load_image(path)?,
                request: request.clone(),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let threading = BatchThreading {
        threads: args.threads,
    };
    let results = render_batch(jobs, settings, &threading, make_captions)?;

    let mut failures = 0usize;
    for (path, result) in args.in_paths.iter().zip(results) {
        match result.and_then(|card| sink.store_encoded(card.bytes, request.output_format)) {
            Ok(location) => eprintln!("{} -> {location}", path.display()),
            Err(e) => {
                failures += 1;
                tracing::error!(input = %path.display(), error = %e, "card failed");
            }
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} of {} cards failed", args.in_paths.len());
    }
    Ok(())
}

fn cmd_warp(args: WarpArgs) -> anyhow::Result<()> {
    let distortion = match (&args.offsets, args.tilt) {
        (Some(json), _) => {
            let offsets: CornerOffsets =
                serde_json::from_str(json).context("parse --offsets json")?;
            Distortion::Custom(offsets)
        }
        (None, true) => Distortion::DefaultTilt,
        (None, false) => anyhow::bail!("pass --tilt or --offsets"),
    };

    let source = load_image(&args.in_path)?.into_premultiplied()?;
    let warped = warp_with_distortion(&source, &distortion)?
        .context("distortion produced no warp")?;
    let bytes = encode_card(&warped.image.into_straight(), OutputFormat::Png)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn load_image(path: &Path) -> anyhow::Result<photocard::RasterImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).with_context(|| format!("decode image '{}'", path.display()))
}
