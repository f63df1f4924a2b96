use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use ocr_textgen::{
    BackgroundImages, DirBackgrounds, FontFace, Generator, GeneratorConfig, ImageSpecBuilder,
    NoBackgrounds, RasterRenderer, Renderer as _,
};

#[derive(Parser, Debug)]
#[command(name = "ocr-textgen", version)]
struct Cli {
    /// Log per-image decisions.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a corpus: `images_per_font` images for every font family.
    Generate(GenerateArgs),
    /// Render one image for a given sentence and font file.
    Sample(SampleArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Generator config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of background photographs.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Fall back to installed system fonts for glyphs missing from the chosen face.
    #[arg(long)]
    system_fonts: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Directory with one sub-directory per font family.
    #[arg(long)]
    fonts: PathBuf,

    /// UTF-8 text file, one sentence per line.
    #[arg(long)]
    sentences: PathBuf,

    /// Output root; images land in `<out>/<family>/`.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Font file (.ttf/.otf).
    #[arg(long)]
    font: PathBuf,

    /// Sentence to draw.
    #[arg(long)]
    text: String,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Print the container and text declarations that were synthesized.
    #[arg(long)]
    dump_styles: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Sample(args) => cmd_sample(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<GeneratorConfig> {
    match path {
        Some(p) => Ok(GeneratorConfig::from_path(p)?),
        None => Ok(GeneratorConfig::default()),
    }
}

fn background_pool(dir: Option<&Path>) -> anyhow::Result<Arc<dyn BackgroundImages>> {
    Ok(match dir {
        Some(d) => Arc::new(DirBackgrounds::scan(d)?),
        None => Arc::new(NoBackgrounds),
    })
}

fn make_renderer(system_fonts: bool) -> RasterRenderer {
    if system_fonts {
        RasterRenderer::with_system_fonts()
    } else {
        RasterRenderer::new()
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = read_config(args.common.config.as_deref())?;
    let images = background_pool(args.common.images.as_deref())?;
    let builder = ImageSpecBuilder::new(config, images)?;

    let families = ocr_textgen::corpus::discover_families(&args.fonts)?;
    let sentences = ocr_textgen::corpus::load_sentences(&args.sentences)?;
    tracing::info!(
        families = families.len(),
        sentences = sentences.len(),
        backgrounds = builder.images().names().len(),
        "corpus loaded"
    );

    let renderer = make_renderer(args.common.system_fonts);
    let generator = Generator::new(&builder, &renderer, &families, &sentences, &args.out)?;
    let stats = generator.run()?;

    eprintln!(
        "wrote {} images to {} ({} failed)",
        stats.written,
        args.out.display(),
        stats.failed
    );
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let config = read_config(args.common.config.as_deref())?;
    let images = background_pool(args.common.images.as_deref())?;
    let builder = ImageSpecBuilder::new(config, images)?;
    let font = Arc::new(FontFace::from_path(&args.font)?);

    let mut rng = rand::rng();
    let request = builder.build(&args.text, &font, 0, &mut rng)?;

    if args.dump_styles {
        eprintln!("background: {}", request.style.background.kind());
        eprintln!("container:");
        for line in request.style.sheet.container_css().lines() {
            eprintln!("  {line}");
        }
        eprintln!("text:");
        for line in request.style.sheet.text_css().lines() {
            eprintln!("  {line}");
        }
    }

    let image = make_renderer(args.common.system_fonts).render(&request)?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &image.bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, {})",
        args.out.display(),
        image.width,
        image.height,
        image.format.extension()
    );
    Ok(())
}
