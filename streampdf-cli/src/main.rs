mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use render::TextRenderer;
use std::path::{Path, PathBuf};
use std::thread;
use streampdf::{
    Color, Destination, Document, DocumentConfig, DocumentState, Font, GraphicsContext,
    OutlineOptions, PageDestination, PageOptions,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "streampdf",
    about = "Streams PDF documents to disk as they are built",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a text file as a PDF; `#` lines become outline entries
    Build {
        /// Input text file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// JSON file with document configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Document title
        #[arg(short, long)]
        title: Option<String>,

        /// Keep every page in memory until the document ends
        #[arg(long)]
        buffer_pages: bool,

        /// Do not write an outline tree
        #[arg(long)]
        no_outlines: bool,

        /// Write streams uncompressed
        #[arg(long)]
        no_compress: bool,
    },

    /// Generate a demo PDF with graphics, outlines and a streamed image
    Demo {
        /// Output file path
        #[arg(short, long, default_value = "demo.pdf")]
        output: PathBuf,

        /// Number of pages
        #[arg(short, long, default_value = "3")]
        pages: usize,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("streampdf=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<DocumentConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(DocumentConfig::default()),
    }
}

fn build(
    input: &Path,
    output: &Path,
    mut config: DocumentConfig,
    title: Option<String>,
) -> Result<DocumentState> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let page = config.default_page;
    // the renderer adds pages itself
    config.auto_first_page = false;

    let mut doc = Document::create(output, config)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    doc.set_title(title.unwrap_or_else(|| {
        input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }));
    doc.set_creator("streampdf CLI");

    let summary = TextRenderer::new(&mut doc, page).render(&source)?;
    let state = doc.end()?;
    info!(
        pages = summary.pages,
        headings = summary.headings,
        bytes = doc.bytes_written(),
        stalls = doc.stalls(),
        "document written"
    );
    Ok(state)
}

fn demo(output: &Path, pages: usize) -> Result<DocumentState> {
    let mut doc = Document::create(output, DocumentConfig::default())
        .with_context(|| format!("Failed to create {}", output.display()))?;
    doc.set_title("streampdf Demo");
    doc.set_author("streampdf CLI");

    doc.add_page(PageOptions::a4())?;
    doc.add_outline("Cover", None, OutlineOptions::default().bold())?;

    let mut graphics = GraphicsContext::new();
    graphics
        .set_stroke_color(Color::red())
        .set_line_width(2.0)
        .rect(50.0, 50.0, 200.0, 100.0)
        .stroke()
        .set_fill_color(Color::blue())
        .circle(300.0, 400.0, 50.0)
        .fill();
    doc.draw(&graphics)?;
    doc.font(Font::HelveticaBold, 36.0)
        .text("streampdf Demo", 100.0, 700.0)?;
    doc.font(Font::Helvetica, 16.0)
        .text("Objects reach the file as soon as they are complete", 100.0, 650.0)?;

    // image samples arrive from another thread while pages are still added
    let (width, height) = (64u32, 64u32);
    let feeder = doc.embed_image("Gradient", width, height, "DeviceRGB", 8)?;
    doc.place_image("Gradient", 350.0, 600.0, 128.0, 128.0)?;
    let producer = thread::spawn(move || -> streampdf::Result<()> {
        for y in 0..height {
            let row: Vec<u8> = (0..width)
                .flat_map(|x| [(x * 4) as u8, (y * 4) as u8, 160])
                .collect();
            feeder.feed(row)?;
        }
        feeder.finish();
        Ok(())
    });

    doc.add_outline("Chapters", None, OutlineOptions::default())?;
    doc.enter_outline_level()?;
    for i in 1..=pages {
        doc.add_page(PageOptions::a4())?;
        doc.font(Font::TimesBold, 24.0)
            .text(&format!("Chapter {i}"), 72.0, 760.0)?;
        doc.font(Font::TimesRoman, 12.0)
            .text(&format!("This is page {} of the demo.", i + 1), 72.0, 730.0)?;
        doc.add_outline(
            &format!("Chapter {i}"),
            Some(Destination::fit(PageDestination::PageIndex(i))),
            OutlineOptions::default().with_color(Color::rgb(0.1, 0.3, 0.6)),
        )?;
    }
    doc.exit_outline_level()?;

    let mut state = doc.end()?;
    debug!(%state, pending = doc.pending(), "end() returned");

    producer
        .join()
        .map_err(|_| anyhow::anyhow!("Image producer panicked"))??;
    while state != DocumentState::Finalized {
        state = doc.poll()?;
    }
    Ok(state)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            config,
            title,
            buffer_pages,
            no_outlines,
            no_compress,
        } => {
            let mut config = load_config(config.as_deref())?;
            if buffer_pages {
                config.buffer_pages = true;
            }
            if no_outlines {
                config.outlines = false;
            }
            if no_compress {
                config.compress_streams = false;
            }

            build(&input, &output, config, title)?;
            println!("✓ PDF written to {}", output.display());
        }

        Commands::Demo { output, pages } => {
            demo(&output, pages)?;
            println!("✓ Demo PDF written to {}", output.display());
        }
    }

    Ok(())
}
