use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use splitpdf::output::{write_selection_to_dir, write_split_to_dir};
use splitpdf::{parse_page_list, OutputNaming, SourceDocument, SplitMode};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "splitpdf",
    about = "Split PDF documents into single pages or page selections",
    version,
    author
)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every page to its own file under "Payslips DD-MM-YYYY"
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Suffix used instead of today's date in page filenames
        #[arg(short, long)]
        name: Option<String>,

        /// Directory that receives the dated folder (defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Write one PDF holding only the listed pages, in the order given
    Select {
        /// Input PDF file
        input: PathBuf,

        /// Pages to keep (e.g., "2,4,6-8")
        #[arg(short, long)]
        pages: String,

        /// Output filename (defaults to "selected-<input name>")
        #[arg(short, long)]
        name: Option<String>,

        /// Output directory (defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Write one PDF without the listed pages
    Delete {
        /// Input PDF file
        input: PathBuf,

        /// Pages to drop (e.g., "1,3-4")
        #[arg(short, long)]
        pages: String,

        /// Output filename (defaults to "deleted-<input name>")
        #[arg(short, long)]
        name: Option<String>,

        /// Output directory (defaults to the current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Get information about a PDF file
    Info {
        /// Input PDF file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Split {
            input,
            name,
            output_dir,
        } => {
            let document = open(&input)?;
            let naming = naming_for(&input, name.as_deref());
            let base_dir = output_dir.unwrap_or_else(|| PathBuf::from("."));

            let written = write_split_to_dir(&document, &base_dir, &naming)
                .with_context(|| format!("Failed to split {}", input.display()))?;

            let dir = base_dir.join(naming.output_dir_name());
            println!(
                "Split {} into {} file(s) in {}",
                input.display(),
                written.len(),
                dir.display()
            );
        }

        Commands::Select {
            input,
            pages,
            name,
            output_dir,
        } => {
            run_selection(SplitMode::Select, &input, &pages, name, output_dir)?;
        }

        Commands::Delete {
            input,
            pages,
            name,
            output_dir,
        } => {
            run_selection(SplitMode::Delete, &input, &pages, name, output_dir)?;
        }

        Commands::Info { input } => {
            let document = open(&input)?;

            println!("PDF Information for: {}", input.display());
            println!("==========================================");
            println!("PDF Version: {}", document.version());
            if let Some(title) = document.title() {
                println!("Title: {title}");
            }
            println!("Pages: {}", document.page_count());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open(input: &Path) -> Result<SourceDocument> {
    let document = SourceDocument::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    debug!(pages = document.page_count(), "Opened {}", input.display());
    Ok(document)
}

fn naming_for(input: &Path, name: Option<&str>) -> OutputNaming {
    let original = input.file_name().map(|n| n.to_string_lossy().into_owned());
    OutputNaming::today()
        .with_custom_name(name)
        .with_original_filename(original.as_deref())
}

fn run_selection(
    mode: SplitMode,
    input: &Path,
    pages: &str,
    name: Option<String>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let page_numbers = parse_page_list(pages).context("Invalid page list")?;
    let document = open(input)?;
    let naming = naming_for(input, name.as_deref());
    let dir = output_dir.unwrap_or_else(|| PathBuf::from("."));

    let path = write_selection_to_dir(&document, mode, &page_numbers, &dir, &naming)
        .with_context(|| format!("Failed to process {}", input.display()))?;

    println!("Wrote {}", path.display());
    Ok(())
}
