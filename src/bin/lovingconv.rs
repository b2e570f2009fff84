//! CLI binary for loving-converter.
//!
//! A thin shim over the library crate: one subcommand per tool, each
//! mapping its flags onto the library call and writing the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::try_join_all;
use indicatif::{ProgressBar, ProgressStyle};
use loving_converter::docx::DOCX_MIME;
use loving_converter::output::PDF_MIME;
use loving_converter::pipeline::input::{read_input, read_pdf};
use loving_converter::{
    add_page_numbers, compress_pdf, download_name, images_to_pdf, inspect, merge_pdfs, organize_pdf,
    pdf_to_word_file, protect_pdf, rebuild_via_copy_pages, reorder_pages, repair_pdf, rotate_pdf, split_pdf, split_pdf_with,
    watermark_pdf, CompressionLevel, ConversionProgressCallback, LibreOfficeConverter, LocalWordConverter,
    PageRange, PageSelection, PdfConverter, PdfToWordConfig, ProgressCallback, SplitMode, SplitOptions,
    WatermarkOptions,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── Terminal styling ─────────────────────────────────────────────────────

const GREEN: &str = "32";
const RED: &str = "31";
const YELLOW: &str = "33";
const DIM: &str = "2";
const BOLD: &str = "1";

fn paint(code: &str, s: impl std::fmt::Display) -> String {
    format!("\x1b[{code}m{s}\x1b[0m")
}

const TICKS: &[&str] = &["◐", "◓", "◑", "◒"];

// ── pdf-to-word progress ─────────────────────────────────────────────────

/// Bar over the page count, with a line printed for each failed page.
struct PageProgress {
    bar: ProgressBar,
    started: Instant,
    chars: AtomicUsize,
    images: AtomicUsize,
}

impl PageProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(TICKS),
        );
        bar.set_message("Opening PDF");
        bar.enable_steady_tick(Duration::from_millis(100));
        Arc::new(Self {
            bar,
            started: Instant::now(),
            chars: AtomicUsize::new(0),
            images: AtomicUsize::new(0),
        })
    }
}

impl ConversionProgressCallback for PageProgress {
    fn on_conversion_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.set_style(
            ProgressStyle::with_template("{spinner} {msg:<10} {wide_bar:.magenta/238} {pos}/{len} {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━╸─")
                .tick_strings(TICKS),
        );
        self.bar.set_message("Reading");
    }

    fn on_page_complete(&self, _page_num: usize, _total: usize, chars: usize) {
        if chars == 0 {
            self.images.fetch_add(1, Ordering::Relaxed);
            self.bar.set_message("Rendering");
        } else {
            self.chars.fetch_add(chars, Ordering::Relaxed);
        }
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, _total: usize, error: &str) {
        let short: String = error.chars().take(100).collect();
        self.bar.println(format!("  {} page {page_num}: {}", paint(RED, "✗"), paint(DIM, short)));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let images = self.images.load(Ordering::Relaxed);
        let detail = if images > 0 {
            format!("{images} page images")
        } else {
            format!("{} characters", self.chars.load(Ordering::Relaxed))
        };
        let mark = match total_pages - success_count.min(total_pages) {
            0 => paint(GREEN, "✔"),
            n if n == total_pages => paint(RED, "✘"),
            _ => paint(YELLOW, "!"),
        };
        eprintln!(
            "{mark} {}/{total_pages} pages, {detail} {}",
            paint(BOLD, success_count),
            paint(DIM, format!("in {:.1}s", self.started.elapsed().as_secs_f64())),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Merge in the given order
  lovingconv merge a.pdf b.pdf c.pdf -o all.pdf

  # One file per range, or every 5 pages, or pull pages out into one file
  lovingconv split book.pdf --ranges 1-3,10-12
  lovingconv split book.pdf --every 5 --out-dir parts/
  lovingconv split book.pdf --pages 2,4,6 --merge

  # Compress, rotate, stamp
  lovingconv compress scan.pdf --level extreme
  lovingconv rotate scan.pdf --degrees -90
  lovingconv watermark contract.pdf --text "DRAFT" --opacity 0.2
  lovingconv number report.pdf

  # Conversions
  lovingconv pdf-to-word paper.pdf -o paper.docx
  lovingconv word-to-pdf letter.docx --engine libreoffice
  lovingconv images-to-pdf page1.jpg page2.png -o scans.pdf

  # Metadata only
  lovingconv info document.pdf --json

OUTPUT NAMES:
  Without -o, results are written to the current directory as
  loving-converter-<tool>[_part_<n>].<ext>, e.g. loving-converter-split-pdf_part_2.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to libpdfium (file or directory), needed by pdf-to-word
  LOVINGCONV_ENGINE   Default engine for word-to-pdf (local, libreoffice)
  LOVINGCONV_SOFFICE  LibreOffice binary (default: soffice)
  RUST_LOG            Log filter, overrides -v/-q
"#;

/// Merge, split, compress, rotate, watermark and convert PDF files.
#[derive(Parser, Debug)]
#[command(
    name = "lovingconv",
    version,
    about = "Merge, split, compress, rotate, watermark and convert PDF files",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "LOVINGCONV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "LOVINGCONV_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Combine PDFs in the order given.
    Merge {
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,
        #[arg(short, long, env = "LOVINGCONV_OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Split a PDF into several files.
    ///
    /// Without --ranges, --every or --pages every page becomes its own file.
    Split {
        input: PathBuf,
        /// Custom ranges, e.g. 1-3,5,8-10.
        #[arg(long, group = "split_mode")]
        ranges: Option<String>,
        /// Fixed-size chunks of this many pages.
        #[arg(long, group = "split_mode")]
        every: Option<u32>,
        /// Pages to extract: all, 5, 3-15 or 1,3,5.
        #[arg(long, group = "split_mode")]
        pages: Option<String>,
        /// Write all selected pages into a single file.
        #[arg(long, requires = "split_mode")]
        merge: bool,
        /// Directory for the output files.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Reduce file size.
    Compress {
        input: PathBuf,
        #[arg(long, value_enum, default_value = "recommended")]
        level: LevelArg,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rotate every page.
    Rotate {
        input: PathBuf,
        /// Multiple of 90; negative values rotate anticlockwise.
        #[arg(long, default_value_t = 90, allow_hyphen_values = true)]
        degrees: i64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Stamp semi-transparent text across every page.
    Watermark {
        input: PathBuf,
        #[arg(long, default_value = "LOVING CONVERTER")]
        text: String,
        #[arg(long, default_value_t = 50.0)]
        font_size: f32,
        #[arg(long, default_value_t = 0.3)]
        opacity: f32,
        #[arg(long, default_value_t = 45.0, allow_hyphen_values = true)]
        angle: f32,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Add "Page i of n" to the bottom of every page.
    Number {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-save a damaged PDF.
    Repair {
        input: PathBuf,
        /// Rebuild the page tree from scratch instead of a plain re-save.
        #[arg(long)]
        rebuild: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Reorder pages. Without --order the first page moves to the end.
    Organize {
        input: PathBuf,
        /// New page order, e.g. 3,1,2.
        #[arg(long)]
        order: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Mark a PDF as protected in its document info.
    Protect {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// One A4 page per image.
    ImagesToPdf {
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert a Word document to PDF.
    WordToPdf {
        input: PathBuf,
        #[arg(long, value_enum, default_value = "local", env = "LOVINGCONV_ENGINE")]
        engine: EngineArg,
        /// LibreOffice binary for --engine libreoffice.
        #[arg(long, default_value = "soffice", env = "LOVINGCONV_SOFFICE")]
        soffice: String,
        /// Seconds before LibreOffice is killed.
        #[arg(long, default_value_t = 120)]
        timeout: u64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert a PDF to an editable Word document.
    PdfToWord {
        input: PathBuf,
        /// Render scale for pages without text (0.5–4.0).
        #[arg(long, env = "LOVINGCONV_SCALE", default_value_t = 2.0)]
        scale: f32,
        /// JPEG quality for rendered pages (1–100).
        #[arg(long, env = "LOVINGCONV_QUALITY", default_value_t = 92)]
        quality: u8,
        /// Split paragraphs where the line gap exceeds this multiple of
        /// the page's median gap, e.g. 1.5. Off by default.
        #[arg(long)]
        gap_ratio: Option<f32>,
        /// PDF user password for encrypted documents.
        #[arg(long, env = "LOVINGCONV_PASSWORD")]
        password: Option<String>,
        /// Disable progress bar.
        #[arg(long, env = "LOVINGCONV_NO_PROGRESS")]
        no_progress: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print PDF metadata.
    Info {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LevelArg {
    Extreme,
    Recommended,
    Low,
}

impl From<LevelArg> for CompressionLevel {
    fn from(v: LevelArg) -> Self {
        match v {
            LevelArg::Extreme => CompressionLevel::Extreme,
            LevelArg::Recommended => CompressionLevel::Recommended,
            LevelArg::Low => CompressionLevel::Low,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum EngineArg {
    Local,
    Libreoffice,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs for pdf-to-word.
    let bar_active = matches!(cli.command, Command::PdfToWord { no_progress: false, .. }) && !cli.quiet;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || bar_active {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let quiet = cli.quiet;
    match cli.command {
        Command::Merge { inputs, output } => {
            let files = read_all(&inputs).await?;
            let refs: Vec<&[u8]> = files.iter().map(Vec::as_slice).collect();
            let pdf = merge_pdfs(&refs).context("Merge failed")?;
            finish(output, "Merge PDF", &pdf, quiet).await?;
        }
        Command::Split {
            input,
            ranges,
            every,
            pages,
            merge,
            out_dir,
        } => {
            let bytes = read_one(&input).await?;
            let parts = if let Some(ranges) = ranges {
                split_pdf_with(&bytes, &SplitOptions::ranges(parse_ranges(&ranges)?, merge))
            } else if let Some(n) = every {
                split_pdf_with(
                    &bytes,
                    &SplitOptions {
                        mode: SplitMode::FixedRanges(n),
                        merge_ranges: merge,
                    },
                )
            } else if let Some(pages) = pages {
                split_pdf_with(
                    &bytes,
                    &SplitOptions {
                        mode: SplitMode::Extract(parse_pages(&pages)?),
                        merge_ranges: merge,
                    },
                )
            } else {
                split_pdf(&bytes)
            }
            .context("Split failed")?;

            tokio::fs::create_dir_all(&out_dir)
                .await
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
            let single = parts.len() == 1;
            for (i, part) in parts.iter().enumerate() {
                let name = download_name("Split PDF", (!single).then_some(i + 1), PDF_MIME);
                write_file(&out_dir.join(name), part, quiet).await?;
            }
        }
        Command::Compress { input, level, output } => {
            let bytes = read_one(&input).await?;
            let pdf = compress_pdf(&bytes, level.into()).context("Compression failed")?;
            if !quiet {
                eprintln!("   {} → {} bytes", paint(DIM, bytes.len()), paint(BOLD, pdf.len()));
            }
            finish(output, "Compress PDF", &pdf, quiet).await?;
        }
        Command::Rotate { input, degrees, output } => {
            let bytes = read_one(&input).await?;
            let pdf = rotate_pdf(&bytes, degrees).context("Rotation failed")?;
            finish(output, "Rotate PDF", &pdf, quiet).await?;
        }
        Command::Watermark {
            input,
            text,
            font_size,
            opacity,
            angle,
            output,
        } => {
            let options = WatermarkOptions::builder()
                .text(text)
                .font_size(font_size)
                .opacity(opacity)
                .angle_degrees(angle)
                .build()
                .context("Invalid watermark options")?;
            let bytes = read_one(&input).await?;
            let pdf = watermark_pdf(&bytes, &options).context("Watermarking failed")?;
            finish(output, "Watermark", &pdf, quiet).await?;
        }
        Command::Number { input, output } => {
            let bytes = read_one(&input).await?;
            let pdf = add_page_numbers(&bytes).context("Numbering failed")?;
            finish(output, "Page Numbers", &pdf, quiet).await?;
        }
        Command::Repair { input, rebuild, output } => {
            let bytes = read_input(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let pdf = if rebuild {
                rebuild_via_copy_pages(&bytes)
            } else {
                repair_pdf(&bytes)
            }
            .context("Repair failed")?;
            finish(output, "Repair PDF", &pdf, quiet).await?;
        }
        Command::Organize { input, order, output } => {
            let bytes = read_one(&input).await?;
            let pdf = match order {
                Some(order) => reorder_pages(&bytes, &parse_order(&order)?),
                None => organize_pdf(&bytes),
            }
            .context("Reordering failed")?;
            finish(output, "Organize PDF", &pdf, quiet).await?;
        }
        Command::Protect { input, output } => {
            let bytes = read_one(&input).await?;
            let pdf = protect_pdf(&bytes).context("Protect failed")?;
            finish(output, "Protect PDF", &pdf, quiet).await?;
        }
        Command::ImagesToPdf { inputs, output } => {
            let files = read_all(&inputs).await?;
            let refs: Vec<&[u8]> = files.iter().map(Vec::as_slice).collect();
            let pdf = images_to_pdf(&refs).context("Image conversion failed")?;
            finish(output, "JPG to PDF", &pdf, quiet).await?;
        }
        Command::WordToPdf {
            input,
            engine,
            soffice,
            timeout,
            output,
        } => {
            let bytes = read_input(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let backend: Box<dyn PdfConverter> = match engine {
                EngineArg::Local => Box::new(LocalWordConverter),
                EngineArg::Libreoffice => Box::new(LibreOfficeConverter::new(soffice).with_timeout_secs(timeout)),
            };
            let filename = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document.docx".to_string());
            let pdf = backend
                .to_pdf(&bytes, &filename)
                .await
                .with_context(|| format!("Conversion with the {} engine failed", backend.name()))?;
            finish(output, "Word to PDF", &pdf, quiet).await?;
        }
        Command::PdfToWord {
            input,
            scale,
            quality,
            gap_ratio,
            password,
            no_progress,
            output,
        } => {
            let progress: Option<ProgressCallback> = if !quiet && !no_progress {
                Some(PageProgress::new() as Arc<dyn ConversionProgressCallback>)
            } else {
                None
            };
            let mut builder = PdfToWordConfig::builder()
                .render_scale(scale)
                .jpeg_quality(quality)
                .paragraph_gap_ratio(gap_ratio);
            if let Some(pwd) = password {
                builder = builder.password(pwd);
            }
            if let Some(cb) = progress {
                builder = builder.progress_callback(cb);
            }
            let config = builder.build().context("Invalid configuration")?;

            let output_path = output.unwrap_or_else(|| PathBuf::from(download_name("PDF to Word", None, DOCX_MIME)));
            let stats = pdf_to_word_file(&input, &output_path, &config)
                .await
                .context("Conversion failed")?;

            if !quiet {
                eprintln!(
                    "{}  {}  {}",
                    paint(GREEN, "→"),
                    paint(BOLD, output_path.display()),
                    paint(DIM, format!("{} ms", stats.total_duration_ms)),
                );
                if stats.repaired {
                    eprintln!("   {}", paint(DIM, "input was rebuilt before it could be read"));
                }
            }
        }
        Command::Info { input, json } => {
            let meta = inspect(&input).await.context("Failed to inspect PDF")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
                );
            } else {
                let rows = [
                    ("File", Some(input.display().to_string())),
                    ("Title", meta.title),
                    ("Author", meta.author),
                    ("Subject", meta.subject),
                    ("Pages", Some(meta.page_count.to_string())),
                    ("Version", Some(meta.pdf_version)),
                    ("Encrypted", Some(if meta.is_encrypted { "yes" } else { "no" }.to_string())),
                    ("Creator", meta.creator),
                    ("Producer", meta.producer),
                ];
                for (label, value) in rows {
                    if let Some(value) = value {
                        println!("{:<10} {value}", paint(BOLD, label));
                    }
                }
            }
        }
    }

    Ok(())
}

// ── I/O helpers ──────────────────────────────────────────────────────────

async fn read_one(path: &Path) -> Result<Vec<u8>> {
    read_pdf(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Read every input concurrently, keeping the given order.
async fn read_all(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    try_join_all(paths.iter().map(|path| async move {
        read_input(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }))
    .await
}

/// Write a single PDF result to `output` or to its default name.
async fn finish(output: Option<PathBuf>, tool: &str, pdf: &[u8], quiet: bool) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(download_name(tool, None, PDF_MIME)));
    write_file(&path, pdf, quiet).await
}

async fn write_file(path: &Path, data: &[u8], quiet: bool) -> Result<()> {
    tokio::fs::write(path, data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    if !quiet {
        eprintln!(
            "{}  {}  {}",
            paint(GREEN, "✔"),
            paint(BOLD, path.display()),
            paint(DIM, format!("{} bytes", data.len()))
        );
    }
    Ok(())
}

// ── Argument parsing ─────────────────────────────────────────────────────

/// Parse `--ranges` (`1-3,5,8-10`). Bounds are clamped later, so only the
/// syntax is checked here.
fn parse_ranges(s: &str) -> Result<Vec<PageRange>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('-') {
            Some((from, to)) => {
                let from: u32 = from.trim().parse().with_context(|| format!("Invalid range start in '{part}'"))?;
                let to: u32 = to.trim().parse().with_context(|| format!("Invalid range end in '{part}'"))?;
                Ok(PageRange::new(from, to))
            }
            None => {
                let page: u32 = part.parse().with_context(|| format!("Invalid page number: '{part}'"))?;
                Ok(PageRange::new(page, page))
            }
        })
        .collect()
}

/// Parse `--pages`: `all`, `5`, `3-15` or `1,3,5`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("all") {
        return Ok(PageSelection::All);
    }
    if s.contains(',') {
        let pages = parse_page_list(s)?;
        return Ok(PageSelection::Set(pages.into_iter().map(|p| p as usize).collect()));
    }
    match s.split_once('-') {
        Some((from, to)) => {
            let range = parse_page_list(&format!("{from},{to}"))?;
            let (from, to) = (range[0] as usize, range[1] as usize);
            if from > to {
                anyhow::bail!("Page range '{s}' runs backwards");
            }
            Ok(PageSelection::Range(from, to))
        }
        None => Ok(PageSelection::Single(parse_page_list(s)?[0] as usize)),
    }
}

/// Parse `--order` (`3,1,2`).
fn parse_order(s: &str) -> Result<Vec<u32>> {
    parse_page_list(s)
}

fn parse_page_list(s: &str) -> Result<Vec<u32>> {
    let pages: Vec<u32> = s
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid page number: '{}'", p.trim()))
        })
        .collect::<Result<Vec<_>>>()?;
    if pages.contains(&0) {
        anyhow::bail!("Page numbers start at 1");
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ranges() {
        let ranges = parse_ranges("1-3, 5,8-10").unwrap();
        assert_eq!(
            ranges,
            vec![PageRange::new(1, 3), PageRange::new(5, 5), PageRange::new(8, 10)]
        );
        assert!(parse_ranges("a-3").is_err());
    }

    #[test]
    fn test_parse_pages() {
        assert!(matches!(parse_pages("all").unwrap(), PageSelection::All));
        assert!(matches!(parse_pages("3-5").unwrap(), PageSelection::Range(3, 5)));
        assert!(matches!(parse_pages("7").unwrap(), PageSelection::Single(7)));
        match parse_pages("1,3,5").unwrap() {
            PageSelection::Set(pages) => assert_eq!(pages, vec![1, 3, 5]),
            other => panic!("unexpected {other:?}"),
        }
        assert!(parse_pages("5-3").is_err());
        assert!(parse_pages("0").is_err());
    }

    #[test]
    fn test_parse_order() {
        assert_eq!(parse_order("3,1,2").unwrap(), vec![3, 1, 2]);
        assert!(parse_order("0,1").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["lovingconv", "rotate", "in.pdf", "--degrees", "-90"]).unwrap();
        assert!(matches!(cli.command, Command::Rotate { degrees: -90, .. }));

        let cli = Cli::try_parse_from(["lovingconv", "split", "in.pdf", "--every", "2", "--merge"]).unwrap();
        assert!(matches!(cli.command, Command::Split { every: Some(2), merge: true, .. }));
    }

    #[test]
    fn test_split_merge_needs_a_mode() {
        let err = Cli::try_parse_from(["lovingconv", "split", "in.pdf", "--merge"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["lovingconv", "split", "in.pdf", "--ranges", "1-2", "--every", "2"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let cli = Cli::try_parse_from(["lovingconv", "split", "in.pdf"]).unwrap();
        assert!(matches!(cli.command, Command::Split { merge: false, ranges: None, .. }));
    }

    #[test]
    fn test_paragraph_detection_is_opt_in() {
        let cli = Cli::try_parse_from(["lovingconv", "pdf-to-word", "in.pdf"]).unwrap();
        assert!(matches!(cli.command, Command::PdfToWord { gap_ratio: None, .. }));

        let cli = Cli::try_parse_from(["lovingconv", "pdf-to-word", "in.pdf", "--gap-ratio", "1.5"]).unwrap();
        assert!(matches!(cli.command, Command::PdfToWord { gap_ratio: Some(r), .. } if r == 1.5));
    }
}
