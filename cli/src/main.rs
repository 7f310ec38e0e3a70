//! pagesift CLI - PDF body-text extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagesift::{
    ExtractOptions, ExtractionReport, Extractor, FilterStrategy, PageSelection, PageSource,
    PdfPageSource,
};

#[derive(Parser)]
#[command(name = "pagesift")]
#[command(version)]
#[command(about = "Extract body text from PDFs, dropping headers and footers", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, env = "PAGESIFT_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract body text into a single file
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output text file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Lines above this fraction of the page height are headers
        #[arg(long, default_value = "0.2", value_parser = parse_fraction, env = "PAGESIFT_HEADER_THRESHOLD")]
        header_threshold: f32,

        /// Lines below this fraction of the page height are footers
        #[arg(long, default_value = "0.8", value_parser = parse_fraction, env = "PAGESIFT_FOOTER_THRESHOLD")]
        footer_threshold: f32,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Split body text into one file per detected section
    ExtractSegmented {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(value_name = "DIR")]
        output_dir: PathBuf,

        /// Footer detection strategy
        #[arg(long, value_enum, default_value = "keyword", env = "PAGESIFT_FILTER")]
        filter: FilterMode,

        /// Lines containing this text are dropped (keyword filter)
        #[arg(long, default_value = pagesift::parser::DEFAULT_FOOTER_KEYWORD, env = "PAGESIFT_FOOTER_KEYWORD")]
        footer_keyword: String,

        /// Header band fraction (band filter)
        #[arg(long, default_value = "0.2", value_parser = parse_fraction, env = "PAGESIFT_HEADER_THRESHOLD")]
        header_threshold: f32,

        /// Footer band fraction (band filter)
        #[arg(long, default_value = "0.8", value_parser = parse_fraction, env = "PAGESIFT_FOOTER_THRESHOLD")]
        footer_threshold: f32,

        /// Title area fraction (reserved)
        #[arg(long, default_value = "0.15", value_parser = parse_fraction, env = "PAGESIFT_TITLE_THRESHOLD")]
        title_threshold: f32,

        /// Marker that identifies the author line under a title
        #[arg(long, default_value = pagesift::parser::DEFAULT_AUTHOR_MARKER, env = "PAGESIFT_AUTHOR_MARKER")]
        author_marker: String,

        /// Leading lines of a page searched for a heading
        #[arg(long, default_value = "4", env = "PAGESIFT_HEADING_LINES")]
        heading_lines: usize,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

/// Options shared by both extraction modes.
#[derive(Args)]
struct CommonArgs {
    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Process pages in parallel
    #[arg(long, env = "PAGESIFT_PARALLEL")]
    parallel: bool,

    /// Apply Unicode NFC normalization
    #[arg(long, env = "PAGESIFT_NFC")]
    nfc: bool,

    /// Write a JSON run report to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

impl CommonArgs {
    fn apply(&self, options: ExtractOptions) -> Result<ExtractOptions, pagesift::Error> {
        let mut options = options
            .with_parallel(self.parallel)
            .with_unicode_normalization(self.nfc);
        if let Some(ref pages) = self.pages {
            options = options.with_pages(PageSelection::parse(pages)?);
        }
        Ok(options)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterMode {
    /// Drop lines containing the footer keyword
    Keyword,
    /// Drop lines outside the header/footer band
    Band,
}

fn parse_fraction(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("{} is not between 0 and 1", value))
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(cli.debug)))
        .init();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            header_threshold,
            footer_threshold,
            common,
        } => cmd_extract(&input, &output, header_threshold, footer_threshold, &common),
        Commands::ExtractSegmented {
            input,
            output_dir,
            filter,
            footer_keyword,
            header_threshold,
            footer_threshold,
            title_threshold,
            author_marker,
            heading_lines,
            common,
        } => {
            let filter = match filter {
                FilterMode::Keyword => FilterStrategy::keyword(footer_keyword),
                FilterMode::Band => FilterStrategy::band(header_threshold, footer_threshold),
            };
            let options = ExtractOptions::segmented()
                .with_filter(filter)
                .with_title_threshold(title_threshold)
                .with_author_marker(author_marker)
                .with_heading_lines(heading_lines);
            cmd_extract_segmented(&input, &output_dir, options, &common)
        }
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    input: &Path,
    output: &Path,
    header: f32,
    footer: f32,
    common: &CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = common.apply(ExtractOptions::flat().with_filter(FilterStrategy::band(header, footer)))?;
    let report = run(input, options, common)?;
    write_report(&report, common)?;

    let text = report.flat_text().ok_or(pagesift::Error::NoTextExtracted)?;
    pagesift::render::write_flat(output, &text)?;

    print_summary(&report);
    println!("\n{}", "Output file:".green().bold());
    println!("  {} {}", "└─".dimmed(), output.display());
    Ok(())
}

fn cmd_extract_segmented(
    input: &Path,
    output_dir: &Path,
    options: ExtractOptions,
    common: &CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = common.apply(options)?;
    let report = run(input, options, common)?;
    write_report(&report, common)?;

    let files = pagesift::render::write_sections(output_dir, &report.sections)?;

    print_summary(&report);
    println!("\n{}", "Output files:".green().bold());
    for (i, path) in files.iter().enumerate() {
        let branch = if i + 1 == files.len() { "└─" } else { "├─" };
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        println!("  {} {}", branch.dimmed(), name);
    }
    if files.is_empty() {
        println!("  {}", "(no section contained text)".yellow());
    }
    Ok(())
}

/// Validate options, open the document and run the extractor with a
/// progress bar.
fn run(
    input: &Path,
    options: ExtractOptions,
    common: &CommonArgs,
) -> Result<ExtractionReport, pagesift::Error> {
    options.validate()?;
    log::debug!("Extract options: {:?}", options);
    let source = PdfPageSource::open(input)?;
    let extractor = Extractor::new(source, options)?;

    let pb = if common.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let report = extractor.run_with_progress(|done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    });
    pb.finish_and_clear();
    Ok(report)
}

/// Default log filter when `RUST_LOG` is unset.
fn log_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

fn write_report(report: &ExtractionReport, common: &CommonArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(ref path) = common.report {
        let json = report.to_json()?;
        fs::write(path, json).map_err(|e| pagesift::Error::output(path, e))?;
        log::info!("Run report written to {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &ExtractionReport) {
    println!(
        "{}: {} of {} pages kept",
        "Extracted".green().bold(),
        report.kept_count(),
        report.pages.len()
    );

    let failed = report.failed_pages();
    if !failed.is_empty() {
        let list: Vec<String> = failed.iter().map(u32::to_string).collect();
        println!("{}: {}", "Skipped pages".yellow().bold(), list.join(", "));
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = PdfPageSource::open(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), source.version());
    println!("{}: {}", "Pages".bold(), source.page_count());

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let mut total_words = 0;
    for number in 1..=source.page_count() {
        match source.page(number) {
            Ok(page) => {
                let words = page.text().split_whitespace().count();
                total_words += words;
                println!(
                    "{:>5}: {} lines, {} words, height {:.0}",
                    number,
                    page.lines.len(),
                    words,
                    page.height
                );
            }
            Err(e) => println!("{:>5}: {}", number, e.to_string().red()),
        }
    }

    println!();
    println!("{}: {}", "Words".bold(), total_words);
    Ok(())
}
