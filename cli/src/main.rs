//! repdf CLI - Rebuild PDF pages from layout detections

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use repdf::render::{to_json, JsonFormat, RenderReport};
use repdf::{
    BoxDeduplicator, Detections, LayoutLabel, LayoutPage, PageSize, PlacementOutcome, Repdf,
    StyleTable,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "repdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Rebuild PDF pages from layout detections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Layout JSON file (shorthand for `repdf render <FILE>`)
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Options shared by `render` and `batch`.
#[derive(clap::Args, Clone)]
struct PageArgs {
    /// TrueType font used for all styles (falls back to Helvetica)
    #[arg(long, env = "REPDF_FONT")]
    font: Option<PathBuf>,

    /// Target page size: a4, letter or WIDTHxHEIGHT in points
    #[arg(long, env = "REPDF_PAGE", default_value = "a4", value_parser = parse_page_size)]
    page: PageSize,

    /// JSON style sheet overriding the built-in styles
    #[arg(long)]
    style_sheet: Option<PathBuf>,

    /// Outline fitted, fallback and failed regions
    #[arg(long)]
    diagnostics: bool,

    /// Drop regions contained in other regions before rendering
    #[arg(long)]
    dedup: bool,

    /// Document title
    #[arg(long)]
    title: Option<String>,
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            font: None,
            page: PageSize::A4,
            style_sheet: None,
            diagnostics: false,
            dedup: false,
            title: None,
        }
    }
}

impl PageArgs {
    fn builder(&self) -> Repdf {
        let mut builder = Repdf::new()
            .with_page_size(self.page)
            .with_diagnostics(self.diagnostics)
            .with_dedup(self.dedup);
        if let Some(ref font) = self.font {
            builder = builder.with_font(font);
        }
        if let Some(ref sheet) = self.style_sheet {
            builder = builder.with_style_sheet(sheet);
        }
        if let Some(ref title) = self.title {
            builder = builder.with_title(title);
        }
        builder
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render a layout JSON file to a one-page PDF
    Render {
        /// Layout JSON file
        input: PathBuf,

        /// Output PDF file (defaults to the input name with .pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        page: PageArgs,

        /// Write the placement report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Render every layout JSON file in a directory in parallel
    Batch {
        /// Directory with layout JSON files
        input: PathBuf,

        /// Output directory (defaults to the input directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Drop detected regions contained in other regions
    Dedup {
        /// Detections JSON file with `boxes` and `labels`
        input: PathBuf,

        /// Output JSON file (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Containment tolerance in source units
        #[arg(long, default_value_t = 0.0)]
        tolerance: f32,
    },

    /// Show the built-in label styles
    Styles {
        /// Print as a JSON style sheet
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    PageSize::parse(s).map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Render {
            input,
            output,
            page,
            report,
        }) => cmd_render(&input, output.as_deref(), &page, report.as_deref()),
        Some(Commands::Batch {
            input,
            output,
            page,
        }) => cmd_batch(&input, output.as_deref(), &page),
        Some(Commands::Dedup {
            input,
            output,
            tolerance,
        }) => cmd_dedup(&input, output.as_deref(), tolerance),
        Some(Commands::Styles { json }) => cmd_styles(json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: render if input is provided
            if let Some(input) = cli.input {
                cmd_render(&input, cli.output.as_deref(), &PageArgs::default(), None)
            } else {
                println!("{}", "Usage: repdf <LAYOUT.json> [-o OUTPUT.pdf]".yellow());
                println!("       repdf --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    args: &PageArgs,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.with_extension("pdf"));

    let report = args.builder().render_file(input, &output)?;

    print_summary(&report);
    for element in &report.elements {
        if let PlacementOutcome::Skipped { reason } = &element.outcome {
            println!(
                "  {} #{} {} ({:?})",
                "skipped".yellow(),
                element.index,
                element.label,
                reason
            );
        }
    }

    if let Some(path) = report_path {
        fs::write(path, to_json(&report, JsonFormat::Pretty)?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }
    println!("{} {}", "Saved to".green(), output.display());

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    args: &PageArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.unwrap_or(input).to_path_buf();
    fs::create_dir_all(&output_dir)?;

    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        println!("{} {}", "No layout files in".yellow(), input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading layouts...");
    let mut jobs: Vec<(LayoutPage, PathBuf)> = Vec::with_capacity(files.len());
    let mut failures = 0;
    for file in &files {
        match repdf::load_layout(file) {
            Ok(mut page) => {
                if args.dedup {
                    page.dedup();
                }
                let name = file.with_extension("pdf");
                let name = name.file_name().unwrap_or_default();
                jobs.push((page, output_dir.join(name)));
            }
            Err(e) => {
                pb.println(format!("{} {}: {}", "Failed".red(), file.display(), e));
                failures += 1;
            }
        }
        pb.inc(1);
    }

    pb.set_message("Rendering...");
    pb.enable_steady_tick(Duration::from_millis(100));
    let renderer = args.builder().with_dedup(false).build()?;
    let results = renderer.render_batch(&jobs);
    pb.finish_with_message("Done!");

    let mut stats = repdf::RenderStats::new();
    for ((_, path), result) in jobs.iter().zip(results) {
        match result {
            Ok(report) => {
                stats.merge(&report.stats);
                println!("  {} {}", "├─".dimmed(), path.display());
            }
            Err(e) => {
                eprintln!("  {} {}: {}", "Failed".red(), path.display(), e);
                failures += 1;
            }
        }
    }

    println!(
        "\n{} {} pages, {} placed, {} fallback, {} skipped",
        "Done!".green().bold(),
        jobs.len(),
        stats.placed,
        stats.fallback,
        stats.skipped()
    );

    if failures > 0 {
        return Err(format!("{} of {} files failed", failures, files.len()).into());
    }
    Ok(())
}

fn cmd_dedup(
    input: &Path,
    output: Option<&Path>,
    tolerance: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let regions = repdf::load_detections(input)?.into_labeled()?;
    let before = regions.len();

    let kept = BoxDeduplicator::new()
        .with_tolerance(tolerance)
        .dedup(&regions);
    let removed = before - kept.len();

    let detections = Detections {
        boxes: kept.iter().map(|r| r.bbox).collect(),
        labels: kept.into_iter().map(|r| r.label).collect(),
    };
    let json = to_json(&detections, JsonFormat::Pretty)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!(
            "{} {} of {} regions ({} removed)",
            "Kept".green(),
            before - removed,
            before,
            removed
        );
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_styles(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let table = StyleTable::default();

    if json {
        println!("{}", serde_json::to_string_pretty(&table.to_sheet())?);
        return Ok(());
    }

    println!("{}", "Label Styles".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());
    for label in LayoutLabel::KNOWN.iter() {
        let style = table.resolve(label);
        println!(
            "{:>3} {:<16} {:<16} {:>5.1}/{:<5.1} {:?} {}",
            label.id().map(|id| id.to_string()).unwrap_or_default(),
            label.to_string().bold(),
            style.name,
            style.font_size,
            style.leading,
            style.alignment,
            style.color.to_string().dimmed()
        );
    }
    let default = table.default_style();
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "{:>3} {:<16} {:<16} {:>5.1}/{:<5.1}",
        "",
        "(other)".bold(),
        default.name,
        default.font_size,
        default.leading
    );

    Ok(())
}

fn print_summary(report: &RenderReport) {
    let stats = &report.stats;
    println!("{}", "Render Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Page".bold(), report.page_size);
    println!("{}: {}", "Elements".bold(), stats.elements);
    println!("{}: {}", "Placed".bold(), stats.placed.to_string().green());
    println!("{}: {}", "Fallback".bold(), stats.fallback.to_string().yellow());
    println!("{}: {}", "Skipped".bold(), stats.skipped().to_string().red());
    println!("{}: {}", "Shrunk".bold(), stats.shrunk);
    println!("{}: {} bytes", "Size".bold(), report.bytes_written);
}

fn cmd_version() {
    println!("{} {}", "repdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout-driven PDF page rebuilding tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/repdf".dimmed());
    println!("License: MIT");
}
