//! unexam CLI - exam booklet slicing tool

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unexam::backend::{bind_pdfium, PdfiumBackend};
use unexam::config::{DEFAULT_DATA_DIR, DEFAULT_IMAGE_DIR};
use unexam::output::DEFAULT_BASE_URL;
use unexam::render::{to_json, JsonFormat};
use unexam::{
    ensure_pdf, ExamConfig, GateStandardParser, JobOutcome, JobQueue, OutputStore, ParserRegistry,
    PdfBackend, Unexam, DEFAULT_PARSER,
};

#[derive(Parser)]
#[command(name = "unexam")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Slice exam booklet PDFs into question images and JSON", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a booklet and write question images and exam_data.json
    Process {
        /// Input PDF file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Directory for question images
        #[arg(long, value_name = "DIR", default_value = DEFAULT_IMAGE_DIR, env = "UNEXAM_OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Directory for exam_data.json
        #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIR, env = "UNEXAM_DATA_DIR")]
        data_dir: PathBuf,

        /// Booklet layout parser
        #[arg(long, default_value = DEFAULT_PARSER)]
        parser: String,
    },

    /// Print the persisted exam with image URLs
    Show {
        /// Directory holding exam_data.json
        #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIR, env = "UNEXAM_DATA_DIR")]
        data_dir: PathBuf,

        /// Directory holding question images
        #[arg(long, value_name = "DIR", default_value = DEFAULT_IMAGE_DIR, env = "UNEXAM_OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Public address images are served from
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the text layout and question ranges of a booklet
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Process several booklets one after another through the job queue
    Queue {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for question images
        #[arg(long, value_name = "DIR", default_value = DEFAULT_IMAGE_DIR)]
        output_dir: PathBuf,

        /// Directory for exam_data.json
        #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// Print one JSON report per job
        #[arg(long)]
        json: bool,
    },

    /// List available parsers
    Parsers,

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Process {
            input,
            output_dir,
            data_dir,
            parser,
        }) => cmd_process(&input, output_dir, data_dir, &parser),
        Some(Commands::Show {
            data_dir,
            output_dir,
            base_url,
            compact,
        }) => cmd_show(output_dir, data_dir, &base_url, compact),
        Some(Commands::Inspect { input }) => cmd_inspect(&input),
        Some(Commands::Queue {
            inputs,
            output_dir,
            data_dir,
            json,
        }) => cmd_queue(inputs, output_dir, data_dir, json),
        Some(Commands::Parsers) => {
            cmd_parsers();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: process with default directories
            if let Some(input) = cli.input {
                cmd_process(
                    &input,
                    PathBuf::from(DEFAULT_IMAGE_DIR),
                    PathBuf::from(DEFAULT_DATA_DIR),
                    DEFAULT_PARSER,
                )
            } else {
                println!("{}", "Usage: unexam <FILE>".yellow());
                println!("       unexam --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn spinner(message: &str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn cmd_process(
    input: &Path,
    output_dir: PathBuf,
    data_dir: PathBuf,
    parser: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let unexam = Unexam::new()
        .with_parser(parser)
        .with_image_dir(output_dir)
        .with_data_dir(data_dir);
    let config = unexam.config_for(input);

    let pb = spinner(&format!("Processing {}...", input.display()))?;
    let result = unexam.process(input);
    pb.finish_and_clear();
    let exam = result?;

    println!(
        "{} {} questions ({} marks) from {}",
        "Done!".green().bold(),
        exam.question_count(),
        exam.total_marks(),
        input.display()
    );
    println!("  {} {}", "├─".dimmed(), config.image_dir.display());
    println!("  {} {}", "└─".dimmed(), config.exam_data_path().display());

    if exam.questions.is_empty() {
        println!("{}", "No question markers found".yellow());
    }

    Ok(())
}

fn cmd_show(
    output_dir: PathBuf,
    data_dir: PathBuf,
    base_url: &str,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ExamConfig::default()
        .with_image_dir(output_dir)
        .with_data_dir(data_dir);
    let exam = OutputStore::new(&config).load_for_serving(base_url)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    println!("{}", to_json(&exam, format)?);

    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = ensure_pdf(input)?;
    let pdfium = bind_pdfium()?;
    let backend = PdfiumBackend::open(&pdfium, input)?;
    let analysis = GateStandardParser::new().analyze(&backend)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Pages".bold(), backend.page_count());
    println!("{}: {}", "Lines".bold(), analysis.lines.len());
    println!("{}: {}", "Questions".bold(), analysis.ranges.len());

    println!();
    println!("{}", "Lines".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for line in &analysis.lines {
        println!(
            "{} {:>7.1}  {}",
            format!("p{}", line.page + 1).dimmed(),
            line.top,
            line.text
        );
    }

    println!();
    println!("{}", "Questions".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for range in &analysis.ranges {
        let regions = analysis.question_regions(range);
        let pages: Vec<String> = regions.iter().map(|r| (r.page + 1).to_string()).collect();
        let marker = range
            .marker
            .map(|m| format!("Q #{}", m))
            .unwrap_or_else(|| "Q #?".to_string());
        println!(
            "{:>4}  {}  {} lines, pages {}",
            range.id,
            marker.bold(),
            range.len(),
            pages.join(",")
        );
    }

    Ok(())
}

fn cmd_queue(
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    data_dir: PathBuf,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = ExamConfig::default()
        .with_image_dir(output_dir)
        .with_data_dir(data_dir);
    let input_dir = std::env::current_dir()?;
    let mut queue = JobQueue::with_pdfium(input_dir, template)?;

    let handles = inputs
        .into_iter()
        .map(|input| queue.submit(input))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Queued {} job(s)", handles.len());

    let mut failed = 0;
    for handle in handles {
        let report = handle.wait()?;
        if json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            match &report.outcome {
                JobOutcome::Completed { questions } => println!(
                    "{} #{} {} ({} questions)",
                    "OK".green().bold(),
                    report.id,
                    report.input.display(),
                    questions
                ),
                JobOutcome::Failed { message } => println!(
                    "{} #{} {}: {}",
                    "FAILED".red().bold(),
                    report.id,
                    report.input.display(),
                    message
                ),
            }
        }
        if !report.is_success() {
            failed += 1;
        }
    }
    queue.shutdown()?;

    if failed > 0 {
        return Err(format!("{} job(s) failed", failed).into());
    }
    Ok(())
}

fn cmd_parsers() {
    println!("{}", "Available parsers".cyan().bold());
    for parser in ParserRegistry::with_defaults().parsers() {
        println!("  {}  {}", parser.name().bold(), parser.description().dimmed());
    }
}

fn cmd_version() {
    println!("{} {}", "unexam".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Exam booklet slicing tool");
    println!();
    println!("License: MIT");
}
