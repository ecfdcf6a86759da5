//! skimpdf CLI - PDF outline extraction and persona-driven ranking

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use skimpdf::{
    batch, document_info, run_ranking, ExtractOptions, OcrOptions, PersonaQuery, RankOptions,
};

#[derive(Parser)]
#[command(name = "skimpdf")]
#[command(version)]
#[command(about = "Extract heading outlines from PDFs and rank sections by persona relevance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract heading outlines for every PDF in a directory
    Outline {
        /// Directory of input PDFs
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output directory for the per-document JSON artifacts
        #[arg(short, long, value_name = "DIR", default_value = "outlines")]
        output: PathBuf,

        /// Tesseract language set for the OCR fallback
        #[arg(long, value_name = "LANGS", env = "SKIMPDF_OCR_LANGS")]
        ocr_langs: Option<String>,

        /// Rasterization DPI for the OCR fallback
        #[arg(long, value_name = "DPI", default_value = "300")]
        ocr_dpi: u32,
    },

    /// Rank extracted sections against a persona and task
    Rank {
        /// Directory of outline JSON artifacts
        #[arg(value_name = "JSON_DIR")]
        json_dir: PathBuf,

        /// Directory of the companion PDFs
        #[arg(long, value_name = "DIR")]
        pdf_dir: PathBuf,

        /// Who is reading (role, expertise)
        #[arg(long, value_name = "TEXT")]
        persona: String,

        /// What the reader is trying to accomplish
        #[arg(long, value_name = "TEXT")]
        task: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Sections kept in the ranked list
        #[arg(long, value_name = "N", default_value = "10")]
        top_n: usize,

        /// Leading ranks that receive a refined excerpt
        #[arg(long, value_name = "N", default_value = "10")]
        refine_top: usize,

        /// Chunks joined into each refined excerpt
        #[arg(long, value_name = "M", default_value = "3")]
        max_chunks: usize,
    },

    /// Show document diagnostics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            ocr_langs,
            ocr_dpi,
        } => cmd_outline(&input, &output, ocr_langs, ocr_dpi),
        Commands::Rank {
            json_dir,
            pdf_dir,
            persona,
            task,
            output,
            top_n,
            refine_top,
            max_chunks,
        } => cmd_rank(
            &json_dir,
            &pdf_dir,
            &persona,
            &task,
            output.as_deref(),
            RankOptions {
                top_n,
                refine_top,
                max_chunks,
            },
        ),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn extract_options(ocr_langs: Option<String>, ocr_dpi: u32) -> ExtractOptions {
    let mut ocr = OcrOptions {
        dpi: ocr_dpi,
        ..Default::default()
    };
    if let Some(langs) = ocr_langs {
        ocr.languages = langs;
    }
    ExtractOptions {
        ocr,
        ..Default::default()
    }
}

fn cmd_outline(
    input: &Path,
    output: &Path,
    ocr_langs: Option<String>,
    ocr_dpi: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = batch::pdf_files(input)?;
    if inputs.is_empty() {
        println!("{}", "No PDF files found.".yellow());
        return Ok(());
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Extracting outlines...");

    let options = extract_options(ocr_langs, ocr_dpi);
    let results = batch::extract_directory(input, output, &options, || pb.inc(1))?;
    pb.finish_with_message("Done!");

    println!("\n{}", "Extraction results:".green().bold());
    for result in &results {
        let name = result.input.file_name().unwrap_or_default().to_string_lossy();
        match &result.error {
            None => println!(
                "  {} {} — {} headings ({})",
                "✓".green(),
                name,
                result.headings,
                result.title.dimmed()
            ),
            Some(e) => println!("  {} {} — {}", "✗".red(), name, e),
        }
    }

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        println!(
            "\n{} {} of {} documents failed",
            "Warning:".yellow().bold(),
            failed,
            results.len()
        );
    }

    Ok(())
}

fn cmd_rank(
    json_dir: &Path,
    pdf_dir: &Path,
    persona: &str,
    task: &str,
    output: Option<&Path>,
    options: RankOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = PersonaQuery::new(persona, task);
    let run = run_ranking(json_dir, pdf_dir, &query, &options)?;

    let json = serde_json::to_string_pretty(&run)?;
    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    println!(
        "\n{} {} documents, {} sections, {} excerpts",
        "Ranked:".green().bold(),
        run.metadata.input_documents.len(),
        run.extracted_sections.len(),
        run.sub_section_analysis.len()
    );

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let info = document_info(input, &ExtractOptions::default())?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), info.pdf_version);
    println!("{}: {}", "Pages".bold(), info.pages);
    println!(
        "{}: {}",
        "Scanned".bold(),
        if info.scanned { "Yes" } else { "No" }
    );
    println!("{}: {}", "Title".bold(), info.title);
    println!("{}: {}", "Headings".bold(), info.headings);

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "skimpdf".green().bold(),
        env!("CARGO_PKG_VERSION")
    );
}
