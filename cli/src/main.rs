//! gradex CLI - student-record extraction from result-gazette PDFs.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use gradex::{EngineConfig, ExtractionReport, Gradex, JsonFormat};

#[derive(Parser)]
#[command(name = "gradex")]
#[command(version)]
#[command(about = "Extract student result records from gazette PDFs", long_about = None)]
struct Cli {
    /// Input PDF files
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (single input) or directory (multiple inputs);
    /// stdout if not specified
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print a per-file summary to stderr
    #[arg(short, long)]
    summary: bool,

    /// Process files one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Seat-number digit count
    #[arg(long, value_name = "N")]
    seat_length: Option<usize>,

    /// Vertical tolerance for line clustering, in layout units
    #[arg(long, value_name = "UNITS")]
    line_tolerance: Option<f32>,

    /// Left-margin threshold for record anchors, in layout units
    #[arg(long, value_name = "UNITS")]
    left_margin: Option<f32>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = build_config(&cli);
    log::debug!("engine config: {:?}", config);
    let format = if cli.pretty {
        JsonFormat::Pretty
    } else {
        JsonFormat::Compact
    };

    let result = if cli.inputs.len() == 1 {
        run_single(&cli, &config, format)
    } else {
        run_batch(&cli, &config, format)
    };

    if let Err(message) = result {
        eprintln!("{} {}", "error:".red().bold(), message);
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> EngineConfig {
    let mut config = EngineConfig::default();
    if let Some(length) = cli.seat_length {
        config = config.with_seat_length(length);
    }
    if let Some(tolerance) = cli.line_tolerance {
        config = config.with_line_tolerance(tolerance);
    }
    if let Some(margin) = cli.left_margin {
        config = config.with_left_margin(margin);
    }
    config
}

fn extract_one(path: &Path, config: &EngineConfig) -> Result<ExtractionReport, String> {
    Gradex::new()
        .with_config(config.clone())
        .extract_file(path)
        .map_err(|e| format!("{}: {}", path.display(), e))
}

fn run_single(cli: &Cli, config: &EngineConfig, format: JsonFormat) -> Result<(), String> {
    let path = &cli.inputs[0];
    let report = extract_one(path, config)?;
    let json = report.to_json(format).map_err(|e| e.to_string())?;

    match &cli.output {
        Some(output) => {
            fs::write(output, &json).map_err(|e| format!("{}: {}", output.display(), e))?;
            println!(
                "{} {} -> {}",
                "ok".green().bold(),
                path.display(),
                output.display()
            );
        }
        None => println!("{}", json),
    }

    if cli.summary {
        print_summary(path, &report);
    }

    Ok(())
}

fn run_batch(cli: &Cli, config: &EngineConfig, format: JsonFormat) -> Result<(), String> {
    let output_dir = cli
        .output
        .as_ref()
        .ok_or_else(|| "multiple inputs require --output <DIR>".to_string())?;
    fs::create_dir_all(output_dir).map_err(|e| format!("{}: {}", output_dir.display(), e))?;

    let bar = ProgressBar::new(cli.inputs.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    let process = |path: &PathBuf| -> Result<(PathBuf, ExtractionReport), String> {
        let report = extract_one(path, config)?;
        let json = report.to_json(format).map_err(|e| e.to_string())?;

        let file_name = path
            .file_stem()
            .map(|stem| format!("{}.json", stem.to_string_lossy()))
            .unwrap_or_else(|| "output.json".to_string());
        let target = output_dir.join(file_name);
        fs::write(&target, &json).map_err(|e| format!("{}: {}", target.display(), e))?;

        bar.inc(1);
        Ok((path.clone(), report))
    };

    let results: Vec<Result<(PathBuf, ExtractionReport), String>> = if cli.sequential {
        cli.inputs.iter().map(process).collect()
    } else {
        cli.inputs.par_iter().map(process).collect()
    };
    bar.finish_and_clear();

    let mut failures = 0;
    for result in results {
        match result {
            Ok((path, report)) => {
                if cli.summary {
                    print_summary(&path, &report);
                }
            }
            Err(message) => {
                failures += 1;
                eprintln!("{} {}", "failed:".red().bold(), message);
            }
        }
    }

    if failures > 0 {
        Err(format!("{} of {} files failed", failures, cli.inputs.len()))
    } else {
        println!(
            "{} extracted {} files into {}",
            "ok".green().bold(),
            cli.inputs.len(),
            output_dir.display()
        );
        Ok(())
    }
}

fn print_summary(path: &Path, report: &ExtractionReport) {
    let passed = report
        .students
        .iter()
        .filter(|s| matches!(s.outcome, Some(gradex::Outcome::Pass)))
        .count();
    eprintln!(
        "{}: {} students, {} passed",
        path.display().to_string().bold(),
        report.students_found.to_string().cyan(),
        passed.to_string().green()
    );
}
