//! CLI for the ratios computation and benchmarking library.
//!
//! This binary lists and describes the registered ratios and builds
//! benchmarked reports from a JSON facts file.

use clap::{Args, Parser, Subcommand, ValueEnum};
use polars::prelude::{CsvWriter, SerWriter};
use ratios::{
    BenchmarkTarget, CompanyId, Engine, EngineConfig, FiscalYear, InMemoryProvider, Presentation,
    RatioCategory, RatioError, RatioInfo, RatioRegistry, Report, ReportAssembler,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ratios")]
#[command(about = "Financial ratio computation and benchmarking", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available ratios
    List,
    /// Show information about a specific ratio
    Info {
        /// Ratio name
        ratio: String,
    },
    /// Build a report for a company from a facts file
    Report(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// JSON file with facts, peer groups and the market index
    facts: PathBuf,
    /// Subject company
    #[arg(long)]
    company: String,
    /// Number of fiscal years to report
    #[arg(long)]
    years: Option<usize>,
    /// Last fiscal year; defaults to the company's latest reported year
    #[arg(long)]
    end_year: Option<FiscalYear>,
    /// Industry peers, overriding the facts file
    #[arg(long, value_delimiter = ',')]
    peers: Vec<String>,
    /// Market index pseudo-company
    #[arg(long)]
    market_index: Option<String>,
    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = Arc::new(RatioRegistry::with_defaults());

    let outcome = match cli.command {
        Commands::List => {
            list_ratios(&registry);
            Ok(())
        }
        Commands::Info { ratio } => show_ratio_info(&registry, &ratio),
        Commands::Report(args) => run_report(Arc::clone(&registry), args).await,
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        if matches!(e, RatioError::NotFound(_)) {
            eprintln!("\nAvailable ratios:");
            for name in registry.names() {
                eprintln!("  {name}");
            }
        }
        std::process::exit(1);
    }
}

/// List all available ratios grouped by category.
fn list_ratios(registry: &RatioRegistry) {
    let mut by_category: BTreeMap<RatioCategory, Vec<RatioInfo>> = BTreeMap::new();
    for info in registry.all_info() {
        by_category.entry(info.category).or_default().push(info);
    }

    println!("Available Ratios ({} total)\n", registry.len());

    for (category, infos) in by_category {
        println!("{category}:");
        for info in infos {
            println!("  {} - {}", info.name, info.description);
        }
        println!();
    }
}

/// Show detailed information about a specific ratio.
fn show_ratio_info(registry: &RatioRegistry, name: &str) -> ratios::Result<()> {
    let info = RatioInfo::from(registry.get(name)?);

    println!("Ratio: {} ({})", info.label, info.name);
    println!("Category: {}", info.category);
    println!("Description: {}", info.description);
    println!("Presentation: {}", info.presentation);
    println!("Unit: {}", info.unit);
    println!("Required line items:");
    for item in &info.required_items {
        let averaged = if info.averaged_items.contains(item) { " (averaged)" } else { "" };
        println!("  - {item}{averaged}");
    }
    if !info.benchmarks.is_empty() {
        let targets: Vec<_> = info.benchmarks.iter().map(ToString::to_string).collect();
        println!("Benchmarks: {}", targets.join(", "));
    }
    Ok(())
}

/// Load facts, assemble the report and write it in the requested format.
async fn run_report(registry: Arc<RatioRegistry>, args: ReportArgs) -> ratios::Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(years) = args.years {
        config.years = years;
    }
    if let Some(end_year) = args.end_year {
        config.end_year = Some(end_year);
    }
    if let Some(index) = &args.market_index {
        config.market_index = Some(CompanyId::new(index));
    }

    let company = CompanyId::new(&args.company);
    let mut provider = InMemoryProvider::from_json_file(&args.facts)?;
    if !args.peers.is_empty() {
        provider = provider.with_peers(company.clone(), args.peers.iter().cloned());
    }
    let period = config.period_for(&company, provider.latest_year(&company))?;
    info!(company = %company, period = ?period.years(), "building report");

    let provider = Arc::new(provider);
    let assembler = ReportAssembler::with_config(Arc::clone(&registry), config);
    let report = Engine::with_assembler(provider.clone(), provider, assembler)
        .run(&company, &period)
        .await?;

    let rendered = match args.format {
        OutputFormat::Text => render_text(&registry, &report),
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Csv => render_csv(&report)?,
    };

    match &args.output {
        Some(path) => std::fs::write(path, rendered).map_err(|source| RatioError::Io {
            path: path.display().to_string(),
            source,
        })?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

/// Render a report as a plain-text table grouped by category.
fn render_text(registry: &RatioRegistry, report: &Report) -> String {
    let meta = report.metadata();
    let mut out = format!(
        "{} {} ({})\n",
        report.company_id(),
        meta.period_labels.join(" "),
        meta.currency.as_deref().unwrap_or("mixed currency")
    );
    out.push_str(&format!(
        "{} complete, {} partial, {} unavailable\n",
        meta.completeness.complete, meta.completeness.partial, meta.completeness.unavailable
    ));
    if let Some(beta) = meta.estimated_beta {
        out.push_str(&format!("Estimated beta: {beta:.2}\n"));
    }

    let mut category = None;
    for def in registry.get_all() {
        let Some(result) = report.result(def.name) else {
            continue;
        };
        if category != Some(def.category) {
            category = Some(def.category);
            out.push_str(&format!("\n{}\n", def.category));
        }

        let label = def.label;
        match result.presentation {
            Presentation::Trend => {
                let values: Vec<_> = result.values().iter().map(|v| fmt_value(v.value)).collect();
                out.push_str(&format!(
                    "  {label:<36} {}  [{}]\n",
                    values.join("  "),
                    result.data_quality
                ));
                for set in report.benchmarks(def.name) {
                    let values: Vec<_> = set.values.iter().map(|p| fmt_value(p.value)).collect();
                    out.push_str(&format!(
                        "    {:<34} {}\n",
                        set.target.to_string(),
                        values.join("  ")
                    ));
                }
            }
            Presentation::Single => {
                let Some(point) = result.values().first() else {
                    continue;
                };
                let mut line = format!(
                    "  {label:<36} FY{} {}",
                    point.fiscal_year,
                    fmt_value(point.value)
                );
                for target in [BenchmarkTarget::Industry, BenchmarkTarget::Market] {
                    if let Some(set) = report.benchmark(def.name, target) {
                        line.push_str(&format!(
                            " | {target} {}",
                            fmt_value(set.value_for(point.fiscal_year))
                        ));
                    }
                }
                out.push_str(&format!("{line}  [{}]\n", result.data_quality));
            }
        }
    }
    out
}

/// Render the report's flattened rows as CSV.
fn render_csv(report: &Report) -> ratios::Result<String> {
    let mut frame = report.to_frame()?;
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf).finish(&mut frame)?;
    String::from_utf8(buf).map_err(|e| RatioError::Parse(e.to_string()))
}
