use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use binsieve::{walk, MatcherRegistry, OptionBinding, ScanConfig, ScanReport};

#[derive(Parser)]
#[command(
    name = "binsieve",
    version,
    about = "Report files whose contents match a combination of byte- and bit-pattern criteria"
)]
struct Cli {
    /// Root directory to scan
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Bind a matcher option, e.g. -o substring=hello (repeatable)
    #[arg(short = 'o', long = "opt", value_name = "NAME=VALUE")]
    bindings: Vec<String>,

    /// Search for a literal text fragment (repeatable)
    #[arg(long, value_name = "TEXT")]
    substring: Vec<String>,

    /// Search for a number encoded in either byte order (repeatable)
    #[arg(long, value_name = "NUMBER")]
    byte_seq: Vec<String>,

    /// Search for a bit sequence, 0b literal or number (repeatable)
    #[arg(long, value_name = "BITS")]
    bit_seq: Vec<String>,

    /// Report files matching any criterion instead of all
    #[arg(short = 'O', long)]
    or: bool,

    /// Require all criteria to match (default; overrides the config file)
    #[arg(short = 'A', long, conflicts_with = "or")]
    and: bool,

    /// Invert the final decision
    #[arg(short = 'N', long = "not")]
    invert: bool,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print summary statistics only
    #[arg(short, long)]
    stats: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// List registered matchers and their options, then exit
    #[arg(long)]
    list_matchers: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut registry = MatcherRegistry::with_builtins();
    if cli.list_matchers {
        print_matchers(&registry);
        return Ok(());
    }

    let file_config =
        ScanConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;

    let cli_config = ScanConfig {
        root_path: cli.root.clone(),
        bindings: collect_bindings(&cli)?,
        use_or: cli.or,
        invert: cli.invert,
        log_level: cli.log_level.clone().unwrap_or_else(|| "warn".to_string()),
    };
    let mut config = file_config.merge_with_cli(cli_config);
    // --and forces conjunction even when the config file asked for OR;
    // merge_with_cli alone cannot express clearing a flag
    if cli.and {
        config.use_or = false;
    }

    init_tracing(&config.log_level);
    debug!(
        root = %config.root_path.display(),
        bindings = config.bindings.len(),
        "configuration merged"
    );

    for binding in &config.bindings {
        registry.bind(&binding.option, &binding.value)?;
    }

    let report = walk(&config, &registry)?;
    print_report(&report, cli.stats, cli.json)?;
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Gathers option bindings from `-o NAME=VALUE` and the convenience flags
fn collect_bindings(cli: &Cli) -> Result<Vec<OptionBinding>> {
    let mut bindings = Vec::new();
    for raw in &cli.bindings {
        let Some((name, value)) = raw.split_once('=') else {
            bail!("invalid binding '{raw}': expected NAME=VALUE");
        };
        bindings.push(OptionBinding {
            option: name.to_string(),
            value: value.to_string(),
        });
    }
    for value in &cli.substring {
        bindings.push(OptionBinding {
            option: "substring".to_string(),
            value: value.clone(),
        });
    }
    for value in &cli.byte_seq {
        bindings.push(OptionBinding {
            option: "byte-seq".to_string(),
            value: value.clone(),
        });
    }
    for value in &cli.bit_seq {
        bindings.push(OptionBinding {
            option: "bit-seq".to_string(),
            value: value.clone(),
        });
    }
    Ok(bindings)
}

fn print_matchers(registry: &MatcherRegistry) {
    println!("Registered matchers:");
    for descriptor in registry.descriptors() {
        println!("\n  {}", descriptor.name.blue());
        println!("    Purpose: {}", descriptor.purpose);
        println!("    Author:  {}", descriptor.author);
        println!("    Options:");
        for option in &descriptor.options {
            let value = if option.takes_value { " <VALUE>" } else { "" };
            println!("      --{}{}  {}", option.name, value, option.description);
        }
    }
}

fn print_report(report: &ScanReport, stats_only: bool, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if !stats_only {
        for path in &report.matched {
            println!("{}", path.display().to_string().blue());
        }
    }

    println!(
        "\nMatched {} of {} files ({} skipped)",
        report.files_matched, report.files_scanned, report.files_skipped
    );
    Ok(())
}
