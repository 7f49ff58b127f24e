use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use peek_inspect::{get_paginated_docstring, try_inspect_and_render, InspectConfig, Registry};
use peek_protocol::DocstringMetadata;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "peek")]
#[command(about = "Inspect Python modules, APIs, and data files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Extra directory searched for Python modules (repeatable, searched first)
    #[arg(long = "path", global = true, value_name = "DIR")]
    paths: Vec<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a Python module, class, method, function, or JSON/TOML file
    Inspect(InspectArgs),

    /// Show the paginated docstring of a module, class or function
    Doc(DocArgs),

    /// List registered target types and output formats
    Kinds(KindsArgs),
}

#[derive(Args)]
struct InspectArgs {
    /// Target to inspect (e.g. `json`, `pkg.mod.Class`, `config.json:a.b[0]`)
    target: String,

    /// Type of target to inspect (auto-detected if not specified)
    #[arg(short = 't', long = "type")]
    kind: Option<String>,

    /// Output format (auto-selected based on target if not specified)
    #[arg(short, long)]
    format: Option<String>,
}

#[derive(Args)]
struct DocArgs {
    /// Dotted name of the documented entity
    target: String,

    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Lines per page (defaults to PEEK_PAGE_SIZE or 20)
    #[arg(long)]
    page_size: Option<usize>,

    /// Print the page and its metadata as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct KindsArgs {
    /// Print the tables as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct DocOutput {
    text: String,
    metadata: DocstringMetadata,
}

#[derive(Serialize)]
struct KindsOutput<'a> {
    kinds: Vec<KindEntry<'a>>,
    formats: Vec<&'a str>,
}

#[derive(Serialize)]
struct KindEntry<'a> {
    kind: &'a str,
    default_format: &'a str,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = InspectConfig::from_env();
    for path in cli.paths.iter().rev() {
        config = config.with_search_path(path);
    }
    let registry = Registry::from_config(&config).context("Failed to build inspector registry")?;

    match cli.command {
        Commands::Inspect(args) => Ok(run_inspect(&registry, &args)),
        Commands::Doc(args) => run_doc(&registry, &args),
        Commands::Kinds(args) => run_kinds(&registry, &args),
    }
}

fn run_inspect(registry: &Registry, args: &InspectArgs) -> ExitCode {
    match try_inspect_and_render(
        registry,
        &args.target,
        args.kind.as_deref(),
        args.format.as_deref(),
    ) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_doc(registry: &Registry, args: &DocArgs) -> Result<ExitCode> {
    let (text, metadata) = get_paginated_docstring(registry, &args.target, args.page, args.page_size);
    let failed = metadata.error.is_some();

    if args.json {
        let output = DocOutput { text, metadata };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize docstring page")?
        );
    } else if failed {
        eprintln!("{text}");
    } else {
        println!("{text}");
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_kinds(registry: &Registry, args: &KindsArgs) -> Result<ExitCode> {
    let output = KindsOutput {
        kinds: registry
            .kinds()
            .into_iter()
            .map(|kind| KindEntry {
                kind,
                default_format: registry.default_format(kind),
            })
            .collect(),
        formats: registry.formats(),
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize registry tables")?
        );
    } else {
        for entry in &output.kinds {
            println!("{:<8} (default format: {})", entry.kind, entry.default_format);
        }
        println!("formats: {}", output.formats.join(", "));
    }
    Ok(ExitCode::SUCCESS)
}
