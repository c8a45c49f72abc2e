//! graphsmith CLI: build RDF graphs from YAML mapping schemas.
//!
//! Usage:
//!   graphsmith run <SCHEMA>... [--format F]... [--stdout]
//!   graphsmith check <SCHEMA>
//!   graphsmith render <TEMPLATE> [--data JSON]

use clap::{Parser, Subcommand};
use graphsmith::export::{self, ExportConfig, RdfFormat};
use graphsmith::template::{resolve, DataContext};
use graphsmith::{Pipeline, Schema};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "graphsmith",
    version,
    about = "Schema-driven RDF graph builder"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log per-object decisions
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Map every schema and write its export files
    Run {
        /// Schema files
        #[arg(required = true)]
        schemas: Vec<PathBuf>,
        /// Override the schema's export formats (turtle, ntriples, xml)
        #[arg(short, long = "format")]
        formats: Vec<String>,
        /// Print the graph to stdout (first format) instead of writing files
        #[arg(long)]
        stdout: bool,
        /// Stop descending past this many nested objects
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Load and validate a schema
    Check {
        /// Schema file
        schema: PathBuf,
    },
    /// Resolve one template against a JSON context
    Render {
        /// Template text
        template: String,
        /// JSON object to resolve against
        #[arg(long)]
        data: Option<String>,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_run(schemas: &[PathBuf], formats: &[String], stdout: bool, max_depth: Option<usize>) -> i32 {
    for path in schemas {
        let code = run_one(path, formats, stdout, max_depth);
        if code != 0 {
            return code;
        }
    }
    0
}

fn run_one(path: &Path, formats: &[String], stdout: bool, max_depth: Option<usize>) -> i32 {
    let mut pipeline = match Pipeline::load(path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if let Some(max_depth) = max_depth {
        pipeline = pipeline.with_max_depth(max_depth);
    }

    let mut config: ExportConfig = pipeline.schema().export.clone();
    if !formats.is_empty() {
        config.formats = formats.to_vec();
    }

    if stdout {
        let format = match config.formats().map(|f| f.first().copied()) {
            Ok(format) => format.unwrap_or(RdfFormat::RdfXml),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        let (graph, _) = pipeline.build_graph();
        print!("{}", export::serialize(&graph, format));
        return 0;
    }

    match pipeline.run_with(&config) {
        Ok(report) => {
            println!(
                "{}: {} triples ({} individuals, {} records)",
                path.display(),
                report.triples,
                report.individuals,
                report.records
            );
            for written in &report.written {
                println!("  wrote {}", written.display());
            }
            if report.failed_sources > 0 {
                eprintln!("Warning: {} source(s) could not be read", report.failed_sources);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_check(path: &Path) -> i32 {
    let schema = match Schema::load(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if let Err(e) = schema.validate() {
        eprintln!("Error: {}", e);
        return 1;
    }
    if let Err(e) = schema.export.formats() {
        eprintln!("Error: {}", e);
        return 1;
    }

    println!("{}: ok", path.display());
    println!("  namespace:        {}", schema.namespace.as_deref().unwrap_or("(none)"));
    println!("  prefixes:         {}", schema.prefixes.len());
    println!("  predicates_map:   {}", schema.predicates_map.len());
    println!("  object_templates: {}", schema.object_templates.len());
    println!("  individuals:      {}", schema.individuals.len());
    println!("  sources:          {}", schema.sources.len());
    0
}

fn cmd_render(template: &str, data: Option<&str>) -> i32 {
    let ctx = match data {
        Some(json) => match serde_json::from_str(json) {
            Ok(value) => DataContext::new(value),
            Err(e) => {
                eprintln!("Error: invalid --data JSON: {}", e);
                return 1;
            }
        },
        None => DataContext::empty(),
    };
    println!("{}", resolve(template, &ctx));
    0
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let code = match cli.command {
        Commands::Run {
            schemas,
            formats,
            stdout,
            max_depth,
        } => cmd_run(&schemas, &formats, stdout, max_depth),
        Commands::Check { schema } => cmd_check(&schema),
        Commands::Render { template, data } => cmd_render(&template, data.as_deref()),
    };
    std::process::exit(code);
}
