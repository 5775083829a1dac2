use clap::{Parser, Subcommand};
use simflow::persist::personas_from_file;
use simflow::prelude::*;
use simflow::validation::validate_graph;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Inspect and check saved simulation canvases
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the derived edges, orphaned steps and field issues of a canvas
    Inspect {
        /// Path to the canvas JSON file
        canvas_path: String,
        /// Optional persona list JSON; chat steps referencing unknown personas are reported
        #[arg(short, long)]
        personas: Option<String>,
        /// Optional editor configuration JSON
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Check whether an explicit edge between two steps would be accepted
    CheckConnection {
        /// Path to the canvas JSON file
        canvas_path: String,
        source: String,
        target: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            canvas_path,
            personas,
            config,
        } => run_inspect(&canvas_path, personas.as_deref(), config.as_deref()),
        Command::CheckConnection {
            canvas_path,
            source,
            target,
        } => run_check_connection(&canvas_path, &source, &target),
    }
}

fn run_inspect(canvas_path: &str, personas_path: Option<&str>, config_path: Option<&str>) {
    let load_start = Instant::now();
    let document = load_canvas(canvas_path);
    let config = config_path
        .map(|path| {
            EditorConfig::from_file(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to load config '{}': {}", path, e))
            })
        })
        .unwrap_or_default();

    let mut builder = Session::builder().config(config).document(document);
    if let Some(path) = personas_path {
        let personas = personas_from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load personas '{}': {}", path, e))
        });
        builder = builder.personas(personas);
    }
    let session = builder.build();
    let load_duration = load_start.elapsed();

    let store = session.store();
    println!("\n--- {} ---", session.simulation_name());
    println!("Steps:           {}", store.nodes().len());
    println!("Explicit edges:  {}", store.explicit_edges().len());
    println!("Derived edges:   {}", store.derived_edges().len());

    if !store.derived_edges().is_empty() {
        println!("\nDerived edges:");
        for edge in store.derived_edges() {
            println!(
                "  {} -> {} [{:?}] {}",
                edge.source,
                edge.target,
                edge.kind,
                edge.label.as_deref().unwrap_or("")
            );
        }
    }

    let connectivity = session.connectivity();
    if connectivity.orphan_ids.is_empty() {
        println!("\nNo orphaned steps.");
    } else {
        println!("\nOrphaned steps:");
        for node in store.nodes().iter().filter(|n| connectivity.is_orphan(&n.id)) {
            println!("  {} ({})", node.id, node.kind());
        }
    }

    let issues = validate_graph(store.nodes());
    if issues.is_empty() {
        println!("\nAll steps are complete.");
    } else {
        println!("\nField issues:");
        for issue in &issues {
            println!("  {}", issue);
        }
    }

    println!("\nLoaded and analysed in {:?}", load_duration);
}

fn run_check_connection(canvas_path: &str, source: &str, target: &str) {
    let document = load_canvas(canvas_path);
    match validate_connection(&document.nodes, source, target) {
        Ok(()) => println!("{} -> {}: accepted", source, target),
        Err(rejection) => {
            println!("{} -> {}: rejected", source, target);
            exit_with_error(&rejection.to_string());
        }
    }
}

fn load_canvas(path: &str) -> CanvasDocument {
    CanvasDocument::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load canvas '{}': {}", path, e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
