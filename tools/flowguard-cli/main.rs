use clap::{Parser, Subcommand};
use flowguard::graph::EdgeKind;
use flowguard::prelude::*;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Raw input file: the phases and tasks exactly as a tool call would pass them.
#[derive(Deserialize)]
struct RawFlow {
    #[serde(default)]
    phases: Vec<Value>,
    #[serde(default)]
    tasks: Vec<Value>,
}

/// Validates flow configurations and inspects their phase graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assign ids, validate, and print the wire configuration
    Validate {
        /// Path to a JSON file with `phases` and `tasks`
        input: String,
        /// Flow type: orchestrator (keboola.orchestrator) or conditional (keboola.flow)
        #[arg(short = 't', long, default_value = "orchestrator")]
        flow_type: FlowType,
        /// Write the configuration to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },
    /// Validate and print entry phases, endings, edges and execution order
    Graph {
        /// Path to a JSON file with `phases` and `tasks`
        input: String,
        /// Flow type: orchestrator (keboola.orchestrator) or conditional (keboola.flow)
        #[arg(short = 't', long, default_value = "orchestrator")]
        flow_type: FlowType,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Validate {
            input,
            flow_type,
            output,
            compact,
        } => run_validate(&input, flow_type, output.as_deref(), compact),
        Command::Graph { input, flow_type } => run_graph(&input, flow_type),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_flow(path: &str) -> RawFlow {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read flow file '{}': {}", path, e)));
    serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse flow JSON: {}", e)))
}

fn compile(path: &str, flow_type: FlowType) -> CompiledFlow {
    let raw = load_flow(path);
    let start = Instant::now();
    let compiled = FlowCompiler::new(flow_type)
        .compile(&raw.phases, &raw.tasks)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid flow: {}", e)));
    eprintln!(
        "Validated {} flow: {} phase(s), {} task(s) in {:?}",
        flow_type,
        compiled.definition.phase_count(),
        compiled.definition.task_count(),
        start.elapsed()
    );
    compiled
}

fn run_validate(path: &str, flow_type: FlowType, output: Option<&str>, compact: bool) {
    let compiled = compile(path, flow_type);
    let rendered = if compact {
        serde_json::to_string(&compiled.configuration)
    } else {
        serde_json::to_string_pretty(&compiled.configuration)
    }
    .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialise configuration: {}", e)));

    match output {
        Some(out) => {
            fs::write(out, rendered).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", out, e))
            });
            eprintln!("Configuration written to '{}'", out);
        }
        None => println!("{}", rendered),
    }
}

fn run_graph(path: &str, flow_type: FlowType) {
    let compiled = compile(path, flow_type);
    let graph = &compiled.graph;

    println!("--- Phase Graph ({}) ---", flow_type);
    println!("Phases: {}", graph.phase_ids().len());
    println!("Edges:  {}", graph.edge_count());
    println!("Entry phases: {}", join(&graph.entry_phases()));

    if let FlowDefinition::Conditional { phases, .. } = &compiled.definition {
        let endings: Vec<FlowId> = phases
            .iter()
            .filter(|phase| phase.is_terminal())
            .map(|phase| FlowId::from(&phase.id))
            .collect();
        println!("Ending phases: {}", join(&endings));
    }

    let arrow = match graph.kind() {
        EdgeKind::DependsOn => "depends on",
        EdgeKind::Next => "->",
    };
    for (source, target) in graph.edge_list() {
        println!("  {} {} {}", source, arrow, target);
    }

    match graph.topological_order() {
        Some(order) => println!("Execution order: {}", join(&order)),
        None => println!("Execution order: unavailable"),
    }
}

fn join(ids: &[FlowId]) -> String {
    ids.iter().join(", ")
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
