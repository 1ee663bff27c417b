use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use usagegraph::config::{get_config_path, load_config, save_config, ViewConfig};
use usagegraph::logger::init_logger;
use usagegraph::style::PackageColor;
use usagegraph::usage::UsageDirection;
use usagegraph::usagegraph::{Display, GraphLoader, UsageGraph};

/// Explore usage levels of a class dependency graph.
#[derive(Parser)]
#[command(name = "usagegraph", about = "Explore usage levels of a class dependency graph")]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default view configuration
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
    },
    /// Print the graph shown at the selected usage level
    View {
        #[command(flatten)]
        view: ViewArgs,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Print the cumulative node/link counts per usage level
    Levels {
        #[command(flatten)]
        view: ViewArgs,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Graph JSON produced by the analyzer
    graph: PathBuf,
    /// Stats JSON produced by the analyzer
    stats: PathBuf,
    /// Project path holding `.usagegraph/config.toml` (default: current directory)
    #[arg(short, long)]
    dir: Option<String>,
    /// Entry-point pattern (repeatable)
    #[arg(short, long = "entry")]
    entries: Vec<String>,
    /// Package pattern to hide (repeatable)
    #[arg(short = 'x', long = "exclude")]
    excludes: Vec<String>,
    /// Package colour as PATTERN=#RRGGBB (repeatable)
    #[arg(short, long = "color", value_parser = parse_package_color)]
    colors: Vec<PackageColor>,
    /// Direction followed from the entry points (IN, OUT or IN-OUT)
    #[arg(long)]
    direction: Option<UsageDirection>,
    /// Usage level to show
    #[arg(short, long)]
    level: Option<u32>,
    /// Show inheritance links and re-admit filtered supertypes
    #[arg(long)]
    hybrid: bool,
    /// Use every API class as an entry point
    #[arg(long)]
    api: bool,
    /// Hide nodes without links
    #[arg(long)]
    isolated: bool,
    /// Show hotspot nodes only
    #[arg(long)]
    hotspots: bool,
    /// Do not collapse variant classes
    #[arg(long)]
    show_variants: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> usagegraph::errors::Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let project_path = resolve_path(path);
            save_config(&project_path, &ViewConfig::default())?;
            println!(
                "Wrote default configuration to {}",
                get_config_path(&project_path).display()
            );
        }
        Commands::View { view, json } => {
            let display = run_display(view).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&display.view)?
                );
            } else {
                print_view(&display);
            }
        }
        Commands::Levels { view, json } => {
            let display = run_display(view).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(display.counts())?
                );
            } else if display.counts().is_empty() {
                println!("No entry point registered; usage levels are not computed.");
            } else {
                println!("{:>5}  {:>6}  {:>6}", "level", "nodes", "links");
                for count in display.counts() {
                    println!("{:>5}  {:>6}  {:>6}", count.level, count.nodes, count.links);
                }
            }
        }
    }
    Ok(())
}

/// Loads the data, applies the command-line overrides and runs one display cycle.
async fn run_display(args: ViewArgs) -> usagegraph::errors::Result<Display> {
    let project_path = resolve_path(args.dir);
    let mut config = load_config(&project_path)?;
    config.entry_points.extend(args.entries);
    config.package_filters.extend(args.excludes);
    config.package_colors.extend(args.colors);
    if let Some(direction) = args.direction {
        config.direction = direction;
    }
    if let Some(level) = args.level {
        config.usage_level = level;
    }
    config.hybrid_view |= args.hybrid;
    config.api_filtering |= args.api;
    config.filter_isolated |= args.isolated;
    config.only_hotspots |= args.hotspots;
    if args.show_variants {
        config.filter_variants = false;
    }

    let loader = GraphLoader::new();
    let mut graph = UsageGraph::open(&loader, &args.graph, &args.stats, config).await?;
    Ok(graph.display())
}

fn print_view(display: &Display) {
    for line in &display.stats {
        println!("{}", line);
    }
    println!();
    match display.view.level {
        Some(level) => println!(
            "Usage level {} of {}",
            level,
            display.selectable_levels().len()
        ),
        None => println!("Full graph (no entry point)"),
    }
    println!(
        "  Nodes: {}  Links: {}",
        display.view.graph.nodes.len(),
        display.view.graph.links.len()
    );

    for node in &display.view.graph.nodes {
        let level = display
            .expansion
            .as_ref()
            .and_then(|e| e.level_of(&node.name))
            .map(|l| format!("[{}] ", l))
            .unwrap_or_default();
        let types: Vec<&str> = node.types.iter().map(|t| t.as_str()).collect();
        println!("    {}{} ({})", level, node.name, types.join(", "));
    }
    for link in display.view.renderable_links() {
        println!(
            "    {} -{}-> {}",
            link.source,
            link.kind.as_str(),
            link.target
        );
    }
}

fn parse_package_color(value: &str) -> Result<PackageColor, String> {
    let (pattern, color) = value
        .split_once('=')
        .ok_or_else(|| format!("expected PATTERN=#RRGGBB, got '{}'", value))?;
    Ok(PackageColor {
        pattern: pattern.to_string(),
        color: color.parse().map_err(|e| format!("{}", e))?,
    })
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
