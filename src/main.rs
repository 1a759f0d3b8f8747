use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use terraces::io::{parse_newick, parse_occurrence, read_input, write_newick};
use terraces::{prepare_supertree, reroot_inplace, SupertreeData, TerraceConfig, Terraces, TreeSet};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "terraces",
    about = "Detect, count and enumerate phylogenetic terraces"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv every callback).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Dispatch bipartitions to worker threads (needs the `parallel` feature).
    #[arg(long, global = true)]
    parallel: bool,
    /// Print recursion depth and scratch usage after the query.
    #[arg(long, global = true)]
    profile: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report whether the tree lies on a terrace.
    Check {
        /// Newick tree.
        tree: PathBuf,
        /// Occurrence matrix (`<species> <partitions>` header, then rows).
        occurrence: PathBuf,
    },
    /// Count the trees on the terrace.
    Count {
        /// Newick tree.
        tree: PathBuf,
        /// Occurrence matrix.
        occurrence: PathBuf,
        /// Count with arbitrary precision instead of clamping at 2^64 - 1.
        #[arg(long)]
        exact: bool,
    },
    /// Print the terrace as an extended Newick multitree.
    Enumerate {
        /// Newick tree.
        tree: PathBuf,
        /// Occurrence matrix.
        occurrence: PathBuf,
        /// Print up to N concrete trees instead of the multitree.
        #[arg(long, value_name = "N")]
        expand: Option<usize>,
    },
    /// Reroot a tree at a leaf and print it.
    Reroot {
        /// Newick tree.
        tree: PathBuf,
        /// Name of the new root leaf.
        #[arg(long)]
        leaf: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = TerraceConfig::default()
        .with_parallel(cli.parallel)
        .with_space_profiling(cli.profile);
    let mut terraces = Terraces::new(config);

    match cli.command {
        Commands::Check { tree, occurrence } => {
            let (_, data) = load(&tree, &occurrence)?;
            let on_terrace = terraces.check(&data).context("terrace check failed")?;
            println!("{}", if on_terrace { "terrace" } else { "no terrace" });
        }
        Commands::Count {
            tree,
            occurrence,
            exact,
        } => {
            let (_, data) = load(&tree, &occurrence)?;
            if exact {
                let count = terraces.count_exact(&data).context("counting failed")?;
                println!("{count}");
            } else {
                let count = terraces.count(&data).context("counting failed")?;
                println!("{count}");
            }
        }
        Commands::Enumerate {
            tree,
            occurrence,
            expand,
        } => {
            let (set, data) = load(&tree, &occurrence)?;
            let multitree = terraces.enumerate(&data).context("enumeration failed")?;
            let names = set.tree.leaf_names(&set.names);
            match expand {
                Some(limit) => {
                    for concrete in multitree.expand(&names, limit) {
                        println!("{}", write_newick(&concrete.tree, &concrete.names));
                    }
                }
                None => println!("{}", multitree.newick(&names)),
            }
            info!(trees = %multitree.num_trees(), "enumerated terrace");
        }
        Commands::Reroot { tree, leaf } => run_reroot(&tree, &leaf)?,
    }

    if let Some(profile) = terraces.last_profile() {
        eprintln!("{}", profile.report());
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_tree(path: &Path) -> Result<TreeSet> {
    let text = read_input(path)
        .with_context(|| format!("failed to read tree from {}", path.display()))?;
    parse_newick(&text).with_context(|| format!("invalid tree in {}", path.display()))
}

fn load(tree_path: &Path, occurrence_path: &Path) -> Result<(TreeSet, SupertreeData)> {
    let mut set = read_tree(tree_path)?;
    let text = read_input(occurrence_path).with_context(|| {
        format!(
            "failed to read occurrence matrix from {}",
            occurrence_path.display()
        )
    })?;
    let occurrence = parse_occurrence(&text, &set.indices, set.tree.len()).with_context(|| {
        format!(
            "invalid occurrence matrix in {}",
            occurrence_path.display()
        )
    })?;
    if !occurrence.dropped_partitions.is_empty() {
        info!(
            dropped = ?occurrence.dropped_partitions,
            "ignoring partitions with fewer than two species"
        );
    }

    let data = prepare_supertree(&mut set.tree, &occurrence.matrix, occurrence.comprehensive)
        .context("failed to prepare constraints")?;
    info!(
        leaves = data.num_leaves,
        constraints = data.constraints.len(),
        "prepared supertree query"
    );
    Ok((set, data))
}

fn run_reroot(tree_path: &Path, leaf: &str) -> Result<()> {
    let mut set = read_tree(tree_path)?;
    let node = *set
        .indices
        .get(leaf)
        .ok_or_else(|| anyhow::anyhow!("unknown leaf {leaf}"))?;
    reroot_inplace(&mut set.tree, node).with_context(|| format!("cannot reroot at {leaf}"))?;
    println!("{}", write_newick(&set.tree, &set.names));
    Ok(())
}
