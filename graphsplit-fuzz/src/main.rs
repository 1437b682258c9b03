use anyhow::{anyhow, Context};
use clap::Parser;
use graphsplit::generator::generate;
use graphsplit::graph::{GraphFile, GraphParameters};
use graphsplit::solution::Partition;
use graphsplit::solver::SolverConfig;
use graphsplit::SplitConfig;
use rand::prelude::*;
use std::path::PathBuf;
use std::time::Duration;

/// Graphs up to this size have UNSAT answers double-checked by exhaustive search.
const EXHAUSTIVE_NODE_LIMIT: usize = 9;

#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    /// The solver executable.
    #[clap(short, long, default_value = "cadical")]
    solver: PathBuf,

    #[clap(long = "solver-arg", allow_hyphen_values = true, number_of_values = 1)]
    solver_args: Vec<String>,

    #[clap(long)]
    timeout_secs: Option<u64>,

    #[clap(long)]
    min_nodes: usize,

    #[clap(long)]
    max_nodes: usize,

    #[clap(long, default_value_t = 0.5)]
    negative: f64,

    #[clap(long, default_value_t = 0.5)]
    positive: f64,

    #[clap(long)]
    density: f64,

    #[clap(long)]
    iters: usize,

    #[clap(long)]
    recreate_seed: Option<u64>,

    /// Where to write the CNF handed to the solver; a temporary file if omitted.
    #[clap(long)]
    cnf: Option<PathBuf>,
}

fn gen_graph(args: &Args, seed: u64) -> anyhow::Result<GraphFile> {
    // The node count is drawn from the seed too, so a seed alone recreates the graph.
    let mut rng = StdRng::seed_from_u64(seed);
    let parameters = GraphParameters {
        node_count: rng.gen_range(args.min_nodes..=args.max_nodes),
        negative_fraction: args.negative,
        positive_fraction: args.positive,
        density: args.density,
    };
    Ok(generate(&parameters, seed)?)
}

/// Runs the iterations, removing the CNF file afterwards whether or not they succeeded.
fn run(args: &Args) -> anyhow::Result<()> {
    let config = SplitConfig {
        solver: SolverConfig {
            program: args.solver.clone(),
            args: args.solver_args.clone(),
            timeout: args.timeout_secs.map(Duration::from_secs),
            ..Default::default()
        },
        cnf_path: args.cnf.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("graphsplit-fuzz-{}.cnf", std::process::id()))
        }),
    };

    let result = fuzz(args, &config);
    let _ = std::fs::remove_file(&config.cnf_path);
    result
}

fn fuzz(args: &Args, config: &SplitConfig) -> anyhow::Result<()> {
    let mut seed_gen = thread_rng();
    for _ in 0..args.iters {
        let seed: u64 = seed_gen.gen();
        let file = gen_graph(args, seed)?;
        println!("[{seed}]");

        let graph = &file.graph;
        let answer = graphsplit::split(graph, config)
            .with_context(|| format!("Pipeline failed on the graph from seed {seed}"))?;
        let failure = match answer {
            Some(partition) => partition
                .verify(graph)
                .err()
                .map(|violation| format!("Solver partition is invalid: {violation}")),
            None if graph.node_count() <= EXHAUSTIVE_NODE_LIMIT => {
                Partition::search_exhaustive(graph).map(|partition| {
                    format!("Solver decided UNSAT, but this partition exists:\n{partition}")
                })
            }
            None => None,
        };

        match failure {
            Some(message) => {
                println!("{message}");
                print!("{file}");
                break;
            }
            None => println!("OK"),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.min_nodes > args.max_nodes {
        return Err(anyhow!("--min-nodes must not exceed --max-nodes"));
    }

    if let Some(seed) = args.recreate_seed {
        print!("{}", gen_graph(&args, seed)?);
        return Ok(());
    }

    run(&args)
}
