use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{CellAlignment, Table};
use graphsplit::cnf::CNF;
use graphsplit::encoding::{encode, SET_COUNT};
use graphsplit::graph::{GraphFile, GraphParameters};
use graphsplit::solver::SolverConfig;
use graphsplit::stats::Stats;
use graphsplit::{dimacs, generator, solution, SplitConfig};
use log::info;
use nom::Finish;
use rand::prelude::*;
use std::fs::File;
use std::io::{stdin, stdout, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a graph into a DIMACS CNF.
    Encode {
        /// Where to write the CNF; standard output if omitted.
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// The graph description file.
        input_file: PathBuf,
    },
    /// Split a graph into three sets with an external SAT solver.
    Solve {
        /// The solver executable. It receives the CNF path as its last argument.
        #[clap(short, long, default_value = "cadical")]
        solver: PathBuf,

        /// Extra argument for the solver, placed before the CNF path. Can be repeated.
        #[clap(long = "solver-arg", allow_hyphen_values = true, number_of_values = 1)]
        solver_args: Vec<String>,

        /// Where to write the CNF handed to the solver.
        #[clap(long, default_value = "graphsplit.cnf")]
        cnf: PathBuf,

        /// Kill the solver after this many seconds.
        #[clap(short, long)]
        timeout_secs: Option<u64>,

        /// The graph description file.
        input_file: PathBuf,
    },
    /// Decode a saved solver result for a graph.
    Decode {
        /// The graph description file.
        input_file: PathBuf,

        /// The solver output; standard input if omitted.
        result_file: Option<PathBuf>,
    },
    /// Generate a random graph description.
    Generate {
        /// Number of nodes.
        #[clap(short, long)]
        nodes: usize,

        /// Relative share of negative edges.
        #[clap(long)]
        negative: f64,

        /// Relative share of positive edges.
        #[clap(long)]
        positive: f64,

        /// Probability of an edge between any two nodes.
        #[clap(short, long)]
        density: f64,

        /// 64-bit unsigned integer seed.
        #[clap(long)]
        seed: Option<u64>,

        /// Where to write the graph; standard output if omitted.
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse a DIMACS CNF and print its counts.
    Check {
        /// The DIMACS input file; standard input if omitted.
        input_file: Option<PathBuf>,
    },
}

fn read_input(input_file: Option<&Path>) -> Result<String, anyhow::Error> {
    let mut input = String::new();
    if let Some(path) = input_file {
        let mut f = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        f.read_to_string(&mut input)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    } else {
        stdin()
            .read_to_string(&mut input)
            .context("Failed to read standard input")?;
    }
    Ok(input)
}

fn read_graph(input_file: &Path) -> Result<GraphFile, anyhow::Error> {
    let input = read_input(Some(input_file))?;
    let file = GraphFile::parse(&input)
        .with_context(|| format!("Invalid graph description {}", input_file.display()))?;
    info!(
        "Read a graph with {} nodes and {} edges",
        file.graph.node_count(),
        file.graph.edge_count()
    );
    Ok(file)
}

/// Opens the output file, or standard output if none is given.
fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>, anyhow::Error> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(stdout())),
    })
}

fn stats_table(cnf: &CNF, stats: &Stats) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);
    table.set_header(vec!["Rule", "Items", "Clauses"]);
    for index in 1..=2 {
        if let Some(column) = table.get_column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table.add_row(vec![
        "Non-empty sets".to_string(),
        SET_COUNT.to_string(),
        stats.non_empty_clauses().to_string(),
    ]);
    table.add_row(vec![
        "One set per node".to_string(),
        (cnf.variable_count() / SET_COUNT).to_string(),
        stats.exactly_one_clauses().to_string(),
    ]);
    table.add_row(vec![
        "Positive edges".to_string(),
        stats.positive_edges().to_string(),
        stats.positive_edge_clauses().to_string(),
    ]);
    table.add_row(vec![
        "Negative edges".to_string(),
        stats.negative_edges().to_string(),
        stats.negative_edge_clauses().to_string(),
    ]);
    table.add_row(vec![
        "Total".to_string(),
        format!("{} vars", cnf.variable_count()),
        stats.total_clauses().to_string(),
    ]);
    table
}

fn print_comment_table(table: &Table, to_stderr: bool) {
    for line in table.lines() {
        if to_stderr {
            eprintln!("c {line}");
        } else {
            println!("c {line}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = Args::parse();

    match args.command {
        Commands::Encode { output, input_file } => {
            let file = read_graph(&input_file)?;
            let (cnf, stats) = encode::<Stats>(&file.graph);

            // Keep standard output a clean DIMACS file.
            print_comment_table(&stats_table(&cnf, &stats), output.is_none());

            let mut writer = open_output(output.as_deref())?;
            dimacs::write(&cnf, &mut writer).context("Failed to write CNF")?;
            writer.flush().context("Failed to write CNF")?;
        }
        Commands::Solve {
            solver,
            solver_args,
            cnf,
            timeout_secs,
            input_file,
        } => {
            println!(
                "c {} {}",
                "graphsplit".bright_yellow(),
                env!("CARGO_PKG_VERSION")
            );
            let file = read_graph(&input_file)?;
            let config = SplitConfig {
                solver: SolverConfig {
                    program: solver,
                    args: solver_args,
                    timeout: timeout_secs.map(Duration::from_secs),
                    ..Default::default()
                },
                cnf_path: cnf,
            };

            let start_time = Instant::now();
            let partition = graphsplit::split(&file.graph, &config)?;
            println!("c solved in {:.4}s", start_time.elapsed().as_secs_f64());

            match partition {
                Some(partition) => {
                    println!("s {}", "SATISFIABLE".green());
                    print!("{partition}");
                }
                None => println!("s {}", "UNSATISFIABLE".red()),
            }
        }
        Commands::Decode {
            input_file,
            result_file,
        } => {
            let file = read_graph(&input_file)?;
            let output = read_input(result_file.as_deref())?;

            match solution::decode_solver_output(&output, file.graph.node_count())? {
                Some(partition) => {
                    if let Err(violation) = partition.verify(&file.graph) {
                        return Err(anyhow!("Solver answer does not fit the graph: {violation}"));
                    }
                    println!("s {}", "SATISFIABLE".green());
                    print!("{partition}");
                }
                None => println!("s {}", "UNSATISFIABLE".red()),
            }
        }
        Commands::Generate {
            nodes,
            negative,
            positive,
            density,
            seed,
            output,
        } => {
            let parameters = GraphParameters {
                node_count: nodes,
                negative_fraction: negative,
                positive_fraction: positive,
                density,
            };
            let seed = match seed {
                None => {
                    let seed = thread_rng().gen();
                    eprintln!("c Using random seed {seed}");
                    seed
                }
                Some(seed) => seed,
            };

            let file = generator::generate(&parameters, seed)?;
            let mut writer = open_output(output.as_deref())?;
            file.write(&mut writer).context("Failed to write graph")?;
            writer.flush().context("Failed to write graph")?;
        }
        Commands::Check { input_file } => {
            let input = read_input(input_file.as_deref())?;
            let dimacs = match dimacs::parse(&input).finish() {
                Ok((_, dimacs)) => dimacs,
                Err(err) => {
                    return Err(anyhow!(
                        "Failed to parse dimacs: {}",
                        nom::error::convert_error(input.as_str(), err)
                    ));
                }
            };

            let cnf: CNF = dimacs.into();
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::NOTHING);
            table.add_row(vec!["Variables".to_string(), cnf.variable_count().to_string()]);
            table.add_row(vec!["Clauses".to_string(), cnf.clause_count().to_string()]);
            table.add_row(vec![
                "Highest variable used".to_string(),
                cnf.max_variable()
                    .map_or("none".to_string(), |variable| variable.number().to_string()),
            ]);
            print_comment_table(&table, false);
        }
    }

    Ok(())
}
