//! Splitting signed graphs into three sets through a SAT solver.
//!
//! A graph is encoded into CNF ([`encoding`]), written in the DIMACS format ([`dimacs`]),
//! handed to an external solver ([`solver`]) and the answer is decoded back into a
//! [`Partition`](solution::Partition) ([`solution`]).

use crate::error::SplitError;
use crate::graph::SignedGraph;
use crate::solution::Partition;
use crate::solver::SolverConfig;
use crate::stats::NoStats;
use log::{debug, info};
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod cnf;
pub mod dimacs;
pub mod encoding;
pub mod error;
pub mod generator;
pub mod graph;
pub mod sat;
pub mod solution;
pub mod solver;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

/// Settings of a whole partition request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SplitConfig {
    pub solver: SolverConfig,
    /// Where the CNF handed to the solver is written.
    pub cnf_path: PathBuf,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            solver: SolverConfig::default(),
            cnf_path: PathBuf::from("graphsplit.cnf"),
        }
    }
}

/// Splits the graph into three non-empty sets honoring every edge.
///
/// Returns `Ok(None)` if the solver proved that no such partition exists. Failures to write
/// the CNF, to run the solver or to understand its answer are errors, never `None`.
pub fn split(graph: &SignedGraph, config: &SplitConfig) -> Result<Option<Partition>, SplitError> {
    let (cnf, _) = encoding::encode::<NoStats>(graph);

    write_cnf(&cnf, &config.cnf_path).map_err(|source| SplitError::WriteCnf {
        path: config.cnf_path.clone(),
        source,
    })?;
    debug!("Wrote CNF to {}", config.cnf_path.display());

    let output = solver::run(&config.solver, &config.cnf_path)?;
    let partition = solution::decode_solver_output(&output, graph.node_count())?;

    match &partition {
        Some(_) => info!("Found a partition of {} nodes", graph.node_count()),
        None => info!("No partition of {} nodes exists", graph.node_count()),
    }
    Ok(partition)
}

/// Writes the CNF to a file in the DIMACS format.
pub fn write_cnf(cnf: &cnf::CNF, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    dimacs::write(cnf, &mut writer)?;
    writer.flush()
}
