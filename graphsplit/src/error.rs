use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The graph violates the structural invariants, or its description could not be read.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Failed to parse graph description: {0}")]
    Parse(String),

    #[error("A graph needs at least one node")]
    EmptyGraph,

    #[error("A graph with {node_count} nodes exceeds the limit of {max} nodes")]
    TooManyNodes { node_count: usize, max: usize },

    #[error("The {matrix} matrix should have {expected} rows and columns, found {found}")]
    MatrixShape {
        matrix: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Node {node} has an edge to itself")]
    SelfLoop { node: usize },

    #[error("Node {node} does not exist in a graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    #[error("The edge between nodes {x} and {y} is given more than once")]
    DuplicateEdge { x: usize, y: usize },

    #[error("The matrices are not symmetric at nodes {x} and {y}")]
    NotSymmetric { x: usize, y: usize },

    #[error("The adjacency and sign matrices disagree on the edge between nodes {x} and {y}")]
    SignMismatch { x: usize, y: usize },

    #[error("Invalid graph parameters: {0}")]
    InvalidParameters(String),
}

/// The solver could not be run to completion.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Failed to launch solver {program:?}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed while waiting for the solver: {0}")]
    Wait(#[source] io::Error),

    #[error("Failed to capture solver output: {0}")]
    Capture(#[source] io::Error),

    #[error("Solver timed out after {0:?}")]
    Timeout(Duration),

    #[error("Solver exited with code {code}: {stderr}")]
    AbnormalExit { code: i32, stderr: String },

    #[error("Solver was terminated by a signal: {stderr}")]
    Terminated { stderr: String },
}

/// The solver output does not follow the result format.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum DecodeError {
    #[error("No status line in solver output")]
    MissingStatus,

    #[error("More than one status line in solver output (line {line})")]
    DuplicateStatus { line: usize },

    #[error("Unexpected solver status {0:?}")]
    UnknownStatus(String),

    #[error("Malformed value line {line}: {text:?}")]
    MalformedValues { line: usize, text: String },

    #[error("Literal {literal} is outside of the {variable_count} encoded variables")]
    LiteralOutOfRange { literal: i64, variable_count: usize },

    #[error("Variable {variable} is assigned both true and false")]
    ConflictingValue { variable: i64 },

    #[error("Values continue after the terminating 0 (line {line})")]
    ValuesAfterTerminator { line: usize },

    #[error("The value lines are not terminated by 0")]
    MissingTerminator,

    #[error("Solver assigned {found} of {expected} variables")]
    Truncated { expected: usize, found: usize },

    #[error("Node {node} is not assigned to any set")]
    NoSet { node: usize },

    #[error("Node {node} is assigned to more than one set")]
    MultipleSets { node: usize },
}

/// A partition that does not respect the graph it was decoded for.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum PartitionViolation {
    #[error("The partition covers {found} nodes but the graph has {expected}")]
    NodeCountMismatch { expected: usize, found: usize },

    #[error("Set {set} is empty")]
    EmptySet { set: usize },

    #[error("Nodes {x} and {y} share a positive edge but are in different sets")]
    PositiveEdgeSplit { x: usize, y: usize },

    #[error("Nodes {x} and {y} share a negative edge but are in the same set")]
    NegativeEdgeJoined { x: usize, y: usize },
}

/// A partition request failed; the variant names the stage.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("Failed to write CNF file {path:?}: {source}")]
    WriteCnf {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Solver stage failed: {0}")]
    Solver(#[from] SolverError),

    #[error("Failed to decode solver output: {0}")]
    Decode(#[from] DecodeError),
}
