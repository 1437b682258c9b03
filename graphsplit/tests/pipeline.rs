#![cfg(unix)]

use graphsplit::error::{SolverError, SplitError};
use graphsplit::graph::{EdgeSign, GraphFile, SignedGraph};
use graphsplit::solver::SolverConfig;
use graphsplit::{dimacs, split, SplitConfig};
use nom::Finish;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

fn cnf_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("graphsplit-{}-{name}.cnf", std::process::id()))
}

/// A stand-in solver that echoes the CNF header as a comment and prints a canned answer.
fn canned_solver(answer: &str, exit_code: i32) -> SolverConfig {
    let body = format!("printf 'c %s\\n' \"$(head -n 1 \"$1\")\"; printf '{answer}'; exit {exit_code}");
    SolverConfig {
        program: PathBuf::from("sh"),
        args: vec!["-c".to_string(), body, "solver".to_string()],
        ..Default::default()
    }
}

fn negative_triangle() -> SignedGraph {
    SignedGraph::from_edges(
        3,
        [
            (0, 1, EdgeSign::Negative),
            (1, 2, EdgeSign::Negative),
            (0, 2, EdgeSign::Negative),
        ],
    )
    .unwrap()
}

#[test]
fn satisfiable_answer_becomes_partition() {
    let path = cnf_path("sat");
    let config = SplitConfig {
        solver: canned_solver("s SATISFIABLE\\nv -1 2 -3 4 -5 -6 -7 -8 9 0\\n", 10),
        cnf_path: path.clone(),
    };

    let partition = split(&negative_triangle(), &config).unwrap().unwrap();
    assert_eq!(partition.sets(), [vec![1], vec![0], vec![2]]);
    assert_eq!(partition.verify(&negative_triangle()), Ok(()));

    // The solver was handed a well-formed instance with matching header counts.
    let text = fs::read_to_string(&path).unwrap();
    let (_, dimacs) = dimacs::parse(&text).finish().ok().unwrap();
    assert_eq!(dimacs.variable_count(), 9);
    assert_eq!(dimacs.clauses().len(), 24);
    assert!(text.starts_with("p cnf 9 24\n"));

    fs::remove_file(path).unwrap();
}

#[test]
fn unsatisfiable_answer_is_none() {
    let path = cnf_path("unsat");
    let config = SplitConfig {
        solver: canned_solver("s UNSATISFIABLE\\n", 20),
        cnf_path: path.clone(),
    };

    let graph = SignedGraph::empty(2).unwrap();
    assert!(split(&graph, &config).unwrap().is_none());

    fs::remove_file(path).unwrap();
}

#[test]
fn truncated_answer_is_a_decode_error() {
    let path = cnf_path("truncated");
    let config = SplitConfig {
        solver: canned_solver("s SATISFIABLE\\nv -1 2 -3 0\\n", 10),
        cnf_path: path.clone(),
    };

    assert!(matches!(
        split(&negative_triangle(), &config),
        Err(SplitError::Decode(_))
    ));

    fs::remove_file(path).unwrap();
}

#[test]
fn crashing_solver_is_not_unsatisfiable() {
    let path = cnf_path("crash");
    let config = SplitConfig {
        solver: canned_solver("s UNSATISFIABLE\\n", 134),
        cnf_path: path.clone(),
    };

    assert!(matches!(
        split(&negative_triangle(), &config),
        Err(SplitError::Solver(SolverError::AbnormalExit { code: 134, .. }))
    ));

    fs::remove_file(path).unwrap();
}

#[test]
fn timeout_is_a_solver_error() {
    let path = cnf_path("timeout");
    let config = SplitConfig {
        solver: SolverConfig {
            program: PathBuf::from("sh"),
            args: vec!["-c".to_string(), "exec sleep 10".to_string()],
            timeout: Some(Duration::from_millis(200)),
            ..Default::default()
        },
        cnf_path: path.clone(),
    };

    assert!(matches!(
        split(&negative_triangle(), &config),
        Err(SplitError::Solver(SolverError::Timeout(_)))
    ));

    fs::remove_file(path).unwrap();
}

#[test]
fn unwritable_cnf_stops_before_solving() {
    let config = SplitConfig {
        solver: SolverConfig {
            program: PathBuf::from("/nonexistent/graphsplit-solver"),
            ..Default::default()
        },
        cnf_path: PathBuf::from("/nonexistent/directory/graph.cnf"),
    };

    // A launch error would mean the solver was attempted.
    assert!(matches!(
        split(&negative_triangle(), &config),
        Err(SplitError::WriteCnf { .. })
    ));
}

#[test]
fn parsed_graph_file_runs_through_pipeline() {
    let path = cnf_path("file");
    let file = GraphFile::parse("4\n0.5\n0.5\n0.5\n0100\n1000\n0000\n0000\n0+00\n+000\n0000\n0000\n")
        .unwrap();
    let config = SplitConfig {
        // Nodes 1 and 2 in set 0, node 3 in set 1, node 4 in set 2.
        solver: canned_solver(
            "c banner\\ns SATISFIABLE\\nv 1 -2 -3 4 -5 -6\\nv -7 8 -9 -10 -11 12 0\\n",
            10,
        ),
        cnf_path: path.clone(),
    };

    let partition = split(&file.graph, &config).unwrap().unwrap();
    assert_eq!(partition.to_string(), "set 1: 1 2\nset 2: 3\nset 3: 4\n");

    fs::remove_file(path).unwrap();
}
