//! Reduction of the three-way signed graph partition problem to CNF.
//!
//! Every node `n` owns three consecutive variables `3n + 1`, `3n + 2` and `3n + 3`,
//! the first one being true iff the node is in set 0, and so on.

use crate::cnf::{Clause, Literal, Variable, VariableType, CNF};
use crate::graph::{EdgeSign, SignedGraph, MAX_NODE_COUNT};
use crate::stats::StatsStorage;
use itertools::Itertools;
use log::debug;
use static_assertions::const_assert;

#[cfg(test)]
mod tests;

/// The number of sets a graph is split into.
pub const SET_COUNT: usize = 3;

const_assert!(MAX_NODE_COUNT * SET_COUNT <= crate::cnf::MAX_VARIABLE_COUNT);

/// Returns the variable which is true iff `node` belongs to `set`.
#[inline]
pub fn set_variable(node: usize, set: usize) -> Variable {
    debug_assert!(set < SET_COUNT);
    debug_assert!(node < MAX_NODE_COUNT);
    Variable::new((node * SET_COUNT + set + 1) as VariableType)
}

/// Returns the variable representing membership of `node` in set 0.
#[inline]
pub fn first_variable(node: usize) -> Variable {
    set_variable(node, 0)
}

/// Returns the variables of `node`, indexed by set.
#[inline]
pub fn node_variables(node: usize) -> [Variable; SET_COUNT] {
    let first = first_variable(node).number();
    [
        Variable::new(first),
        Variable::new(first + 1),
        Variable::new(first + 2),
    ]
}

/// Returns the number of variables used to encode a graph with `node_count` nodes.
#[inline]
pub fn variable_count(node_count: usize) -> usize {
    node_count * SET_COUNT
}

/// Returns the number of clauses [`encode`] produces for the graph.
pub fn expected_clause_count(graph: &SignedGraph) -> usize {
    let positive = graph.edges_with_sign(EdgeSign::Positive).count();
    let negative = graph.edges_with_sign(EdgeSign::Negative).count();
    SET_COUNT + 4 * graph.node_count() + 8 * positive + 3 * negative
}

/// Encodes the partition problem of the graph.
///
/// The CNF is satisfiable iff the nodes can be split into three non-empty sets such that
/// positive edges stay within a set and negative edges cross between sets. Clauses are
/// emitted in a fixed order: set non-emptiness, one set per node, positive edges and
/// finally negative edges.
pub fn encode<TStats: StatsStorage>(graph: &SignedGraph) -> (CNF, TStats) {
    let mut stats = TStats::default();
    let mut cnf = CNF::new(variable_count(graph.node_count()));

    for set in 0..SET_COUNT {
        cnf.add_clause(non_empty(graph.node_count(), set));
        stats.increment_non_empty_clauses();
    }

    for node in 0..graph.node_count() {
        for clause in exactly_one(node) {
            cnf.add_clause(clause);
            stats.increment_exactly_one_clauses();
        }
    }

    for (x, y) in graph.edges_with_sign(EdgeSign::Positive) {
        stats.increment_positive_edges();
        for clause in same_set(x, y) {
            cnf.add_clause(clause);
            stats.increment_positive_edge_clauses();
        }
    }

    for (x, y) in graph.edges_with_sign(EdgeSign::Negative) {
        stats.increment_negative_edges();
        for clause in different_sets(x, y) {
            cnf.add_clause(clause);
            stats.increment_negative_edge_clauses();
        }
    }

    debug_assert_eq!(cnf.clause_count(), expected_clause_count(graph));
    debug!(
        "Encoded {} nodes into {} variables and {} clauses",
        graph.node_count(),
        cnf.variable_count(),
        cnf.clause_count()
    );

    (cnf, stats)
}

/// At least one node is in `set`.
fn non_empty(node_count: usize, set: usize) -> Clause {
    (0..node_count)
        .map(|node| Literal::new(set_variable(node, set), true))
        .collect()
}

/// The node is in exactly one set: one clause for "at least one" and one per pair of sets
/// forbidding both at once.
fn exactly_one(node: usize) -> impl Iterator<Item = Clause> {
    let variables = node_variables(node);

    let at_least_one: Clause = variables
        .iter()
        .map(|&variable| Literal::new(variable, true))
        .collect();
    let at_most_one = variables
        .into_iter()
        .tuple_combinations()
        .map(|(a, b)| Clause::from_iter([Literal::new(a, false), Literal::new(b, false)]));

    std::iter::once(at_least_one).chain(at_most_one)
}

/// Nodes `x` and `y` are in the same set.
///
/// For each of the eight ways to pick, per set, either the variable of `x` or the variable
/// of `y`, the picked variables form a clause. If the nodes are in different sets `s` and `t`,
/// picking `y` for `s`, `x` for `t` and anything for the third set yields a clause with no
/// true literal. If they share a set, every clause contains a true literal for it.
fn same_set(x: usize, y: usize) -> impl Iterator<Item = Clause> {
    let x_variables = node_variables(x);
    let y_variables = node_variables(y);

    (0..SET_COUNT)
        .map(move |set| [x_variables[set], y_variables[set]].into_iter())
        .multi_cartesian_product()
        .map(|picked| {
            Clause::from_iter(
                picked
                    .into_iter()
                    .map(|variable| Literal::new(variable, true)),
            )
        })
}

/// Nodes `x` and `y` are never both in the same set.
fn different_sets(x: usize, y: usize) -> impl Iterator<Item = Clause> {
    (0..SET_COUNT).map(move |set| {
        Clause::from_iter([
            Literal::new(set_variable(x, set), false),
            Literal::new(set_variable(y, set), false),
        ])
    })
}
