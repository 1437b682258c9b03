//! Helpers shared by the unit tests.

use crate::cnf::{Literal, Variable, VariableType, CNF};
use crate::graph::{EdgeSign, SignedGraph};
use crate::sat::{VariableResults, VariableValue};

/// Finds a satisfying assignment by trying all of them.
pub(crate) fn brute_force(cnf: &CNF) -> Option<VariableResults> {
    let variable_count = cnf.variable_count();
    assert!(variable_count <= 16, "Too many variables to enumerate");

    (0u32..1 << variable_count)
        .map(|bits| {
            VariableResults::from_literals(
                variable_count,
                (1..=variable_count).map(|number| {
                    let is_true = (bits >> (number - 1)) & 1 == 1;
                    Literal::new(Variable::new(number as VariableType), is_true)
                }),
            )
        })
        .find(|values| cnf.is_satisfied_by(values))
}

/// Three nodes, every pair joined by an edge of the given sign.
pub(crate) fn triangle(sign: EdgeSign) -> SignedGraph {
    SignedGraph::from_edges(3, [(0, 1, sign), (1, 2, sign), (0, 2, sign)]).unwrap()
}

/// Formats an assignment the way solvers print it.
pub(crate) fn value_line(values: &VariableResults) -> String {
    let literals: Vec<_> = values
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, state)| match state {
            VariableValue::True => format!("{i}"),
            VariableValue::False | VariableValue::Unset => format!("-{i}"),
        })
        .collect();
    format!("v {} 0", literals.join(" "))
}
