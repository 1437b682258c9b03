//! Decoding of solver results into partitions.
//!
//! Solvers report their answer as a status line `s SATISFIABLE` or `s UNSATISFIABLE`,
//! followed, when satisfiable, by one or more `v` lines listing every variable with its
//! sign and ending in `0`. Lines starting with `c` are comments.

use crate::cnf::{Literal, Variable, VariableType};
use crate::encoding::{node_variables, variable_count, SET_COUNT};
use crate::error::{DecodeError, PartitionViolation};
use crate::graph::{EdgeSign, SignedGraph};
use crate::sat::{Solution, VariableResults, VariableValue};
use itertools::Itertools;
use log::debug;
use nom::Finish;
use std::fmt;

/// An assignment of every node to one of the three sets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Partition {
    membership: Vec<usize>,
}

/// Parses solver output for a CNF over `variable_count` variables.
pub fn parse_solver_output(output: &str, variable_count: usize) -> Result<Solution, DecodeError> {
    let mut satisfiable = None;
    let mut values = VariableResults::new_unset(variable_count);
    let mut terminated = false;

    for (index, text) in output.lines().enumerate() {
        let line = index + 1;
        let parsed = match parser::output_line(text).finish() {
            Ok((_, parsed)) => parsed,
            Err(_) => {
                return Err(DecodeError::MalformedValues {
                    line,
                    text: text.to_string(),
                })
            }
        };

        match parsed {
            parser::OutputLine::Status(status) => {
                if satisfiable.is_some() {
                    return Err(DecodeError::DuplicateStatus { line });
                }
                satisfiable = Some(match status {
                    "SATISFIABLE" => true,
                    "UNSATISFIABLE" => false,
                    other => return Err(DecodeError::UnknownStatus(other.to_string())),
                });
            }
            parser::OutputLine::Values(literals) => {
                for literal in literals {
                    if terminated {
                        return Err(DecodeError::ValuesAfterTerminator { line });
                    }
                    if literal == 0 {
                        terminated = true;
                        continue;
                    }
                    if literal.unsigned_abs() as usize > variable_count {
                        return Err(DecodeError::LiteralOutOfRange {
                            literal,
                            variable_count,
                        });
                    }

                    // Bounded by `variable_count`, which fits the underlying type.
                    let variable = Variable::new(literal.unsigned_abs() as VariableType);
                    let value = VariableValue::from(literal > 0);
                    match values.get(variable) {
                        VariableValue::Unset => {
                            values.set_to_literal(Literal::new(variable, literal > 0))
                        }
                        previous if previous != value => {
                            return Err(DecodeError::ConflictingValue {
                                variable: literal.abs(),
                            })
                        }
                        _ => {}
                    }
                }
            }
            parser::OutputLine::Comment | parser::OutputLine::Blank => {}
            parser::OutputLine::Other => {
                debug!("Ignoring unrecognized solver output line {line}: {text:?}");
            }
        }
    }

    match satisfiable {
        None => Err(DecodeError::MissingStatus),
        Some(false) => Ok(Solution::Unsatisfiable),
        Some(true) => {
            if !terminated {
                return Err(DecodeError::MissingTerminator);
            }
            let assigned = values.assigned_count();
            if assigned < variable_count {
                return Err(DecodeError::Truncated {
                    expected: variable_count,
                    found: assigned,
                });
            }
            Ok(Solution::Satisfiable(values))
        }
    }
}

/// Parses solver output for the encoding of a graph with `node_count` nodes.
///
/// Returns `Ok(None)` if the solver proved that no partition exists.
pub fn decode_solver_output(
    output: &str,
    node_count: usize,
) -> Result<Option<Partition>, DecodeError> {
    match parse_solver_output(output, variable_count(node_count))? {
        Solution::Satisfiable(values) => Partition::decode(node_count, &values).map(Some),
        Solution::Unsatisfiable => Ok(None),
    }
}

impl Partition {
    /// Reads the set of every node from a satisfying assignment of the encoding.
    ///
    /// Exactly one of the three variables of each node has to be true.
    pub fn decode(node_count: usize, values: &VariableResults) -> Result<Self, DecodeError> {
        if values.variable_count() < variable_count(node_count) {
            return Err(DecodeError::Truncated {
                expected: variable_count(node_count),
                found: values.assigned_count(),
            });
        }

        let membership = (0..node_count)
            .map(|node| {
                let sets: Vec<_> = node_variables(node)
                    .iter()
                    .positions(|&variable| values.get(variable) == VariableValue::True)
                    .collect();
                match sets[..] {
                    [set] => Ok(set),
                    [] => Err(DecodeError::NoSet { node }),
                    _ => Err(DecodeError::MultipleSets { node }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Partition { membership })
    }

    /// Creates a partition from the set index of every node.
    /// Returns `None` if a set index is out of range.
    pub fn from_membership(membership: Vec<usize>) -> Option<Self> {
        if membership.iter().all(|&set| set < SET_COUNT) {
            Some(Partition { membership })
        } else {
            None
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.membership.len()
    }

    /// Returns the set index of `node`.
    #[inline]
    pub fn set_of(&self, node: usize) -> usize {
        self.membership[node]
    }

    /// Returns the nodes of every set in ascending order.
    pub fn sets(&self) -> [Vec<usize>; SET_COUNT] {
        let mut sets: [Vec<usize>; SET_COUNT] = Default::default();
        for (node, &set) in self.membership.iter().enumerate() {
            sets[set].push(node);
        }
        sets
    }

    /// Checks that every set is occupied and every edge constraint holds.
    /// Reports the first violation found.
    pub fn verify(&self, graph: &SignedGraph) -> Result<(), PartitionViolation> {
        if self.node_count() != graph.node_count() {
            return Err(PartitionViolation::NodeCountMismatch {
                expected: graph.node_count(),
                found: self.node_count(),
            });
        }
        if let Some(set) = self.sets().iter().position(Vec::is_empty) {
            return Err(PartitionViolation::EmptySet { set });
        }
        for (x, y, sign) in graph.edges() {
            let shared = self.set_of(x) == self.set_of(y);
            match sign {
                EdgeSign::Positive if !shared => {
                    return Err(PartitionViolation::PositiveEdgeSplit { x, y })
                }
                EdgeSign::Negative if shared => {
                    return Err(PartitionViolation::NegativeEdgeJoined { x, y })
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Finds a partition by trying every placement of the nodes.
    ///
    /// Takes `3^n` steps, only usable as a reference on small graphs.
    pub fn search_exhaustive(graph: &SignedGraph) -> Option<Partition> {
        let node_count = graph.node_count();
        let mut membership = vec![0; node_count];

        loop {
            let partition = Partition {
                membership: membership.clone(),
            };
            if partition.verify(graph).is_ok() {
                return Some(partition);
            }

            // Advance a base-3 counter, finishing once it wraps around.
            let mut position = 0;
            loop {
                if position == node_count {
                    return None;
                }
                membership[position] += 1;
                if membership[position] < SET_COUNT {
                    break;
                }
                membership[position] = 0;
                position += 1;
            }
        }
    }
}

impl fmt::Display for Partition {
    /// Lists every set with its nodes numbered from 1.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, nodes) in self.sets().iter().enumerate() {
            let nodes = nodes.iter().map(|node| node + 1).join(" ");
            writeln!(f, "set {}: {}", set + 1, nodes)?;
        }
        Ok(())
    }
}

mod parser {
    use nom::branch::alt;
    use nom::bytes::complete::take_while1;
    use nom::character::complete::i64 as text_i64;
    use nom::character::complete::{char, space0, space1};
    use nom::combinator::{eof, map, rest, value};
    use nom::error::{context, VerboseError};
    use nom::multi::separated_list1;
    use nom::sequence::{delimited, preceded, terminated, tuple};
    use nom::IResult;

    #[derive(Clone, Debug, Eq, PartialEq)]
    pub(super) enum OutputLine<'a> {
        Blank,
        Comment,
        Status(&'a str),
        Values(Vec<i64>),
        Other,
    }

    pub(super) fn output_line(i: &str) -> IResult<&str, OutputLine, VerboseError<&str>> {
        alt((
            value(OutputLine::Blank, tuple((space0, eof))),
            value(OutputLine::Comment, preceded(char('c'), rest)),
            status,
            values,
            value(OutputLine::Other, rest),
        ))(i)
    }

    fn status(i: &str) -> IResult<&str, OutputLine, VerboseError<&str>> {
        context(
            "status",
            map(
                delimited(
                    tuple((char('s'), space1)),
                    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
                    tuple((space0, eof)),
                ),
                OutputLine::Status,
            ),
        )(i)
    }

    /// A `v` line. Once it starts like one, it has to be well-formed, or the whole line fails.
    fn values(i: &str) -> IResult<&str, OutputLine, VerboseError<&str>> {
        let (i, _) = tuple((char('v'), space1))(i)?;
        let (i, literals) = nom::combinator::cut(context(
            "values",
            terminated(separated_list1(space1, text_i64), tuple((space0, eof))),
        ))(i)?;
        Ok((i, OutputLine::Values(literals)))
    }
}
