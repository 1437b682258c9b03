//! Signed undirected graphs and the plain-text graph description format.
//!
//! A description consists of four scalar lines (node count, negative edge fraction,
//! positive edge fraction, density) followed by the adjacency matrix and the sign matrix,
//! one row per line. Adjacency cells are `1` or `0`, sign cells are `+`, `-` or `0` (no edge).

use crate::cnf::MAX_VARIABLE_COUNT;
use crate::encoding::SET_COUNT;
use crate::error::GraphError;
use nom::Finish;
use std::fmt;
use std::io;
use std::io::Write;

/// The largest graph whose encoding still fits into the variable range.
pub const MAX_NODE_COUNT: usize = MAX_VARIABLE_COUNT / SET_COUNT;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EdgeSign {
    /// Both endpoints must share a set.
    Positive,
    /// The endpoints must be in different sets.
    Negative,
}

/// An immutable signed graph over the nodes `0..node_count`.
///
/// Every unordered pair of distinct nodes carries at most one signed edge.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedGraph {
    node_count: usize,
    // Row-major `node_count * node_count` matrix, kept symmetric with an empty diagonal.
    signs: Vec<Option<EdgeSign>>,
}

/// The scalar header of a graph description.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GraphParameters {
    pub node_count: usize,
    pub negative_fraction: f64,
    pub positive_fraction: f64,
    pub density: f64,
}

/// A parsed graph description: the header parameters together with the graph itself.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphFile {
    pub parameters: GraphParameters,
    pub graph: SignedGraph,
}

impl SignedGraph {
    /// Creates a graph with the given nodes and no edges.
    pub fn empty(node_count: usize) -> Result<Self, GraphError> {
        if node_count == 0 {
            return Err(GraphError::EmptyGraph);
        }
        if node_count > MAX_NODE_COUNT {
            return Err(GraphError::TooManyNodes {
                node_count,
                max: MAX_NODE_COUNT,
            });
        }
        Ok(SignedGraph {
            node_count,
            signs: vec![None; node_count * node_count],
        })
    }

    /// Creates a graph from a list of undirected edges.
    ///
    /// Self-loops, nodes out of range and pairs listed more than once are rejected.
    pub fn from_edges(
        node_count: usize,
        edges: impl IntoIterator<Item = (usize, usize, EdgeSign)>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::empty(node_count)?;
        for (x, y, sign) in edges {
            for node in [x, y] {
                if node >= node_count {
                    return Err(GraphError::NodeOutOfRange { node, node_count });
                }
            }
            if x == y {
                return Err(GraphError::SelfLoop { node: x });
            }
            if graph.sign(x, y).is_some() {
                return Err(GraphError::DuplicateEdge { x, y });
            }
            graph.set_sign(x, y, sign);
        }
        Ok(graph)
    }

    /// Creates a graph from the two parallel matrices of a graph description.
    ///
    /// Both matrices must be square, symmetric, empty on the diagonal and agree on
    /// which pairs carry an edge.
    pub fn from_matrices(
        adjacency: &[Vec<bool>],
        signs: &[Vec<Option<EdgeSign>>],
    ) -> Result<Self, GraphError> {
        let node_count = adjacency.len();
        let mut graph = Self::empty(node_count)?;

        if signs.len() != node_count {
            return Err(GraphError::MatrixShape {
                matrix: "sign",
                expected: node_count,
                found: signs.len(),
            });
        }
        for (matrix, lengths) in [
            ("adjacency", adjacency.iter().map(Vec::len).collect::<Vec<_>>()),
            ("sign", signs.iter().map(Vec::len).collect()),
        ] {
            if let Some(&found) = lengths.iter().find(|&&len| len != node_count) {
                return Err(GraphError::MatrixShape {
                    matrix,
                    expected: node_count,
                    found,
                });
            }
        }

        for x in 0..node_count {
            if adjacency[x][x] || signs[x][x].is_some() {
                return Err(GraphError::SelfLoop { node: x });
            }
            for y in (x + 1)..node_count {
                if adjacency[x][y] != adjacency[y][x] || signs[x][y] != signs[y][x] {
                    return Err(GraphError::NotSymmetric { x, y });
                }
                if adjacency[x][y] != signs[x][y].is_some() {
                    return Err(GraphError::SignMismatch { x, y });
                }
                if let Some(sign) = signs[x][y] {
                    graph.set_sign(x, y, sign);
                }
            }
        }

        Ok(graph)
    }

    fn set_sign(&mut self, x: usize, y: usize, sign: EdgeSign) {
        self.signs[x * self.node_count + y] = Some(sign);
        self.signs[y * self.node_count + x] = Some(sign);
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns the sign of the edge between two nodes, `None` if they are not adjacent.
    ///
    /// # Panics
    /// Panics if either node is out of range.
    #[inline]
    pub fn sign(&self, x: usize, y: usize) -> Option<EdgeSign> {
        assert!(x < self.node_count && y < self.node_count);
        self.signs[x * self.node_count + y]
    }

    #[inline]
    pub fn is_adjacent(&self, x: usize, y: usize) -> bool {
        self.sign(x, y).is_some()
    }

    /// Iterates over every edge once, as `(x, y, sign)` with `x < y`, in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, EdgeSign)> + '_ {
        (0..self.node_count).flat_map(move |x| {
            ((x + 1)..self.node_count)
                .filter_map(move |y| self.sign(x, y).map(|sign| (x, y, sign)))
        })
    }

    /// Iterates over the edges of the given sign, each once with `x < y`.
    pub fn edges_with_sign(&self, sign: EdgeSign) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges()
            .filter(move |&(_, _, edge_sign)| edge_sign == sign)
            .map(|(x, y, _)| (x, y))
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }
}

impl GraphParameters {
    /// Checks that the parameters describe a graph that can be generated.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.node_count == 0 {
            return Err(GraphError::EmptyGraph);
        }
        if self.node_count > MAX_NODE_COUNT {
            return Err(GraphError::TooManyNodes {
                node_count: self.node_count,
                max: MAX_NODE_COUNT,
            });
        }
        for (name, value) in [
            ("negative edge fraction", self.negative_fraction),
            ("positive edge fraction", self.positive_fraction),
            ("density", self.density),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GraphError::InvalidParameters(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl GraphFile {
    /// Parses a graph description and validates the graph it contains.
    pub fn parse(input: &str) -> Result<GraphFile, GraphError> {
        let (_, raw) = match parser::graph_file(input).finish() {
            Ok(parsed) => parsed,
            Err(err) => {
                return Err(GraphError::Parse(nom::error::convert_error(input, err)));
            }
        };

        let graph = SignedGraph::from_matrices(&raw.adjacency, &raw.signs)?;

        Ok(GraphFile {
            parameters: GraphParameters {
                node_count: raw.node_count,
                negative_fraction: raw.negative_fraction,
                positive_fraction: raw.positive_fraction,
                density: raw.density,
            },
            graph,
        })
    }

    /// Writes the description in the same format [`GraphFile::parse`] reads.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

impl fmt::Display for GraphFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = &self.graph;
        writeln!(f, "{}", graph.node_count())?;
        writeln!(f, "{}", self.parameters.negative_fraction)?;
        writeln!(f, "{}", self.parameters.positive_fraction)?;
        writeln!(f, "{}", self.parameters.density)?;

        for x in 0..graph.node_count() {
            let row: String = (0..graph.node_count())
                .map(|y| if graph.is_adjacent(x, y) { '1' } else { '0' })
                .collect();
            writeln!(f, "{row}")?;
        }
        for x in 0..graph.node_count() {
            let row: String = (0..graph.node_count())
                .map(|y| match graph.sign(x, y) {
                    Some(EdgeSign::Positive) => '+',
                    Some(EdgeSign::Negative) => '-',
                    None => '0',
                })
                .collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

mod parser {
    use super::EdgeSign;
    use nom::branch::alt;
    use nom::character::complete::u64 as text_u64;
    use nom::character::complete::{line_ending, multispace0, one_of, space0};
    use nom::combinator::{eof, map, map_res};
    use nom::error::{context, VerboseError};
    use nom::multi::count;
    use nom::number::complete::double;
    use nom::sequence::{delimited, preceded, tuple};
    use nom::{IResult, Parser};

    pub(super) struct RawGraphFile {
        pub(super) node_count: usize,
        pub(super) negative_fraction: f64,
        pub(super) positive_fraction: f64,
        pub(super) density: f64,
        pub(super) adjacency: Vec<Vec<bool>>,
        pub(super) signs: Vec<Vec<Option<EdgeSign>>>,
    }

    pub(super) fn graph_file(i: &str) -> IResult<&str, RawGraphFile, VerboseError<&str>> {
        let (i, node_count) = context("node count", line(map_res(text_u64, usize::try_from)))(i)?;
        let (i, negative_fraction) = context("negative edge fraction", line(double))(i)?;
        let (i, positive_fraction) = context("positive edge fraction", line(double))(i)?;
        let (i, density) = context("density", line(double))(i)?;

        let (i, adjacency) = count(
            context("adjacency row", line(row(node_count, adjacency_cell))),
            node_count,
        )(i)?;
        let (i, signs) = count(
            context("sign row", line(row(node_count, sign_cell))),
            node_count,
        )(i)?;

        // Trailing blank lines are fine, anything else is not.
        let (i, _) = context("end of file", tuple((multispace0, eof)))(i)?;

        Ok((
            i,
            RawGraphFile {
                node_count,
                negative_fraction,
                positive_fraction,
                density,
                adjacency,
                signs,
            },
        ))
    }

    /// Wraps a parser so that it consumes a whole line, including its line ending.
    /// The last line of the input may lack one.
    fn line<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, VerboseError<&'a str>>
    where
        F: Parser<&'a str, O, VerboseError<&'a str>>,
    {
        delimited(space0, inner, tuple((space0, alt((line_ending, eof)))))
    }

    /// A matrix row of exactly `width` cells. Cells may be separated by spaces.
    fn row<'a, O, F>(
        width: usize,
        cell: F,
    ) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<O>, VerboseError<&'a str>>
    where
        F: Parser<&'a str, O, VerboseError<&'a str>>,
    {
        count(preceded(space0, cell), width)
    }

    fn adjacency_cell(i: &str) -> IResult<&str, bool, VerboseError<&str>> {
        map(one_of("01"), |cell| cell == '1')(i)
    }

    fn sign_cell(i: &str) -> IResult<&str, Option<EdgeSign>, VerboseError<&str>> {
        map(one_of("+-0"), |cell| match cell {
            '+' => Some(EdgeSign::Positive),
            '-' => Some(EdgeSign::Negative),
            _ => None,
        })(i)
    }
}
