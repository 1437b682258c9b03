use crate::error::GraphError;
use crate::graph::{EdgeSign, GraphFile, GraphParameters, SignedGraph};
use log::debug;
use rand::prelude::*;
use rand_pcg::Pcg64Mcg;

/// Generates a random signed graph.
///
/// Every pair of nodes is joined with probability `density`. An edge is negative with
/// probability `negative_fraction / (negative_fraction + positive_fraction)` and positive
/// otherwise. The same seed always yields the same graph.
pub fn generate(parameters: &GraphParameters, seed: u64) -> Result<GraphFile, GraphError> {
    parameters.validate()?;

    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let weight = parameters.negative_fraction + parameters.positive_fraction;
    let negative_probability = if weight > 0.0 {
        parameters.negative_fraction / weight
    } else {
        0.0
    };

    let node_count = parameters.node_count;
    let mut edges = Vec::new();
    for x in 0..node_count {
        for y in (x + 1)..node_count {
            if !rng.gen_bool(parameters.density) {
                continue;
            }
            let sign = if rng.gen_bool(negative_probability) {
                EdgeSign::Negative
            } else {
                EdgeSign::Positive
            };
            edges.push((x, y, sign));
        }
    }
    debug!(
        "Generated {} edges over {} nodes from seed {seed}",
        edges.len(),
        node_count
    );

    Ok(GraphFile {
        parameters: *parameters,
        graph: SignedGraph::from_edges(node_count, edges)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters(node_count: usize, negative: f64, positive: f64, density: f64) -> GraphParameters {
        GraphParameters {
            node_count,
            negative_fraction: negative,
            positive_fraction: positive,
            density,
        }
    }

    #[test]
    fn same_seed_same_graph() {
        let parameters = parameters(12, 0.3, 0.7, 0.5);
        let first = generate(&parameters, 42).unwrap();
        let second = generate(&parameters, 42).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn full_density_connects_every_pair() {
        let file = generate(&parameters(6, 0.5, 0.5, 1.0), 7).unwrap();
        assert_eq!(file.graph.edge_count(), 15);
    }

    #[test]
    fn zero_density_has_no_edges() {
        let file = generate(&parameters(6, 0.5, 0.5, 0.0), 7).unwrap();
        assert_eq!(file.graph.edge_count(), 0);
    }

    #[test]
    fn only_negative_fraction_gives_negative_edges() {
        let file = generate(&parameters(8, 1.0, 0.0, 1.0), 3).unwrap();
        assert!(file
            .graph
            .edges()
            .all(|(_, _, sign)| sign == EdgeSign::Negative));
    }

    #[test]
    fn zero_fractions_default_to_positive_edges() {
        let file = generate(&parameters(5, 0.0, 0.0, 1.0), 3).unwrap();
        assert!(file
            .graph
            .edges()
            .all(|(_, _, sign)| sign == EdgeSign::Positive));
    }

    #[test]
    fn generated_file_parses_back() {
        let file = generate(&parameters(9, 0.4, 0.6, 0.4), 11).unwrap();
        let parsed = GraphFile::parse(&file.to_string()).unwrap();
        assert_eq!(parsed, file);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(
            generate(&parameters(0, 0.5, 0.5, 0.5), 1),
            Err(GraphError::EmptyGraph)
        ));
        assert!(matches!(
            generate(&parameters(4, 0.5, 0.5, f64::NAN), 1),
            Err(GraphError::InvalidParameters(_))
        ));
    }
}
