use super::*;
use crate::generator::generate;
use crate::graph::GraphParameters;
use crate::sat::{VariableResults, VariableValue};
use crate::stats::{NoStats, Stats};
use crate::testing::{brute_force, triangle};

/// An assignment placing node `i` in `sets[i]`.
fn placement(sets: &[usize]) -> VariableResults {
    VariableResults::from_literals(
        variable_count(sets.len()),
        sets.iter().enumerate().flat_map(|(node, &placed)| {
            (0..SET_COUNT).map(move |set| Literal::new(set_variable(node, set), set == placed))
        }),
    )
}

fn set_of(values: &VariableResults, node: usize) -> usize {
    let sets: Vec<_> = (0..SET_COUNT)
        .filter(|&set| values.get(set_variable(node, set)) == VariableValue::True)
        .collect();
    assert_eq!(sets.len(), 1, "node {node} should be in exactly one set");
    sets[0]
}

#[test]
fn variables_are_dense_and_contiguous_per_node() {
    assert_eq!(set_variable(0, 0).number(), 1);
    assert_eq!(set_variable(0, 2).number(), 3);
    assert_eq!(set_variable(1, 0).number(), 4);
    assert_eq!(set_variable(4, 1).number(), 14);
    assert_eq!(first_variable(7).number(), 22);
    assert_eq!(
        node_variables(2),
        [Variable::new(7), Variable::new(8), Variable::new(9)]
    );
    assert_eq!(variable_count(5), 15);
}

#[test]
fn exactly_one_accepts_only_one_hot_assignments() {
    let clauses: Vec<_> = exactly_one(0).collect();
    assert_eq!(clauses.len(), 4);

    for bits in 0u8..8 {
        let values = VariableResults::from_literals(
            3,
            (0..SET_COUNT).map(|set| Literal::new(set_variable(0, set), bits >> set & 1 == 1)),
        );
        let satisfied = clauses.iter().all(|clause| clause.is_satisfied_by(&values));
        assert_eq!(satisfied, bits.count_ones() == 1, "assignment {bits:03b}");
    }
}

#[test]
fn same_set_clauses_accept_only_matching_sets() {
    let clauses: Vec<_> = same_set(0, 1).collect();
    assert_eq!(clauses.len(), 8);

    for x_set in 0..SET_COUNT {
        for y_set in 0..SET_COUNT {
            let values = placement(&[x_set, y_set]);
            let satisfied = clauses.iter().all(|clause| clause.is_satisfied_by(&values));
            assert_eq!(satisfied, x_set == y_set, "x in {x_set}, y in {y_set}");
        }
    }
}

#[test]
fn same_set_clauses_pick_one_variable_per_set() {
    let first = same_set(0, 1).next().unwrap();
    let last = same_set(0, 1).last().unwrap();

    let raw = |clause: &Clause| clause.literals().iter().map(|l| l.as_raw()).collect::<Vec<_>>();
    assert_eq!(raw(&first), vec![1, 2, 3]);
    assert_eq!(raw(&last), vec![4, 5, 6]);
}

#[test]
fn different_sets_clauses_reject_shared_set() {
    let clauses: Vec<_> = different_sets(0, 1).collect();
    assert_eq!(clauses.len(), 3);

    for x_set in 0..SET_COUNT {
        for y_set in 0..SET_COUNT {
            let values = placement(&[x_set, y_set]);
            let satisfied = clauses.iter().all(|clause| clause.is_satisfied_by(&values));
            assert_eq!(satisfied, x_set != y_set, "x in {x_set}, y in {y_set}");
        }
    }
}

#[test]
fn stats_count_clauses_per_rule() {
    let graph = SignedGraph::from_edges(
        4,
        [
            (0, 1, EdgeSign::Positive),
            (1, 2, EdgeSign::Negative),
            (2, 3, EdgeSign::Negative),
        ],
    )
    .unwrap();
    let (cnf, stats) = encode::<Stats>(&graph);

    assert_eq!(stats.non_empty_clauses(), 3);
    assert_eq!(stats.exactly_one_clauses(), 16);
    assert_eq!(stats.positive_edges(), 1);
    assert_eq!(stats.positive_edge_clauses(), 8);
    assert_eq!(stats.negative_edges(), 2);
    assert_eq!(stats.negative_edge_clauses(), 6);
    assert_eq!(stats.total_clauses(), cnf.clause_count() as u64);
}

#[test]
fn clauses_follow_rule_order() {
    let graph = SignedGraph::from_edges(
        3,
        [(1, 2, EdgeSign::Negative), (0, 1, EdgeSign::Positive)],
    )
    .unwrap();
    let (cnf, _) = encode::<NoStats>(&graph);
    let clauses = cnf.clauses();

    // Non-emptiness of set 1 lists every node's second variable.
    assert_eq!(clauses[1].literals().len(), 3);
    assert_eq!(clauses[1].literals()[2].as_raw(), 8);
    // Exactly-one block of node 0 starts right after.
    assert_eq!(clauses[3].literals().len(), 3);
    assert_eq!(clauses[4].literals()[0].as_raw(), -1);
    // The positive edge comes before the negative one, which closes the CNF.
    assert_eq!(clauses[15].literals().len(), 3);
    assert_eq!(clauses[23].literals().len(), 2);
    assert_eq!(clauses[23].literals()[0].as_raw(), -4);
    assert_eq!(clauses.len(), 3 + 12 + 8 + 3);
}

#[test]
fn random_graphs_match_clause_formula() {
    for seed in 0..200 {
        let parameters = GraphParameters {
            node_count: 1 + (seed as usize % 12),
            negative_fraction: 0.5,
            positive_fraction: 0.5,
            density: 0.4,
        };
        let graph = generate(&parameters, seed).unwrap().graph;
        let node_count = graph.node_count();
        let positive = graph.edges_with_sign(EdgeSign::Positive).count();
        let negative = graph.edges_with_sign(EdgeSign::Negative).count();

        let (cnf, stats) = encode::<Stats>(&graph);
        let expected = 3 + 4 * node_count + 8 * positive + 3 * negative;
        assert_eq!(cnf.clause_count(), expected, "seed {seed}");
        assert_eq!(expected_clause_count(&graph), expected, "seed {seed}");
        assert_eq!(stats.total_clauses(), expected as u64, "seed {seed}");
        assert_eq!(cnf.variable_count(), 3 * node_count, "seed {seed}");

        for clause in cnf.clauses() {
            assert!(!clause.is_empty(), "seed {seed}");
            for literal in clause.literals() {
                let number = literal.variable().number() as usize;
                assert!((1..=3 * node_count).contains(&number), "seed {seed}");
            }
        }
    }
}

#[generic_tests::define]
mod graphs {
    use super::*;

    #[instantiate_tests(<NoStats>)]
    mod no_stats {}

    #[instantiate_tests(<Stats>)]
    mod with_stats {}

    #[test]
    fn triangle_all_positive_has_39_clauses<TStats: StatsStorage>() {
        let (cnf, _) = encode::<TStats>(&triangle(EdgeSign::Positive));
        assert_eq!(cnf.variable_count(), 9);
        assert_eq!(cnf.clause_count(), 39);
    }

    #[test]
    fn triangle_all_positive_cannot_fill_three_sets<TStats: StatsStorage>() {
        // All three nodes must share a set, which leaves the other two sets empty.
        let (cnf, _) = encode::<TStats>(&triangle(EdgeSign::Positive));
        assert!(brute_force(&cnf).is_none());
    }

    #[test]
    fn positive_triangle_with_spare_nodes_shares_a_set<TStats: StatsStorage>() {
        let graph = SignedGraph::from_edges(
            5,
            [
                (0, 1, EdgeSign::Positive),
                (1, 2, EdgeSign::Positive),
                (0, 2, EdgeSign::Positive),
            ],
        )
        .unwrap();
        let (cnf, _) = encode::<TStats>(&graph);
        assert_eq!(cnf.clause_count(), 3 + 20 + 24);

        let values = brute_force(&cnf).unwrap();
        let set = set_of(&values, 0);
        assert_eq!(set_of(&values, 1), set);
        assert_eq!(set_of(&values, 2), set);
    }

    #[test]
    fn triangle_all_negative_uses_every_set<TStats: StatsStorage>() {
        let (cnf, _) = encode::<TStats>(&triangle(EdgeSign::Negative));
        assert_eq!(cnf.clause_count(), 24);

        let values = brute_force(&cnf).unwrap();
        let mut sets: Vec<_> = (0..3).map(|node| set_of(&values, node)).collect();
        sets.sort_unstable();
        assert_eq!(sets, vec![0, 1, 2]);
    }

    #[test]
    fn empty_graph_needs_three_nodes<TStats: StatsStorage>() {
        for node_count in 1..=5 {
            let graph = SignedGraph::empty(node_count).unwrap();
            let (cnf, _) = encode::<TStats>(&graph);

            assert_eq!(cnf.clause_count(), 3 + 4 * node_count);
            assert_eq!(brute_force(&cnf).is_some(), node_count >= 3);
        }
    }

    #[test]
    fn literals_stay_within_variable_range<TStats: StatsStorage>() {
        let graph = SignedGraph::from_edges(
            6,
            [
                (0, 5, EdgeSign::Positive),
                (1, 4, EdgeSign::Negative),
                (2, 3, EdgeSign::Negative),
                (3, 5, EdgeSign::Positive),
            ],
        )
        .unwrap();
        let (cnf, _) = encode::<TStats>(&graph);

        assert_eq!(cnf.max_variable(), Some(Variable::new(18)));
        for clause in cnf.clauses() {
            for literal in clause.literals() {
                let number = literal.variable().number() as usize;
                assert!((1..=18).contains(&number));
            }
        }
        assert_eq!(cnf.clause_count(), expected_clause_count(&graph));
        assert_eq!(cnf.clause_count(), 3 + 24 + 16 + 6);
    }

    #[test]
    fn odd_negative_cycle_fits_three_sets<TStats: StatsStorage>() {
        // A 5-cycle of negative edges is not 2-colorable but is 3-colorable.
        let graph = SignedGraph::from_edges(
            5,
            (0..5).map(|node| (node, (node + 1) % 5, EdgeSign::Negative)),
        )
        .unwrap();
        let (cnf, _) = encode::<TStats>(&graph);

        let values = brute_force(&cnf).unwrap();
        for node in 0..5 {
            assert_ne!(set_of(&values, node), set_of(&values, (node + 1) % 5));
        }
    }

    #[test]
    fn negative_edge_inside_positive_component_is_unsat<TStats: StatsStorage>() {
        let graph = SignedGraph::from_edges(
            4,
            [
                (0, 1, EdgeSign::Positive),
                (1, 2, EdgeSign::Positive),
                (0, 2, EdgeSign::Negative),
            ],
        )
        .unwrap();
        let (cnf, _) = encode::<TStats>(&graph);
        assert!(brute_force(&cnf).is_none());
    }
}
