use std::collections::BTreeSet;

use proptest::prelude::*;
use rgtopo_analysis::graph::{ReactionGraph, decompose};
use rgtopo_analysis::metrics::betweenness::betweenness_centrality;
use rgtopo_analysis::metrics::closeness::closeness_centrality;
use rgtopo_analysis::metrics::degree::{
    degree_centrality, in_degree_centrality, out_degree_centrality,
};
use rgtopo_analysis::topology::{
    Reachability, analyze_reachability, ratio_in_out, source_sink_classification,
};
use rgtopo_core::ClosenessDirection;

/// Up to 12 nodes `R0..`, edges drawn from all ordered pairs (self-loops
/// included).
fn arb_graph() -> impl Strategy<Value = ReactionGraph> {
    (1usize..12).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..(n * 2)).prop_map(move |pairs| {
            let nodes: Vec<String> = (0..n).map(|i| format!("R{i}")).collect();
            let edges: Vec<(String, String)> = pairs
                .into_iter()
                .map(|(a, b)| (format!("R{a}"), format!("R{b}")))
                .collect();
            ReactionGraph::from_parts("prop", nodes, edges).expect("endpoints are nodes")
        })
    })
}

/// Acyclic apart from self-loops: edges only go from lower to higher index.
fn arb_dag() -> impl Strategy<Value = ReactionGraph> {
    (2usize..12).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..(n * 2)).prop_map(move |pairs| {
            let nodes: Vec<String> = (0..n).map(|i| format!("R{i}")).collect();
            let edges: Vec<(String, String)> = pairs
                .into_iter()
                .map(|(a, b)| (format!("R{}", a.min(b)), format!("R{}", a.max(b))))
                .collect();
            ReactionGraph::from_parts("dag", nodes, edges).expect("endpoints are nodes")
        })
    })
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn components_partition_nodes_and_edges(g in arb_graph()) {
        let comps = decompose(&g);
        let mut seen = BTreeSet::new();
        let mut edges = BTreeSet::new();
        for c in &comps {
            for id in c.graph().node_ids() {
                prop_assert!(seen.insert(id.to_string()), "{} duplicated", id);
            }
            edges.extend(c.graph().edge_set());
        }
        prop_assert_eq!(seen, g.node_set());
        prop_assert_eq!(edges, g.edge_set());
    }

    #[test]
    fn components_are_sorted_by_size(g in arb_graph()) {
        let sizes: Vec<usize> = decompose(&g).iter().map(|c| c.node_count()).collect();
        prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn roles_are_exhaustive(g in arb_graph()) {
        let roles = source_sink_classification(&g);
        let keys: BTreeSet<String> = roles.keys().cloned().collect();
        prop_assert_eq!(keys, g.node_set());
    }

    #[test]
    fn degree_is_in_plus_out(g in arb_graph()) {
        let (i, o, d) = (in_degree_centrality(&g), out_degree_centrality(&g), degree_centrality(&g));
        for (id, total) in &d {
            prop_assert!((total - (i[id] + o[id])).abs() < 1e-12);
        }
    }

    #[test]
    fn ratio_is_zero_without_out_edges(g in arb_graph()) {
        let ratio = ratio_in_out(&g);
        let out = g.out_degrees();
        for (idx, id) in g.node_ids().enumerate() {
            if out[idx] == 0 {
                prop_assert!((ratio[id] - 0.0).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn non_eigen_measures_are_finite(g in arb_graph()) {
        for m in [
            closeness_centrality(&g, ClosenessDirection::Outward),
            closeness_centrality(&g, ClosenessDirection::Inward),
            betweenness_centrality(&g),
        ] {
            prop_assert_eq!(m.len(), g.node_count());
            prop_assert!(m.values().all(|v| v.is_finite() && *v >= 0.0));
        }
    }

    #[test]
    fn sinks_have_no_successors_and_sources_no_predecessors(g in arb_dag()) {
        let roles = source_sink_classification(&g);
        let Reachability::Linear { successors, predecessors } = analyze_reachability(&g) else {
            return Err(TestCaseError::fail("forward-only edges must be acyclic"));
        };
        for (id, role) in &roles {
            match role.as_str() {
                "sink" => prop_assert_eq!(successors[id], 0),
                "source" => prop_assert_eq!(predecessors[id], 0),
                _ => {}
            }
        }
    }
}
