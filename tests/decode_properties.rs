use proptest::prelude::*;
use trellis_dp::{find_best_path, find_path, WeightedGraph};

const LABELS: [char; 3] = ['a', 'b', 'c'];

/// Build a weighted graph over nodes `0..nodes` from raw edge tuples.
fn build_graph(nodes: u8, edges: &[(u8, u8, usize, u8)]) -> WeightedGraph<u8, char> {
    let mut g = WeightedGraph::new();
    for n in 0..nodes {
        g.add_node(n);
    }
    for &(from, to, label, weight) in edges {
        let p = f64::from(weight) / 10.0;
        g.add_weighted_edge(from % nodes, to % nodes, LABELS[label % LABELS.len()], p);
    }
    g
}

/// Every label-matching path from `start`, with its probability, by exhaustive DFS.
fn enumerate_paths(
    g: &WeightedGraph<u8, char>,
    start: u8,
    seq: &[char],
) -> Vec<(Vec<u8>, f64)> {
    let mut out = Vec::new();
    let mut stack = vec![(vec![start], 1.0f64)];
    while let Some((path, p)) = stack.pop() {
        let step = path.len() - 1;
        if step == seq.len() {
            out.push((path, p));
            continue;
        }
        let last = path[step];
        for t in g.transitions(&last) {
            if t.label == seq[step] {
                let mut next = path.clone();
                next.push(t.target);
                stack.push((next, p * t.weight));
            }
        }
    }
    out
}

fn graph_strategy() -> impl Strategy<Value = (u8, Vec<(u8, u8, usize, u8)>)> {
    (1u8..6).prop_flat_map(|nodes| {
        (
            Just(nodes),
            prop::collection::vec((0u8..6, 0u8..6, 0usize..3, 1u8..=10), 0..14),
        )
    })
}

fn sequence_strategy() -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(prop::sample::select(LABELS.to_vec()), 0..5)
}

proptest! {
    #[test]
    fn decoding_is_deterministic((nodes, edges) in graph_strategy(), seq in sequence_strategy()) {
        let g = build_graph(nodes, &edges);
        let first = find_best_path(&g, &0, &seq).unwrap();
        let second = find_best_path(&g, &0, &seq).unwrap();
        match (&first, &second) {
            (Some(a), Some(b)) => {
                prop_assert_eq!(&a.path, &b.path);
                prop_assert_eq!(a.log_probability.to_bits(), b.log_probability.to_bits());
                prop_assert_eq!(a.probability.to_bits(), b.probability.to_bits());
            }
            (None, None) => {}
            _ => prop_assert!(false, "outcomes differ between runs"),
        }

        let rebuilt = build_graph(nodes, &edges);
        prop_assert_eq!(find_path(&g, &0, &seq).unwrap(), find_path(&rebuilt, &0, &seq).unwrap());
    }

    #[test]
    fn found_paths_follow_the_sequence((nodes, edges) in graph_strategy(), seq in sequence_strategy()) {
        let g = build_graph(nodes, &edges);
        if let Some(path) = find_path(&g, &0, &seq).unwrap() {
            prop_assert_eq!(path.len(), seq.len() + 1);
            prop_assert_eq!(path[0], 0);
            prop_assert!(g.follows(&path, &seq));
        }
        if let Some(best) = find_best_path(&g, &0, &seq).unwrap() {
            prop_assert_eq!(best.path.len(), seq.len() + 1);
            prop_assert!(g.follows(&best.path, &seq));
        }
    }

    #[test]
    fn not_found_agrees_between_decoders((nodes, edges) in graph_strategy(), seq in sequence_strategy()) {
        let g = build_graph(nodes, &edges);
        let unweighted = g.strip_weights();
        let reachable = find_path(&unweighted, &0, &seq).unwrap();
        let best = find_best_path(&g, &0, &seq).unwrap();
        prop_assert_eq!(reachable.is_none(), best.is_none());
    }

    #[test]
    fn best_path_dominates_every_candidate((nodes, edges) in graph_strategy(), seq in sequence_strategy()) {
        let g = build_graph(nodes, &edges);
        let candidates = enumerate_paths(&g, 0, &seq);
        match find_best_path(&g, &0, &seq).unwrap() {
            None => prop_assert!(candidates.is_empty()),
            Some(best) => {
                prop_assert!(!candidates.is_empty());
                for (_, p) in &candidates {
                    prop_assert!(best.probability >= p * (1.0 - 1e-9));
                }
                let reported = g.path_probability(&best.path, &seq).unwrap();
                prop_assert!((reported - best.probability).abs() <= 1e-9);
            }
        }
    }

    #[test]
    fn empty_sequence_is_trivial((nodes, edges) in graph_strategy(), start in 0u8..6) {
        let g = build_graph(nodes, &edges);
        let start = start % nodes;
        prop_assert_eq!(find_path(&g, &start, &[]).unwrap(), Some(vec![start]));
        let best = find_best_path(&g, &start, &[]).unwrap().unwrap();
        prop_assert_eq!(best.path, vec![start]);
        prop_assert_eq!(best.probability, 1.0);
    }
}
