use trellis_dp::{find_best_path, find_path, DecodeError, LabeledGraph, WeightedGraph};

fn sound_graph() -> LabeledGraph<char, char> {
    let mut g: LabeledGraph<char, char> = LabeledGraph::new();
    g.add_edge('A', 'B', 'a');
    g.add_edge('A', 'C', 'b');
    g.add_edge('B', 'D', 'b');
    g.add_edge('C', 'D', 'a');
    g.add_node('D');
    g
}

fn weighted_sound_graph() -> WeightedGraph<char, char> {
    let mut g = WeightedGraph::new();
    g.add_weighted_edge('A', 'B', 'a', 0.5);
    g.add_weighted_edge('A', 'C', 'b', 0.5);
    g.add_weighted_edge('B', 'D', 'b', 0.6);
    g.add_weighted_edge('C', 'D', 'a', 0.9);
    g
}

#[test]
fn reachability_example_path() {
    let g = sound_graph();
    let path = find_path(&g, &'A', &['a', 'b']).unwrap();
    assert_eq!(path, Some(vec!['A', 'B', 'D']));
}

#[test]
fn reachability_other_branch() {
    let g = sound_graph();
    let path = find_path(&g, &'A', &['b', 'a']).unwrap();
    assert_eq!(path, Some(vec!['A', 'C', 'D']));
}

#[test]
fn max_likelihood_example_path() {
    let g = weighted_sound_graph();
    let best = find_best_path(&g, &'A', &['a', 'b']).unwrap().unwrap();
    assert_eq!(best.path, vec!['A', 'B', 'D']);
    assert!((best.probability - 0.3).abs() < 1e-12);
    assert!((best.log_probability - (0.5f64.ln() + 0.6f64.ln())).abs() < 1e-12);
}

#[test]
fn empty_sequence_returns_start() {
    let g = sound_graph();
    assert_eq!(find_path(&g, &'B', &[]).unwrap(), Some(vec!['B']));

    let w = weighted_sound_graph();
    let best = find_best_path(&w, &'D', &[]).unwrap().unwrap();
    assert_eq!(best.path, vec!['D']);
    assert_eq!(best.probability, 1.0);
    assert_eq!(best.log_probability, 0.0);
}

#[test]
fn absent_label_is_not_found() {
    let g = sound_graph();
    assert_eq!(find_path(&g, &'A', &['a', 'z']).unwrap(), None);
    assert_eq!(find_path(&g, &'A', &['c']).unwrap(), None);

    let w = weighted_sound_graph();
    assert_eq!(find_best_path(&w, &'A', &['a', 'z']).unwrap(), None);
}

#[test]
fn sequence_longer_than_any_path_is_not_found() {
    let g = sound_graph();
    assert_eq!(find_path(&g, &'A', &['a', 'b', 'a']).unwrap(), None);
}

#[test]
fn invalid_start_fails_immediately() {
    let g = sound_graph();
    assert_eq!(find_path(&g, &'Z', &[]), Err(DecodeError::InvalidStart));

    let w = weighted_sound_graph();
    assert_eq!(find_best_path(&w, &'Z', &['a']), Err(DecodeError::InvalidStart));
}

#[test]
fn target_only_node_is_a_valid_start() {
    // 'D' only ever appears as a transition target.
    let w = weighted_sound_graph();
    assert_eq!(find_best_path(&w, &'D', &['a']).unwrap(), None);
}

#[test]
fn non_positive_probabilities_are_rejected() {
    for p in [0.0, -0.5, f64::NAN] {
        let mut g = WeightedGraph::new();
        g.add_weighted_edge("s", "t", 'x', 1.0);
        g.add_weighted_edge("t", "u", 'y', p);
        let err = find_best_path(&g, &"s", &['x', 'y']).unwrap_err();
        match err {
            DecodeError::InvalidProbability { step, probability } => {
                assert_eq!(step, 1);
                assert!(probability.is_nan() || probability == p);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}

#[test]
fn probability_above_one_is_rejected() {
    let mut g = WeightedGraph::new();
    g.add_weighted_edge(1, 2, 'x', 1.25);
    assert!(matches!(
        find_best_path(&g, &1, &['x']),
        Err(DecodeError::InvalidProbability { step: 0, .. })
    ));
}

#[test]
fn unnormalized_weights_are_accepted() {
    let mut g = WeightedGraph::new();
    g.add_weighted_edge('A', 'B', 'a', 1.0);
    g.add_weighted_edge('A', 'C', 'a', 1.0);
    g.add_weighted_edge('A', 'D', 'a', 0.9);
    let best = find_best_path(&g, &'A', &['a']).unwrap().unwrap();
    // B and C tie; B was inserted first.
    assert_eq!(best.path, vec!['A', 'B']);
    assert_eq!(best.probability, 1.0);
}

#[test]
fn self_loops_repeat_symbols() {
    let mut g = WeightedGraph::new();
    g.add_weighted_edge(0u8, 0, 'h', 0.5);
    g.add_weighted_edge(0u8, 1, 'i', 0.5);
    let seq = ['h', 'h', 'h', 'i'];
    let best = find_best_path(&g, &0, &seq).unwrap().unwrap();
    assert_eq!(best.path, vec![0, 0, 0, 0, 1]);
    assert!((best.probability - 0.0625).abs() < 1e-12);
    assert_eq!(find_path(&g, &0, &seq).unwrap(), Some(vec![0, 0, 0, 0, 1]));
}

#[test]
fn parallel_edges_use_the_most_probable() {
    let mut g = WeightedGraph::new();
    g.add_weighted_edge('A', 'B', 'a', 0.2);
    g.add_weighted_edge('A', 'B', 'a', 0.7);
    let best = find_best_path(&g, &'A', &['a']).unwrap().unwrap();
    assert!((best.probability - 0.7).abs() < 1e-12);
}

#[test]
fn long_sequences_stay_finite_in_log_space() {
    let mut g = WeightedGraph::new();
    g.add_weighted_edge("loop", "loop", 0u8, 0.5);
    let seq = vec![0u8; 2_000];
    let best = find_best_path(&g, &"loop", &seq).unwrap().unwrap();
    assert_eq!(best.path.len(), 2_001);
    let expected = 2_000.0 * 0.5f64.ln();
    assert!((best.log_probability - expected).abs() < 1e-6);
    assert!(best.log_probability.is_finite());
    // 0.5^2000 is far below the smallest subnormal f64.
    assert_eq!(best.probability, 0.0);
}

#[test]
fn most_probable_terminal_is_selected() {
    let mut g = WeightedGraph::new();
    g.add_weighted_edge("s", "low", 'x', 0.2);
    g.add_weighted_edge("s", "high", 'x', 0.8);
    let best = find_best_path(&g, &"s", &['x']).unwrap().unwrap();
    assert_eq!(best.path, vec!["s", "high"]);

    // Reachability ignores weights and keeps the first inserted terminal.
    assert_eq!(find_path(&g, &"s", &['x']).unwrap(), Some(vec!["s", "low"]));
}

#[test]
fn string_labels_and_nodes() {
    let mut g: LabeledGraph<String, String> = LabeledGraph::new();
    g.add_edge("q0".to_string(), "q1".to_string(), "ka".to_string());
    g.add_edge("q1".to_string(), "q2".to_string(), "ta".to_string());
    let seq = vec!["ka".to_string(), "ta".to_string()];
    let path = find_path(&g, &"q0".to_string(), &seq).unwrap().unwrap();
    assert_eq!(path, vec!["q0", "q1", "q2"]);
    assert!(g.follows(&path, &seq));
}
