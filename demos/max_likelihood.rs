//! Example: most probable label-matching path.
//!
//! Run with:
//! `cargo run --example max_likelihood`

use trellis_dp::{find_best_path, WeightedGraph};

fn main() {
    // Same lattice as the reachability demo, with transition probabilities.
    // Only paths whose labels spell the sequence are candidates, so for
    // "ab" the A-C-D branch (0.45) never competes with A-B-D (0.30).
    let mut graph = WeightedGraph::new();
    graph.add_weighted_edge("A", "B", 'a', 0.5);
    graph.add_weighted_edge("A", "C", 'b', 0.5);
    graph.add_weighted_edge("B", "D", 'b', 0.6);
    graph.add_weighted_edge("C", "D", 'a', 0.9);

    let sequence = ['a', 'b'];
    match find_best_path(&graph, &"A", &sequence) {
        Ok(Some(best)) => {
            println!("Best path: {}", best.path.join(" -> "));
            println!("Probability: {:.4}", best.probability);
            println!("Log-probability: {:.4}", best.log_probability);
        }
        Ok(None) => println!("No path found"),
        Err(err) => eprintln!("decode failed: {err}"),
    }
}
