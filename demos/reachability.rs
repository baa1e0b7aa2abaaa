//! Example: find any path whose edge labels spell a word.
//!
//! Run with:
//! `cargo run --example reachability`

use trellis_dp::{find_path, LabeledGraph};

fn main() {
    // A tiny pronunciation lattice: each edge emits one sound.
    //
    //   A --a--> B --b--> D
    //   A --b--> C --a--> D
    let mut graph: LabeledGraph<&str, char> = LabeledGraph::new();
    graph.add_edge("A", "B", 'a');
    graph.add_edge("A", "C", 'b');
    graph.add_edge("B", "D", 'b');
    graph.add_edge("C", "D", 'a');

    for sequence in [vec!['a', 'b'], vec!['b', 'a'], vec!['a', 'a'], vec![]] {
        match find_path(&graph, &"A", &sequence) {
            Ok(Some(path)) => println!("{sequence:?}: {}", path.join(" -> ")),
            Ok(None) => println!("{sequence:?}: no path found"),
            Err(err) => eprintln!("{sequence:?}: {err}"),
        }
    }
}
