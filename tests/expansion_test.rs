use std::collections::{HashMap, HashSet, VecDeque};

use usagegraph::patterns::PatternSet;
use usagegraph::types::*;
use usagegraph::usage::*;

/// Helper: a graph of CLASS nodes joined by USE links, nodes in the order given.
fn use_graph(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
    Graph::new(
        nodes.iter().map(|n| Node::new(n, &[NodeType::Class])).collect(),
        edges
            .iter()
            .map(|(s, t)| Link::new(s, t, LinkKind::Use))
            .collect(),
    )
}

fn entries(patterns: &[&str]) -> PatternSet {
    patterns.iter().collect()
}

/// Sorted names first reached at `level`.
fn at(expansion: &Expansion, level: u32) -> Vec<String> {
    let mut names: Vec<String> = expansion
        .nodes_at(level)
        .into_iter()
        .map(String::from)
        .collect();
    names.sort();
    names
}

/// Reference hop distances computed independently of the expander.
fn reference_levels(
    graph: &Graph,
    starts: &[&str],
    direction: UsageDirection,
) -> HashMap<String, u32> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for l in &graph.links {
        let (s, t) = (l.source.as_str(), l.target.as_str());
        match direction {
            UsageDirection::Out => adjacency.entry(s).or_default().push(t),
            UsageDirection::In => adjacency.entry(t).or_default().push(s),
            UsageDirection::InOut => {
                adjacency.entry(s).or_default().push(t);
                adjacency.entry(t).or_default().push(s);
            }
        }
    }
    let known: HashSet<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
    let mut levels = HashMap::new();
    let mut queue = VecDeque::new();
    for s in starts {
        levels.insert(s.to_string(), 0);
        queue.push_back((*s, 0u32));
    }
    while let Some((current, depth)) = queue.pop_front() {
        for next in adjacency.get(current).into_iter().flatten() {
            if known.contains(next) && !levels.contains_key(*next) {
                levels.insert(next.to_string(), depth + 1);
                queue.push_back((*next, depth + 1));
            }
        }
    }
    levels
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_composition_chain_out() {
    let graph = use_graph(
        &["RootClass", "Composed1", "Composed2", "Composed3"],
        &[
            ("RootClass", "Composed1"),
            ("Composed1", "Composed2"),
            ("Composed1", "Composed3"),
        ],
    );
    let expansion = expand(&graph, &entries(&["RootClass"]), UsageDirection::Out);

    assert_eq!(at(&expansion, 0), vec!["RootClass"]);
    assert_eq!(at(&expansion, 1), vec!["Composed1"]);
    assert_eq!(at(&expansion, 2), vec!["Composed2", "Composed3"]);

    let node_counts: Vec<usize> = expansion.counts().iter().map(|c| c.nodes).collect();
    assert_eq!(node_counts, vec![1, 2, 4]);
    assert_eq!(expansion.max_level(), 2);
}

#[test]
fn test_in_out_stops_after_direct_neighbours() {
    let graph = use_graph(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("D", "A"), ("D", "B"), ("D", "C")],
    );
    let expansion = expand(&graph, &entries(&["D"]), UsageDirection::InOut);

    assert_eq!(at(&expansion, 0), vec!["D"]);
    assert_eq!(at(&expansion, 1), vec!["A", "B", "C"]);
    assert_eq!(expansion.max_level(), 1);
    assert_eq!(expansion.counts().len(), 2);
}

#[test]
fn test_in_direction_follows_users() {
    let graph = use_graph(
        &["Client", "Service", "Repo", "Unrelated"],
        &[("Client", "Service"), ("Service", "Repo"), ("Repo", "Unrelated")],
    );
    let expansion = expand(&graph, &entries(&["Repo"]), UsageDirection::In);

    assert_eq!(expansion.level_of("Service"), Some(1));
    assert_eq!(expansion.level_of("Client"), Some(2));
    assert_eq!(expansion.level_of("Unrelated"), None);
}

// ---------------------------------------------------------------------------
// Counts and link entries
// ---------------------------------------------------------------------------

#[test]
fn test_level_one_links_counted_once_deeper_links_per_endpoint() {
    let graph = use_graph(
        &["RootClass", "Composed1", "Composed2", "Composed3"],
        &[
            ("RootClass", "Composed1"),
            ("Composed1", "Composed2"),
            ("Composed1", "Composed3"),
        ],
    );
    let expansion = expand(&graph, &entries(&["RootClass"]), UsageDirection::Out);

    let link_counts: Vec<usize> = expansion.counts().iter().map(|c| c.links).collect();
    assert_eq!(link_counts, vec![0, 1, 5]);
    assert_eq!(expansion.links().len(), 5);
    let composed2 = expansion
        .links()
        .iter()
        .filter(|l| l.target == "Composed2")
        .count();
    assert_eq!(composed2, 2);
}

#[test]
fn test_self_loop_is_listed_once_per_visit() {
    let graph = use_graph(&["R", "A", "B"], &[("R", "A"), ("A", "A"), ("A", "B")]);
    let expansion = expand(&graph, &entries(&["R"]), UsageDirection::Out);

    let link_counts: Vec<usize> = expansion.counts().iter().map(|c| c.links).collect();
    assert_eq!(link_counts, vec![0, 1, 4]);
    let loops = expansion
        .links()
        .iter()
        .filter(|l| l.source == "A" && l.target == "A")
        .count();
    assert_eq!(loops, 1);
}

#[test]
fn test_in_out_deeper_levels_list_links_per_endpoint() {
    let graph = use_graph(&["a", "b", "c", "d"], &[("a", "b"), ("b", "c"), ("c", "d")]);
    let expansion = expand(&graph, &entries(&["a"]), UsageDirection::InOut);

    let node_counts: Vec<usize> = expansion.counts().iter().map(|c| c.nodes).collect();
    let link_counts: Vec<usize> = expansion.counts().iter().map(|c| c.links).collect();
    assert_eq!(node_counts, vec![1, 2, 3, 4]);
    // Level 2 revisits a->b from b, so it is listed again for both endpoints.
    assert_eq!(link_counts, vec![0, 1, 5, 9]);
    // The final level finds nothing new but still walks c->d from d.
    assert_eq!(expansion.links().len(), 11);
}

#[test]
fn test_trailing_level_links_stay_beyond_counts() {
    let graph = use_graph(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("D", "A"), ("D", "B"), ("D", "C")],
    );
    let expansion = expand(&graph, &entries(&["D"]), UsageDirection::InOut);

    let last = expansion.counts().last().unwrap();
    assert_eq!(last.links, 3);
    assert_eq!(expansion.links().len(), 3 + 4 * 2);
}

#[test]
fn test_counts_are_monotonic() {
    let graph = use_graph(
        &["a", "b", "c", "d", "e", "f"],
        &[("a", "b"), ("b", "c"), ("c", "d"), ("b", "e"), ("e", "f"), ("f", "a")],
    );
    for direction in [UsageDirection::In, UsageDirection::Out, UsageDirection::InOut] {
        let expansion = expand(&graph, &entries(&["a"]), direction);
        for pair in expansion.counts().windows(2) {
            assert!(pair[0].nodes < pair[1].nodes, "{direction}: each recorded level adds nodes");
            assert!(pair[0].links <= pair[1].links);
            assert_eq!(pair[0].level + 1, pair[1].level);
        }
        assert_eq!(
            expansion.counts().last().unwrap().nodes,
            expansion.nodes().len()
        );
    }
}

// ---------------------------------------------------------------------------
// BFS properties
// ---------------------------------------------------------------------------

#[test]
fn test_levels_equal_shortest_hop_distance() {
    let graph = use_graph(
        &["r", "a", "b", "c", "d", "e", "f", "g", "x"],
        &[
            ("r", "a"),
            ("r", "b"),
            ("a", "c"),
            ("b", "c"),
            ("c", "d"),
            ("d", "e"),
            ("a", "e"),
            ("f", "r"),
            ("g", "f"),
            ("e", "g"),
            ("x", "x"),
        ],
    );
    for direction in [UsageDirection::In, UsageDirection::Out, UsageDirection::InOut] {
        let expansion = expand(&graph, &entries(&["r"]), direction);
        let expected = reference_levels(&graph, &["r"], direction);
        let actual: HashMap<String, u32> = expansion
            .levels()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        assert_eq!(actual, expected, "direction {direction}");
        assert_eq!(expansion.nodes().len(), expansion.levels().len(), "no node leveled twice");
    }
}

#[test]
fn test_expansion_is_idempotent() {
    let graph = use_graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
    let first = expand(&graph, &entries(&["a"]), UsageDirection::InOut);
    let second = expand(&graph, &entries(&["a"]), UsageDirection::InOut);
    assert_eq!(first, second);
}

#[test]
fn test_several_entry_points_and_package_patterns() {
    let graph = use_graph(
        &["api.Front", "api.Back", "core.Engine", "core.Store"],
        &[("api.Front", "core.Engine"), ("api.Back", "core.Store")],
    );
    let expansion = expand(&graph, &entries(&["api"]), UsageDirection::Out);
    assert_eq!(at(&expansion, 0), vec!["api.Back", "api.Front"]);
    assert_eq!(at(&expansion, 1), vec!["core.Engine", "core.Store"]);
}

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

#[test]
fn test_unmatched_entry_point_stays_at_level_zero() {
    let graph = use_graph(&["A", "B"], &[("A", "B")]);
    let expansion = expand(&graph, &entries(&["Missing"]), UsageDirection::InOut);

    assert!(expansion.is_empty());
    assert_eq!(expansion.counts(), &[LevelCount { level: 0, nodes: 0, links: 0 }]);
    assert_eq!(expansion.max_level(), 0);
    assert!(expansion.links().is_empty());
}

#[test]
fn test_entry_point_without_links() {
    let graph = use_graph(&["A", "B"], &[]);
    let expansion = expand(&graph, &entries(&["A"]), UsageDirection::Out);
    assert_eq!(expansion.max_level(), 0);
    assert_eq!(expansion.nodes().len(), 1);
}

#[test]
fn test_dangling_links_are_tolerated() {
    let graph = use_graph(
        &["Root", "Kept"],
        &[("Root", "Gone"), ("Root", "Kept"), ("Kept", "AlsoGone")],
    );
    let expansion = expand(&graph, &entries(&["Root"]), UsageDirection::Out);

    assert_eq!(expansion.level_of("Kept"), Some(1));
    assert_eq!(expansion.level_of("Gone"), None);
    assert_eq!(expansion.nodes().len(), 2);
    // Level 1 lists both selected links, even the dangling one.
    assert_eq!(expansion.counts()[1].links, 2);
}

#[test]
fn test_direction_parsing() {
    assert_eq!("in".parse::<UsageDirection>().unwrap(), UsageDirection::In);
    assert_eq!("OUT".parse::<UsageDirection>().unwrap(), UsageDirection::Out);
    assert_eq!("IN-OUT".parse::<UsageDirection>().unwrap(), UsageDirection::InOut);
    assert_eq!("in_out".parse::<UsageDirection>().unwrap(), UsageDirection::InOut);
    assert!("sideways".parse::<UsageDirection>().is_err());
    assert_eq!(UsageDirection::default(), UsageDirection::Out);
    assert_eq!(UsageDirection::InOut.to_string(), "IN-OUT");
}
