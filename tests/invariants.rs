use linkrank::{
    pagerank_checked_run, pagerank_run_from, sample_pagerank_checked, sample_pagerank_run,
    transition, GraphRef, LinkGraph, PageRankConfig, SamplingConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn assert_prob_like(xs: &[f64]) {
    assert!(!xs.is_empty());
    for &x in xs {
        assert!(x.is_finite(), "non-finite score: {x}");
        assert!(x >= 0.0, "negative score: {x}");
    }
    let s: f64 = xs.iter().copied().sum();
    assert!((s - 1.0).abs() <= 1e-5, "sum={s} not ~1");
}

fn corpus0() -> LinkGraph {
    LinkGraph::build([
        ("1.html", vec!["2.html"]),
        ("2.html", vec!["1.html", "3.html"]),
        ("3.html", vec!["2.html", "4.html"]),
        ("4.html", vec!["2.html"]),
    ])
}

fn pair() -> LinkGraph {
    LinkGraph::build([("a.html", ["b.html"]), ("b.html", ["a.html"])])
}

fn with_dangling() -> LinkGraph {
    LinkGraph::build([
        ("a.html", vec!["b.html", "c.html"]),
        ("b.html", vec!["c.html"]),
        ("c.html", vec![]),
    ])
}

#[test]
fn transition_rows_are_stochastic_for_every_page() {
    for g in [corpus0(), pair(), with_dangling()] {
        for page in g.pages() {
            let row = g.transition(page, 0.85).unwrap();
            assert_eq!(row.len(), g.len());
            assert!((row.total() - 1.0).abs() < 1e-5, "{page}: {}", row.total());
        }
    }
}

#[test]
fn symmetric_pair_ranks_half_each() {
    let g = pair();

    let iterated = pagerank_checked_run(&g, PageRankConfig::default()).unwrap();
    assert!(iterated.converged);
    for &r in &iterated.scores {
        assert!((r - 0.5).abs() < 1e-9, "{:?}", iterated.scores);
    }

    let config = SamplingConfig {
        seed: Some(2024),
        ..SamplingConfig::default()
    };
    let sampled = sample_pagerank_checked(&g, config).unwrap();
    for &r in &sampled {
        assert!((r - 0.5).abs() < 0.05, "{sampled:?}");
    }
}

#[test]
fn dangling_mass_is_redistributed_not_lost() {
    let g = with_dangling();
    assert_eq!(g.dangling_pages().collect::<Vec<_>>(), vec!["c.html"]);

    let run = pagerank_checked_run(&g, PageRankConfig::default()).unwrap();
    assert!(run.converged);
    assert_prob_like(&run.scores);
}

#[test]
fn estimators_agree_on_a_corpus_with_dangling_pages() {
    let g = with_dangling();
    let exact = pagerank_checked_run(
        &g,
        PageRankConfig {
            tolerance: 1e-9,
            ..PageRankConfig::default()
        },
    )
    .unwrap();
    let config = SamplingConfig {
        seed: Some(99),
        samples: 50_000,
        ..SamplingConfig::default()
    };
    let sampled = sample_pagerank_checked(&g, config).unwrap();
    assert_prob_like(&sampled);

    let diff = g.label(&exact.scores).max_abs_diff(&g.label(&sampled));
    assert!(diff < 0.03, "diff={diff}");
}

#[test]
fn iteration_is_idempotent_on_its_own_output() {
    let g = corpus0();
    let config = PageRankConfig::default();
    let first = pagerank_checked_run(&g, config).unwrap();
    assert_prob_like(&first.scores);

    let again = pagerank_run_from(&g, config, &first.scores).unwrap();
    for (a, b) in first.scores.iter().zip(&again.scores) {
        assert!((a - b).abs() <= config.tolerance, "a={a} b={b}");
    }
}

#[test]
fn seeded_sources_reproduce_the_walk() {
    let g = corpus0();
    let config = SamplingConfig {
        samples: 5_000,
        ..SamplingConfig::default()
    };
    let a = sample_pagerank_run(&g, config, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
    let b = sample_pagerank_run(&g, config, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();
    assert_eq!(a.visits, b.visits);
    assert_eq!(a.scores, b.scores);
    assert_prob_like(&a.scores);
}

#[test]
fn single_page_corpus_is_certain_under_both_estimators() {
    let g = LinkGraph::build([("index.html", vec!["index.html"])]);
    assert_eq!(g.neighbors_ref(0), &[] as &[usize]);

    let iterated = pagerank_checked_run(&g, PageRankConfig::default()).unwrap();
    assert_eq!(g.label(&iterated.scores).get("index.html"), Some(1.0));

    let sampled = sample_pagerank_checked(
        &g,
        SamplingConfig {
            seed: Some(3),
            ..SamplingConfig::default()
        },
    )
    .unwrap();
    assert_eq!(g.label(&sampled).get("index.html"), Some(1.0));
}

#[test]
fn index_level_transition_matches_named_transition() {
    let g = corpus0();
    let node = g.index_of("2.html").unwrap();
    let row = transition(&g, node, 0.85);
    let named = g.transition("2.html", 0.85).unwrap();
    for (i, page) in g.pages().iter().enumerate() {
        assert!((row[i] - named.get(page).unwrap()).abs() < 1e-15);
    }
}

#[cfg(feature = "petgraph")]
mod petgraph_invariants {
    use super::assert_prob_like;
    use linkrank::{pagerank, AdjacencyList, PageRankConfig};
    use petgraph::prelude::*;

    #[test]
    fn pagerank_on_petgraph_is_finite_nonnegative_and_sums_to_one() {
        // 0 -> 1 -> 2, with a self-loop and a parallel edge to be normalized away
        let mut g: DiGraph<(), ()> = DiGraph::new();
        let a = g.add_node(());
        let b = g.add_node(());
        let c = g.add_node(());
        g.add_edge(a, b, ());
        g.add_edge(a, b, ());
        g.add_edge(b, c, ());
        g.add_edge(c, c, ());

        let adj = AdjacencyList::from_graph(&g);
        let scores = pagerank(&adj, PageRankConfig::default());
        assert_eq!(scores.len(), g.node_count());
        assert_prob_like(&scores);
        assert!(scores[2] > scores[0]);
    }
}
