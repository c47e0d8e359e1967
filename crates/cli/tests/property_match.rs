// Property-based tests for the matching engine.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use proptest::prelude::*;
use rostermatch_recon::{
    normalize, reconcile_all, LookupIndex, MatchEngine, MatchOutcome, NameSimilarity,
    SimilarityMetric, SourceRecord, StatisticsAggregator,
};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn config_128() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Roster-shaped name: two or three alphabetic tokens.
fn arb_name() -> impl Strategy<Value = String> {
    proptest::collection::vec(r"[A-Za-z]{2,8}", 2..=3).prop_map(|tokens| tokens.join(" "))
}

/// Lookup pairs with unique normalized keys, so no conflicts arise and
/// every name owns exactly one ID.
fn arb_roster(max: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec(arb_name(), 1..=max).prop_map(|names| {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for name in names {
            let key = normalize(&name);
            if !seen.insert(key) {
                continue;
            }
            let id = format!("E{:03}", pairs.len() + 1);
            pairs.push((name, id));
        }
        pairs
    })
}

/// Re-dress a name without changing its normalized key.
fn mangle(name: &str, upper: bool, pad: usize) -> String {
    let body = if upper {
        name.to_uppercase()
    } else {
        name.to_lowercase()
    };
    let padding = " ".repeat(pad);
    format!("{}{}{}", padding, body, padding)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn normalize_is_idempotent(raw in r".{0,40}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_output_is_canonical(raw in r".{0,40}") {
        let key = normalize(&raw);
        prop_assert!(!key.starts_with(' '));
        prop_assert!(!key.ends_with(' '));
        prop_assert!(!key.contains("  "));
        prop_assert!(!key.contains('.'));
        prop_assert!(!key.contains(','));
        prop_assert!(!key.contains('\''));
    }
}

// ---------------------------------------------------------------------------
// Similarity metric
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_128())]
    #[test]
    fn similarity_is_symmetric_and_bounded(a in arb_name(), b in arb_name()) {
        let metric = NameSimilarity;
        let forward = metric.score(&a, &b);
        prop_assert_eq!(forward, metric.score(&b, &a));
        prop_assert!(forward <= 100);
    }

    #[test]
    fn identical_names_score_100(a in arb_name()) {
        let metric = NameSimilarity;
        prop_assert_eq!(metric.score(&a, &a), 100);
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

// Exact hits ignore the threshold and survive cosmetic re-dressing.
proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn exact_hits_survive_case_and_spacing(
        pairs in arb_roster(12),
        pick in any::<prop::sample::Index>(),
        upper in any::<bool>(),
        pad in 0usize..3,
    ) {
        let index = LookupIndex::build(&pairs).unwrap();
        let metric = NameSimilarity;
        let engine = MatchEngine::new(&index, &metric);

        let (name, id) = &pairs[pick.index(pairs.len())];
        let outcome = engine.match_name(&mangle(name, upper, pad), 100);
        prop_assert_eq!(outcome, MatchOutcome::Exact { employee_id: id.clone() });
    }
}

// Raising the threshold can only shed matches, never add or change one.
proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn raising_threshold_never_adds_matches(
        pairs in arb_roster(10),
        queries in proptest::collection::vec(arb_name(), 1..=10),
        t1 in 60u8..=100,
        t2 in 60u8..=100,
    ) {
        let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        let index = LookupIndex::build(&pairs).unwrap();
        let metric = NameSimilarity;
        let engine = MatchEngine::new(&index, &metric);

        for query in &queries {
            let at_hi = engine.match_name(query, hi);
            let at_lo = engine.match_name(query, lo);

            if at_hi.matched_id().is_some() {
                prop_assert_eq!(
                    at_hi.matched_id(),
                    at_lo.matched_id(),
                    "hi={} gave {:?}, lo={} gave {:?}",
                    hi, &at_hi, lo, &at_lo
                );
            }
            if let MatchOutcome::Fuzzy { confidence, .. } = at_hi {
                prop_assert!(confidence >= hi);
            }
            if let MatchOutcome::Fuzzy { confidence, .. } = at_lo {
                prop_assert!(confidence >= lo);
            }
        }
    }
}

// Insertion order of distinct lookup keys never changes an outcome.
proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn index_order_is_immaterial_for_distinct_keys(
        pairs in arb_roster(10),
        query in arb_name(),
        threshold in 60u8..=100,
    ) {
        let forward = LookupIndex::build(&pairs).unwrap();
        let mut shuffled = pairs.clone();
        shuffled.reverse();
        let reversed = LookupIndex::build(&shuffled).unwrap();

        let metric = NameSimilarity;
        let a = MatchEngine::new(&forward, &metric).match_name(&query, threshold);
        let b = MatchEngine::new(&reversed, &metric).match_name(&query, threshold);
        prop_assert_eq!(a, b);
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

// Every record lands in exactly one category.
proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn statistics_always_balance(
        pairs in arb_roster(10),
        rows in proptest::collection::vec((arb_name(), any::<bool>()), 0..=15),
        threshold in 60u8..=100,
    ) {
        let index = LookupIndex::build(&pairs).unwrap();
        let metric = NameSimilarity;
        let engine = MatchEngine::new(&index, &metric);
        let mut aggregator = StatisticsAggregator::new();

        let records: Vec<SourceRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, (name, has_id))| SourceRecord {
                source: "prop".to_string(),
                row: i,
                raw_name: name.clone(),
                existing_id: has_id.then(|| format!("X{}", i)),
                fields: vec![("Name".to_string(), name.clone())],
            })
            .collect();

        let enriched = reconcile_all(&records, &engine, threshold, &mut aggregator);
        let stats = aggregator.into_stats();

        prop_assert_eq!(enriched.len(), records.len());
        prop_assert_eq!(stats.total_count, records.len());
        prop_assert_eq!(
            stats.exact_count
                + stats.fuzzy_count
                + stats.existing_id_count
                + stats.unmatched_count,
            stats.total_count
        );
        prop_assert_eq!(stats.fuzzy_confidences.len(), stats.fuzzy_count);
    }
}
