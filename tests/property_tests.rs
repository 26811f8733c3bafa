//! Property-based tests for store, bucket and rule invariants.
//!
//! Tests validate:
//! 1. tail(n) returns exactly the newest min(n, len) lines in order
//! 2. Bucket classification never gets hotter as a line ages
//! 3. Rules that match nothing leave a line untouched
//! 4. Frames always fill the surface and anchor content to the bottom

use proptest::prelude::*;
use std::time::{Duration, Instant};
use watchlog::model::Source;
use watchlog::rules::{RuleEngine, StreamSelector};
use watchlog::state::LineStore;
use watchlog::view::{format_age, HotnessBucket, RenderFrame};

fn source_strategy() -> impl Strategy<Value = Source> {
    prop_oneof![Just(Source::Out), Just(Source::Err)]
}

// ===== Property 1: Tail Window =====

proptest! {
    #[test]
    fn tail_is_newest_lines_in_arrival_order(
        lines in prop::collection::vec((source_strategy(), "[a-z ]{0,20}"), 0..60),
        n in 0usize..80,
    ) {
        let mut store = LineStore::new();
        for (source, text) in &lines {
            store.append(*source, text.clone());
        }

        let tail = store.tail(n);
        let expected = &lines[lines.len() - n.min(lines.len())..];

        prop_assert_eq!(tail.len(), n.min(lines.len()));
        for (line, (source, text)) in tail.iter().zip(expected) {
            prop_assert_eq!(line.source(), *source);
            prop_assert_eq!(line.text(), text.as_str());
        }
    }

    #[test]
    fn timestamps_never_decrease(offsets in prop::collection::vec(0u64..10_000, 1..40)) {
        let base = Instant::now();
        let mut store = LineStore::new();
        for offset in &offsets {
            store.append_at(Source::Out, "x", base + Duration::from_millis(*offset));
        }

        let stamps: Vec<Instant> = store.iter().map(|l| l.timestamp()).collect();
        prop_assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }
}

// ===== Property 2: Bucket Monotonicity =====

proptest! {
    #[test]
    fn older_lines_are_never_hotter(a in 0u64..1_000_000, b in 0u64..1_000_000) {
        let (young, old) = if a <= b { (a, b) } else { (b, a) };

        let young_bucket = HotnessBucket::for_age(Duration::from_millis(young));
        let old_bucket = HotnessBucket::for_age(Duration::from_millis(old));

        prop_assert!(young_bucket <= old_bucket);
    }

    #[test]
    fn prefix_width_is_constant(secs in 0u64..3_500_000, millis in 0u32..1000) {
        let age = Duration::new(secs, millis * 1_000_000);
        prop_assert_eq!(format_age(age).chars().count(), 11);
    }
}

// ===== Property 3: Rule Identity =====

proptest! {
    #[test]
    fn non_matching_rules_leave_line_unchanged(
        line in "[a-y ]{0,60}",
        source in source_strategy(),
    ) {
        let mut rules = RuleEngine::new();
        rules.add_spec("z+:Z,[0-9]{3}:NNN", StreamSelector::Both).unwrap();

        prop_assert_eq!(rules.apply(&line, source), line);
    }

    #[test]
    fn literal_rule_is_idempotent_when_replacement_cannot_rematch(
        prefix in "[a-y]{0,10}",
        suffix in "[a-y]{0,10}",
    ) {
        let mut rules = RuleEngine::new();
        rules.add_spec("z:Q", StreamSelector::Both).unwrap();
        let line = format!("{prefix}z{suffix}");

        let once = rules.apply(&line, Source::Out);
        let twice = rules.apply(&once, Source::Out);

        prop_assert_eq!(&once, &format!("{prefix}Q{suffix}"));
        prop_assert_eq!(once, twice);
    }
}

// ===== Property 4: Frame Shape =====

proptest! {
    #[test]
    fn frame_fills_height_and_pads_on_top(
        count in 0usize..50,
        width in 1u16..120,
        height in 0u16..40,
    ) {
        let now = Instant::now();
        let mut store = LineStore::new();
        for i in 0..count {
            store.append_at(Source::Out, format!("line {i}"), now);
        }

        let frame = RenderFrame::compute(&store, now, width, height);

        prop_assert_eq!(frame.rows().len(), usize::from(height));
        prop_assert_eq!(frame.padding(), usize::from(height) - count.min(usize::from(height)));
        prop_assert!(frame.rows()[frame.padding()..].iter().all(|row| row.is_some()));
    }
}
