//! Property tests for predecessor reference cleaning

use proptest::prelude::*;
use proptest::sample::select;
use proptest::test_runner::Config;
use scurve_core::RelationType;
use scurve_parser::fields::{parse_predecessors, strip_relation_prefix};

fn known_prefix() -> impl Strategy<Value = (&'static str, RelationType)> {
    select(RelationType::PREFIXES.to_vec())
}

fn padding() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just(" ".to_string()), "[ \t]{1,3}"]
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn known_prefix_strips_to_the_id(
        (prefix, relation) in known_prefix(),
        lead in padding(),
        sep in padding(),
        trail in padding(),
        id in "[A-Za-z0-9çãéó]{1,12}",
    ) {
        let reference = format!("{lead}{prefix}{sep}{id}{trail}");
        prop_assert_eq!(strip_relation_prefix(&reference), (id.as_str(), relation));
    }

    #[test]
    fn unprefixed_id_passes_through(
        lead in padding(),
        trail in padding(),
        id in "[0-9][A-Za-z0-9]{0,10}",
    ) {
        let reference = format!("{lead}{id}{trail}");
        prop_assert_eq!(strip_relation_prefix(&reference), (id.as_str(), RelationType::FinishToStart));
    }

    #[test]
    fn bare_prefix_stays_an_id((prefix, _) in known_prefix(), trail in padding()) {
        let reference = format!("{prefix}{trail}");
        prop_assert_eq!(strip_relation_prefix(&reference), (prefix, RelationType::FinishToStart));
    }

    #[test]
    fn lag_suffix_and_separators_are_dropped(
        ids in proptest::collection::vec("[0-9]{1,3}", 1..6),
        lag in 0u32..30,
    ) {
        let cell = ids
            .iter()
            .map(|id| format!("FS{id}-{lag} dias"))
            .collect::<Vec<_>>()
            .join("; ");
        let parsed: Vec<String> = parse_predecessors(&cell).into_iter().map(|p| p.id).collect();
        prop_assert_eq!(parsed, ids);
    }
}
