//! Integration tests for types

#[cfg(test)]
mod tests {
    use pga_types::*;
    use proptest::prelude::*;

    fn outcome(name: &str, verdict: Verdict) -> Outcome {
        let item = ItemId::parse(name).unwrap();
        let path = format!("siva/latest/{}/{}", item.shard(), item);
        Outcome::new(item, path, verdict)
    }

    #[test]
    fn test_tally_counts_flagged() {
        let mut tally = RunTally::new(3);
        assert!(tally.record(&outcome("ab12", Verdict::Current)));
        assert!(tally.record(&outcome(
            "cd34",
            Verdict::Stale {
                local: "00".into(),
                remote: "11".into(),
            }
        )));
        assert!(!tally.is_complete());
        assert!(tally.record(&outcome("ef56", Verdict::Current)));
        assert!(tally.is_complete());
        assert_eq!(tally.to_string(), "1 of 3 corrupted");
    }

    #[test]
    fn test_tally_refuses_extra_outcomes() {
        let mut tally = RunTally::new(1);
        assert!(tally.record(&outcome("ab12", Verdict::Missing)));
        assert!(!tally.record(&outcome("ab12", Verdict::Missing)));
        assert_eq!(tally.completed, 1);
        assert_eq!(tally.flagged, 1);
    }

    #[test]
    fn test_empty_tally_is_complete() {
        let tally = RunTally::new(0);
        assert!(tally.is_complete());
        assert_eq!(tally.to_string(), "0 of 0 corrupted");
    }

    #[test]
    fn test_verdict_serialization() {
        let verdict = Verdict::Unreachable {
            reason: "timeout".into(),
        };
        let json = serde_json::to_string(&verdict).unwrap();
        assert_eq!(json, r#"{"status":"unreachable","reason":"timeout"}"#);
        assert!(verdict.is_flagged());
        assert!(!Verdict::Current.is_flagged());
    }

    #[test]
    fn test_item_id_rejects_blank_on_deserialize() {
        let parsed: Result<ItemId, _> = serde_json::from_str(r#""   ""#);
        assert!(parsed.is_err());
    }

    proptest! {
        #[test]
        fn tally_is_independent_of_completion_order(
            flags in proptest::collection::vec(any::<bool>(), 0..64),
            seed in any::<u64>(),
        ) {
            let outcomes: Vec<Outcome> = flags
                .iter()
                .enumerate()
                .map(|(i, flagged)| {
                    let verdict = if *flagged { Verdict::Missing } else { Verdict::Current };
                    outcome(&format!("{i:02}item"), verdict)
                })
                .collect();

            let mut forward = RunTally::new(outcomes.len());
            for o in &outcomes {
                forward.record(o);
            }

            // Deterministic permutation derived from the seed
            let mut permuted = outcomes.clone();
            let mut state = seed;
            for i in (1..permuted.len()).rev() {
                state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                let j = usize::try_from(state >> 33).unwrap() % (i + 1);
                permuted.swap(i, j);
            }
            let mut shuffled = RunTally::new(permuted.len());
            for o in &permuted {
                shuffled.record(o);
            }

            prop_assert_eq!(forward, shuffled);
            prop_assert!(forward.is_complete());
            prop_assert_eq!(forward.flagged, flags.iter().filter(|f| **f).count());
        }
    }
}
