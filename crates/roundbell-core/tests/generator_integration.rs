//! Integration tests for segment generation.
//!
//! Structural properties that must hold for every config, checked with
//! proptest over realistic parameter ranges.

use proptest::prelude::*;
use roundbell_core::timer::segment::{count_phase, total_duration_secs};
use roundbell_core::{generate, PhaseType, TimerConfig, TimerMode};

fn body(segments: &[roundbell_core::TimerSegment]) -> &[roundbell_core::TimerSegment] {
    match segments.first() {
        Some(s) if s.phase == PhaseType::Preparation => &segments[1..],
        _ => segments,
    }
}

proptest! {
    #[test]
    fn series_and_tabata_alternate(
        tabata in any::<bool>(),
        sets in 0u32..30,
        work in 0u32..300,
        rest in 0u32..300,
        prep in 0u32..30,
    ) {
        let mode = if tabata { TimerMode::Tabata } else { TimerMode::Series };
        let segs = generate(&TimerConfig::new(mode, sets, work, rest, prep));

        prop_assert_eq!(count_phase(&segs, PhaseType::Work), sets as usize);
        prop_assert_eq!(count_phase(&segs, PhaseType::Rest), sets.saturating_sub(1) as usize);
        prop_assert_eq!(count_phase(&segs, PhaseType::Preparation), usize::from(prep > 0));

        for (i, seg) in body(&segs).iter().enumerate() {
            let expected = if i % 2 == 0 { PhaseType::Work } else { PhaseType::Rest };
            prop_assert_eq!(seg.phase, expected);
            prop_assert_eq!(seg.set_index, (i / 2) as u32 + 1);
            prop_assert_eq!(seg.total_sets, sets);
        }
    }

    #[test]
    fn cluster_counts(
        sets in 0u32..12,
        reps in 1u32..10,
        intra in 0u32..60,
        prep in 0u32..10,
    ) {
        let cfg = TimerConfig {
            intra_rest_time: Some(intra),
            reps_per_set: Some(reps),
            ..TimerConfig::new(TimerMode::Cluster, sets, 10, 120, prep)
        };
        let segs = generate(&cfg);
        let (s, r) = (sets as usize, reps as usize);

        prop_assert_eq!(count_phase(&segs, PhaseType::Work), s * r);
        prop_assert_eq!(count_phase(&segs, PhaseType::IntraRest), s * (r - 1));
        prop_assert_eq!(count_phase(&segs, PhaseType::Rest), s.saturating_sub(1));
        prop_assert!(body(&segs).last().map_or(true, |seg| seg.phase == PhaseType::Work));
        prop_assert!(segs
            .iter()
            .filter(|seg| seg.phase == PhaseType::Rest)
            .all(|seg| seg.rep_index.is_none()));
    }

    #[test]
    fn emom_interval_count_is_floor(
        interval in 1u32..300,
        session in 1u32..4000,
    ) {
        let cfg = TimerConfig {
            interval_time: Some(interval),
            total_session_time: Some(session),
            ..TimerConfig::new(TimerMode::Emom, 3, 0, 0, 0)
        };
        let segs = generate(&cfg);
        let expected = (session / interval) as usize;

        prop_assert_eq!(segs.len(), expected);
        prop_assert!(segs.iter().all(|seg| seg.duration == interval));
        prop_assert!(total_duration_secs(&segs) <= u64::from(session));
    }

    #[test]
    fn generation_is_deterministic(sets in 0u32..10, work in 0u32..100, prep in 0u32..10) {
        for mode in TimerMode::ALL {
            let cfg = TimerConfig { sets, work_time: work, prep_time: prep, ..TimerConfig::defaults_for(mode) };
            prop_assert_eq!(generate(&cfg), generate(&cfg));
        }
    }
}

#[test]
fn emom_default_session_is_ten_minutes() {
    let cfg = TimerConfig {
        prep_time: 0,
        ..TimerConfig::defaults_for(TimerMode::Emom)
    };
    let segs = generate(&cfg);
    assert_eq!(segs.len(), 10);
    assert!(segs.iter().all(|s| s.duration == 60));

    let cfg = TimerConfig {
        total_session_time: Some(605),
        ..cfg
    };
    assert_eq!(generate(&cfg).len(), 10);
}

#[test]
fn boxing_defaults_full_layout() {
    let segs = generate(&TimerConfig::defaults_for(TimerMode::Boxing));
    let summary: Vec<(PhaseType, u32)> = segs.iter().map(|s| (s.phase, s.duration)).collect();
    assert_eq!(
        summary,
        vec![
            (PhaseType::Preparation, 5),
            (PhaseType::Work, 180),
            (PhaseType::Rest, 60),
            (PhaseType::Work, 180),
            (PhaseType::Rest, 60),
            (PhaseType::Work, 180),
        ]
    );
    assert_eq!(total_duration_secs(&segs), 5 + 3 * 180 + 2 * 60);
}

#[test]
fn segments_serialize_without_absent_rep_fields() {
    let segs = generate(&TimerConfig::new(TimerMode::Series, 1, 30, 0, 0));
    let json = serde_json::to_value(&segs[0]).unwrap();
    assert_eq!(json["phase"], "work");
    assert!(json.get("rep_index").is_none());
}
