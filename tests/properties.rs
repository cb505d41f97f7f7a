//! Property tests: match counts, win/loss balance, and the roster partition.

use dart_tournament_engine::logic::draw_group_play;
use dart_tournament_engine::{
    generate_matches, start_tournament, submit_results, MatchId, PlayerId, PlayerRegistry, Side,
    Tournament, TournamentMode, TournamentPhase,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

fn any_mode() -> impl Strategy<Value = TournamentMode> {
    prop_oneof![Just(TournamentMode::TwoVTwo), Just(TournamentMode::OneVOne)]
}

proptest! {
    #[test]
    fn group_draw_counts(n in 0usize..64, mode in any_mode(), seed in any::<u64>()) {
        let mut registry = PlayerRegistry::new();
        let ids: Vec<_> = (0..n).map(|i| registry.add(format!("P{i}"))).collect();
        let draw =
            draw_group_play(&mut registry, &ids, mode, &mut StdRng::seed_from_u64(seed)).unwrap();
        let size = mode.group_size();
        if n < size {
            prop_assert!(draw.matches.is_empty());
            prop_assert_eq!(draw.sit_outs.len(), n);
        } else {
            prop_assert_eq!(draw.matches.len(), n / size);
            prop_assert_eq!(draw.sit_outs.len(), n % size);
        }
    }

    #[test]
    fn sit_outs_have_the_highest_counters(
        counters in prop::collection::vec(-2i32..4, 4..30),
        seed in any::<u64>(),
    ) {
        let mut registry = PlayerRegistry::new();
        let ids: Vec<_> = (0..counters.len()).map(|i| registry.add(format!("P{i}"))).collect();
        for (id, c) in ids.iter().zip(&counters) {
            registry.get_mut(*id).unwrap().internal_times_sat_out = *c;
        }
        let before = registry.clone();
        let draw = draw_group_play(
            &mut registry,
            &ids,
            TournamentMode::TwoVTwo,
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap();
        let counter = |id: PlayerId| before.get(id).unwrap().internal_times_sat_out;
        let lowest_benched = draw.sit_outs.iter().map(|id| counter(*id)).min();
        let highest_playing = draw.playing_order().into_iter().map(counter).max();
        if let (Some(benched), Some(playing)) = (lowest_benched, highest_playing) {
            prop_assert!(benched >= playing);
        }
    }

    #[test]
    fn reseeding_changes_pairings_not_counts(n in 4usize..40, a in any::<u64>(), b in any::<u64>()) {
        let mut r1 = PlayerRegistry::new();
        let ids: Vec<_> = (0..n).map(|i| r1.add(format!("P{i}"))).collect();
        let mut r2 = r1.clone();
        let mode = TournamentMode::TwoVTwo;
        let d1 = draw_group_play(&mut r1, &ids, mode, &mut StdRng::seed_from_u64(a)).unwrap();
        let d2 = draw_group_play(&mut r2, &ids, mode, &mut StdRng::seed_from_u64(b)).unwrap();
        prop_assert_eq!(d1.matches.len(), d2.matches.len());
        prop_assert_eq!(d1.sit_outs.len(), d2.sit_outs.len());
    }

    #[test]
    fn rounds_keep_invariants(
        n in 1usize..40,
        max_losses in 1u32..5,
        mode in any_mode(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut t = Tournament::new(max_losses);
        t.set_mode(mode).unwrap();
        for i in 0..n {
            t.add_player(format!("P{i}")).unwrap();
        }
        start_tournament(&mut t).unwrap();

        for _ in 0..50 {
            if t.phase() != TournamentPhase::GroupPlay {
                break;
            }
            generate_matches(&mut t, &mut rng).unwrap();
            prop_assert!(t.invariants_hold());
            if t.matches().is_empty() {
                continue;
            }
            let results: HashMap<MatchId, Side> = t
                .matches()
                .iter()
                .map(|m| (m.id, if rng.gen_bool(0.5) { Side::A } else { Side::B }))
                .collect();
            let losing_players: u32 = t
                .matches()
                .iter()
                .map(|m| m.team(results[&m.id].opponent()).len() as u32)
                .sum();
            let wins_before: u32 = t.registry().iter().map(|p| p.wins).sum();
            let losses_before: u32 = t.registry().iter().map(|p| p.losses).sum();

            submit_results(&mut t, &results, &mut rng).unwrap();

            let wins_after: u32 = t.registry().iter().map(|p| p.wins).sum();
            let losses_after: u32 = t.registry().iter().map(|p| p.losses).sum();
            prop_assert_eq!(wins_after - wins_before, losses_after - losses_before);
            prop_assert_eq!(losses_after - losses_before, losing_players);
            prop_assert!(t.invariants_hold());
            prop_assert!(t.active_players().iter().all(|p| p.losses < max_losses));
        }
    }
}
