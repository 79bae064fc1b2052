/// Property-based tests for knockout draw generation using proptest
///
/// These tests check the bracket invariants across random roster sizes,
/// seed lists and RNG seeds.
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use shuttle_tourney::draw::{generate_knockout_draw, order_seeds};
use shuttle_tourney::tournament::{BYE_ID_PREFIX, MatchStatus, Player, PlayerId};
use std::collections::{BTreeSet, HashMap};

fn roster(n: usize) -> Vec<Player> {
    (1..=n)
        .map(|i| Player::new(format!("p{i}"), format!("Player {i}")))
        .collect()
}

// Roster of 2..=64 players plus a seed list of distinct roster IDs
fn roster_and_seeds_strategy() -> impl Strategy<Value = (Vec<Player>, Vec<PlayerId>)> {
    (2usize..=64).prop_flat_map(|n| {
        let players = roster(n);
        let ids: Vec<PlayerId> = players.iter().map(|p| p.id.clone()).collect();
        (
            Just(players),
            proptest::sample::subsequence(ids, 0..=n.min(8)).prop_shuffle(),
        )
    })
}

fn is_bye(id: &Option<String>) -> bool {
    id.as_deref().is_some_and(|id| id.starts_with(BYE_ID_PREFIX))
}

proptest! {
    #[test]
    fn test_bracket_size_is_next_power_of_two(n in 2usize..=200, seed in any::<u64>()) {
        let players = roster(n);
        let mut rng = StdRng::seed_from_u64(seed);
        let draw = generate_knockout_draw(&players, &[], &mut rng).unwrap();

        prop_assert!(draw.bracket_size.is_power_of_two());
        prop_assert!(draw.bracket_size >= n);
        prop_assert!(draw.bracket_size / 2 < n);
        prop_assert_eq!(draw.matches.len(), draw.bracket_size / 2);
        prop_assert_eq!(draw.byes, draw.bracket_size - n);
    }

    #[test]
    fn test_match_numbers_are_contiguous(n in 2usize..=100, seed in any::<u64>()) {
        let players = roster(n);
        let mut rng = StdRng::seed_from_u64(seed);
        let draw = generate_knockout_draw(&players, &[], &mut rng).unwrap();

        let numbers: BTreeSet<u32> = draw.matches.iter().map(|m| m.match_number).collect();
        let expected: BTreeSet<u32> = (1..=draw.matches.len() as u32).collect();
        prop_assert_eq!(numbers, expected);
        prop_assert!(draw.matches.iter().all(|m| m.round == 1));
    }

    #[test]
    fn test_every_entrant_appears_exactly_once(
        (players, seeds) in roster_and_seeds_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let draw = generate_knockout_draw(&players, &seeds, &mut rng).unwrap();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for m in &draw.matches {
            for id in [&m.player1_id, &m.player2_id].into_iter().flatten() {
                *counts.entry(id.clone()).or_default() += 1;
            }
        }

        for player in &players {
            prop_assert_eq!(counts.get(&player.id).copied(), Some(1));
        }
        prop_assert_eq!(counts.len(), draw.bracket_size);
    }

    #[test]
    fn test_bye_matches_complete_with_real_winner(n in 2usize..=100, seed in any::<u64>()) {
        let players = roster(n);
        let mut rng = StdRng::seed_from_u64(seed);
        let draw = generate_knockout_draw(&players, &[], &mut rng).unwrap();

        prop_assert_eq!(draw.bye_matches().count(), draw.bracket_size - n);

        for m in &draw.matches {
            let byes = [is_bye(&m.player1_id), is_bye(&m.player2_id)];
            prop_assert!(!(byes[0] && byes[1]), "match {} pairs two byes", m.match_number);

            if m.is_bye {
                prop_assert_eq!(m.status, MatchStatus::Completed);
                let real = if byes[0] { &m.player2_id } else { &m.player1_id };
                prop_assert_eq!(&m.winner_id, real);
            } else {
                prop_assert_eq!(m.status, MatchStatus::Upcoming);
                prop_assert!(m.winner_id.is_none());
            }
        }
    }

    #[test]
    fn test_seeds_take_the_earliest_slots(
        (players, seeds) in roster_and_seeds_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let draw = generate_knockout_draw(&players, &seeds, &mut rng).unwrap();

        let slots: Vec<Option<String>> = draw
            .matches
            .iter()
            .flat_map(|m| [m.player1_id.clone(), m.player2_id.clone()])
            .collect();
        let ranked: Vec<Option<String>> = order_seeds(&players, &seeds)
            .into_iter()
            .map(|p| Some(p.id.clone()))
            .collect();

        prop_assert_eq!(&slots[..ranked.len()], &ranked[..]);
    }

    #[test]
    fn test_seed_placement_stable_across_calls(
        (players, seeds) in roster_and_seeds_strategy(),
        first in any::<u64>(),
        second in any::<u64>(),
    ) {
        let a =
            generate_knockout_draw(&players, &seeds, &mut StdRng::seed_from_u64(first)).unwrap();
        let b =
            generate_knockout_draw(&players, &seeds, &mut StdRng::seed_from_u64(second)).unwrap();

        prop_assert_eq!(a.matches.len(), b.matches.len());
        prop_assert_eq!(a.byes, b.byes);

        let seeded_slots = seeds.len();
        let leading = |draw: &shuttle_tourney::KnockoutDraw| -> Vec<Option<String>> {
            draw.matches
                .iter()
                .flat_map(|m| [m.player1_id.clone(), m.player2_id.clone()])
                .take(seeded_slots)
                .collect()
        };
        prop_assert_eq!(leading(&a), leading(&b));
    }

    #[test]
    fn test_inputs_are_not_mutated(
        (players, seeds) in roster_and_seeds_strategy(),
        seed in any::<u64>(),
    ) {
        let players_before = players.clone();
        let seeds_before = seeds.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let _ = generate_knockout_draw(&players, &seeds, &mut rng).unwrap();

        prop_assert_eq!(players, players_before);
        prop_assert_eq!(seeds, seeds_before);
    }
}
