//! Single-elimination draw generation.

use std::collections::{HashMap, HashSet};

use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use super::errors::{DrawError, DrawResult};
use crate::tournament::models::{BYE_ID_PREFIX, Entrant, Match, MatchStatus, Player, PlayerId};

/// Minimum number of real entrants for a knockout draw
pub const MIN_ENTRANTS: usize = 2;

/// Round produced by the generator
pub const FIRST_ROUND: u32 = 1;

/// Generated first round of a single-elimination bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutDraw {
    /// Round-1 matches ordered by match number
    pub matches: Vec<Match>,
    /// Total bracket slots (power of two)
    pub bracket_size: usize,
    /// Bye slots added to fill the bracket
    pub byes: usize,
}

impl KnockoutDraw {
    /// Summarize a stored round-1 match list
    pub fn from_matches(matches: Vec<Match>) -> Self {
        let byes = matches
            .iter()
            .flat_map(|m| [m.player1_id.as_deref(), m.player2_id.as_deref()])
            .flatten()
            .filter(|id| id.starts_with(BYE_ID_PREFIX))
            .count();
        Self {
            bracket_size: matches.len() * 2,
            byes,
            matches,
        }
    }

    pub fn bye_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.is_bye)
    }
}

/// Smallest power of two that holds `entrants` slots
pub fn bracket_size_for(entrants: usize) -> usize {
    entrants.next_power_of_two()
}

/// Seeded players in rank order.
///
/// Players with an explicit `seed_number` come first, ascending, ties broken by
/// position in `seeds`. Seeded players without a number follow in `seeds` order.
/// Seed IDs that are not on the roster are ignored.
pub fn order_seeds<'a>(players: &'a [Player], seeds: &[PlayerId]) -> Vec<&'a Player> {
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(seeds.len());
    for (position, id) in seeds.iter().enumerate() {
        positions.entry(id.as_str()).or_insert(position);
    }

    let mut seeded: Vec<(&Player, usize)> = players
        .iter()
        .filter_map(|p| positions.get(p.id.as_str()).map(|&pos| (p, pos)))
        .collect();

    if seeded.len() < positions.len() {
        let roster: HashSet<&str> = players.iter().map(|p| p.id.as_str()).collect();
        for id in positions.keys().filter(|id| !roster.contains(*id)) {
            debug!("Ignoring seed {} that is not on the roster", id);
        }
    }

    seeded.sort_by_key(|(player, position)| {
        (player.seed_number.is_none(), player.seed_number, *position)
    });
    seeded.into_iter().map(|(player, _)| player).collect()
}

/// Generate round 1 of a knockout draw.
///
/// Seeds are placed first in rank order, the remaining players are shuffled
/// uniformly, and byes are appended to the tail until the bracket size is a power
/// of two. Consecutive slots are paired into matches; a match against a bye is
/// created completed with the real entrant as winner.
///
/// # Errors
///
/// - `InsufficientEntrants` if the roster has fewer than two players
/// - `DuplicateEntrant` if a player ID occurs twice
/// - `ReservedEntrantId` if a player ID uses the bye prefix
pub fn generate_knockout_draw<R: Rng + ?Sized>(
    players: &[Player],
    seeds: &[PlayerId],
    rng: &mut R,
) -> DrawResult<KnockoutDraw> {
    if players.len() < MIN_ENTRANTS {
        return Err(DrawError::InsufficientEntrants {
            needed: MIN_ENTRANTS,
            current: players.len(),
        });
    }

    let mut seen = HashSet::with_capacity(players.len());
    for player in players {
        if player.id.starts_with(BYE_ID_PREFIX) {
            return Err(DrawError::ReservedEntrantId(player.id.clone()));
        }
        if !seen.insert(player.id.as_str()) {
            return Err(DrawError::DuplicateEntrant(player.id.clone()));
        }
    }

    let seeded = order_seeds(players, seeds);
    let seeded_ids: HashSet<&str> = seeded.iter().map(|p| p.id.as_str()).collect();
    let mut unseeded: Vec<&Player> = players
        .iter()
        .filter(|p| !seeded_ids.contains(p.id.as_str()))
        .collect();
    unseeded.shuffle(rng);

    let seeded_count = seeded.len();
    let mut slots: Vec<Entrant> = seeded
        .into_iter()
        .chain(unseeded)
        .map(Entrant::from)
        .collect();

    let bracket_size = bracket_size_for(slots.len());
    let byes = bracket_size - slots.len();
    slots.extend((0..byes).map(Entrant::bye));

    let matches: Vec<Match> = slots
        .chunks_exact(2)
        .zip(1u32..)
        .map(|(pair, match_number)| pair_entrants(match_number, &pair[0], &pair[1]))
        .collect();

    info!(
        "Generated knockout draw: {} entrants ({} seeded), bracket size {}, {} byes",
        players.len(),
        seeded_count,
        bracket_size,
        byes
    );

    Ok(KnockoutDraw {
        matches,
        bracket_size,
        byes,
    })
}

fn pair_entrants(match_number: u32, player1: &Entrant, player2: &Entrant) -> Match {
    let mut round_match = Match::new(FIRST_ROUND, match_number, player1, player2);

    let winner = match (player1.is_bye(), player2.is_bye()) {
        (false, false) => return round_match,
        (true, false) => Some(player2.id.clone()),
        (false, true) => Some(player1.id.clone()),
        (true, true) => None,
    };

    round_match.is_bye = true;
    round_match.status = MatchStatus::Completed;
    round_match.winner_id = winner;
    round_match
}

/// Draw generator owning its random source.
///
/// Production code uses [`DrawGenerator::new`] (seeded from the OS); tests use
/// [`DrawGenerator::with_seed`] to get reproducible pairings.
pub struct DrawGenerator {
    rng: StdRng,
}

impl DrawGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate round 1 for the roster. See [`generate_knockout_draw`].
    pub fn generate(
        &mut self,
        players: &[Player],
        seeds: &[PlayerId],
    ) -> DrawResult<KnockoutDraw> {
        generate_knockout_draw(players, seeds, &mut self.rng)
    }
}

impl Default for DrawGenerator {
    fn default() -> Self {
        Self::new()
    }
}
