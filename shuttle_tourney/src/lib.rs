//! # Shuttle Tourney
//!
//! Tournament management for badminton and other racket-sport events, built
//! around a knockout draw generator.
//!
//! A tournament holds event categories (e.g. "Men's Singles"). Each event has
//! a roster of players, an ordered seed list, and once the draw is generated,
//! a first round of matches padded with byes to a power-of-two bracket.
//!
//! ## Core Modules
//!
//! - [`draw`]: Knockout draw generation with injectable randomness
//! - [`tournament`]: Data model, score rules and the [`TournamentManager`] facade
//! - [`db`]: Storage trait with in-memory and PostgreSQL implementations
//!
//! ## Example
//!
//! ```
//! use shuttle_tourney::draw::generate_knockout_draw;
//! use shuttle_tourney::tournament::Player;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let players: Vec<Player> = (1..=5)
//!     .map(|i| Player::new(format!("p{i}"), format!("Player {i}")))
//!     .collect();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let draw = generate_knockout_draw(&players, &[], &mut rng).unwrap();
//!
//! assert_eq!(draw.bracket_size, 8);
//! assert_eq!(draw.matches.len(), 4);
//! assert_eq!(draw.byes, 3);
//! ```

/// Storage for tournaments and event categories.
pub mod db;

/// Knockout draw generation.
pub mod draw;
pub use draw::{DrawError, DrawGenerator, KnockoutDraw, generate_knockout_draw};

/// Tournaments, event categories, players and matches.
pub mod tournament;
pub use tournament::{TournamentError, TournamentManager, TournamentResult};
