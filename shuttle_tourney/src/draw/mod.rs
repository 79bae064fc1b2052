//! Knockout draw generation.
//!
//! Turns an event roster and its seed list into the first round of a
//! single-elimination bracket:
//! - Seeded players occupy the first slots in rank order
//! - Unseeded players are shuffled uniformly
//! - Byes pad the bracket to a power of two and are appended to the tail
//! - Matches against a bye are completed immediately with the real entrant as winner
//!
//! ## Example
//!
//! ```
//! use shuttle_tourney::draw::DrawGenerator;
//! use shuttle_tourney::tournament::Player;
//!
//! let players = vec![
//!     Player::new("p1", "John Doe"),
//!     Player::new("p2", "Mike Smith"),
//!     Player::new("p3", "Peter Jones"),
//! ];
//! let seeds = vec!["p2".to_string()];
//!
//! let mut generator = DrawGenerator::with_seed(2024);
//! let draw = generator.generate(&players, &seeds).unwrap();
//!
//! assert_eq!(draw.bracket_size, 4);
//! assert_eq!(draw.byes, 1);
//! assert_eq!(draw.matches[0].player1_id.as_deref(), Some("p2"));
//! ```

pub mod errors;
pub mod generator;

pub use errors::{DrawError, DrawResult};
pub use generator::{
    DrawGenerator, FIRST_ROUND, KnockoutDraw, MIN_ENTRANTS, bracket_size_for,
    generate_knockout_draw, order_seeds,
};
