//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod combination;
pub mod config;
pub mod content;
pub mod deck;
pub mod effects;
pub mod encounters;
pub mod events;
pub mod hand;
pub mod inventory;
pub mod map;
pub mod player;
pub mod rng;
pub mod run;
pub mod save;
pub mod state;
pub mod timer;

pub use cards::*;
pub use combination::*;
pub use config::*;
pub use content::*;
pub use deck::*;
pub use effects::*;
pub use encounters::*;
pub use events::*;
pub use hand::*;
pub use inventory::*;
pub use map::*;
pub use player::*;
pub use rng::*;
pub use run::*;
pub use save::*;
pub use state::*;
pub use timer::*;
