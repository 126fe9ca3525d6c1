use crate::{Card, Rank, Suit};
use rand::{rngs::StdRng, seq::SliceRandom, RngCore, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Uniform index in `0..len`; `None` for an empty range.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next_u64() % len as u64) as usize)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let idx = self.index(items.len())?;
        items.get(idx)
    }

    /// Succeeds with probability `chance`, clamped to `[0, 1]`.
    pub fn chance(&mut self, chance: f64) -> bool {
        if chance >= 1.0 {
            return true;
        }
        if chance <= 0.0 {
            return false;
        }
        let roll = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        roll < chance
    }

    pub fn playing_card(&mut self) -> Card {
        let rank = Rank::ALL[(self.next_u64() % Rank::ALL.len() as u64) as usize];
        let suit = Suit::ALL[(self.next_u64() % Suit::ALL.len() as u64) as usize];
        Card::new(suit, rank)
    }
}
