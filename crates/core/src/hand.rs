use crate::{Card, Rank};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandKind {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl HandKind {
    pub const ALL: [HandKind; 10] = [
        HandKind::HighCard,
        HandKind::Pair,
        HandKind::TwoPair,
        HandKind::ThreeOfAKind,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::FourOfAKind,
        HandKind::StraightFlush,
        HandKind::RoyalFlush,
    ];

    /// The name hand conditions are written with in the card catalog.
    pub fn display_name(self) -> &'static str {
        match self {
            HandKind::HighCard => "High Card",
            HandKind::Pair => "Pair",
            HandKind::TwoPair => "Two Pair",
            HandKind::ThreeOfAKind => "Three of a Kind",
            HandKind::Straight => "Straight",
            HandKind::Flush => "Flush",
            HandKind::FullHouse => "Full House",
            HandKind::FourOfAKind => "Four of a Kind",
            HandKind::StraightFlush => "Straight Flush",
            HandKind::RoyalFlush => "Royal Flush",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(name))
            .or(match name {
                "One Pair" => Some(HandKind::Pair),
                _ => None,
            })
    }

    pub fn rank(self) -> u32 {
        match self {
            HandKind::HighCard => 0,
            HandKind::Pair => 1,
            HandKind::TwoPair => 2,
            HandKind::ThreeOfAKind => 3,
            HandKind::Straight => 4,
            HandKind::Flush => 5,
            HandKind::FullHouse => 6,
            HandKind::FourOfAKind => 7,
            HandKind::StraightFlush => 8,
            HandKind::RoyalFlush => 9,
        }
    }

    /// Base damage of a hand before any bonus card applies: `2^rank`.
    pub fn base_damage(self) -> i64 {
        1i64 << self.rank()
    }
}

/// What the hand evaluator hands to the effect resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    pub hand: HandKind,
    pub base_damage: i64,
}

impl HandResult {
    pub fn new(hand: HandKind, base_damage: i64) -> Self {
        Self { hand, base_damage }
    }

    pub fn evaluate(cards: &[Card]) -> Self {
        let hand = evaluate_hand(cards);
        Self::new(hand, hand.base_damage())
    }
}

pub fn evaluate_hand(cards: &[Card]) -> HandKind {
    if cards.is_empty() {
        return HandKind::HighCard;
    }

    let len = cards.len();
    let mut rank_counts: HashMap<Rank, usize> = HashMap::new();
    let mut suit_counts: HashMap<crate::Suit, usize> = HashMap::new();
    for card in cards {
        *rank_counts.entry(card.rank).or_insert(0) += 1;
        *suit_counts.entry(card.suit).or_insert(0) += 1;
    }

    let mut counts: Vec<usize> = rank_counts.values().copied().collect();
    counts.sort_by(|a, b| b.cmp(a));

    let is_flush = len == 5 && suit_counts.len() == 1;
    let is_straight = len == 5 && is_straight(cards);

    if len == 5 {
        if is_flush && is_straight {
            return if is_royal(cards) {
                HandKind::RoyalFlush
            } else {
                HandKind::StraightFlush
            };
        }
        // Duplicate faces can put five of one rank together.
        if counts[0] >= 4 {
            return HandKind::FourOfAKind;
        }
        if counts == [3, 2] {
            return HandKind::FullHouse;
        }
        if is_flush {
            return HandKind::Flush;
        }
        if is_straight {
            return HandKind::Straight;
        }
    }

    match counts.as_slice() {
        [n, ..] if *n >= 4 => HandKind::FourOfAKind,
        [3, 2] => HandKind::FullHouse,
        [3, ..] => HandKind::ThreeOfAKind,
        [2, 2, ..] => HandKind::TwoPair,
        [2, ..] => HandKind::Pair,
        _ => HandKind::HighCard,
    }
}

fn is_straight(cards: &[Card]) -> bool {
    let mut values: Vec<u8> = cards.iter().map(|card| card.rank.value()).collect();
    values.sort_unstable();
    values.dedup();
    if values.len() != 5 {
        return false;
    }
    if values == [2, 3, 4, 5, 14] {
        return true;
    }
    values.windows(2).all(|w| w[1] == w[0] + 1)
}

fn is_royal(cards: &[Card]) -> bool {
    let mut values: Vec<u8> = cards.iter().map(|card| card.rank.value()).collect();
    values.sort_unstable();
    values == [10, 11, 12, 13, 14]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suit;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(suit, rank)
    }

    #[test]
    fn wheel_counts_as_straight() {
        let cards = [
            card(Rank::Ace, Suit::Spades),
            card(Rank::Two, Suit::Hearts),
            card(Rank::Three, Suit::Clubs),
            card(Rank::Four, Suit::Diamonds),
            card(Rank::Five, Suit::Spades),
        ];
        assert_eq!(evaluate_hand(&cards), HandKind::Straight);
    }

    #[test]
    fn five_of_a_rank_counts_as_four_of_a_kind() {
        let mixed = [
            card(Rank::King, Suit::Hearts),
            card(Rank::King, Suit::Clubs),
            card(Rank::King, Suit::Spades),
            card(Rank::King, Suit::Diamonds),
            card(Rank::King, Suit::Hearts),
        ];
        assert_eq!(evaluate_hand(&mixed), HandKind::FourOfAKind);
        let suited = [card(Rank::Nine, Suit::Clubs); 5];
        assert_eq!(evaluate_hand(&suited), HandKind::FourOfAKind);
    }

    #[test]
    fn royal_flush_beats_straight_flush() {
        let royal = [
            card(Rank::Ten, Suit::Hearts),
            card(Rank::Jack, Suit::Hearts),
            card(Rank::Queen, Suit::Hearts),
            card(Rank::King, Suit::Hearts),
            card(Rank::Ace, Suit::Hearts),
        ];
        assert_eq!(evaluate_hand(&royal), HandKind::RoyalFlush);
        let low = [
            card(Rank::Five, Suit::Clubs),
            card(Rank::Six, Suit::Clubs),
            card(Rank::Seven, Suit::Clubs),
            card(Rank::Eight, Suit::Clubs),
            card(Rank::Nine, Suit::Clubs),
        ];
        assert_eq!(evaluate_hand(&low), HandKind::StraightFlush);
    }

    #[test]
    fn partial_hands_still_group_ranks() {
        let trips = [
            card(Rank::Nine, Suit::Clubs),
            card(Rank::Nine, Suit::Hearts),
            card(Rank::Nine, Suit::Spades),
        ];
        assert_eq!(evaluate_hand(&trips), HandKind::ThreeOfAKind);
        let two_pair = [
            card(Rank::Two, Suit::Clubs),
            card(Rank::Two, Suit::Hearts),
            card(Rank::King, Suit::Spades),
            card(Rank::King, Suit::Diamonds),
        ];
        assert_eq!(evaluate_hand(&two_pair), HandKind::TwoPair);
    }

    #[test]
    fn names_round_trip_through_catalog_spelling() {
        for kind in HandKind::ALL {
            assert_eq!(HandKind::from_name(kind.display_name()), Some(kind));
        }
        assert_eq!(HandKind::from_name("One Pair"), Some(HandKind::Pair));
        assert_eq!(HandKind::from_name("lowHealth"), None);
    }

    #[test]
    fn base_damage_doubles_per_rank() {
        assert_eq!(HandKind::HighCard.base_damage(), 1);
        assert_eq!(HandKind::Pair.base_damage(), 2);
        assert_eq!(HandKind::RoyalFlush.base_damage(), 512);
    }
}
