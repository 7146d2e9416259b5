#![forbid(unsafe_code)]

//! Cards and the ordered collection that owns them.
//!
//! The [`Collection`] is the single source of truth for display order. Its
//! one invariant is identity: ids are unique, and no operation creates or
//! destroys a card. Reordering only moves cards around.

use std::fmt;

use ahash::AHashSet;

use crate::config::{ConfigError, GridConfig};
use crate::drag::BoundsProvider;
use crate::geometry::Bounds;

/// Stable card identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CardId(u64);

impl CardId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One card in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    id: CardId,
    order: u32,
    url: String,
    bounds: Option<Bounds>,
}

impl Card {
    /// Create a card with no captured bounds.
    pub fn new(id: CardId, order: u32, url: impl Into<String>) -> Self {
        Self {
            id,
            order,
            url: url.into(),
            bounds: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> CardId {
        self.id
    }

    /// Display rank at creation. Informational only: position in the
    /// collection is what determines display order, and reorders never
    /// renumber this field.
    #[inline]
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bounds captured at drag start. `None` outside a drag gesture.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Bounds-free projection handed to renderers.
    #[must_use]
    pub fn view(&self) -> CardView<'_> {
        CardView {
            id: self.id,
            order: self.order,
            url: &self.url,
        }
    }
}

/// Public, bounds-free projection of a [`Card`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CardView<'a> {
    pub id: CardId,
    pub order: u32,
    pub url: &'a str,
}

/// Collection construction failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// The same id appeared more than once.
    DuplicateId { id: CardId },
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "duplicate card id {id}"),
        }
    }
}

impl std::error::Error for CollectionError {}

/// Ordered sequence of cards with unique ids.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    cards: Vec<Card>,
}

impl Collection {
    /// Build a collection, rejecting duplicate ids.
    pub fn new(cards: Vec<Card>) -> Result<Self, CollectionError> {
        let mut seen = AHashSet::with_capacity(cards.len());
        for card in &cards {
            if !seen.insert(card.id) {
                return Err(CollectionError::DuplicateId { id: card.id });
            }
        }
        Ok(Self { cards })
    }

    /// Build the startup collection described by `config`.
    pub fn from_config(config: &GridConfig) -> Result<Self, ConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        let cards = (0..config.card_count)
            .map(|i| {
                Card::new(
                    CardId::new(config.first_id + u64::from(i)),
                    i,
                    config.card_url(i),
                )
            })
            .collect();
        Ok(Self { cards })
    }

    /// Build a collection of `count` cards with ids `1..=count`, `order`
    /// `0..count`, and an empty url. Handy in tests and benchmarks.
    ///
    /// `count` is a `u32` like [`GridConfig::card_count`], so every `order`
    /// is exact.
    #[must_use]
    pub fn with_sequential_ids(count: u32) -> Self {
        let cards = (0..count)
            .map(|i| Card::new(CardId::new(u64::from(i) + 1), i, String::new()))
            .collect();
        Self { cards }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in display order.
    #[inline]
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    /// Bounds-free projections in display order.
    pub fn views(&self) -> impl Iterator<Item = CardView<'_>> + '_ {
        self.cards.iter().map(Card::view)
    }

    /// Ids in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<CardId> {
        self.cards.iter().map(Card::id).collect()
    }

    #[must_use]
    pub fn index_of(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.index_of(id).is_some()
    }

    /// Read geometry for every card, once each, in display order.
    pub(crate) fn capture_bounds<P: BoundsProvider + ?Sized>(&mut self, provider: &P) {
        for (slot, card) in self.cards.iter_mut().enumerate() {
            card.bounds = provider.card_bounds(slot, card.id);
        }
    }

    pub(crate) fn clear_bounds(&mut self) {
        for card in &mut self.cards {
            card.bounds = None;
        }
    }

    pub(crate) fn replace_cards(&mut self, cards: Vec<Card>) {
        debug_assert_eq!(cards.len(), self.cards.len(), "reorder changed card count");
        self.cards = cards;
    }
}
