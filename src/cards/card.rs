//! Card identity and the deterministic id -> attributes mapping.
//!
//! The universe is the 27 ids `1..=27`, the full Cartesian product of the
//! three 3-valued domains. With `n = id - 1`:
//!
//! - job = `n / 9` (each third of the id space shares a job)
//! - race = `(n / 3) % 3`
//! - alignment = `n % 3`
//!
//! so every attribute combination is produced by exactly one id.

use serde::{Deserialize, Serialize};

use super::attributes::{Alignment, Attributes, Job, Race};
use crate::core::EngineError;

/// Number of cards in the universe.
pub const UNIVERSE_SIZE: usize = 27;

/// Identifier of one of the 27 cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CardId(u8);

impl CardId {
    /// Lowest id in the universe.
    pub const MIN: CardId = CardId(1);
    /// Highest id in the universe.
    pub const MAX: CardId = CardId(UNIVERSE_SIZE as u8);

    /// Create a card ID.
    ///
    /// Panics if `id` is outside `1..=27`; use `CardId::try_from` for
    /// untrusted input.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id >= 1 && id as usize <= UNIVERSE_SIZE, "card id out of range");
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Every id in the universe, ascending.
    pub fn all() -> impl Iterator<Item = CardId> + Clone {
        (1..=UNIVERSE_SIZE as u8).map(CardId)
    }
}

impl TryFrom<u8> for CardId {
    type Error = EngineError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        if (1..=UNIVERSE_SIZE as u8).contains(&id) {
            Ok(Self(id))
        } else {
            Err(EngineError::InvalidCardId(id))
        }
    }
}

impl From<CardId> for u8 {
    fn from(id: CardId) -> u8 {
        id.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Attributes of a card. Pure and total over the universe.
#[must_use]
pub const fn attributes_of(id: CardId) -> Attributes {
    let n = id.0 - 1;
    Attributes {
        race: Race::from_index((n / 3) % 3),
        job: Job::from_index(n / 9),
        alignment: Alignment::from_index(n % 3),
    }
}

const IMAGE_PATHS: [&str; UNIVERSE_SIZE] = [
    "/Assets/01.png", "/Assets/02.png", "/Assets/03.png", "/Assets/04.png",
    "/Assets/05.png", "/Assets/06.png", "/Assets/07.png", "/Assets/08.png",
    "/Assets/09.png", "/Assets/10.png", "/Assets/11.png", "/Assets/12.png",
    "/Assets/13.png", "/Assets/14.png", "/Assets/15.png", "/Assets/16.png",
    "/Assets/17.png", "/Assets/18.png", "/Assets/19.png", "/Assets/20.png",
    "/Assets/21.png", "/Assets/22.png", "/Assets/23.png", "/Assets/24.png",
    "/Assets/25.png", "/Assets/26.png", "/Assets/27.png",
];

/// A card as shown on the board.
///
/// ```
/// use trio_engine::cards::{Card, CardId, Job, Race};
///
/// let card = Card::from_id(CardId::new(5));
/// assert_eq!(card.race, Race::Elf);
/// assert_eq!(card.job, Job::Mage);
/// assert_eq!(card.image_path, "/Assets/05.png");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Card {
    pub id: CardId,
    pub race: Race,
    pub job: Job,
    pub alignment: Alignment,
    /// Opaque display reference for the rendering layer.
    pub image_path: &'static str,
}

impl Card {
    /// Build the card for an id.
    #[must_use]
    pub const fn from_id(id: CardId) -> Self {
        let attrs = attributes_of(id);
        Self {
            id,
            race: attrs.race,
            job: attrs.job,
            alignment: attrs.alignment,
            image_path: IMAGE_PATHS[(id.0 - 1) as usize],
        }
    }

    /// The attribute triple.
    #[must_use]
    pub const fn attributes(&self) -> Attributes {
        Attributes {
            race: self.race,
            job: self.job,
            alignment: self.alignment,
        }
    }
}

impl From<CardId> for Card {
    fn from(id: CardId) -> Self {
        Card::from_id(id)
    }
}
