//! Card universe: attributes, identities and the deck.
//!
//! ## Key Types
//!
//! - `CardId`: One of the 27 ids `1..=27`
//! - `Card`: Id plus its three attributes and a display reference
//! - `UsedPool`: Ids consumed this session
//! - `sample_unused`: Uniform draw with the exhaustion fallback

pub mod attributes;
pub mod card;
pub mod deck;

pub use attributes::{Alignment, AttributeKind, Attributes, Job, Race};
pub use card::{attributes_of, Card, CardId, UNIVERSE_SIZE};
pub use deck::{sample_unused, UsedPool};
