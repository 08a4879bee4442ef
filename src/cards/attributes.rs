//! The three card attributes, each drawn from a 3-valued domain.
//!
//! Every attribute maps to an index in `0..3`; the validator only ever
//! compares indices, so the rule is shared by all three kinds.

use serde::{Deserialize, Serialize};

/// Race attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Race {
    Human,
    Elf,
    Dwarf,
}

/// Job attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Job {
    Mage,
    Archer,
    Warrior,
}

/// Alignment attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Cold,
    Order,
    Chaos,
}

/// Names one of the three attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Race,
    Job,
    Alignment,
}

impl AttributeKind {
    /// All attribute kinds in validation order.
    pub const ALL: [AttributeKind; 3] = [AttributeKind::Race, AttributeKind::Job, AttributeKind::Alignment];
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeKind::Race => f.write_str("race"),
            AttributeKind::Job => f.write_str("job"),
            AttributeKind::Alignment => f.write_str("alignment"),
        }
    }
}

macro_rules! three_valued {
    ($ty:ident, $a:ident, $b:ident, $c:ident) => {
        impl $ty {
            /// Every value of the domain, in index order.
            pub const ALL: [$ty; 3] = [$ty::$a, $ty::$b, $ty::$c];

            /// Position of this value in `ALL`.
            #[must_use]
            pub const fn index(self) -> u8 {
                self as u8
            }

            /// Inverse of `index`, reducing modulo 3.
            #[must_use]
            pub const fn from_index(index: u8) -> Self {
                Self::ALL[(index % 3) as usize]
            }
        }
    };
}

three_valued!(Race, Human, Elf, Dwarf);
three_valued!(Job, Mage, Archer, Warrior);
three_valued!(Alignment, Cold, Order, Chaos);

/// The full attribute triple of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    pub race: Race,
    pub job: Job,
    pub alignment: Alignment,
}

impl Attributes {
    /// Index of one attribute, for rule checks.
    #[must_use]
    pub const fn index_of(&self, kind: AttributeKind) -> u8 {
        match kind {
            AttributeKind::Race => self.race.index(),
            AttributeKind::Job => self.job.index(),
            AttributeKind::Alignment => self.alignment.index(),
        }
    }
}
