//! Combination validator.
//!
//! A triple is valid when, for each attribute independently, the three
//! values are either all equal or pairwise distinct. Two-equal-one-different
//! on any attribute invalidates the triple.

use serde::Serialize;
use tracing::trace;

use crate::cards::{AttributeKind, Card};

/// Three cards forming a candidate combination.
pub type Triple = [Card; 3];

/// Outcome of validating a selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub is_valid: bool,
    pub message: String,
    /// First attribute that broke the rule, if any.
    pub failed: Option<AttributeKind>,
}

impl Validation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            message: "Valid combination!".to_string(),
            failed: None,
        }
    }

    fn invalid(failed: Option<AttributeKind>, message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
            failed,
        }
    }
}

/// Check the all-same/all-different rule for one attribute.
#[must_use]
pub fn attribute_holds(triple: &Triple, kind: AttributeKind) -> bool {
    let [a, b, c] = triple.map(|card| card.attributes().index_of(kind));
    let all_same = a == b && b == c;
    let all_different = a != b && b != c && a != c;
    all_same || all_different
}

/// Validate a triple.
///
/// ```
/// use trio_engine::cards::{Card, CardId};
/// use trio_engine::rules::is_valid_triple;
///
/// let triple = [1, 5, 9].map(|id| Card::from_id(CardId::new(id)));
/// assert!(is_valid_triple(&triple).is_valid);
/// ```
#[must_use]
pub fn is_valid_triple(triple: &Triple) -> Validation {
    match AttributeKind::ALL.into_iter().find(|&kind| !attribute_holds(triple, kind)) {
        None => Validation::valid(),
        Some(kind) => Validation::invalid(Some(kind), "Invalid combination."),
    }
}

/// Validate an arbitrary selection; anything but exactly 3 cards is invalid.
#[must_use]
pub fn check_cards(cards: &[Card]) -> Validation {
    match <&Triple>::try_from(cards) {
        Ok(triple) => is_valid_triple(triple),
        Err(_) => Validation::invalid(None, "Three cards are required."),
    }
}

/// Every valid triple among `cards`.
///
/// Enumerates index combinations `i < j < k` in lexicographic order, so the
/// result is deterministic for a fixed input. Fewer than 3 cards yields an
/// empty list.
#[must_use]
pub fn find_all_valid_triples(cards: &[Card]) -> Vec<Triple> {
    let n = cards.len();
    let mut found = Vec::new();
    if n < 3 {
        return found;
    }

    for i in 0..n - 2 {
        for j in i + 1..n - 1 {
            for k in j + 1..n {
                let triple = [cards[i], cards[j], cards[k]];
                if AttributeKind::ALL.into_iter().all(|kind| attribute_holds(&triple, kind)) {
                    found.push(triple);
                }
            }
        }
    }

    trace!(cards = n, valid = found.len(), "searched triples");
    found
}
