//! Combination rules.
//!
//! Pure functions over cards; the round engine decides what to do with
//! the result.

pub mod validator;

pub use validator::{attribute_holds, check_cards, find_all_valid_triples, is_valid_triple, Triple, Validation};
