//! String similarity measures used by the fuzzy boundary matchers.
//!
//! - [`sequence`]: Ratcliff/Obershelp similarity ratio in `[0, 1]`
//! - [`fuzz`]: weighted token-based score in `0..=100`

pub mod fuzz;
pub mod sequence;

pub use fuzz::{first_token_match, token_score};
pub use sequence::{first_close_match, ratio, SequenceMatcher};
