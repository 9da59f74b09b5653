//! Engine-level scenario tests.
//!
//! These tests drive a full `EventEngine` loaded with the built-in catalog
//! through simulated days, with the clock and random source pinned.
//!
//! ```bash
//! cargo test -p tails-engine --lib e2e_tests
//! ```

mod e2e_helpers;
mod frequency_tests;

pub use e2e_helpers::*;
