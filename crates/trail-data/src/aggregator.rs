//! Token aggregation into the frequency table.

use trail_core::models::{CommandToken, FrequencyTable};

// ── CommandAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that folds extracted tokens into a [`FrequencyTable`].
pub struct CommandAggregator;

impl CommandAggregator {
    /// Count every token. Increment is the only mutation; no token is ever
    /// removed, and insertion order does not affect the result.
    pub fn aggregate<I>(tokens: I) -> FrequencyTable
    where
        I: IntoIterator<Item = CommandToken>,
    {
        let mut table = FrequencyTable::new();
        for token in tokens {
            table.record(token);
        }
        table
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
