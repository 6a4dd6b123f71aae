//! The grammar rulebook: a char-to-replacement table driving expansion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An immutable-after-setup mapping from single-character symbols to
/// replacement strings.
///
/// Populated once at startup and treated as a read-only table during
/// expansion. Lookup on an unmapped symbol yields `None`, which the expander
/// interprets as "drop the symbol" rather than pass it through — symbols
/// without a rule act as one-shot instructions that survive exactly one
/// `draw` and are erased by the next expansion pass, while self-referential
/// rules (`B → B`) persist.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GrammarRules {
    table: HashMap<char, String>,
}

impl GrammarRules {
    /// Creates an empty rulebook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the conventional city rulebook:
    ///
    /// | symbol | replacement |
    /// |--------|-------------|
    /// | `B`    | `B`         |
    /// | `+`    | `++`        |
    /// | `S`    | `S++`       |
    /// | `X`    | `Y`         |
    /// | `Y`    | `X`         |
    ///
    /// `F`, `[` and `]` are deliberately left unmapped so branches and
    /// rescales fire once and vanish on the next expansion.
    pub fn standard() -> Self {
        let mut rules = Self::new();
        rules.add('B', "B");
        rules.add('+', "++");
        rules.add('S', "S++");
        rules.add('X', "Y");
        rules.add('Y', "X");
        rules
    }

    /// Registers or overwrites the rule for `symbol`.
    pub fn add(&mut self, symbol: char, replacement: impl Into<String>) {
        self.table.insert(symbol, replacement.into());
    }

    /// Looks up the replacement for `symbol`, or `None` when no rule exists.
    pub fn lookup(&self, symbol: char) -> Option<&str> {
        self.table.get(&symbol).map(String::as_str)
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// `true` when no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
