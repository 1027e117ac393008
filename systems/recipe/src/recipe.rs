//! Ordered multiset of ingredients the player still has to catch.

use std::fmt::Write as _;

use cauldron_core::IngredientKind;

/// Ingredients still required to finish the current round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recipe {
    entries: Vec<IngredientKind>,
}

impl Recipe {
    /// Creates a recipe requiring `entries`, duplicates included.
    #[must_use]
    pub fn new(entries: Vec<IngredientKind>) -> Self {
        Self { entries }
    }

    /// Remaining entries in recipe order.
    #[must_use]
    pub fn remaining(&self) -> &[IngredientKind] {
        &self.entries
    }

    /// Reports whether every entry has been caught.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes the first entry matching `kind`. Returns `false` when none matches.
    pub fn consume(&mut self, kind: &IngredientKind) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry == kind) else {
            return false;
        };
        let _ = self.entries.remove(index);
        true
    }

    /// Text shown on the recipe display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut text = String::from("Recipe:\n");
        if self.entries.is_empty() {
            text.push_str("Done!");
            return text;
        }
        for entry in &self.entries {
            let _ = writeln!(text, "- {entry}");
        }
        text
    }
}
