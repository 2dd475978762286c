use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Public identifier of a table: three uppercase letters and three digits in any order
/// (`"A1B2C3"`, `"9QZ81K"`).
///
/// Lookups accept any string, so a `TableId` is not validated on construction; use
/// [`TableId::is_well_formed`] where the shape matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    pub const LEN: usize = 6;

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exactly three `A-Z` letters and three `0-9` digits, nothing else.
    pub fn is_well_formed(&self) -> bool {
        let letters = self.0.chars().filter(|c| c.is_ascii_uppercase()).count();
        let digits = self.0.chars().filter(|c| c.is_ascii_digit()).count();
        self.0.len() == Self::LEN && letters == 3 && digits == 3
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TableId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TableId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
