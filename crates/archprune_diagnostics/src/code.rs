//! Diagnostic codes with category prefixes for structured error identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Codes reported by the external compiler, prefixed with `TS`.
    Compiler,
    /// Problems found while pruning conditional regions, prefixed with `S`.
    Scan,
}

impl Category {
    /// Returns the prefix for this category.
    pub fn prefix(self) -> &'static str {
        match self {
            Category::Compiler => "TS",
            Category::Scan => "S",
        }
    }
}

/// A structured diagnostic code combining a category prefix and a number.
///
/// Displayed as the prefix followed by an at-least-3-digit number, e.g.
/// `TS2304`, `S001`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u32,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u32) -> Self {
        Self { category, number }
    }

    /// Shorthand for a compiler-reported code such as `TS2304`.
    pub fn compiler(number: u32) -> Self {
        Self::new(Category::Compiler, number)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Compiler.prefix(), "TS");
        assert_eq!(Category::Scan.prefix(), "S");
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", DiagnosticCode::compiler(2304)), "TS2304");
        assert_eq!(format!("{}", DiagnosticCode::new(Category::Scan, 1)), "S001");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::compiler(1005);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
