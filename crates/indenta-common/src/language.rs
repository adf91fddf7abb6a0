//! Language identifiers.

use std::fmt;

/// Identifies one sub-language of a multi-language document.
///
/// The host decides the names; the engine only compares them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageId(&'static str);

impl LanguageId {
    pub const fn new(name: &'static str) -> Self {
        LanguageId(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageId({})", self.0)
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
