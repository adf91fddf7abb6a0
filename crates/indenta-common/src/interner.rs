//! Tag-name interning.
//!
//! Markup strategies compare tag names constantly; names are folded to
//! lowercase once and compared as symbols afterwards.

use std::collections::HashMap;

/// An interned, case-folded name.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl Symbol {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Maps names to symbols. `Foo` and `foo` intern to the same symbol.
#[derive(Default)]
pub struct Interner {
    map: HashMap<String, Symbol>,
    names: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a name and return its symbol.
    pub fn intern(&mut self, name: &str) -> Symbol {
        let folded = name.to_ascii_lowercase();
        if let Some(&sym) = self.map.get(&folded) {
            return sym;
        }

        let sym = Symbol(self.names.len() as u32);
        self.names.push(folded.clone());
        self.map.insert(folded, sym);
        sym
    }

    /// Look a name up without interning it.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.map.get(&name.to_ascii_lowercase()).copied()
    }

    /// Get the folded name for a symbol.
    pub fn get(&self, sym: Symbol) -> &str {
        &self.names[sym.0 as usize]
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.names.clear();
    }
}
