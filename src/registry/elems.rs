//! Chemical element order.
//!
//! Each element is either measured relative to iron (`[X/Fe]`, tag `X_Fe`) or
//! relative to the overall metallicity (`[X/M]`, tag `X_M`). Tags and labels
//! are derived from the symbol and that flag only.

use std::sync::OnceLock;

use serde::Serialize;

/// Number of elements in the abundance arrays.
pub const N_ELEMS: usize = 26;

/// One element of the abundance arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementSpec {
    pub symbol: &'static str,
    /// `true` for `[X/Fe]`, `false` for `[X/M]`.
    pub relative_to_fe: bool,
}

const fn el(symbol: &'static str, relative_to_fe: bool) -> ElementSpec {
    ElementSpec {
        symbol,
        relative_to_fe,
    }
}

pub const ELEMENTS: [ElementSpec; N_ELEMS] = [
    el("C", false),
    el("CI", false),
    el("N", false),
    el("O", false),
    el("Na", true),
    el("Mg", false),
    el("Al", true),
    el("Si", false),
    el("P", true),
    el("S", false),
    el("K", true),
    el("Ca", false),
    el("Ti", false),
    el("TiII", false),
    el("V", true),
    el("Cr", true),
    el("Mn", true),
    el("Fe", true),
    el("Co", true),
    el("Ni", true),
    el("Cu", true),
    el("Ge", true),
    el("Rb", true),
    el("Ce", true),
    el("Nd", true),
    el("Yb", true),
];

impl ElementSpec {
    /// Persisted column name, e.g. `Na_Fe` or `C_M`.
    pub fn tag(&self) -> String {
        format!("{}_{}", self.symbol, self.reference())
    }

    /// Display label, e.g. `[Na/Fe]` or `[C/M]`.
    pub fn label(&self) -> String {
        format!("[{}/{}]", self.symbol, self.reference())
    }

    fn reference(&self) -> &'static str {
        if self.relative_to_fe { "Fe" } else { "M" }
    }
}

/// Parallel element sequences: symbols, reference flags, tags and labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementOrder {
    pub symbols: Vec<&'static str>,
    pub relative_to_fe: Vec<bool>,
    pub tags: Vec<String>,
    pub labels: Vec<String>,
}

impl ElementOrder {
    fn build() -> Self {
        Self {
            symbols: ELEMENTS.iter().map(|e| e.symbol).collect(),
            relative_to_fe: ELEMENTS.iter().map(|e| e.relative_to_fe).collect(),
            tags: ELEMENTS.iter().map(ElementSpec::tag).collect(),
            labels: ELEMENTS.iter().map(ElementSpec::label).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Element symbols, reference flags, tags and labels, in element order.
///
/// Built on first use and shared for the rest of the process.
pub fn element_order() -> &'static ElementOrder {
    static ORDER: OnceLock<ElementOrder> = OnceLock::new();
    ORDER.get_or_init(ElementOrder::build)
}

/// Position of an element by its symbol.
pub fn element_index(symbol: &str) -> Option<usize> {
    ELEMENTS.iter().position(|e| e.symbol == symbol)
}
