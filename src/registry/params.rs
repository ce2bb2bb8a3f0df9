//! Stellar parameter order.
//!
//! Index `i` refers to the same physical quantity in the FERRE name, tag name
//! and flag name sequences. Result tables store parameter arrays in this order.

use serde::Serialize;

/// Number of stellar parameter slots.
pub const N_PARAMS: usize = 9;

/// One stellar parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterSlot {
    /// Name of the parameter in FERRE library headers.
    pub ferre_name: &'static str,
    /// Column name in persisted result tables.
    pub tag: &'static str,
    /// Name used for the quality flag of this parameter.
    pub flag: &'static str,
}

const fn slot(ferre_name: &'static str, tag: &'static str, flag: &'static str) -> ParameterSlot {
    ParameterSlot {
        ferre_name,
        tag,
        flag,
    }
}

pub const PARAMETERS: [ParameterSlot; N_PARAMS] = [
    slot("TEFF", "TEFF", "TEFF"),
    slot("LOGG", "LOGG", "LOGG"),
    slot("LOG10VDOP", "LOGVMICRO", "VMICRO"),
    slot("METALS", "M_H", "M_H"),
    slot("C", "C_M", "C_M"),
    slot("N", "N_M", "N_M"),
    slot("O Mg Si S Ca Ti", "ALPHA_M", "ALPHA_M"),
    slot("LGVSINI", "LGVSINI", "VSINI"),
    slot("O", "PARAM_O", "O"),
];

/// Parallel name sequences for the parameter slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterOrder {
    pub ferre_names: [&'static str; N_PARAMS],
    pub tags: [&'static str; N_PARAMS],
    pub flags: [&'static str; N_PARAMS],
}

impl ParameterOrder {
    pub fn len(&self) -> usize {
        N_PARAMS
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn slots(&self) -> impl Iterator<Item = ParameterSlot> + '_ {
        (0..N_PARAMS).map(|i| slot(self.ferre_names[i], self.tags[i], self.flags[i]))
    }
}

#[derive(Clone, Copy)]
enum Column {
    Ferre,
    Tag,
    Flag,
}

const fn column(which: Column) -> [&'static str; N_PARAMS] {
    let mut out = [""; N_PARAMS];
    let mut i = 0;
    while i < N_PARAMS {
        out[i] = match which {
            Column::Ferre => PARAMETERS[i].ferre_name,
            Column::Tag => PARAMETERS[i].tag,
            Column::Flag => PARAMETERS[i].flag,
        };
        i += 1;
    }
    out
}

static PARAMETER_ORDER: ParameterOrder = ParameterOrder {
    ferre_names: column(Column::Ferre),
    tags: column(Column::Tag),
    flags: column(Column::Flag),
};

/// FERRE names, tag names and flag names, in parameter order.
pub fn parameter_order() -> &'static ParameterOrder {
    &PARAMETER_ORDER
}

/// Position of a parameter by its tag name.
pub fn parameter_index(tag: &str) -> Option<usize> {
    PARAMETERS.iter().position(|p| p.tag == tag)
}
