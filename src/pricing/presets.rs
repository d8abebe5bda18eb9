use crate::types::PricingRates;

/// A named hardware family with its default per-GPU-hour rates (USD).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineFamily {
    pub name: &'static str,
    pub description: &'static str,
    pub rates: PricingRates,
}

const fn rates(
    flex_start: f64,
    on_demand: f64,
    one_year_cud: f64,
    three_year_cud: f64,
) -> PricingRates {
    PricingRates {
        on_demand,
        flex_start,
        one_year_cud,
        three_year_cud,
    }
}

pub const DEFAULT_FAMILY: &str = "H100 80GB";

pub const FAMILIES: &[MachineFamily] = &[
    MachineFamily {
        name: DEFAULT_FAMILY,
        description: "H100 80GB equivalent",
        rates: rates(4.79, 11.06, 7.67, 4.855),
    },
    MachineFamily {
        name: "A4",
        description: "B200",
        rates: rates(11.28, 16.11, 11.12, 7.09),
    },
    MachineFamily {
        name: "A3 Ultra",
        description: "H200 141GB",
        rates: rates(5.30, 11.01, 7.60, 4.84),
    },
    MachineFamily {
        name: "A3 Mega",
        description: "H100 80GB Mega",
        rates: rates(5.03, 11.67, 8.05, 5.13),
    },
    MachineFamily {
        name: "A3 High",
        description: "H100 80GB",
        rates: rates(4.79, 11.06, 7.63, 4.87),
    },
    MachineFamily {
        name: "A2 Ultra",
        description: "A100 80GB",
        rates: rates(2.40, 5.07, 3.50, 2.23),
    },
    MachineFamily {
        name: "A2 High",
        description: "A100 40GB",
        rates: rates(2.00, 3.67, 2.53, 1.62),
    },
];

/// Lowercase and fold spaces, `-` and `_` together:
/// "A3 High" → "a3-high", "a3_high" → "a3-high"
pub fn normalize_family(name: &str) -> String {
    name.trim()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

pub fn lookup(name: &str) -> Option<&'static MachineFamily> {
    let needle = normalize_family(name);
    FAMILIES.iter().find(|f| normalize_family(f.name) == needle)
}

pub fn default_family() -> &'static MachineFamily {
    &FAMILIES[0]
}
