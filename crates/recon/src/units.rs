use crate::catalog::Dimension;

/// A recognized purchase unit: its dimension and the factor by which a
/// price quoted per this unit scales up when re-expressed per base unit
/// (1000 for the gram/milliliter sub-units, 1 for the base units).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurchaseUnit {
    pub dimension: Dimension,
    pub per_base: f64,
}

/// Parse a free-form unit cell against the purchase-unit lexicon.
/// Unknown units return `None`: no unit step applies to them, and whether
/// an unrecognized unit is acceptable at all is the validator's call.
pub fn parse_unit(raw: &str) -> Option<PurchaseUnit> {
    let unit = match raw.trim().to_lowercase().as_str() {
        "kg" | "kgs" | "kilogram" | "kilo" => PurchaseUnit {
            dimension: Dimension::Mass,
            per_base: 1.0,
        },
        "g" | "gr" | "gram" => PurchaseUnit {
            dimension: Dimension::Mass,
            per_base: 1000.0,
        },
        "l" | "lt" | "ltr" | "liter" | "litre" => PurchaseUnit {
            dimension: Dimension::Volume,
            per_base: 1.0,
        },
        "ml" | "milliliter" | "millilitre" => PurchaseUnit {
            dimension: Dimension::Volume,
            per_base: 1000.0,
        },
        _ => return None,
    };
    Some(unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_units_scale_by_one() {
        assert_eq!(
            parse_unit("kg"),
            Some(PurchaseUnit { dimension: Dimension::Mass, per_base: 1.0 })
        );
        assert_eq!(
            parse_unit("Ltr"),
            Some(PurchaseUnit { dimension: Dimension::Volume, per_base: 1.0 })
        );
    }

    #[test]
    fn sub_units_scale_by_thousand() {
        assert_eq!(parse_unit("gr").unwrap().per_base, 1000.0);
        assert_eq!(parse_unit("ML").unwrap().per_base, 1000.0);
    }

    #[test]
    fn unknown_units_are_none() {
        assert_eq!(parse_unit("pcs"), None);
        assert_eq!(parse_unit("box"), None);
        assert_eq!(parse_unit(""), None);
    }
}
