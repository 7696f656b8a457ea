use crate::catalog::CatalogEntry;
use crate::model::Price;
use crate::units;

/// Result of normalizing one row's price to the comparison basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPrice {
    /// Price in base currency per base unit. Comparison only.
    pub value: f64,
    /// A cross-dimension conversion was needed but skipped for lack of a
    /// usable density; the value is the face conversion instead.
    pub low_confidence: bool,
}

/// Convert a purchase price to the comparison basis. Three steps, applied
/// once each, always in this order:
///
/// 1. currency: multiply by the rate into the base currency (the caller
///    resolves the rate; a missing rate excludes the row before this runs);
/// 2. unit scale: a price per sub-unit (g, ml) becomes a price per base
///    unit by multiplying with the sub-unit factor;
/// 3. cross-dimension: when the purchase unit's dimension differs from the
///    catalog's base unit, divide by density (price per volume = price per
///    mass / density). No usable density: skip and mark low-confidence.
///
/// Unset, non-finite, and non-positive prices normalize to 0.0 so they
/// compare deterministically; the validator owns the warning for them.
pub fn normalize_price(
    price: Price,
    rate_to_base: f64,
    purchase_unit: Option<&str>,
    entry: &CatalogEntry,
) -> NormalizedPrice {
    let face = match price.known() {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    };

    let mut value = face * rate_to_base;
    let mut low_confidence = false;

    if let Some(unit) = purchase_unit.and_then(units::parse_unit) {
        value *= unit.per_base;

        if unit.dimension != entry.base_unit.dimension() {
            match entry.usable_density() {
                Some(density) => value /= density,
                None => low_confidence = true,
            }
        }
    }

    NormalizedPrice { value, low_confidence }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BaseUnit, CatalogEntry};
    use crate::model::MaterialClass;
    use proptest::prelude::*;

    fn entry(base_unit: BaseUnit, density: Option<f64>) -> CatalogEntry {
        CatalogEntry {
            code: "130".into(),
            name: "Citric Acid".into(),
            class: MaterialClass::Raw,
            base_unit,
            density,
        }
    }

    #[test]
    fn base_currency_base_unit_is_identity() {
        let e = entry(BaseUnit::Kilogram, None);
        let np = normalize_price(Price::Known(25000.0), 1.0, Some("kg"), &e);
        assert_eq!(np.value, 25000.0);
        assert!(!np.low_confidence);
    }

    #[test]
    fn currency_step_multiplies_by_rate() {
        let e = entry(BaseUnit::Kilogram, None);
        let np = normalize_price(Price::Known(10.0), 15000.0, Some("kg"), &e);
        assert_eq!(np.value, 150_000.0);
    }

    #[test]
    fn sub_unit_scales_price_up() {
        // 5 per gram = 5000 per kilogram
        let e = entry(BaseUnit::Kilogram, None);
        let np = normalize_price(Price::Known(5.0), 1.0, Some("gr"), &e);
        assert_eq!(np.value, 5000.0);
    }

    #[test]
    fn cross_dimension_divides_by_density() {
        // Priced per kg, catalog prices per liter, density 0.8:
        // price per volume = price per mass / density = 1250
        let e = entry(BaseUnit::Liter, Some(0.8));
        let np = normalize_price(Price::Known(1000.0), 1.0, Some("kg"), &e);
        assert_eq!(np.value, 1250.0);
        assert!(!np.low_confidence);
    }

    #[test]
    fn cross_dimension_without_density_flags_low_confidence() {
        let e = entry(BaseUnit::Liter, None);
        let np = normalize_price(Price::Known(1000.0), 1.0, Some("kg"), &e);
        assert_eq!(np.value, 1000.0);
        assert!(np.low_confidence);
    }

    #[test]
    fn steps_compose_in_fixed_order() {
        // 2 USD per ml at 15000 IDR/USD into a liter-based entry:
        // currency first (30000 per ml), then sub-unit (30000000 per l)
        let e = entry(BaseUnit::Liter, Some(1.2));
        let np = normalize_price(Price::Known(2.0), 15000.0, Some("ml"), &e);
        assert_eq!(np.value, 30_000_000.0);
    }

    #[test]
    fn unknown_unit_skips_unit_steps() {
        let e = entry(BaseUnit::Kilogram, Some(0.9));
        let np = normalize_price(Price::Known(42.0), 2.0, Some("box"), &e);
        assert_eq!(np.value, 84.0);
        assert!(!np.low_confidence);
    }

    #[test]
    fn unset_and_junk_prices_normalize_to_zero() {
        let e = entry(BaseUnit::Kilogram, None);
        assert_eq!(normalize_price(Price::Unset, 15000.0, Some("kg"), &e).value, 0.0);
        assert_eq!(normalize_price(Price::Known(-5.0), 1.0, Some("kg"), &e).value, 0.0);
    }

    proptest! {
        #[test]
        fn currency_round_trip(price in 0.01f64..1_000_000.0, rate in 0.0001f64..100_000.0) {
            let e = entry(BaseUnit::Kilogram, None);
            let converted = normalize_price(Price::Known(price), rate, Some("kg"), &e).value;
            let back = converted / rate;
            prop_assert!((back - price).abs() <= price * 1e-12);
        }
    }
}
