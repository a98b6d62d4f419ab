//! Currency pair translation between the canonical boundary format and an
//! exchange's own naming.
//!
//! Canonical pairs are uppercase `BASE_QUOTE` (e.g. `XBT_USD`). Exchanges
//! that predate the XBT code trade it as `btc`, so each side is aliased
//! independently on the way upstream.

/// Translate a canonical pair into the exchange's lowercase form.
///
/// Splits on `_`, lowercases each side, and replaces the first `xbt`
/// occurrence with `btc` on each side independently. A missing pair yields
/// `"_"` — a caller error that is left to surface upstream rather than being
/// validated here.
pub fn to_exchange(pair: Option<&str>) -> String {
    let lower = pair.unwrap_or("").to_lowercase();
    let mut sides = lower.split('_');
    let base = sides.next().unwrap_or("");
    let quote = sides.next().unwrap_or("");
    format!("{}_{}", alias(base), alias(quote))
}

/// Canonical display form of the requested pair: the caller's own string,
/// uppercased, aliases untouched.
pub fn to_display(pair: Option<&str>) -> String {
    pair.unwrap_or("").to_uppercase()
}

fn alias(side: &str) -> String {
    side.replacen("xbt", "btc", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_canonical_pair_maps_to_lowercase_btc() {
        assert_eq!(to_exchange(Some("XBT_USD")), "btc_usd");
    }

    #[test]
    fn already_lowercase_pair_is_aliased_per_side() {
        assert_eq!(to_exchange(Some("ltc_xbt")), "ltc_btc");
    }

    #[test]
    fn non_aliased_pairs_pass_through_lowercased() {
        assert_eq!(to_exchange(Some("LTC_USD")), "ltc_usd");
        assert_eq!(to_exchange(Some("ppc_eur")), "ppc_eur");
    }

    #[test]
    fn missing_pair_yields_bare_separator() {
        assert_eq!(to_exchange(None), "_");
    }

    #[test]
    fn both_sides_alias_independently() {
        assert_eq!(to_exchange(Some("XBT_xbt")), "btc_btc");
    }

    #[test]
    fn display_form_uppercases_without_aliasing() {
        assert_eq!(to_display(Some("xbt_usd")), "XBT_USD");
        assert_eq!(to_display(None), "");
    }
}
