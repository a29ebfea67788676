//! Static currency reference data and lookups over it.

use serde::Serialize;

/// Immutable reference record for a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyRecord {
    pub code: &'static str,
    pub name: &'static str,
    pub country: &'static str,
    /// Flag emoji shown next to the code.
    pub emblem: &'static str,
    pub symbol: &'static str,
}

const fn record(
    code: &'static str,
    name: &'static str,
    country: &'static str,
    emblem: &'static str,
    symbol: &'static str,
) -> CurrencyRecord {
    CurrencyRecord {
        code,
        name,
        country,
        emblem,
        symbol,
    }
}

static CURRENCIES: [CurrencyRecord; 40] = [
    record("USD", "US Dollar", "United States", "🇺🇸", "$"),
    record("EUR", "Euro", "European Union", "🇪🇺", "€"),
    record("GBP", "Pound Sterling", "United Kingdom", "🇬🇧", "£"),
    record("JPY", "Japanese Yen", "Japan", "🇯🇵", "¥"),
    record("AUD", "Australian Dollar", "Australia", "🇦🇺", "A$"),
    record("CAD", "Canadian Dollar", "Canada", "🇨🇦", "C$"),
    record("CHF", "Swiss Franc", "Switzerland", "🇨🇭", "CHF"),
    record("CNY", "Chinese Yuan", "China", "🇨🇳", "¥"),
    record("INR", "Indian Rupee", "India", "🇮🇳", "₹"),
    record("MXN", "Mexican Peso", "Mexico", "🇲🇽", "$"),
    record("BRL", "Brazilian Real", "Brazil", "🇧🇷", "R$"),
    record("ZAR", "South African Rand", "South Africa", "🇿🇦", "R"),
    record("RUB", "Russian Ruble", "Russia", "🇷🇺", "₽"),
    record("KRW", "South Korean Won", "South Korea", "🇰🇷", "₩"),
    record("SGD", "Singapore Dollar", "Singapore", "🇸🇬", "S$"),
    record("HKD", "Hong Kong Dollar", "Hong Kong", "🇭🇰", "HK$"),
    record("NOK", "Norwegian Krone", "Norway", "🇳🇴", "kr"),
    record("SEK", "Swedish Krona", "Sweden", "🇸🇪", "kr"),
    record("DKK", "Danish Krone", "Denmark", "🇩🇰", "kr"),
    record("NZD", "New Zealand Dollar", "New Zealand", "🇳🇿", "NZ$"),
    record("PLN", "Polish Zloty", "Poland", "🇵🇱", "zł"),
    record("TRY", "Turkish Lira", "Turkey", "🇹🇷", "₺"),
    record("AED", "UAE Dirham", "United Arab Emirates", "🇦🇪", "د.إ"),
    record("SAR", "Saudi Riyal", "Saudi Arabia", "🇸🇦", "﷼"),
    record("THB", "Thai Baht", "Thailand", "🇹🇭", "฿"),
    record("MYR", "Malaysian Ringgit", "Malaysia", "🇲🇾", "RM"),
    record("IDR", "Indonesian Rupiah", "Indonesia", "🇮🇩", "Rp"),
    record("PHP", "Philippine Peso", "Philippines", "🇵🇭", "₱"),
    record("CZK", "Czech Koruna", "Czech Republic", "🇨🇿", "Kč"),
    record("HUF", "Hungarian Forint", "Hungary", "🇭🇺", "Ft"),
    record("ILS", "Israeli Shekel", "Israel", "🇮🇱", "₪"),
    record("CLP", "Chilean Peso", "Chile", "🇨🇱", "$"),
    record("ARS", "Argentine Peso", "Argentina", "🇦🇷", "$"),
    record("COP", "Colombian Peso", "Colombia", "🇨🇴", "$"),
    record("EGP", "Egyptian Pound", "Egypt", "🇪🇬", "£"),
    record("NGN", "Nigerian Naira", "Nigeria", "🇳🇬", "₦"),
    record("PKR", "Pakistani Rupee", "Pakistan", "🇵🇰", "₨"),
    record("VND", "Vietnamese Dong", "Vietnam", "🇻🇳", "₫"),
    record("BDT", "Bangladeshi Taka", "Bangladesh", "🇧🇩", "৳"),
    record("UAH", "Ukrainian Hryvnia", "Ukraine", "🇺🇦", "₴"),
];

/// Codes offered at the top of the base currency picker.
pub const POPULAR_BASE_CODES: [&str; 8] = ["USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY"];

/// The full catalog in declaration order.
pub fn all() -> &'static [CurrencyRecord] {
    &CURRENCIES
}

/// Exact, case-sensitive lookup by currency code.
pub fn lookup(code: &str) -> Option<&'static CurrencyRecord> {
    CURRENCIES.iter().find(|currency| currency.code == code)
}

/// Case-insensitive substring search across code, name and country.
///
/// An empty query matches every record. Results keep catalog order.
pub fn search(query: &str) -> Vec<&'static CurrencyRecord> {
    let needle = query.to_lowercase();
    CURRENCIES
        .iter()
        .filter(|currency| {
            currency.code.to_lowercase().contains(&needle)
                || currency.name.to_lowercase().contains(&needle)
                || currency.country.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Base picker ordering: popular codes first, then the rest of the catalog.
pub fn base_choices() -> Vec<&'static CurrencyRecord> {
    POPULAR_BASE_CODES
        .iter()
        .filter_map(|code| lookup(code))
        .chain(
            CURRENCIES
                .iter()
                .filter(|currency| !POPULAR_BASE_CODES.contains(&currency.code)),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = all().iter().map(|c| c.code).collect();
        assert_eq!(codes.len(), all().len());
    }

    #[test]
    fn test_emblems_are_flags_and_symbols_are_not() {
        let is_flag_char = |c: char| ('\u{1F1E6}'..='\u{1F1FF}').contains(&c);
        for currency in all() {
            assert!(
                currency.emblem.chars().all(is_flag_char),
                "{} emblem is not a flag",
                currency.code
            );
            assert!(
                !currency.symbol.chars().any(is_flag_char),
                "{} symbol looks like a flag",
                currency.code
            );
        }
        let inr = lookup("INR").unwrap();
        assert_eq!((inr.emblem, inr.symbol), ("🇮🇳", "₹"));
    }

    #[test]
    fn test_lookup_is_exact_and_case_sensitive() {
        let eur = lookup("EUR").expect("EUR should be in the catalog");
        assert_eq!(eur.name, "Euro");
        assert_eq!(eur.symbol, "€");
        assert!(lookup("eur").is_none());
        assert!(lookup("XYZ").is_none());
    }

    #[test]
    fn test_empty_query_returns_full_catalog_in_order() {
        let results = search("");
        assert_eq!(results.len(), all().len());
        assert_eq!(results[0].code, "USD");
        assert_eq!(results[results.len() - 1].code, all()[all().len() - 1].code);
    }

    #[test]
    fn test_search_matches_code_name_or_country() {
        let by_code: Vec<_> = search("jpy").iter().map(|c| c.code).collect();
        assert_eq!(by_code, vec!["JPY"]);

        let by_name: Vec<_> = search("PESO").iter().map(|c| c.code).collect();
        assert_eq!(by_name, vec!["MXN", "PHP", "CLP", "ARS", "COP"]);

        let by_country: Vec<_> = search("kingdom").iter().map(|c| c.code).collect();
        assert_eq!(by_country, vec!["GBP"]);
    }

    #[test]
    fn test_search_without_match_is_empty() {
        assert!(search("doubloon").is_empty());
    }

    #[test]
    fn test_base_choices_put_popular_codes_first() {
        let choices = base_choices();
        assert_eq!(choices.len(), all().len());
        let head: Vec<_> = choices.iter().take(8).map(|c| c.code).collect();
        assert_eq!(head, POPULAR_BASE_CODES.to_vec());
        assert_eq!(choices[8].code, "INR");
    }
}
