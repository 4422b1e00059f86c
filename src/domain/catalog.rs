//! Built-in indicator catalog.
//!
//! The dashboard ships a fixed set of instruments grouped by market category.
//! Each entry knows its display label, where its series comes from, and
//! whether it is selected by default. Custom tickers supplied on the command
//! line are handled alongside catalog entries by the pipeline.

use super::types::{InstrumentCategory, SeriesIdentity};

/// Market grouping, used for listing and default selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketCategory {
    EquityIndex,
    SovereignBond,
    Fx,
    Commodity,
    Crypto,
}

impl MarketCategory {
    pub const ALL: [MarketCategory; 5] = [
        MarketCategory::EquityIndex,
        MarketCategory::SovereignBond,
        MarketCategory::Fx,
        MarketCategory::Commodity,
        MarketCategory::Crypto,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            MarketCategory::EquityIndex => "Equity indices",
            MarketCategory::SovereignBond => "Sovereign bonds",
            MarketCategory::Fx => "FX",
            MarketCategory::Commodity => "Commodities",
            MarketCategory::Crypto => "Crypto",
        }
    }
}

/// Where an indicator's series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Market-data provider ticker symbol.
    Quote(&'static str),
    /// MOF JGB maturity-term column label.
    JgbTerm(&'static str),
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Indicator {
    pub label: &'static str,
    pub category: MarketCategory,
    pub source: CatalogSource,
    pub default_selected: bool,
}

impl Indicator {
    pub fn identity(&self) -> SeriesIdentity {
        match self.source {
            CatalogSource::Quote(ticker) => SeriesIdentity::market_quote(ticker),
            CatalogSource::JgbTerm(term) => SeriesIdentity::jgb_yield(term),
        }
    }

    /// Change-metric semantics for this instrument.
    ///
    /// Sovereign-bond entries report absolute point changes regardless of
    /// source kind: the Treasury yields come from the quote provider but are
    /// still yields.
    pub fn change_category(&self) -> InstrumentCategory {
        match self.category {
            MarketCategory::SovereignBond => InstrumentCategory::YieldLike,
            _ => InstrumentCategory::PriceLike,
        }
    }
}

/// The full built-in catalog, in listing order.
pub const CATALOG: &[Indicator] = &[
    // Equity indices
    ind("S&P 500 (SPY)", MarketCategory::EquityIndex, CatalogSource::Quote("SPY"), true),
    ind("Nasdaq 100 (QQQ)", MarketCategory::EquityIndex, CatalogSource::Quote("QQQ"), false),
    ind("Dow Jones (DIA)", MarketCategory::EquityIndex, CatalogSource::Quote("DIA"), false),
    ind("Nikkei 225", MarketCategory::EquityIndex, CatalogSource::Quote("^N225"), true),
    ind("DAX", MarketCategory::EquityIndex, CatalogSource::Quote("^GDAXI"), true),
    ind("FTSE 100", MarketCategory::EquityIndex, CatalogSource::Quote("^FTSE"), false),
    ind("CAC 40", MarketCategory::EquityIndex, CatalogSource::Quote("^FCHI"), false),
    ind("Shanghai Composite", MarketCategory::EquityIndex, CatalogSource::Quote("000001.SS"), false),
    ind("MSCI Emerging Markets (EEM)", MarketCategory::EquityIndex, CatalogSource::Quote("EEM"), false),
    ind("SENSEX", MarketCategory::EquityIndex, CatalogSource::Quote("^BSESN"), false),
    ind("KOSPI", MarketCategory::EquityIndex, CatalogSource::Quote("^KS11"), false),
    ind("IBOVESPA", MarketCategory::EquityIndex, CatalogSource::Quote("^BVSP"), false),
    // Sovereign bonds
    ind("US 2y Treasury yield (^IRX)", MarketCategory::SovereignBond, CatalogSource::Quote("^IRX"), false),
    ind("US 5y Treasury yield (^FVX)", MarketCategory::SovereignBond, CatalogSource::Quote("^FVX"), false),
    ind("US 10y Treasury yield (^TNX)", MarketCategory::SovereignBond, CatalogSource::Quote("^TNX"), true),
    ind("US 30y Treasury yield (^TYX)", MarketCategory::SovereignBond, CatalogSource::Quote("^TYX"), false),
    ind("JGB 2y yield", MarketCategory::SovereignBond, CatalogSource::JgbTerm("2年"), false),
    ind("JGB 5y yield", MarketCategory::SovereignBond, CatalogSource::JgbTerm("5年"), false),
    ind("JGB 10y yield", MarketCategory::SovereignBond, CatalogSource::JgbTerm("10年"), true),
    ind("JGB 30y yield", MarketCategory::SovereignBond, CatalogSource::JgbTerm("30年"), false),
    // FX
    ind("USD/JPY", MarketCategory::Fx, CatalogSource::Quote("JPY=X"), true),
    ind("EUR/USD", MarketCategory::Fx, CatalogSource::Quote("EURUSD=X"), true),
    ind("GBP/USD", MarketCategory::Fx, CatalogSource::Quote("GBPUSD=X"), false),
    ind("AUD/USD", MarketCategory::Fx, CatalogSource::Quote("AUDUSD=X"), false),
    ind("USD/CAD", MarketCategory::Fx, CatalogSource::Quote("CAD=X"), false),
    ind("USD/CHF", MarketCategory::Fx, CatalogSource::Quote("CHF=X"), false),
    ind("EUR/JPY", MarketCategory::Fx, CatalogSource::Quote("EURJPY=X"), false),
    ind("USD/CNY", MarketCategory::Fx, CatalogSource::Quote("CNY=X"), false),
    // Commodities
    ind("Gold", MarketCategory::Commodity, CatalogSource::Quote("GC=F"), true),
    ind("Silver", MarketCategory::Commodity, CatalogSource::Quote("SI=F"), false),
    ind("WTI crude", MarketCategory::Commodity, CatalogSource::Quote("CL=F"), true),
    ind("Brent crude", MarketCategory::Commodity, CatalogSource::Quote("BZ=F"), false),
    ind("Natural gas (Henry Hub)", MarketCategory::Commodity, CatalogSource::Quote("NG=F"), false),
    ind("Copper", MarketCategory::Commodity, CatalogSource::Quote("HG=F"), false),
    ind("Wheat", MarketCategory::Commodity, CatalogSource::Quote("ZW=F"), false),
    ind("Soybeans", MarketCategory::Commodity, CatalogSource::Quote("ZS=F"), false),
    // Crypto
    ind("Bitcoin (BTC/USD)", MarketCategory::Crypto, CatalogSource::Quote("BTC-USD"), true),
    ind("Ethereum (ETH/USD)", MarketCategory::Crypto, CatalogSource::Quote("ETH-USD"), false),
    ind("Binance Coin (BNB/USD)", MarketCategory::Crypto, CatalogSource::Quote("BNB-USD"), false),
    ind("Solana (SOL/USD)", MarketCategory::Crypto, CatalogSource::Quote("SOL-USD"), false),
];

const fn ind(
    label: &'static str,
    category: MarketCategory,
    source: CatalogSource,
    default_selected: bool,
) -> Indicator {
    Indicator {
        label,
        category,
        source,
        default_selected,
    }
}

/// Look up a catalog entry by its exact display label.
pub fn find(label: &str) -> Option<&'static Indicator> {
    CATALOG.iter().find(|i| i.label == label)
}

/// Entries selected when the user picks nothing explicitly.
pub fn default_selection() -> Vec<&'static Indicator> {
    CATALOG.iter().filter(|i| i.default_selected).collect()
}

/// Entries in `category`, in catalog order.
pub fn by_category(category: MarketCategory) -> Vec<&'static Indicator> {
    CATALOG.iter().filter(|i| i.category == category).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SourceKind;

    #[test]
    fn default_selection_is_nonempty_and_spans_categories() {
        let defaults = default_selection();
        assert!(defaults.len() >= 5);
        assert!(defaults.iter().any(|i| i.category == MarketCategory::EquityIndex));
        assert!(defaults.iter().any(|i| i.category == MarketCategory::SovereignBond));
    }

    #[test]
    fn find_resolves_exact_labels() {
        let jgb = find("JGB 10y yield").unwrap();
        assert_eq!(jgb.identity().kind, SourceKind::JgbYield);
        assert_eq!(jgb.identity().key, "10年");
        assert!(find("JGB 10Y yield").is_none());
    }

    #[test]
    fn sovereign_bonds_are_yield_like_regardless_of_source() {
        for entry in by_category(MarketCategory::SovereignBond) {
            assert_eq!(entry.change_category(), InstrumentCategory::YieldLike);
        }
        assert_eq!(
            find("Gold").unwrap().change_category(),
            InstrumentCategory::PriceLike
        );
    }

    #[test]
    fn labels_are_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert_ne!(a.label, b.label);
            }
        }
    }
}
