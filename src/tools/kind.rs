//! Tool Catalogue
//!
//! The fixed set of market-data tools, their TTL class and how their
//! results are laid out, plus the enumerated argument values they accept.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::cache::TtlClass;
use crate::paging::RenderStyle;

/// Rejected value for an enumerated argument.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {argument} '{value}': use one of {valid}")]
pub struct InvalidChoice {
    pub argument: &'static str,
    pub value: String,
    pub valid: String,
}

/// Declares an argument enum with its wire names, `FromStr` and `Display`.
macro_rules! choice_enum {
    ($name:ident, $argument:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = InvalidChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| InvalidChoice {
                        argument: $argument,
                        value: s.to_string(),
                        valid: Self::ALL
                            .iter()
                            .map(|choice| choice.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(FinancialType, "financial_type", {
    IncomeStmt => "income_stmt",
    QuarterlyIncomeStmt => "quarterly_income_stmt",
    BalanceSheet => "balance_sheet",
    QuarterlyBalanceSheet => "quarterly_balance_sheet",
    Cashflow => "cashflow",
    QuarterlyCashflow => "quarterly_cashflow",
});

choice_enum!(HolderType, "holder_type", {
    MajorHolders => "major_holders",
    InstitutionalHolders => "institutional_holders",
    MutualfundHolders => "mutualfund_holders",
    InsiderTransactions => "insider_transactions",
    InsiderPurchases => "insider_purchases",
    InsiderRosterHolders => "insider_roster_holders",
});

choice_enum!(RecommendationType, "recommendation_type", {
    Recommendations => "recommendations",
    UpgradesDowngrades => "upgrades_downgrades",
});

choice_enum!(OptionType, "option_type", {
    Calls => "calls",
    Puts => "puts",
});

// == Tool Kind ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    HistoricalStockPrices,
    StockInfo,
    YahooFinanceNews,
    StockActions,
    FinancialStatement,
    HolderInfo,
    OptionExpirationDates,
    OptionChain,
    Recommendations,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::HistoricalStockPrices,
        ToolKind::StockInfo,
        ToolKind::YahooFinanceNews,
        ToolKind::StockActions,
        ToolKind::FinancialStatement,
        ToolKind::HolderInfo,
        ToolKind::OptionExpirationDates,
        ToolKind::OptionChain,
        ToolKind::Recommendations,
    ];

    /// Name the tool is invoked by.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::HistoricalStockPrices => "get_historical_stock_prices",
            ToolKind::StockInfo => "get_stock_info",
            ToolKind::YahooFinanceNews => "get_yahoo_finance_news",
            ToolKind::StockActions => "get_stock_actions",
            ToolKind::FinancialStatement => "get_financial_statement",
            ToolKind::HolderInfo => "get_holder_info",
            ToolKind::OptionExpirationDates => "get_option_expiration_dates",
            ToolKind::OptionChain => "get_option_chain",
            ToolKind::Recommendations => "get_recommendations",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Prices, news and option data go stale quickly; fundamentals do not.
    pub fn ttl_class(self) -> TtlClass {
        match self {
            ToolKind::HistoricalStockPrices
            | ToolKind::StockInfo
            | ToolKind::YahooFinanceNews
            | ToolKind::OptionExpirationDates
            | ToolKind::OptionChain => TtlClass::Short,
            ToolKind::StockActions
            | ToolKind::FinancialStatement
            | ToolKind::HolderInfo
            | ToolKind::Recommendations => TtlClass::Long,
        }
    }

    pub fn render_style(self) -> RenderStyle {
        match self {
            ToolKind::StockInfo => RenderStyle::Fields,
            ToolKind::YahooFinanceNews => RenderStyle::List,
            _ => RenderStyle::Table,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::HistoricalStockPrices => {
                "Historical OHLCV prices for a ticker over a period and interval"
            }
            ToolKind::StockInfo => "Company profile, trading and valuation fields for a ticker",
            ToolKind::YahooFinanceNews => "Recent news stories for a ticker",
            ToolKind::StockActions => "Dividends and stock splits for a ticker",
            ToolKind::FinancialStatement => {
                "Income statement, balance sheet or cash flow, annual or quarterly"
            }
            ToolKind::HolderInfo => "Major, institutional, mutual fund and insider holders",
            ToolKind::OptionExpirationDates => "Available option expiration dates for a ticker",
            ToolKind::OptionChain => "Calls or puts for one option expiration date",
            ToolKind::Recommendations => "Analyst recommendations or upgrades and downgrades",
        }
    }

    /// File name suggested in the export hint.
    pub fn export_hint(self) -> &'static str {
        match self {
            ToolKind::HistoricalStockPrices => "./historical_prices.json",
            ToolKind::StockInfo => "./stock_info.json",
            ToolKind::YahooFinanceNews => "./news.json",
            ToolKind::StockActions => "./stock_actions.json",
            ToolKind::FinancialStatement => "./financial_statement.json",
            ToolKind::HolderInfo => "./holders.json",
            ToolKind::OptionExpirationDates => "./option_dates.json",
            ToolKind::OptionChain => "./option_chain.json",
            ToolKind::Recommendations => "./recommendations.json",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
