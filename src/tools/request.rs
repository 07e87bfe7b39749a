//! Tool Requests
//!
//! Parses loose tool-call arguments into a typed, normalized request. All
//! validation happens here, before the cache or the data source is touched.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::cache::{normalize_symbol, CacheKey};
use crate::error::ToolError;
use crate::models::ToolArgs;
use crate::tools::kind::{
    FinancialType, HolderType, InvalidChoice, OptionType, RecommendationType, ToolKind,
};

const PERIODS: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];
const INTERVALS: &[&str] = &[
    "1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo",
];

pub const DEFAULT_PERIOD: &str = "1mo";
pub const DEFAULT_INTERVAL: &str = "1d";
pub const DEFAULT_MONTHS_BACK: u32 = 12;

// == Tool Query ==
/// Tool-specific arguments that identify the upstream query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolQuery {
    HistoricalStockPrices { period: String, interval: String },
    StockInfo,
    YahooFinanceNews,
    StockActions,
    FinancialStatement { financial_type: FinancialType },
    HolderInfo { holder_type: HolderType },
    OptionExpirationDates,
    OptionChain {
        expiration_date: NaiveDate,
        option_type: OptionType,
    },
    Recommendations {
        recommendation_type: RecommendationType,
        months_back: u32,
    },
}

impl ToolQuery {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolQuery::HistoricalStockPrices { .. } => ToolKind::HistoricalStockPrices,
            ToolQuery::StockInfo => ToolKind::StockInfo,
            ToolQuery::YahooFinanceNews => ToolKind::YahooFinanceNews,
            ToolQuery::StockActions => ToolKind::StockActions,
            ToolQuery::FinancialStatement { .. } => ToolKind::FinancialStatement,
            ToolQuery::HolderInfo { .. } => ToolKind::HolderInfo,
            ToolQuery::OptionExpirationDates => ToolKind::OptionExpirationDates,
            ToolQuery::OptionChain { .. } => ToolKind::OptionChain,
            ToolQuery::Recommendations { .. } => ToolKind::Recommendations,
        }
    }

    /// Arguments beyond the ticker, in display order.
    fn arguments(&self) -> Vec<(&'static str, String)> {
        match self {
            ToolQuery::HistoricalStockPrices { period, interval } => {
                vec![("period", period.clone()), ("interval", interval.clone())]
            }
            ToolQuery::FinancialStatement { financial_type } => {
                vec![("financial_type", financial_type.to_string())]
            }
            ToolQuery::HolderInfo { holder_type } => {
                vec![("holder_type", holder_type.to_string())]
            }
            ToolQuery::OptionChain {
                expiration_date,
                option_type,
            } => vec![
                ("expiration_date", expiration_date.format("%Y-%m-%d").to_string()),
                ("option_type", option_type.to_string()),
            ],
            ToolQuery::Recommendations {
                recommendation_type,
                months_back,
            } => vec![
                ("recommendation_type", recommendation_type.to_string()),
                ("months_back", months_back.to_string()),
            ],
            ToolQuery::StockInfo
            | ToolQuery::YahooFinanceNews
            | ToolQuery::StockActions
            | ToolQuery::OptionExpirationDates => Vec::new(),
        }
    }
}

// == Tool Request ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    /// Normalized ticker symbol
    pub ticker: String,
    pub query: ToolQuery,
    /// Projection applied to the cached result; never part of the key
    pub fields: Option<Vec<String>>,
    /// 1-based page number, bounds-checked against the result when paging
    pub page: i64,
    pub export_path: Option<PathBuf>,
}

impl ToolRequest {
    /// Validates `args` for `kind`.
    pub fn parse(kind: ToolKind, args: &ToolArgs) -> Result<Self, ToolError> {
        let ticker = parse_ticker(args.ticker.as_deref())?;

        let query = match kind {
            ToolKind::HistoricalStockPrices => ToolQuery::HistoricalStockPrices {
                period: parse_listed(args.period.as_deref(), "period", PERIODS, DEFAULT_PERIOD)?,
                interval: parse_listed(
                    args.interval.as_deref(),
                    "interval",
                    INTERVALS,
                    DEFAULT_INTERVAL,
                )?,
            },
            ToolKind::StockInfo => ToolQuery::StockInfo,
            ToolKind::YahooFinanceNews => ToolQuery::YahooFinanceNews,
            ToolKind::StockActions => ToolQuery::StockActions,
            ToolKind::FinancialStatement => ToolQuery::FinancialStatement {
                financial_type: parse_choice(args.financial_type.as_deref(), "financial_type")?,
            },
            ToolKind::HolderInfo => ToolQuery::HolderInfo {
                holder_type: parse_choice(args.holder_type.as_deref(), "holder_type")?,
            },
            ToolKind::OptionExpirationDates => ToolQuery::OptionExpirationDates,
            ToolKind::OptionChain => ToolQuery::OptionChain {
                expiration_date: parse_date(args.expiration_date.as_deref())?,
                option_type: parse_choice(args.option_type.as_deref(), "option_type")?,
            },
            ToolKind::Recommendations => ToolQuery::Recommendations {
                recommendation_type: parse_choice(
                    args.recommendation_type.as_deref(),
                    "recommendation_type",
                )?,
                months_back: parse_months_back(args.months_back)?,
            },
        };

        Ok(Self {
            ticker,
            query,
            fields: parse_fields(args.fields.as_deref()),
            page: args.page.unwrap_or(1),
            export_path: args
                .export_path
                .as_deref()
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn kind(&self) -> ToolKind {
        self.query.kind()
    }

    /// Identity of the full upstream result. Page, projection and export
    /// destination are views over it and stay out of the key.
    pub fn cache_key(&self) -> CacheKey {
        self.query
            .arguments()
            .into_iter()
            .fold(
                CacheKey::builder(self.kind().name()).symbol("ticker", &self.ticker),
                |builder, (name, value)| builder.arg(name, value),
            )
            .build()
    }

    /// Query parameters shown under the response title.
    pub fn parameters(&self) -> Vec<(String, String)> {
        let mut parameters = vec![("ticker".to_string(), self.ticker.clone())];
        parameters.extend(
            self.query
                .arguments()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value)),
        );
        if let Some(fields) = &self.fields {
            parameters.push(("fields".to_string(), fields.join(",")));
        }
        parameters
    }

    pub fn title(&self) -> String {
        let ticker = &self.ticker;
        let mut title = match &self.query {
            ToolQuery::HistoricalStockPrices { period, interval } => {
                format!("HISTORICAL STOCK PRICES - {} ({}, {})", ticker, period, interval)
            }
            ToolQuery::StockInfo => format!("STOCK INFORMATION - {}", ticker),
            ToolQuery::YahooFinanceNews => format!("YAHOO FINANCE NEWS - {}", ticker),
            ToolQuery::StockActions => format!("STOCK ACTIONS - {}", ticker),
            ToolQuery::FinancialStatement { financial_type } => {
                format!("FINANCIAL STATEMENT - {} ({})", ticker, financial_type)
            }
            ToolQuery::HolderInfo { holder_type } => {
                format!("{} - {}", heading(holder_type.as_str()), ticker)
            }
            ToolQuery::OptionExpirationDates => {
                format!("OPTION EXPIRATION DATES - {}", ticker)
            }
            ToolQuery::OptionChain {
                expiration_date,
                option_type,
            } => format!(
                "OPTION CHAIN - {} {} (Exp: {})",
                ticker,
                heading(option_type.as_str()),
                expiration_date.format("%Y-%m-%d")
            ),
            ToolQuery::Recommendations {
                recommendation_type,
                months_back,
            } => {
                let mut text = format!("{} - {}", heading(recommendation_type.as_str()), ticker);
                if *recommendation_type == RecommendationType::UpgradesDowngrades {
                    text.push_str(&format!(" (Last {} months)", months_back));
                }
                text
            }
        };
        if let Some(fields) = &self.fields {
            title.push_str(&format!(" (Filtered: {} fields)", fields.len()));
        }
        title
    }
}

// == Argument Parsing ==

fn parse_ticker(value: Option<&str>) -> Result<String, ToolError> {
    let ticker = normalize_symbol(value.unwrap_or_default());
    if ticker.is_empty() {
        return Err(ToolError::InvalidRequest(
            "ticker must not be empty".to_string(),
        ));
    }
    let valid = ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if !valid {
        return Err(ToolError::InvalidRequest(format!(
            "ticker '{}' contains invalid characters",
            ticker
        )));
    }
    Ok(ticker)
}

fn parse_choice<T>(value: Option<&str>, argument: &str) -> Result<T, ToolError>
where
    T: FromStr<Err = InvalidChoice>,
{
    match value.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => Ok(text.parse::<T>()?),
        None => Err(ToolError::InvalidRequest(format!("{} is required", argument))),
    }
}

fn parse_listed(
    value: Option<&str>,
    argument: &str,
    valid: &[&str],
    default: &str,
) -> Result<String, ToolError> {
    let text = value
        .map(|text| text.trim().to_ascii_lowercase())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| default.to_string());

    if valid.contains(&text.as_str()) {
        Ok(text)
    } else {
        Err(ToolError::InvalidRequest(format!(
            "invalid {} '{}': use one of {}",
            argument,
            text,
            valid.join(", ")
        )))
    }
}

fn parse_date(value: Option<&str>) -> Result<NaiveDate, ToolError> {
    let text = value.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ToolError::InvalidRequest(
            "expiration_date is required".to_string(),
        ));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
        ToolError::InvalidRequest(format!(
            "expiration_date '{}' must be formatted YYYY-MM-DD",
            text
        ))
    })
}

fn parse_months_back(value: Option<i64>) -> Result<u32, ToolError> {
    match value {
        None => Ok(DEFAULT_MONTHS_BACK),
        Some(months) if months >= 1 => u32::try_from(months).map_err(|_| {
            ToolError::InvalidRequest(format!("months_back {} is too large", months))
        }),
        Some(months) => Err(ToolError::InvalidRequest(format!(
            "months_back must be at least 1, got {}",
            months
        ))),
    }
}

/// Trimmed, de-duplicated field names; an empty selection means no projection.
fn parse_fields(value: Option<&[String]>) -> Option<Vec<String>> {
    let mut fields: Vec<String> = Vec::new();
    for name in value.unwrap_or_default() {
        let name = name.trim();
        if !name.is_empty() && !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }
    (!fields.is_empty()).then_some(fields)
}

/// `insider_roster_holders` -> `INSIDER ROSTER HOLDERS`
fn heading(name: &str) -> String {
    name.replace('_', " ").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(ticker: &str) -> ToolArgs {
        ToolArgs::for_ticker(ticker)
    }

    #[test]
    fn test_historical_defaults() {
        let request = ToolRequest::parse(ToolKind::HistoricalStockPrices, &args(" aapl ")).unwrap();

        assert_eq!(request.ticker, "AAPL");
        assert_eq!(request.page, 1);
        assert_eq!(
            request.query,
            ToolQuery::HistoricalStockPrices {
                period: "1mo".to_string(),
                interval: "1d".to_string()
            }
        );
        assert_eq!(
            request.cache_key().as_str(),
            "get_historical_stock_prices?interval=1d&period=1mo&ticker=AAPL"
        );
    }

    #[test]
    fn test_page_and_projection_stay_out_of_key() {
        let plain = ToolRequest::parse(ToolKind::StockInfo, &args("msft")).unwrap();
        let paged = ToolRequest::parse(
            ToolKind::StockInfo,
            &ToolArgs {
                page: Some(4),
                fields: Some(vec!["beta".to_string()]),
                export_path: Some("/tmp/out.json".to_string()),
                ..args("MSFT")
            },
        )
        .unwrap();

        assert_eq!(plain.cache_key(), paged.cache_key());
        assert_eq!(paged.page, 4);
    }

    #[test]
    fn test_case_variants_share_a_key() {
        let lower = ToolRequest::parse(
            ToolKind::FinancialStatement,
            &ToolArgs {
                financial_type: Some("cashflow".to_string()),
                ..args("aapl")
            },
        )
        .unwrap();
        let upper = ToolRequest::parse(
            ToolKind::FinancialStatement,
            &ToolArgs {
                financial_type: Some("CASHFLOW".to_string()),
                ..args("AAPL")
            },
        )
        .unwrap();

        assert_eq!(lower.cache_key(), upper.cache_key());
    }

    #[test]
    fn test_empty_ticker_rejected() {
        let err = ToolRequest::parse(ToolKind::StockInfo, &args("   ")).unwrap_err();
        assert_eq!(err.to_string(), "invalid request: ticker must not be empty");

        let err = ToolRequest::parse(ToolKind::StockInfo, &ToolArgs::default()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidRequest(_)));
    }

    #[test]
    fn test_ticker_with_separator_rejected() {
        let err = ToolRequest::parse(ToolKind::StockInfo, &args("AAPL&x=1")).unwrap_err();
        assert!(matches!(err, ToolError::InvalidRequest(_)));
        assert!(ToolRequest::parse(ToolKind::StockInfo, &args("brk-b")).is_ok());
        assert!(ToolRequest::parse(ToolKind::StockInfo, &args("^gspc")).is_ok());
    }

    #[test]
    fn test_page_below_one_deferred_to_paging() {
        for page in [0, -3] {
            let request = ToolRequest::parse(
                ToolKind::YahooFinanceNews,
                &ToolArgs {
                    page: Some(page),
                    ..args("AAPL")
                },
            )
            .unwrap();
            assert_eq!(request.page, page);
        }
    }

    #[test]
    fn test_unknown_holder_type_lists_choices() {
        let err = ToolRequest::parse(
            ToolKind::HolderInfo,
            &ToolArgs {
                holder_type: Some("retail".to_string()),
                ..args("AAPL")
            },
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("'retail'"));
        assert!(message.contains("insider_roster_holders"));
    }

    #[test]
    fn test_missing_required_choice() {
        let err = ToolRequest::parse(ToolKind::FinancialStatement, &args("AAPL")).unwrap_err();
        assert_eq!(err.to_string(), "invalid request: financial_type is required");
    }

    #[test]
    fn test_invalid_period_rejected() {
        let err = ToolRequest::parse(
            ToolKind::HistoricalStockPrices,
            &ToolArgs {
                period: Some("7w".to_string()),
                ..args("AAPL")
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("ytd"));
    }

    #[test]
    fn test_option_chain_date_validation() {
        let ok = ToolRequest::parse(
            ToolKind::OptionChain,
            &ToolArgs {
                expiration_date: Some("2024-06-21".to_string()),
                option_type: Some("Calls".to_string()),
                ..args("aapl")
            },
        )
        .unwrap();
        assert_eq!(
            ok.cache_key().as_str(),
            "get_option_chain?expiration_date=2024-06-21&option_type=calls&ticker=AAPL"
        );
        assert_eq!(ok.title(), "OPTION CHAIN - AAPL CALLS (Exp: 2024-06-21)");

        let err = ToolRequest::parse(
            ToolKind::OptionChain,
            &ToolArgs {
                expiration_date: Some("06/21/2024".to_string()),
                option_type: Some("calls".to_string()),
                ..args("aapl")
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_recommendations_months_back() {
        let request = ToolRequest::parse(
            ToolKind::Recommendations,
            &ToolArgs {
                recommendation_type: Some("upgrades_downgrades".to_string()),
                ..args("tsla")
            },
        )
        .unwrap();
        assert_eq!(
            request.title(),
            "UPGRADES DOWNGRADES - TSLA (Last 12 months)"
        );

        let err = ToolRequest::parse(
            ToolKind::Recommendations,
            &ToolArgs {
                recommendation_type: Some("recommendations".to_string()),
                months_back: Some(0),
                ..args("tsla")
            },
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidRequest(_)));
    }

    #[test]
    fn test_fields_trimmed_and_deduplicated() {
        let request = ToolRequest::parse(
            ToolKind::StockInfo,
            &ToolArgs {
                fields: Some(vec![
                    " beta ".to_string(),
                    "beta".to_string(),
                    "".to_string(),
                    "marketCap".to_string(),
                ]),
                ..args("AAPL")
            },
        )
        .unwrap();

        assert_eq!(
            request.fields,
            Some(vec!["beta".to_string(), "marketCap".to_string()])
        );
        assert_eq!(request.title(), "STOCK INFORMATION - AAPL (Filtered: 2 fields)");
    }

    #[test]
    fn test_empty_field_list_means_no_projection() {
        let request = ToolRequest::parse(
            ToolKind::StockInfo,
            &ToolArgs {
                fields: Some(Vec::new()),
                ..args("AAPL")
            },
        )
        .unwrap();
        assert_eq!(request.fields, None);
    }

    #[test]
    fn test_parameters_follow_key_arguments() {
        let request = ToolRequest::parse(
            ToolKind::HolderInfo,
            &ToolArgs {
                holder_type: Some("institutional_holders".to_string()),
                ..args("aapl")
            },
        )
        .unwrap();

        assert_eq!(
            request.parameters(),
            vec![
                ("ticker".to_string(), "AAPL".to_string()),
                ("holder_type".to_string(), "institutional_holders".to_string()),
            ]
        );
        assert_eq!(request.title(), "INSTITUTIONAL HOLDERS - AAPL");
    }

    #[test]
    fn test_blank_export_path_ignored() {
        let request = ToolRequest::parse(
            ToolKind::StockActions,
            &ToolArgs {
                export_path: Some("  ".to_string()),
                ..args("AAPL")
            },
        )
        .unwrap();
        assert_eq!(request.export_path, None);
    }
}
