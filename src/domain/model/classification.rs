//! Classification fields of a model record

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four option categories served by `GET /api/models/enums`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionCategory {
    BusinessLines,
    ModelTypes,
    RiskRatings,
    Statuses,
}

impl fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusinessLines => write!(f, "business line"),
            Self::ModelTypes => write!(f, "model type"),
            Self::RiskRatings => write!(f, "risk rating"),
            Self::Statuses => write!(f, "status"),
        }
    }
}

/// The registry owns each option set, so a code this build does not know is
/// kept as `Other` rather than rejected.
macro_rules! classification {
    (
        $(#[$meta:meta])*
        $name:ident in $category:ident {
            $($variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            /// Every value this build knows, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const CATEGORY: OptionCategory = OptionCategory::$category;

            /// Wire code, e.g. `RETAIL_BANKING`
            pub fn code(&self) -> &str {
                match self {
                    $($name::$variant => $code,)+
                    $name::Other(code) => code.as_str(),
                }
            }

            /// Default human-readable label; unknown codes show as themselves
            pub fn display_name(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other(code) => code.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl From<String> for $name {
            fn from(code: String) -> Self {
                match code.as_str() {
                    $($code => $name::$variant,)+
                    _ => $name::Other(code),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(code) => code,
                    known => known.code().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        /// Lenient about case and separators for known codes; anything else
        /// is carried through trimmed.
        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().replace([' ', '-'], "_").to_ascii_uppercase();

                Ok(match normalized.as_str() {
                    $($code => $name::$variant,)+
                    _ => $name::Other(s.trim().to_string()),
                })
            }
        }
    };
}

classification! {
    /// Line of business that owns the model
    BusinessLine in BusinessLines {
        RetailBanking => ("RETAIL_BANKING", "Retail Banking"),
        WholesaleLending => ("WHOLESALE_LENDING", "Wholesale Lending"),
        InvestmentBanking => ("INVESTMENT_BANKING", "Investment Banking"),
        RiskManagement => ("RISK_MANAGEMENT", "Risk Management"),
    }
}

classification! {
    /// Kind of risk or valuation the model addresses
    ModelType in ModelTypes {
        CreditRisk => ("CREDIT_RISK", "Credit Risk"),
        MarketRisk => ("MARKET_RISK", "Market Risk"),
        OperationalRisk => ("OPERATIONAL_RISK", "Operational Risk"),
        Aml => ("AML", "AML"),
        CapitalCalculation => ("CAPITAL_CALCULATION", "Capital Calculation"),
        Valuation => ("VALUATION", "Valuation"),
    }
}

classification! {
    RiskRating in RiskRatings {
        High => ("HIGH", "High"),
        Medium => ("MEDIUM", "Medium"),
        Low => ("LOW", "Low"),
    }
}

classification! {
    /// Lifecycle stage of the model
    Status in Statuses {
        InDevelopment => ("IN_DEVELOPMENT", "In Development"),
        Validated => ("VALIDATED", "Validated"),
        Production => ("PRODUCTION", "Production"),
        Retired => ("RETIRED", "Retired"),
    }
}
