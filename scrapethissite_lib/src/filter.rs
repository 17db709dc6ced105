//! Win-percentage comparison filter.

use std::fmt;
use std::str::FromStr;

use crate::error::ScrapeError;

const EPSILON: f64 = 1e-9;

/// Comparison operator applied to a row's win percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl Comparison {
    /// The operator's symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }

    /// Evaluates `lhs <op> rhs`; equality tolerates float rounding.
    pub fn compare(&self, lhs: f64, rhs: f64) -> bool {
        let equal = (lhs - rhs).abs() < EPSILON;
        match self {
            Self::Lt => lhs < rhs && !equal,
            Self::Le => lhs < rhs || equal,
            Self::Eq => equal,
            Self::Ge => lhs > rhs || equal,
            Self::Gt => lhs > rhs && !equal,
        }
    }
}

impl FromStr for Comparison {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "<" | "lt" => Ok(Self::Lt),
            "<=" | "le" => Ok(Self::Le),
            "=" | "==" | "eq" => Ok(Self::Eq),
            ">=" | "ge" => Ok(Self::Ge),
            ">" | "gt" => Ok(Self::Gt),
            _ => Err(ScrapeError::InvalidInput(format!(
                "unknown comparison operator '{}'. Valid values: <, <=, =, >=, > (or lt, le, eq, ge, gt)",
                s
            ))),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Keeps rows whose win percentage compares against a threshold.
///
/// The threshold is a percentage: `40.0` keeps rows compared against `0.40`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WinPercentageFilter {
    pub comparison: Comparison,
    pub threshold_percent: f64,
}

impl WinPercentageFilter {
    pub fn new(comparison: Comparison, threshold_percent: f64) -> Self {
        Self {
            comparison,
            threshold_percent,
        }
    }

    /// The threshold as a fraction, the unit the page displays.
    pub fn threshold_fraction(&self) -> f64 {
        self.threshold_percent / 100.0
    }

    /// Whether a win fraction (e.g. `0.388`) passes the filter.
    pub fn matches(&self, fraction: f64) -> bool {
        self.comparison.compare(fraction, self.threshold_fraction())
    }
}

impl fmt::Display for WinPercentageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}%", self.comparison, self.threshold_percent)
    }
}

/// Parses a win percentage cell such as `0.388` or `.5`.
pub fn parse_fraction(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbols_and_words() {
        assert_eq!("<".parse::<Comparison>().unwrap(), Comparison::Lt);
        assert_eq!("<=".parse::<Comparison>().unwrap(), Comparison::Le);
        assert_eq!("=".parse::<Comparison>().unwrap(), Comparison::Eq);
        assert_eq!(" >= ".parse::<Comparison>().unwrap(), Comparison::Ge);
        assert_eq!("GT".parse::<Comparison>().unwrap(), Comparison::Gt);
        assert!("=>".parse::<Comparison>().is_err());
        assert!("".parse::<Comparison>().is_err());
    }

    #[test]
    fn symbol_round_trips() {
        for op in [
            Comparison::Lt,
            Comparison::Le,
            Comparison::Eq,
            Comparison::Ge,
            Comparison::Gt,
        ] {
            assert_eq!(op.to_string().parse::<Comparison>().unwrap(), op);
        }
    }

    #[test]
    fn threshold_is_a_percentage() {
        let filter = WinPercentageFilter::new(Comparison::Lt, 40.0);
        assert!(filter.matches(0.10));
        assert!(filter.matches(0.399));
        assert!(!filter.matches(0.40));
        assert!(!filter.matches(0.50));
    }

    #[test]
    fn boundary_behaviour_per_operator() {
        let at = |op| WinPercentageFilter::new(op, 40.0).matches(0.4);
        assert!(!at(Comparison::Lt));
        assert!(at(Comparison::Le));
        assert!(at(Comparison::Eq));
        assert!(at(Comparison::Ge));
        assert!(!at(Comparison::Gt));
    }

    #[test]
    fn equality_survives_float_division() {
        let filter = WinPercentageFilter::new(Comparison::Eq, 30.0);
        assert!(filter.matches(0.1 + 0.2));
    }

    #[test]
    fn display_matches_log_format() {
        let filter = WinPercentageFilter::new(Comparison::Lt, 40.0);
        assert_eq!(filter.to_string(), "< 40.00%");
    }

    #[test]
    fn parse_fraction_accepts_page_formats() {
        assert_eq!(parse_fraction("0.388"), Some(0.388));
        assert_eq!(parse_fraction(" .5 "), Some(0.5));
        assert_eq!(parse_fraction("1"), Some(1.0));
        assert_eq!(parse_fraction(""), None);
        assert_eq!(parse_fraction("n/a"), None);
        assert_eq!(parse_fraction("NaN"), None);
    }
}
