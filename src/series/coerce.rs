//! Text → typed value coercion.

use chrono::NaiveDate;

use crate::domain::CoercionPolicy;
use crate::error::ParseError;

/// Marker the source file uses for "no observation" (non-trading days).
pub const SENTINEL: &str = "-";

/// The only accepted date format. Dates decide ordering, so no guessing.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a numeric cell produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    Sentinel,
    Empty,
    /// Non-numeric text, only under the lenient policy.
    Unparseable,
    /// Parses as a float but is `NaN` or infinite. A rolling mean over it
    /// would be undefined, so it is absent under either policy.
    NonFinite,
}

impl Absence {
    pub fn describe(self) -> &'static str {
        match self {
            Absence::Sentinel => "sentinel '-'",
            Absence::Empty => "empty cell",
            Absence::Unparseable => "not a number",
            Absence::NonFinite => "non-finite number",
        }
    }
}

/// Outcome of coercing one numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    Value(f64),
    Absent(Absence),
}

impl Coerced {
    pub fn value(self) -> Option<f64> {
        match self {
            Coerced::Value(v) => Some(v),
            Coerced::Absent(_) => None,
        }
    }
}

/// Parse a `YYYY-MM-DD` date cell.
pub fn parse_date(raw: &str, line: usize) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| ParseError::Date {
        line,
        value: raw.to_string(),
    })
}

/// Coerce a numeric cell under `policy`.
///
/// `column` and `line` only feed the error message.
pub fn coerce_value(
    raw: &str,
    policy: CoercionPolicy,
    column: &str,
    line: usize,
) -> Result<Coerced, ParseError> {
    let s = raw.trim();
    if s == SENTINEL {
        return Ok(Coerced::Absent(Absence::Sentinel));
    }
    if s.is_empty() {
        return Ok(Coerced::Absent(Absence::Empty));
    }

    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Coerced::Value(v)),
        Ok(_) => {
            log::debug!("line {line}: treating non-finite '{s}' in `{column}` as missing");
            Ok(Coerced::Absent(Absence::NonFinite))
        }
        Err(_) => match policy {
            CoercionPolicy::Lenient => {
                log::debug!("line {line}: treating '{s}' in `{column}` as missing");
                Ok(Coerced::Absent(Absence::Unparseable))
            }
            CoercionPolicy::Strict => Err(ParseError::Value {
                line,
                column: column.to_string(),
                value: raw.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient(raw: &str) -> Coerced {
        coerce_value(raw, CoercionPolicy::Lenient, "us_dollar", 2).unwrap()
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_date("1999-01-04", 2).unwrap(),
            NaiveDate::from_ymd_opt(1999, 1, 4).unwrap()
        );
        assert_eq!(
            parse_date(" 2020-12-31 ", 2).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()
        );

        let err = parse_date("04/01/1999", 9).unwrap_err();
        assert_eq!(
            err,
            ParseError::Date {
                line: 9,
                value: "04/01/1999".to_string()
            }
        );
        assert!(parse_date("1999-02-30", 2).is_err());
    }

    #[test]
    fn sentinel_and_empty_are_absent() {
        assert_eq!(lenient("-"), Coerced::Absent(Absence::Sentinel));
        assert_eq!(lenient(" - "), Coerced::Absent(Absence::Sentinel));
        assert_eq!(lenient(""), Coerced::Absent(Absence::Empty));
    }

    #[test]
    fn valid_numbers_are_kept_exactly() {
        assert_eq!(lenient("1.1789"), Coerced::Value(1.1789));
        assert_eq!(lenient("130.96"), Coerced::Value(130.96));
        assert_eq!(lenient("7"), Coerced::Value(7.0));
    }

    #[test]
    fn lenient_policy_drops_garbage() {
        assert_eq!(lenient("n/a"), Coerced::Absent(Absence::Unparseable));
    }

    #[test]
    fn non_finite_numbers_are_absent_under_both_policies() {
        assert_eq!(lenient("NaN"), Coerced::Absent(Absence::NonFinite));
        assert_eq!(lenient("inf"), Coerced::Absent(Absence::NonFinite));
        assert_eq!(
            coerce_value("-inf", CoercionPolicy::Strict, "us_dollar", 4).unwrap(),
            Coerced::Absent(Absence::NonFinite)
        );
        assert_eq!(Absence::NonFinite.describe(), "non-finite number");
    }

    #[test]
    fn strict_policy_rejects_garbage_but_not_sentinel() {
        assert_eq!(
            coerce_value("-", CoercionPolicy::Strict, "us_dollar", 3).unwrap(),
            Coerced::Absent(Absence::Sentinel)
        );

        let err = coerce_value("abc", CoercionPolicy::Strict, "us_dollar", 3).unwrap_err();
        assert_eq!(
            err,
            ParseError::Value {
                line: 3,
                column: "us_dollar".to_string(),
                value: "abc".to_string()
            }
        );
    }
}
