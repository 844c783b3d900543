//! Pure validation and parsing rules for book fields. Nothing in here touches
//! the database or the filesystem; the store and the CSV importer both funnel
//! every field through these functions so the persisted-records invariant is
//! enforced in exactly one place.

use chrono::{Datelike, Local};

use crate::error::{BookField, ValidationError};

/// No book predates the printing press era.
pub const MIN_YEAR: i32 = 1400;
/// Upper bound for free-text fields (title, author).
pub const MAX_TEXT_LEN: usize = 200;
pub const MIN_PRICE: f64 = 0.0;
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Latest acceptable publication year: next year, read from the system clock
/// at call time so the rule stays correct without redeploys.
pub fn max_year() -> i32 {
    Local::now().year() + 1
}

/// Validate a free-text field (title or author): trimmed, non-empty, bounded
/// length, and containing at least one letter or digit so strings made of
/// punctuation alone are rejected. Returns the trimmed text.
pub fn validate_text(field: BookField, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Blank(field));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong(field));
    }
    if !trimmed.chars().any(|c| c.is_alphanumeric()) {
        return Err(ValidationError::NoContent(field));
    }

    Ok(trimmed.to_string())
}

/// Validate a publication year against `[MIN_YEAR, current_year + 1]`. Both
/// boundaries are accepted.
pub fn validate_year(year: i32) -> Result<i32, ValidationError> {
    let max = max_year();
    if year < MIN_YEAR || year > max {
        return Err(ValidationError::YearOutOfRange {
            value: year,
            min: MIN_YEAR,
            max,
        });
    }
    Ok(year)
}

/// Validate a price against `[0, 1_000_000]`. Accepted values are rounded to
/// two decimals, which is the precision the store and the CSV export use.
pub fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price < MIN_PRICE || price > MAX_PRICE {
        return Err(ValidationError::PriceOutOfRange { value: price });
    }
    Ok((price * 100.0).round() / 100.0)
}

/// Parse a year out of raw text (CSV cell or prompt input), then range-check
/// it. Unparsable input becomes a field-tagged error rather than a panic or a
/// fatal abort.
pub fn parse_year(raw: &str) -> Result<i32, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(BookField::Year));
    }
    let year = trimmed
        .parse::<i32>()
        .map_err(|_| ValidationError::NotANumber {
            field: BookField::Year,
            raw: trimmed.to_string(),
        })?;
    validate_year(year)
}

/// Parse a price out of raw text, accepting the decimal-comma form (`39,90`)
/// common in exported spreadsheets, then range-check it.
pub fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(BookField::Price));
    }

    // "12,34" means 12.34 here; only rewrite when no dot competes with it.
    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };

    let price = normalized
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber {
            field: BookField::Price,
            raw: trimmed.to_string(),
        })?;
    validate_price(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_and_non_empty() {
        assert_eq!(
            validate_text(BookField::Title, "  Dom Casmurro  ").unwrap(),
            "Dom Casmurro"
        );
        assert_eq!(
            validate_text(BookField::Title, "   "),
            Err(ValidationError::Blank(BookField::Title))
        );
        assert_eq!(
            validate_text(BookField::Author, ""),
            Err(ValidationError::Blank(BookField::Author))
        );
    }

    #[test]
    fn text_rejects_punctuation_only_and_overlong_values() {
        assert_eq!(
            validate_text(BookField::Title, "?!--"),
            Err(ValidationError::NoContent(BookField::Title))
        );
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        assert_eq!(
            validate_text(BookField::Author, &long),
            Err(ValidationError::TooLong(BookField::Author))
        );
        // Accented text counts as readable content.
        assert!(validate_text(BookField::Author, "Machado de Assis").is_ok());
        assert!(validate_text(BookField::Title, "Memórias Póstumas").is_ok());
    }

    #[test]
    fn year_boundaries_are_inclusive() {
        assert_eq!(validate_year(MIN_YEAR).unwrap(), MIN_YEAR);
        assert_eq!(validate_year(max_year()).unwrap(), max_year());
        assert!(validate_year(MIN_YEAR - 1).is_err());
        assert!(validate_year(max_year() + 1).is_err());
    }

    #[test]
    fn price_boundaries_are_inclusive() {
        assert_eq!(validate_price(0.0).unwrap(), 0.0);
        assert_eq!(validate_price(MAX_PRICE).unwrap(), MAX_PRICE);
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(MAX_PRICE + 0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
    }

    #[test]
    fn price_is_rounded_to_two_decimals() {
        assert_eq!(validate_price(39.899).unwrap(), 39.9);
        assert_eq!(validate_price(10.004).unwrap(), 10.0);
    }

    #[test]
    fn parse_year_tags_bad_input_with_the_field() {
        assert_eq!(parse_year(" 1999 ").unwrap(), 1999);
        assert_eq!(
            parse_year("abc"),
            Err(ValidationError::NotANumber {
                field: BookField::Year,
                raw: "abc".to_string(),
            })
        );
        assert_eq!(parse_year(""), Err(ValidationError::Blank(BookField::Year)));
        assert!(matches!(
            parse_year("1200"),
            Err(ValidationError::YearOutOfRange { value: 1200, .. })
        ));
    }

    #[test]
    fn parse_price_accepts_decimal_comma() {
        assert_eq!(parse_price("39,90").unwrap(), 39.9);
        assert_eq!(parse_price("39.90").unwrap(), 39.9);
        assert_eq!(parse_price(" 120 ").unwrap(), 120.0);
        assert!(matches!(
            parse_price("r$10"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_price("-5"),
            Err(ValidationError::PriceOutOfRange { .. })
        ));
    }
}
