use crate::utils::error::{CupError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CupError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| CupError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CupError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 時段必須嚴格遞增，排程器不會自行排序或補齊
pub fn validate_strictly_ascending<T: PartialOrd + std::fmt::Display>(
    field_name: &str,
    values: &[T],
) -> Result<()> {
    for pair in values.windows(2) {
        if pair[0] >= pair[1] {
            return Err(CupError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: pair[1].to_string(),
                reason: format!("Values must be strictly ascending (follows {})", pair[0]),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source.base_url", "https://fantasy.premierleague.com/api").is_ok());
        assert!(validate_url("source.base_url", "http://localhost:8080").is_ok());
        assert!(validate_url("source.base_url", "").is_err());
        assert!(validate_url("source.base_url", "invalid-url").is_err());
        assert!(validate_url("source.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("tournament.group_count", 2, 2, 8).is_ok());
        assert!(validate_range("tournament.group_count", 8, 2, 8).is_ok());
        assert!(validate_range("tournament.group_count", 1, 2, 8).is_err());
        assert!(validate_range("tournament.group_count", 9, 2, 8).is_err());
    }

    #[test]
    fn test_validate_strictly_ascending() {
        assert!(validate_strictly_ascending("tournament.gameweeks", &[1, 2, 5]).is_ok());
        assert!(validate_strictly_ascending::<u32>("tournament.gameweeks", &[]).is_ok());
        assert!(validate_strictly_ascending("tournament.gameweeks", &[1, 1]).is_err());
        assert!(validate_strictly_ascending("tournament.gameweeks", &[3, 2]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(857u64);
        let missing: Option<u64> = None;
        assert_eq!(*validate_required_field("source.league_id", &present).unwrap(), 857);
        assert!(matches!(
            validate_required_field("source.league_id", &missing),
            Err(CupError::MissingConfigError { .. })
        ));
    }
}
