use crate::utils::error::{Result, StonewalkerError};
use url::Url;

/// 對話輸入上限 (字元數)
pub const MAX_QUERY_CHARS: usize = 1000;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(StonewalkerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(StonewalkerError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(StonewalkerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StonewalkerError::InvalidConfigValueError {
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
        return Err(StonewalkerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 檢查使用者輸入；回傳去頭尾空白後的內容，空字串回傳 None
pub fn validate_query(raw: &str) -> Result<Option<&str>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let chars = trimmed.chars().count();
    if chars > MAX_QUERY_CHARS {
        return Err(StonewalkerError::InvalidInputError {
            message: format!(
                "Query is {} characters long; the limit is {}",
                chars, MAX_QUERY_CHARS
            ),
        });
    }

    Ok(Some(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.base_url", "https://example.com").is_ok());
        assert!(validate_url("api.base_url", "http://localhost:8000").is_ok());
        assert!(validate_url("api.base_url", "").is_err());
        assert!(validate_url("api.base_url", "invalid-url").is_err());
        assert!(validate_url("api.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("map.zoom", 10u8, 1, 21).is_ok());
        assert!(validate_range("map.zoom", 0u8, 1, 21).is_err());
        assert!(validate_range("map.center.lat", 91.0, -90.0, 90.0).is_err());
    }

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query("  ruins near me \n").unwrap(), Some("ruins near me"));
        assert_eq!(validate_query("   ").unwrap(), None);

        let exact = "a".repeat(MAX_QUERY_CHARS);
        assert!(validate_query(&exact).unwrap().is_some());

        let too_long = "a".repeat(MAX_QUERY_CHARS + 1);
        assert!(matches!(
            validate_query(&too_long),
            Err(StonewalkerError::InvalidInputError { .. })
        ));
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("map.api_key", "abc").is_ok());
        assert!(validate_non_empty_string("map.api_key", "  ").is_err());
    }
}
