use crate::error::AppError;
use chrono::NaiveDate;
use std::path::Path;

/// Parses a `YYYY-MM-DD` season start date
pub fn parse_start_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        AppError::datetime_parse_error(format!("invalid date '{value}', expected YYYY-MM-DD: {e}"))
    })
}

/// Validates the configuration settings
///
/// # Validation Rules
/// - Default legs must be 1 or 2
/// - Default start date must parse as YYYY-MM-DD
/// - If the data file path is provided, it cannot be empty
/// - If the log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
pub fn validate_config(
    default_legs: u8,
    default_start_date: &str,
    data_file_path: &Option<String>,
    log_file_path: &Option<String>,
) -> Result<(), AppError> {
    if !(1..=2).contains(&default_legs) {
        return Err(AppError::config_error(format!(
            "default_legs must be 1 or 2, got {default_legs}"
        )));
    }

    parse_start_date(default_start_date)
        .map_err(|e| AppError::config_error(format!("default_start_date: {e}")))?;

    if let Some(data_path) = data_file_path
        && data_path.trim().is_empty()
    {
        return Err(AppError::config_error("Data file path cannot be empty"));
    }

    if let Some(log_path) = log_file_path {
        if log_path.trim().is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start_date() {
        assert_eq!(
            parse_start_date("2024-08-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
        );
        assert!(matches!(
            parse_start_date("01/08/2024").unwrap_err(),
            AppError::DateTimeParse(_)
        ));
    }

    #[test]
    fn test_valid_settings() {
        assert!(validate_config(1, "2024-08-01", &None, &None).is_ok());
        assert!(validate_config(2, "2025-01-15", &Some("league.json".to_string()), &None).is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        assert!(validate_config(0, "2024-08-01", &None, &None).is_err());
        assert!(validate_config(3, "2024-08-01", &None, &None).is_err());
        assert!(validate_config(2, "August", &None, &None).is_err());
        assert!(validate_config(2, "2024-08-01", &Some("  ".to_string()), &None).is_err());
        let err = validate_config(2, "2024-08-01", &None, &Some(String::new())).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
