//! Setting value validation.

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SERVER_PORT" => validate_int_range(value, 1, 65535)?,
        "TOAST_DEFAULT_DURATION_MS" | "TOAST_ERROR_DURATION_MS" => {
            validate_int_range(value, 0, 600_000)?
        }
        "TOAST_EXIT_TRANSITION_MS" => validate_int_range(value, 0, 10_000)?,
        "TOAST_PROGRESS_INTERVAL_MS" => validate_int_range(value, 10, 1000)?,
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: u64, max: u64) -> Result<(), String> {
    let v: u64 = value
        .trim()
        .parse()
        .map_err(|_| "must be a non-negative integer".to_string())?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_bounds() {
        assert!(validate_setting("SERVER_PORT", "8080").is_ok());
        assert!(validate_setting("SERVER_PORT", "0").is_err());
        assert!(validate_setting("SERVER_PORT", "70000").is_err());
        assert!(validate_setting("SERVER_PORT", "http").is_err());
    }

    #[test]
    fn durations_accept_zero() {
        assert!(validate_setting("TOAST_DEFAULT_DURATION_MS", "0").is_ok());
        assert!(validate_setting("TOAST_EXIT_TRANSITION_MS", "0").is_ok());
    }

    #[test]
    fn progress_interval_rejects_zero() {
        let err = validate_setting("TOAST_PROGRESS_INTERVAL_MS", "0").expect_err("too small");
        assert_eq!(err, "must be between 10 and 1000");
    }

    #[test]
    fn negative_values_rejected() {
        assert!(validate_setting("TOAST_ERROR_DURATION_MS", "-5").is_err());
    }

    #[test]
    fn unknown_keys_pass() {
        assert!(validate_setting("SOMETHING_ELSE", "anything").is_ok());
    }
}
