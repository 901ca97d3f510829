use chrono::NaiveDate;

/// Required text field with a max length (in characters).
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    validate_optional(trimmed, field_name, max_len)
}

/// Optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    if value.trim().chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Parse an optional `YYYY-MM-DD` form date.
pub fn parse_optional_date(value: &str, field_name: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("{field_name} must be a date (YYYY-MM-DD)"))
}

/// Parse a required positive id from a form select.
pub fn parse_id(value: &str, field_name: &str) -> Result<i64, String> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("{field_name} is required")),
    }
}

/// Parse an optional positive slide order.
pub fn parse_optional_order(value: &str) -> Result<Option<i32>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<i32>() {
        Ok(order) if order > 0 => Ok(Some(order)),
        _ => Err("Order must be a positive whole number".to_string()),
    }
}
