use crate::contracts::ValidationError;

/// Largest batch a single request may create.
pub const MAX_BATCH: usize = 100;

/// Checks a requested table count against `1..=MAX_BATCH`.
pub fn validate_count(value: i64) -> Result<usize, ValidationError> {
    if value < 1 {
        return Err(ValidationError::NotPositive);
    }
    if value > MAX_BATCH as i64 {
        return Err(ValidationError::TooMany {
            requested: value,
            max: MAX_BATCH,
        });
    }
    Ok(value as usize)
}

/// Parses and validates a count typed by the user.
///
/// Surrounding whitespace is ignored. An empty field counts as zero.
pub fn parse_count(input: &str) -> Result<usize, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NotPositive);
    }
    let value: i64 = match trimmed.parse() {
        Ok(v) => v,
        // Out-of-range digits are still a whole number, just too large.
        Err(_) if is_integer_literal(trimmed) => {
            return Err(if trimmed.starts_with('-') {
                ValidationError::NotPositive
            } else {
                ValidationError::TooMany {
                    requested: i64::MAX,
                    max: MAX_BATCH,
                }
            });
        }
        Err(_) => return Err(ValidationError::NotAnInteger(trimmed.to_string())),
    };
    validate_count(value)
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
