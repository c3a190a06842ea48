use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PhoneError {
	#[error("Phone number is not a valid E.164 number.")]
	Invalid,
}

/// Canonicalizes a phone number to E.164: visual separators are stripped,
/// the result must be `+` followed by 8-15 digits with a non-zero leading
/// digit.
pub fn canonicalize(raw: &str) -> Result<String, PhoneError> {
	let cleaned: String =
		raw.chars().filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.')).collect();

	if e164_pattern().is_match(&cleaned) { Ok(cleaned) } else { Err(PhoneError::Invalid) }
}

fn e164_pattern() -> &'static Regex {
	static PATTERN: OnceLock<Regex> = OnceLock::new();

	PATTERN.get_or_init(|| {
		Regex::new(r"^\+[1-9][0-9]{7,14}$").expect("E.164 pattern is a valid regex.")
	})
}
