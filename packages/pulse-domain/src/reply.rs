use serde::{Deserialize, Serialize};

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 10;

/// A fully validated survey reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReply {
	pub joy: u8,
	pub achievement: u8,
	pub meaningfulness: u8,
	pub influence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingField {
	Joy,
	Achievement,
	Meaningfulness,
}
impl RatingField {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Joy => "joy",
			Self::Achievement => "achievement",
			Self::Meaningfulness => "meaningfulness",
		}
	}
}
impl std::fmt::Display for RatingField {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReplyError {
	#[error("Reply did not match the expected format.")]
	Malformed,
	#[error("The {field} rating must be a whole number from 1 to 10.")]
	InvalidRating { field: RatingField },
}

/// Parses `joy/achievement/meaningfulness/influence`.
///
/// Only the first three separators are significant: the influence field is
/// everything after the third slash and may itself contain slashes, or be
/// empty. Each field is trimmed before interpretation.
pub fn parse_reply(raw: &str) -> Result<ParsedReply, ReplyError> {
	let mut fields = raw.trim().splitn(4, '/');
	let (Some(joy), Some(achievement), Some(meaningfulness), Some(influence)) =
		(fields.next(), fields.next(), fields.next(), fields.next())
	else {
		return Err(ReplyError::Malformed);
	};

	Ok(ParsedReply {
		joy: parse_rating(joy, RatingField::Joy)?,
		achievement: parse_rating(achievement, RatingField::Achievement)?,
		meaningfulness: parse_rating(meaningfulness, RatingField::Meaningfulness)?,
		influence: influence.trim().to_string(),
	})
}

fn parse_rating(raw: &str, field: RatingField) -> Result<u8, ReplyError> {
	let value: i64 =
		raw.trim().parse().map_err(|_| ReplyError::InvalidRating { field })?;

	if !(RATING_MIN..=RATING_MAX).contains(&value) {
		return Err(ReplyError::InvalidRating { field });
	}

	Ok(value as u8)
}
