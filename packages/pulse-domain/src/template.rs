use time::{Date, macros::format_description};

use crate::reply::ReplyError;

pub const REPLY_FORMAT_LINE: &str =
	"Reply with: joy/achievement/meaningfulness/influence\nExample: 8/7/9/Spent time with family";

/// The daily survey body. Fixed structure: greeting, date line, three
/// numbered rating prompts, the reply-format example, closing thanks.
pub fn survey_message(name: &str, survey_date: Date) -> String {
	let name = if name.trim().is_empty() { "there" } else { name };

	format!(
		"Hi {name}! 🌟\n\n\
		Daily Wellbeing Check-in for {date}:\n\n\
		Please rate your day yesterday (1-10):\n\n\
		1️⃣ Joy: How much joy did you get?\n\
		2️⃣ Achievement: How much achievement did you get?\n\
		3️⃣ Meaningfulness: How much meaningfulness did you get?\n\
		4️⃣ Influence: What influenced your ratings most?\n\n\
		{REPLY_FORMAT_LINE}\n\n\
		Thank you for participating! 💙",
		date = format_survey_date(survey_date),
	)
}

/// Names the specific validation failure and repeats the expected format.
pub fn corrective_message(err: &ReplyError) -> String {
	match err {
		ReplyError::Malformed => {
			format!("We couldn't read that reply. {REPLY_FORMAT_LINE}")
		},
		ReplyError::InvalidRating { .. } => format!("{err} {REPLY_FORMAT_LINE}"),
	}
}

pub fn confirmation_message(insights_url: &str) -> String {
	format!("Thank you for your response! 🌟 View your personalized wellbeing insights: {insights_url}")
}

pub fn no_pending_message() -> String {
	"There's no survey awaiting your reply right now. We'll text you when your next check-in is ready."
		.to_string()
}

pub fn already_answered_message() -> String {
	"We already have your response for this check-in. Thank you!".to_string()
}

pub fn test_message() -> String {
	"Hi! Please rate your wellbeing from yesterday on a scale of 1-10:\n\n\
	1. How much joy did you experience?\n\
	2. How much achievement did you feel?\n\
	3. How much meaningfulness did you find?\n\n\
	Reply with your ratings and any thoughts!"
		.to_string()
}

fn format_survey_date(date: Date) -> String {
	date.format(format_description!("[month repr:long] [day], [year]"))
		.unwrap_or_else(|_| date.to_string())
}
