use serde::{Deserialize, Serialize};
use time::Date;

/// Tie precedence for strongest/weakest: earlier entries win.
pub const DIMENSIONS: [Dimension; 3] =
	[Dimension::Joy, Dimension::Achievement, Dimension::Meaningfulness];

/// Weekly-score thresholds (out of 70) per dimension.
const WEEKLY_THRESHOLDS: [(Dimension, i64); 3] = [
	(Dimension::Joy, 45),
	(Dimension::Achievement, 42),
	(Dimension::Meaningfulness, 49),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
	Joy,
	Achievement,
	Meaningfulness,
}

/// One answered survey day, ordered by `survey_date` ascending.
#[derive(Debug, Clone, Copy)]
pub struct DailyScores {
	pub survey_date: Date,
	pub joy: u8,
	pub achievement: u8,
	pub meaningfulness: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAssessment {
	pub dimension: Dimension,
	/// Mean rating projected onto a week, `round(mean * 7)` out of 70.
	pub weekly_score: i64,
	pub threshold: i64,
	pub met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsSummary {
	pub response_count: u32,
	pub avg_joy: f64,
	pub avg_achievement: f64,
	pub avg_meaningfulness: f64,
	pub overall: f64,
	pub strongest: Option<Dimension>,
	pub weakest: Option<Dimension>,
	pub streak_days: u32,
	pub assessments: Vec<WeeklyAssessment>,
}

/// Aggregates answered days into the insights summary. Zero rows is a valid
/// input and yields the all-zero summary.
pub fn summarize(rows: &[DailyScores]) -> InsightsSummary {
	if rows.is_empty() {
		return InsightsSummary {
			response_count: 0,
			avg_joy: 0.0,
			avg_achievement: 0.0,
			avg_meaningfulness: 0.0,
			overall: 0.0,
			strongest: None,
			weakest: None,
			streak_days: 0,
			assessments: WEEKLY_THRESHOLDS
				.iter()
				.map(|(dimension, threshold)| WeeklyAssessment {
					dimension: *dimension,
					weekly_score: 0,
					threshold: *threshold,
					met: false,
				})
				.collect(),
		};
	}

	let avg_joy = round_to_tenth(mean(rows.iter().map(|row| row.joy)));
	let avg_achievement = round_to_tenth(mean(rows.iter().map(|row| row.achievement)));
	let avg_meaningfulness = round_to_tenth(mean(rows.iter().map(|row| row.meaningfulness)));
	let overall = round_to_tenth((avg_joy + avg_achievement + avg_meaningfulness) / 3.0);
	let means = [avg_joy, avg_achievement, avg_meaningfulness];

	InsightsSummary {
		response_count: rows.len() as u32,
		avg_joy,
		avg_achievement,
		avg_meaningfulness,
		overall,
		strongest: Some(pick(&means, |candidate, best| candidate > best)),
		weakest: Some(pick(&means, |candidate, best| candidate < best)),
		streak_days: streak_days(rows),
		assessments: WEEKLY_THRESHOLDS
			.iter()
			.zip(means)
			.map(|((dimension, threshold), avg)| {
				let weekly_score = (avg * 7.0).round() as i64;

				WeeklyAssessment {
					dimension: *dimension,
					weekly_score,
					threshold: *threshold,
					met: weekly_score >= *threshold,
				}
			})
			.collect(),
	}
}

/// Consecutive answered survey dates ending at the most recent one. Rows
/// must be ordered by date ascending.
pub fn streak_days(rows: &[DailyScores]) -> u32 {
	let mut streak = 0;

	for pair in rows.windows(2).rev() {
		if pair[0].survey_date.next_day() != Some(pair[1].survey_date) {
			break;
		}

		streak += 1;
	}

	if rows.is_empty() { 0 } else { streak + 1 }
}

fn mean(values: impl Iterator<Item = u8> + ExactSizeIterator) -> f64 {
	let count = values.len() as f64;

	values.map(f64::from).sum::<f64>() / count
}

// f64::round ties away from zero, which is the rounding the summary wants.
fn round_to_tenth(value: f64) -> f64 {
	(value * 10.0).round() / 10.0
}

fn pick(means: &[f64; 3], beats: impl Fn(f64, f64) -> bool) -> Dimension {
	let mut winner = 0;

	for candidate in 1..means.len() {
		if beats(means[candidate], means[winner]) {
			winner = candidate;
		}
	}

	DIMENSIONS[winner]
}
