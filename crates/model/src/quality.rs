//! Per-resource quality scores and badge classification.

use chrono::{DateTime, Utc};
use marginalia_primitives::ResourceId;
use serde::{Deserialize, Serialize};

/// Scores (or weights) for the fixed quality dimensions, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityDimensions {
	pub accuracy: f64,
	pub completeness: f64,
	pub consistency: f64,
	pub timeliness: f64,
	pub relevance: f64,
}

impl QualityDimensions {
	/// Dimension names paired with their values, in display order.
	pub fn entries(&self) -> [(&'static str, f64); 5] {
		[
			("accuracy", self.accuracy),
			("completeness", self.completeness),
			("consistency", self.consistency),
			("timeliness", self.timeliness),
			("relevance", self.relevance),
		]
	}
}

/// Quality record for one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityDetails {
	pub resource_id: ResourceId,
	#[serde(rename = "quality_dimensions")]
	pub dimensions: QualityDimensions,
	#[serde(rename = "quality_overall")]
	pub overall: f64,
	/// Not required to sum to one.
	#[serde(rename = "quality_weights", default)]
	pub weights: QualityDimensions,
	#[serde(rename = "quality_last_computed")]
	pub computed_at: Option<DateTime<Utc>>,
	#[serde(default)]
	pub is_quality_outlier: bool,
	#[serde(default)]
	pub needs_quality_review: bool,
}

impl QualityDetails {
	pub fn badge(&self) -> BadgeLevel {
		BadgeLevel::classify(self.overall)
	}
}

/// Color class of the quality badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeLevel {
	High,
	Medium,
	Low,
}

impl BadgeLevel {
	pub const HIGH_THRESHOLD: f64 = 0.8;
	pub const MEDIUM_THRESHOLD: f64 = 0.6;

	/// Classifies an overall score: `[0.8, 1]` high, `[0.6, 0.8)` medium,
	/// everything below low. Out-of-range scores are clamped first and NaN
	/// counts as low.
	pub fn classify(overall: f64) -> Self {
		let score = if overall.is_nan() { 0.0 } else { overall.clamp(0.0, 1.0) };
		if score >= Self::HIGH_THRESHOLD {
			Self::High
		} else if score >= Self::MEDIUM_THRESHOLD {
			Self::Medium
		} else {
			Self::Low
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::High => "high",
			Self::Medium => "medium",
			Self::Low => "low",
		}
	}

	/// Decoration class applied to the badge glyph.
	pub fn css_class(self) -> &'static str {
		match self {
			Self::High => "quality-badge-high",
			Self::Medium => "quality-badge-medium",
			Self::Low => "quality-badge-low",
		}
	}
}
