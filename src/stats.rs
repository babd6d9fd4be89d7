use crate::record::Record;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Server-computed aggregates returned by `/stats-data`.
///
/// The payload is recomputed per request and never mutated client-side;
/// missing sections default to empty so a sparse response still renders.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatsData {
    #[serde(default)]
    pub week_labels: Vec<String>,
    /// Seconds of exercise per week, parallel to `week_labels`.
    #[serde(default)]
    pub weekly_durations: Vec<f64>,
    #[serde(default)]
    pub exercise_labels: Vec<String>,
    #[serde(default)]
    pub exercise_counts: Vec<u64>,
    #[serde(default)]
    pub recent_records: Vec<Record>,
    #[serde(default)]
    pub monthly_summary: Vec<MonthlyRow>,
    /// Total seconds over the whole range.
    #[serde(default)]
    pub total_duration: f64,
    #[serde(default)]
    pub total_count: u64,
}

/// One row of the monthly rollup. Per-exercise rep counts arrive flattened
/// next to the fixed fields, keyed by exercise name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonthlyRow {
    pub month: String,
    #[serde(default)]
    pub total_reps: u64,
    #[serde(default)]
    pub intensity: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(flatten)]
    pub exercise_reps: BTreeMap<String, u64>,
}

impl MonthlyRow {
    pub fn reps_for(&self, exercise: &str) -> u64 {
        self.exercise_reps.get(exercise).copied().unwrap_or(0)
    }
}

/// Three-level classification of a monthly intensity score.
/// Bins are half-open with inclusive lower boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityTier {
    Low,
    Moderate,
    High,
}

impl IntensityTier {
    pub fn for_score(score: f64) -> Self {
        if score < 100.0 {
            IntensityTier::Low
        } else if score < 200.0 {
            IntensityTier::Moderate
        } else {
            IntensityTier::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntensityTier::Low => "Low",
            IntensityTier::Moderate => "Moderate",
            IntensityTier::High => "High",
        }
    }

    pub fn color(self) -> egui::Color32 {
        match self {
            IntensityTier::Low => egui::Color32::from_rgb(0x28, 0xa7, 0x45),
            IntensityTier::Moderate => egui::Color32::from_rgb(0xff, 0xa5, 0x00),
            IntensityTier::High => egui::Color32::from_rgb(0xe7, 0x4c, 0x3c),
        }
    }

    /// CSS color name used by the HTML report.
    pub fn css_color(self) -> &'static str {
        match self {
            IntensityTier::Low => "green",
            IntensityTier::Moderate => "orange",
            IntensityTier::High => "red",
        }
    }
}

/// Format a duration in seconds as minutes with one decimal place.
pub fn format_minutes(seconds: f64) -> String {
    format!("{:.1}", seconds / 60.0)
}
