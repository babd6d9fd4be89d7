use egui_plot::{Bar, BarChart, Line, PlotPoints};

use crate::stats::StatsData;

/// Weekly workout duration in minutes, indexed by week position.
pub fn weekly_duration_points(stats: &StatsData) -> Vec<[f64; 2]> {
    stats
        .weekly_durations
        .iter()
        .enumerate()
        .map(|(i, &seconds)| [i as f64, seconds / 60.0])
        .collect()
}

pub fn weekly_duration_line(stats: &StatsData) -> Line {
    Line::new(PlotPoints::from(weekly_duration_points(stats))).name("Duration (min)")
}

/// How often each exercise was logged, in label order.
pub fn exercise_count_pairs(stats: &StatsData) -> Vec<(String, f64)> {
    stats
        .exercise_labels
        .iter()
        .zip(&stats.exercise_counts)
        .map(|(label, &count)| (label.clone(), count as f64))
        .collect()
}

pub fn exercise_count_chart(stats: &StatsData) -> BarChart {
    let bars: Vec<Bar> = exercise_count_pairs(stats)
        .into_iter()
        .enumerate()
        .map(|(i, (label, count))| Bar::new(i as f64, count).name(label))
        .collect();
    BarChart::new(bars).name("Frequency")
}

/// Total reps per month from the monthly rollup.
pub fn monthly_reps_points(stats: &StatsData) -> Vec<(String, f64)> {
    stats
        .monthly_summary
        .iter()
        .map(|row| (row.month.clone(), row.total_reps as f64))
        .collect()
}

pub fn monthly_reps_chart(stats: &StatsData) -> BarChart {
    let bars: Vec<Bar> = monthly_reps_points(stats)
        .into_iter()
        .enumerate()
        .map(|(i, (month, reps))| Bar::new(i as f64, reps).name(month))
        .collect();
    BarChart::new(bars).name("Total Reps")
}

/// Formatter for x-axis marks that index into a label list. Fractional
/// marks and out-of-range indices render empty.
pub fn label_at(labels: &[String], value: f64) -> String {
    if value.fract().abs() > f64::EPSILON || value < 0.0 {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}
