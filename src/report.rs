use crate::record::Record;
use crate::stats::{IntensityTier, StatsData, format_minutes};
use crate::table;
use maud::{Markup, html};
use plotters::prelude::*;
use std::path::Path;

/// Write an HTML snapshot of the record table and monthly summary, plus a
/// weekly-duration chart rendered next to it as a PNG.
pub fn export_html_report<P: AsRef<Path>>(
    path: P,
    records: &[Record],
    stats: &StatsData,
) -> std::io::Result<()> {
    let path = path.as_ref();
    let chart_path = path.with_extension("png");
    let chart_file = match generate_duration_chart(stats, &chart_path) {
        Ok(_) => chart_path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("")),
        Err(e) => {
            log::error!("failed to generate chart: {e}");
            std::ffi::OsStr::new("")
        }
    };
    let markup = build_html(records, stats, chart_file);
    std::fs::write(path, markup.into_string())
}

fn generate_duration_chart(
    stats: &StatsData,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;
    if stats.weekly_durations.is_empty() {
        root.present()?;
        return Ok(());
    }
    let minutes: Vec<f64> = stats.weekly_durations.iter().map(|s| s / 60.0).collect();
    let max = minutes.iter().cloned().fold(0.0_f64, f64::max);
    let mut chart = ChartBuilder::on(&root)
        .caption("Weekly Duration", ("sans-serif", 25))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0..minutes.len(), 0f64..max)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Week")
        .y_desc("Duration (min)")
        .draw()?;
    chart.draw_series(LineSeries::new(
        minutes.iter().enumerate().map(|(i, &m)| (i, m)),
        &BLUE,
    ))?;
    root.present()?;
    Ok(())
}

fn build_html(records: &[Record], stats: &StatsData, chart_file: &std::ffi::OsStr) -> Markup {
    html! {
        html {
            head { meta charset="utf-8"; title { "Workout Log Report" } }
            body {
                h1 { "Totals" }
                table border="1" {
                    tr { th { "Total Duration (min)" } td { (format_minutes(stats.total_duration)) } }
                    tr { th { "Total Count" } td { (stats.total_count) } }
                }
                h1 { "Records" }
                // full layout regardless of screen, this is a printout
                (table::render_html(records, table::MOBILE_BREAKPOINT + 1.0))
                h1 { "Monthly Summary" }
                @if stats.monthly_summary.is_empty() {
                    p { "No data available for selected range." }
                } @else {
                    table border="1" {
                        tr {
                            th { "Month" }
                            th { "Total Reps" }
                            th { "Intensity Level" }
                            th { "Calories Burned" }
                        }
                        @for row in &stats.monthly_summary {
                            @let tier = IntensityTier::for_score(row.intensity);
                            tr {
                                td { (row.month) }
                                td { (row.total_reps) }
                                td style={"color: " (tier.css_color()) "; font-weight: bold;"} {
                                    (tier.label())
                                }
                                td { (format!("{:.1}", row.calories)) }
                            }
                        }
                    }
                }
                h1 { "Weekly Duration" }
                @if chart_file.is_empty() {
                    p { "Chart unavailable" }
                } @else {
                    img src=(chart_file.to_string_lossy());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MonthlyRow;
    use std::ffi::OsStr;

    fn sample_stats() -> StatsData {
        StatsData {
            weekly_durations: vec![600.0, 1200.0],
            total_duration: 1800.0,
            total_count: 12,
            monthly_summary: vec![
                MonthlyRow {
                    month: "2024-04".into(),
                    total_reps: 90,
                    intensity: 90.0,
                    calories: 36.5,
                    ..MonthlyRow::default()
                },
                MonthlyRow {
                    month: "2024-05".into(),
                    total_reps: 240,
                    intensity: 240.0,
                    calories: 104.0,
                    ..MonthlyRow::default()
                },
            ],
            ..StatsData::default()
        }
    }

    #[test]
    fn build_html_includes_totals_and_tiers() {
        let records = vec![Record {
            index: Some(0),
            datetime: "2024-05-01T08:00".into(),
            exercise: "squat".into(),
            reps: Some(30),
            ..Record::default()
        }];
        let output = build_html(&records, &sample_stats(), OsStr::new("chart.png")).into_string();
        assert!(output.contains("30.0")); // 1800s as minutes
        assert!(output.contains("Low"));
        assert!(output.contains("High"));
        assert!(output.contains("36.5"));
        assert!(output.contains("2024-05-01T08:00"));
        assert!(output.contains("<img src=\"chart.png\">"));
    }

    #[test]
    fn build_html_without_chart_or_data() {
        let output = build_html(&[], &StatsData::default(), OsStr::new("")).into_string();
        assert!(output.contains("No records."));
        assert!(output.contains("No data available for selected range."));
        assert!(output.contains("Chart unavailable"));
        assert!(!output.contains("<img"));
    }

    #[test]
    fn export_writes_html_and_chart_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        export_html_report(&path, &[], &sample_stats()).unwrap();
        assert!(path.exists());
        assert!(dir.path().join("report.png").exists());
    }
}
