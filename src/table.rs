use crate::record::Record;
use maud::{Markup, html};

/// Widths at or below this many logical pixels get the condensed layout.
pub const MOBILE_BREAKPOINT: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One column per field.
    Full,
    /// One descriptive cell per row.
    Condensed,
}

pub fn layout_for(width: f32) -> Layout {
    if width <= MOBILE_BREAKPOINT {
        Layout::Condensed
    } else {
        Layout::Full
    }
}

pub const FULL_COLUMNS: [&str; 6] = ["Date", "Exercise", "Reps", "Duration", "Direction", "Note"];
pub const CONDENSED_COLUMNS: [&str; 1] = ["Record"];

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Server index of the record the row's checkbox selects.
    pub index: Option<u32>,
    /// Condensed rows hold one cell with newline-separated lines.
    pub cells: Vec<String>,
}

/// Layout-resolved view of the record set. Building it is a pure function
/// of the records and the viewport width, so re-rendering on resize or
/// mid-fetch always yields the same output for the same inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub layout: Layout,
    pub columns: &'static [&'static str],
    pub rows: Vec<TableRow>,
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

fn condensed_cell(record: &Record) -> String {
    let mut lines = vec![record.datetime.clone(), record.exercise.clone()];
    if let Some(reps) = record.reps {
        lines.push(format!("Reps: {reps}"));
    }
    if let Some(duration) = record.duration {
        lines.push(format!("Duration: {duration}"));
    }
    if let Some(direction) = record.direction {
        lines.push(format!("Direction: {}", direction.label()));
    }
    if let Some(note) = record.note.as_deref() {
        lines.push(note.to_string());
    }
    lines.join("\n")
}

pub fn build_table(records: &[Record], width: f32) -> TableModel {
    let layout = layout_for(width);
    let rows = records
        .iter()
        .map(|r| TableRow {
            index: r.index,
            cells: match layout {
                Layout::Full => vec![
                    r.datetime.clone(),
                    r.exercise.clone(),
                    opt_cell(r.reps),
                    opt_cell(r.duration),
                    opt_cell(r.direction.map(|d| d.label())),
                    r.note.clone().unwrap_or_default(),
                ],
                Layout::Condensed => vec![condensed_cell(r)],
            },
        })
        .collect();
    TableModel {
        layout,
        columns: match layout {
            Layout::Full => &FULL_COLUMNS,
            Layout::Condensed => &CONDENSED_COLUMNS,
        },
        rows,
    }
}

/// HTML rendition of the table, used by the report export. An empty record
/// set renders a single placeholder paragraph instead of an empty table.
pub fn render_html(records: &[Record], width: f32) -> Markup {
    if records.is_empty() {
        return html! { p { "No records." } };
    }
    let model = build_table(records, width);
    html! {
        table {
            thead {
                tr {
                    th { "Select" }
                    @for col in model.columns {
                        th { (col) }
                    }
                }
            }
            tbody {
                @for row in &model.rows {
                    tr {
                        td {
                            input type="checkbox" class="select-box"
                                data-index=[row.index.map(|i| i.to_string())];
                        }
                        @for cell in &row.cells {
                            td {
                                @for line in cell.lines() {
                                    div { (line) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Direction;

    fn sample_records() -> Vec<Record> {
        vec![
            Record {
                index: Some(0),
                datetime: "2024-05-05T09:00".into(),
                exercise: "push-up".into(),
                reps: Some(20),
                ..Record::default()
            },
            Record {
                index: Some(1),
                datetime: "2024-05-04T18:30".into(),
                exercise: "plank".into(),
                duration: Some(90),
                ..Record::default()
            },
            Record {
                index: Some(2),
                datetime: "2024-05-03T07:15".into(),
                exercise: "lunge".into(),
                reps: Some(12),
                direction: Some(Direction::Left),
                note: Some("felt strong".into()),
                ..Record::default()
            },
            Record {
                index: Some(3),
                datetime: "2024-05-02T12:00".into(),
                exercise: "squat".into(),
                reps: Some(30),
                ..Record::default()
            },
            Record {
                index: Some(4),
                datetime: "2024-05-01T20:45".into(),
                exercise: "pull-up".into(),
                reps: Some(8),
                ..Record::default()
            },
        ]
    }

    #[test]
    fn breakpoint_is_inclusive() {
        assert_eq!(layout_for(600.0), Layout::Condensed);
        assert_eq!(layout_for(600.5), Layout::Full);
        assert_eq!(layout_for(400.0), Layout::Condensed);
        assert_eq!(layout_for(800.0), Layout::Full);
    }

    #[test]
    fn row_count_matches_record_count() {
        let records = sample_records();
        for width in [400.0, 800.0] {
            let model = build_table(&records, width);
            assert_eq!(model.rows.len(), records.len());
        }
    }

    #[test]
    fn full_layout_has_six_data_columns() {
        let model = build_table(&sample_records(), 800.0);
        assert_eq!(model.layout, Layout::Full);
        assert_eq!(model.columns.len(), 6);
        for row in &model.rows {
            assert_eq!(row.cells.len(), 6);
        }
    }

    #[test]
    fn condensed_markup_has_two_columns() {
        let markup = render_html(&sample_records(), 400.0).into_string();
        assert_eq!(markup.matches("<th>").count(), 2);
    }

    #[test]
    fn both_layouts_contain_every_record() {
        let records = sample_records();
        for width in [400.0, 800.0] {
            let markup = render_html(&records, width).into_string();
            assert_eq!(markup.matches("<tr>").count(), records.len() + 1);
            for r in &records {
                assert!(markup.contains(&r.datetime), "missing {} at {width}", r.datetime);
                assert!(markup.contains(&r.exercise));
            }
            assert!(markup.contains("felt strong"));
        }
    }

    #[test]
    fn empty_set_renders_placeholder() {
        let markup = render_html(&[], 800.0).into_string();
        assert_eq!(markup, "<p>No records.</p>");
    }

    #[test]
    fn rendering_is_idempotent() {
        let records = sample_records();
        let first = render_html(&records, 800.0).into_string();
        let second = render_html(&records, 800.0).into_string();
        assert_eq!(first, second);
    }

    #[test]
    fn checkboxes_carry_the_record_index() {
        let markup = render_html(&sample_records(), 800.0).into_string();
        for i in 0..5 {
            assert!(markup.contains(&format!("data-index=\"{i}\"")));
        }
    }

    #[test]
    fn missing_fields_render_as_dashes() {
        let model = build_table(&sample_records(), 800.0);
        // plank row: no reps, no direction, empty note
        let plank = &model.rows[1];
        assert_eq!(plank.cells[2], "-");
        assert_eq!(plank.cells[3], "90");
        assert_eq!(plank.cells[4], "-");
        assert_eq!(plank.cells[5], "");
    }
}
