use crate::exercises::rules_for;
use serde::{Deserialize, Serialize};

/// Side of the body a lunge set targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Both,
    Left,
    Right,
}

pub const ALL_DIRECTIONS: [Direction; 3] = [Direction::Both, Direction::Left, Direction::Right];

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Both => "both",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// One logged exercise event.
///
/// `index` is assigned by the server and is absent on save payloads.
/// Optional fields are omitted from JSON entirely when unset so that
/// payloads only carry the fields the exercise calls for.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Local timestamp in `YYYY-MM-DDTHH:MM` form; sorts lexicographically.
    pub datetime: String,
    pub exercise: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Record {
    /// Drop any measurement field the exercise does not use, e.g. a plank
    /// keeps only its duration and a lunge keeps reps plus direction.
    pub fn apply_field_rules(&mut self) {
        let rules = rules_for(&self.exercise);
        if !rules.reps {
            self.reps = None;
        }
        if !rules.duration {
            self.duration = None;
        }
        if !rules.direction {
            self.direction = None;
        }
    }

    /// One-line description used by the recent-records list and the
    /// condensed table layout.
    pub fn summary(&self) -> String {
        let mut out = self.exercise.clone();
        if let Some(reps) = self.reps {
            out.push_str(&format!(" - {reps} reps"));
        }
        if let Some(duration) = self.duration {
            out.push_str(&format!(" - {duration}s"));
        }
        if let Some(direction) = self.direction {
            out.push_str(&format!(" ({})", direction.label()));
        }
        out
    }
}

/// Order records newest first. The timestamp format compares correctly as a
/// plain string and the sort is stable, so ties keep their arrival order.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.datetime.cmp(&a.datetime));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(datetime: &str, exercise: &str) -> Record {
        Record {
            datetime: datetime.into(),
            exercise: exercise.into(),
            ..Record::default()
        }
    }

    #[test]
    fn save_payload_omits_unset_fields() {
        let mut r = record("2024-05-01T09:30", "plank");
        r.duration = Some(60);
        let value = serde_json::to_value(&r).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("index"));
        assert!(!obj.contains_key("reps"));
        assert!(!obj.contains_key("direction"));
        assert!(!obj.contains_key("note"));
        assert_eq!(obj["duration"], 60);
    }

    #[test]
    fn update_payload_keeps_index() {
        let mut r = record("2024-05-01T09:30", "squat");
        r.index = Some(7);
        r.reps = Some(20);
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["index"], 7);
        assert_eq!(value["reps"], 20);
    }

    #[test]
    fn direction_serializes_lowercase() {
        let mut r = record("2024-05-01T09:30", "lunge");
        r.reps = Some(10);
        r.direction = Some(Direction::Left);
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["direction"], "left");
    }

    #[test]
    fn field_rules_strip_disallowed_fields() {
        let mut r = record("2024-05-01T09:30", "plank");
        r.reps = Some(15);
        r.duration = Some(90);
        r.direction = Some(Direction::Both);
        r.apply_field_rules();
        assert_eq!(r.reps, None);
        assert_eq!(r.duration, Some(90));
        assert_eq!(r.direction, None);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut a = record("2024-05-01T09:30", "squat");
        a.reps = Some(1);
        let mut b = record("2024-05-02T08:00", "squat");
        b.reps = Some(2);
        let mut c = record("2024-05-01T09:30", "push-up");
        c.reps = Some(3);
        let mut records = vec![a, b, c];
        sort_newest_first(&mut records);
        assert_eq!(records[0].datetime, "2024-05-02T08:00");
        // equal timestamps keep arrival order
        assert_eq!(records[1].exercise, "squat");
        assert_eq!(records[2].exercise, "push-up");
    }

    #[test]
    fn summary_concatenates_present_fields() {
        let mut r = record("2024-05-01T09:30", "lunge");
        r.reps = Some(12);
        r.direction = Some(Direction::Right);
        assert_eq!(r.summary(), "lunge - 12 reps (right)");
    }
}
