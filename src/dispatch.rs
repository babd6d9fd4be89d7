use crate::api::{ApiClient, ApiError};
use crate::exercises::rules_for;
use crate::record::{Direction, Record};

#[derive(Debug)]
pub enum DispatchError {
    /// The action needs at least one checked row.
    NothingSelected,
    /// Editing needs exactly one checked row.
    MultipleSelected(usize),
    /// The selected index no longer exists in the cached record set.
    UnknownIndex(u32),
    Api(ApiError),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::NothingSelected => write!(f, "no records selected"),
            DispatchError::MultipleSelected(n) => {
                write!(f, "select exactly one record to edit ({n} selected)")
            }
            DispatchError::UnknownIndex(i) => write!(f, "record {i} is no longer present"),
            DispatchError::Api(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Outcome of a bulk delete. Failures are per index; the requests that
/// succeeded still apply.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub attempted: usize,
    pub failed: Vec<(u32, ApiError)>,
}

impl DeleteReport {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn deleted(&self) -> usize {
        self.attempted - self.failed.len()
    }
}

/// Delete every checked record. Refuses locally, before any request is
/// sent, when the selection is empty. Confirmation is the caller's job.
pub fn delete_many(client: &ApiClient, indices: &[u32]) -> Result<DeleteReport, DispatchError> {
    if indices.is_empty() {
        return Err(DispatchError::NothingSelected);
    }
    log::info!("deleting {} record(s)", indices.len());
    let results = client.delete_many(indices);
    let mut report = DeleteReport {
        attempted: results.len(),
        failed: Vec::new(),
    };
    for (index, result) in results {
        if let Err(e) = result {
            log::warn!("delete of record {index} failed: {e}");
            report.failed.push((index, e));
        }
    }
    Ok(report)
}

/// Field-by-field values collected by the edit form. Each value is merged
/// over the existing record; blank inputs keep the previous value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditDraft {
    pub datetime: String,
    pub exercise: String,
    pub reps: String,
    pub duration: String,
    pub direction: Option<Direction>,
    pub note: String,
}

impl EditDraft {
    pub fn from_record(record: &Record) -> Self {
        Self {
            datetime: record.datetime.clone(),
            exercise: record.exercise.clone(),
            reps: record.reps.map(|v| v.to_string()).unwrap_or_default(),
            duration: record.duration.map(|v| v.to_string()).unwrap_or_default(),
            direction: record.direction,
            note: record.note.clone().unwrap_or_default(),
        }
    }

    /// Merge the draft over `base`. Which measurement fields survive is
    /// decided by the (possibly just-edited) exercise, mirroring the
    /// creation-time field rules. Unparseable numbers fall back to the
    /// previous value.
    pub fn merge_into(&self, base: &Record) -> Record {
        let exercise = if self.exercise.trim().is_empty() {
            base.exercise.clone()
        } else {
            self.exercise.trim().to_string()
        };
        let rules = rules_for(&exercise);
        Record {
            index: base.index,
            datetime: if self.datetime.trim().is_empty() {
                base.datetime.clone()
            } else {
                self.datetime.trim().to_string()
            },
            reps: rules
                .reps
                .then(|| self.reps.trim().parse().ok().or(base.reps))
                .flatten(),
            duration: rules
                .duration
                .then(|| self.duration.trim().parse().ok().or(base.duration))
                .flatten(),
            direction: rules
                .direction
                .then(|| self.direction.or(base.direction).or(Some(Direction::Both)))
                .flatten(),
            note: {
                let note = self.note.trim();
                if note.is_empty() {
                    base.note.clone()
                } else {
                    Some(note.to_string())
                }
            },
            exercise,
        }
    }
}

/// Submit an edit for the single selected record. Refused without any
/// network call when the selection is empty or holds more than one index.
pub fn edit_one(
    client: &ApiClient,
    records: &[Record],
    selected: &[u32],
    draft: &EditDraft,
) -> Result<Record, DispatchError> {
    let index = match selected {
        [] => return Err(DispatchError::NothingSelected),
        [index] => *index,
        many => return Err(DispatchError::MultipleSelected(many.len())),
    };
    let base = records
        .iter()
        .find(|r| r.index == Some(index))
        .ok_or(DispatchError::UnknownIndex(index))?;
    let updated = draft.merge_into(base);
    log::info!("updating record {index}");
    client.update(&updated).map_err(DispatchError::Api)?;
    Ok(updated)
}
