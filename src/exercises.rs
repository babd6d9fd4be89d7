use phf::phf_map;

/// How an exercise is measured when a set is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    /// Counted in repetitions.
    Reps,
    /// Held for a number of seconds.
    Timed,
    /// Repetitions plus a left/right/both direction.
    RepsWithDirection,
}

/// Which fields a save or update payload carries for an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    pub reps: bool,
    pub duration: bool,
    pub direction: bool,
}

static CATALOG: phf::Map<&'static str, Measurement> = phf_map! {
    "push-up" => Measurement::Reps,
    "squat" => Measurement::Reps,
    "pull-up" => Measurement::Reps,
    "plank" => Measurement::Timed,
    "lunge" => Measurement::RepsWithDirection,
};

pub const KNOWN_EXERCISES: [&str; 5] = ["push-up", "squat", "pull-up", "plank", "lunge"];

/// Look up how an exercise is measured. Names outside the catalog fall back
/// to plain rep counting so the set remains open to extension.
pub fn measurement_for(exercise: &str) -> Measurement {
    CATALOG.get(exercise).copied().unwrap_or(Measurement::Reps)
}

pub fn rules_for(exercise: &str) -> FieldRules {
    match measurement_for(exercise) {
        Measurement::Reps => FieldRules {
            reps: true,
            duration: false,
            direction: false,
        },
        Measurement::Timed => FieldRules {
            reps: false,
            duration: true,
            direction: false,
        },
        Measurement::RepsWithDirection => FieldRules {
            reps: true,
            duration: false,
            direction: true,
        },
    }
}
