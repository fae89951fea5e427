//! Builds the editable form for a day by laying persisted sets over the
//! current prescription. Stored values are never trusted to have a shape:
//! anything unexpected falls back to the blank default.

use crate::models::{blank, CardioLog, DayForm, LogEntry, SetRecord, Workouts};
use crate::plan::{DayPlan, WorkoutDefinition};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// What happens to persisted exercises the current plan no longer prescribes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    /// The form only ever shows the current prescription. Stale exercise data
    /// is dropped from the view and lost on the next save.
    #[default]
    CurrentPlanWins,
    /// Stale exercises follow the prescribed ones, so saving keeps them.
    PreserveHistory,
}

impl FromStr for ReconcilePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "current-plan" | "current-plan-wins" => Ok(Self::CurrentPlanWins),
            "preserve-history" => Ok(Self::PreserveHistory),
            other => Err(format!("unknown reconcile policy '{other}'")),
        }
    }
}

/// Blank sets for every prescribed exercise, in block order; empty on cardio
/// and rest days.
pub fn build_template(assignment: DayPlan) -> Workouts {
    assignment
        .workout()
        .map(template_for)
        .unwrap_or_default()
}

pub fn template_for(workout: &WorkoutDefinition) -> Workouts {
    workout
        .exercises()
        .map(|exercise| {
            let sets = (1..=exercise.sets).map(SetRecord::blank).collect();
            (exercise.name.to_string(), sets)
        })
        .collect()
}

/// Merges persisted sets onto a template. Where a name exists in both, the
/// persisted array wins in full: its own length, renumbered 1..N, with missing
/// values blanked. Entries that are not arrays are ignored.
pub fn merge_workouts(template: Workouts, persisted: &Value, policy: ReconcilePolicy) -> Workouts {
    let mut merged = template;
    let Some(persisted) = persisted.as_object() else {
        return merged;
    };
    for (name, sets) in persisted {
        let Some(sets) = sets.as_array() else {
            continue;
        };
        let keep = match policy {
            ReconcilePolicy::CurrentPlanWins => merged.contains(name),
            ReconcilePolicy::PreserveHistory => true,
        };
        if keep {
            merged.insert(name.clone(), renumber(sets));
        }
    }
    merged
}

fn renumber(sets: &[Value]) -> Vec<SetRecord> {
    sets.iter()
        .zip(1..)
        .map(|(record, set)| SetRecord {
            set,
            reps: or_blank(record.get("reps").cloned()),
            weight: or_blank(record.get("weight").cloned()),
        })
        .collect()
}

fn or_blank(value: Option<Value>) -> Value {
    value.filter(|value| !value.is_null()).unwrap_or_else(blank)
}

fn shape_cardio(stored: Option<Value>) -> CardioLog {
    let Some(Value::Object(mut cardio)) = stored else {
        return CardioLog::default();
    };
    CardioLog {
        completed: cardio
            .remove("completed")
            .filter(|value| !value.is_null())
            .unwrap_or(Value::Bool(false)),
        steps: or_blank(cardio.remove("steps")),
        notes: or_blank(cardio.remove("notes")),
        extra: cardio,
    }
}

/// The fully populated form a client edits for `date`.
///
/// Defaults fill every field, persisted top-level fields replace them
/// wholesale, and `workouts` is the reconciled template.
pub fn reconcile_entry(
    date: NaiveDate,
    assignment: DayPlan,
    persisted: Option<&LogEntry>,
    policy: ReconcilePolicy,
) -> DayForm {
    let template = build_template(assignment);
    let Some(persisted) = persisted else {
        return empty_form(date, template);
    };

    let mut extra: Map<String, Value> = persisted.fields.clone();
    extra.remove("date");
    let workouts = match extra.remove("workouts") {
        Some(sets) => merge_workouts(template, &sets, policy),
        None => template,
    };

    DayForm {
        date,
        weight: or_blank(extra.remove("weight")),
        workouts,
        cardio: shape_cardio(extra.remove("cardio")),
        notes: or_blank(extra.remove("notes")),
        extra,
    }
}

/// The form shown when nothing is stored, or when the stored entry could not
/// be fetched.
pub fn empty_form(date: NaiveDate, template: Workouts) -> DayForm {
    DayForm {
        date,
        weight: blank(),
        workouts: template,
        cardio: CardioLog::default(),
        notes: blank(),
        extra: Map::new(),
    }
}
