//! Tracker client state machine.
//!
//! The session never performs I/O. Each event returns the requests the host
//! should issue, and every response is fed back as an event carrying the
//! token of the request it answers. A response whose token is no longer
//! current is ignored, so a slow fetch for a previously selected date cannot
//! overwrite the form for the date now on screen.
//!
//! The whole session serializes to JSON. The page keeps it between steps and
//! posts it back with each event, so the browser runs this reducer rather
//! than a copy of it.

use crate::models::{DayForm, LogEntry, WeightPoint};
use crate::plan::{workout_for_date, DayPlan};
use crate::reconcile::{build_template, empty_form, reconcile_entry, ReconcilePolicy};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

pub const LOGS_UNAVAILABLE: &str =
    "Unable to reach the server. Start the API server to load saved data.";
pub const ENTRY_UNAVAILABLE: &str = "Unable to load this day. Showing an empty form.";
pub const SAVE_FAILED: &str = "Save failed. Check the server console.";

/// Identifies one outstanding request.
pub type RequestToken = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogsPhase {
    Loading,
    Ready,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum EntryPhase {
    Loading { token: RequestToken },
    Editable,
    Saving { token: RequestToken },
}

/// Requests the host performs on the session's behalf.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    FetchLogs,
    FetchWeights,
    FetchEntry {
        date: NaiveDate,
        token: RequestToken,
    },
    SaveEntry {
        date: NaiveDate,
        token: RequestToken,
        entry: LogEntry,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum FormEdit {
    Weight {
        value: Value,
    },
    SetReps {
        exercise: String,
        index: usize,
        value: Value,
    },
    SetWeight {
        exercise: String,
        index: usize,
        value: Value,
    },
    CardioCompleted {
        value: Value,
    },
    CardioSteps {
        value: Value,
    },
    CardioNotes {
        value: Value,
    },
    Notes {
        value: Value,
    },
}

/// Failures carry the host's description; a transport error and a non-2xx
/// status are treated alike.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    LogsLoaded {
        logs: BTreeMap<NaiveDate, LogEntry>,
    },
    LogsFailed {
        #[serde(default)]
        error: String,
    },
    WeightsLoaded {
        weights: Vec<WeightPoint>,
    },
    WeightsFailed {
        #[serde(default)]
        error: String,
    },
    SelectDate {
        date: NaiveDate,
    },
    EntryLoaded {
        token: RequestToken,
        entry: Option<LogEntry>,
    },
    EntryFailed {
        token: RequestToken,
        #[serde(default)]
        error: String,
    },
    Edit {
        edit: FormEdit,
    },
    Save,
    SaveSucceeded {
        token: RequestToken,
    },
    SaveFailed {
        token: RequestToken,
        #[serde(default)]
        error: String,
    },
    PreviousMonth,
    NextMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_log: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSession {
    today: NaiveDate,
    selected: NaiveDate,
    month: NaiveDate,
    /// Server configuration, reapplied on every step.
    #[serde(skip)]
    policy: ReconcilePolicy,
    logs_phase: LogsPhase,
    logs: BTreeMap<NaiveDate, LogEntry>,
    weights: Vec<WeightPoint>,
    entry_phase: EntryPhase,
    form: DayForm,
    /// Snapshots of in-flight saves; they may outlive the date selection.
    pending_saves: BTreeMap<RequestToken, LogEntry>,
    banner: Option<String>,
    next_token: RequestToken,
}

impl TrackerSession {
    /// A session showing `today`, plus the requests issued on mount.
    pub fn start(today: NaiveDate, policy: ReconcilePolicy) -> (Self, Vec<Command>) {
        let mut session = Self {
            today,
            selected: today,
            month: first_of_month(today),
            policy,
            logs_phase: LogsPhase::Loading,
            logs: BTreeMap::new(),
            weights: Vec::new(),
            entry_phase: EntryPhase::Editable,
            form: empty_form(today, build_template(workout_for_date(today))),
            pending_saves: BTreeMap::new(),
            banner: None,
            next_token: 0,
        };
        let mut commands = vec![Command::FetchLogs, Command::FetchWeights];
        commands.push(session.begin_fetch(today));
        (session, commands)
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::LogsLoaded { logs } => {
                self.logs = logs;
                self.logs_phase = LogsPhase::Ready;
                vec![Command::FetchWeights]
            }
            Event::LogsFailed { error } => {
                debug!(%error, "log fetch failed");
                self.logs_phase = LogsPhase::Unavailable;
                self.banner = Some(LOGS_UNAVAILABLE.to_string());
                Vec::new()
            }
            Event::WeightsLoaded { weights } => {
                self.weights = weights;
                Vec::new()
            }
            // A failed refresh keeps the last series on screen.
            Event::WeightsFailed { error } => {
                debug!(%error, "weight fetch failed");
                Vec::new()
            }
            Event::SelectDate { date } => {
                self.selected = date;
                self.month = first_of_month(date);
                vec![self.begin_fetch(date)]
            }
            Event::EntryLoaded { token, entry } => {
                if self.entry_phase == (EntryPhase::Loading { token }) {
                    self.form =
                        reconcile_entry(self.selected, self.assignment(), entry.as_ref(), self.policy);
                    self.entry_phase = EntryPhase::Editable;
                }
                Vec::new()
            }
            Event::EntryFailed { token, error } => {
                if self.entry_phase == (EntryPhase::Loading { token }) {
                    debug!(%error, date = %self.selected, "entry fetch failed");
                    self.banner = Some(ENTRY_UNAVAILABLE.to_string());
                    self.form = empty_form(self.selected, build_template(self.assignment()));
                    self.entry_phase = EntryPhase::Editable;
                }
                Vec::new()
            }
            Event::Edit { edit } => {
                if !matches!(self.entry_phase, EntryPhase::Loading { .. }) {
                    apply_edit(&mut self.form, edit);
                }
                Vec::new()
            }
            Event::Save => {
                if self.entry_phase != EntryPhase::Editable {
                    return Vec::new();
                }
                let token = self.issue_token();
                let mut snapshot = self.form.to_entry();
                snapshot.date = self.selected;
                self.banner = None;
                self.entry_phase = EntryPhase::Saving { token };
                self.pending_saves.insert(token, snapshot.clone());
                vec![Command::SaveEntry {
                    date: snapshot.date,
                    token,
                    entry: snapshot,
                }]
            }
            Event::SaveSucceeded { token } => {
                let Some(snapshot) = self.finish_save(token) else {
                    return Vec::new();
                };
                self.logs.insert(snapshot.date, snapshot);
                vec![Command::FetchWeights]
            }
            Event::SaveFailed { token, error } => {
                if self.finish_save(token).is_some() {
                    debug!(%error, "save failed");
                    self.banner = Some(SAVE_FAILED.to_string());
                }
                Vec::new()
            }
            Event::PreviousMonth => {
                self.month = self
                    .month
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(self.month);
                Vec::new()
            }
            Event::NextMonth => {
                self.month = self
                    .month
                    .checked_add_months(Months::new(1))
                    .unwrap_or(self.month);
                Vec::new()
            }
        }
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        self.next_token
    }

    fn begin_fetch(&mut self, date: NaiveDate) -> Command {
        let token = self.issue_token();
        self.entry_phase = EntryPhase::Loading { token };
        Command::FetchEntry { date, token }
    }

    /// Settles a save, returning its snapshot if the token was outstanding.
    fn finish_save(&mut self, token: RequestToken) -> Option<LogEntry> {
        let snapshot = self.pending_saves.remove(&token)?;
        if self.entry_phase == (EntryPhase::Saving { token }) {
            self.entry_phase = EntryPhase::Editable;
        }
        Some(snapshot)
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn assignment(&self) -> DayPlan {
        workout_for_date(self.selected)
    }

    pub fn logs_phase(&self) -> LogsPhase {
        self.logs_phase
    }

    pub fn entry_phase(&self) -> &EntryPhase {
        &self.entry_phase
    }

    pub fn form(&self) -> &DayForm {
        &self.form
    }

    pub fn logs(&self) -> &BTreeMap<NaiveDate, LogEntry> {
        &self.logs
    }

    pub fn weights(&self) -> &[WeightPoint] {
        &self.weights
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn month(&self) -> NaiveDate {
        self.month
    }

    /// Sunday-first weeks covering the displayed month.
    pub fn month_grid(&self) -> Vec<[CalendarCell; 7]> {
        let first = self.month;
        let lead = i64::from(first.weekday().num_days_from_sunday());
        let mut day = first - Duration::days(lead);
        let mut weeks = Vec::new();
        while day < first || (day.year(), day.month()) == (first.year(), first.month()) {
            let week = std::array::from_fn(|offset| {
                let date = day + Duration::days(offset as i64);
                CalendarCell {
                    date,
                    in_month: (date.year(), date.month()) == (first.year(), first.month()),
                    is_today: date == self.today,
                    is_selected: date == self.selected,
                    has_log: self.logs.contains_key(&date),
                }
            });
            weeks.push(week);
            day = day + Duration::days(7);
        }
        weeks
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn apply_edit(form: &mut DayForm, edit: FormEdit) {
    match edit {
        FormEdit::Weight { value } => form.weight = value,
        FormEdit::SetReps {
            exercise,
            index,
            value,
        } => {
            if let Some(set) = form
                .workouts
                .get_mut(&exercise)
                .and_then(|sets| sets.get_mut(index))
            {
                set.reps = value;
            }
        }
        FormEdit::SetWeight {
            exercise,
            index,
            value,
        } => {
            if let Some(set) = form
                .workouts
                .get_mut(&exercise)
                .and_then(|sets| sets.get_mut(index))
            {
                set.weight = value;
            }
        }
        FormEdit::CardioCompleted { value } => form.cardio.completed = value,
        FormEdit::CardioSteps { value } => form.cardio.steps = value,
        FormEdit::CardioNotes { value } => form.cardio.notes = value,
        FormEdit::Notes { value } => form.notes = value,
    }
}
