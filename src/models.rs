use crate::plan::{DayPlan, WorkoutDefinition};
use crate::session::{CalendarCell, Command, Event, TrackerSession};
use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// One stored day. Apart from the key, fields are kept exactly as the client
/// sent them; their shape is only interpreted when a form is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LogEntry {
    /// Builds the stored form of a submission. The key always wins over any
    /// `date` the payload carried.
    pub fn for_date(date: NaiveDate, mut fields: Map<String, Value>) -> Self {
        fields.remove("date");
        Self { date, fields }
    }

    /// Body weight when one was actually recorded.
    pub fn recorded_weight(&self) -> Option<&Value> {
        self.fields.get("weight").filter(|value| !is_blank(value))
    }
}

/// On-disk document shape. Entries are re-keyed from the map on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "StoredDocument")]
pub struct LogDocument {
    pub logs: BTreeMap<NaiveDate, LogEntry>,
}

#[derive(Deserialize)]
struct StoredDocument {
    #[serde(default)]
    logs: BTreeMap<NaiveDate, Map<String, Value>>,
}

impl From<StoredDocument> for LogDocument {
    fn from(stored: StoredDocument) -> Self {
        let logs = stored
            .logs
            .into_iter()
            .map(|(date, fields)| (date, LogEntry::for_date(date, fields)))
            .collect();
        Self { logs }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    /// 1-based position within the exercise.
    pub set: u32,
    pub reps: Value,
    pub weight: Value,
}

impl SetRecord {
    pub fn blank(set: u32) -> Self {
        Self {
            set,
            reps: blank(),
            weight: blank(),
        }
    }

    fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("set".into(), Value::from(self.set));
        record.insert("reps".into(), self.reps.clone());
        record.insert("weight".into(), self.weight.clone());
        Value::Object(record)
    }
}

/// Logged sets per exercise, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workouts(Vec<(String, Vec<SetRecord>)>);

impl Workouts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Vec<SetRecord>> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, sets)| sets)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<SetRecord>> {
        self.0
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, sets)| sets)
    }

    /// Replaces the sets of an existing exercise in place, or appends a new one.
    pub fn insert(&mut self, name: String, sets: Vec<SetRecord>) {
        match self.get_mut(&name) {
            Some(existing) => *existing = sets,
            None => self.0.push((name, sets)),
        }
    }

    pub fn to_value(&self) -> Value {
        let workouts = self
            .0
            .iter()
            .map(|(name, sets)| {
                let sets = sets.iter().map(SetRecord::to_value).collect();
                (name.clone(), Value::Array(sets))
            })
            .collect();
        Value::Object(workouts)
    }
}

impl FromIterator<(String, Vec<SetRecord>)> for Workouts {
    fn from_iter<I: IntoIterator<Item = (String, Vec<SetRecord>)>>(iter: I) -> Self {
        let mut workouts = Self::new();
        for (name, sets) in iter {
            workouts.insert(name, sets);
        }
        workouts
    }
}

impl Serialize for Workouts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, sets) in &self.0 {
            map.serialize_entry(name, sets)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Workouts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WorkoutsVisitor;

        impl<'de> Visitor<'de> for WorkoutsVisitor {
            type Value = Workouts;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of exercise name to sets")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Workouts, A::Error> {
                let mut workouts = Workouts::new();
                while let Some((name, sets)) = access.next_entry::<String, Vec<SetRecord>>()? {
                    workouts.insert(name, sets);
                }
                Ok(workouts)
            }
        }

        deserializer.deserialize_map(WorkoutsVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardioLog {
    pub completed: Value,
    pub steps: Value,
    pub notes: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CardioLog {
    fn default() -> Self {
        Self {
            completed: Value::Bool(false),
            steps: blank(),
            notes: blank(),
            extra: Map::new(),
        }
    }
}

impl CardioLog {
    fn to_value(&self) -> Value {
        let mut cardio = self.extra.clone();
        cardio.insert("completed".into(), self.completed.clone());
        cardio.insert("steps".into(), self.steps.clone());
        cardio.insert("notes".into(), self.notes.clone());
        Value::Object(cardio)
    }
}

/// A fully populated day as the tracker edits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForm {
    pub date: NaiveDate,
    pub weight: Value,
    pub workouts: Workouts,
    pub cardio: CardioLog,
    pub notes: Value,
    /// Stored fields the tracker does not edit, saved back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DayForm {
    /// The entry a save submits for this form.
    pub fn to_entry(&self) -> LogEntry {
        let mut fields = self.extra.clone();
        fields.insert("weight".into(), self.weight.clone());
        fields.insert("workouts".into(), self.workouts.to_value());
        fields.insert("cardio".into(), self.cardio.to_value());
        fields.insert("notes".into(), self.notes.clone());
        LogEntry::for_date(self.date, fields)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub weight: Value,
}

pub fn blank() -> Value {
    Value::String(String::new())
}

pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: BTreeMap<NaiveDate, LogEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryResponse {
    pub entry: Option<LogEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertResponse {
    pub ok: bool,
    pub entry: LogEntry,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeightsResponse {
    pub weights: Vec<WeightPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: NaiveDate,
    pub assignment: DayPlan,
    pub workout: Option<&'static WorkoutDefinition>,
    pub has_entry: bool,
    pub form: DayForm,
}

#[derive(Debug, Deserialize)]
pub struct SessionEventRequest {
    pub session: TrackerSession,
    pub event: Event,
}

/// What the page renders besides the session itself.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub assignment: DayPlan,
    pub workout: Option<&'static WorkoutDefinition>,
    pub calendar: Vec<[CalendarCell; 7]>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: TrackerSession,
    pub commands: Vec<Command>,
    pub view: SessionView,
}

impl SessionResponse {
    pub fn new(session: TrackerSession, commands: Vec<Command>) -> Self {
        let view = SessionView {
            assignment: session.assignment(),
            workout: session.assignment().workout(),
            calendar: session.month_grid(),
        };
        Self {
            session,
            commands,
            view,
        }
    }
}
