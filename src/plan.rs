//! The static training plan: workout definitions, weekly schedule and the
//! guidance text shown alongside the tracker.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkoutId {
    A,
    B,
    C,
}

#[derive(Debug, Serialize)]
pub struct ExercisePrescription {
    /// Join key against logged sets, unique within a workout.
    pub name: &'static str,
    pub sets: u32,
    /// Display-only target, never parsed.
    pub reps: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Block {
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
    pub exercises: &'static [ExercisePrescription],
}

#[derive(Debug, Serialize)]
pub struct WorkoutDefinition {
    pub id: WorkoutId,
    pub name: &'static str,
    pub blocks: &'static [Block],
}

impl WorkoutDefinition {
    /// Every prescription in block order.
    pub fn exercises(&self) -> impl Iterator<Item = &'static ExercisePrescription> + use<> {
        let blocks: &'static [Block] = self.blocks;
        blocks.iter().flat_map(|block| block.exercises.iter())
    }
}

#[derive(Debug, Serialize)]
pub struct Phase {
    pub name: &'static str,
    pub goal: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    pub targets: &'static [&'static str],
    pub batch_prep: &'static [&'static str],
    pub daily_meals: &'static [&'static str],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub title: &'static str,
    pub schedule: &'static str,
    pub equipment: &'static str,
    pub diet: &'static str,
    pub phase: Phase,
    pub warmup: &'static [&'static str],
    pub workouts: &'static [WorkoutDefinition],
    pub post_lift_cardio: &'static str,
    pub cardio_strategy: &'static [&'static str],
    pub nutrition: Nutrition,
    pub progression: &'static [&'static str],
    pub troubleshooting: &'static [&'static str],
    pub weekday_labels: &'static [&'static str],
}

/// What the schedule prescribes for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DayPlan {
    Lifting { key: WorkoutId },
    Cardio,
    Rest,
}

impl DayPlan {
    pub fn workout(&self) -> Option<&'static WorkoutDefinition> {
        match self {
            DayPlan::Lifting { key } => Some(workout(*key)),
            DayPlan::Cardio | DayPlan::Rest => None,
        }
    }
}

const LIFTING_DAYS: [(Weekday, WorkoutId); 3] = [
    (Weekday::Mon, WorkoutId::A),
    (Weekday::Wed, WorkoutId::B),
    (Weekday::Fri, WorkoutId::C),
];

const CARDIO_DAYS: [Weekday; 3] = [Weekday::Tue, Weekday::Thu, Weekday::Sat];

pub fn workout_for_date(date: NaiveDate) -> DayPlan {
    workout_for_weekday(date.weekday())
}

pub fn workout_for_weekday(day: Weekday) -> DayPlan {
    if let Some((_, key)) = LIFTING_DAYS.iter().find(|(weekday, _)| *weekday == day) {
        return DayPlan::Lifting { key: *key };
    }
    if CARDIO_DAYS.contains(&day) {
        return DayPlan::Cardio;
    }
    DayPlan::Rest
}

pub fn workout(id: WorkoutId) -> &'static WorkoutDefinition {
    match id {
        WorkoutId::A => &PLAN.workouts[0],
        WorkoutId::B => &PLAN.workouts[1],
        WorkoutId::C => &PLAN.workouts[2],
    }
}

pub fn plan() -> &'static Plan {
    &PLAN
}

const fn exercise(name: &'static str, sets: u32, reps: &'static str) -> ExercisePrescription {
    ExercisePrescription {
        name,
        sets,
        reps,
        note: None,
    }
}

const fn noted(
    name: &'static str,
    sets: u32,
    reps: &'static str,
    note: &'static str,
) -> ExercisePrescription {
    ExercisePrescription {
        name,
        sets,
        reps,
        note: Some(note),
    }
}

const SUPERSET: Option<&str> = Some("A1 then A2, rest 90s.");

static PLAN: Plan = Plan {
    title: "The WFH Dad Recomp",
    schedule: "M/W/F Lifting (Morning) | T/Th/Sat Cardio & Recovery",
    equipment: "Planet Fitness specific",
    diet: "Low-FODMAP, High Protein",
    phase: Phase {
        name: "Phase 1: The Wake Up (Weeks 1–4)",
        goal: "Re-establish neuromuscular connection, condition tendons, establish the routine.",
    },
    warmup: &[
        "5 min incline walk (get a sweat going).",
        "Arm circles & leg swings.",
        "1 set of 15 face pulls (light weight) to wake up rear delts/posture.",
    ],
    workouts: &[
        WorkoutDefinition {
            id: WorkoutId::A,
            name: "Workout A (Monday)",
            blocks: &[
                Block {
                    title: "Primary",
                    note: None,
                    exercises: &[noted(
                        "Smith Machine Squats",
                        3,
                        "8–10",
                        "Rest 2 mins (no superset).",
                    )],
                },
                Block {
                    title: "Antagonist Pair",
                    note: SUPERSET,
                    exercises: &[
                        exercise("Dumbbell Bench Press", 3, "10–12"),
                        exercise("Lat Pulldowns (Wide Grip)", 3, "10–12"),
                    ],
                },
                Block {
                    title: "Accessory Pair",
                    note: SUPERSET,
                    exercises: &[
                        exercise("Tricep Rope Pushdowns", 2, "12–15"),
                        exercise("Dumbbell Bicep Curls", 2, "12–15"),
                    ],
                },
                Block {
                    title: "Core",
                    note: None,
                    exercises: &[exercise("Plank", 3, "45 sec")],
                },
            ],
        },
        WorkoutDefinition {
            id: WorkoutId::B,
            name: "Workout B (Wednesday)",
            blocks: &[
                Block {
                    title: "Primary",
                    note: None,
                    exercises: &[noted(
                        "Smith Machine Romanian Deadlift (RDL)",
                        3,
                        "8–10",
                        "Focus on pushing hips back.",
                    )],
                },
                Block {
                    title: "Antagonist Pair",
                    note: SUPERSET,
                    exercises: &[
                        exercise("Seated Cable Row (or Machine Row)", 3, "10–12"),
                        exercise("Overhead Dumbbell Press", 3, "10–12"),
                    ],
                },
                Block {
                    title: "Accessory Pair",
                    note: None,
                    exercises: &[
                        exercise("Face Pulls", 3, "15"),
                        exercise("Lateral Raises (DB or Machine)", 3, "12–15"),
                    ],
                },
                Block {
                    title: "Core",
                    note: None,
                    exercises: &[exercise("Cable or Machine Crunch", 3, "15")],
                },
            ],
        },
        WorkoutDefinition {
            id: WorkoutId::C,
            name: "Workout C (Friday)",
            blocks: &[
                Block {
                    title: "Primary",
                    note: None,
                    exercises: &[noted("Leg Press", 3, "10–12", "Heavy but controlled.")],
                },
                Block {
                    title: "Antagonist Pair",
                    note: None,
                    exercises: &[
                        exercise("Incline Dumbbell Press", 3, "10–12"),
                        noted(
                            "Assisted Pull-Up Machine",
                            3,
                            "8–10",
                            "If unavailable, use Close-Grip Lat Pulldowns.",
                        ),
                    ],
                },
                Block {
                    title: "Accessory",
                    note: None,
                    exercises: &[noted(
                        "Smith Machine Reverse Lunges",
                        2,
                        "10/leg",
                        "Better for knees and balance.",
                    )],
                },
                Block {
                    title: "Core",
                    note: None,
                    exercises: &[exercise("Hanging Knee Raises (Captain's Chair)", 3, "10–15")],
                },
            ],
        },
    ],
    post_lift_cardio: "15 min incline walk, incline 10–12, speed 3.0.",
    cardio_strategy: &[
        "Post-lift cardio (M/W/F): 15 min incline walk, incline 10–12, speed 3.0.",
        "Cognitive commute (T/Th): 20–30 min brisk walk before work.",
        "Step goal: 8,000 steps daily.",
    ],
    nutrition: Nutrition {
        targets: &["Calories: 2,000–2,200 kcals", "Protein: 180g (non-negotiable)"],
        batch_prep: &[
            "3–4 lbs chicken breast or thighs, baked with salt/pepper/oregano.",
            "Big batch of white rice or roasted potatoes.",
            "Frozen green beans or spinach for quick veg.",
        ],
        daily_meals: &[
            "Breakfast: oatmeal + whey isolate + blueberries + walnuts.",
            "Lunch: prepped chicken + rice + spinach with garlic-infused olive oil + lemon.",
            "Snack: rice cake + peanut butter + kiwi or orange.",
            "Dinner: ground beef tacos with FODMAP-safe seasoning on corn tortillas.",
        ],
    },
    progression: &[
        "Start at the bottom of the rep range.",
        "Stay at that weight until you hit the top of the range for all sets.",
        "Increase weight by 5–10 lbs and repeat.",
        "Log everything.",
    ],
    troubleshooting: &[
        "2:00 PM crash: 20 air squats + 16oz cold water (no extra coffee).",
        "Hybrid office days: pack lunch, oil/vinegar on the side.",
        "Poor sleep: drop one set per exercise but keep the routine.",
    ],
    weekday_labels: &["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
};
