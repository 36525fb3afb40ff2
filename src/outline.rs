//! Freeform-response sectionizer.
//!
//! Turns one block of model-generated prose into a navigable outline:
//!
//! ```text
//! **Workout Plan**            -> Section { title: "Workout Plan", content: Workout(days) }
//! Day 1                       ->   "Day 1" => DayPlan
//! Warm-up                     ->     SubSection { title: "Warm-up" }
//! - jog 5 min                 ->       "jog 5 min"
//! **Meal Plan**               -> Section { title: "Meal Plan", content: Lines([...]) }
//! * Breakfast: eggs           ->   "Breakfast: eggs"
//! ```
//!
//! Parsing never fails. Unrecognised input degrades to an empty or partial
//! outline because the upstream text is unvalidated model output.
//!
//! Known sharp edges, kept on purpose:
//! - lines inside "Workout Plan" that precede the first `Day N` marker are dropped;
//! - a repeated day label replaces the earlier day's content in place.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

/// Title of the one section that gets the per-day breakdown.
pub const WORKOUT_PLAN_TITLE: &str = "Workout Plan";

/// Subsection headings recognised inside a day, evaluated in order.
/// A line starting with one of these prefixes opens a new subsection.
pub const SUBSECTION_HEADINGS: &[&str] = &[
    "Warm-up",
    "Main Workout",
    "Cool-down",
    "Cardio",
    "Strength Training",
    "Flexibility",
    "Progression",
];

static HEADING_RE: OnceLock<Option<Regex>> = OnceLock::new();
static BULLET_RE: OnceLock<Option<Regex>> = OnceLock::new();
static DAY_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn heading_re() -> Option<&'static Regex> {
    HEADING_RE
        .get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").ok())
        .as_ref()
}

fn bullet_re() -> Option<&'static Regex> {
    BULLET_RE.get_or_init(|| Regex::new(r"^[*-]\s*").ok()).as_ref()
}

fn day_re() -> Option<&'static Regex> {
    DAY_RE.get_or_init(|| Regex::new(r"^Day \d+").ok()).as_ref()
}

/// A titled top-level block of a generated response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: OutlineContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum OutlineContent {
    /// Cleaned lines of a generic section.
    Lines(Vec<String>),
    /// Per-day breakdown of the "Workout Plan" section.
    Workout(WorkoutDays),
}

/// One day of a workout section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Lines under the day that precede any subsection heading.
    pub content: Vec<String>,
    pub sections: Vec<SubSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSection {
    pub title: String,
    pub content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub label: String,
    pub plan: DayPlan,
}

/// Day plans keyed by their literal label, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutDays {
    entries: Vec<DayEntry>,
}

impl WorkoutDays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a day plan and return its position.
    ///
    /// An existing label keeps its position but its plan is replaced.
    pub fn insert(&mut self, label: String, plan: DayPlan) -> usize {
        if let Some(idx) = self.entries.iter().position(|e| e.label == label) {
            debug!(day = %label, "repeated day label, replacing earlier plan");
            self.entries[idx].plan = plan;
            return idx;
        }
        self.entries.push(DayEntry { label, plan });
        self.entries.len() - 1
    }

    pub fn get(&self, label: &str) -> Option<&DayPlan> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| &e.plan)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DayPlan)> {
        self.entries.iter().map(|e| (e.label.as_str(), &e.plan))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn plan_at_mut(&mut self, idx: usize) -> Option<&mut DayPlan> {
        self.entries.get_mut(idx).map(|e| &mut e.plan)
    }
}

impl Section {
    pub fn workout_days(&self) -> Option<&WorkoutDays> {
        match &self.content {
            OutlineContent::Workout(days) => Some(days),
            OutlineContent::Lines(_) => None,
        }
    }

    pub fn lines(&self) -> Option<&[String]> {
        match &self.content {
            OutlineContent::Lines(lines) => Some(lines),
            OutlineContent::Workout(_) => None,
        }
    }
}

/// First section with the given title, if any.
pub fn find_section<'a>(sections: &'a [Section], title: &str) -> Option<&'a Section> {
    sections.iter().find(|s| s.title == title)
}

/// The parsed "Workout Plan" days, if the response had that section.
pub fn workout_plan(sections: &[Section]) -> Option<&WorkoutDays> {
    find_section(sections, WORKOUT_PLAN_TITLE).and_then(Section::workout_days)
}

/// Sectionize a generated response.
pub fn parse(raw: &str) -> Vec<Section> {
    let Some(re) = heading_re() else {
        return Vec::new();
    };

    let headings: Vec<_> = re
        .captures_iter(raw)
        .filter_map(|caps| Some((caps.get(0)?, caps.get(1)?)))
        .collect();

    let mut sections = Vec::with_capacity(headings.len());
    for (i, (marker, heading)) in headings.iter().enumerate() {
        let title = heading.as_str().trim();
        if title.is_empty() {
            continue;
        }

        let body_end = headings
            .get(i + 1)
            .map_or(raw.len(), |(next, _)| next.start());
        let lines = clean_lines(&raw[marker.end()..body_end]);

        let content = if title == WORKOUT_PLAN_TITLE {
            OutlineContent::Workout(fold_workout(lines))
        } else {
            OutlineContent::Lines(lines)
        };
        sections.push(Section {
            title: title.to_string(),
            content,
        });
    }

    debug!(sections = sections.len(), "sectionized response");
    sections
}

/// Sectionize a JSON value. Anything but a JSON string yields no sections.
pub fn parse_value(raw: &Value) -> Vec<Section> {
    match raw {
        Value::String(text) => parse(text),
        other => {
            debug!(kind = value_kind(other), "non-string response, nothing to parse");
            Vec::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Split a section body into trimmed, non-blank lines without bullet markers.
fn clean_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    match bullet_re().and_then(|re| re.find(line)) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

fn is_day_marker(line: &str) -> bool {
    day_re().is_some_and(|re| re.is_match(line))
}

/// The subsection heading a line opens, first match wins.
pub fn subsection_heading(line: &str) -> Option<&'static str> {
    SUBSECTION_HEADINGS
        .iter()
        .copied()
        .find(|prefix| line.starts_with(prefix))
}

/// Where the next plain line of a workout section goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    NoDay,
    InDay(usize),
    InSubSection(usize, usize),
}

fn fold_workout(lines: Vec<String>) -> WorkoutDays {
    let mut days = WorkoutDays::new();
    let mut cursor = Cursor::NoDay;
    for line in lines {
        cursor = step(&mut days, cursor, line);
    }
    days
}

fn step(days: &mut WorkoutDays, cursor: Cursor, line: String) -> Cursor {
    if is_day_marker(&line) {
        return Cursor::InDay(days.insert(line, DayPlan::default()));
    }

    let day = match cursor {
        Cursor::NoDay => {
            debug!(line = %line, "line before first day marker dropped");
            return Cursor::NoDay;
        }
        Cursor::InDay(day) | Cursor::InSubSection(day, _) => day,
    };
    let Some(plan) = days.plan_at_mut(day) else {
        return Cursor::NoDay;
    };

    if subsection_heading(&line).is_some() {
        plan.sections.push(SubSection {
            title: line,
            content: Vec::new(),
        });
        return Cursor::InSubSection(day, plan.sections.len() - 1);
    }

    match cursor {
        Cursor::InSubSection(_, sub) => match plan.sections.get_mut(sub) {
            Some(section) => section.content.push(line),
            None => plan.content.push(line),
        },
        _ => plan.content.push(line),
    }
    cursor
}
