use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Time-of-day partition of a user's tasks.
///
/// Declaration order is the display order; groups are always rebuilt in this
/// order regardless of the order responses arrive in.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter,
    EnumString, AsRefStr,
)]
pub(crate) enum ChecklistType {
    #[default]
    Morning,
    LateMorning,
    Afternoon,
    Evening,
    Night,
}

impl ChecklistType {
    pub fn all() -> Vec<ChecklistType> {
        ChecklistType::iter().collect()
    }
}

/// Which retrieval endpoint a checklist view reads from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum PriorityTier {
    /// High/normal priority tasks (main checklist).
    #[default]
    Priority,
    Low,
}

impl PriorityTier {
    pub fn fetch_path(self) -> &'static str {
        match self {
            PriorityTier::Priority => "/checklist/getpriority",
            PriorityTier::Low => "/checklist/getLowpriority",
        }
    }

    /// Priority tag stamped on items created from this view.
    pub fn item_tag(self) -> &'static str {
        match self {
            PriorityTier::Priority => "high",
            PriorityTier::Low => "low",
        }
    }

    /// Shown when a whole load fails.
    pub fn load_error(self) -> &'static str {
        match self {
            PriorityTier::Priority => "An error occurred while fetching the checklist.",
            PriorityTier::Low => "An error occurred while fetching Low-priority tasks.",
        }
    }

    pub fn log_tag(self) -> &'static str {
        match self {
            PriorityTier::Priority => "[Checklist]",
            PriorityTier::Low => "[LowPriority]",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChecklistGroup {
    pub checklist_type: ChecklistType,
    pub items: Vec<Task>,
}

/// Mood captured with a reflection. The empty variant is "not selected".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display, EnumString, AsRefStr)]
pub(crate) enum Feeling {
    #[default]
    #[strum(to_string = "")]
    Unset,
    Good,
    Great,
    Bad,
}

impl Feeling {
    pub const CHOICES: [Feeling; 3] = [Feeling::Good, Feeling::Great, Feeling::Bad];

    pub fn from_form(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl Serialize for Feeling {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ReflectionDraft {
    pub feeling: Feeling,
    pub context: String,
}

/// Activity log entry written when a task is completed with a reflection.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActivityRecord {
    pub user_id: String,
    pub date: String,
    pub name: String,
    pub time: String,
    pub context: String,
    pub feeling: Feeling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Gender {
    #[default]
    #[strum(to_string = "")]
    Unset,
    Male,
    Female,
}

impl Gender {
    pub fn from_form(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// Profile as stored by the backend. Numeric fields are frequently missing
/// for new accounts.
#[derive(Deserialize, Clone, Debug, Default)]
pub(crate) struct ProfileRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub height: Option<f64>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct TierStats {
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub pending: u32,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PriorityStats {
    #[serde(default)]
    pub high: TierStats,
    #[serde(default)]
    pub medium: TierStats,
    #[serde(default)]
    pub low: TierStats,
}

/// Report payload computed by the backend for one date (and one checklist
/// type, or all of them for the combined report).
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Report {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub checklist_type: String,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub pending_tasks: u32,
    #[serde(default, deserialize_with = "lenient_number")]
    pub completion_percentage: Option<f64>,
    #[serde(default)]
    pub priority_stats: PriorityStats,
}

/// Accepts `12.5`, `"12.5"`, `""` and `null`. Backend numbers round-trip
/// through form strings and come back in either shape.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checklist_types_keep_declaration_order() {
        let names: Vec<String> = ChecklistType::all().iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            vec!["Morning", "LateMorning", "Afternoon", "Evening", "Night"]
        );
        assert_eq!("Evening".parse::<ChecklistType>().ok(), Some(ChecklistType::Evening));
    }

    #[test]
    fn test_task_contract_deserialize() {
        let json = r#"{"_id": "t1", "name": "Stretch", "completed": true}"#;
        let task: Task = serde_json::from_str(json).expect("task should parse");
        assert_eq!(task.id, "t1");
        assert!(task.completed);
        assert!(task.note.is_none());
    }

    #[test]
    fn test_feeling_serializes_as_form_value() {
        assert_eq!(serde_json::to_value(Feeling::Unset).unwrap(), "");
        assert_eq!(serde_json::to_value(Feeling::Great).unwrap(), "Great");
        assert_eq!(Feeling::from_form("Bad"), Feeling::Bad);
        assert_eq!(Feeling::from_form("meh"), Feeling::Unset);
    }

    #[test]
    fn test_gender_parses_lowercase_form_values() {
        assert_eq!(Gender::from_form("male"), Gender::Male);
        assert_eq!(Gender::from_form("female"), Gender::Female);
        assert_eq!(Gender::from_form(""), Gender::Unset);
        assert_eq!(Gender::Female.as_ref(), "female");
    }

    #[test]
    fn test_report_contract_deserialize_with_string_percentage() {
        let json = r#"{
            "date": "2024-03-01",
            "checklistType": "Morning",
            "completedTasks": 3,
            "pendingTasks": 1,
            "completionPercentage": "75.00",
            "priorityStats": {"high": {"completed": 2}, "medium": {"completed": 1}, "low": {}}
        }"#;
        let report: Report = serde_json::from_str(json).expect("report should parse");
        assert_eq!(report.completion_percentage, Some(75.0));
        assert_eq!(report.priority_stats.high.completed, 2);
        assert_eq!(report.priority_stats.low.completed, 0);
    }

    #[test]
    fn test_profile_record_accepts_missing_numbers() {
        let json = r#"{"name": "A", "email": "a@example.com", "weight": null, "height": "175", "BMI": 21.5}"#;
        let p: ProfileRecord = serde_json::from_str(json).expect("profile should parse");
        assert!(p.weight.is_none());
        assert_eq!(p.height, Some(175.0));
    }
}
