//! Data model for assignments, completions, and derived streaks.
//!
//! These types mirror the documents the mobile app reads from the remote
//! document database, hence the camelCase field names on the wire. The
//! only logic here is per-day summarization and lenient decoding of
//! stored day documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One exercise a user must perform, flattened out of a bundle.
///
/// Ephemeral: recomputed from current assignments on every
/// recalculation, never persisted as part of history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedExercise {
    /// Exercise ID
    pub exercise_id: String,
    /// Exercise display name
    pub exercise_name: String,
    /// Bundle the exercise belongs to
    pub bundle_id: String,
    /// Bundle display name
    pub bundle_name: String,
}

/// One exercise's completion record for one day.
///
/// Written once per exercise per day; may be overwritten intra-day when
/// the user re-marks the bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedExercise {
    /// Exercise ID
    pub exercise_id: String,
    /// Exercise display name
    pub exercise_name: String,
    /// Bundle the exercise belongs to
    pub bundle_id: String,
    /// Bundle display name
    pub bundle_name: String,
    /// When the exercise was marked complete
    pub completed_at: DateTime<Utc>,
    /// Whether the exercise was actually completed
    pub completed: bool,
}

/// Streak classification of a single day, assigned by the engine walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakStatus {
    /// No streak in progress and nothing to break
    None,
    /// First day of a new streak (after a gap, or first-ever activity)
    Started,
    /// Consecutive fully-completed day extending an active streak
    Maintained,
    /// A streak was active coming in and this day did not sustain it
    Broken,
}

/// The canonical per-day summary, one per (user, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCompletion {
    /// Calendar day in the user's local timezone, `YYYY-MM-DD`
    pub date: String,
    /// Completion records stored for that day (empty for gap days)
    pub exercises: Vec<CompletedExercise>,
    /// Number of exercises currently assigned to the user
    pub total_assigned: u32,
    /// Number of stored records with `completed == true`
    pub total_completed: u32,
    /// `total_completed / total_assigned * 100`, or 0 when nothing assigned
    pub completion_rate: f64,
    /// True iff every assigned exercise was completed and at least one is assigned
    pub all_exercises_completed: bool,
    /// Derived streak classification for this day
    pub streak_status: StreakStatus,
}

impl DailyCompletion {
    /// Summarize one day's stored records against the current assignment
    /// count.
    ///
    /// `total_assigned` reflects assignments *at recalculation time*, so
    /// past days are reclassified when the assignment set changes. The
    /// status starts as [`StreakStatus::None`]; the engine walk sets it.
    pub fn summarize(
        date: String,
        exercises: Vec<CompletedExercise>,
        total_assigned: u32,
    ) -> Self {
        let total_completed = exercises.iter().filter(|e| e.completed).count() as u32;
        let completion_rate = if total_assigned > 0 {
            f64::from(total_completed) / f64::from(total_assigned) * 100.0
        } else {
            0.0
        };
        let all_exercises_completed = total_assigned > 0 && total_completed == total_assigned;

        Self {
            date,
            exercises,
            total_assigned,
            total_completed,
            completion_rate,
            all_exercises_completed,
            streak_status: StreakStatus::None,
        }
    }
}

/// The derived, authoritative streak record for a user.
///
/// Owned and fully overwritten by the recalculation engine; no other
/// writer may patch it partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    /// Length of the streak active today (0 when none)
    pub current_streak: u32,
    /// Longest streak ever observed in the history
    pub longest_streak: u32,
    /// Day key of the most recent started/maintained day, if any
    pub last_activity_date: Option<String>,
    /// Count of days with at least one completed exercise
    pub total_days_active: u32,
    /// Sum of completed exercises over all days
    pub total_exercises_completed: u32,
    /// Mean completion rate over the full generated timeline
    pub average_completion_rate: f64,
    /// One entry per calendar day from first activity through today
    pub streak_history: Vec<DailyCompletion>,
    /// When this record was derived
    pub last_updated: DateTime<Utc>,
}

/// Decode one stored day document into completion records.
///
/// The stored value is a JSON array of exercise documents. Each element
/// is decoded independently; malformed elements are logged and skipped
/// so one bad record never invalidates the whole day.
pub fn decode_day_doc(user_id: &str, date: &str, doc: &serde_json::Value) -> Vec<CompletedExercise> {
    let Some(items) = doc.as_array() else {
        warn!(user_id, date, "day document is not an array, skipping");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(exercise) => Some(exercise),
            Err(err) => {
                warn!(user_id, date, %err, "skipping malformed exercise record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: &str, completed: bool) -> CompletedExercise {
        CompletedExercise {
            exercise_id: id.to_string(),
            exercise_name: format!("Exercise {id}"),
            bundle_id: "bundle-1".to_string(),
            bundle_name: "Knee Recovery".to_string(),
            completed_at: Utc::now(),
            completed,
        }
    }

    #[test]
    fn test_summarize_full_completion() {
        let day = DailyCompletion::summarize(
            "2025-06-01".to_string(),
            vec![exercise("a", true), exercise("b", true), exercise("c", true)],
            3,
        );
        assert_eq!(day.total_completed, 3);
        assert_eq!(day.completion_rate, 100.0);
        assert!(day.all_exercises_completed);
        assert_eq!(day.streak_status, StreakStatus::None);
    }

    #[test]
    fn test_summarize_partial_completion() {
        let day = DailyCompletion::summarize(
            "2025-06-01".to_string(),
            vec![exercise("a", true), exercise("b", true), exercise("c", false)],
            3,
        );
        assert_eq!(day.total_completed, 2);
        assert!((day.completion_rate - 66.666).abs() < 0.01);
        assert!(!day.all_exercises_completed);
    }

    #[test]
    fn test_summarize_nothing_assigned_is_never_complete() {
        let day = DailyCompletion::summarize(
            "2025-06-01".to_string(),
            vec![exercise("a", true)],
            0,
        );
        assert_eq!(day.total_completed, 1);
        assert_eq!(day.completion_rate, 0.0);
        assert!(!day.all_exercises_completed);
    }

    #[test]
    fn test_summarize_empty_day() {
        let day = DailyCompletion::summarize("2025-06-01".to_string(), Vec::new(), 3);
        assert_eq!(day.total_completed, 0);
        assert_eq!(day.completion_rate, 0.0);
        assert!(!day.all_exercises_completed);
    }

    #[test]
    fn test_decode_day_doc_skips_malformed_elements() {
        let doc = serde_json::json!([
            {
                "exerciseId": "a",
                "exerciseName": "Squat",
                "bundleId": "b1",
                "bundleName": "Knee Recovery",
                "completedAt": "2025-06-01T10:00:00Z",
                "completed": true
            },
            { "garbage": true },
            42
        ]);
        let decoded = decode_day_doc("user-1", "2025-06-01", &doc);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].exercise_id, "a");
    }

    #[test]
    fn test_decode_day_doc_non_array() {
        let decoded = decode_day_doc("user-1", "2025-06-01", &serde_json::json!("nope"));
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let day = DailyCompletion::summarize("2025-06-01".to_string(), Vec::new(), 2);
        let json = serde_json::to_value(&day).unwrap();
        assert!(json.get("totalAssigned").is_some());
        assert!(json.get("allExercisesCompleted").is_some());
        assert_eq!(json["streakStatus"], "none");
    }
}
