//! In-memory activity registry.
//!
//! Each (activity, student) pair is either enrolled or not. `signup` moves a
//! student into an activity and requires a resolved teacher; `unregister` moves
//! them out and requires nothing. All mutations go through one write lock.

mod catalog;
mod error;

pub use catalog::seed;
pub use error::RegistryError;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub description: String,
    pub schedule: String,
    /// Advisory only, signup does not check it.
    pub max_participants: u32,
    /// Student emails in arrival order.
    pub participants: Vec<String>,
}

/// Activities keyed by name, kept in insertion order.
///
/// Serializes as a JSON object so clients see `{ "<name>": { ... } }`.
pub type Activities = IndexMap<String, ActivityRecord>;

/// Shared registry handed to every request handler.
#[derive(Debug, Default)]
pub struct Registry {
    activities: RwLock<Activities>,
}

impl Registry {
    #[must_use]
    pub fn new(activities: Activities) -> Self {
        Self {
            activities: RwLock::new(activities),
        }
    }

    /// Registry holding the startup catalog.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed())
    }

    /// Snapshot of every activity and its participants.
    pub async fn list(&self) -> Activities {
        self.activities.read().await.clone()
    }

    /// Enroll `email` in `activity` on behalf of `acting_user`.
    ///
    /// # Errors
    /// `Unauthorized` without an acting teacher (checked before anything else),
    /// `NotFound` for an unknown activity and `AlreadyRegistered` when the
    /// email is already enrolled.
    #[instrument(skip(self))]
    pub async fn signup(
        &self,
        activity: &str,
        email: &str,
        acting_user: Option<&str>,
    ) -> Result<String, RegistryError> {
        let Some(teacher) = acting_user else {
            return Err(RegistryError::Unauthorized);
        };

        let mut activities = self.activities.write().await;
        let record = activities
            .get_mut(activity)
            .ok_or(RegistryError::NotFound)?;

        if record.participants.iter().any(|p| p == email) {
            debug!("{email} already enrolled in {activity}");
            return Err(RegistryError::AlreadyRegistered);
        }

        record.participants.push(email.to_string());
        info!(teacher, "Signed up {email} for {activity}");

        Ok(format!("Signed up {email} for {activity}"))
    }

    /// Remove `email` from `activity`. No teacher is required.
    ///
    /// # Errors
    /// `NotFound` for an unknown activity and `NotRegistered` when the email is
    /// not enrolled.
    #[instrument(skip(self))]
    pub async fn unregister(&self, activity: &str, email: &str) -> Result<String, RegistryError> {
        let mut activities = self.activities.write().await;
        let record = activities
            .get_mut(activity)
            .ok_or(RegistryError::NotFound)?;

        let position = record
            .participants
            .iter()
            .position(|p| p == email)
            .ok_or(RegistryError::NotRegistered)?;

        record.participants.remove(position);
        info!("Unregistered {email} from {activity}");

        Ok(format!("Unregistered {email} from {activity}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEACHER: Option<&str> = Some("mrodriguez");

    fn participants(activities: &Activities, name: &str) -> Vec<String> {
        activities
            .get(name)
            .map(|record| record.participants.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn list_returns_seeded_chess_club() {
        let registry = Registry::seeded();
        let activities = registry.list().await;
        assert_eq!(activities.len(), 9);
        assert_eq!(
            participants(&activities, "Chess Club"),
            vec!["michael@mergington.edu", "daniel@mergington.edu"]
        );
    }

    #[tokio::test]
    async fn signup_appends_in_arrival_order() {
        let registry = Registry::seeded();
        let message = registry
            .signup("Chess Club", "new@mergington.edu", TEACHER)
            .await;
        assert_eq!(
            message,
            Ok("Signed up new@mergington.edu for Chess Club".to_string())
        );

        let activities = registry.list().await;
        assert_eq!(
            participants(&activities, "Chess Club"),
            vec![
                "michael@mergington.edu",
                "daniel@mergington.edu",
                "new@mergington.edu"
            ]
        );
    }

    #[tokio::test]
    async fn signup_twice_is_rejected() {
        let registry = Registry::seeded();
        assert!(registry
            .signup("Art Club", "twice@mergington.edu", TEACHER)
            .await
            .is_ok());
        assert_eq!(
            registry
                .signup("Art Club", "twice@mergington.edu", TEACHER)
                .await,
            Err(RegistryError::AlreadyRegistered)
        );
    }

    #[tokio::test]
    async fn signup_without_teacher_is_unauthorized_even_for_unknown_activity() {
        let registry = Registry::seeded();
        for activity in ["Chess Club", "Unknown Club"] {
            assert_eq!(
                registry.signup(activity, "x@mergington.edu", None).await,
                Err(RegistryError::Unauthorized)
            );
        }
        assert_eq!(registry.list().await, seed());
    }

    #[tokio::test]
    async fn unknown_activity_is_not_found() {
        let registry = Registry::seeded();
        assert_eq!(
            registry
                .signup("Unknown Club", "x@mergington.edu", TEACHER)
                .await,
            Err(RegistryError::NotFound)
        );
        assert_eq!(
            registry.unregister("Unknown Club", "x@mergington.edu").await,
            Err(RegistryError::NotFound)
        );
    }

    #[tokio::test]
    async fn unregister_missing_student_is_rejected() {
        let registry = Registry::seeded();
        assert_eq!(
            registry
                .unregister("Math Club", "ghost@mergington.edu")
                .await,
            Err(RegistryError::NotRegistered)
        );
    }

    #[tokio::test]
    async fn signup_then_unregister_restores_state() {
        let registry = Registry::seeded();
        let before = registry.list().await;

        assert!(registry
            .signup("Drama Club", "temp@mergington.edu", TEACHER)
            .await
            .is_ok());
        let message = registry
            .unregister("Drama Club", "temp@mergington.edu")
            .await;
        assert_eq!(
            message,
            Ok("Unregistered temp@mergington.edu from Drama Club".to_string())
        );

        assert_eq!(registry.list().await, before);
    }

    #[tokio::test]
    async fn unregister_removes_only_the_matching_email() {
        let registry = Registry::seeded();
        assert!(registry
            .unregister("Chess Club", "michael@mergington.edu")
            .await
            .is_ok());
        let activities = registry.list().await;
        assert_eq!(
            participants(&activities, "Chess Club"),
            vec!["daniel@mergington.edu"]
        );
        assert_eq!(
            participants(&activities, "Programming Class"),
            vec!["emma@mergington.edu", "sophia@mergington.edu"]
        );
    }

    #[tokio::test]
    async fn capacity_is_not_enforced() {
        let mut activities = seed();
        if let Some(record) = activities.get_mut("Math Club") {
            record.max_participants = 2;
        }
        let registry = Registry::new(activities);
        assert!(registry
            .signup("Math Club", "third@mergington.edu", TEACHER)
            .await
            .is_ok());
        let activities = registry.list().await;
        assert_eq!(
            activities.get("Math Club").map(|r| r.participants.len()),
            Some(3)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_signups_all_land_once() {
        let registry = std::sync::Arc::new(Registry::seeded());
        let emails: Vec<String> = (0..64)
            .map(|n| format!("student{n}@mergington.edu"))
            .collect();

        let tasks: Vec<_> = emails
            .iter()
            .cloned()
            .map(|email| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry.signup("Soccer Team", &email, TEACHER).await
                })
            })
            .collect();

        for task in tasks {
            assert!(matches!(task.await, Ok(Ok(_))));
        }

        let activities = registry.list().await;
        let enrolled = participants(&activities, "Soccer Team");
        assert_eq!(enrolled.len(), 2 + emails.len());
        for email in &emails {
            assert_eq!(enrolled.iter().filter(|p| *p == email).count(), 1);
        }
    }

    #[test]
    fn activities_serialize_as_ordered_object() -> anyhow::Result<()> {
        let json = serde_json::to_string(&seed())?;
        let chess = json.find("\"Chess Club\"");
        let debate = json.find("\"Debate Team\"");
        assert!(chess.is_some() && debate.is_some());
        assert!(chess < debate);

        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(
            value["Chess Club"]["participants"],
            serde_json::json!(["michael@mergington.edu", "daniel@mergington.edu"])
        );
        assert_eq!(value["Chess Club"]["max_participants"], 12);
        Ok(())
    }
}
