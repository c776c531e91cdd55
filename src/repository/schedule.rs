use crate::config::{SCHEDULE_KEY, SCHEDULE_TABLE};
use crate::error::{PlannerError, PlannerResult};
use crate::schedule::{ScheduleEntry, ScheduleFields, ScheduleId, SchedulePatch};
use crate::store::StoreAdapter;
use crate::traits::{KeyMatch, OrderBy, Store};

use super::{fetch_error, write_error};

/// Read and write schedule entries
pub struct ScheduleRepository<S> {
    store: StoreAdapter<S>,
}

impl<S: Store> ScheduleRepository<S> {
    pub fn new(store: StoreAdapter<S>) -> Self {
        Self { store }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_available()
    }

    /// Returns every schedule entry, by day of the week then time.
    ///
    /// The store is asked to sort as well, but it only knows day names as text, so the final order is always set here.
    pub async fn try_list(&self) -> PlannerResult<Vec<ScheduleEntry>> {
        let mut entries: Vec<ScheduleEntry> = self.store
            .list(SCHEDULE_TABLE, &[OrderBy::asc("dia"), OrderBy::asc("hora")])
            .await
            .map_err(|err| fetch_error(err, "Could not fetch the schedule"))?;

        entries.sort_by(|a, b| a.display_order(b));
        Ok(entries)
    }

    /// Same as [`Self::try_list`], but a failure is only logged, and yields an empty schedule
    pub async fn list(&self) -> Vec<ScheduleEntry> {
        match self.try_list().await {
            Ok(entries) => entries,
            Err(err) => {
                log::error!("{}", err);
                Vec::new()
            },
        }
    }

    /// Insert a new entry, and returns the identifier it has been given
    pub async fn create(&self, fields: ScheduleFields) -> PlannerResult<ScheduleId> {
        let id = ScheduleId::generate();
        let entry = ScheduleEntry::new(id.clone(), fields);

        self.store.create(SCHEDULE_TABLE, &entry).await
            .map_err(|err| write_error(err, PlannerError::CreateFailed, "Could not create the schedule entry"))?;
        log::info!("Created schedule entry {}", id);
        Ok(id)
    }

    /// Replace the fields present in `patch` (a [`ScheduleFields`] replaces all of them)
    pub async fn update<P: Into<SchedulePatch>>(&self, id: &ScheduleId, patch: P) -> PlannerResult<()> {
        let patch = patch.into();
        self.store.update(SCHEDULE_TABLE, &key(id), &patch).await
            .map_err(|err| write_error(err, PlannerError::UpdateFailed, "Could not update the schedule entry"))?;
        log::info!("Updated schedule entry {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: &ScheduleId) -> PlannerResult<()> {
        self.store.delete(SCHEDULE_TABLE, &key(id)).await
            .map_err(|err| write_error(err, PlannerError::DeleteFailed, "Could not delete the schedule entry"))?;
        log::info!("Deleted schedule entry {}", id);
        Ok(())
    }
}

fn key(id: &ScheduleId) -> KeyMatch {
    KeyMatch::new(SCHEDULE_KEY, id.as_str())
}

#[cfg(test)]
mod test {
    use super::*;

    use std::sync::Arc;

    use serde_json::json;

    use crate::mock_behaviour::MockBehaviour;
    use crate::schedule::Weekday;
    use crate::store::memory::MemoryStore;

    fn repository() -> (Arc<MemoryStore>, ScheduleRepository<MemoryStore>) {
        let store = Arc::new(MemoryStore::for_planner());
        let repo = ScheduleRepository::new(StoreAdapter::new(Some(store.clone())));
        (store, repo)
    }

    fn fields(day: Weekday, time: &str, subject: &str) -> ScheduleFields {
        ScheduleFields::new(day, time, subject).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (_store, repo) = repository();
        let id = repo.create(fields(Weekday::Monday, "08:00", "Math")).await.unwrap();
        assert!(id.as_str().is_empty() == false);

        let entries = repo.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), &id);
        assert_eq!(entries[0].day(), Weekday::Monday);
        assert_eq!(entries[0].time(), "08:00");
        assert_eq!(entries[0].subject(), "Math");
    }

    #[tokio::test]
    async fn test_list_is_in_week_order() {
        let (_store, repo) = repository();
        // Inserted in an order that is neither week order nor lexical order
        for (day, time) in &[
            (Weekday::Sunday, "09:00"),
            (Weekday::Wednesday, "14:00"),
            (Weekday::Monday, "10:00"),
            (Weekday::Wednesday, "08:30"),
            (Weekday::Saturday, "11:00"),
            (Weekday::Monday, "07:45"),
        ] {
            repo.create(fields(*day, time, "Class")).await.unwrap();
        }

        let order: Vec<(Weekday, String)> = repo.list().await.iter()
            .map(|e| (e.day(), e.time().to_string()))
            .collect();
        assert_eq!(order, vec![
            (Weekday::Monday, "07:45".to_string()),
            (Weekday::Monday, "10:00".to_string()),
            (Weekday::Wednesday, "08:30".to_string()),
            (Weekday::Wednesday, "14:00".to_string()),
            (Weekday::Saturday, "11:00".to_string()),
            (Weekday::Sunday, "09:00".to_string()),
        ]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (store, repo) = repository();
        let id = repo.create(fields(Weekday::Tuesday, "09:00", "Chemistry").with_room("Lab 2")).await.unwrap();
        let other = repo.create(fields(Weekday::Tuesday, "11:00", "Biology")).await.unwrap();

        repo.update(&id, fields(Weekday::Thursday, "10:00", "Organic chemistry")).await.unwrap();
        let entries = repo.list().await;
        let updated = entries.iter().find(|e| e.id() == &id).unwrap();
        assert_eq!(updated.day(), Weekday::Thursday);
        assert_eq!(updated.subject(), "Organic chemistry");
        // A full update clears the optional fields that are not set
        assert_eq!(updated.room(), None);

        let patch = SchedulePatch { room: Some(Some("A1".to_string())), ..SchedulePatch::default() };
        repo.update(&other, patch).await.unwrap();
        repo.delete(&id).await.unwrap();

        let entries = repo.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].room(), Some("A1"));
        assert_eq!(entries[0].subject(), "Biology");
        assert_eq!(store.rows(SCHEDULE_TABLE)[0]["materia"], json!("Biology"));
    }

    #[tokio::test]
    async fn test_failures() {
        let (store, repo) = repository();
        repo.create(fields(Weekday::Friday, "16:00", "Music")).await.unwrap();

        store.set_mock_behaviour(MockBehaviour::fail_now(1));
        assert!(repo.list().await.is_empty());
        assert!(matches!(repo.create(fields(Weekday::Friday, "17:00", "Dance")).await, Err(PlannerError::CreateFailed(_))));
        assert!(matches!(repo.update(&ScheduleId::from("x"), fields(Weekday::Friday, "17:00", "Dance")).await, Err(PlannerError::UpdateFailed(_))));
        assert!(matches!(repo.delete(&ScheduleId::from("x")).await, Err(PlannerError::DeleteFailed(_))));

        // Every behaviour has been consumed: the store works again
        assert_eq!(repo.list().await.len(), 1);

        store.set_mock_behaviour(MockBehaviour::fail_now(1));
        assert!(matches!(repo.try_list().await, Err(PlannerError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_timestamp_identifiers_delete_one_entry() {
        let (_store, repo) = repository();
        // Entries inserted back to back with timestamp identifiers, as on a platform with no random source
        let a = ScheduleId::from_timestamp();
        let b = ScheduleId::from_timestamp();
        repo.store.create(SCHEDULE_TABLE, &ScheduleEntry::new(a.clone(), fields(Weekday::Monday, "08:00", "Math"))).await.unwrap();
        repo.store.create(SCHEDULE_TABLE, &ScheduleEntry::new(b.clone(), fields(Weekday::Monday, "09:00", "Physics"))).await.unwrap();

        repo.delete(&a).await.unwrap();
        let entries = repo.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), &b);
    }

    #[tokio::test]
    async fn test_no_client() {
        let repo = ScheduleRepository::<MemoryStore>::new(StoreAdapter::unavailable());
        assert_eq!(repo.is_available(), false);
        assert!(repo.list().await.is_empty());
        assert_eq!(repo.create(fields(Weekday::Monday, "08:00", "Math")).await, Err(PlannerError::ClientUnavailable));
        assert_eq!(repo.delete(&ScheduleId::from("x")).await, Err(PlannerError::ClientUnavailable));
    }
}
