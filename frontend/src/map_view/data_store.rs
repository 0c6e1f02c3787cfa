use shared::{CatchId, CatchRecord, FilterState, compute_visible};

use crate::catch_service::FetchError;
use crate::platform::MapPlatform;

/// Catch records of the current activation, in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStore {
    records: Vec<CatchRecord>,
}

impl DataStore {
    pub fn new(records: Vec<CatchRecord>) -> Self {
        Self { records }
    }

    /// One attempt, no retry. A failure is returned for the caller to surface.
    pub async fn load<P: MapPlatform>(platform: &P) -> Result<Self, FetchError> {
        Ok(Self::new(platform.fetch_catches().await?))
    }

    #[cfg(test)]
    pub fn records(&self) -> &[CatchRecord] {
        &self.records
    }

    pub fn visible(&self, filter: &FilterState) -> Vec<&CatchRecord> {
        compute_visible(&self.records, filter)
    }

    pub fn find(&self, catch_id: CatchId) -> Option<&CatchRecord> {
        self.records.iter().find(|record| record.id == catch_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_view::testing::{FakePlatform, record};

    #[tokio::test]
    async fn test_load_keeps_service_order() {
        let platform = FakePlatform::default();
        platform.respond_with(Ok(vec![
            record(5, "Zander", 70.0, 3000.0, "55.0,11.0", "carl"),
            record(2, "Perch", 15.0, 150.0, "57.0,13.0", "bob"),
        ]));

        let store = DataStore::load(&platform).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].id, CatchId(5));
        assert_eq!(store.find(CatchId(2)).map(|r| r.species.as_str()), Some("Perch"));
        assert!(store.find(CatchId(9)).is_none());
    }

    #[tokio::test]
    async fn test_load_failure_is_a_value() {
        let platform = FakePlatform::default();
        platform.respond_with(Err(FetchError::Service("Database unavailable".to_string())));

        let error = DataStore::load(&platform).await.unwrap_err();
        assert_eq!(error.user_message(), "Database unavailable");
    }

    #[test]
    fn test_visible_applies_filter() {
        let store = DataStore::new(vec![
            record(1, "Pike", 40.0, 1200.0, "56.0,12.5", "alice"),
            record(2, "Perch", 15.0, 150.0, "57.0,13.0", "bob"),
        ]);
        let filter = FilterState {
            species_substring: "PERCH".to_string(),
            ..FilterState::widest()
        };
        let visible = store.visible(&filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, CatchId(2));
        assert!(DataStore::default().is_empty());
    }
}
