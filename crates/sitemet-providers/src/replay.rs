//! Canned provider for tests and local demos

use crate::{
    CurrentConditions, CurrentProvider, HistoricalProvider, HistoricalRequest, HourlyRecord,
    ProviderError, ProviderResult,
};

/// Provider that replays a fixed batch regardless of the request.
#[derive(Debug, Clone, Default)]
pub struct ReplayProvider {
    records: Vec<HourlyRecord>,
    current: Option<CurrentConditions>,
}

impl ReplayProvider {
    pub fn new(records: Vec<HourlyRecord>) -> Self {
        Self {
            records,
            current: None,
        }
    }

    pub fn with_current(mut self, current: CurrentConditions) -> Self {
        self.current = Some(current);
        self
    }
}

#[async_trait::async_trait]
impl HistoricalProvider for ReplayProvider {
    async fn hourly(&self, _request: &HistoricalRequest) -> ProviderResult<Vec<HourlyRecord>> {
        Ok(self.records.clone())
    }
}

#[async_trait::async_trait]
impl CurrentProvider for ReplayProvider {
    async fn current(&self, _place_id: &str) -> ProviderResult<CurrentConditions> {
        self.current
            .clone()
            .ok_or_else(|| ProviderError::Transport("replay has no current conditions".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn any_request() -> HistoricalRequest {
        HistoricalRequest {
            lat: -23.36,
            lon: 119.73,
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            timezone: "Australia/Perth".to_string(),
            units: "metric".to_string(),
        }
    }

    #[tokio::test]
    async fn replays_the_canned_batch() {
        let record = HourlyRecord {
            time: "2024-03-01 10:00:00".to_string(),
            temp: Some(30.0),
            rhum: Some(20.0),
            wspd: Some(10.0),
            wdir: Some(45.0),
            prcp: Some(0.0),
        };
        let provider = ReplayProvider::new(vec![record.clone()]);

        let rows = provider.hourly(&any_request()).await.unwrap();
        assert_eq!(rows, vec![record]);
    }

    #[tokio::test]
    async fn current_errors_without_a_canned_snapshot() {
        let provider = ReplayProvider::new(Vec::new());
        assert!(provider.current("any-place").await.is_err());
    }
}
