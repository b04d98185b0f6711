//! Granularity selection and bucket aggregation

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AggregatedPoint, RawObservation};

/// Time-bucket width, chosen from the query span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hourly,
    Daily,
    Monthly,
}

impl Granularity {
    /// Select the bucket width for a date-bounded query. Bounds are whole
    /// dates, so the span in days is exact and needs no rounding.
    pub fn for_span(start: NaiveDate, end: NaiveDate) -> Self {
        Self::for_span_days((end - start).num_days())
    }

    /// `span <= 7` hourly, `7 < span <= 61` daily, `span > 61` monthly.
    pub fn for_span_days(days: i64) -> Self {
        if days <= 7 {
            Self::Hourly
        } else if days <= 61 {
            Self::Daily
        } else {
            Self::Monthly
        }
    }

    /// Display key for the bucket containing `timestamp`.
    fn bucket_key(self, timestamp: DateTime<Utc>) -> String {
        match self {
            Self::Hourly => timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            Self::Daily => timestamp.format("%Y-%m-%d").to_string(),
            Self::Monthly => timestamp.format("%Y-%m").to_string(),
        }
    }

    /// Start instant of the bucket containing `timestamp`. This, not the
    /// key string, is what buckets sort on.
    fn bucket_start(self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let date = timestamp.date_naive();
        let floored = match self {
            Self::Hourly => return timestamp,
            Self::Daily => date,
            Self::Monthly => date.with_day(1).unwrap_or(date),
        };
        floored.and_time(NaiveTime::MIN).and_utc()
    }
}

/// Running mean over the non-null values of one bucket field.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: u32,
}

impl MeanAccumulator {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    /// `None` when no contributor was present: a true "no data" marker,
    /// distinct from a measured zero.
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

#[derive(Debug, Clone)]
struct Bucket {
    key: String,
    start: DateTime<Utc>,
    rainfall_sum: f64,
    temperature: MeanAccumulator,
    humidity: MeanAccumulator,
    wind_speed: MeanAccumulator,
}

impl Bucket {
    fn new(key: String, start: DateTime<Utc>) -> Self {
        Self {
            key,
            start,
            rainfall_sum: 0.0,
            temperature: MeanAccumulator::default(),
            humidity: MeanAccumulator::default(),
            wind_speed: MeanAccumulator::default(),
        }
    }

    fn add(&mut self, obs: &RawObservation) {
        self.rainfall_sum += obs.rainfall_mm;
        self.temperature.add(obs.temperature_c);
        self.humidity.add(obs.humidity_pct);
        self.wind_speed.add(obs.wind_speed_mps);
    }

    fn finish(self) -> AggregatedPoint {
        AggregatedPoint {
            bucket_key: self.key,
            bucket_start: self.start,
            rainfall_sum: self.rainfall_sum,
            temperature_avg: self.temperature.mean(),
            humidity_avg: self.humidity.mean(),
            wind_speed_avg: self.wind_speed.mean(),
        }
    }
}

/// Reduce confirmed observations into chronologically ordered buckets.
/// Rainfall is summed; temperature, humidity and wind speed are averaged
/// over their non-null contributors.
pub fn aggregate(
    observations: &[RawObservation],
    granularity: Granularity,
) -> Vec<AggregatedPoint> {
    let mut buckets: HashMap<String, Bucket> = HashMap::new();

    for obs in observations {
        let key = granularity.bucket_key(obs.timestamp);
        buckets
            .entry(key.clone())
            .or_insert_with(|| Bucket::new(key, granularity.bucket_start(obs.timestamp)))
            .add(obs);
    }

    let mut points: Vec<AggregatedPoint> =
        buckets.into_values().map(Bucket::finish).collect();

    // Chronological order comes from the parsed bucket start, never from
    // comparing key strings.
    points.sort_by_key(|point| point.bucket_start);
    points
}
