//! Immutable query values and site identity

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::EngineError;

/// A monitored site. Coordinates and timezone are optional at the
/// configuration level; the historical pipeline validates them per query.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<Tz>,
    pub place_id: Option<String>,
}

impl Site {
    /// The fields the historical fetch requires, or the taxonomy error.
    pub fn coordinates(&self) -> Result<(f64, f64, Tz), EngineError> {
        match (self.latitude, self.longitude, self.timezone) {
            (Some(lat), Some(lon), Some(tz)) => Ok((lat, lon, tz)),
            _ => Err(EngineError::MissingSiteCoordinates {
                site: self.id.clone(),
            }),
        }
    }

    /// Timezone for display formatting; UTC when unset.
    pub fn display_timezone(&self) -> Tz {
        self.timezone.unwrap_or(chrono_tz::UTC)
    }
}

/// Everything one pipeline invocation depends on. `now` is part of the
/// value so two runs over identical input are byte-identical.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub site: Site,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub now: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        Site {
            id: "newman".to_string(),
            name: "Newman Hub".to_string(),
            latitude: Some(-23.36),
            longitude: Some(119.73),
            timezone: Some(chrono_tz::Australia::Perth),
            place_id: Some("newman".to_string()),
        }
    }

    #[test]
    fn complete_site_yields_coordinates() {
        let (lat, lon, tz) = site().coordinates().unwrap();
        assert_eq!(lat, -23.36);
        assert_eq!(lon, 119.73);
        assert_eq!(tz, chrono_tz::Australia::Perth);
    }

    #[test]
    fn missing_timezone_is_an_error() {
        let mut incomplete = site();
        incomplete.timezone = None;

        assert!(matches!(
            incomplete.coordinates(),
            Err(EngineError::MissingSiteCoordinates { .. })
        ));
        assert_eq!(incomplete.display_timezone(), chrono_tz::UTC);
    }
}
