//! Directional wind-rose frequency table
//!
//! Classifies confirmed observations into 16 compass sectors by 5 speed
//! bins and reports each cell as a percentage of the whole batch.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::types::RawObservation;

/// One of sixteen 22.5-degree-wide compass sectors, N first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompassSector {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

impl CompassSector {
    pub const ALL: [Self; 16] = [
        Self::N,
        Self::Nne,
        Self::Ne,
        Self::Ene,
        Self::E,
        Self::Ese,
        Self::Se,
        Self::Sse,
        Self::S,
        Self::Ssw,
        Self::Sw,
        Self::Wsw,
        Self::W,
        Self::Wnw,
        Self::Nw,
        Self::Nnw,
    ];

    /// Sector containing `degrees`, with N centered on 0. 360 wraps to N.
    pub fn from_degrees(degrees: f64) -> Self {
        let index = ((degrees / 22.5 + 0.5).floor() as isize).rem_euclid(16) as usize;
        Self::ALL[index]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::Nne => "NNE",
            Self::Ne => "NE",
            Self::Ene => "ENE",
            Self::E => "E",
            Self::Ese => "ESE",
            Self::Se => "SE",
            Self::Sse => "SSE",
            Self::S => "S",
            Self::Ssw => "SSW",
            Self::Sw => "SW",
            Self::Wsw => "WSW",
            Self::W => "W",
            Self::Wnw => "WNW",
            Self::Nw => "NW",
            Self::Nnw => "NNW",
        }
    }
}

impl Serialize for CompassSector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One of five fixed wind-speed bins, upper bound inclusive, in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedBin {
    /// <= 0.5 m/s
    Calm,
    /// <= 5 m/s
    Light,
    /// <= 10 m/s
    Moderate,
    /// <= 15 m/s
    Fresh,
    /// > 15 m/s
    Strong,
}

impl SpeedBin {
    pub const ALL: [Self; 5] = [
        Self::Calm,
        Self::Light,
        Self::Moderate,
        Self::Fresh,
        Self::Strong,
    ];

    pub fn from_mps(speed: f64) -> Self {
        if speed <= 0.5 {
            Self::Calm
        } else if speed <= 5.0 {
            Self::Light
        } else if speed <= 10.0 {
            Self::Moderate
        } else if speed <= 15.0 {
            Self::Fresh
        } else {
            Self::Strong
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Calm => "Calm",
            Self::Light => "1-5 m/s",
            Self::Moderate => "6-10 m/s",
            Self::Fresh => "11-15 m/s",
            Self::Strong => "> 15 m/s",
        }
    }
}

/// One compass sector's stacked percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct WindRoseRow {
    pub direction: CompassSector,
    bins: [f64; 5],
    pub total_pct: f64,
}

impl WindRoseRow {
    pub fn bin_pct(&self, bin: SpeedBin) -> f64 {
        self.bins[bin as usize]
    }
}

// Chart-feed shape: the bin labels become keys alongside "direction" and
// "total", e.g. {"direction":"E","Calm":0.0,"1-5 m/s":50.0,...,"total":50.0}.
impl Serialize for WindRoseRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        map.serialize_entry("direction", self.direction.label())?;
        for bin in SpeedBin::ALL {
            map.serialize_entry(bin.label(), &self.bins[bin as usize])?;
        }
        map.serialize_entry("total", &self.total_pct)?;
        map.end()
    }
}

/// Full 16-row frequency table plus the counts behind the percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindRose {
    pub rows: Vec<WindRoseRow>,

    /// Observations with both direction and speed present.
    pub classified_count: usize,

    /// Denominator for every percentage: the full confirmed count,
    /// including observations that no cell could classify.
    pub total_count: usize,
}

impl WindRose {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// Build the wind rose for one confirmed batch.
///
/// An observation with a null direction or null speed contributes to no
/// sector and no bin, but still counts toward the denominator, so cells can
/// under-sum 100% when nulls are present.
pub fn wind_rose(observations: &[RawObservation]) -> WindRose {
    let mut counts = [[0u32; 5]; 16];
    let mut classified = 0usize;

    for obs in observations {
        if let (Some(direction), Some(speed)) = (obs.wind_direction_deg, obs.wind_speed_mps) {
            let sector = CompassSector::from_degrees(direction) as usize;
            let bin = SpeedBin::from_mps(speed) as usize;
            counts[sector][bin] += 1;
            classified += 1;
        }
    }

    let total = observations.len();
    let pct = |count: u32| {
        if total == 0 {
            0.0
        } else {
            f64::from(count) * 100.0 / total as f64
        }
    };

    let rows = CompassSector::ALL
        .iter()
        .enumerate()
        .map(|(sector, &direction)| {
            let mut bins = [0.0; 5];
            let mut sector_count = 0u32;
            for (slot, &count) in bins.iter_mut().zip(&counts[sector]) {
                *slot = pct(count);
                sector_count += count;
            }
            WindRoseRow {
                direction,
                bins,
                total_pct: pct(sector_count),
            }
        })
        .collect();

    WindRose {
        rows,
        classified_count: classified,
        total_count: total,
    }
}
