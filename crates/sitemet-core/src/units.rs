//! Unit conversions between provider wire fields and the canonical schema

/// km/h per m/s.
pub const KMH_PER_MPS: f64 = 3.6;

/// Convert a wind speed reading from km/h to m/s. Null passes through;
/// "no reading" must survive normalization as `None`, not become zero.
pub fn kmh_to_mps(speed_kmh: Option<f64>) -> Option<f64> {
    speed_kmh.map(|v| v / KMH_PER_MPS)
}

/// Missing precipitation means "no rain recorded", not "no data"; it
/// defaults to zero so rainfall is always summable downstream.
pub fn rainfall_or_zero(prcp_mm: Option<f64>) -> f64 {
    prcp_mm.unwrap_or(0.0)
}
