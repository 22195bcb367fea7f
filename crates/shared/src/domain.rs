use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoordinateError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RequestId);
id_newtype!(RideId);
id_newtype!(MatchId);

/// One of the two selectable roles on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Pickup,
    Dropoff,
}

impl Slot {
    pub fn label(self) -> &'static str {
        match self {
            Slot::Pickup => "Pickup",
            Slot::Dropoff => "Dropoff",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A point in decimal degrees. Latitude is within [-90, 90] and longitude
/// within [-180, 180]; both are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub const LAGOS: Coordinate = Coordinate {
        latitude: 6.5244,
        longitude: 3.3792,
    };

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = CoordinateError;

    /// Parses `"lat,lng"`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = raw
            .split_once(',')
            .ok_or_else(|| CoordinateError::Malformed(raw.to_string()))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Malformed(raw.to_string()))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Malformed(raw.to_string()))?;
        Coordinate::new(lat, lng)
    }
}

#[derive(Debug, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawCoordinate::deserialize(deserializer)?;
        Coordinate::new(raw.latitude, raw.longitude).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "CASH")]
    Cash,
    #[serde(rename = "INAPP")]
    InApp,
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CASH" => Ok(PaymentMethod::Cash),
            "INAPP" | "IN_APP" | "IN-APP" => Ok(PaymentMethod::InApp),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

const TERMINAL_RIDE_STATUSES: &[&str] = &["ACCEPTED", "IN_PROGRESS", "COMPLETED", "CANCELED"];

/// Whether a ride status means matching has concluded. Used for display only.
pub fn is_terminal_ride_status(status: &str) -> bool {
    TERMINAL_RIDE_STATUSES
        .iter()
        .any(|terminal| terminal.eq_ignore_ascii_case(status))
}
