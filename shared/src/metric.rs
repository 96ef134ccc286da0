use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sensor/state channels a node reports. Anything else on the feed is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Do,
    Humidity,
    Temperature,
    Ph,
    WaterTemperature,
}

impl Metric {
    pub const COUNT: usize = 5;

    /// Canonical order; charts are laid out in this order on every card.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Do,
        Metric::Humidity,
        Metric::Temperature,
        Metric::Ph,
        Metric::WaterTemperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Do => "do",
            Metric::Humidity => "humidity",
            Metric::Temperature => "temperature",
            Metric::Ph => "ph",
            Metric::WaterTemperature => "water_temperature",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Do => "Digital Out",
            Metric::Humidity => "Humidity",
            Metric::Temperature => "Temperature",
            Metric::Ph => "pH",
            Metric::WaterTemperature => "Water Temperature",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric(pub String);

impl fmt::Display for UnknownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metric '{}'", self.0)
    }
}

impl std::error::Error for UnknownMetric {}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}
