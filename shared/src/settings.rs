use serde::{Deserialize, Serialize};

/// Tunables for the dashboard. Every field has a default, so a partial JSON
/// blob (or none at all) is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Minimum spacing between chart redraws per node.
    pub redraw_interval_ms: f64,
    /// How often the frame loop ticks.
    pub frame_tick_ms: u32,
    /// Samples kept per metric series.
    pub max_points: usize,
    /// Lines kept in each card's recent-readings log.
    pub log_lines: usize,
}

pub const DEFAULT_REDRAW_INTERVAL_MS: f64 = 200.0;
pub const DEFAULT_FRAME_TICK_MS: u32 = 16;
pub const DEFAULT_MAX_POINTS: usize = 200;
pub const DEFAULT_LOG_LINES: usize = 8;

/// Hard ceiling on samples per series, whatever the configuration says.
pub const MAX_SERIES_POINTS: usize = DEFAULT_MAX_POINTS;
/// Hard floor on the redraw interval.
pub const MIN_REDRAW_INTERVAL_MS: f64 = DEFAULT_REDRAW_INTERVAL_MS;

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            redraw_interval_ms: DEFAULT_REDRAW_INTERVAL_MS,
            frame_tick_ms: DEFAULT_FRAME_TICK_MS,
            max_points: DEFAULT_MAX_POINTS,
            log_lines: DEFAULT_LOG_LINES,
        }
    }
}

impl DashboardSettings {
    /// Applies overrides from a key lookup (env vars on native).
    /// Unparseable values are ignored; parsed ones are clamped to sane ranges.
    /// The series and redraw knobs can only be made more conservative.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("NODEBOARD_REDRAW_MS").and_then(|v| v.trim().parse::<f64>().ok())
            && v.is_finite()
        {
            self.redraw_interval_ms = v.clamp(MIN_REDRAW_INTERVAL_MS, 10_000.0);
        }
        if let Some(v) = lookup("NODEBOARD_FRAME_MS").and_then(|v| v.trim().parse::<u32>().ok()) {
            self.frame_tick_ms = v.clamp(1, 100);
        }
        if let Some(v) = lookup("NODEBOARD_MAX_POINTS").and_then(|v| v.trim().parse::<usize>().ok())
        {
            self.max_points = v.clamp(2, MAX_SERIES_POINTS);
        }
        self
    }

    /// Series length actually used, capped at [`MAX_SERIES_POINTS`].
    pub fn series_points(&self) -> usize {
        self.max_points.clamp(1, MAX_SERIES_POINTS)
    }

    /// Redraw interval actually used, never below [`MIN_REDRAW_INTERVAL_MS`].
    pub fn redraw_interval(&self) -> f64 {
        if self.redraw_interval_ms.is_finite() {
            self.redraw_interval_ms.max(MIN_REDRAW_INTERVAL_MS)
        } else {
            DEFAULT_REDRAW_INTERVAL_MS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let s = DashboardSettings::default();
        assert_eq!(s.redraw_interval_ms, 200.0);
        assert_eq!(s.max_points, 200);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: DashboardSettings = serde_json::from_str(r#"{"max_points": 50}"#).unwrap();
        assert_eq!(s.max_points, 50);
        assert_eq!(s.frame_tick_ms, DEFAULT_FRAME_TICK_MS);
    }

    #[test]
    fn overrides_parse_and_clamp() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("NODEBOARD_REDRAW_MS", "500"),
            ("NODEBOARD_FRAME_MS", "0"),
            ("NODEBOARD_MAX_POINTS", "nope"),
        ]);
        let s = DashboardSettings::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(s.redraw_interval_ms, 500.0);
        assert_eq!(s.frame_tick_ms, 1);
        assert_eq!(s.max_points, DEFAULT_MAX_POINTS);
    }

    #[test]
    fn overrides_cannot_loosen_series_or_redraw_limits() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("NODEBOARD_REDRAW_MS", "0"),
            ("NODEBOARD_MAX_POINTS", "5000"),
        ]);
        let s = DashboardSettings::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(s.redraw_interval_ms, MIN_REDRAW_INTERVAL_MS);
        assert_eq!(s.max_points, MAX_SERIES_POINTS);

        let shrunk = DashboardSettings::default().with_overrides(|k| match k {
            "NODEBOARD_MAX_POINTS" => Some("50".into()),
            "NODEBOARD_REDRAW_MS" => Some("1000".into()),
            _ => None,
        });
        assert_eq!(shrunk.max_points, 50);
        assert_eq!(shrunk.redraw_interval_ms, 1000.0);
    }

    #[test]
    fn deserialized_values_are_capped_when_used() {
        let s: DashboardSettings =
            serde_json::from_str(r#"{"max_points": 5000, "redraw_interval_ms": 0}"#).unwrap();
        assert_eq!(s.series_points(), MAX_SERIES_POINTS);
        assert_eq!(s.redraw_interval(), MIN_REDRAW_INTERVAL_MS);
    }
}
