use std::collections::VecDeque;

use crate::message::{InboundFrame, Message, NodeId};
use crate::metric::Metric;
use crate::series::{Sample, Series};
use crate::settings::DashboardSettings;
use crate::throttle::FrameThrottle;

/// Per-node buffers behind one dashboard card.
///
/// Inbound frames only overwrite the latest-sample slot for their metric.
/// Samples move into the charted series on [`NodeState::update_graphs`],
/// which is throttled, so the series grow at the redraw cadence no matter how
/// fast the feed is.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    id: NodeId,
    last: [Option<Sample>; Metric::COUNT],
    series: [Series; Metric::COUNT],
    // first-seen order; drives color assignment and redraw order
    seen: Vec<Metric>,
    throttle: FrameThrottle,
    log: VecDeque<String>,
    log_lines: usize,
}

impl NodeState {
    pub fn new(id: NodeId, settings: &DashboardSettings) -> Self {
        Self {
            id,
            last: [None; Metric::COUNT],
            series: std::array::from_fn(|_| Series::new(settings.series_points())),
            seen: Vec::with_capacity(Metric::COUNT),
            throttle: FrameThrottle::new(settings.redraw_interval()),
            log: VecDeque::with_capacity(settings.log_lines),
            log_lines: settings.log_lines,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Records a feed frame if it is addressed to this node and carries a
    /// known metric. Returns whether it was recorded. Readings that are not
    /// numeric are stored as NaN, which the charts skip.
    pub fn on_message(&mut self, frame: &InboundFrame, now_ms: i64) -> bool {
        if frame.id != self.id {
            return false;
        }
        let Ok(metric) = frame.kind.parse::<Metric>() else {
            return false;
        };
        let value = frame.numeric_value().unwrap_or(f64::NAN);

        if !self.seen.contains(&metric) {
            self.seen.push(metric);
        }
        self.last[metric.index()] = Some(Sample::new(now_ms, value));

        if self.log_lines > 0 {
            if self.log.len() == self.log_lines {
                self.log.pop_front();
            }
            self.log.push_back(format!("{}: {}", frame.kind, frame.value));
        }
        true
    }

    /// Frame callback. Does nothing until the redraw interval has elapsed;
    /// then copies every pending latest sample into its series, stamped
    /// `now_ms`. Returns the metrics whose charts need redrawing.
    pub fn update_graphs(&mut self, tick_ms: f64, now_ms: i64) -> Vec<Metric> {
        if !self.throttle.ready(tick_ms) {
            return Vec::new();
        }

        let mut redrawn = Vec::with_capacity(self.seen.len());
        for &metric in &self.seen {
            if let Some(sample) = self.last[metric.index()] {
                self.series[metric.index()].push(sample.at(now_ms));
                redrawn.push(metric);
            }
        }
        redrawn
    }

    /// Drops charted history. Latest samples are kept so charts refill on
    /// the next redraw.
    pub fn reset_data(&mut self) {
        for s in self.series.iter_mut() {
            s.clear();
        }
    }

    pub fn latest(&self, metric: Metric) -> Option<&Sample> {
        self.last[metric.index()].as_ref()
    }

    pub fn series(&self, metric: Metric) -> &Series {
        &self.series[metric.index()]
    }

    pub fn seen(&self) -> &[Metric] {
        &self.seen
    }

    /// Palette slot for a metric: its position in first-seen order.
    pub fn color_index(&self, metric: Metric) -> Option<usize> {
        self.seen.iter().position(|m| *m == metric)
    }

    pub fn recent_log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    pub fn register(&self) -> Message {
        Message::register(self.id.clone())
    }

    pub fn on(&self) -> Message {
        Message::light_on(self.id.clone())
    }

    pub fn off(&self) -> Message {
        Message::light_off(self.id.clone())
    }

    /// Media endpoint for this node's camera image.
    pub fn stream_src(&self, user_id: &str) -> String {
        format!("/stream?node_id={}&user_id={}", self.id, user_id)
    }

    pub fn dom_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(id: serde_json::Value, kind: &str, value: serde_json::Value) -> InboundFrame {
        serde_json::from_value(json!({"id": id, "type": kind, "value": value})).unwrap()
    }

    fn node(id: i64) -> NodeState {
        NodeState::new(NodeId::Num(id), &DashboardSettings::default())
    }

    #[test]
    fn foreign_ids_and_unknown_types_leave_state_untouched() {
        let mut n = node(1);
        n.on_message(&frame(json!(1), "ph", json!(7.0)), 10);
        n.update_graphs(0.0, 10);
        n.update_graphs(300.0, 20);
        let before = n.clone();

        assert!(!n.on_message(&frame(json!(2), "ph", json!(5.0)), 30));
        assert!(!n.on_message(&frame(json!("2"), "temperature", json!(5.0)), 30));
        assert!(!n.on_message(&frame(json!(1), "node_message", json!("hi")), 30));
        assert!(!n.on_message(&frame(json!(1), "response", json!(1)), 30));
        assert!(!n.on_message(&frame(json!(1), "PH", json!(1)), 30));
        assert_eq!(n, before);
    }

    #[test]
    fn records_latest_sample_per_metric() {
        let mut n = node(4);
        assert!(n.on_message(&frame(json!("4"), "temperature", json!(20.5)), 100));
        assert!(n.on_message(&frame(json!(4), "temperature", json!(21.0)), 150));
        assert!(n.on_message(&frame(json!(4), "do", json!(true)), 160));

        assert_eq!(n.latest(Metric::Temperature), Some(&Sample::new(150, 21.0)));
        assert_eq!(n.latest(Metric::Do), Some(&Sample::new(160, 1.0)));
        assert_eq!(n.latest(Metric::Ph), None);
        // nothing is charted until the redraw tick
        assert!(n.series(Metric::Temperature).is_empty());
    }

    #[test]
    fn non_numeric_values_are_recorded_as_gaps() {
        let mut n = node(1);
        assert!(n.on_message(&frame(json!(1), "humidity", json!({"raw": 3})), 1));
        assert!(n.on_message(&frame(json!(1), "ph", json!("warm")), 2));
        assert!(n.on_message(&frame(json!(1), "humidity", json!(null)), 3));

        assert_eq!(n.seen(), &[Metric::Humidity, Metric::Ph]);
        assert_eq!(n.color_index(Metric::Ph), Some(1));
        assert!(n.latest(Metric::Humidity).is_some_and(|s| s.value.is_nan()));
        assert_eq!(n.latest(Metric::Humidity).map(|s| s.timestamp_ms), Some(3));

        let lines: Vec<&str> = n.recent_log().collect();
        assert_eq!(lines, vec!["humidity: {\"raw\":3}", "ph: \"warm\"", "humidity: null"]);

        n.update_graphs(0.0, 0);
        assert_eq!(n.update_graphs(200.0, 200), vec![Metric::Humidity, Metric::Ph]);
        assert!(n.series(Metric::Humidity).latest().is_some_and(|s| s.value.is_nan()));
    }

    #[test]
    fn oversized_settings_cannot_loosen_limits() {
        let settings = DashboardSettings {
            max_points: 5_000,
            redraw_interval_ms: 0.0,
            ..DashboardSettings::default()
        };
        let mut n = NodeState::new(NodeId::Num(1), &settings);
        n.on_message(&frame(json!(1), "ph", json!(7.0)), 0);

        let mut redraws = 0;
        for i in 0..1_000_i64 {
            if !n.update_graphs(i as f64, i).is_empty() {
                redraws += 1;
            }
        }
        assert!(redraws <= 5);

        for i in 0..1_000_i64 {
            n.update_graphs(1_000.0 + i as f64 * 250.0, i);
        }
        assert_eq!(n.series(Metric::Ph).len(), 200);
    }

    #[test]
    fn redraw_is_throttled_and_restamps_samples() {
        let mut n = node(1);
        n.on_message(&frame(json!(1), "ph", json!(6.8)), 5);

        assert!(n.update_graphs(1_000.0, 1_000).is_empty());
        assert!(n.update_graphs(1_016.0, 1_016).is_empty());
        assert!(n.update_graphs(1_199.0, 1_199).is_empty());
        assert_eq!(n.update_graphs(1_200.0, 1_200), vec![Metric::Ph]);
        assert!(n.update_graphs(1_216.0, 1_216).is_empty());

        let s = n.series(Metric::Ph);
        assert_eq!(s.len(), 1);
        assert_eq!(s.latest(), Some(&Sample::new(1_200, 6.8)));
    }

    #[test]
    fn redraw_rate_is_bounded_regardless_of_frame_rate() {
        let mut n = node(1);
        let mut redraws = 0;
        // 1000 fps for 5 seconds with a new reading every frame
        for i in 0..5_000_i64 {
            n.on_message(&frame(json!(1), "humidity", json!(i)), i);
            if !n.update_graphs(i as f64, i).is_empty() {
                redraws += 1;
            }
        }
        assert!(redraws <= 25);
        assert_eq!(n.series(Metric::Humidity).len(), redraws);
    }

    #[test]
    fn series_stay_bounded() {
        let mut n = node(1);
        for i in 0..1_000_i64 {
            n.on_message(&frame(json!(1), "water_temperature", json!(i)), i);
            n.update_graphs(i as f64 * 250.0, i);
        }
        let s = n.series(Metric::WaterTemperature);
        assert_eq!(s.len(), 200);
        assert_eq!(s.latest().map(|x| x.value), Some(999.0));
    }

    #[test]
    fn colors_follow_first_seen_order() {
        let mut n = node(1);
        n.on_message(&frame(json!(1), "ph", json!(7)), 0);
        n.on_message(&frame(json!(1), "do", json!(0)), 0);
        n.on_message(&frame(json!(1), "ph", json!(7.1)), 0);

        assert_eq!(n.seen(), &[Metric::Ph, Metric::Do]);
        assert_eq!(n.color_index(Metric::Ph), Some(0));
        assert_eq!(n.color_index(Metric::Do), Some(1));
        assert_eq!(n.color_index(Metric::Humidity), None);

        n.update_graphs(0.0, 0);
        assert_eq!(n.update_graphs(200.0, 1), vec![Metric::Ph, Metric::Do]);
    }

    #[test]
    fn on_off_commands_use_node_id() {
        let n = NodeState::new(NodeId::from("greenhouse-2"), &DashboardSettings::default());
        let on = n.on();
        let off = n.off();
        assert_eq!((on.kind.as_str(), on.data.as_str()), ("light", "on"));
        assert_eq!((off.kind.as_str(), off.data.as_str()), ("light", "off"));
        assert_eq!(on.id, NodeId::from("greenhouse-2"));
        assert_eq!(off.id, NodeId::from("greenhouse-2"));
    }

    #[test]
    fn reset_clears_series_but_keeps_latest() {
        let mut n = node(1);
        n.on_message(&frame(json!(1), "temperature", json!(19)), 0);
        n.update_graphs(0.0, 0);
        n.update_graphs(200.0, 200);
        assert_eq!(n.series(Metric::Temperature).len(), 1);

        n.reset_data();
        assert!(n.series(Metric::Temperature).is_empty());
        assert!(n.latest(Metric::Temperature).is_some());

        n.update_graphs(400.0, 400);
        assert_eq!(n.series(Metric::Temperature).len(), 1);
    }

    #[test]
    fn log_keeps_most_recent_lines() {
        let settings = DashboardSettings {
            log_lines: 2,
            ..DashboardSettings::default()
        };
        let mut n = NodeState::new(NodeId::Num(1), &settings);
        n.on_message(&frame(json!(1), "ph", json!(6)), 0);
        n.on_message(&frame(json!(1), "do", json!(true)), 0);
        n.on_message(&frame(json!(1), "humidity", json!("40")), 0);

        let lines: Vec<&str> = n.recent_log().collect();
        assert_eq!(lines, vec!["do: true", "humidity: \"40\""]);
    }

    #[test]
    fn stream_src_and_dom_ids() {
        let n = node(9);
        assert_eq!(n.stream_src("u1"), "/stream?node_id=9&user_id=u1");
        assert_eq!(n.dom_id("on"), "on9");
        assert_eq!(n.dom_id("messages"), "messages9");
    }
}
