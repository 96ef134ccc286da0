/// d3 category10, indexed by a metric's first-seen position.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub fn series_color(i: usize) -> &'static str {
    CATEGORY10[i % CATEGORY10.len()]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            left: 50.0,
            right: 20.0,
            top: 10.0,
            bottom: 20.0,
        }
    }
}

/// SVG polyline for one series plus the ranges the axis labels need.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub points: String,
    pub y_min: f64,
    pub y_max: f64,
    pub span_ms: i64,
}

impl Polyline {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Maps `(t_ms, y)` points into a `width` x `height` viewbox.
/// Needs at least two points; fewer yields an empty polyline.
pub fn build_time_polyline(points: &[(i64, f64)], width: f64, height: f64, pad: Padding) -> Polyline {
    let mut pts: Vec<(i64, f64)> = points.iter().copied().filter(|(_, y)| y.is_finite()).collect();
    if pts.len() < 2 {
        return Polyline::default();
    }
    pts.sort_by_key(|(t, _)| *t);

    let t_min = pts[0].0;
    let t_max = pts[pts.len() - 1].0;
    let (y_min, y_max) = pts
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(mn, mx), (_, y)| {
            (mn.min(*y), mx.max(*y))
        });

    let t_span = (t_max - t_min).max(1) as f64;
    let mut y_span = y_max - y_min;
    if y_span.abs() < 1e-9 {
        y_span = 1.0;
    }

    let inner_w = (width - pad.left - pad.right).max(1.0);
    let inner_h = (height - pad.top - pad.bottom).max(1.0);

    let to_xy = |t: i64, y: f64| -> (f64, f64) {
        let x = pad.left + ((t - t_min) as f64 / t_span) * inner_w;
        let y_norm = (y - y_min) / y_span;
        let y_px = pad.top + (1.0 - y_norm) * inner_h;
        (x, y_px)
    };

    let mut poly = String::new();
    for (i, (t, y)) in pts.iter().enumerate() {
        let (x, yy) = to_xy(*t, *y);
        if i == 0 {
            poly.push_str(&format!("{x:.2},{yy:.2}"));
        } else {
            poly.push_str(&format!(" {x:.2},{yy:.2}"));
        }
    }

    Polyline {
        points: poly,
        y_min,
        y_max,
        span_ms: t_max - t_min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_two_points() {
        let p = build_time_polyline(&[(0, 1.0)], 100.0, 100.0, Padding::default());
        assert!(p.is_empty());
    }

    #[test]
    fn maps_corners_of_the_inner_box() {
        let pad = Padding {
            left: 10.0,
            right: 10.0,
            top: 10.0,
            bottom: 10.0,
        };
        let p = build_time_polyline(&[(1_000, 2.0), (0, 0.0)], 120.0, 70.0, pad);
        assert_eq!(p.points, "10.00,60.00 110.00,10.00");
        assert_eq!((p.y_min, p.y_max, p.span_ms), (0.0, 2.0, 1_000));
    }

    #[test]
    fn flat_series_does_not_divide_by_zero() {
        let p = build_time_polyline(&[(0, 5.0), (10, 5.0)], 100.0, 50.0, Padding::default());
        assert!(!p.points.contains("NaN"));
        assert!(!p.points.contains("inf"));
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(series_color(0), series_color(10));
        assert_ne!(series_color(0), series_color(1));
    }
}
