// frontend/src/dashboard/chart.rs
//
// SVG line chart for one metric of one node. Geometry lives in
// nodeboard_shared::plot so it can be unit tested without a renderer.

use dioxus::prelude::*;
use nodeboard_shared::plot::{Padding, build_time_polyline};

const VIEW_W: f64 = 600.0;

/// `points`: (t_ms, y), oldest first.
#[component]
pub fn MetricChart(title: String, points: Vec<(i64, f64)>, color: String, height: i32) -> Element {
    let view_h = height.max(100) as f64;
    let pad = Padding::default();

    // non-numeric readings arrive as NaN and leave gaps
    let finite = points.iter().filter(|(_, y)| y.is_finite()).count();
    if finite < 2 {
        return rsx! {
            div { style: "padding:10px; border:1px solid #1f2937; border-radius:10px; background:#0b1220;",
                div { style:"color:#94a3b8; font-size:12px; margin-bottom:6px;", "{title}" }
                div { style:"color:#64748b; font-size:12px;", "Waiting for stream..." }
            }
        };
    }

    let line = build_time_polyline(&points, VIEW_W, view_h, pad);
    let latest = points.iter().rev().map(|(_, y)| *y).find(|y| y.is_finite()).unwrap_or_default();
    let span_s = line.span_ms as f64 / 1000.0;
    let y_mid = (line.y_min + line.y_max) * 0.5;
    let bottom = view_h - pad.bottom;
    let right = VIEW_W - pad.right;

    rsx! {
        div { style: "padding:10px; border:1px solid #1f2937; border-radius:10px; background:#0b1220;",
            div { style:"display:flex; align-items:center; justify-content:space-between; margin-bottom:6px;",
                div { style:"display:flex; align-items:center; gap:6px; color:#94a3b8; font-size:12px;",
                    svg { width:"18", height:"8", view_box:"0 0 18 8",
                        line { x1:"1", y1:"4", x2:"17", y2:"4", stroke:"{color}", stroke_width:"2", stroke_linecap:"round" }
                    }
                    "{title}"
                }
                div { style:"color:#cbd5e1; font-size:12px; font-variant-numeric:tabular-nums;",
                    {format!("{latest:.2}")}
                }
            }

            svg {
                style: "width:100%; height:auto; display:block; background:#020617; border-radius:8px;",
                view_box: "0 0 {VIEW_W} {view_h}",

                line { x1:"{pad.left}", y1:"{bottom}", x2:"{right}", y2:"{bottom}",
                    stroke:"#334155", "stroke-width":"1"
                }
                line { x1:"{pad.left}", y1:"{pad.top}", x2:"{pad.left}", y2:"{bottom}",
                    stroke:"#334155", "stroke-width":"1"
                }

                text { x:"4", y:"{pad.top + 8.0}", fill:"#94a3b8", "font-size":"10", {format!("{:.2}", line.y_max)} }
                text { x:"4", y:"{(pad.top + bottom) * 0.5 + 4.0}", fill:"#94a3b8", "font-size":"10", {format!("{:.2}", y_mid)} }
                text { x:"4", y:"{bottom}", fill:"#94a3b8", "font-size":"10", {format!("{:.2}", line.y_min)} }
                text { x:"{pad.left + 4.0}", y:"{view_h - 5.0}", fill:"#64748b", "font-size":"10", {format!("-{span_s:.0}s")} }
                text { x:"{right - 24.0}", y:"{view_h - 5.0}", fill:"#64748b", "font-size":"10", "now" }

                polyline {
                    points: "{line.points}",
                    fill: "none",
                    stroke: "{color}",
                    "stroke-width": "2",
                    "stroke-linejoin": "round",
                    "stroke-linecap": "round",
                }
            }
        }
    }
}
