// frontend/src/dashboard/node_card.rs

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use nodeboard_shared::plot::series_color;
use nodeboard_shared::{Metric, NodeInfo, NodeState};

use super::chart::MetricChart;
use super::{FocusEpoch, abs_http, dashboard_settings, frame_clock_ms, sleep_ms, socket, wall_clock_ms};

fn btn_style(border: &str, bg: &str, fg: &str) -> String {
    format!(
        "padding:0.5rem 1rem; border-radius:0.6rem; cursor:pointer; \
         border:1px solid {border}; background:{bg}; color:{fg}; font-weight:700;"
    )
}

/// One dashboard card per node: camera image, live charts, on/off buttons.
#[component]
pub fn NodeCard(info: NodeInfo, user_id: String) -> Element {
    let settings = dashboard_settings();
    let frame_tick_ms = settings.frame_tick_ms;

    let node = use_hook({
        let id = info.id.clone();
        move || Rc::new(RefCell::new(NodeState::new(id, &settings)))
    });

    // Bumped whenever the node's charts change; the only thing render subscribes to.
    let mut generation = use_signal(|| 0u64);

    let handler = use_hook({
        let node = node.clone();
        move || socket::subscribe(node)
    });
    use_drop(move || socket::unsubscribe(handler));

    // Frame loop: ticks for as long as the card is mounted; the node state
    // itself decides when enough time has passed to redraw.
    use_hook({
        let node = node.clone();
        move || {
            spawn(async move {
                loop {
                    sleep_ms(frame_tick_ms).await;
                    let redrawn = node
                        .borrow_mut()
                        .update_graphs(frame_clock_ms(), wall_clock_ms());
                    if !redrawn.is_empty() {
                        *generation.write() += 1;
                    }
                }
            })
        }
    });

    let focus = try_use_context::<FocusEpoch>();
    {
        let node = node.clone();
        use_effect(move || {
            let Some(FocusEpoch(epoch)) = focus else {
                return;
            };
            if *epoch.read() == 0 {
                return;
            }
            node.borrow_mut().reset_data();
            *generation.write() += 1;
        });
    }

    let _ = generation.read();

    let state = node.borrow();
    let key = state.id().as_key();
    let stream_src = abs_http(&state.stream_src(&user_id));
    let charts: Vec<(Metric, Vec<(i64, f64)>, &'static str)> = Metric::ALL
        .into_iter()
        .map(|m| {
            let color = series_color(state.color_index(m).unwrap_or(m.index()));
            (m, state.series(m).points(), color)
        })
        .collect();
    let log_lines: Vec<String> = state.recent_log().map(str::to_string).collect();
    let title = info.title();
    drop(state);

    let on_style = btn_style("#166534", "#052e16", "#bbf7d0");
    let off_style = btn_style("#7f1d1d", "#1f0b0b", "#fecaca");
    let reset_style = btn_style("#334155", "#0f172a", "#e5e7eb");

    let on_node = node.clone();
    let off_node = node.clone();
    let reset_node = node.clone();

    rsx! {
        div {
            style: "border:1px solid #334155; border-radius:14px; background:#0b1220; overflow:hidden; box-shadow:0 10px 25px rgba(0,0,0,0.35);",

            img {
                id: "stream{key}",
                src: "{stream_src}",
                alt: "{title} stream",
                style: "width:100%; display:block; background:#020617; min-height:120px;",
            }

            div { style: "padding:12px; display:flex; flex-direction:column; gap:10px;",
                div { style: "display:flex; align-items:center; justify-content:space-between;",
                    h2 { style: "margin:0; font-size:16px; color:#e5e7eb;", "{title}" }
                    span { style: "color:#64748b; font-size:12px;", "id {key}" }
                }

                div { id: "messages{key}", class: "messages",
                    style: "display:flex; flex-direction:column; gap:8px;",
                    for (metric, points, color) in charts.into_iter() {
                        MetricChart {
                            key: "{metric}",
                            title: metric.label().to_string(),
                            points,
                            color: color.to_string(),
                            height: 140,
                        }
                    }

                    if !log_lines.is_empty() {
                        div { style: "font-family:ui-monospace, monospace; font-size:11px; color:#94a3b8; padding:6px 8px; border:1px solid #1f2937; border-radius:8px;",
                            for (i, line) in log_lines.iter().enumerate() {
                                div { key: "{i}", "{line}" }
                            }
                        }
                    }
                }

                div { style: "display:flex; gap:8px;",
                    button {
                        id: "on{key}",
                        r#type: "button",
                        style: "{on_style}",
                        onclick: move |_| socket::send(&on_node.borrow().on()),
                        "ON"
                    }
                    button {
                        id: "off{key}",
                        r#type: "button",
                        style: "{off_style}",
                        onclick: move |_| socket::send(&off_node.borrow().off()),
                        "OFF"
                    }
                    button {
                        r#type: "button",
                        style: "{reset_style}",
                        onclick: move |_| {
                            reset_node.borrow_mut().reset_data();
                            *generation.write() += 1;
                        },
                        "Reset"
                    }
                }
            }
        }
    }
}
