use super::{ChartInstance, CompletionChart, PriorityChart, PRIORITY_CHART_TITLE};
use leptos::prelude::*;
use std::any::Any;

const PLOT_WIDTH: f64 = 320.0;
const PLOT_HEIGHT: f64 = 220.0;
const PAD_LEFT: f64 = 36.0;
const PAD_RIGHT: f64 = 12.0;
const PAD_TOP: f64 = 12.0;
const PAD_BOTTOM: f64 = 28.0;
const RING_WIDTH: &str = "28";

/// A chart view mounted into a container element. Disposing unmounts it
/// and drops its reactive owner.
pub(crate) struct MountedChart {
    handle: Box<dyn Any>,
}

impl MountedChart {
    pub fn completion(parent: web_sys::HtmlElement, chart: CompletionChart) -> Self {
        Self::mount(parent, move || view! { <CompletionDoughnut chart=chart /> }.into_any())
    }

    pub fn priority(parent: web_sys::HtmlElement, chart: PriorityChart) -> Self {
        Self::mount(parent, move || view! { <PriorityBars chart=chart /> }.into_any())
    }

    fn mount(parent: web_sys::HtmlElement, build: impl FnOnce() -> AnyView + 'static) -> Self {
        let handle = leptos::mount::mount_to(parent, build);
        Self {
            handle: Box::new(handle),
        }
    }
}

impl ChartInstance for MountedChart {
    fn dispose(self) {
        drop(self.handle);
    }
}

fn num(value: f64) -> String {
    format!("{value:.2}")
}

#[component]
fn CompletionDoughnut(chart: CompletionChart) -> impl IntoView {
    let r = chart.radius();
    let size = r * 2.0 + 40.0;
    let center = num(size / 2.0);
    let transform = format!("rotate(-90 {center} {center})");

    let arcs = chart
        .segments
        .iter()
        .filter(|s| s.value > 0)
        .map(|s| {
            view! {
                <circle
                    cx={center.clone()}
                    cy={center.clone()}
                    r={num(r)}
                    fill="none"
                    stroke={s.color}
                    stroke-width=RING_WIDTH
                    stroke-dasharray={format!("{} {}", num(s.dash), num(s.gap))}
                    stroke-dashoffset={num(s.offset)}
                    transform={transform.clone()}
                />
            }
        })
        .collect_view();

    let legend = chart
        .segments
        .iter()
        .map(|s| {
            view! {
                <li class="flex items-center gap-1">
                    <span
                        class="inline-block size-3 rounded-sm"
                        style={format!("background-color: {}", s.color)}
                    ></span>
                    {format!("{} ({})", s.label, s.value)}
                </li>
            }
        })
        .collect_view();

    view! {
        <figure class="flex flex-col items-center gap-3">
            <figcaption class="text-sm font-semibold">{chart.title.clone()}</figcaption>
            <svg
                viewBox={format!("0 0 {} {}", num(size), num(size))}
                class="h-64 w-64"
                role="img"
                aria-label="Completed vs pending tasks"
            >
                <circle
                    cx={center.clone()}
                    cy={center.clone()}
                    r={num(r)}
                    fill="none"
                    stroke="#E5E7EB"
                    stroke-width=RING_WIDTH
                />
                {arcs}
            </svg>
            <ul class="flex gap-4 text-xs">{legend}</ul>
        </figure>
    }
}

#[component]
fn PriorityBars(chart: PriorityChart) -> impl IntoView {
    let plot_w = PLOT_WIDTH - PAD_LEFT - PAD_RIGHT;
    let plot_h = PLOT_HEIGHT - PAD_TOP - PAD_BOTTOM;
    let baseline = PAD_TOP + plot_h;
    let right = PLOT_WIDTH - PAD_RIGHT;
    let slot_w = plot_w / chart.bars.len().max(1) as f64;
    let bar_w = slot_w * 0.6;

    let grid = chart
        .ticks()
        .into_iter()
        .map(|tick| {
            let y = baseline - chart.scale(tick) * plot_h;
            view! {
                <line x1={num(PAD_LEFT)} y1={num(y)} x2={num(right)} y2={num(y)} stroke="#E5E7EB" />
                <text
                    x={num(PAD_LEFT - 6.0)}
                    y={num(y + 4.0)}
                    text-anchor="end"
                    font-size="10"
                    fill="currentColor"
                >
                    {tick.to_string()}
                </text>
            }
        })
        .collect_view();

    let bars = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let h = chart.scale(bar.value) * plot_h;
            let x = PAD_LEFT + slot_w * i as f64 + (slot_w - bar_w) / 2.0;
            view! {
                <rect
                    x={num(x)}
                    y={num(baseline - h)}
                    width={num(bar_w)}
                    height={num(h)}
                    fill={bar.color}
                    rx="3"
                />
                <text
                    x={num(x + bar_w / 2.0)}
                    y={num(baseline + 16.0)}
                    text-anchor="middle"
                    font-size="11"
                    fill="currentColor"
                >
                    {format!("{} ({})", bar.label, bar.value)}
                </text>
            }
        })
        .collect_view();

    view! {
        <figure class="flex flex-col items-center gap-3">
            <figcaption class="text-sm font-semibold">{PRIORITY_CHART_TITLE}</figcaption>
            <svg
                viewBox={format!("0 0 {PLOT_WIDTH} {PLOT_HEIGHT}")}
                class="h-64 w-full max-w-md"
                role="img"
                aria-label=PRIORITY_CHART_TITLE
            >
                {grid}
                <line
                    x1={num(PAD_LEFT)}
                    y1={num(baseline)}
                    x2={num(right)}
                    y2={num(baseline)}
                    stroke="#9CA3AF"
                />
                {bars}
            </svg>
        </figure>
    }
}
