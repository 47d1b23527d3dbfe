//! Stats charts: plain data models derived from a `Report`, SVG views for
//! them, and the owned-slot lifecycle for mounted chart instances.

mod svg;

use crate::models::Report;
use std::f64::consts::PI;

pub(crate) use svg::MountedChart;

pub(crate) const COMPLETED_COLOR: &str = "#4CAF50";
pub(crate) const PENDING_COLOR: &str = "#FFC107";

pub(crate) const PRIORITY_CHART_TITLE: &str = "Priority Distribution (Completed Tasks)";

const RING_RADIUS: f64 = 70.0;

/// One arc of the completion doughnut, expressed as an SVG dash pattern on
/// a circle of radius `RING_RADIUS`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RingSegment {
    pub label: &'static str,
    pub value: u32,
    pub color: &'static str,
    pub dash: f64,
    pub gap: f64,
    /// Negative dash offset: where along the ring this arc starts.
    pub offset: f64,
}

/// Completed vs pending counts as a doughnut.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CompletionChart {
    pub title: String,
    pub completed: u32,
    pub pending: u32,
    pub segments: Vec<RingSegment>,
}

impl CompletionChart {
    pub fn from_report(report: &Report) -> Self {
        let completed = report.completed_tasks;
        let pending = report.pending_tasks;
        let total = f64::from(completed) + f64::from(pending);
        let circumference = 2.0 * PI * RING_RADIUS;

        let mut segments = Vec::new();
        if total > 0.0 {
            let mut start = 0.0;
            for (label, value, color) in [
                ("Completed Tasks", completed, COMPLETED_COLOR),
                ("Pending Tasks", pending, PENDING_COLOR),
            ] {
                let dash = circumference * f64::from(value) / total;
                segments.push(RingSegment {
                    label,
                    value,
                    color,
                    dash,
                    gap: circumference - dash,
                    offset: -start,
                });
                start += dash;
            }
        }

        let percentage = report.completion_percentage.unwrap_or_else(|| {
            if total > 0.0 {
                f64::from(completed) * 100.0 / total
            } else {
                0.0
            }
        });

        Self {
            title: format!("Completion Percentage: {}%", format_percentage(percentage)),
            completed,
            pending,
            segments,
        }
    }

    pub fn radius(&self) -> f64 {
        RING_RADIUS
    }
}

/// `75.0` -> `"75"`, `66.666` -> `"66.67"`.
fn format_percentage(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        rounded.to_string()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Bar {
    pub label: &'static str,
    pub value: u32,
    pub color: &'static str,
}

/// Completed-task counts per priority tier.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PriorityChart {
    pub bars: Vec<Bar>,
    /// Y-axis ceiling, one above the tallest bar. Never below 2.
    pub y_max: u32,
}

impl PriorityChart {
    pub fn from_report(report: &Report) -> Self {
        let stats = report.priority_stats;
        let bars = vec![
            Bar {
                label: "High",
                value: stats.high.completed,
                color: "#EF4444",
            },
            Bar {
                label: "Medium",
                value: stats.medium.completed,
                color: "#FFC300",
            },
            Bar {
                label: "Low",
                value: stats.low.completed,
                color: "#22C55E",
            },
        ];

        let tallest = bars.iter().map(|b| b.value).max().unwrap_or(0).max(1);
        Self {
            bars,
            y_max: tallest + 1,
        }
    }

    /// Axis tick values from 0 to `y_max`, at most six of them.
    pub fn ticks(&self) -> Vec<u32> {
        let step = self.y_max.div_ceil(5).max(1);
        let mut ticks: Vec<u32> = (0..=self.y_max).step_by(step as usize).collect();
        if ticks.last() != Some(&self.y_max) {
            ticks.push(self.y_max);
        }
        ticks
    }

    /// Fraction of the plot height a value occupies.
    pub fn scale(&self, value: u32) -> f64 {
        f64::from(value) / f64::from(self.y_max)
    }
}

/// A rendered chart that must be released before it is replaced.
pub(crate) trait ChartInstance {
    fn dispose(self);
}

/// Owns at most one live chart instance.
///
/// `render` always disposes the current instance before building the next
/// one; dropping the slot disposes whatever it still holds.
pub(crate) struct ChartSlot<I: ChartInstance> {
    current: Option<I>,
}

impl<I: ChartInstance> Default for ChartSlot<I> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<I: ChartInstance> ChartSlot<I> {
    pub fn render(&mut self, build: impl FnOnce() -> I) {
        self.clear();
        self.current = Some(build());
    }

    pub fn clear(&mut self) {
        if let Some(old) = self.current.take() {
            old.dispose();
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.current.is_some()
    }
}

impl<I: ChartInstance> Drop for ChartSlot<I> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriorityStats, TierStats};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeInstance {
        id: u32,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl FakeInstance {
        fn build(id: u32, log: &Rc<RefCell<Vec<String>>>) -> Self {
            log.borrow_mut().push(format!("build {id}"));
            Self {
                id,
                log: log.clone(),
            }
        }
    }

    impl ChartInstance for FakeInstance {
        fn dispose(self) {
            self.log.borrow_mut().push(format!("dispose {}", self.id));
        }
    }

    fn report_with_tiers(high: u32, medium: u32, low: u32) -> Report {
        let tier = |completed| TierStats {
            completed,
            pending: 0,
        };
        Report {
            priority_stats: PriorityStats {
                high: tier(high),
                medium: tier(medium),
                low: tier(low),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_priority_ceiling_has_headroom_and_minimum_of_two() {
        assert_eq!(PriorityChart::from_report(&report_with_tiers(0, 0, 0)).y_max, 2);
        assert_eq!(PriorityChart::from_report(&report_with_tiers(1, 0, 0)).y_max, 2);
        assert_eq!(PriorityChart::from_report(&report_with_tiers(2, 7, 3)).y_max, 8);
    }

    #[test]
    fn test_priority_bars_keep_tier_order_and_colors() {
        let chart = PriorityChart::from_report(&report_with_tiers(4, 2, 1));
        let labels: Vec<_> = chart.bars.iter().map(|b| (b.label, b.value, b.color)).collect();
        assert_eq!(
            labels,
            vec![
                ("High", 4, "#EF4444"),
                ("Medium", 2, "#FFC300"),
                ("Low", 1, "#22C55E"),
            ]
        );
    }

    #[test]
    fn test_priority_ticks_end_at_ceiling() {
        let small = PriorityChart::from_report(&report_with_tiers(1, 0, 0));
        assert_eq!(small.ticks(), vec![0, 1, 2]);

        let large = PriorityChart::from_report(&report_with_tiers(11, 0, 0));
        let ticks = large.ticks();
        assert_eq!(ticks.first(), Some(&0));
        assert_eq!(ticks.last(), Some(&12));
        assert!(ticks.len() <= 7);
    }

    #[test]
    fn test_completion_segments_split_the_ring() {
        let report = Report {
            completed_tasks: 3,
            pending_tasks: 1,
            completion_percentage: Some(75.0),
            ..Default::default()
        };
        let chart = CompletionChart::from_report(&report);
        assert_eq!(chart.title, "Completion Percentage: 75%");
        assert_eq!(chart.segments.len(), 2);

        let circumference = 2.0 * PI * chart.radius();
        let done = &chart.segments[0];
        let pending = &chart.segments[1];
        assert!((done.dash - circumference * 0.75).abs() < 1e-9);
        assert!((pending.offset + done.dash).abs() < 1e-9);
        assert_eq!(done.color, COMPLETED_COLOR);
        assert_eq!(pending.color, PENDING_COLOR);
    }

    #[test]
    fn test_completion_with_no_tasks_has_no_segments() {
        let chart = CompletionChart::from_report(&Report::default());
        assert!(chart.segments.is_empty());
        assert_eq!(chart.title, "Completion Percentage: 0%");
    }

    #[test]
    fn test_completion_percentage_falls_back_to_counts() {
        let report = Report {
            completed_tasks: 2,
            pending_tasks: 1,
            ..Default::default()
        };
        assert_eq!(
            CompletionChart::from_report(&report).title,
            "Completion Percentage: 66.67%"
        );
    }

    #[test]
    fn test_slot_disposes_previous_before_building_next() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slot = ChartSlot::default();

        slot.render(|| FakeInstance::build(1, &log));
        slot.render(|| FakeInstance::build(2, &log));
        slot.clear();
        assert!(!slot.is_occupied());
        slot.clear();

        assert_eq!(
            *log.borrow(),
            vec!["build 1", "dispose 1", "build 2", "dispose 2"]
        );
    }

    #[test]
    fn test_dropping_slot_disposes_live_instance() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut slot = ChartSlot::default();
            slot.render(|| FakeInstance::build(7, &log));
        }
        assert_eq!(*log.borrow(), vec!["build 7", "dispose 7"]);
    }
}
