//! Plain-text presentation of dashboard events.

use std::io::{self, Write};

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::chart::ChartData;
use crate::events::DashboardEvent;
use crate::state::{history_line, DemoTrace, StatCards, TraceStyle, EMPTY_HISTORY_MESSAGE};

const BAR_WIDTH: u64 = 30;

/// Redraws charts only when their data actually changed.
#[derive(Debug, Default)]
pub struct ChartRenderer {
    last: Option<ChartData>,
    redraws: usize,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lines to draw, or `None` when `data` matches the last frame.
    pub fn update(&mut self, data: &ChartData) -> Option<Vec<String>> {
        if self.last.as_ref() == Some(data) {
            return None;
        }
        self.last = Some(data.clone());
        self.redraws += 1;
        Some(chart_lines(data))
    }

    pub fn redraws(&self) -> usize {
        self.redraws
    }
}

fn chart_lines(data: &ChartData) -> Vec<String> {
    let mut lines = vec!["Sequence timeline:".to_string()];
    if data.timeline.is_empty() {
        lines.push("  (no data)".to_string());
    }
    for point in &data.timeline {
        lines.push(format!("  {} {}", point.label, point.sequence_number));
    }

    lines.push("Distribution by site-partition:".to_string());
    if data.distribution.is_empty() {
        lines.push("  (no data)".to_string());
    }
    let peak = data
        .distribution
        .iter()
        .map(|slice| slice.count)
        .max()
        .unwrap_or(0);
    for slice in &data.distribution {
        let width = if peak == 0 {
            0
        } else {
            (slice.count * BAR_WIDTH).div_ceil(peak)
        };
        lines.push(format!(
            "  {:<12} {} {}",
            slice.key,
            "#".repeat(width as usize),
            slice.count
        ));
    }
    lines
}

fn stat_line(cards: &StatCards) -> String {
    format!(
        "Counter: {} | Generated: {} | Gaps: {} | Avg latency: {}ms",
        cards.current_counter, cards.total_generated, cards.available_gaps, cards.average_latency_ms
    )
}

fn trace_marker(style: TraceStyle) -> &'static str {
    match style {
        TraceStyle::Running => "..",
        TraceStyle::Success => "ok",
        TraceStyle::Error => "!!",
        TraceStyle::Neutral => "--",
        TraceStyle::Summary => "==",
    }
}

fn trace_lines(trace: &DemoTrace) -> Vec<String> {
    trace
        .lines
        .iter()
        .map(|line| format!("[{}] {}", trace_marker(line.style), line.text))
        .collect()
}

/// Writes each event as a few lines of text.
pub struct TerminalRenderer<W> {
    out: W,
    charts: ChartRenderer,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            charts: ChartRenderer::new(),
        }
    }

    pub fn handle(&mut self, event: &DashboardEvent) -> io::Result<()> {
        let lines = match event {
            DashboardEvent::HistoryChanged(history) => {
                let mut lines = vec!["Recent sequences:".to_string()];
                if history.is_empty() {
                    lines.push(format!("  {EMPTY_HISTORY_MESSAGE}"));
                }
                lines.extend(history.iter().map(|e| format!("  {}", history_line(e))));
                lines
            }
            DashboardEvent::LastSequenceChanged(last) => vec![format!(
                "Last sequence: {} ({})",
                last.headline(),
                last.details()
            )],
            DashboardEvent::StatsUpdated(cards) => vec![stat_line(cards)],
            DashboardEvent::StatsLoading(true) => vec!["Refreshing statistics...".to_string()],
            DashboardEvent::StatsLoading(false) => Vec::new(),
            DashboardEvent::HealthChanged(health) => vec![format!("Health: {}", health.label())],
            DashboardEvent::ChartsUpdated(data) => self.charts.update(data).unwrap_or_default(),
            DashboardEvent::DemoTraceChanged(trace) => trace_lines(trace),
            DashboardEvent::NotificationShown(notification) => vec![format!(
                "[{}] {}",
                notification.level.label(),
                notification.message
            )],
            DashboardEvent::NotificationLeaving(_) | DashboardEvent::NotificationRemoved(_) => {
                Vec::new()
            }
        };

        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }

    pub fn charts(&self) -> &ChartRenderer {
        &self.charts
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render events until the bus closes.
pub async fn run<W: Write>(
    mut renderer: TerminalRenderer<W>,
    mut events: broadcast::Receiver<DashboardEvent>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Err(err) = renderer.handle(&event) {
                    warn!(error = %err, "Failed to write dashboard output");
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "Renderer fell behind, skipping events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::chart;
    use crate::state::{sample_event, HistoryBuffer, StatsSnapshot};

    fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn unchanged_charts_are_not_redrawn() {
        let mut history = HistoryBuffer::new();
        history.push(sample_event(1));
        let data = chart::project(&history, None);

        let mut charts = ChartRenderer::new();
        assert!(charts.update(&data).is_some());
        assert!(charts.update(&data).is_none());
        assert_eq!(charts.redraws(), 1);

        history.push(sample_event(2));
        assert!(charts.update(&chart::project(&history, None)).is_some());
        assert_eq!(charts.redraws(), 2);
    }

    #[test]
    fn distribution_bars_scale_to_peak() {
        let stats = StatsSnapshot {
            sequences_by_site_partition: Some(BTreeMap::from([
                ("S1-P1".to_string(), 10),
                ("S2-P1".to_string(), 5),
            ])),
            ..Default::default()
        };
        let lines = chart_lines(&chart::project(&HistoryBuffer::new(), Some(&stats)));

        assert_eq!(lines[1], "  (no data)");
        let s1 = lines.iter().find(|l| l.contains("S1-P1")).unwrap();
        let s2 = lines.iter().find(|l| l.contains("S2-P1")).unwrap();
        assert_eq!(s1.matches('#').count(), 30);
        assert_eq!(s2.matches('#').count(), 15);
    }

    #[test]
    fn empty_history_shows_hint() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer
            .handle(&DashboardEvent::HistoryChanged(Vec::new()))
            .unwrap();
        assert!(output(renderer).contains(EMPTY_HISTORY_MESSAGE));
    }

    #[test]
    fn absent_stats_render_placeholders() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer
            .handle(&DashboardEvent::StatsUpdated(StatCards::from_snapshot(None)))
            .unwrap();
        assert_eq!(
            output(renderer),
            "Counter: - | Generated: - | Gaps: - | Avg latency: -ms\n"
        );
    }

    #[test]
    fn repeated_chart_events_write_once() {
        let data = chart::project(&HistoryBuffer::new(), None);
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer
            .handle(&DashboardEvent::ChartsUpdated(data.clone()))
            .unwrap();
        renderer
            .handle(&DashboardEvent::ChartsUpdated(data))
            .unwrap();
        assert_eq!(renderer.charts().redraws(), 1);
        assert_eq!(output(renderer).matches("Sequence timeline:").count(), 1);
    }

    #[test]
    fn demo_trace_lines_carry_markers() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer
            .handle(&DashboardEvent::DemoTraceChanged(DemoTrace::failed(
                "basic",
                "service unreachable",
            )))
            .unwrap();
        assert_eq!(output(renderer), "[!!] Demo Failed: service unreachable\n");
    }
}
