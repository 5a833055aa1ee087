//! GPU gauge and history sparkline. Values are best-effort estimates.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge, Sparkline},
};

use dashtop_engine::MetricsSnapshot;

use crate::ui::theme::Theme;
use crate::ui::util::{sim_marker, spark_window};

pub fn draw_gpu_gauge(f: &mut ratatui::Frame<'_>, area: Rect, snap: &MetricsSnapshot, theme: &Theme) {
    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("GPU"))
        .gauge_style(Style::default().fg(theme.gpu))
        .percent(snap.gpu.value().clamp(0.0, 100.0) as u16)
        .label(format!("{}{:.1}%", sim_marker(snap.gpu), snap.gpu.value()));
    f.render_widget(g, area);
}

pub fn draw_gpu_spark(f: &mut ratatui::Frame<'_>, area: Rect, snap: &MetricsSnapshot, theme: &Theme) {
    let max_points = area.width.saturating_sub(2) as usize;
    let data = spark_window(&snap.gpu_history, max_points);
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title("GPU history"))
        .data(&data)
        .max(100)
        .style(Style::default().fg(theme.gpu));
    f.render_widget(spark, area);
}
