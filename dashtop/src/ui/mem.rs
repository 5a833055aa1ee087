//! Memory gauge and history sparkline.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge, Sparkline},
};

use dashtop_engine::prefs::RamUnit;
use dashtop_engine::MetricsSnapshot;

use crate::ui::theme::Theme;
use crate::ui::util::{sim_marker, spark_window};

pub fn draw_ram_gauge(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    snap: &MetricsSnapshot,
    theme: &Theme,
    unit: RamUnit,
) {
    let ram = snap.ram;
    let label = match unit {
        RamUnit::Percent => format!("{}{:.1}%", sim_marker(ram.percent), ram.percent.value()),
        RamUnit::Gigabytes => format!("{:.1} / {:.1} GB", ram.used_gb, ram.total_gb),
    };
    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Memory"))
        .gauge_style(Style::default().fg(theme.ram))
        .percent(ram.percent.value().clamp(0.0, 100.0) as u16)
        .label(label);
    f.render_widget(g, area);
}

pub fn draw_ram_spark(f: &mut ratatui::Frame<'_>, area: Rect, snap: &MetricsSnapshot, theme: &Theme) {
    let max_points = area.width.saturating_sub(2) as usize;
    let data = spark_window(&snap.ram_history, max_points);
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title("Memory history"))
        .data(&data)
        .max(100)
        .style(Style::default().fg(theme.ram));
    f.render_widget(spark, area);
}
