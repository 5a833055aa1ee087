//! CPU card: sparkline history with the current reading in the title.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge, Sparkline},
};

use dashtop_engine::MetricsSnapshot;

use crate::ui::theme::Theme;
use crate::ui::util::{sim_marker, spark_window};

pub fn draw_cpu(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    snap: &MetricsSnapshot,
    theme: &Theme,
    graph: bool,
) {
    let title = format!("CPU {}{:>5.1}%", sim_marker(snap.cpu), snap.cpu.value());
    if graph {
        let max_points = area.width.saturating_sub(2) as usize;
        let data = spark_window(&snap.cpu_history, max_points);
        let spark = Sparkline::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .data(&data)
            .max(100)
            .style(Style::default().fg(theme.cpu));
        f.render_widget(spark, area);
    } else {
        let g = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("CPU"))
            .gauge_style(Style::default().fg(theme.cpu))
            .percent(snap.cpu.value().clamp(0.0, 100.0) as u16)
            .label(format!("{}{:.1}%", sim_marker(snap.cpu), snap.cpu.value()));
        f.render_widget(g, area);
    }
}
