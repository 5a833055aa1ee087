//! Temperature card: sparkline history or a plain readout.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Sparkline},
};

use dashtop_engine::MetricsSnapshot;

use crate::ui::theme::Theme;
use crate::ui::util::{sim_marker, spark_window};

pub fn draw_temp(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    snap: &MetricsSnapshot,
    theme: &Theme,
    graph: bool,
) {
    let reading = format!(
        "{}{:.1}°C",
        sim_marker(snap.temperature),
        snap.temperature.value()
    );
    if graph {
        let max_points = area.width.saturating_sub(2) as usize;
        let data = spark_window(&snap.temp_history, max_points);
        let spark = Sparkline::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Temp {reading}")),
            )
            .data(&data)
            .max(100)
            .style(Style::default().fg(theme.temp));
        f.render_widget(spark, area);
    } else {
        let p = Paragraph::new(reading)
            .style(Style::default().fg(theme.text))
            .block(Block::default().borders(Borders::ALL).title("Temp"));
        f.render_widget(p, area);
    }
}
