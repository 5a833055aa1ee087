//! Battery gauge with charge-state icon.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
};

use dashtop_engine::{BatteryIcon, MetricsSnapshot};

pub fn draw_battery(f: &mut ratatui::Frame<'_>, area: Rect, snap: &MetricsSnapshot) {
    let b = snap.battery;
    let fg = if b.charging {
        Color::Green
    } else {
        match b.level_pct {
            x if x < 10.0 => Color::Red,
            x if x < 35.0 => Color::Yellow,
            _ => Color::Green,
        }
    };
    let label = format!(
        "{} {:.0}%{}",
        BatteryIcon::for_state(b).glyph(),
        b.level_pct,
        if b.charging { " charging" } else { "" },
    );
    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Battery"))
        .gauge_style(Style::default().fg(fg))
        .percent(b.level_pct.clamp(0.0, 100.0) as u16)
        .label(label);
    f.render_widget(g, area);
}
