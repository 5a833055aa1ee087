//! Top header with clock, battery indicator, and key hints.

use chrono::Local;
use dashtop_engine::{BatteryIcon, MetricsSnapshot};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, snap: &MetricsSnapshot) {
    let icon = BatteryIcon::for_state(snap.battery);
    let charging = if snap.battery.charging { " charging" } else { "" };
    let title = format!(
        "dashtop — {} | {} {:.0}%{}  (q quit, c/m sort, k kill, s sidebar, u units)",
        Local::now().format("%H:%M:%S"),
        icon.glyph(),
        snap.battery.level_pct,
        charging,
    );
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
