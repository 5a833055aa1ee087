//! UI module root: root layout plus drawing functions for the panels.

pub mod battery;
pub mod cpu;
pub mod gpu;
pub mod header;
pub mod mem;
pub mod processes;
pub mod temp;
pub mod theme;
pub mod util;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::App;
use theme::Theme;

pub fn draw(f: &mut ratatui::Frame<'_>, app: &mut App) {
    let theme = Theme::new(app.prefs.theme);
    let area = f.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(10)])
        .split(area);

    header::draw_header(f, rows[0], &app.snapshot);

    // Body: metric cards on the left, process sidebar on the right unless
    // it is collapsed.
    let (cards_area, procs_area) = if app.prefs.sidebar_collapsed {
        (rows[1], None)
    } else {
        let lr = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);
        (lr[0], Some(lr[1]))
    };

    draw_cards(f, cards_area, app, &theme);
    if let Some(procs) = procs_area {
        processes::draw_processes(f, procs, app, &theme);
    }
}

fn draw_cards(f: &mut ratatui::Frame<'_>, area: Rect, app: &App, theme: &Theme) {
    let p = &app.prefs;
    let snap = &app.snapshot;

    let mut constraints: Vec<Constraint> = Vec::new();
    constraints.push(Constraint::Length(if p.show_cpu_graph { 7 } else { 3 }));
    constraints.push(Constraint::Length(3)); // memory gauge
    if p.show_ram_graph {
        constraints.push(Constraint::Length(4));
    }
    constraints.push(Constraint::Length(3)); // gpu gauge
    if p.show_gpu_graph {
        constraints.push(Constraint::Length(4));
    }
    constraints.push(Constraint::Length(if p.show_temp_graph { 4 } else { 3 }));
    constraints.push(Constraint::Length(3)); // battery
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut ix = 0;
    cpu::draw_cpu(f, chunks[ix], snap, theme, p.show_cpu_graph);
    ix += 1;
    mem::draw_ram_gauge(f, chunks[ix], snap, theme, p.ram_unit);
    ix += 1;
    if p.show_ram_graph {
        mem::draw_ram_spark(f, chunks[ix], snap, theme);
        ix += 1;
    }
    gpu::draw_gpu_gauge(f, chunks[ix], snap, theme);
    ix += 1;
    if p.show_gpu_graph {
        gpu::draw_gpu_spark(f, chunks[ix], snap, theme);
        ix += 1;
    }
    temp::draw_temp(f, chunks[ix], snap, theme, p.show_temp_graph);
    ix += 1;
    battery::draw_battery(f, chunks[ix], snap);
}
