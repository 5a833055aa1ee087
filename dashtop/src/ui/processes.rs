//! Process table with per-cell coloring, keyboard selection, and a scrollbar.

use ratatui::style::Modifier;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::cmp::Ordering;

use dashtop_engine::ProcessRow;

use crate::app::App;
use crate::ui::theme::{load_color, Theme, SB_ARROW, SB_THUMB, SB_TRACK};
use crate::ui::util::human;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcSortBy {
    #[default]
    CpuDesc,
    MemDesc,
}

// Keep the header widths here so drawing and selection math match.
const COLS: [Constraint; 5] = [
    Constraint::Length(8),      // PID
    Constraint::Percentage(40), // Name
    Constraint::Length(8),      // CPU %
    Constraint::Length(12),     // Mem
    Constraint::Length(8),      // GPU %
];

/// Display order of `rows` under `sort`, as indices into `rows`.
pub fn sorted_indices(rows: &[ProcessRow], sort: ProcSortBy) -> Vec<usize> {
    let mut idxs: Vec<usize> = (0..rows.len()).collect();
    match sort {
        ProcSortBy::CpuDesc => idxs.sort_by(|&a, &b| {
            rows[b]
                .cpu_pct
                .partial_cmp(&rows[a].cpu_pct)
                .unwrap_or(Ordering::Equal)
        }),
        ProcSortBy::MemDesc => idxs.sort_by(|&a, &b| rows[b].mem_bytes.cmp(&rows[a].mem_bytes)),
    }
    idxs
}

pub fn draw_processes(f: &mut ratatui::Frame<'_>, area: Rect, app: &mut App, theme: &Theme) {
    let snap = std::sync::Arc::clone(&app.snapshot);
    let rows = &snap.processes;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Processes ({})", rows.len()));
    f.render_widget(block, area);

    // Inner area and content area (reserve 2 columns for scrollbar)
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height < 2 || inner.width < 3 {
        return;
    }
    let content = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.saturating_sub(2),
        height: inner.height,
    };

    let idxs = sorted_indices(rows, app.sort_by);

    // Scrolling follows the keyboard selection.
    let total_rows = idxs.len();
    let viewport_rows = content.height.saturating_sub(1) as usize;
    if viewport_rows == 0 {
        return;
    }
    if app.selected >= total_rows {
        app.selected = total_rows.saturating_sub(1);
    }
    if app.selected < app.procs_scroll {
        app.procs_scroll = app.selected;
    }
    if app.selected >= app.procs_scroll + viewport_rows {
        app.procs_scroll = app.selected + 1 - viewport_rows;
    }
    let max_off = total_rows.saturating_sub(viewport_rows);
    app.procs_scroll = app.procs_scroll.min(max_off);
    let offset = app.procs_scroll;
    let show_n = total_rows.saturating_sub(offset).min(viewport_rows);

    let selected = app.selected;
    let total_bytes = (snap.ram.total_gb * BYTES_PER_GB).max(1.0);

    let rows_iter = idxs.iter().enumerate().skip(offset).take(show_n).map(|(pos, &ix)| {
        let p = &rows[ix];
        let mem_pct = (p.mem_bytes as f64 / total_bytes) * 100.0;

        let cpu_fg = load_color(p.cpu_pct);
        let mem_fg = match mem_pct {
            x if x < 5.0 => Color::Blue,
            x if x < 20.0 => Color::Magenta,
            _ => Color::Red,
        };

        let emphasis = if pos == selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(p.pid.to_string()).style(Style::default().fg(Color::DarkGray)),
            Cell::from(p.name.clone()).style(Style::default().fg(theme.text)),
            Cell::from(format!("{:>5.1}", p.cpu_pct)).style(Style::default().fg(cpu_fg)),
            Cell::from(human(p.mem_bytes)),
            Cell::from(format!("{:>4.1}", p.gpu_pct)).style(Style::default().fg(Color::DarkGray)),
        ])
        .style(emphasis)
    });

    // Header with sort indicator
    let cpu_hdr = match app.sort_by {
        ProcSortBy::CpuDesc => "CPU % •",
        _ => "CPU %",
    };
    let mem_hdr = match app.sort_by {
        ProcSortBy::MemDesc => "Mem •",
        _ => "Mem",
    };
    let header = Row::new(vec!["PID", "Name", cpu_hdr, mem_hdr, "GPU %"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows_iter, COLS.to_vec())
        .header(header)
        .column_spacing(1);
    f.render_widget(table, content);

    let scroll_area = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };
    if scroll_area.height >= 3 {
        let track = (scroll_area.height - 2) as usize;
        let total = total_rows.max(1);
        let view = viewport_rows.clamp(1, total);
        let max_off = total.saturating_sub(view);

        let thumb_len = (track * view).div_ceil(total).max(1).min(track);
        let thumb_top = if max_off == 0 {
            0
        } else {
            ((track - thumb_len) * offset + max_off / 2) / max_off
        };

        let mut lines: Vec<Line> = Vec::with_capacity(scroll_area.height as usize);
        lines.push(Line::from(Span::styled("▲", Style::default().fg(SB_ARROW))));
        for i in 0..track {
            if i >= thumb_top && i < thumb_top + thumb_len {
                lines.push(Line::from(Span::styled("█", Style::default().fg(SB_THUMB))));
            } else {
                lines.push(Line::from(Span::styled("│", Style::default().fg(SB_TRACK))));
            }
        }
        lines.push(Line::from(Span::styled("▼", Style::default().fg(SB_ARROW))));
        f.render_widget(Paragraph::new(lines), scroll_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pid: u32, cpu: f64, mem: u64) -> ProcessRow {
        ProcessRow {
            pid,
            name: format!("p{pid}"),
            cpu_pct: cpu,
            mem_bytes: mem,
            gpu_pct: 0.0,
        }
    }

    #[test]
    fn cpu_sort_is_descending() {
        let rows = vec![row(1, 2.0, 10), row(2, 50.0, 5), row(3, 7.5, 99)];
        assert_eq!(sorted_indices(&rows, ProcSortBy::CpuDesc), vec![1, 2, 0]);
    }

    #[test]
    fn mem_sort_is_descending() {
        let rows = vec![row(1, 2.0, 10), row(2, 50.0, 5), row(3, 7.5, 99)];
        assert_eq!(sorted_indices(&rows, ProcSortBy::MemDesc), vec![2, 0, 1]);
    }

    #[test]
    fn sort_survives_equal_cpu_values() {
        let rows = vec![row(1, 5.0, 1), row(2, 5.0, 2)];
        let idxs = sorted_indices(&rows, ProcSortBy::CpuDesc);
        assert_eq!(idxs.len(), 2);
    }
}
