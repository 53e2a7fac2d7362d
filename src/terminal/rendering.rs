//! Rendering functions for the session UI.
//!
//! Pure ratatui composition separated from terminal lifecycle management:
//! all functions here operate on a ratatui frame and a read-only view of the
//! session state.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::camera::Frame;
use crate::overlay::BoxShape;
use crate::panel::ResultsPanel;
use crate::status::SessionStatus;

use super::cells::{CellColor, VideoGrid, OVERLAY_COLOR};

/// Fixed width of the results panel column.
const PANEL_WIDTH: u16 = 32;

/// Read-only view of everything one draw needs.
pub struct SessionView<'a> {
    /// Newest captured frame, if any.
    pub frame: Option<&'a Frame>,
    /// Negotiated frame dimensions; the overlay coordinate space.
    pub frame_dims: (u32, u32),
    /// Box shapes from the latest successful cycle.
    pub shapes: &'a [BoxShape],
    /// Results panel, absent when the class catalog never loaded.
    pub panel: Option<&'a ResultsPanel>,
    /// Session status for the indicator dot and text.
    pub status: SessionStatus,
    /// Detection server base URL, shown in the status bar.
    pub server: &'a str,
    /// Whether the bottom status bar is drawn.
    pub show_status_bar: bool,
}

/// Render the complete session screen: video, results panel, status bar.
pub fn render_session(frame: &mut ratatui::Frame, view: &SessionView, area: Rect) {
    let main_area = if view.show_status_bar {
        Rect {
            height: area.height.saturating_sub(1),
            ..area
        }
    } else {
        area
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(PANEL_WIDTH)])
        .split(main_area);

    render_video(frame, view, columns[0]);
    render_results(frame, view.panel, columns[1]);

    if view.show_status_bar {
        render_status_bar(frame, view, area);
    }
}

/// Render the live video with composited detection overlays.
pub fn render_video(frame: &mut ratatui::Frame, view: &SessionView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" camera ")
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let grid = VideoGrid::compose(
        view.frame,
        view.shapes,
        view.frame_dims,
        inner.width,
        inner.height,
    );
    frame.render_widget(Paragraph::new(grid_lines(&grid)), inner);
}

fn grid_lines(grid: &VideoGrid) -> Vec<Line<'static>> {
    (0..grid.height())
        .map(|y| {
            let spans: Vec<Span> = (0..grid.width())
                .map(|x| {
                    let cell = grid.cell(x, y);
                    Span::styled(
                        cell.ch.to_string(),
                        Style::default()
                            .fg(to_color(cell.fg))
                            .bg(to_color(cell.bg)),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn to_color(color: CellColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Render the per-class results panel, or its empty state when the catalog
/// never loaded.
pub fn render_results(frame: &mut ratatui::Frame, panel: Option<&ResultsPanel>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" results ")
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let Some(panel) = panel else {
        let empty_state = Paragraph::new(vec![
            Line::default(),
            Line::from("class list unavailable"),
            Line::from("detection disabled"),
        ])
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty_state, inner);
        return;
    };

    let bar_width = inner.width.saturating_sub(2).max(1) as usize;
    let mut lines = Vec::with_capacity(panel.rows().len() * 2);

    for row in panel.rows() {
        let percent_text = format!("{}%", row.percent);

        let (name_style, percent_style) = if row.detected {
            (
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(to_color(OVERLAY_COLOR)),
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };

        // Name left, percentage right-aligned within the inner width.
        let name_budget = (inner.width as usize).saturating_sub(percent_text.len() + 1);
        let name: String = row.name.chars().take(name_budget).collect();
        let padding = (inner.width as usize)
            .saturating_sub(name.chars().count() + percent_text.len());
        lines.push(Line::from(vec![
            Span::styled(name, name_style),
            Span::raw(" ".repeat(padding)),
            Span::styled(percent_text, percent_style),
        ]));

        // Bar fill mirrors the rounded percentage.
        let filled = (row.percent as usize * bar_width + 50) / 100;
        let filled = filled.min(bar_width);
        lines.push(Line::from(vec![
            Span::styled(
                "█".repeat(filled),
                Style::default().fg(to_color(OVERLAY_COLOR)),
            ),
            Span::styled(
                "░".repeat(bar_width - filled),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the status bar on the bottom row.
pub fn render_status_bar(frame: &mut ratatui::Frame, view: &SessionView, area: Rect) {
    let status_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let dot_color = if view.status.is_degraded() {
        Color::Red
    } else {
        Color::Green
    };
    let (width, height) = view.frame_dims;

    let line = Line::from(vec![
        Span::styled(" ● ", Style::default().fg(dot_color).bg(Color::White)),
        Span::styled(
            format!(
                "{} | {}x{} | {} | q quit ",
                view.status.text(),
                width,
                height,
                view.server
            ),
            Style::default().fg(Color::Black).bg(Color::White),
        ),
    ]);

    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::White)),
        status_area,
    );
}
