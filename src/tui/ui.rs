//! TUI rendering for the shipment timeline

use crate::tracker::FetchPhase;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use super::app::App;

/// Draw the full frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(6),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_product_card(f, app, chunks[0]);
    draw_timeline(f, app, chunks[1]);
    draw_checkpoint_detail(f, app, chunks[2]);
    draw_status_bar(f, app, chunks[3]);
}

fn verdict_line(app: &App) -> Line<'static> {
    match app.tracker().snapshot() {
        Some(snapshot) if snapshot.report.is_empty() => Line::from(Span::styled(
            "NO CHECKPOINTS RECORDED",
            Style::default().fg(Color::Yellow),
        )),
        Some(snapshot) if snapshot.report.overall_safe => Line::from(Span::styled(
            "VERIFIED - temperature within bounds",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Some(_) => Line::from(Span::styled(
            "CANCELLED - temperature limits exceeded during transit",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "Loading shipment details...",
            Style::default().fg(Color::DarkGray),
        )),
    }
}

fn draw_product_card(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" PharmaTrack - Shipment ");

    let lines = match app.tracker().snapshot() {
        Some(snapshot) => {
            let p = &snapshot.product;
            vec![
                Line::from(vec![
                    Span::styled(
                        p.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("  (#{})", p.id)),
                ]),
                verdict_line(app),
                Line::from(format!("Price:          {}", p.price)),
                Line::from(format!("Required temp:  {}°C", p.required_temp)),
                Line::from(format!("Mfg date:       {}", p.manufacturing_date)),
                Line::from(format!("Checkpoints:    {}", snapshot.report.per_event.len())),
            ]
        }
        None => vec![verdict_line(app)],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_timeline(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Shipment Journey ");

    let items: Vec<ListItem> = match app.tracker().snapshot() {
        Some(snapshot) => snapshot
            .report
            .per_event
            .iter()
            .map(|e| {
                let (marker, style) = if e.is_safe {
                    ("●", Style::default().fg(Color::Green))
                } else {
                    ("●", Style::default().fg(Color::Red))
                };

                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", marker), style),
                    Span::raw(format!(
                        "{:<26} {:>4}°C  {}",
                        e.event.location, e.event.temperature, e.event.timestamp
                    )),
                ]))
            })
            .collect(),
        None => vec![],
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.checkpoint_list_state);
}

fn draw_checkpoint_detail(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Checkpoint ");

    let lines = match app.selected_event() {
        Some(event) => vec![
            Line::from(format!("Location:   {}", event.location)),
            Line::from(format!("Recorded:   {}", event.timestamp)),
            Line::from(format!(
                "Readings:   {}°C / {}% humidity / heat index {}",
                event.temperature, event.humidity, event.heat_index
            )),
            Line::from(format!(
                "Handled by: worker #{}, quantity {}",
                event.worker_id, event.total_quantity
            )),
            Line::from(if event.completed {
                Span::styled("Delivered", Style::default().fg(Color::Green))
            } else {
                Span::raw("In transit")
            }),
        ],
        None => vec![Line::from("No checkpoint selected")],
    };

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let phase = match app.phase() {
        FetchPhase::Idle => Span::raw("idle"),
        FetchPhase::Loading => Span::styled("loading...", Style::default().fg(Color::Yellow)),
        FetchPhase::Loaded => Span::styled("live", Style::default().fg(Color::Green)),
        FetchPhase::Error(msg) => Span::styled(
            format!("refresh failed: {}", msg),
            Style::default().fg(Color::Red),
        ),
    };

    let bar = Line::from(vec![
        Span::raw(" q: quit | up/down: select checkpoint | "),
        phase,
    ]);

    f.render_widget(Paragraph::new(bar), area);
}
