use std::time::Instant;

use mockable::Clock;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, FormField, Mode};
use crate::drag::HitTarget;
use crate::notify::{ToastKind, ToastPhase};
use crate::storage::KeyValueStore;
use crate::task::{Status, TaskId};
use crate::view::{CardView, ColumnBody, ColumnView};

const TOAST_WIDTH: u16 = 40;

/// Screen regions of the last drawn frame, used for mouse hit-testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub columns: [Rect; 3],
    pub cards: Vec<(Rect, Status, TaskId)>,
    pub delete_buttons: Vec<(Rect, TaskId)>,
}

impl BoardLayout {
    pub fn hit_test(&self, x: u16, y: u16) -> HitTarget {
        let position = Position::new(x, y);
        if let Some((_, status, id)) = self.cards.iter().find(|(r, ..)| r.contains(position)) {
            return HitTarget::Card {
                status: *status,
                id: *id,
            };
        }
        Status::ALL
            .into_iter()
            .find(|s| self.columns[s.index()].contains(position))
            .map_or(HitTarget::Outside, HitTarget::Column)
    }

    pub fn delete_button_at(&self, x: u16, y: u16) -> Option<TaskId> {
        let position = Position::new(x, y);
        self.delete_buttons
            .iter()
            .find(|(r, _)| r.contains(position))
            .map(|(_, id)| *id)
    }
}

/// Replaces control characters so user text cannot inject terminal escape
/// sequences or break the card layout.
pub fn terminal_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '\u{FFFD}',
            c => c,
        })
        .collect()
}

fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "inbox" => "☐",
        "spinner" => "◌",
        "check" => "✓",
        _ => "•",
    }
}

pub fn render<S: KeyValueStore, C: Clock>(
    frame: &mut Frame,
    app: &App<S, C>,
    now: Instant,
) -> BoardLayout {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_stats(frame, header_area, app);
    let layout = render_columns(frame, body_area, app);
    render_footer(frame, footer_area, app);

    if app.mode == Mode::Form {
        render_form(frame, app);
    }
    if app.modal.is_open() {
        render_modal(frame, app.modal.message());
    }
    render_toasts(frame, app, now);
    layout
}

fn render_stats<S: KeyValueStore, C: Clock>(frame: &mut Frame, area: Rect, app: &App<S, C>) {
    let stats = app.board.stats();
    let slot = |label: &'static str, value: usize, color: Color| {
        vec![
            Span::raw(format!(" {label}: ")),
            Span::styled(
                value.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
        ]
    };
    let line: Vec<Span> = [
        slot("Total", stats.total, Color::White),
        slot("To Do", stats.todo, Color::Blue),
        slot("In Progress", stats.in_progress, Color::Yellow),
        slot("Done", stats.done, Color::Green),
    ]
    .concat();

    let header = Paragraph::new(Line::from(line)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Kanban Board ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(header, area);
}

fn render_columns<S: KeyValueStore, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    app: &App<S, C>,
) -> BoardLayout {
    let chunks = Layout::horizontal([
        Constraint::Percentage(33),
        Constraint::Percentage(33),
        Constraint::Percentage(34),
    ])
    .split(area);

    let view = app.view();
    let mut layout = BoardLayout::default();
    for column in &view.columns {
        let index = column.status.index();
        layout.columns[index] = chunks[index];
        render_column(frame, chunks[index], column, app, &mut layout);
    }
    layout
}

fn render_column<S: KeyValueStore, C: Clock>(
    frame: &mut Frame,
    area: Rect,
    column: &ColumnView,
    app: &App<S, C>,
    layout: &mut BoardLayout,
) {
    let selected = app.selected_status == column.status;
    let border_style = if app.drag.is_highlighted(column.status) {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(format!(" {} ({}) ", column.title, column.count))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cards = match &column.body {
        ColumnBody::Empty(empty) => {
            let placeholder = Paragraph::new(vec![
                Line::from(icon_glyph(empty.icon)),
                Line::from(empty.message),
            ])
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
            let [_, middle, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(2),
                Constraint::Fill(1),
            ])
            .areas(inner);
            frame.render_widget(placeholder, middle);
            return;
        }
        ColumnBody::Cards(cards) => cards,
    };

    // Scroll just far enough to keep the selected card on screen.
    let focus = if selected { app.selected_task } else { 0 };
    let mut first = 0;
    while first < focus
        && cards[first..=focus.min(cards.len() - 1)]
            .iter()
            .map(card_height)
            .sum::<u16>()
            > inner.height
    {
        first += 1;
    }

    let mut y = inner.y;
    for (offset, card) in cards[first..].iter().enumerate() {
        let height = card_height(card);
        if y + height > inner.bottom() {
            break;
        }
        let rect = Rect::new(inner.x, y, inner.width, height);
        let is_selected = selected && first + offset == app.selected_task;
        render_card(frame, rect, card, is_selected);
        layout.cards.push((rect, column.status, card.id));
        if rect.width > 6 {
            layout
                .delete_buttons
                .push((Rect::new(rect.right() - 4, rect.y, 3, 1), card.id));
        }
        y += height;
    }
}

fn card_height(card: &CardView) -> u16 {
    if card.description.is_some() {
        4
    } else {
        3
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &CardView, selected: bool) {
    let style = if card.dragging {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    } else if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(Line::from(Span::styled(
            terminal_safe(&card.title),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .title(Line::from(Span::styled("[x]", Style::default().fg(Color::Red))).right_aligned());

    let mut lines = Vec::new();
    if let Some(description) = &card.description {
        lines.push(Line::from(Span::raw(terminal_safe(description))));
    }
    lines.push(Line::from(Span::styled(
        terminal_safe(&card.created_at),
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).block(block).style(style), area);
}

fn render_footer<S: KeyValueStore, C: Clock>(frame: &mut Frame, area: Rect, app: &App<S, C>) {
    let help = if app.modal.is_open() {
        " [y] confirm  [n] cancel".to_string()
    } else if app.mode == Mode::Form {
        " [tab] switch field  [enter] add task  [esc] close".to_string()
    } else if app.drag.is_dragging() {
        match app.drop_hint() {
            Some(status) => format!(
                " Dragging: release / [enter] to move to {}  [←/→] column  [esc] cancel",
                status.title()
            ),
            None => " Dragging: move over a column to drop  [esc] cancel".to_string(),
        }
    } else {
        " [a] add  [d] delete  [space] pick up  [c] clear all  [e] export  [q] quit".to_string()
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_form<S: KeyValueStore, C: Clock>(frame: &mut Frame, app: &App<S, C>) {
    let area = centered(frame.area(), 60, 8);
    frame.render_widget(Clear, area);
    let field = |label: &'static str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let cursor = if focused { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label:<12}"), style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("{}{cursor}", terminal_safe(value)), style),
        ])
    };
    let lines = vec![
        field("Title", &app.form.title, app.form.focus == FormField::Title),
        Line::from(""),
        field(
            "Description",
            &app.form.description,
            app.form.focus == FormField::Description,
        ),
    ];
    let form = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Add Task ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(form, area);
}

fn render_modal(frame: &mut Frame, message: &str) {
    let area = centered(frame.area(), 50, 7);
    frame.render_widget(Clear, area);
    let modal = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Confirm", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::raw("[n] Cancel"),
        ]),
    ])
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm ")
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(modal, area);
}

fn render_toasts<S: KeyValueStore, C: Clock>(frame: &mut Frame, app: &App<S, C>, now: Instant) {
    let screen = frame.area();
    let width = TOAST_WIDTH.min(screen.width);
    let mut y = screen.y + 1;
    for toast in app.toasts.iter() {
        if toast.phase(now) == ToastPhase::Expired || y + 3 > screen.bottom() {
            continue;
        }
        // Slide in from the right edge.
        let hidden = ((1.0 - toast.slide(now)) * f64::from(width)).round() as u16;
        let x = screen.right().saturating_sub(width + 1) + hidden;
        let visible = screen.right().saturating_sub(x).min(width);
        if visible == 0 {
            y += 3;
            continue;
        }
        let area = Rect::new(x, y, visible, 3);
        let color = match toast.kind {
            ToastKind::Error => Color::Red,
            ToastKind::Success => Color::Green,
        };
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(terminal_safe(&toast.message))
                .style(
                    Style::default()
                        .fg(Color::White)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        y += 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanban_board::tests::{clock, FixedClock};
    use crate::kanban_board::KanbanBoard;
    use crate::storage::MemoryStore;
    use ratatui::{backend::TestBackend, Terminal};
    use rstest::rstest;

    #[rstest]
    fn terminal_safe_strips_escape_sequences() {
        assert_eq!(terminal_safe("a\u{1b}[31mb\nc"), "a\u{FFFD}[31mb c");
        assert_eq!(terminal_safe("<script>"), "<script>");
    }

    #[rstest]
    fn hit_test_prefers_cards_over_columns() {
        let mut layout = BoardLayout::default();
        layout.columns[1] = Rect::new(10, 0, 10, 10);
        layout.cards.push((Rect::new(11, 1, 8, 3), Status::InProgress, TaskId(3)));
        assert_eq!(
            layout.hit_test(12, 2),
            HitTarget::Card {
                status: Status::InProgress,
                id: TaskId(3)
            }
        );
        assert_eq!(layout.hit_test(12, 8), HitTarget::Column(Status::InProgress));
        assert_eq!(layout.hit_test(40, 8), HitTarget::Outside);
    }

    #[rstest]
    fn draws_cards_and_records_layout(clock: FixedClock) {
        let mut board = KanbanBoard::new(MemoryStore::new(), clock);
        let task = board.add_task("Write spec", "first draft").expect("add");
        let app = App::new(board, "exports");

        let mut terminal = Terminal::new(TestBackend::new(90, 20)).expect("terminal");
        let mut layout = BoardLayout::default();
        terminal
            .draw(|frame| layout = render(frame, &app, Instant::now()))
            .expect("draw");

        assert_eq!(layout.cards.len(), 1);
        let (rect, status, id) = layout.cards[0];
        assert_eq!((status, id), (Status::Todo, task.id));
        assert_eq!(
            layout.hit_test(rect.x + 1, rect.y + 1),
            HitTarget::Card {
                status: Status::Todo,
                id: task.id
            }
        );
        assert_eq!(layout.delete_buttons.len(), 1);

        let rendered: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Write spec"));
        assert!(rendered.contains("No tasks in progress"));
    }
}
