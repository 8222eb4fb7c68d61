use crate::game::{Connection, Marker, Session, SessionState, COLS, ROWS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::{App, Seat};
use std::time::{Duration, Instant};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_board(frame, app, chunks[1]);
    render_message(frame, app.message(), chunks[2]);
    render_controls(frame, chunks[3]);
}

fn marker_color(marker: Marker) -> Color {
    match marker {
        Marker::PlayerOne => Color::Green,
        Marker::PlayerTwo => Color::Red,
    }
}

fn mode_label(session: &Session) -> String {
    if session.is_automated() {
        format!(
            "vs {} (level {})",
            session.opponent_name(),
            session.automation_level()
        )
    } else {
        "Local two-player".to_string()
    }
}

/// Remaining move time as `MM:SS`, rounded up so a fresh turn shows the full limit.
fn format_clock(remaining: Duration) -> String {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let marker = session.current_marker();

    let status = match session.state() {
        SessionState::Running => match app.to_move() {
            Seat::Player => "Your turn",
            Seat::Opponent => "Other's turn",
        },
        SessionState::Win => "You win!",
        SessionState::Lose => "You lost.",
        SessionState::Tie => "Tie.",
    };

    let mut text = format!(
        "{}  |  W {}:{} L  |  {}",
        status,
        session.games_won(),
        session.games_lost(),
        mode_label(session)
    );
    if let Some(remaining) = app.remaining(Instant::now()) {
        text.push_str("  |  ");
        text.push_str(&format_clock(remaining));
    }

    let header = Paragraph::new(text)
    .style(
        Style::default()
            .fg(marker_color(marker))
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let selected_column = app.selected_column();
    let winning_line: Option<Connection> = session.where_connected();
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        let label = format!(" {} ", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else if Some(col) == app.last_opponent_column() {
            col_line.push(Span::styled(label, Style::default().fg(Color::Magenta)));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔══════════════════════╗"));

    for row in 0..ROWS {
        let mut row_spans = vec![Span::raw("  ║")];
        for col in 0..COLS {
            let highlighted = winning_line.is_some_and(|line| line.contains(row, col));
            let (symbol, mut style) = match session.board().get(row, col).marker() {
                None => (" . ", Style::default().fg(Color::DarkGray)),
                Some(marker) => (" ● ", Style::default().fg(marker_color(marker))),
            };
            if highlighted {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }
            row_spans.push(Span::styled(symbol, style));
        }
        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚══════════════════════╝"));

    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let controls = Paragraph::new(Line::from(
        "←/→: Move  |  Enter: Drop  |  R: Next game  |  Q: Quit",
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    const EMPTY_SYMBOL: char = '.';

    fn rendered_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 22)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_header_and_empty_board() {
        let app = App::new(Session::local());
        let text = rendered_text(&app);
        assert!(text.contains("Connect Four"));
        assert!(text.contains("Your turn"));
        assert!(text.contains("Local two-player"));
        assert_eq!(
            text.chars().filter(|&c| c == EMPTY_SYMBOL).count(),
            ROWS * COLS
        );
    }

    #[test]
    fn clock_rounds_up_to_whole_seconds() {
        assert_eq!(format_clock(Duration::from_secs(59)), "00:59");
        assert_eq!(format_clock(Duration::from_millis(58_001)), "00:59");
        assert_eq!(format_clock(Duration::from_secs(125)), "02:05");
        assert_eq!(format_clock(Duration::ZERO), "00:00");
    }

    #[test]
    fn renders_turn_clock_only_when_enabled() {
        let app = App::new(Session::local()).with_turn_limit(Some(Duration::from_secs(30)));
        let text = rendered_text(&app);
        assert!(text.contains("00:30") || text.contains("00:29"));

        let app = App::new(Session::local());
        assert!(!rendered_text(&app).contains("00:"));
    }

    #[test]
    fn renders_pieces_and_score() {
        let mut session = Session::local();
        session.make_player_turn(0).unwrap();
        session.make_opponent_turn(Some(1)).unwrap();
        let app = App::new(session);
        let text = rendered_text(&app);
        assert!(text.contains("W 0:0 L"));
        assert_eq!(text.matches('●').count(), 2);
        assert_eq!(
            text.chars().filter(|&c| c == EMPTY_SYMBOL).count(),
            ROWS * COLS - 2
        );
        assert_eq!(app.session().board().get(5, 0), Cell::PlayerOne);
    }
}
