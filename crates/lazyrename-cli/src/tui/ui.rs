//! TUI rendering logic for the rename form.

use lazyrename_core::Mode;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::state::{Focus, FormState, StatusKind};

/// Draws the rename form.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // mode
            Constraint::Min(3),    // folder rows
            Constraint::Length(3), // digits to trim
            Constraint::Length(4), // status
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_mode(frame, chunks[0], state);
    draw_rows(frame, chunks[1], state);
    draw_trim(frame, chunks[2], state);
    draw_status(frame, chunks[3], state);
    draw_footer(frame, chunks[4]);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Draws the mode selector as two radio buttons.
fn draw_mode(frame: &mut Frame, area: Rect, state: &FormState) {
    let radio = |mode: Mode, label: &'static str| {
        let marker = if state.app.mode() == mode { "(\u{25cf}) " } else { "( ) " };
        Span::raw(format!("{marker}{label}    "))
    };

    let line = Line::from(vec![
        radio(Mode::Manual, "Select folders manually"),
        radio(Mode::Subfolders, "Process all subfolders"),
    ]);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(state.focus == Focus::Mode))
            .title(mode_title(state.app.mode())),
    );
    frame.render_widget(paragraph, area);
}

fn mode_title(mode: Mode) -> String {
    format!(" Mode: {mode} ")
}

/// Draws the folder rows.
fn draw_rows(frame: &mut Frame, area: Rect, state: &FormState) {
    let rows_focused = matches!(state.focus, Focus::Row(_));
    let items: Vec<ListItem> = state
        .app
        .rows()
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let focused = state.focus == Focus::Row(i);
            let marker = if focused { "\u{25b8} " } else { "  " };
            let style = if focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let cursor = if focused { "_" } else { "" };

            ListItem::new(Line::from(vec![
                Span::raw(String::from(marker)),
                Span::styled(format!("{:<14}", state.row_label(i)), style),
                Span::styled(format!("{entry}{cursor}"), style),
            ]))
        })
        .collect();

    let title = format!(
        " Folders {}/{} ",
        state.app.rows().row_count(),
        lazyrename_core::MAX_FOLDER_ROWS
    );
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(rows_focused))
            .title(title),
    );
    frame.render_widget(list, area);
}

/// Draws the digits-to-trim input.
fn draw_trim(frame: &mut Frame, area: Rect, state: &FormState) {
    let focused = state.focus == Focus::Trim;
    let cursor = if focused { "_" } else { "" };
    let paragraph = Paragraph::new(format!("{}{cursor}", state.app.trim_text())).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(focused))
            .title(" Digits to trim "),
    );
    frame.render_widget(paragraph, area);
}

/// Draws the last status message.
fn draw_status(frame: &mut Frame, area: Rect, state: &FormState) {
    let (text, style) = state.status.as_ref().map_or_else(
        || (String::new(), Style::default()),
        |status| {
            let color = match status.kind {
                StatusKind::Info => Color::Green,
                StatusKind::Warning => Color::Yellow,
                StatusKind::Error => Color::Red,
            };
            (status.text.clone(), Style::default().fg(color))
        },
    );

    let paragraph = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(paragraph, area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect) {
    let help_text = "Tab/\u{2191}\u{2193}: move  Space: toggle mode  Ctrl+N: add folder  Ctrl+D: remove folder  Ctrl+R: rename  Ctrl+S: save  Esc: quit";
    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
