use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::domain::Role;

use super::app::{App, Focus, Mode, Screen, StatusKind};

pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Credential => draw_credential(frame, app),
        Screen::Main => draw_main(frame, app),
    }
}

fn focused_block(title: impl Into<String>, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title.into())
}

fn draw_credential(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(frame.area());

    let title = Paragraph::new("Chatbot Prompt Review System")
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(title, chunks[0]);

    let masked = "*".repeat(app.credential_input.chars().count());
    let input = Paragraph::new(masked).block(focused_block("OpenAI API Key", true));
    frame.render_widget(input, centered(chunks[1], 60));

    draw_status(frame, app, chunks[2]);
}

fn draw_main(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let modes = [Mode::PromptTesting, Mode::Chatbot];
    let selected = modes.iter().position(|m| *m == app.mode).unwrap_or(0);
    let mode_tabs = Tabs::new(
        modes
            .iter()
            .enumerate()
            .map(|(i, m)| Line::from(format!("F{} {}", i + 1, m.title()))),
    )
    .select(selected)
    .block(Block::default().borders(Borders::ALL).title("Mode"))
    .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(mode_tabs, rows[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    draw_models(frame, app, body[0]);
    match app.mode {
        Mode::PromptTesting => draw_results(frame, app, body[1]),
        Mode::Chatbot => draw_transcript(frame, app, body[1]),
    }

    let input_title = match app.mode {
        Mode::PromptTesting => "Enter your prompt (Enter: Submit Test)",
        Mode::Chatbot => "Type your message here... (Enter: Send)",
    };
    let input = Paragraph::new(app.input.as_str())
        .block(focused_block(input_title, app.focus == Focus::Input));
    frame.render_widget(input, rows[2]);

    draw_status(frame, app, rows[3]);

    let help = Paragraph::new(
        "Tab: focus | Space: select | r: reflect on model | Ctrl+R: reflection | Ctrl+L: clear chat | Esc: quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[4]);
}

fn draw_models(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .models
        .iter()
        .map(|model| {
            let label = match app.mode {
                Mode::PromptTesting => {
                    let mark = if app.is_selected(model) { "[x]" } else { "[ ]" };
                    let reflect = if app.reflects_on(model) { " (reflect)" } else { "" };
                    format!("{mark} {model}{reflect}")
                }
                Mode::Chatbot => {
                    let mark = if app.chat_model.as_deref() == Some(model.as_str()) {
                        "(*)"
                    } else {
                        "( )"
                    };
                    format!("{mark} {model}")
                }
            };
            ListItem::new(label)
        })
        .collect();

    let reflection = if app.reflection_enabled { "on" } else { "off" };
    let source = if app.models_are_fallback { ", built-in" } else { "" };
    let title = format!("Models ({}{}) | Reflection: {}", app.models.len(), source, reflection);

    let list = List::new(items)
        .block(focused_block(title, app.focus == Focus::Models))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.models.is_empty() {
        state.select(Some(app.cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = focused_block("Chatbot Responses", app.focus == Focus::Results);
    if app.tabs.is_empty() {
        let placeholder = Paragraph::new("Select models, enter a prompt, and press Enter.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let titles = app.tabs.iter().map(|t| Line::from(t.title()));
    let tabs = Tabs::new(titles)
        .select(app.active_tab)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, parts[0]);

    if let Some(tab) = app.tabs.get(app.active_tab) {
        let mut text = Text::from(Line::from(Span::styled(
            tab.heading(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        text.extend(Text::raw(tab.body.clone()));
        let body = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((app.scroll, 0));
        frame.render_widget(body, parts[1]);
    }
}

fn draw_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.chat_model {
        Some(model) => format!("Interactive Chatbot - {model}"),
        None => "Interactive Chatbot".to_string(),
    };

    let mut text = Text::default();
    for turn in &app.transcript {
        let (label, style) = match turn.role() {
            Role::User => ("You", Style::default().fg(Color::Green)),
            _ => ("Bot", Style::default().fg(Color::Blue)),
        };
        text.extend(Text::from(Line::from(Span::styled(
            format!("{label}:"),
            style.add_modifier(Modifier::BOLD),
        ))));
        text.extend(Text::raw(turn.content().to_string()));
        text.extend(Text::raw(String::new()));
    }

    let transcript = Paragraph::new(text)
        .block(focused_block(title, app.focus == Focus::Results))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(transcript, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.busy {
        (
            "Working...".to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    } else {
        match &app.status {
            Some(status) => {
                let color = match status.kind {
                    StatusKind::Info => Color::Gray,
                    StatusKind::Warning => Color::Yellow,
                    StatusKind::Error => Color::Red,
                };
                (status.text.clone(), Style::default().fg(color))
            }
            None => (String::new(), Style::default()),
        }
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn centered(area: Rect, percent_x: u16) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area)[1]
}
