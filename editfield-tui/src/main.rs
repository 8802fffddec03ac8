//! Terminal demo hosting one edit field.
//!
//! Without arguments the field commits against an in-process endpoint
//! that accepts every save. Pass `--reject` to make the endpoint refuse
//! saves instead, or pass a URL to commit against a real endpoint.

mod endpoint;

use std::fs::File;
use std::io::{Stdout, stdout};
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use hyper::StatusCode;
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use simplelog::{Config, LevelFilter, WriteLogger};

use editfield::{EditField, render};

#[tokio::main]
async fn main() {
    let log_file = File::create("editfield-tui.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let action = match std::env::args().nth(1).as_deref() {
        Some("--reject") => endpoint::spawn(StatusCode::INTERNAL_SERVER_ERROR)
            .await
            .expect("Failed to start demo endpoint"),
        Some(url) => url.to_string(),
        None => endpoint::spawn(StatusCode::NO_CONTENT)
            .await
            .expect("Failed to start demo endpoint"),
    };
    log::info!("committing against {action}");

    let field = EditField::builder()
        .action(action)
        .value("medium")
        .options(vec![
            ("low", "Low"),
            ("medium", "Medium"),
            ("high", "High"),
            ("critical", "Critical"),
        ])
        .build();

    enable_raw_mode().expect("Failed to enable raw mode");
    stdout()
        .execute(EnterAlternateScreen)
        .expect("Failed to enter alternate screen");
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout())).expect("Failed to create terminal");

    let result = run(&mut terminal, &field).await;

    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);

    // Let an outstanding commit settle before dropping the runtime
    field.wait_idle().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    field: &EditField,
) -> std::io::Result<()> {
    let mut history: Vec<String> = Vec::new();
    let mut needs_redraw = true;

    loop {
        for event in field.drain_events() {
            log::info!("field event: {:?}", event);
            history.push(format!("{event:?}"));
            if history.len() > 8 {
                history.remove(0);
            }
            needs_redraw = true;
        }

        if field.is_dirty() || needs_redraw {
            terminal.draw(|frame| draw(frame, field, &history))?;
            field.clear_dirty();
            needs_redraw = false;
        }

        // Short poll so post-hoc commit results repaint promptly
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if quit_requested(field, &key) {
                break;
            }
            field.on_key(&key);
        }
    }

    Ok(())
}

fn quit_requested(field: &EditField, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char('q') if !field.is_editing() => true,
        _ => false,
    }
}

fn draw(frame: &mut Frame, field: &EditField, history: &[String]) {
    let area = frame.area();
    if area.height < 4 {
        return;
    }

    let title = Paragraph::new(Line::from("Priority   [enter/e edit, q quit]"))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(title, Rect { height: 1, ..area });

    let desired = if field.is_editing() {
        render::editor_height(field)
    } else {
        1
    };
    let field_height = desired.min(area.height.saturating_sub(2));
    let field_area = Rect {
        x: area.x,
        y: area.y + 2,
        width: area.width,
        height: field_height,
    };
    render::render(frame, field_area, field, true);

    let history_y = field_area.y + field_height + 1;
    let dim = Style::default().fg(Color::DarkGray);
    for (i, entry) in history.iter().rev().enumerate() {
        let y = history_y + i as u16;
        if y >= area.y + area.height {
            break;
        }
        let row = Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(entry.as_str()).style(dim), row);
    }
}
