use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use super::{build_renderer, frame_params};
use crate::config::Config;
use crate::renderer::{Canvas, Effect, RenderParameters};

/// Upper half block: foreground paints the top pixel, background the bottom one.
const HALF_BLOCK: char = '▀';

/// Key bindings for the effect toggles.
const EFFECT_KEYS: [(char, Effect); 15] = [
    ('g', Effect::Gradient),
    ('b', Effect::BarCircle),
    ('o', Effect::Bounce),
    ('a', Effect::Bars),
    ('w', Effect::Waveform),
    ('c', Effect::CircleWaveform),
    ('i', Effect::Circles),
    ('p', Effect::Progress),
    ('d', Effect::Date),
    ('x', Effect::Pixels),
    ('e', Effect::Emboss),
    ('n', Effect::Noise),
    ('v', Effect::Invert),
    ('y', Effect::Grayscale),
    ('s', Effect::Sepia),
];

pub async fn run(config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: Config) -> Result<()> {
    let mut renderer = build_renderer(&config)?;
    let mut params = config.params.clone();

    let mut ticker = interval(Duration::from_secs_f64(1.0 / config.display.fps.max(1) as f64));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!("Terminal preview started at {} fps", config.display.fps);

    loop {
        ticker.tick().await;

        let flags = frame_params(&params, &renderer);
        renderer.render_frame(&flags);

        terminal.draw(|frame| {
            let area = frame.area();
            render_canvas(frame.buffer_mut(), area, renderer.canvas());
            render_status(frame.buffer_mut(), area, &params);
        })?;

        // Drain pending input without blocking the frame clock
        let mut quit = false;
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(key, &mut params) {
                    quit = true;
                }
            }
        }
        if quit {
            break;
        }
    }

    info!("Terminal preview stopped after {} frames", renderer.frames_rendered());
    Ok(())
}

/// Apply a key press. Returns true when the user asked to quit.
fn handle_key(key: KeyEvent, params: &mut RenderParameters) -> bool {
    match key {
        KeyEvent {
            code: KeyCode::Char('q'),
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent {
            code: KeyCode::Esc, ..
        } => true,
        KeyEvent {
            code: KeyCode::Char(ch),
            ..
        } => {
            if let Some(&(_, effect)) = EFFECT_KEYS.iter().find(|(k, _)| *k == ch) {
                params.toggle(effect);
            }
            false
        }
        _ => false,
    }
}

/// Straight RGBA composited over black.
#[inline]
fn cell_color(px: (u8, u8, u8, u8)) -> Color {
    let a = px.3 as u16;
    let over_black = |c: u8| ((c as u16 * a + 127) / 255) as u8;
    Color::Rgb(over_black(px.0), over_black(px.1), over_black(px.2))
}

/// Scale the canvas into `area`, two pixel rows per terminal row.
fn render_canvas(buf: &mut Buffer, area: Rect, canvas: &Canvas) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let rows = area.height as usize * 2;
    let cols = area.width as usize;

    for cy in 0..area.height {
        for cx in 0..area.width {
            let sx = cx as usize * canvas.width() / cols;
            let top_y = (cy as usize * 2) * canvas.height() / rows;
            let bottom_y = (cy as usize * 2 + 1) * canvas.height() / rows;

            if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                cell.set_char(HALF_BLOCK);
                cell.set_fg(cell_color(canvas.get_pixel(sx, top_y)));
                cell.set_bg(cell_color(canvas.get_pixel(sx, bottom_y)));
            }
        }
    }
}

fn render_status(buf: &mut Buffer, area: Rect, params: &RenderParameters) {
    let enabled: Vec<&str> = params.enabled().iter().map(|e| e.name()).collect();
    let status = format!(" {} | [q]uit ", enabled.join(" "));

    for (i, ch) in status.chars().enumerate() {
        if i >= area.width as usize {
            break;
        }
        if let Some(cell) = buf.cell_mut((area.x + i as u16, area.y)) {
            cell.set_char(ch);
            cell.set_fg(Color::DarkGray);
            cell.set_bg(Color::Reset);
        }
    }
}
