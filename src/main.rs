use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use indoc::indoc;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use panel_wm::layout::persist::LayoutSnapshot;
use panel_wm::router::{DropDispatcher, DroppedFile, FileRouter, PanelContent};
use panel_wm::term::{BUTTON_WIDTH, CellScale, MouseController};
use panel_wm::window::{ContentHost, PanelId, PanelKind, PanelManager};
use panel_wm::{WmConfig, tracing_sub};

const HELP: &str = indoc! {"
    drag title: move   drag border: resize   [-] minimize   [+] fullscreen   [x] close
    n notes  s settings  a ai-text  m minimize  f fullscreen  w close  tab focus  q quit
"};

/// Panel canvas in the terminal.
#[derive(Debug, Parser)]
#[command(name = "panel-wm", version, about)]
struct Cli {
    /// Files to drop onto the canvas at startup.
    files: Vec<PathBuf>,

    /// JSON file overriding the default geometry policy.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Layout file restored at startup and written on exit.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Where tracing output goes while the canvas owns the terminal.
    #[arg(long, default_value = "panel-wm.log")]
    log_file: PathBuf,
}

/// Keeps a short text preview of every mounted panel.
#[derive(Debug, Default)]
struct PreviewHost {
    previews: BTreeMap<PanelId, String>,
}

impl ContentHost for PreviewHost {
    type Handle = PanelContent;

    fn mount(&mut self, id: PanelId, handle: &PanelContent) {
        let preview = match handle {
            PanelContent::Empty => String::new(),
            PanelContent::Text(text) => text.clone(),
            PanelContent::DataUri(uri) => {
                let head = uri.split(',').next().unwrap_or_default();
                format!("{head} ({} bytes encoded)", uri.len())
            }
        };
        self.previews.insert(id, preview);
    }

    fn unmount(&mut self, id: PanelId, _handle: PanelContent) {
        self.previews.remove(&id);
    }
}

struct App {
    wm: PanelManager<PreviewHost>,
    mouse: MouseController,
    drops: DropDispatcher,
    status: String,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init_default(Some(&cli.log_file))?;
    let config = match &cli.config {
        Some(path) => WmConfig::load(path).map_err(io::Error::other)?,
        None => WmConfig::default(),
    };

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, event::EnableMouseCapture)?;
    terminal::enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let scale = CellScale::default();
    let size = terminal.size()?;
    let canvas = canvas_area(Rect::new(0, 0, size.width, size.height));
    let mut app = App {
        wm: PanelManager::with_config(PreviewHost::default(), scale.viewport(canvas), config),
        mouse: MouseController::new(scale),
        drops: DropDispatcher::new(FileRouter::without_classifier()),
        status: String::from("ready"),
    };
    if let Some(path) = cli.layout.as_deref().filter(|path| path.exists()) {
        restore_layout(&mut app, path);
    }
    for path in &cli.files {
        match read_dropped_file(path) {
            Ok(file) => {
                app.drops.dispatch(file);
            }
            Err(err) => app.status = format!("{}: {err}", path.display()),
        }
    }

    let result = run(&mut terminal, &mut app);

    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        event::DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Some(path) = &cli.layout
        && let Err(err) = app.wm.snapshot_layout().save(path)
    {
        tracing::error!(%err, path = %path.display(), "failed to save layout");
    }
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        for opened in app.drops.apply_ready(&mut app.wm) {
            if let Some(notice) = opened.notice {
                app.status = notice.to_string();
            }
        }
        let now = Instant::now();
        app.wm.expire_pulses(now);
        terminal.draw(|frame| render(frame, app, now))?;
        app.wm.finish_render_cycle();

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let size = terminal.size()?;
        let canvas = canvas_area(Rect::new(0, 0, size.width, size.height));
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if matches!(key.code, KeyCode::Char('q'))
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL))
                {
                    return Ok(());
                }
                handle_key(app, key.code);
            }
            Event::Mouse(mouse) => {
                app.mouse.handle(&mut app.wm, canvas, mouse, Instant::now());
            }
            Event::Resize(_, _) => {
                app.wm.set_viewport(app.mouse.scale().viewport(canvas));
            }
            Event::FocusLost => app.mouse.release(&mut app.wm),
            _ => {}
        }
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    let focused = app.wm.focused();
    let result = match (code, focused) {
        (KeyCode::Char('n'), _) => open_blank(app, PanelKind::Notes),
        (KeyCode::Char('s'), _) => open_blank(app, PanelKind::Settings),
        (KeyCode::Char('a'), _) => open_blank(app, PanelKind::AiText),
        (KeyCode::Char('m'), Some(id)) => app.wm.toggle_minimize(id),
        (KeyCode::Char('f'), Some(id)) => app.wm.toggle_fullscreen(id),
        (KeyCode::Char('w'), Some(id)) => app.wm.close_panel(id),
        (KeyCode::Tab, _) => {
            app.wm.focus_next();
            Ok(())
        }
        (KeyCode::BackTab, _) => {
            app.wm.focus_prev();
            Ok(())
        }
        _ => Ok(()),
    };
    if let Err(err) = result {
        app.status = err.to_string();
    }
}

fn open_blank(app: &mut App, kind: PanelKind) -> Result<(), panel_wm::WmError> {
    let id = app
        .wm
        .open_panel(kind, kind.default_title(), PanelContent::Empty);
    app.status = format!("opened {kind} {id}");
    Ok(())
}

fn restore_layout(app: &mut App, path: &Path) {
    match LayoutSnapshot::load(path) {
        Ok(snapshot) => {
            let ids = app.wm.restore_layout(&snapshot, |_| PanelContent::Empty);
            app.status = format!("restored {} panels", ids.len());
        }
        Err(err) => {
            tracing::warn!(%err, path = %path.display(), "ignoring unreadable layout");
            app.status = err.to_string();
        }
    }
}

/// Footer rows: the status line followed by the help lines.
const FOOTER_ROWS: u16 = 3;

/// Everything above the footer.
fn canvas_area(area: Rect) -> Rect {
    Rect {
        height: area.height.saturating_sub(FOOTER_ROWS),
        ..area
    }
}

fn render(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();
    let canvas = canvas_area(area);
    let scale = app.mouse.scale();
    let focused = app.wm.focused();

    for id in app.wm.stacking_order() {
        let (Some(panel), Some(geometry)) = (app.wm.panel(id), app.wm.live_geometry(id)) else {
            continue;
        };
        let Some(rect) = scale.to_cells(canvas, geometry) else {
            continue;
        };
        let border = if app.wm.pulse(id, now).is_some() {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if Some(id) == focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title = if panel.is_new() {
            format!(" * {} ", panel.title())
        } else {
            format!(" {} ", panel.title())
        };
        let block = Block::bordered()
            .title(Line::from(title))
            .border_style(border);
        frame.render_widget(Clear, rect);
        let body = if panel.is_minimized() {
            String::new()
        } else {
            app.wm
                .host()
                .previews
                .get(&id)
                .cloned()
                .unwrap_or_default()
        };
        frame.render_widget(
            Paragraph::new(body)
                .block(block)
                .wrap(Wrap { trim: false }),
            rect,
        );
        let buttons_width = BUTTON_WIDTH * 3;
        if rect.width > buttons_width + 2 {
            let buttons = Rect {
                x: rect.x + rect.width - 1 - buttons_width,
                y: rect.y,
                width: buttons_width,
                height: 1,
            };
            frame.render_widget(Paragraph::new("[-][+][x]").style(border), buttons);
        }
    }

    let footer = Rect {
        y: area.y + canvas.height,
        height: area.height.saturating_sub(canvas.height),
        ..area
    };
    let text = format!("{}\n{}", app.status, HELP.trim_end());
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Black).bg(Color::Gray)),
        footer,
    );
}

fn read_dropped_file(path: &Path) -> io::Result<DroppedFile> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(DroppedFile::new(name, mime_for_path(path), bytes))
}

/// Extension-based MIME guess standing in for a host's ingestion layer.
fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "ts" => "application/typescript",
        "json" => "application/json",
        "py" => "text/x-python",
        "rs" => "text/x-rust",
        "c" | "h" => "text/x-c",
        "sh" => "application/x-sh",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}
