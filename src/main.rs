use std::io;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use webpad::app::workbench::LoopControl;
use webpad::app::Workbench;
use webpad::kernel::services::adapters::JsonFileStore;
use webpad::logging;

const TICK_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> io::Result<()> {
    let mut logging_guard = logging::init();
    let log_rx = logging_guard.as_mut().and_then(|g| g.take_log_rx());

    let storage = JsonFileStore::in_cache_dir();
    if storage.is_none() {
        tracing::warn!("no cache dir available, persistence disabled for this session");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        cursor::SetCursorStyle::BlinkingBar
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut workbench = Workbench::new(storage, log_rx);
    let mut needs_draw = true;

    loop {
        if needs_draw {
            terminal.draw(|frame| workbench.render(frame))?;
            needs_draw = false;
        }

        if event::poll(TICK_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => {
                    needs_draw = true;
                    if workbench.handle_key(key) == LoopControl::Quit {
                        break;
                    }
                }
                Event::Resize(..) => needs_draw = true,
                _ => {}
            }
        }

        needs_draw |= workbench.tick();
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        cursor::SetCursorStyle::DefaultUserShape
    )?;
    Ok(())
}
