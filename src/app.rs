//! App: terminal init, frame loop, key handling.

use crate::game::{BoardEvent, GameState};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::{Args, GameConfig, ui};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

pub struct App {
    theme: Theme,
    state: GameState,
    /// Last score published by the game; what the sidebar shows.
    score: u32,
    frame_interval: Duration,
    no_animation: bool,
    /// Running row-clear / wipe flash.
    flash: Option<Effect>,
    started: Instant,
    last_frame: Instant,
}

impl App {
    pub fn new(args: &Args, config: &GameConfig, theme: Theme) -> Self {
        let now = Instant::now();
        Self {
            theme,
            state: GameState::new(config),
            score: 0,
            frame_interval: Duration::from_secs_f64(1.0 / args.frame_rate),
            no_animation: args.no_animation,
            flash: None,
            started: now,
            last_frame: now,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Every restore step runs even when the loop or an earlier step failed.
        let restore = [
            terminal.show_cursor(),
            execute!(std::io::stdout(), LeaveAlternateScreen),
            disable_raw_mode(),
        ];
        loop_error_first(result, restore)
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let frame_start = Instant::now();
            let now_ms = frame_start.duration_since(self.started).as_millis() as u64;
            let flash_delta = frame_start.duration_since(self.last_frame);
            self.last_frame = frame_start;

            let view = self.state.step(now_ms);
            if let Some(score) = view.score_update {
                self.score = score;
            }
            if !self.no_animation {
                for event in &view.events {
                    self.flash = Some(match event {
                        BoardEvent::RowsCleared(_) => ui::row_clear_flash(&self.theme),
                        BoardEvent::Wiped => ui::wipe_flash(&self.theme),
                    });
                }
            }
            terminal.draw(|f| {
                ui::draw(
                    f,
                    &view,
                    &self.theme,
                    self.score,
                    &mut self.flash,
                    flash_delta,
                );
            })?;

            // Input until the next frame is due.
            let deadline = frame_start + self.frame_interval;
            loop {
                let timeout = deadline.saturating_duration_since(Instant::now());
                if !event::poll(timeout)? {
                    break;
                }
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key_to_action(key) {
                    Action::Quit => return Ok(()),
                    Action::Game(command) => self.state.apply(command),
                    Action::None => {}
                }
            }
        }
    }
}

/// The loop's own error wins over any failure while restoring the terminal.
fn loop_error_first(
    result: Result<()>,
    restore: impl IntoIterator<Item = std::io::Result<()>>,
) -> Result<()> {
    result?;
    for step in restore {
        step?;
    }
    Ok(())
}
