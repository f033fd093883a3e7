use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyCode};
use log::{info, warn};
use ratatui::{prelude::*, widgets::*};

use super::{
    components::{
        help::{render_help, render_prompt},
        Component, Logs, Plots,
    },
    player::play,
    tui::{self, Tui},
    util::event_keycode,
};
use crate::{
    algo::tabular::table::QTable,
    config::GameConfig,
    demo::Demo,
    error::{Error, Result},
    gym::StateKey,
    train::{Control, Progress, TrainingHook},
};

const TABS: [&str; 2] = ["Plots", "Logs"];
const REDRAW_INTERVAL: Duration = Duration::from_millis(50);

/// Everything drawn by the dashboard, kept apart from the terminal so both can be borrowed at once
struct View {
    episode: u32,
    max_episodes: u32,
    selected_tab: usize,
    show_help: bool,
    prompt: Option<&'static str>,
    plots: Plots,
    logs: Logs,
}

impl View {
    fn handle_key(&mut self, event: &Event) -> Option<Control> {
        if self.selected_tab == 1 && self.logs.handle_ui_event(event) {
            return None;
        }
        match event_keycode(event)? {
            KeyCode::Char('q') | KeyCode::Esc => return Some(Control::Stop),
            KeyCode::Char('h') => self.show_help = !self.show_help,
            KeyCode::Tab => self.selected_tab = (self.selected_tab + 1) % TABS.len(),
            KeyCode::Left => self.plots.prev_plot(),
            KeyCode::Right => self.plots.next_plot(),
            _ => {}
        }
        None
    }
}

impl Widget for &View {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [menu_area, main_area, progress_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        // Menu
        Tabs::new(TABS)
            .block(Block::default().padding(Padding::uniform(1)))
            .white()
            .bold()
            .highlight_style(Style::default().light_green())
            .select(self.selected_tab)
            .render(menu_area, buf);

        // Main
        match self.selected_tab {
            0 => self.plots.render(main_area, buf),
            1 => self.logs.render_ref(main_area, buf),
            _ => {}
        }

        // Progress Bar
        Gauge::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Progress"),
            )
            .gauge_style(Color::Cyan)
            .label(format!("{}/{}", self.episode, self.max_episodes))
            .ratio((f64::from(self.episode) / f64::from(self.max_episodes.max(1))).min(1.0))
            .render(progress_area, buf);

        if let Some(question) = self.prompt {
            render_prompt(area, buf, question);
        } else if self.show_help {
            render_help(area, buf, self.selected_tab);
        }
    }
}

/// Training dashboard, driven from inside the training loop
///
/// Call [`Dashboard::finish`] once training returns to restore the terminal.
pub struct Dashboard {
    terminal: Tui,
    view: View,
    fps: u32,
    last_draw: Option<Instant>,
    stop: bool,
    error: Option<Error>,
}

impl Dashboard {
    /// Take over the terminal
    ///
    /// `fps` paces the demos played at checkpoints.
    pub fn new(max_episodes: u32, fps: u32) -> io::Result<Self> {
        Ok(Self {
            terminal: tui::init()?,
            view: View {
                episode: 0,
                max_episodes,
                selected_tab: 0,
                show_help: false,
                prompt: None,
                plots: Plots::new(max_episodes),
                logs: Logs::new(log::LevelFilter::Info),
            },
            fps,
            last_draw: None,
            stop: false,
            error: None,
        })
    }

    fn draw(&mut self) -> io::Result<()> {
        let view = &self.view;
        self.terminal
            .draw(|frame| frame.render_widget(view, frame.size()))?;
        self.last_draw = Some(Instant::now());
        Ok(())
    }

    fn poll_keys(&mut self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Some(Control::Stop) = self.view.handle_key(&event::read()?) {
                info!("stop requested from the dashboard");
                self.stop = true;
            }
        }
        Ok(())
    }

    fn update(&mut self, progress: &Progress<'_>) -> io::Result<()> {
        self.view.episode = progress.episode;
        self.view.plots.update(progress);
        self.poll_keys()?;

        let due = self
            .last_draw
            .map_or(true, |at| at.elapsed() >= REDRAW_INTERVAL);
        if due || progress.episode == progress.max_episodes {
            self.draw()?;
        }
        Ok(())
    }

    /// Block until the user answers the prompt
    ///
    /// **Returns** `false` for `n`, `q` or `Esc`
    fn ask(&mut self, question: &'static str) -> io::Result<bool> {
        self.view.prompt = Some(question);
        self.draw()?;
        let answer = loop {
            match event_keycode(&event::read()?) {
                Some(KeyCode::Char('y') | KeyCode::Char('Y')) => break true,
                Some(KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') | KeyCode::Esc) => {
                    break false
                }
                _ => {}
            }
        };
        self.view.prompt = None;
        self.draw()?;
        Ok(answer)
    }

    fn demo(&mut self, table: &QTable<StateKey>, game: &GameConfig) -> Result<()> {
        if !self.ask("Watch demo now? (y/n)")? {
            return Ok(());
        }
        let demo = Demo::new(table.clone(), game.clone(), None)?;
        let score = play(&mut self.terminal, demo, self.fps)?;
        info!("demo ended with score {score}");
        self.terminal.clear()?;
        self.draw()?;
        Ok(())
    }

    /// Restore the terminal
    ///
    /// **Returns** the first error met while drawing, which also stopped training
    pub fn finish(self) -> Result<()> {
        tui::restore()?;
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl TrainingHook for Dashboard {
    fn on_episode(&mut self, progress: &Progress<'_>) -> Control {
        if self.error.is_none() {
            if let Err(err) = self.update(progress) {
                warn!("dashboard failed: {err}");
                self.error = Some(err.into());
            }
        }
        if self.stop || self.error.is_some() {
            Control::Stop
        } else {
            Control::Continue
        }
    }

    fn on_demo_checkpoint(&mut self, table: &QTable<StateKey>, game: &GameConfig) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.demo(table, game) {
            warn!("demo failed: {err}");
            self.error = Some(err);
        }
    }
}
