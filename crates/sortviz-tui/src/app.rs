use crate::{
    event::{Event, EventHandler, app_send},
    ui::log::LogState,
};
use anyhow::Context;
use ratatui::{
    DefaultTerminal,
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
};
use sortviz::{Algorithm, Core, CoreOptions, Model};
use std::{sync::Arc, time::Instant};
use tui_widgets::prompts::{State, Status, TextState};

/// Speed keys change the delay by this many milliseconds.
const SPEED_STEP_MS: u64 = 10;
/// Size keys change the array size by this many values.
const SIZE_STEP: usize = 5;

/// Application.
#[derive(Debug)]
pub struct App<'a> {
    pub running: bool,
    pub events: EventHandler,

    pub core: Arc<Core>,

    pub mode: AppMode,
    pub screen: AppScreen,

    pub messages: Vec<String>,

    pub log_state: LogState,
    pub command_state: TextState<'a>,
    pub model: Option<Model>,

    /// Algorithm described on the metrics screen.
    pub info: Algorithm,
    /// When the current run was first seen running.
    pub run_started: Option<Instant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppScreen {
    #[default]
    Visualizer,
    Metrics,
    Log,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Default,
    Command,
}

/// Application events.
#[derive(Debug)]
pub enum AppEvent {
    Log(String),

    Exit,

    CommandMode,
    ExitMode,

    Screen(AppScreen),

    Model(Box<Model>),
}

macro_rules! app_log {
    ($($arg:tt)*) => {
        let _ = crate::event::app_send!(crate::app::AppEvent::Log(format!($($arg)*)));
    };
}
pub(crate) use app_log;

/// A parsed prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Sort(Algorithm),
    New,
    Size(usize),
    Speed(u64),
    Pause,
    Cancel,
    Load(Vec<i64>),
    Info(Algorithm),
    Help,
}

/// Parses a prompt line. Returns `Ok(None)` for an empty line.
pub fn parse_command(command: &str) -> anyhow::Result<Option<Command>> {
    let parts = command.split_whitespace().collect::<Vec<_>>();

    let Some((&name, args)) = parts.split_first() else {
        return Ok(None);
    };

    let command = match name {
        "q" | "quit" => Command::Quit,

        "sort" | "run" => {
            if args.is_empty() {
                anyhow::bail!("usage: sort <bubble|insertion|selection|quick|merge>");
            }
            Command::Sort(args.join(" ").parse()?)
        }

        "new" | "shuffle" => Command::New,

        "size" => {
            let [size] = args else {
                anyhow::bail!("usage: size <n>");
            };
            Command::Size(size.parse().context("failed to parse size")?)
        }

        "speed" => {
            let [delay_ms] = args else {
                anyhow::bail!("usage: speed <ms>");
            };
            Command::Speed(delay_ms.parse().context("failed to parse speed")?)
        }

        "p" | "pause" | "resume" => Command::Pause,

        "cancel" | "stop" => Command::Cancel,

        "load" => {
            if args.is_empty() {
                anyhow::bail!("usage: load <v1,v2,...>");
            }
            let values = args
                .join(",")
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| {
                    s.trim()
                        .parse::<i64>()
                        .with_context(|| format!("failed to parse value `{s}`"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            Command::Load(values)
        }

        "info" => {
            if args.is_empty() {
                anyhow::bail!("usage: info <algorithm>");
            }
            Command::Info(args.join(" ").parse()?)
        }

        "help" | "h" | "?" => Command::Help,

        _ => anyhow::bail!("unknown command: {command}"),
    };

    Ok(Some(command))
}

impl<'a> App<'a> {
    /// Constructs a new instance of [`App`].
    pub fn new(options: CoreOptions) -> anyhow::Result<Self> {
        // initialize as early as possible
        let events = EventHandler::new();

        let core = Core::new(Arc::new(AppEventHandler), options)?;

        Ok(Self {
            running: true,
            events,

            core,

            mode: AppMode::default(),
            screen: AppScreen::default(),

            messages: Vec::new(),

            log_state: LogState::default(),
            command_state: TextState::default(),
            model: None,

            info: Algorithm::Bubble,
            run_started: None,
        })
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> anyhow::Result<()> {
        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            let mut event = Some(self.events.next().await?);
            while let Some(next) = event {
                self.handle_event(next)?;
                event = self.events.try_next();
            }
        }

        // shut down core
        self.core.shutdown()?;

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::Tick => self.tick(),
            Event::Crossterm(event) => {
                if let crossterm::event::Event::Key(key_event) = event {
                    self.handle_key_events(key_event)?
                }
            }
            Event::App(app_event) => self
                .handle_app_events(app_event)
                .context("handling app event failed")?,
        }
        Ok(())
    }

    /// Whether a run is in progress, as of the last model.
    pub fn is_sorting(&self) -> bool {
        self.model.as_ref().is_some_and(|m| m.state.running)
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) -> anyhow::Result<()> {
        match self.mode {
            AppMode::Default => match (self.screen, key_event.code) {
                // : or / to enter command mode
                (_, KeyCode::Char(':') | KeyCode::Char('/')) => {
                    self.events.send(AppEvent::CommandMode)
                }

                // change screens
                (_, KeyCode::Char('1')) => {
                    self.events.send(AppEvent::Screen(AppScreen::Visualizer))
                }
                (_, KeyCode::Char('2')) => self.events.send(AppEvent::Screen(AppScreen::Metrics)),
                (_, KeyCode::Char('3')) => self.events.send(AppEvent::Screen(AppScreen::Log)),
                (_, KeyCode::Char('?')) => self.events.send(AppEvent::Screen(AppScreen::Help)),

                // esc or q to quit
                (_, KeyCode::Esc | KeyCode::Char('q')) => self.events.send(AppEvent::Exit),
                // ctrl+c to quit
                (_, KeyCode::Char('c' | 'C')) if key_event.modifiers == KeyModifiers::CONTROL => {
                    self.events.send(AppEvent::Exit)
                }

                // sort controls
                (_, KeyCode::Char('b')) => self.start(Algorithm::Bubble)?,
                (_, KeyCode::Char('i')) => self.start(Algorithm::Insertion)?,
                (_, KeyCode::Char('s')) => self.start(Algorithm::Selection)?,
                (_, KeyCode::Char('k')) => self.start(Algorithm::Quick)?,
                (_, KeyCode::Char('m')) => self.start(Algorithm::Merge)?,
                (_, KeyCode::Char(' ')) => self.core.toggle_pause()?,
                (_, KeyCode::Char('x')) => self.core.cancel()?,
                (_, KeyCode::Char('n')) => self.new_array()?,
                (_, KeyCode::Char('+' | '=')) => self.change_speed(SPEED_STEP_MS as i64)?,
                (_, KeyCode::Char('-')) => self.change_speed(-(SPEED_STEP_MS as i64))?,
                (_, KeyCode::Char(']')) => self.change_size(SIZE_STEP as isize)?,
                (_, KeyCode::Char('[')) => self.change_size(-(SIZE_STEP as isize))?,

                // metrics screen
                (AppScreen::Metrics, KeyCode::Tab | KeyCode::Right) => {
                    self.info = cycle(self.info, 1);
                }
                (AppScreen::Metrics, KeyCode::BackTab | KeyCode::Left) => {
                    self.info = cycle(self.info, Algorithm::ALL.len() - 1);
                }

                // log screen
                (AppScreen::Log, KeyCode::Up) => self.log_state.scroll_up(),
                (AppScreen::Log, KeyCode::Down) => self.log_state.scroll_down(),
                (AppScreen::Log, KeyCode::PageUp) => self.log_state.page_up(),
                (AppScreen::Log, KeyCode::PageDown) => self.log_state.page_down(),
                (AppScreen::Log, KeyCode::Home | KeyCode::Char('g')) => {
                    self.log_state.scroll_to_top()
                }
                (AppScreen::Log, KeyCode::End | KeyCode::Char('G')) => {
                    self.log_state.scroll_to_bottom()
                }
                (AppScreen::Log, KeyCode::Char('f')) => self.log_state.toggle_follow(),

                _ => {}
            },

            AppMode::Command => {
                self.command_state.handle_key_event(key_event);

                match self.command_state.status() {
                    Status::Done => {
                        let command = self.command_state.value().to_string();

                        if let Err(e) = self.handle_command(&command) {
                            app_log!("Error: {e:#}");
                        }

                        self.events.send(AppEvent::ExitMode);
                    }
                    Status::Aborted => self.events.send(AppEvent::ExitMode),
                    Status::Pending => {}
                }
            }
        }

        Ok(())
    }

    /// Handles the tick event of the terminal.
    pub fn tick(&self) {}

    pub fn handle_app_events(&mut self, app_event: AppEvent) -> anyhow::Result<()> {
        match app_event {
            AppEvent::Log(s) => self.messages.push(s),

            AppEvent::Exit => self.exit(),

            AppEvent::CommandMode => {
                self.mode = AppMode::Command;
                self.command_state.focus();
            }
            AppEvent::ExitMode => {
                self.mode = AppMode::Default;
                self.command_state = TextState::default();
            }

            AppEvent::Screen(screen) => {
                self.screen = screen;
            }

            AppEvent::Model(model) => {
                match (self.is_sorting(), model.state.running) {
                    (false, true) => self.run_started = Some(Instant::now()),
                    (true, false) => {
                        if let Some(started) = self.run_started.take() {
                            app_log!(
                                "{}: {} after {:.1}s",
                                self.model
                                    .as_ref()
                                    .and_then(|m| m.state.algorithm)
                                    .map(|a| a.name())
                                    .unwrap_or("run"),
                                model.state.message,
                                started.elapsed().as_secs_f64()
                            );
                        }
                    }
                    _ => {}
                }
                if let Some(algorithm) = model.state.algorithm {
                    self.info = algorithm;
                }
                self.model = Some(*model);
            }
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> anyhow::Result<()> {
        let Some(command) = parse_command(command)? else {
            return Ok(());
        };

        match command {
            Command::Quit => self.events.send(AppEvent::Exit),
            Command::Sort(algorithm) => self.start(algorithm)?,
            Command::New => self.new_array()?,
            Command::Size(size) => {
                if self.is_sorting() {
                    anyhow::bail!("cannot resize while sorting");
                }
                self.core.set_size(size)?;
            }
            Command::Speed(delay_ms) => self.core.set_speed(delay_ms)?,
            Command::Pause => self.core.toggle_pause()?,
            Command::Cancel => self.core.cancel()?,
            Command::Load(values) => {
                if self.is_sorting() {
                    anyhow::bail!("cannot load values while sorting");
                }
                app_log!("loading {} values", values.len());
                self.core.load_array(values)?;
            }
            Command::Info(algorithm) => {
                self.info = algorithm;
                app_send!(AppEvent::Screen(AppScreen::Metrics));
            }
            Command::Help => {
                app_send!(AppEvent::Screen(AppScreen::Help));
            }
        }
        Ok(())
    }

    /// Starts a run unless one is already in progress.
    fn start(&mut self, algorithm: Algorithm) -> anyhow::Result<()> {
        if self.is_sorting() {
            log::debug!("ignoring {algorithm}, already sorting");
            return Ok(());
        }
        self.info = algorithm;
        self.core.start(algorithm)?;
        Ok(())
    }

    fn new_array(&mut self) -> anyhow::Result<()> {
        if !self.is_sorting() {
            self.core.generate_array()?;
        }
        Ok(())
    }

    fn change_speed(&mut self, delta_ms: i64) -> anyhow::Result<()> {
        let Some(model) = &self.model else {
            return Ok(());
        };
        let delay_ms = model.config.delay_ms().saturating_add_signed(delta_ms);
        self.core.set_speed(delay_ms)?;
        Ok(())
    }

    fn change_size(&mut self, delta: isize) -> anyhow::Result<()> {
        let Some(model) = &self.model else {
            return Ok(());
        };
        if model.state.running {
            return Ok(());
        }
        let size = model.config.size().saturating_add_signed(delta);
        self.core.set_size(size)?;
        Ok(())
    }

    /// Exit the app.
    fn exit(&mut self) {
        self.running = false;
    }
}

/// Steps `algorithm` forward by `by` places in [`Algorithm::ALL`].
fn cycle(algorithm: Algorithm, by: usize) -> Algorithm {
    let index = Algorithm::ALL
        .iter()
        .position(|a| *a == algorithm)
        .unwrap_or(0);
    Algorithm::ALL[(index + by) % Algorithm::ALL.len()]
}

struct AppEventHandler;

impl sortviz::EventHandler for AppEventHandler {
    fn on_update(&self, model: Model) {
        app_send!(AppEvent::Model(Box::new(model)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("q").unwrap(), Some(Command::Quit));
        assert_eq!(
            parse_command("sort quick").unwrap(),
            Some(Command::Sort(Algorithm::Quick))
        );
        assert_eq!(
            parse_command("sort Merge Sort").unwrap(),
            Some(Command::Sort(Algorithm::Merge))
        );
        assert_eq!(parse_command("size 40").unwrap(), Some(Command::Size(40)));
        assert_eq!(parse_command("speed 200").unwrap(), Some(Command::Speed(200)));
        assert_eq!(
            parse_command("load 5,3, 4,1,2").unwrap(),
            Some(Command::Load(vec![5, 3, 4, 1, 2]))
        );
        assert_eq!(
            parse_command("load -1,0").unwrap(),
            Some(Command::Load(vec![-1, 0]))
        );
        assert_eq!(
            parse_command("info selection").unwrap(),
            Some(Command::Info(Algorithm::Selection))
        );
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(parse_command("sort").is_err());
        assert!(parse_command("sort bogo").is_err());
        assert!(parse_command("size").is_err());
        assert!(parse_command("size ten").is_err());
        assert!(parse_command("speed 1 2").is_err());
        assert!(parse_command("load 1,x").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn cycles_through_algorithms() {
        assert_eq!(cycle(Algorithm::Bubble, 1), Algorithm::Insertion);
        assert_eq!(cycle(Algorithm::Selection, 1), Algorithm::Bubble);
        assert_eq!(
            cycle(Algorithm::Bubble, Algorithm::ALL.len() - 1),
            Algorithm::Selection
        );
    }
}
