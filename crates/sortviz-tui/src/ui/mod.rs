//! The app TUI.

pub mod bars;
pub mod log;

use crate::app::{App, AppMode, AppScreen};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Tabs, Widget, Wrap},
};
use sortviz::{Algorithm, Model};
use tui_widgets::prompts::{Prompt, TextPrompt};

/// Title bar hints shared by every screen.
fn instructions() -> Line<'static> {
    Line::from(vec![
        " Command ".into(),
        "<:>".blue().bold(),
        " Quit ".into(),
        "<q> ".blue().bold(),
    ])
}

fn screen_block(title: &str) -> Block<'_> {
    Block::bordered()
        .title(Line::from(format!(" {title} ").bold()).centered())
        .title_top(instructions().right_aligned())
        .border_set(border::THICK)
}

impl<'a> App<'a> {
    // we're using this instead of Widget::render because we also need the
    // frame to use TextPrompt
    pub fn render(&mut self, frame: &mut Frame) {
        use Constraint::{Length, Min};

        let show_command = self.mode == AppMode::Command;
        let mut constraints = vec![
            // header area
            Length(1),
            // inner area
            Min(0),
        ];
        if show_command {
            constraints.push(Length(3));
        }
        let areas = Layout::vertical(constraints).split(frame.area());
        let header_area = areas[0];
        let inner_area = areas[1];
        if show_command {
            self.render_command(frame, areas[2]);
        }

        let horizontal = Layout::horizontal([Min(0), Length(18), Length(19)]);
        let [tabs_area, badge_area, title_area] = horizontal.areas(header_area);

        // tabs
        let selected_tab_index = match self.screen {
            AppScreen::Visualizer => 0,
            AppScreen::Metrics => 1,
            AppScreen::Log => 2,
            AppScreen::Help => 3,
        };
        let titles = ["Visualizer", "Metrics", "Log", "Help"]
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let key = if s == "Help" {
                    "?".blue().bold()
                } else {
                    (i + 1).to_string().blue().bold()
                };

                if i == selected_tab_index {
                    Line::from(vec!["[".blue().bold(), key, "] ".blue().bold(), s.into()])
                } else {
                    Line::from(vec!["<".blue().bold(), key, "> ".blue().bold(), s.into()])
                }
            })
            .collect::<Vec<_>>();
        Tabs::new(titles)
            .select(None)
            .padding("", "")
            .divider(" ")
            .render(tabs_area, frame.buffer_mut());

        // running algorithm
        if let Some(algorithm) = self.model.as_ref().and_then(|m| m.state.algorithm) {
            algorithm
                .name()
                .yellow()
                .render(badge_area, frame.buffer_mut());
        }

        // title
        "Sorting Visualizer"
            .bold()
            .render(title_area, frame.buffer_mut());

        match self.screen {
            AppScreen::Visualizer => self.render_visualizer_screen(frame, inner_area),
            AppScreen::Metrics => self.render_metrics_screen(frame, inner_area),
            AppScreen::Log => self.render_log_screen(frame, inner_area),
            AppScreen::Help => self.render_help_screen(frame, inner_area),
        }
    }

    fn render_command(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().border_set(border::THICK);

        TextPrompt::from("Command")
            .with_block(block)
            .draw(frame, area, &mut self.command_state);
    }

    fn render_visualizer_screen(&mut self, frame: &mut Frame, area: Rect) {
        let block = screen_block("Array");

        let Some(model) = &self.model else {
            Paragraph::new(Text::from("Waiting for model..."))
                .block(block)
                .render(area, frame.buffer_mut());
            return;
        };

        let inner = block.inner(area);
        block.render(area, frame.buffer_mut());

        let [status_area, bars_area, hints_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        let elapsed = self
            .run_started
            .map(|started| format!("{:.1}s", started.elapsed().as_secs_f64()))
            .unwrap_or_else(|| "-".to_string());

        let message = if model.state.sorted {
            model.state.message.clone().green()
        } else if model.state.paused {
            model.state.message.clone().yellow()
        } else {
            model.state.message.clone().into()
        };

        let status = vec![
            Line::from(vec![
                "Size: ".into(),
                model.array.len().to_string().yellow(),
                "  Speed: ".into(),
                format!("{} ms", model.config.delay_ms()).yellow(),
                "  Comparisons: ".into(),
                model.state.counters.comparisons.to_string().green(),
                "  Writes: ".into(),
                model.state.counters.writes.to_string().green(),
                "  Elapsed: ".into(),
                elapsed.green(),
            ]),
            Line::from(message),
        ];
        Paragraph::new(status).render(status_area, frame.buffer_mut());

        bars::render_bars(model, bars_area, frame.buffer_mut());

        hints(model).render(hints_area, frame.buffer_mut());
    }

    fn render_metrics_screen(&mut self, frame: &mut Frame, area: Rect) {
        let block = screen_block("Metrics");

        let mut lines = Vec::new();

        if let Some(model) = &self.model {
            let run = match (model.state.running, model.state.algorithm) {
                (true, Some(algorithm)) => algorithm.name().blue(),
                _ if model.state.sorted => "finished".green(),
                _ => "idle".into(),
            };
            lines.extend([
                Line::from("Current Run".bold()),
                Line::from(vec!["Status: ".into(), run]),
                Line::from(vec![
                    "Array Size: ".into(),
                    model.array.len().to_string().yellow(),
                ]),
                Line::from(vec![
                    "Comparisons: ".into(),
                    model.state.counters.comparisons.to_string().green(),
                ]),
                Line::from(vec![
                    "Writes: ".into(),
                    model.state.counters.writes.to_string().green(),
                ]),
                Line::from(""),
            ]);
        }

        lines.push(Line::from("Complexity".bold()));
        lines.extend(Algorithm::ALL.iter().map(|&algorithm| {
            let info = algorithm.info();
            let name = format!("{:<16}", algorithm.name());
            let name = if algorithm == self.info {
                Span::styled(name, Style::default().blue().bold())
            } else {
                Span::raw(name)
            };
            Line::from(vec![
                " - ".into(),
                name,
                " time ".into(),
                format!("{:<12}", info.time_complexity).yellow(),
                " space ".into(),
                info.space_complexity.yellow(),
            ])
        }));

        lines.extend([
            Line::from(""),
            Line::from(vec![
                self.info.name().bold(),
                " ".into(),
                "<tab>".blue(),
                " for next".into(),
            ]),
            Line::from(self.info.info().description),
        ]);

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, frame.buffer_mut());
    }

    fn render_help_screen(&mut self, frame: &mut Frame, area: Rect) {
        let block = screen_block("Help");

        let key_line = |keys: &[&'static str], text: &'static str| {
            let mut spans = vec![Span::raw(" - ")];
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    spans.push(" / ".into());
                }
                spans.push((*key).blue());
            }
            spans.push(Span::raw(text));
            Line::from(spans)
        };

        let lines = vec![
            Line::from("Navigation".bold()),
            key_line(&["<1>", "<2>", "<3>", "<?>"], " to change screens."),
            key_line(&["<:>"], " to open the command prompt."),
            key_line(&["<q>", "<esc>", "<ctrl + c>"], " to quit."),
            Line::from(""),
            Line::from("Sorting".bold()),
            key_line(
                &["<b>", "<i>", "<s>", "<k>", "<m>"],
                " to run bubble, insertion, selection, quick or merge sort.",
            ),
            key_line(&["<space>"], " to pause or resume."),
            key_line(&["<x>"], " to cancel the run."),
            key_line(&["<n>"], " for a new array."),
            key_line(&["<+>", "<->"], " to change the step delay."),
            key_line(&["<]>", "<[>"], " to change the array size."),
            Line::from(""),
            Line::from("Log".bold()),
            key_line(&["<up>", "<down>", "<pgup>", "<pgdn>"], " to scroll."),
            key_line(&["<g>", "<G>"], " for the top or bottom."),
            key_line(&["<f>"], " to toggle following."),
            Line::from(""),
            Line::from("Commands".bold()),
            key_line(&[":sort <algorithm>"], ""),
            key_line(&[":new"], ""),
            key_line(&[":size <n>"], ""),
            key_line(&[":speed <ms>"], ""),
            key_line(&[":pause"], ""),
            key_line(&[":cancel"], ""),
            key_line(&[":load <v1,v2,...>"], ""),
            key_line(&[":info <algorithm>"], ""),
        ];

        Paragraph::new(lines)
            .block(block)
            .render(area, frame.buffer_mut());
    }
}

/// Key hints under the chart. Keys that do nothing mid-run are dimmed.
fn hints(model: &Model) -> Line<'static> {
    let running = model.state.running;
    let key = |k: &'static str, enabled: bool| {
        if enabled { k.blue().bold() } else { k.dark_gray() }
    };
    let pause = if model.state.paused { " Resume " } else { " Pause " };

    Line::from(vec![
        " Sort ".into(),
        key("<b/i/s/k/m>", !running),
        " New ".into(),
        key("<n>", !running),
        " Size ".into(),
        key("<[/]>", !running),
        " Speed ".into(),
        key("<-/+>", true),
        pause.into(),
        key("<space>", running),
        " Cancel ".into(),
        key("<x>", running),
    ])
}
