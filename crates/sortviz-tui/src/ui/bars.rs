//! Bar chart of the current array.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Bar, BarChart, BarGroup, Widget},
};
use sortviz::{BarTone, Model, model::MAX_VALUE};

/// Width of the reference canvas that `sortviz::model::bar_width` is
/// expressed in.
const CANVAS_WIDTH: f64 = 800.0;

/// Returns `(bar width, gap)` in columns for `size` bars in `width` columns.
///
/// Bars are scaled from the reference canvas to the terminal width, are at
/// least one column wide, and shrink (dropping the gap first) until they
/// fit when the terminal allows.
pub fn bar_layout(size: usize, width: u16) -> (u16, u16) {
    if size == 0 {
        return (1, 0);
    }

    let scale = f64::from(width) / CANVAS_WIDTH;
    let mut bar = ((sortviz::model::bar_width(size) * scale).floor() as u16).max(1);
    let mut gap = 1;

    let fits = |bar: u16, gap: u16| (usize::from(bar) + usize::from(gap)) * size <= usize::from(width);
    while !fits(bar, gap) {
        if gap > 0 {
            gap = 0;
        } else if bar > 1 {
            bar -= 1;
        } else {
            break;
        }
    }

    (bar, gap)
}

pub fn tone_color(tone: BarTone) -> Color {
    match tone {
        BarTone::InProgress => Color::Magenta,
        BarTone::Sorted => Color::Green,
    }
}

/// Draws one bar per value, heights relative to the largest generated value.
pub fn render_bars(model: &Model, area: Rect, buf: &mut Buffer) {
    let color = tone_color(model.tone());
    let (bar_width, bar_gap) = bar_layout(model.array.len(), area.width);

    let max = model
        .array
        .iter()
        .copied()
        .max()
        .unwrap_or(0)
        .max(MAX_VALUE);

    let bars = model
        .array
        .iter()
        .map(|&value| {
            Bar::default()
                .value(value.max(0) as u64)
                .text_value(String::new())
                .style(Style::default().fg(color))
        })
        .collect::<Vec<_>>();

    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .max(max as u64)
        .render(area, buf);
}
