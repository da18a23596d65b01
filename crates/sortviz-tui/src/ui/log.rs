use crate::app::App;
use ratatui::{
    Frame,
    layout::{Margin, Rect},
    style::Stylize,
    symbols::border,
    text::Line,
    widgets::{Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Widget},
};

/// Scroll position of the log screen.
///
/// While `follow` is set the view sticks to the newest line.
#[derive(Debug)]
pub struct LogState {
    offset: usize,
    follow: bool,

    content_height: usize,
    viewport_height: usize,
}

impl Default for LogState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
            content_height: 0,
            viewport_height: 0,
        }
    }
}

impl LogState {
    fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn scroll_up(&mut self) {
        // the first press only detaches from the bottom
        if self.follow {
            self.follow = false;
        } else {
            self.offset = self.offset.saturating_sub(1);
        }
    }

    pub fn scroll_down(&mut self) {
        if self.is_at_bottom() {
            self.follow = true;
        } else {
            self.offset += 1;
        }
    }

    pub fn page_up(&mut self) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(self.viewport_height);
    }

    pub fn page_down(&mut self) {
        self.offset = (self.offset + self.viewport_height).min(self.max_offset());
        self.follow = self.is_at_bottom();
    }

    pub fn scroll_to_top(&mut self) {
        self.follow = false;
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
        self.offset = self.max_offset();
    }

    pub fn toggle_follow(&mut self) {
        if self.follow {
            self.follow = false;
        } else {
            self.scroll_to_bottom();
        }
    }

    /// Records the sizes of the last frame and pins to the bottom when
    /// following.
    fn update(&mut self, content_height: usize, viewport_height: usize) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        if self.follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }
}

impl App<'_> {
    pub(super) fn render_log_screen(&mut self, frame: &mut Frame, area: Rect) {
        let follow_hint = if self.log_state.is_following() {
            Line::from(vec![" Stop Following ".into(), "<f> ".blue().bold()])
        } else {
            Line::from(vec![" Follow ".into(), "<f> ".blue().bold()])
        };
        let position = match (self.log_state.is_at_bottom(), self.log_state.is_following()) {
            (true, true) => Line::from(" … following ".blue().bold()),
            (true, false) => Line::from(" … at end ".blue().bold()),
            (false, _) => Line::from(" ↓ more below ".blue().bold()),
        };
        let block = Block::bordered()
            .border_set(border::THICK)
            .title(Line::from(" Log ".bold()).centered())
            .title_top(super::instructions().right_aligned())
            .title_bottom(follow_hint.right_aligned())
            .title_bottom(position.left_aligned());

        let inner = block.inner(area);
        self.log_state
            .update(self.messages.len(), usize::from(inner.height));

        let lines = self
            .messages
            .iter()
            .map(|s| Line::from(s.as_str()))
            .collect::<Vec<_>>();
        let offset = u16::try_from(self.log_state.offset).unwrap_or(u16::MAX);

        Paragraph::new(lines)
            .block(block)
            .scroll((offset, 0))
            .render(area, frame.buffer_mut());

        let mut scrollbar_state =
            ScrollbarState::new(self.log_state.max_offset()).position(self.log_state.offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .track_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}
