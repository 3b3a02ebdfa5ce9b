//! Top toolbar: application title on the left, the search trigger on the right.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::view::{icons, theme};

pub const TRIGGER_LABEL: &str = "Search  Ctrl+K";

pub struct Toolbar {
    overlay_open: bool,
}

impl Toolbar {
    pub fn new(overlay_open: bool) -> Self {
        Self { overlay_open }
    }

    /// Draw the toolbar and return the trigger's area.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) -> Rect {
        let trigger_text = format!(" {} {} ", icons::SEARCH_ICON, TRIGGER_LABEL);
        let trigger_width = u16::try_from(Span::raw(trigger_text.as_str()).width())
            .unwrap_or(u16::MAX)
            .min(area.width);

        let [title_area, trigger_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(trigger_width)])
                .areas(area);

        Paragraph::new(" Spotlight")
            .style(theme::toolbar_style())
            .alignment(Alignment::Left)
            .render(title_area, frame.buffer_mut());

        Paragraph::new(trigger_text)
            .style(theme::trigger_style(self.overlay_open))
            .render(trigger_area, frame.buffer_mut());

        trigger_area
    }
}
