//! Spotlight dialog: query input, grouped results and placeholders.
//!
//! ```text
//! ┌──────────────── Search ────────────────┐
//! │  ali▏                                  │
//! │────────────────────────────────────────│
//! │  Contacts                             │
//! │    Alice Martin                        │
//! │    Bob Alvarez                         │
//! │  Tasks                                │
//! │    Call Alice about renewal            │
//! └────────────────────────────────────────┘
//! ```

use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    model::{
        flatten,
        search_state::{MIN_QUERY_CHARS, RecordRef, SearchState},
    },
    view::{hit_map::HitMap, icons, theme},
};

/// One rendered row of the result body.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BodyLine<'a> {
    Header {
        icon: &'a str,
        label: &'a str,
    },
    Record {
        flat_index: usize,
        model_key: &'a str,
        id: i64,
        name: &'a str,
    },
}

/// First visible body line, kept across frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayScroll {
    pub offset: usize,
}

impl OverlayScroll {
    /// Adjust the offset for this frame.
    ///
    /// With `follow` set the highlighted line is brought into view with the
    /// smallest move. Without a highlight the list shows its top.
    pub fn settle(
        &mut self,
        selected_line: Option<usize>,
        viewport: usize,
        total_lines: usize,
        follow: bool,
    ) {
        let Some(line) = selected_line else {
            self.offset = 0;
            return;
        };

        if follow && viewport > 0 {
            if line < self.offset {
                self.offset = line;
            } else if line >= self.offset + viewport {
                self.offset = line + 1 - viewport;
            }
        }

        self.offset = self.offset.min(total_lines.saturating_sub(viewport));
    }
}

pub struct SearchOverlay<'a> {
    state: &'a SearchState,
    input_focused: bool,
}

impl<'a> SearchOverlay<'a> {
    pub fn new(state: &'a SearchState, input_focused: bool) -> Self {
        Self {
            state,
            input_focused,
        }
    }

    /// Draw into `dialog`, recording clickable rows in `hits`.
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        dialog: Rect,
        scroll: &mut OverlayScroll,
        follow_selection: bool,
        hits: &mut HitMap,
    ) {
        frame.render_widget(Clear, dialog);

        let title = if self.state.is_loading {
            " Searching… "
        } else {
            " Search "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .border_style(theme::overlay_border_style())
            .style(theme::overlay_style());
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let [input_area, separator_area, body_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);

        self.render_input(frame, input_area);
        frame.render_widget(
            Paragraph::new("─".repeat(usize::from(separator_area.width)))
                .style(theme::separator_style()),
            separator_area,
        );
        self.render_body(frame, body_area, scroll, follow_selection, hits);
    }

    fn render_input(&self, frame: &mut Frame<'_>, area: Rect) {
        let prompt = Span::styled(format!(" {} ", icons::SEARCH_ICON), theme::input_prompt_style());
        let query = Span::styled(self.state.query.as_str(), theme::input_style());
        let cursor_x = area
            .x
            .saturating_add(u16::try_from(prompt.width() + query.width()).unwrap_or(u16::MAX))
            .min(area.right().saturating_sub(1));

        frame.render_widget(Paragraph::new(Line::from(vec![prompt, query])), area);

        if self.input_focused {
            frame.set_cursor_position(Position::new(cursor_x, area.y));
        }
    }

    fn render_body(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        scroll: &mut OverlayScroll,
        follow_selection: bool,
        hits: &mut HitMap,
    ) {
        if area.height == 0 {
            return;
        }

        if let Some(message) = self.placeholder() {
            frame.render_widget(
                Paragraph::new(message)
                    .style(theme::placeholder_style())
                    .alignment(Alignment::Center),
                area,
            );
            return;
        }

        let lines = self.body_lines();
        let selected_line = self.state.selected_index.and_then(|selected| {
            lines.iter().position(|line| {
                matches!(line, BodyLine::Record { flat_index, .. } if *flat_index == selected)
            })
        });

        let viewport = usize::from(area.height);
        scroll.settle(selected_line, viewport, lines.len(), follow_selection);

        for (row, line) in lines.iter().skip(scroll.offset).take(viewport).enumerate() {
            let row_area = Rect {
                y: area.y + row as u16,
                height: 1,
                ..area
            };

            match *line {
                BodyLine::Header { icon, label } => {
                    let text = format!(" {} {}", icons::glyph(icon), label);
                    frame.render_widget(
                        Paragraph::new(text).style(theme::group_header_style()),
                        row_area,
                    );
                }
                BodyLine::Record {
                    flat_index,
                    model_key,
                    id,
                    name,
                } => {
                    let style = if self.state.selected_index == Some(flat_index) {
                        theme::selected_record_style()
                    } else {
                        theme::record_style()
                    };
                    frame.render_widget(Paragraph::new(format!("    {name}")).style(style), row_area);
                    hits.rows.push((row_area, RecordRef::new(model_key, id)));
                }
            }
        }
    }

    fn placeholder(&self) -> Option<String> {
        if self.state.show_hint() {
            Some(format!("Type at least {MIN_QUERY_CHARS} characters to search"))
        } else if self.state.show_no_results() {
            Some(format!("No results for \"{}\"", self.state.query))
        } else if self.state.results.is_empty() {
            Some("Searching…".to_string())
        } else {
            None
        }
    }

    fn body_lines(&self) -> Vec<BodyLine<'a>> {
        let state: &'a SearchState = self.state;
        let groups = flatten::flat_groups(&state.results);
        let mut lines = Vec::with_capacity(groups.len() + state.total_results());
        for group in groups {
            lines.push(BodyLine::Header {
                icon: group.group.icon.as_str(),
                label: group.group.display_label.as_str(),
            });
            lines.extend(group.records().map(|entry| BodyLine::Record {
                flat_index: entry.flat_index,
                model_key: entry.model_key,
                id: entry.record.id,
                name: entry.record.name.as_str(),
            }));
        }
        lines
    }
}
