//! src/view/ui.rs
//! ============================================================
//! Frame renderer: toolbar, main view and, when open, the dimmed
//! backdrop with the search dialog on top. Returns the [`HitMap`] of the
//! frame so clicks can be routed against what was actually drawn.

use std::time::{Duration, Instant};

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tracing::{instrument, warn};

use crate::{
    model::search_state::{RecordRef, SearchState},
    view::{
        components::{
            search_overlay::{OverlayScroll, SearchOverlay},
            toolbar::Toolbar,
        },
        hit_map::HitMap,
        theme,
    },
};

/// Everything one frame is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub search: &'a SearchState,
    /// Record shown in the main area, if any was opened.
    pub current_view: Option<&'a RecordRef>,
    pub input_focused: bool,
    /// Bring the highlighted result into view this frame.
    pub scroll_to_selection: bool,
}

pub struct UIRenderer {
    scroll: OverlayScroll,
    stats: RenderStats,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

impl UIRenderer {
    pub fn new() -> Self {
        Self {
            scroll: OverlayScroll::default(),
            stats: RenderStats::default(),
        }
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, ctx: &RenderContext<'_>) -> HitMap {
        let start = Instant::now();
        let screen = f.area();
        let mut hits = HitMap::default();

        let [toolbar, main] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(screen);

        hits.trigger = Toolbar::new(ctx.search.is_open).render(f, toolbar);
        self.draw_main(f, ctx.current_view, main);

        if ctx.search.is_open {
            f.render_widget(Block::default().style(theme::backdrop_style()), screen);
            let dialog = dialog_rect(screen);
            hits.dialog = Some(dialog);
            SearchOverlay::new(ctx.search, ctx.input_focused).render(
                f,
                dialog,
                &mut self.scroll,
                ctx.scroll_to_selection,
                &mut hits,
            );
        } else {
            self.scroll = OverlayScroll::default();
        }

        let dur = start.elapsed();
        self.stats.total += dur;
        self.stats.frames += 1;
        if dur.as_millis() > 16 {
            self.stats.slow += 1;
            warn!("Slow render: {}ms (target: <16ms)", dur.as_millis());
        }

        hits
    }

    fn draw_main(&self, f: &mut Frame<'_>, current_view: Option<&RecordRef>, area: Rect) {
        let (title, body) = match current_view {
            Some(record) => (
                format!(" {} ", record.model_key),
                format!("Record #{} of {}", record.record_id, record.model_key),
            ),
            None => (
                " Home ".to_string(),
                "Press Ctrl+K or click Search to find a record. Press q to quit.".to_string(),
            ),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme::main_view_border_style())
            .style(theme::main_view_style());

        f.render_widget(
            Paragraph::new(body).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Dialog placed in the upper part of the screen, like a spotlight bar.
fn dialog_rect(screen: Rect) -> Rect {
    let width = (screen.width * 60 / 100)
        .max(screen.width.min(48))
        .min(screen.width);
    let height = (screen.height * 60 / 100)
        .max(screen.height.min(8))
        .min(screen.height);
    Rect {
        x: screen.x + (screen.width - width) / 2,
        y: screen.y + (screen.height - height) / 4,
        width,
        height,
    }
}

impl RenderStats {
    pub fn fps(&self) -> f64 {
        if self.frames > 0 && !self.total.is_zero() {
            self.frames as f64 / self.total.as_secs_f64()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::search_state::{ResultGroup, ResultRecord},
        view::hit_map::Hit,
    };
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(state: &SearchState, current_view: Option<&RecordRef>) -> (Terminal<TestBackend>, HitMap) {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("test backend");
        let mut renderer = UIRenderer::new();
        let mut hits = HitMap::default();
        terminal
            .draw(|f| {
                hits = renderer.render(
                    f,
                    &RenderContext {
                        search: state,
                        current_view,
                        input_focused: true,
                        scroll_to_selection: false,
                    },
                );
            })
            .expect("draw");
        (terminal, hits)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn open_state_with_results() -> SearchState {
        SearchState {
            is_open: true,
            query: "ali".into(),
            results: vec![ResultGroup::new(
                "res.partner",
                "Contacts",
                "fa-address-book",
                vec![
                    ResultRecord {
                        id: 5,
                        name: "Alice Martin".into(),
                    },
                    ResultRecord {
                        id: 9,
                        name: "Bob Alvarez".into(),
                    },
                ],
            )],
            is_loading: false,
            selected_index: Some(1),
        }
    }

    #[test]
    fn closed_overlay_shows_home_and_trigger() {
        let (terminal, hits) = draw(&SearchState::new(), None);
        let text = screen_text(&terminal);
        assert!(text.contains("Spotlight"));
        assert!(text.contains("Ctrl+K"));
        assert!(text.contains("Home"));
        assert!(hits.dialog.is_none());
        assert_eq!(hits.hit(hits.trigger.x, hits.trigger.y), Hit::Trigger);
    }

    #[test]
    fn open_overlay_lists_groups_and_records_as_hit_rows() {
        let state = open_state_with_results();
        let (terminal, hits) = draw(&state, None);
        let text = screen_text(&terminal);
        assert!(text.contains("Contacts"));
        assert!(text.contains("Alice Martin"));
        assert!(text.contains("Bob Alvarez"));

        let targets: Vec<_> = hits.rows.iter().map(|(_, r)| r.clone()).collect();
        assert_eq!(
            targets,
            vec![
                RecordRef::new("res.partner", 5),
                RecordRef::new("res.partner", 9)
            ]
        );
        let (bob_row, _) = &hits.rows[1];
        assert_eq!(
            hits.hit(bob_row.x + 2, bob_row.y),
            Hit::Record(RecordRef::new("res.partner", 9))
        );
        assert_eq!(hits.hit(0, 23), Hit::Backdrop);
    }

    #[test]
    fn placeholders_follow_derived_flags() {
        let hint = SearchState {
            is_open: true,
            query: "a".into(),
            ..SearchState::default()
        };
        let (terminal, _) = draw(&hint, None);
        assert!(screen_text(&terminal).contains("Type at least 2 characters"));

        let empty = SearchState {
            is_open: true,
            query: "zzz".into(),
            ..SearchState::default()
        };
        let (terminal, _) = draw(&empty, None);
        assert!(screen_text(&terminal).contains("No results for \"zzz\""));

        let loading = SearchState {
            is_open: true,
            query: "zzz".into(),
            is_loading: true,
            ..SearchState::default()
        };
        let (terminal, _) = draw(&loading, None);
        assert!(screen_text(&terminal).contains("Searching"));
    }

    #[test]
    fn main_area_shows_current_record() {
        let record = RecordRef::new("project.task", 21);
        let (terminal, _) = draw(&SearchState::new(), Some(&record));
        assert!(screen_text(&terminal).contains("Record #21 of project.task"));
    }

    #[test]
    fn focused_input_places_cursor() {
        let state = open_state_with_results();
        let (mut terminal, hits) = draw(&state, None);
        let dialog = hits.dialog.expect("dialog drawn");
        let cursor = terminal.get_cursor_position().expect("cursor");
        assert_eq!(cursor.y, dialog.y + 1);
        assert!(cursor.x > dialog.x);
    }

    #[test]
    fn dialog_fits_small_screens() {
        let screen = Rect::new(0, 0, 30, 6);
        let dialog = dialog_rect(screen);
        assert!(dialog.width <= 30 && dialog.height <= 6);
        assert_eq!(dialog_rect(Rect::new(0, 0, 100, 40)), Rect::new(20, 4, 60, 24));
    }
}
