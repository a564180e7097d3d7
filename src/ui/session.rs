use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget},
};

use super::{HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::session_view::SessionView;

const GAUGE_MAX_WIDTH: u16 = 50;

impl Widget for &SessionView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(2), // heading
                Constraint::Length(3), // chosen options
                Constraint::Length(1), // progress
                Constraint::Length(1), // padding
                Constraint::Length(1), // time left
                Constraint::Length(2), // padding
                Constraint::Length(1), // legend
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(Span::styled("Meditation in Progress", bold_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let name = |n: Option<String>| n.unwrap_or_default();
        Paragraph::new(vec![
            Line::from(format!(
                "Speaker: {}",
                name(self.speaker().map(|s| s.to_string()))
            )),
            Line::from(format!(
                "Background Music: {}",
                name(self.music().map(|m| m.to_string()))
            )),
        ])
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        let gauge_area = super::centered_rect(GAUGE_MAX_WIDTH, 1, chunks[3]);
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio((self.progress_percent() / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.0}%", self.progress_percent()))
            .render(gauge_area, buf);

        Paragraph::new(Span::styled(self.remaining_display(), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);

        Paragraph::new(Span::styled("(e)nd session", italic_style))
            .alignment(Alignment::Center)
            .render(chunks[7], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MusicTrack, Speaker};
    use crate::store::SessionStore;
    use crate::timer::Scheduler;
    use crate::ui::buffer_text;

    #[test]
    fn renders_countdown_and_progress() {
        let mut store = SessionStore::new();
        store.set_session_options(Speaker::CalmVoice, MusicTrack::SoftPiano, 1.0);
        store.start_session();
        let mut scheduler = Scheduler::new();
        let mut view = SessionView::attach(&store, &mut scheduler);
        for _ in 0..30 {
            view.on_tick();
        }

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        (&view).render(area, &mut buf);
        let text = buffer_text(&buf);

        assert!(text.contains("0:30"));
        assert!(text.contains("50%"));
        assert!(text.contains("(e)nd session"));
    }
}
