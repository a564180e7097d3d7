pub mod session;
pub mod wizard;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Paragraph, Widget},
    Frame,
};

use crate::{
    app::{App, AppState},
    audio::PreviewPlayer,
    prefs::PreferenceStore,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const WIZARD_WIDTH: u16 = 60;
const WIZARD_HEIGHT: u16 = 16;

pub fn ui<P: PreferenceStore, A: PreviewPlayer>(app: &App<P, A>, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl<P: PreferenceStore, A: PreviewPlayer> Widget for &App<P, A> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state() {
            AppState::Session => {
                if let Some(session) = self.session() {
                    session.render(area, buf);
                }
            }
            AppState::Launcher => {
                render_launcher(area, buf);
                if let Some(wizard) = self.wizard() {
                    wizard.render(centered_rect(WIZARD_WIDTH, WIZARD_HEIGHT, area), buf);
                }
            }
        }
    }
}

fn render_launcher(area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1), // title
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled("Welcome to Peaceful Meditation", bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "(enter) start meditation / (esc)ape",
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

/// Rect of at most `width` x `height` centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Style for a control that may be disabled
fn control_style(enabled: bool) -> Style {
    if enabled {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    }
}

#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let width = buf.area.width as usize;
    buf.content
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
