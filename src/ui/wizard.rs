use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::control_style;
use crate::catalog::{MusicTrack, Speaker, PRESET_MINUTES};
use crate::wizard::{SetupWizard, WizardStep};

impl Widget for &SetupWizard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let draft = self.draft();

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Set Up Your Meditation Session ")
            .title_bottom(Line::from(format!(" step {} of 3 ", draft.step.number())).right_aligned());
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(2)
            .vertical_margin(1)
            .constraints([
                Constraint::Min(0),    // step body
                Constraint::Length(1), // back / next
            ])
            .split(inner);

        let body = match draft.step {
            WizardStep::Speaker => option_lines(
                "Choose a Speaker",
                "Select a speaker",
                &Speaker::ALL.map(|s| s.to_string()),
                draft.speaker.map(|s| s.to_string()),
                self.can_preview(),
                draft.remember_speaker,
            ),
            WizardStep::Music => option_lines(
                "Choose Background Music",
                "Select background music",
                &MusicTrack::ALL.map(|m| m.to_string()),
                draft.music.map(|m| m.to_string()),
                self.can_preview(),
                draft.remember_music,
            ),
            WizardStep::Duration => duration_lines(self),
        };
        Paragraph::new(body).render(chunks[0], buf);

        let next_label = if draft.step == WizardStep::Duration {
            "(enter) Start Session"
        } else {
            "(enter) Next"
        };
        Paragraph::new(Line::from(vec![
            Span::styled("(←) Back", control_style(self.can_back())),
            Span::raw("   "),
            Span::styled("(esc) cancel", Style::default().add_modifier(Modifier::ITALIC)),
            Span::raw("   "),
            Span::styled(next_label, control_style(self.can_next())),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    }
}

fn selected_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn option_lines(
    label: &'static str,
    placeholder: &'static str,
    names: &[String],
    selected: Option<String>,
    can_preview: bool,
    remember: bool,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            label,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if selected.is_none() {
        lines.push(Line::from(Span::styled(
            format!("  {placeholder} (↑/↓)"),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    for name in names {
        if selected.as_deref() == Some(name.as_str()) {
            lines.push(Line::from(Span::styled(format!("› {name}"), selected_style())));
        } else {
            lines.push(Line::from(format!("  {name}")));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "(p) Play Preview",
        control_style(can_preview),
    )));
    lines.push(Line::from(format!(
        "[{}] Remember my choice (space)",
        if remember { "x" } else { " " }
    )));
    lines
}

fn duration_lines(wizard: &SetupWizard) -> Vec<Line<'static>> {
    let draft = wizard.draft();
    let mut lines = vec![
        Line::from(Span::styled(
            "Select Duration",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for minutes in PRESET_MINUTES {
        let text = format!("{minutes} minutes");
        if !draft.custom_mode && draft.preset_minutes == minutes {
            lines.push(Line::from(Span::styled(format!("› {text}"), selected_style())));
        } else {
            lines.push(Line::from(format!("  {text}")));
        }
    }

    if draft.custom_mode {
        lines.push(Line::from(Span::styled("› Custom", selected_style())));
        lines.push(Line::from(""));
        let value_style = if wizard.can_next() {
            Style::default().add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::UNDERLINED)
        };
        lines.push(Line::from(vec![
            Span::raw("  Duration: "),
            Span::styled(format!("{:<4}", draft.custom_value), value_style),
            Span::raw(format!(" {} (u)nit", draft.custom_unit)),
        ]));
    } else {
        lines.push(Line::from("  Custom"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{MemoryPreferenceStore, PreferenceStore, PREFERRED_MUSIC_KEY};
    use crate::store::SessionStore;
    use crate::ui::buffer_text;
    use std::path::PathBuf;

    fn render(wizard: &SetupWizard) -> String {
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        wizard.render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn speaker_step_shows_placeholder_until_selected() {
        let mut wizard = SetupWizard::open(&MemoryPreferenceStore::new(), PathBuf::new());
        let text = render(&wizard);
        assert!(text.contains("Select a speaker"));
        assert!(text.contains("[ ] Remember my choice"));
        assert!(text.contains("step 1 of 3"));

        wizard.select_speaker(Speaker::GentleGuide);
        let text = render(&wizard);
        assert!(!text.contains("Select a speaker"));
        assert!(text.contains("› Gentle Guide"));
    }

    #[test]
    fn music_step_reflects_remembered_choice() {
        let mut prefs = MemoryPreferenceStore::new();
        prefs.set(PREFERRED_MUSIC_KEY, "Soft Piano").unwrap();
        let mut wizard = SetupWizard::open(&prefs, PathBuf::new());
        wizard.select_speaker(Speaker::CalmVoice);
        wizard.next(&mut SessionStore::new(), &mut prefs);

        let text = render(&wizard);
        assert!(text.contains("Choose Background Music"));
        assert!(text.contains("› Soft Piano"));
        assert!(text.contains("[x] Remember my choice"));
    }

    #[test]
    fn duration_step_shows_custom_entry() {
        let mut prefs = MemoryPreferenceStore::new();
        let mut store = SessionStore::new();
        let mut wizard = SetupWizard::open(&prefs, PathBuf::new());
        wizard.select_speaker(Speaker::CalmVoice);
        wizard.next(&mut store, &mut prefs);
        wizard.select_music(MusicTrack::OceanWaves);
        wizard.next(&mut store, &mut prefs);

        let text = render(&wizard);
        assert!(text.contains("› 5 minutes"));
        assert!(text.contains("Start Session"));

        wizard.select_custom();
        wizard.set_custom_value("90");
        let text = render(&wizard);
        assert!(text.contains("› Custom"));
        assert!(text.contains("Duration: 90"));
        assert!(text.contains("Minutes"));
    }
}
