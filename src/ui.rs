use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use paratype::{compare::CharState, session::Phase};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let trainer = &self.trainer;
        let session = trainer.session();
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_lines = (session.reference().width() as f64 / width as f64).ceil() as u16 + 1;
        let results_lines = if session.result().is_some() { 7 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(1), // selection + clock
                    Constraint::Length(1), // padding
                    Constraint::Length(prompt_lines),
                    Constraint::Length(results_lines),
                    Constraint::Min(0),
                    Constraint::Length(1), // legend
                ]
                .as_ref(),
            )
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(
                    "{} / {}",
                    trainer.selection().language,
                    trainer.selection().level
                ),
                italic_style,
            ),
            Span::raw("   "),
            Span::styled(trainer.clock(), dim_bold_style),
        ]))
        .alignment(Alignment::Center);
        header.render(chunks[0], buf);

        if let Some(message) = trainer.error() {
            Paragraph::new(Span::styled(message, red_bold_style))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[2], buf);
        } else {
            let cursor = session.typed().chars().count();
            let spans = session
                .reference()
                .chars()
                .zip(session.states())
                .enumerate()
                .map(|(idx, (expected, state))| match state {
                    CharState::Correct => Span::styled(expected.to_string(), green_bold_style),
                    CharState::Incorrect => Span::styled(
                        match expected {
                            ' ' => "·".to_owned(),
                            c => c.to_string(),
                        },
                        red_bold_style,
                    ),
                    CharState::Unset if idx == cursor && session.input_enabled() => {
                        Span::styled(expected.to_string(), underlined_dim_bold_style)
                    }
                    CharState::Unset => Span::styled(expected.to_string(), dim_bold_style),
                })
                .collect::<Vec<Span>>();

            Paragraph::new(Line::from(spans))
                .alignment(if prompt_lines <= 2 {
                    Alignment::Center
                } else {
                    Alignment::Left
                })
                .wrap(Wrap { trim: true })
                .render(chunks[2], buf);
        }

        if let Some(result) = session.result() {
            let lines = result
                .labelled()
                .into_iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{label}: "), bold_style),
                        Span::raw(value),
                    ])
                })
                .collect::<Vec<Line>>();

            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Results"))
                .alignment(Alignment::Left)
                .render(chunks[3], buf);
        }

        let legend = match session.phase() {
            Phase::Locked => "(r)etry / (n)ew / (tab) language / (↑↓) level / (esc)ape",
            _ => "(←) retry / (→) new / (tab) language / (↑↓) level / (^y) copy / (esc)ape",
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }
}
