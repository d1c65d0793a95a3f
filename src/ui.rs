use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::app::{App, DialogKind};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const DIALOG_WIDTH: u16 = 50;
const DIALOG_HEIGHT: u16 = 7;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title(" Pitch Video App ")
            .title_alignment(Alignment::Center);
        let inner = outer.inner(area);
        outer.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // clip name
                Constraint::Length(2), // progress
                Constraint::Length(2), // pending selection
                Constraint::Length(2), // action button
                Constraint::Length(2), // quit button
                Constraint::Min(0),
                Constraint::Length(2), // key legend
            ])
            .split(inner);

        Paragraph::new(Span::styled(self.clip_label(), bold_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[0], buf);

        Paragraph::new(self.progress_label())
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        selection_line(self).render(chunks[2], buf);

        let (label, enabled) = self.action_button();
        let button_style = if enabled {
            Style::default()
                .patch(bold_style)
                .fg(Color::Black)
                .bg(Color::Green)
        } else {
            dim_style
        };
        Paragraph::new(Span::styled(format!("[ {label} ]"), button_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        Paragraph::new(Span::styled("[ Quit (q) ]", dim_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        let k = self.keymap.bindings();
        let legend = format!(
            "({}) Fastball ({}) Offspeed ({}) Breaking | ({}) Strike ({}) Ball | ({}) Early | (enter) Play/Submit",
            k.fastball, k.offspeed, k.breaking, k.strike, k.ball, k.early
        );
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[6], buf);

        if let Some(dialog) = &self.dialog {
            let popup = centered(area, DIALOG_WIDTH, DIALOG_HEIGHT);
            let color = match dialog.kind {
                DialogKind::Warning => Color::Yellow,
                DialogKind::Error => Color::Red,
            };
            Clear.render(popup, buf);
            Paragraph::new(vec![
                Line::from(dialog.message.as_str()),
                Line::from(""),
                Line::from(Span::styled("(enter) OK", dim_style)),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {} ", dialog.title)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(popup, buf);
        }
    }
}

fn selection_line(app: &App) -> Paragraph<'static> {
    let pending = app.session.pending();
    let unset = Style::default().fg(Color::DarkGray);
    let set = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let pitch = match pending.pitch_type {
        Some(p) => Span::styled(p.to_string(), set),
        None => Span::styled("—", unset),
    };
    let result = match pending.result {
        Some(r) => Span::styled(r.to_string(), set),
        None => Span::styled("—", unset),
    };
    let early = if app.session.early() {
        Span::styled("early", Style::default().fg(Color::Magenta))
    } else {
        Span::styled("on time", unset)
    };

    Paragraph::new(Line::from(vec![
        Span::raw("Pitch: "),
        pitch,
        Span::raw("   Result: "),
        result,
        Span::raw("   Timing: "),
        early,
    ]))
    .alignment(Alignment::Center)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
