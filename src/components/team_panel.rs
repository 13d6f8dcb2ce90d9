use crate::state::display::TeamSlot;
use std::path::Path;
use tui::buffer::Buffer;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::Line;
use tui::widgets::{Paragraph, Widget};

use crate::draw::default_border;

/// One competitor: name on the border, logo status and score inside.
pub struct TeamPanel<'a> {
    pub slot: &'a TeamSlot,
    pub logo: Option<&'a Path>,
}

impl TeamPanel<'_> {
    fn text_style(&self) -> Style {
        let slot = self.slot;
        if slot.emphasized {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if slot.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        }
    }

    fn logo_line(&self) -> Line<'static> {
        match (self.logo, self.slot.logo_url.is_some()) {
            (Some(path), _) => {
                let file = path.file_name().map(|f| f.to_string_lossy().into_owned());
                Line::styled(format!("[{}]", file.unwrap_or_default()), Style::default().fg(Color::DarkGray))
            }
            (None, true) => Line::styled("[logo loading]", Style::default().fg(Color::DarkGray)),
            (None, false) => Line::default(),
        }
    }
}

impl Widget for TeamPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.text_style();
        let border = if self.slot.emphasized { Color::Yellow } else { Color::DarkGray };
        let block = default_border(border).title(Line::styled(format!(" {} ", self.slot.name), style));

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let mut lines = vec![self.logo_line(), Line::default()];
        if !self.slot.score.is_empty() {
            lines.push(Line::styled(self.slot.score.clone(), style.add_modifier(Modifier::BOLD)));
        }

        // center the content block vertically
        let pad = inner.height.saturating_sub(lines.len() as u16) / 2;
        let body = Rect { y: inner.y + pad, height: inner.height - pad, ..inner };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(body, buf);
    }
}
