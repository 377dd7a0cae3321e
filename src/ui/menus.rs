//! Menu overlays drawn on top of the world.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::centered_rect;

fn option_items<'a, S: AsRef<str>>(options: &'a [S], selected: usize) -> Vec<ListItem<'a>> {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let prefix = if i == selected { "> " } else { "  " };
            let style = if i == selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{}{}", prefix, option.as_ref())).style(style)
        })
        .collect()
}

fn widest<S: AsRef<str>>(options: &[S]) -> u16 {
    options
        .iter()
        .map(|option| option.as_ref().chars().count())
        .max()
        .unwrap_or(0) as u16
}

/// The main menu: a narrow column pinned to the right edge.
pub fn draw_side_menu(frame: &mut Frame, area: Rect, options: &[&str], selected: usize) {
    let width = (widest(options) + 6).min(area.width);
    let height = (options.len() as u16 + 2).min(area.height);
    let menu_area = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height,
    };

    frame.render_widget(Clear, menu_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(menu_area);
    frame.render_widget(block, menu_area);
    frame.render_widget(List::new(option_items(options, selected)), inner);
}

/// A centred titled panel listing the options.
pub fn draw_panel_menu(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    options: &[&str],
    selected: usize,
) {
    let width = widest(options).max(title.chars().count() as u16) + 8;
    let height = options.len() as u16 + 2;
    let panel_area = centered_rect(area, width.max(24), height);

    frame.render_widget(Clear, panel_area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(panel_area);
    frame.render_widget(block, panel_area);
    frame.render_widget(List::new(option_items(options, selected)), inner);
}

/// A prompt box along the bottom with the options listed under it.
pub fn draw_choice_box(
    frame: &mut Frame,
    area: Rect,
    prompt: &str,
    options: &[String],
    selected: usize,
) {
    let height = (options.len() as u16 + 4).min(area.height);
    let box_area = Rect {
        x: area.x,
        y: area.y + area.height - height,
        width: area.width,
        height,
    };

    frame.render_widget(Clear, box_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);
    if inner.height == 0 {
        return;
    }

    let prompt_area = Rect { height: 1, ..inner };
    frame.render_widget(
        Paragraph::new(Line::from(prompt))
            .alignment(Alignment::Left)
            .style(Style::default().add_modifier(Modifier::BOLD)),
        prompt_area,
    );

    let list_area = Rect {
        y: inner.y + 2,
        height: inner.height.saturating_sub(2),
        ..inner
    };
    if list_area.height > 0 {
        frame.render_widget(List::new(option_items(options, selected)), list_area);
    }
}
