use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::locale::{tr, Locale};
use crate::party::{Creature, Party};

fn hp_color(creature: &Creature) -> Color {
    if creature.is_fainted() {
        Color::DarkGray
    } else if creature.current_hp * 4 <= creature.max_hp {
        Color::Red
    } else if creature.current_hp * 2 <= creature.max_hp {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn member_line(
    creature: &Creature,
    selected: bool,
    marked: bool,
    locale: Locale,
) -> Line<'static> {
    let prefix = match (selected, marked) {
        (true, _) => "> ",
        (false, true) => "* ",
        (false, false) => "  ",
    };
    let name_style = if marked {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(vec![
        Span::styled(format!("{}{:<10}", prefix, creature.name), name_style),
        Span::raw(format!(" {} {:>3}  ", tr(locale, "party.level"), creature.level)),
        Span::styled(
            format!(
                "{} {}/{}",
                tr(locale, "party.hp"),
                creature.current_hp,
                creature.max_hp
            ),
            Style::default().fg(hp_color(creature)),
        ),
    ])
}

/// Full-screen party list. `swap_source` is the slot marked for swapping.
pub fn draw_party_screen(
    frame: &mut Frame,
    area: Rect,
    party: &Party,
    selected: usize,
    swap_source: Option<usize>,
    locale: Locale,
) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", tr(locale, "party.title")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let lines: Vec<Line> = if party.is_empty() {
        vec![Line::from(tr(locale, "party.empty"))]
    } else {
        party
            .members()
            .iter()
            .enumerate()
            .map(|(i, creature)| {
                member_line(creature, i == selected, swap_source == Some(i), locale)
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let help = Paragraph::new(tr(locale, "party.controls"))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[1]);
}
