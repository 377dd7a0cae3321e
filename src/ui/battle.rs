use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::battle::{BattleResult, EncounterPhase, EncounterSession};
use crate::locale::{tr, Locale};
use crate::party::Creature;

fn hp_gauge(creature: &Creature, color: Color) -> Gauge<'static> {
    let ratio = if creature.max_hp == 0 {
        0.0
    } else {
        f64::from(creature.current_hp) / f64::from(creature.max_hp)
    };
    Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} Lv{} ", creature.name, creature.level)),
        )
        .gauge_style(Style::default().fg(color))
        .label(format!("{}/{}", creature.current_hp, creature.max_hp))
        .ratio(ratio.clamp(0.0, 1.0))
}

/// Battle screen for the wild encounter session.
pub fn draw_encounter(frame: &mut Frame, area: Rect, session: &EncounterSession, locale: Locale) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", tr(locale, "battle.title")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(inner);

    frame.render_widget(hp_gauge(session.opponent(), Color::Red), chunks[0]);
    frame.render_widget(hp_gauge(session.player(), Color::Green), chunks[2]);

    let (message, footer) = match session.phase() {
        EncounterPhase::Fighting => (
            format!("{} {}", session.opponent().name, tr(locale, "battle.appeared")),
            tr(locale, "battle.controls"),
        ),
        EncounterPhase::Finished(result) => {
            let key = match result {
                BattleResult::Victory => "battle.won",
                BattleResult::Defeat => "battle.lost",
                BattleResult::Fled | BattleResult::Abandoned => "battle.fled",
            };
            (tr(locale, key).to_string(), tr(locale, "battle.continue"))
        }
    };

    let text = Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(text, chunks[1]);

    let footer = Paragraph::new(footer)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);
}
