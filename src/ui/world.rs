use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::world::{Direction, Overworld, Tile};

/// Each map cell is drawn two columns wide so tiles look roughly square.
const CELL_WIDTH: u16 = 2;

fn tile_span(tile: Tile) -> Span<'static> {
    match tile {
        Tile::Grass => Span::styled("\"\"", Style::default().fg(Color::Green)),
        Tile::Path => Span::styled("..", Style::default().fg(Color::Yellow)),
        Tile::Tree => Span::styled("##", Style::default().fg(Color::DarkGray)),
        Tile::Water => Span::styled("~~", Style::default().fg(Color::Blue)),
    }
}

fn player_span(facing: Direction) -> Span<'static> {
    let glyph = match facing {
        Direction::Up => "@^",
        Direction::Down => "@v",
        Direction::Left => "<@",
        Direction::Right => "@>",
    };
    Span::styled(
        glyph,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

/// Draws the visible window of the map with the camera following the player.
pub fn draw_world(frame: &mut Frame, area: Rect, world: &Overworld) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let view_w = (inner.width / CELL_WIDTH) as usize;
    let view_h = inner.height as usize;
    if view_w == 0 || view_h == 0 {
        return;
    }

    let (origin_x, origin_y) = world.camera_origin(view_w, view_h);
    let player = &world.player;

    let lines: Vec<Line> = (0..view_h)
        .map(|row| {
            let y = (origin_y + row) as i32;
            let spans: Vec<Span> = (0..view_w)
                .filter_map(|col| {
                    let x = (origin_x + col) as i32;
                    if x == player.x && y == player.y {
                        return Some(player_span(player.facing));
                    }
                    world.map.tile(x, y).map(tile_span)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
