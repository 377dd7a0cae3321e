use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// One-line message box in the top-left corner.
pub fn draw_toast(frame: &mut Frame, area: Rect, text: &str) {
    let width = (text.chars().count() as u16 + 4).min(area.width);
    let height = 3.min(area.height);
    let toast_area = Rect {
        x: area.x,
        y: area.y,
        width,
        height,
    };

    frame.render_widget(Clear, toast_area);
    let toast = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(toast, toast_area);
}
