//! Party management: browse members and reorder them with a two-step swap.
//!
//! The first Confirm marks the selected slot as the swap source; a Confirm
//! on another slot swaps the two and clears the mark. Confirm on the marked
//! slot itself clears the mark. Back with a mark pending only clears it.

use ratatui::{layout::Rect, Frame};

use super::{Command, MenuCursor, Mode, ModeContext, ModeId, RenderView};
use crate::input::LogicalKey;

#[derive(Debug, Default)]
pub struct PartyScreenMode {
    cursor: MenuCursor,
    swap_source: Option<usize>,
}

impl PartyScreenMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_index(&self) -> usize {
        self.cursor.index
    }

    pub fn swap_source(&self) -> Option<usize> {
        self.swap_source
    }

    fn confirm(&mut self, ctx: &mut ModeContext<'_>) {
        let selected = self.cursor.index;
        match self.swap_source {
            None => self.swap_source = Some(selected),
            Some(source) if source == selected => self.swap_source = None,
            Some(source) => {
                if ctx.party.swap(source, selected) {
                    tracing::debug!(source, selected, "party slots swapped");
                }
                self.swap_source = None;
            }
        }
    }
}

impl Mode for PartyScreenMode {
    fn id(&self) -> ModeId {
        ModeId::PartyScreen
    }

    fn on_enter(&mut self) {
        self.cursor.reset();
        self.swap_source = None;
    }

    fn on_exit(&mut self) {
        self.swap_source = None;
    }

    fn update(&mut self, ctx: &mut ModeContext<'_>) {
        if ctx.input.is_pressed(LogicalKey::Back) {
            if self.swap_source.take().is_some() {
                ctx.input.reset();
            } else if ctx.menu_toggle_ready() {
                ctx.request(Command::ChangeMode(ModeId::World));
            }
            return;
        }

        let len = ctx.party.len();
        self.cursor.clamp(len);
        self.cursor.navigate(ctx.input, ctx.now_ms, len);

        if ctx.input.is_pressed(LogicalKey::Confirm) && len > 0 {
            self.confirm(ctx);
            ctx.input.reset();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &RenderView<'_>) {
        crate::ui::party::draw_party_screen(
            frame,
            area,
            view.party,
            self.cursor.index,
            self.swap_source,
            view.settings.locale,
        );
    }
}
