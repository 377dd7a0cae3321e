//! Yes/no style decision dialog driven by a [`ChoiceContext`].
//!
//! Confirm runs the continuation paired with the selected option; Back runs
//! the cancel continuation. Either one is terminal for the context and is
//! responsible for what comes next: switching mode, or configuring a fresh
//! context to nest another question without leaving the dialog.

use std::fmt;

use ratatui::{layout::Rect, Frame};

use super::{Command, MenuCursor, Mode, ModeContext, ModeId, RenderView};
use crate::input::LogicalKey;

/// A deferred action. It receives the command queue and may push any
/// command, including a new [`Command::ConfigureChoice`].
pub type Continuation = Box<dyn FnOnce(&mut Vec<Command>)>;

pub struct ChoiceContext {
    prompt: String,
    options: Vec<String>,
    actions: Vec<Continuation>,
    on_cancel: Continuation,
}

impl ChoiceContext {
    /// Pairs `options[i]` with `actions[i]`.
    ///
    /// # Panics
    /// If the option and action counts differ.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        actions: Vec<Continuation>,
        on_cancel: Continuation,
    ) -> Self {
        assert_eq!(
            options.len(),
            actions.len(),
            "every choice option needs exactly one action"
        );
        Self {
            prompt: prompt.into(),
            options,
            actions,
            on_cancel,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Consumes the context and runs the action for `index`.
    /// An index out of range runs nothing.
    pub fn choose(mut self, index: usize, commands: &mut Vec<Command>) {
        if index < self.actions.len() {
            let action = self.actions.swap_remove(index);
            action(commands);
        }
    }

    /// Consumes the context and runs the cancel continuation.
    pub fn cancel(self, commands: &mut Vec<Command>) {
        (self.on_cancel)(commands);
    }
}

impl fmt::Debug for ChoiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceContext")
            .field("prompt", &self.prompt)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct ChoiceDialogMode {
    context: Option<ChoiceContext>,
    cursor: MenuCursor,
}

impl ChoiceDialogMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held context and resets the selection.
    pub fn configure(&mut self, context: ChoiceContext) {
        tracing::debug!(prompt = %context.prompt, "choice dialog configured");
        self.context = Some(context);
        self.cursor.reset();
    }

    pub fn context(&self) -> Option<&ChoiceContext> {
        self.context.as_ref()
    }

    pub fn selected_index(&self) -> usize {
        self.cursor.index
    }
}

impl Mode for ChoiceDialogMode {
    fn id(&self) -> ModeId {
        ModeId::ChoiceDialog
    }

    fn on_enter(&mut self) {
        self.cursor.reset();
    }

    fn on_exit(&mut self) {
        self.context = None;
    }

    fn update(&mut self, ctx: &mut ModeContext<'_>) {
        let Some(len) = self.context.as_ref().map(|context| context.options.len()) else {
            // Nothing to ask: leave rather than trap the player here.
            ctx.request(Command::ChangeMode(ModeId::World));
            return;
        };

        if ctx.input.is_pressed(LogicalKey::Back) && ctx.menu_toggle_ready() {
            if let Some(context) = self.context.take() {
                context.cancel(ctx.commands);
            }
            ctx.input.reset();
            return;
        }

        self.cursor.navigate(ctx.input, ctx.now_ms, len);

        if ctx.input.is_pressed(LogicalKey::Confirm) {
            if let Some(context) = self.context.take() {
                context.choose(self.cursor.index, ctx.commands);
            }
            ctx.input.reset();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &RenderView<'_>) {
        crate::ui::world::draw_world(frame, area, view.world);
        if let Some(context) = &self.context {
            crate::ui::menus::draw_choice_box(
                frame,
                area,
                context.prompt(),
                context.options(),
                self.cursor.index,
            );
        }
    }

    fn as_choice_dialog(&mut self) -> Option<&mut ChoiceDialogMode> {
        Some(self)
    }
}
