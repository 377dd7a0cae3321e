use ratatui::{layout::Rect, Frame};

use super::dialogs::exit_confirmation;
use super::{Command, MenuCursor, Mode, ModeContext, ModeId, RenderView};
use crate::input::LogicalKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuOption {
    Party,
    Save,
    Settings,
    Exit,
}

impl MainMenuOption {
    pub const ALL: [MainMenuOption; 4] = [
        MainMenuOption::Party,
        MainMenuOption::Save,
        MainMenuOption::Settings,
        MainMenuOption::Exit,
    ];

    pub fn label_key(self) -> &'static str {
        match self {
            MainMenuOption::Party => "menu.party",
            MainMenuOption::Save => "menu.save",
            MainMenuOption::Settings => "menu.settings",
            MainMenuOption::Exit => "menu.exit",
        }
    }
}

#[derive(Debug, Default)]
pub struct MainMenuMode {
    cursor: MenuCursor,
}

impl MainMenuMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> MainMenuOption {
        MainMenuOption::ALL[self.cursor.index]
    }

    fn dispatch(option: MainMenuOption, ctx: &mut ModeContext<'_>) {
        match option {
            MainMenuOption::Party => ctx.request(Command::ChangeMode(ModeId::PartyScreen)),
            MainMenuOption::Save => {
                ctx.request(Command::SaveParty);
                ctx.request(Command::ChangeMode(ModeId::World));
            }
            MainMenuOption::Settings => ctx.request(Command::ChangeMode(ModeId::SettingsMenu)),
            MainMenuOption::Exit => {
                let locale = ctx.settings.locale;
                ctx.request(Command::ConfigureChoice(exit_confirmation(locale)));
                ctx.request(Command::ChangeMode(ModeId::ChoiceDialog));
            }
        }
    }
}

impl Mode for MainMenuMode {
    fn id(&self) -> ModeId {
        ModeId::MainMenu
    }

    fn on_enter(&mut self) {
        self.cursor.reset();
    }

    fn update(&mut self, ctx: &mut ModeContext<'_>) {
        if ctx.input.is_pressed(LogicalKey::Back) && ctx.menu_toggle_ready() {
            ctx.request(Command::ChangeMode(ModeId::World));
            return;
        }

        self.cursor
            .navigate(ctx.input, ctx.now_ms, MainMenuOption::ALL.len());

        if ctx.input.is_pressed(LogicalKey::Confirm) {
            Self::dispatch(self.selected(), ctx);
            ctx.input.reset();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &RenderView<'_>) {
        crate::ui::world::draw_world(frame, area, view.world);
        let labels: Vec<&str> = MainMenuOption::ALL
            .iter()
            .map(|option| crate::locale::tr(view.settings.locale, option.label_key()))
            .collect();
        crate::ui::menus::draw_side_menu(frame, area, &labels, self.cursor.index);
    }
}
