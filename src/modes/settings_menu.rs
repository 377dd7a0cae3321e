use ratatui::{layout::Rect, Frame};

use super::{Command, MenuCursor, Mode, ModeContext, ModeId, RenderView};
use crate::core::constants::VOLUME_STEP;
use crate::input::LogicalKey;
use crate::locale::tr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOption {
    Language,
    Volume,
    Controls,
    Back,
}

impl SettingsOption {
    pub const ALL: [SettingsOption; 4] = [
        SettingsOption::Language,
        SettingsOption::Volume,
        SettingsOption::Controls,
        SettingsOption::Back,
    ];

    pub fn label_key(self) -> &'static str {
        match self {
            SettingsOption::Language => "settings.language",
            SettingsOption::Volume => "settings.volume",
            SettingsOption::Controls => "settings.controls",
            SettingsOption::Back => "settings.back",
        }
    }
}

/// Settings sit one level below the main menu but always exit straight to
/// the world, never back to the main menu.
#[derive(Debug, Default)]
pub struct SettingsMenuMode {
    cursor: MenuCursor,
}

impl SettingsMenuMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> SettingsOption {
        SettingsOption::ALL[self.cursor.index]
    }

    fn dispatch(option: SettingsOption, ctx: &mut ModeContext<'_>) {
        match option {
            SettingsOption::Language => {
                ctx.settings.locale = ctx.settings.locale.next();
                let text = tr(ctx.settings.locale, "settings.language.current");
                ctx.request(Command::ShowMessage(text.to_string()));
            }
            SettingsOption::Volume => {
                ctx.settings.volume = next_volume(ctx.settings.volume);
                let text = format!(
                    "{}: {}%",
                    tr(ctx.settings.locale, "settings.volume.current"),
                    ctx.settings.volume
                );
                ctx.request(Command::ShowMessage(text));
            }
            SettingsOption::Controls => {
                let text = tr(ctx.settings.locale, "settings.controls.help");
                ctx.request(Command::ShowMessage(text.to_string()));
            }
            SettingsOption::Back => ctx.request(Command::ChangeMode(ModeId::World)),
        }
    }
}

/// Steps 0..=100 and wraps back to 0.
fn next_volume(volume: u8) -> u8 {
    if volume >= 100 {
        0
    } else {
        (volume + VOLUME_STEP).min(100)
    }
}

impl Mode for SettingsMenuMode {
    fn id(&self) -> ModeId {
        ModeId::SettingsMenu
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
            .navigate(ctx.input, ctx.now_ms, SettingsOption::ALL.len());

        if ctx.input.is_pressed(LogicalKey::Confirm) {
            Self::dispatch(self.selected(), ctx);
            ctx.input.reset();
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, view: &RenderView<'_>) {
        crate::ui::world::draw_world(frame, area, view.world);
        let locale = view.settings.locale;
        let labels: Vec<&str> = SettingsOption::ALL
            .iter()
            .map(|option| tr(locale, option.label_key()))
            .collect();
        crate::ui::menus::draw_panel_menu(
            frame,
            area,
            tr(locale, "settings.title"),
            &labels,
            self.cursor.index,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game::Settings;
    use crate::input::InputSnapshot;
    use crate::locale::Locale;
    use crate::party::Party;
    use crate::world::Overworld;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(
        mode: &mut SettingsMenuMode,
        settings: &mut Settings,
        keys: &[LogicalKey],
        now_ms: u64,
    ) -> Vec<Command> {
        let mut input = InputSnapshot::from_keys(keys);
        let mut world = Overworld::default();
        let mut party = Party::starter();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut commands = Vec::new();
        let mut ctx = ModeContext {
            now_ms,
            input: &mut input,
            world: &mut world,
            party: &mut party,
            settings,
            rng: &mut rng,
            commands: &mut commands,
            last_menu_toggle_ms: 0,
        };
        mode.update(&mut ctx);
        commands
    }

    #[test]
    fn test_back_key_goes_straight_to_world() {
        let mut mode = SettingsMenuMode::new();
        let mut settings = Settings::default();
        let commands = run(&mut mode, &mut settings, &[LogicalKey::Back], 1000);
        assert!(matches!(
            commands.as_slice(),
            [Command::ChangeMode(ModeId::World)]
        ));
    }

    #[test]
    fn test_back_option_goes_straight_to_world() {
        let mut mode = SettingsMenuMode::new();
        let mut settings = Settings::default();
        run(&mut mode, &mut settings, &[LogicalKey::Up], 1000);
        assert_eq!(mode.selected(), SettingsOption::Back);

        let commands = run(&mut mode, &mut settings, &[LogicalKey::Confirm], 1300);
        assert!(matches!(
            commands.as_slice(),
            [Command::ChangeMode(ModeId::World)]
        ));
    }

    #[test]
    fn test_language_cycles_locale() {
        let mut mode = SettingsMenuMode::new();
        let mut settings = Settings::default();
        let commands = run(&mut mode, &mut settings, &[LogicalKey::Confirm], 1000);

        assert_eq!(settings.locale, Locale::Italian);
        assert!(matches!(commands.as_slice(), [Command::ShowMessage(_)]));
    }

    #[test]
    fn test_volume_steps_and_wraps() {
        assert_eq!(next_volume(70), 80);
        assert_eq!(next_volume(95), 100);
        assert_eq!(next_volume(100), 0);
    }

    #[test]
    fn test_enter_resets_selection() {
        let mut mode = SettingsMenuMode::new();
        let mut settings = Settings::default();
        run(&mut mode, &mut settings, &[LogicalKey::Down], 1000);
        assert_eq!(mode.selected(), SettingsOption::Volume);
        mode.on_enter();
        assert_eq!(mode.selected(), SettingsOption::Language);
    }
}
