//! Confirmation flows built from nested [`ChoiceContext`]s.

use super::{ChoiceContext, Command, Continuation, ModeId};
use crate::locale::{tr, Locale};

fn yes_no(locale: Locale) -> Vec<String> {
    vec![
        tr(locale, "choice.yes").to_string(),
        tr(locale, "choice.no").to_string(),
    ]
}

fn back_to_world() -> Continuation {
    Box::new(|commands: &mut Vec<Command>| commands.push(Command::ChangeMode(ModeId::World)))
}

/// "Save before exiting?"
///
/// - Yes: save, then quit.
/// - No: ask "Exit without saving?" (Yes quits, No returns to the world).
/// - Cancel on either question returns to the world.
pub fn exit_confirmation(locale: Locale) -> ChoiceContext {
    let save_and_exit: Continuation = Box::new(|commands: &mut Vec<Command>| {
        commands.push(Command::SaveParty);
        commands.push(Command::Quit);
    });

    let confirm_exit_without_saving: Continuation =
        Box::new(move |commands: &mut Vec<Command>| {
            commands.push(Command::ConfigureChoice(exit_without_saving(locale)));
        });

    ChoiceContext::new(
        tr(locale, "exit.confirm.save"),
        yes_no(locale),
        vec![save_and_exit, confirm_exit_without_saving],
        back_to_world(),
    )
}

/// "Exit without saving?"
pub fn exit_without_saving(locale: Locale) -> ChoiceContext {
    let exit: Continuation = Box::new(|commands: &mut Vec<Command>| commands.push(Command::Quit));

    ChoiceContext::new(
        tr(locale, "exit.confirm.nosave"),
        yes_no(locale),
        vec![exit, back_to_world()],
        back_to_world(),
    )
}
