//! Localized string lookup by key.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Italian,
}

impl Locale {
    pub fn next(self) -> Self {
        match self {
            Locale::English => Locale::Italian,
            Locale::Italian => Locale::English,
        }
    }
}

/// Looks up `key` for `locale`, falling back to the key itself.
pub fn tr(locale: Locale, key: &'static str) -> &'static str {
    let text = match locale {
        Locale::English => english(key),
        Locale::Italian => italian(key),
    };
    text.unwrap_or(key)
}

fn english(key: &str) -> Option<&'static str> {
    Some(match key {
        "menu.party" => "Party",
        "menu.save" => "Save",
        "menu.settings" => "Settings",
        "menu.exit" => "Exit",
        "settings.title" => "Settings",
        "settings.language" => "Language",
        "settings.volume" => "Volume",
        "settings.controls" => "Controls",
        "settings.back" => "Back",
        "settings.language.current" => "Language: English",
        "settings.volume.current" => "Volume",
        "settings.controls.help" => "Arrows/WASD move  Z/Enter confirm  X/Esc back",
        "party.title" => "Party",
        "party.level" => "Lv",
        "party.hp" => "HP",
        "party.controls" => "Z: select/swap  X: cancel/back",
        "party.empty" => "Your party is empty.",
        "save.success" => "Game saved.",
        "save.failure" => "Save failed!",
        "exit.confirm.save" => "Save before exiting?",
        "exit.confirm.nosave" => "Exit without saving?",
        "choice.yes" => "Yes",
        "choice.no" => "No",
        "battle.title" => "Battle",
        "battle.appeared" => "appeared!",
        "battle.controls" => "Z: attack  X: run",
        "battle.won" => "You won the battle!",
        "battle.lost" => "Your creature fainted...",
        "battle.fled" => "Got away safely.",
        "battle.continue" => "Press Z to continue",
        _ => return None,
    })
}

fn italian(key: &str) -> Option<&'static str> {
    Some(match key {
        "menu.party" => "Squadra",
        "menu.save" => "Salva",
        "menu.settings" => "Impostazioni",
        "menu.exit" => "Esci",
        "settings.title" => "Impostazioni",
        "settings.language" => "Lingua",
        "settings.volume" => "Volume",
        "settings.controls" => "Controlli",
        "settings.back" => "Indietro",
        "settings.language.current" => "Lingua: Italiano",
        "settings.volume.current" => "Volume",
        "settings.controls.help" => "Frecce/WASD muovi  Z/Invio conferma  X/Esc indietro",
        "party.title" => "Squadra",
        "party.level" => "Lv",
        "party.hp" => "PS",
        "party.controls" => "Z: seleziona/scambia  X: annulla/indietro",
        "party.empty" => "La tua squadra e' vuota.",
        "save.success" => "Partita salvata.",
        "save.failure" => "Salvataggio fallito!",
        "exit.confirm.save" => "Salvare prima di uscire?",
        "exit.confirm.nosave" => "Uscire senza salvare?",
        "choice.yes" => "Si",
        "choice.no" => "No",
        "battle.title" => "Lotta",
        "battle.appeared" => "e' apparso!",
        "battle.controls" => "Z: attacca  X: fuggi",
        "battle.won" => "Hai vinto la lotta!",
        "battle.lost" => "La tua creatura e' esausta...",
        "battle.fled" => "Fuga riuscita.",
        "battle.continue" => "Premi Z per continuare",
        _ => return None,
    })
}
