//! The player's party and its persistence contract.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::constants::{PARTY_FILE_NAME, PARTY_SAVE_VERSION, SAVE_DIR_NAME};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    pub level: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
}

impl Creature {
    pub fn new(name: &str, level: u32, max_hp: u32, attack: u32, defense: u32) -> Self {
        Self {
            name: name.to_string(),
            level,
            current_hp: max_hp,
            max_hp,
            attack,
            defense,
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    members: Vec<Creature>,
}

impl Party {
    pub fn new(members: Vec<Creature>) -> Self {
        Self { members }
    }

    /// The party a new game starts with.
    pub fn starter() -> Self {
        Self::new(vec![
            Creature::new("Sproutle", 5, 22, 9, 7),
            Creature::new("Embercub", 4, 19, 10, 5),
            Creature::new("Driplet", 4, 20, 8, 8),
        ])
    }

    pub fn members(&self) -> &[Creature] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The creature sent out first in battle.
    pub fn lead(&self) -> Option<&Creature> {
        self.members.first()
    }

    pub fn lead_mut(&mut self) -> Option<&mut Creature> {
        self.members.first_mut()
    }

    /// Swaps two slots. Returns false (and changes nothing) when either
    /// index is out of range.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.members.len() || b >= self.members.len() {
            return false;
        }
        self.members.swap(a, b);
        true
    }
}

/// Persistence collaborator. Failure is reported by the caller, never fatal.
pub trait PartyStore {
    fn save(&self, party: &Party) -> io::Result<()>;

    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> io::Result<Option<Party>>;
}

#[derive(Serialize, Deserialize)]
struct PartySaveData {
    version: u32,
    saved_at: i64,
    members: Vec<Creature>,
}

/// Stores the party as pretty-printed JSON, by default in `~/.overworld/party.json`.
pub struct JsonPartyStore {
    path: PathBuf,
}

impl JsonPartyStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_home_dir() -> io::Result<Self> {
        Ok(Self::new(save_dir()?.join(PARTY_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PartyStore for JsonPartyStore {
    fn save(&self, party: &Party) -> io::Result<()> {
        let data = PartySaveData {
            version: PARTY_SAVE_VERSION,
            saved_at: chrono::Utc::now().timestamp(),
            members: party.members.clone(),
        };
        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)
    }

    fn load(&self) -> io::Result<Option<Party>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let data: PartySaveData = serde_json::from_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(Party::new(data.members)))
    }
}

/// Get the ~/.overworld/ directory path, creating it if needed.
pub fn save_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(SAVE_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Loads the saved party, falling back to the starter party when the file
/// is missing or unreadable.
pub fn load_or_starter(store: &dyn PartyStore) -> Party {
    match store.load() {
        Ok(Some(party)) if !party.is_empty() => party,
        Ok(_) => Party::starter(),
        Err(e) => {
            tracing::warn!(error = %e, "party save unreadable, starting fresh");
            Party::starter()
        }
    }
}
