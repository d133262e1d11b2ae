/*!
 * Game rosters: which characters exist in which game, and their roles
 */

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use serde_derive::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};

/// Roster compiled into the binary, used when no roster file is configured
const BUILTIN_ROSTER: &str = include_str!("../roster.toml");

#[derive(Deserialize, Debug)]
struct RosterFile {
    game: Vec<GameEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct GameEntry {
    id: String,
    roles: Vec<String>,
    characters: Vec<String>,
    role_mapping: HashMap<String, String>,
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    EmptyRoster,
    InvalidGameId(String),
    DuplicateGame(String),
    EmptyGame(String),
    DuplicateCharacter { game: String, character: String },
    MissingRole { game: String, character: String },
    UndeclaredRole { game: String, character: String, role: String },
    EmptyRole { game: String, role: String },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io(e) => write!(f, "cannot read roster: {}", e),
            Self::Parse(e) => write!(f, "invalid roster: {}", e),
            Self::EmptyRoster => write!(f, "roster declares no game"),
            Self::InvalidGameId(game) => write!(f, "game id {:?} must be lowercase", game),
            Self::DuplicateGame(game) => write!(f, "game {:?} is declared twice", game),
            Self::EmptyGame(game) => write!(f, "game {:?} has no characters", game),
            Self::DuplicateCharacter { game, character } => {
                write!(f, "{}: character {:?} is listed twice", game, character)
            }
            Self::MissingRole { game, character } => {
                write!(f, "{}: character {:?} has no role mapping", game, character)
            }
            Self::UndeclaredRole { game, character, role } => write!(
                f,
                "{}: character {:?} maps to role {:?} which the game does not declare",
                game, character, role,
            ),
            Self::EmptyRole { game, role } => write!(f, "{}: no character has role {:?}", game, role),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct Game {
    pub id: String,
    pub roles: Vec<String>,
    pub characters: Vec<Character>,
}

impl Game {
    /// Resolves user input to one of this game's roles.
    pub fn role(&self, input: &str) -> Result<&str> {
        let role = normalize_role(input);
        self.roles
            .iter()
            .find(|r| **r == role)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownRole {
                game: self.id.clone(),
                role,
                available: self.roles.clone(),
            })
    }

    /// Resolves user input to a character, exact name first then ignoring case.
    pub fn character(&self, input: &str) -> Result<&Character> {
        let input = input.trim();
        self.characters
            .iter()
            .find(|c| c.name == input)
            .or_else(|| self.characters.iter().find(|c| c.name.to_lowercase() == input.to_lowercase()))
            .ok_or_else(|| Error::UnknownCharacter {
                game: self.id.clone(),
                character: input.to_owned(),
            })
    }

    /// Characters of this game, restricted to `role` if given. `role` must already be normalized.
    pub fn characters_with_role(&self, role: Option<&str>) -> Vec<&Character> {
        self.characters
            .iter()
            .filter(|c| role.map_or(true, |r| c.role == r))
            .collect()
    }
}

/// Validated, immutable set of games
#[derive(Debug, Clone)]
pub struct Catalog {
    games: Vec<Game>,
}

impl Catalog {
    pub fn builtin() -> std::result::Result<Catalog, CatalogError> {
        Catalog::from_toml(BUILTIN_ROSTER)
    }

    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Catalog, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
        Catalog::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> std::result::Result<Catalog, CatalogError> {
        let file: RosterFile = toml::from_str(raw).map_err(CatalogError::Parse)?;
        if file.game.is_empty() {
            return Err(CatalogError::EmptyRoster);
        }

        let mut seen = HashSet::new();
        let mut games = Vec::with_capacity(file.game.len());
        for entry in file.game {
            if entry.id != entry.id.to_lowercase() || entry.id.is_empty() {
                return Err(CatalogError::InvalidGameId(entry.id));
            }
            if !seen.insert(entry.id.clone()) {
                return Err(CatalogError::DuplicateGame(entry.id));
            }
            games.push(validate_game(entry)?);
        }

        Ok(Catalog { games })
    }

    /// Game identifiers, in roster order
    pub fn games(&self) -> Vec<String> {
        self.games.iter().map(|g| g.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Game> {
        self.games.iter()
    }

    /// Looks a game up, ignoring case.
    pub fn game(&self, input: &str) -> Result<&Game> {
        let id = normalize_game(input);
        self.games.iter().find(|g| g.id == id).ok_or_else(|| Error::UnknownGame {
            game: id,
            available: self.games(),
        })
    }

    pub fn characters(&self, game: &str, role: Option<&str>) -> Result<Vec<&Character>> {
        let game = self.game(game)?;
        let role = role.map(|r| game.role(r)).transpose()?;
        Ok(game.characters_with_role(role))
    }

    pub fn role_of(&self, game: &str, character: &str) -> Result<&str> {
        Ok(self.game(game)?.character(character)?.role.as_str())
    }
}

fn validate_game(entry: GameEntry) -> std::result::Result<Game, CatalogError> {
    let GameEntry { id, roles, characters, mut role_mapping } = entry;

    if characters.is_empty() {
        return Err(CatalogError::EmptyGame(id));
    }

    let mut names = HashSet::new();
    let mut resolved = Vec::with_capacity(characters.len());
    for name in characters {
        if !names.insert(name.clone()) {
            return Err(CatalogError::DuplicateCharacter { game: id, character: name });
        }
        let role = match role_mapping.remove(&name) {
            Some(role) => role,
            None => return Err(CatalogError::MissingRole { game: id, character: name }),
        };
        if !roles.contains(&role) {
            return Err(CatalogError::UndeclaredRole { game: id, character: name, role });
        }
        resolved.push(Character { name, role });
    }

    for name in role_mapping.keys() {
        warn!(game = %id, character = %name, "role mapping for unlisted character ignored");
    }

    if let Some(role) = roles.iter().find(|r| !resolved.iter().any(|c| &c.role == *r)) {
        return Err(CatalogError::EmptyRole { game: id.clone(), role: role.clone() });
    }

    Ok(Game { id, roles, characters: resolved })
}

/// Game ids are matched lowercased.
pub fn normalize_game(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Roles are matched with the first letter uppercased and the rest lowercased.
pub fn normalize_role(input: &str) -> String {
    capitalize(input.trim())
}

pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
        [[game]]
        id = "game1"
        roles = ["Tank", "Damage"]
        characters = ["char1", "char2", "Mad Maggie"]

        [game.role-mapping]
        char1 = "Tank"
        char2 = "Damage"
        "Mad Maggie" = "Damage"

        [[game]]
        id = "game2"
        roles = ["Support"]
        characters = ["char3"]

        [game.role-mapping]
        char3 = "Support"
    "#;

    #[test]
    fn builtin_roster_is_complete() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.games(), vec!["apex", "overwatch", "valorant", "lol", "rivals"]);
        for game in catalog.iter() {
            for character in &game.characters {
                let role = catalog.role_of(&game.id, &character.name).unwrap();
                assert!(game.roles.iter().any(|r| r == role));
            }
        }
    }

    #[test]
    fn missing_role_mapping_fails_load() {
        let raw = r#"
            [[game]]
            id = "lol"
            roles = ["Fighter"]
            characters = ["Aatrox", "Gangplank"]

            [game.role-mapping]
            Aatrox = "Fighter"
        "#;
        match Catalog::from_toml(raw) {
            Err(CatalogError::MissingRole { game, character }) => {
                assert_eq!(game, "lol");
                assert_eq!(character, "Gangplank");
            }
            other => panic!("expected missing role, got {:?}", other),
        }
    }

    #[test]
    fn undeclared_role_fails_load() {
        let raw = r#"
            [[game]]
            id = "apex"
            roles = ["Assault"]
            characters = ["Ash"]

            [game.role-mapping]
            Ash = "Recon"
        "#;
        assert!(matches!(Catalog::from_toml(raw), Err(CatalogError::UndeclaredRole { .. })));
    }

    #[test]
    fn duplicates_and_empty_roles_fail_load() {
        let dup = r#"
            [[game]]
            id = "apex"
            roles = ["Assault"]
            characters = ["Ash", "Ash"]

            [game.role-mapping]
            Ash = "Assault"
        "#;
        assert!(matches!(Catalog::from_toml(dup), Err(CatalogError::DuplicateCharacter { .. })));

        let empty_role = r#"
            [[game]]
            id = "apex"
            roles = ["Assault", "Recon"]
            characters = ["Ash"]

            [game.role-mapping]
            Ash = "Assault"
        "#;
        assert!(matches!(Catalog::from_toml(empty_role), Err(CatalogError::EmptyRole { .. })));

        let upper = r#"
            [[game]]
            id = "Apex"
            roles = ["Assault"]
            characters = ["Ash"]

            [game.role-mapping]
            Ash = "Assault"
        "#;
        assert!(matches!(Catalog::from_toml(upper), Err(CatalogError::InvalidGameId(_))));
    }

    #[test]
    fn empty_roster_fails_load() {
        assert!(matches!(Catalog::from_toml("game = []"), Err(CatalogError::EmptyRoster)));
    }

    #[test]
    fn lookups_normalize_input() {
        let catalog = Catalog::from_toml(SMALL).unwrap();
        assert_eq!(catalog.game(" GAME1 ").unwrap().id, "game1");

        let tanks = catalog.characters("Game1", Some("tANK")).unwrap();
        assert_eq!(tanks.len(), 1);
        assert_eq!(tanks[0].name, "char1");

        assert_eq!(catalog.role_of("game1", "mad maggie").unwrap(), "Damage");
        assert_eq!(catalog.characters("game1", None).unwrap().len(), 3);
    }

    #[test]
    fn unknown_inputs_echo_normalized_form() {
        let catalog = Catalog::from_toml(SMALL).unwrap();

        match catalog.game("TETRIS") {
            Err(Error::UnknownGame { game, available }) => {
                assert_eq!(game, "tetris");
                assert_eq!(available, vec!["game1", "game2"]);
            }
            other => panic!("expected unknown game, got {:?}", other),
        }

        match catalog.characters("game1", Some("healer")) {
            Err(Error::UnknownRole { role, available, .. }) => {
                assert_eq!(role, "Healer");
                assert_eq!(available, vec!["Tank", "Damage"]);
            }
            other => panic!("expected unknown role, got {:?}", other),
        }

        assert!(matches!(
            catalog.role_of("game2", "char1"),
            Err(Error::UnknownCharacter { .. })
        ));
    }

    #[test]
    fn role_normalization_matches_capitalize() {
        assert_eq!(normalize_role("support"), "Support");
        assert_eq!(normalize_role("DUELIST"), "Duelist");
        assert_eq!(normalize_role(""), "");
    }
}
