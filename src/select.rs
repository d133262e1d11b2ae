/*!
 * Random character selection
 */

use std::sync::Arc;

use rand::{seq::SliceRandom, Rng};
use tracing::{error, instrument};

use crate::catalog::{Catalog, Character};
use crate::error::{Error, Result};

/// Where successful picks get counted
pub trait PickRecorder: Send + Sync {
    fn record_pick(&self, game: &str, character: &str) -> Result<()>;
}

#[derive(Debug)]
pub struct Selection {
    pub game: String,
    pub character: Character,
    /// Outcome of counting the pick. A failure here does not undo the selection.
    pub recorded: Result<()>,
}

#[derive(Clone)]
pub struct Selector {
    catalog: Arc<Catalog>,
    recorder: Arc<dyn PickRecorder>,
}

impl Selector {
    pub fn new(catalog: Arc<Catalog>, recorder: Arc<dyn PickRecorder>) -> Selector {
        Selector { catalog, recorder }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Picks a character of `game`, restricted to `role` if given.
    #[instrument(skip(self, rng), err)]
    pub fn pick_random<R>(&self, rng: &mut R, game: &str, role: Option<&str>) -> Result<Selection>
    where
        R: Rng + ?Sized,
    {
        let game = self.catalog.game(game)?;
        let character = self
            .catalog
            .characters(&game.id, role)?
            .choose(rng)
            .map(|c| (*c).clone())
            // Rosters are validated to have at least one character per role
            .ok_or_else(|| Error::UnknownRole {
                game: game.id.clone(),
                role: role.unwrap_or_default().to_owned(),
                available: game.roles.clone(),
            })?;

        Ok(self.record(game.id.clone(), character))
    }

    /// Picks a game, then a character of that game.
    ///
    /// Both draws are uniform, so characters of small rosters come up more often than
    /// characters of large ones. This is intended: every game gets the same share of picks.
    #[instrument(skip(self, rng), err)]
    pub fn pick_random_any_game<R>(&self, rng: &mut R) -> Result<Selection>
    where
        R: Rng + ?Sized,
    {
        // Rosters are validated to declare at least one game, each with characters
        let games = self.catalog.iter().collect::<Vec<_>>();
        let game = games.choose(rng).ok_or_else(|| Error::UnknownGame {
            game: String::new(),
            available: Vec::new(),
        })?;
        let character = game.characters.choose(rng).cloned().ok_or_else(|| Error::UnknownGame {
            game: game.id.clone(),
            available: self.catalog.games(),
        })?;

        Ok(self.record(game.id.clone(), character))
    }

    fn record(&self, game: String, character: Character) -> Selection {
        let recorded = self.recorder.record_pick(&game, &character.name);
        if let Err(ref e) = recorded {
            error!(%game, character = %character.name, "Failed to record pick: {}", e);
        }
        Selection { game, character, recorded }
    }
}
