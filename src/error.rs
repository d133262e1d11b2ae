/*!
 * Errors that can be returned by bot commands and the core they call into
 */

use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FmtResult};

use itertools::Itertools;

pub type Result<T> = std::result::Result<T, Error>;

/// Reply sent for any failure whose details must stay in the logs
pub const GENERIC_FAILURE: &str = "An error occurred while processing your command. Please try again.";

#[derive(Debug)]
pub enum Error {
    Db(diesel::result::Error),
    Pool(diesel::r2d2::PoolError),
    Serenity(serenity::Error),
    UnknownGame { game: String, available: Vec<String> },
    UnknownRole { game: String, role: String, available: Vec<String> },
    UnknownCharacter { game: String, character: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(error) = self.source() {
            return write!(f, "{}", error);
        }
        match self {
            Self::UnknownGame { game, .. } => write!(f, "unknown game {:?}", game),
            Self::UnknownRole { game, role, .. } => write!(f, "unknown role {:?} for {}", role, game),
            Self::UnknownCharacter { game, character } => {
                write!(f, "unknown character {:?} for {}", character, game)
            }
            _ => Ok(()),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Db(e) => Some(e),
            Self::Pool(e) => Some(e),
            Self::Serenity(e) => Some(e),
            _ => None,
        }
    }
}

impl Error {
    /// Text to show the user. Internal failures collapse to a generic message.
    pub fn as_message(&self) -> String {
        match self {
            Self::Db(_) | Self::Pool(_) | Self::Serenity(_) => GENERIC_FAILURE.to_owned(),
            Self::UnknownGame { game, available } => format!(
                "Game '{}' not found. Available games: {}",
                game,
                available.iter().join(", "),
            ),
            Self::UnknownRole { game, role, available } => format!(
                "Role '{}' not found for {}. Available roles: {}",
                role,
                game,
                available.iter().join(", "),
            ),
            Self::UnknownCharacter { game, character } => {
                format!("Character '{}' not found in {}.", character, game)
            }
        }
    }

    /// Whether the error comes from user input rather than the bot itself
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownGame { .. } | Self::UnknownRole { .. } | Self::UnknownCharacter { .. }
        )
    }
}

impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Error {
        Error::Db(e)
    }
}

impl From<diesel::r2d2::PoolError> for Error {
    fn from(e: diesel::r2d2::PoolError) -> Error {
        Error::Pool(e)
    }
}

impl From<serenity::Error> for Error {
    fn from(e: serenity::Error) -> Error {
        Error::Serenity(e)
    }
}
