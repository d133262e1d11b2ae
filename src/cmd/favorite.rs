/*!
 * Favorite characters of a user
 */

use itertools::Itertools;
use serenity::utils::Colour;

use crate::catalog::capitalize;
use crate::error::Result;
use crate::messages;
use super::*;

/// Adds the character to the user's favorites, or removes it if it already was one.
pub fn favorite(state: &BotState, user_id: u64, game: &str, character: &str) -> Result<Reply> {
    let game = state.selector.catalog().game(game)?;
    let character = game.character(character)?;

    let added = state.store.add_favorite(user_id, &game.id, &character.name)?;
    if !added {
        state.store.remove_favorite(user_id, &game.id, &character.name)?;
    }

    Ok(Reply::Embed(EmbedReply {
        title: "Favorite Updated".to_owned(),
        description: messages::favorite_updated(&character.name, added),
        colour: Colour::DARK_GREEN,
        fields: vec![("Game".to_owned(), capitalize(&game.id), false)],
    }))
}

/// Lists the user's favorites, one field per game.
pub fn favorites(state: &BotState, user_id: u64) -> Result<Reply> {
    let favorites = state.store.favorites(user_id)?;
    if favorites.is_empty() {
        return Ok(Reply::Text(messages::NO_FAVORITES.to_owned()));
    }

    let catalog = state.selector.catalog();
    let by_game = favorites.iter().group_by(|f| f.game.as_str());
    let fields = by_game
        .into_iter()
        .map(|(game, favs)| {
            // Favorites dropped from the roster since are listed without a role
            let names = favs
                .map(|f| match catalog.role_of(game, &f.character) {
                    Ok(role) => format!("{} ({})", f.character, role),
                    Err(_) => f.character.clone(),
                })
                .join(", ");
            (capitalize(game), messages::clip_field(names), false)
        })
        .collect();

    Ok(Reply::Embed(EmbedReply {
        title: "Your Favorites".to_owned(),
        description: "Your favorite characters:".to_owned(),
        colour: Colour::BLUE,
        fields,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::tests::{embed, fixture};
    use crate::error::Error;

    #[test]
    fn favorite_toggles() {
        let f = fixture();

        let reply = embed(favorite(&f.state, 7, "Apex", "mad maggie").unwrap());
        assert_eq!(reply.description, "**Mad Maggie** has been added to your favorites.");
        assert_eq!(f.state.store.favorites(7).unwrap().len(), 1);

        let reply = embed(favorite(&f.state, 7, "apex", "Mad Maggie").unwrap());
        assert_eq!(reply.description, "**Mad Maggie** has been removed from your favorites.");
        assert!(f.state.store.favorites(7).unwrap().is_empty());
    }

    #[test]
    fn favorite_rejects_unknown_character() {
        let f = fixture();
        match favorite(&f.state, 7, "apex", "Jett") {
            Err(e @ Error::UnknownCharacter { .. }) => {
                assert_eq!(e.as_message(), "Character 'Jett' not found in apex.")
            }
            other => panic!("expected unknown character, got {:?}", other),
        }
        assert!(f.state.store.favorites(7).unwrap().is_empty());
    }

    #[test]
    fn favorites_grouped_by_game() {
        let f = fixture();
        assert_eq!(
            favorites(&f.state, 7).unwrap(),
            Reply::Text("You don't have any favorite characters yet.".to_owned())
        );

        favorite(&f.state, 7, "valorant", "kay/o").unwrap();
        favorite(&f.state, 7, "apex", "Bloodhound").unwrap();
        favorite(&f.state, 7, "apex", "Ash").unwrap();
        favorite(&f.state, 8, "valorant", "Jett").unwrap();

        let reply = embed(favorites(&f.state, 7).unwrap());
        assert_eq!(
            reply.fields,
            vec![
                ("Apex".to_owned(), "Ash (Assault), Bloodhound (Recon)".to_owned(), false),
                ("Valorant".to_owned(), "Kay/o (Duelist)".to_owned(), false),
            ]
        );
    }

    #[test]
    fn favorites_outside_roster_have_no_role() {
        let f = fixture();
        f.state.store.add_favorite(7, "apex", "Wraith").unwrap();

        let reply = embed(favorites(&f.state, 7).unwrap());
        assert_eq!(reply.fields, vec![("Apex".to_owned(), "Wraith".to_owned(), false)]);
    }
}
