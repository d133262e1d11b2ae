/*!
 * Read-only commands: pick statistics and the supported games
 */

use itertools::Itertools;
use serenity::utils::Colour;

use crate::catalog::{capitalize, Catalog};
use crate::error::Result;
use crate::messages::{self, BOT_DESCRIPTION};
use super::*;

/// Discord refuses embeds with more fields than this
const MAX_FIELDS: usize = 25;

type Field = (String, String, bool);

/// Keeps what fits in one embed, replacing the overflow by a count of what was left out.
fn limit_fields(mut fields: Vec<Field>, what: &str) -> Vec<Field> {
    if fields.len() > MAX_FIELDS {
        let hidden = fields.len() - (MAX_FIELDS - 1);
        fields.truncate(MAX_FIELDS - 1);
        fields.push(("…".to_owned(), format!("…and {} more {}", hidden, what), false));
    }
    fields
}

/// Pick statistics of one game, or of all games grouped by game.
pub fn stats(state: &BotState, game: Option<&str>) -> Result<Reply> {
    let game = game.map(|g| state.selector.catalog().game(g)).transpose()?;
    let stats = state.store.stats(game.map(|g| g.id.as_str()))?;
    if stats.is_empty() {
        return Ok(Reply::Text(messages::NO_STATS.to_owned()));
    }

    let fields = match game {
        Some(_) => {
            let fields = stats
                .into_iter()
                .map(|s| (s.character, format!("Picks: {}", s.picks), true))
                .collect();
            limit_fields(fields, "characters")
        }
        None => {
            let by_game = stats.iter().group_by(|s| s.game.as_str());
            let fields = by_game
                .into_iter()
                .map(|(game, rows)| {
                    let lines = rows.map(|s| format!("{}: {}", s.character, s.picks)).join("\n");
                    (capitalize(game), messages::clip_field(lines), false)
                })
                .collect();
            limit_fields(fields, "games")
        }
    };

    Ok(Reply::Embed(EmbedReply {
        title: "Character Statistics".to_owned(),
        description: "Character pick statistics:".to_owned(),
        colour: Colour::BLUE,
        fields,
    }))
}

/// Supported games with their roles and roster sizes.
pub fn games(catalog: &Catalog) -> Reply {
    let fields = catalog
        .iter()
        .map(|game| {
            let value = format!(
                "Roles: {}\nCharacters: {}",
                game.roles.iter().join(", "),
                game.characters.len()
            );
            (capitalize(&game.id), value, false)
        })
        .collect();
    let fields = limit_fields(fields, "games");

    Reply::Embed(EmbedReply {
        title: "Supported Games".to_owned(),
        description: BOT_DESCRIPTION.to_owned(),
        colour: Colour::BLUE,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::tests::{embed, fixture};
    use crate::error::Error;

    #[test]
    fn empty_stats() {
        let f = fixture();
        assert_eq!(
            stats(&f.state, None).unwrap(),
            Reply::Text("No statistics available yet.".to_owned())
        );
        assert!(matches!(stats(&f.state, Some("tetris")), Err(Error::UnknownGame { .. })));
    }

    #[test]
    fn stats_for_one_game() {
        let f = fixture();
        f.state.store.record_pick("apex", "Ash").unwrap();
        f.state.store.record_pick("apex", "Bloodhound").unwrap();
        f.state.store.record_pick("apex", "Bloodhound").unwrap();
        f.state.store.record_pick("valorant", "Jett").unwrap();

        let reply = embed(stats(&f.state, Some("APEX")).unwrap());
        assert_eq!(
            reply.fields,
            vec![
                ("Bloodhound".to_owned(), "Picks: 2".to_owned(), true),
                ("Ash".to_owned(), "Picks: 1".to_owned(), true),
            ]
        );
    }

    #[test]
    fn stats_grouped_by_game() {
        let f = fixture();
        f.state.store.record_pick("apex", "Ash").unwrap();
        f.state.store.record_pick("apex", "Bloodhound").unwrap();
        f.state.store.record_pick("apex", "Bloodhound").unwrap();
        f.state.store.record_pick("valorant", "Jett").unwrap();

        let reply = embed(stats(&f.state, None).unwrap());
        assert_eq!(
            reply.fields,
            vec![
                ("Apex".to_owned(), "Bloodhound: 2\nAsh: 1".to_owned(), false),
                ("Valorant".to_owned(), "Jett: 1".to_owned(), false),
            ]
        );
    }

    #[test]
    fn games_lists_roster() {
        let f = fixture();
        let reply = embed(games(f.state.selector.catalog()));
        assert_eq!(
            reply.fields,
            vec![
                ("Apex".to_owned(), "Roles: Assault, Recon\nCharacters: 3".to_owned(), false),
                ("Valorant".to_owned(), "Roles: Duelist\nCharacters: 2".to_owned(), false),
            ]
        );
    }

    #[test]
    fn overflowing_fields_are_counted() {
        let fields = (0..30)
            .map(|i| (format!("char{}", i), "Picks: 1".to_owned(), true))
            .collect::<Vec<_>>();

        let limited = limit_fields(fields.clone(), "characters");
        assert_eq!(limited.len(), MAX_FIELDS);
        assert_eq!(limited[..MAX_FIELDS - 1], fields[..MAX_FIELDS - 1]);
        assert_eq!(
            limited[MAX_FIELDS - 1],
            ("…".to_owned(), "…and 6 more characters".to_owned(), false)
        );

        let exact = fields[..MAX_FIELDS].to_vec();
        assert_eq!(limit_fields(exact.clone(), "characters"), exact);
    }
}
