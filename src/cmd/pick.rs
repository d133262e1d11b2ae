/*!
 * Random pick commands, gated by the per-user cooldown
 */

use rand::Rng;
use serenity::utils::Colour;
use tracing::debug;

use crate::catalog::capitalize;
use crate::error::Result;
use crate::messages;
use crate::select::Selection;
use super::*;

/// Arms the caller's cooldown before the pick, so concurrent commands of one user cannot both pass.
fn claim_cooldown(state: &BotState, user_id: u64) -> Option<Reply> {
    let left = state.cooldowns.try_arm(user_id, state.cooldown).err()?;
    debug!(user_id, ?left, "User on cooldown");
    Some(Reply::Text(messages::cooldown(left)))
}

/// Failed picks do not cost the user a cooldown.
fn release_on_error<T>(state: &BotState, user_id: u64, result: Result<T>) -> Result<T> {
    if result.is_err() {
        state.cooldowns.release(user_id);
    }
    result
}

fn selection_reply(title: &str, pick: &Selection) -> Reply {
    Reply::Embed(EmbedReply {
        title: title.to_owned(),
        description: format!("Selected: **{}**", pick.character.name),
        colour: Colour::DARK_GREEN,
        fields: vec![
            ("Game".to_owned(), capitalize(&pick.game), false),
            ("Role".to_owned(), pick.character.role.clone(), false),
        ],
    })
}

/// Picks a character of `game`, optionally of a given `role`.
pub fn who<R>(state: &BotState, rng: &mut R, user_id: u64, game: &str, role: Option<&str>) -> Result<Reply>
where
    R: Rng + ?Sized,
{
    if let Some(refusal) = claim_cooldown(state, user_id) {
        return Ok(refusal);
    }

    let pick = release_on_error(state, user_id, state.selector.pick_random(rng, game, role))?;

    Ok(selection_reply("Character Selected", &pick))
}

/// Picks a character of any game.
pub fn random<R>(state: &BotState, rng: &mut R, user_id: u64) -> Result<Reply>
where
    R: Rng + ?Sized,
{
    if let Some(refusal) = claim_cooldown(state, user_id) {
        return Ok(refusal);
    }

    let pick = release_on_error(state, user_id, state.selector.pick_random_any_game(rng))?;

    Ok(selection_reply("Random Character", &pick))
}
