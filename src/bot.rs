/*!
 * Actual discord client
 */

use std::collections::HashSet;
use std::sync::Arc;

use serenity::{
    client::{Context, EventHandler},
    framework::standard::{
        Args,
        CommandError,
        CommandGroup,
        CommandResult,
        DispatchError,
        HelpOptions,
        help_commands,
        macros::{command, group, help, hook},
    },
    model::prelude::{Message, Ready, UserId},
};
use tracing::{error, info, warn};

use crate::cmd::{self, BotState, Reply};
use crate::error::{Error, GENERIC_FAILURE};
use crate::messages;

pub struct Bot;

#[async_trait::async_trait]
impl EventHandler for Bot {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.name);
    }
}

async fn bot_state(ctx: &Context) -> Result<Arc<BotState>, &'static str> {
    ctx.data.read().await.get::<BotState>().cloned().ok_or("bot state is not initialized")
}

/// Runs a command on the blocking pool, since store calls wait on SQLite locks.
async fn run_blocking<F>(state: Arc<BotState>, command: F) -> Result<Reply, CommandError>
where
    F: FnOnce(&BotState) -> crate::error::Result<Reply> + Send + 'static,
{
    let reply = tokio::task::spawn_blocking(move || command(&state)).await??;
    Ok(reply)
}

async fn send(ctx: &Context, msg: &Message, reply: Reply) -> CommandResult {
    match reply {
        Reply::Text(text) => {
            msg.reply(ctx, text).await?;
        }
        Reply::Embed(embed) => {
            let footer = messages::requested_by(&msg.author.name);
            msg.channel_id
                .send_message(&ctx.http, |m| {
                    m.embed(|e| {
                        e.title(embed.title)
                            .description(embed.description)
                            .colour(embed.colour)
                            .fields(embed.fields)
                            .footer(|f| f.text(footer))
                    })
                })
                .await?;
        }
    }
    Ok(())
}

#[command]
#[description = "Select a random character from a game, optionally filtered by role"]
#[usage = "<game> [role]"]
#[example = "overwatch support"]
#[min_args(1)]
async fn who(ctx: &Context, msg: &Message, mut args: Args) -> CommandResult {
    let game = args.single_quoted::<String>()?;
    let role = args.remains().map(str::to_owned);
    let state = bot_state(ctx).await?;

    let user_id = msg.author.id.0;

    let reply = run_blocking(state, move |state| {
        cmd::pick::who(state, &mut rand::thread_rng(), user_id, &game, role.as_deref())
    })
    .await?;
    send(ctx, msg, reply).await
}

#[command]
#[description = "Select a random character from any game"]
async fn random(ctx: &Context, msg: &Message) -> CommandResult {
    let state = bot_state(ctx).await?;

    let user_id = msg.author.id.0;

    let reply = run_blocking(state, move |state| {
        cmd::pick::random(state, &mut rand::thread_rng(), user_id)
    })
    .await?;
    send(ctx, msg, reply).await
}

#[command]
#[description = "View character pick statistics"]
#[usage = "[game]"]
#[max_args(1)]
async fn stats(ctx: &Context, msg: &Message, args: Args) -> CommandResult {
    let game = args.remains().map(str::to_owned);
    let state = bot_state(ctx).await?;

    let reply = run_blocking(state, move |state| cmd::info::stats(state, game.as_deref())).await?;
    send(ctx, msg, reply).await
}

#[command]
#[description = "Add or remove a character from your favorites"]
#[usage = "<game> <character>"]
#[example = "apex Mad Maggie"]
#[min_args(2)]
async fn favorite(ctx: &Context, msg: &Message, mut args: Args) -> CommandResult {
    let game = args.single_quoted::<String>()?;
    let character = args.remains().unwrap_or_default().trim().trim_matches('"').to_owned();
    let state = bot_state(ctx).await?;

    let user_id = msg.author.id.0;

    let reply = run_blocking(state, move |state| {
        cmd::favorite::favorite(state, user_id, &game, &character)
    })
    .await?;
    send(ctx, msg, reply).await
}

#[command]
#[description = "View your favorite characters"]
async fn favorites(ctx: &Context, msg: &Message) -> CommandResult {
    let state = bot_state(ctx).await?;

    let user_id = msg.author.id.0;

    let reply = run_blocking(state, move |state| cmd::favorite::favorites(state, user_id)).await?;
    send(ctx, msg, reply).await
}

#[command]
#[description = "List the supported games and their roles"]
async fn games(ctx: &Context, msg: &Message) -> CommandResult {
    let state = bot_state(ctx).await?;

    send(ctx, msg, cmd::info::games(state.selector.catalog())).await
}

#[help]
#[individual_command_tip = "Pass a command name to `help` for its usage."]
async fn cmd_help(
    ctx: &Context,
    msg: &Message,
    args: Args,
    help_options: &'static HelpOptions,
    groups: &[&'static CommandGroup],
    owners: HashSet<UserId>
) -> CommandResult {
    help_commands::with_embeds(ctx, msg, args, help_options, groups, owners).await;
    Ok(())
}

#[hook]
pub async fn before(_ctx: &Context, msg: &Message, command: &str) -> bool {
    info!(command, user = %msg.author.id, "Running command");
    true
}

/// Turns command errors into replies. Details only go to the logs.
#[hook]
pub async fn after(ctx: &Context, msg: &Message, command: &str, result: CommandResult) {
    let e = match result {
        Ok(()) => return,
        Err(e) => e,
    };

    let reply = match e.downcast_ref::<Error>() {
        Some(e) if e.is_user_error() => {
            info!(command, "Rejected input: {}", e);
            e.as_message()
        }
        Some(e) => {
            error!(command, "Command failed: {}", e);
            e.as_message()
        }
        None => {
            error!(command, "Command failed: {}", e);
            GENERIC_FAILURE.to_owned()
        }
    };

    if let Err(e) = msg.reply(ctx, reply).await {
        error!("Failed to send error reply: {}", e);
    }
}

#[hook]
pub async fn dispatch_error(ctx: &Context, msg: &Message, error: DispatchError, command: &str) {
    let reply = match &error {
        DispatchError::NotEnoughArguments { min, given } => format!(
            "`{}` needs at least {} argument(s), got {}. Try `help {}`.",
            command, min, given, command,
        ),
        DispatchError::TooManyArguments { max, given } => format!(
            "`{}` takes at most {} argument(s), got {}. Try `help {}`.",
            command, max, given, command,
        ),
        _ => {
            warn!(command, ?error, "Command not dispatched");
            return;
        }
    };

    if let Err(e) = msg.reply(ctx, reply).await {
        error!("Failed to send dispatch error reply: {}", e);
    }
}

#[group]
#[commands(who, random, stats, favorite, favorites, games)]
pub struct General;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::tests::{fixture, Fixture};

    #[tokio::test]
    async fn blocking_commands_keep_their_errors() {
        let Fixture { _dir, state, .. } = fixture();
        let state = Arc::new(state);

        let reply = run_blocking(state.clone(), |state| cmd::info::stats(state, None)).await.unwrap();
        assert_eq!(reply, Reply::Text(messages::NO_STATS.to_owned()));

        let err = run_blocking(state, |state| cmd::info::stats(state, Some("tetris"))).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnknownGame { .. })));
    }
}
