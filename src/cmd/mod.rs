/*!
 * Actual command handlers, free of any Discord plumbing
 */

use std::sync::Arc;
use std::time::Duration;

use serenity::{prelude::TypeMapKey, utils::Colour};

use crate::cooldown::CooldownTracker;
use crate::select::Selector;
use crate::store::Store;

pub mod favorite;
pub mod info;
pub mod pick;

/// Everything command handlers need, shared through the client data
pub struct BotState {
    pub selector: Selector,
    pub store: Arc<Store>,
    pub cooldowns: CooldownTracker,
    /// Wait imposed between two picks of the same user
    pub cooldown: Duration,
}

impl TypeMapKey for BotState {
    type Value = Arc<BotState>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedReply {
    pub title: String,
    pub description: String,
    pub colour: Colour,
    /// (name, value, inline)
    pub fields: Vec<(String, String, bool)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Embed(EmbedReply),
    /// Plain answer to the caller, for refusals and empty results
    Text(String),
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::cooldown::tests::ManualClock;

    pub(crate) const ROSTER: &str = r#"
        [[game]]
        id = "apex"
        roles = ["Assault", "Recon"]
        characters = ["Ash", "Bloodhound", "Mad Maggie"]

        [game.role-mapping]
        Ash = "Assault"
        Bloodhound = "Recon"
        "Mad Maggie" = "Assault"

        [[game]]
        id = "valorant"
        roles = ["Duelist"]
        characters = ["Jett", "Kay/o"]

        [game.role-mapping]
        Jett = "Duelist"
        "Kay/o" = "Duelist"
    "#;

    pub(crate) struct Fixture {
        pub _dir: tempfile::TempDir,
        pub clock: ManualClock,
        pub state: BotState,
    }

    pub(crate) fn fixture() -> Fixture {
        let (dir, store) = crate::store::tests::temp_store();
        let store = Arc::new(store);
        let catalog = Arc::new(Catalog::from_toml(ROSTER).unwrap());
        let clock = ManualClock::new();
        let state = BotState {
            selector: Selector::new(catalog, store.clone()),
            store,
            cooldowns: CooldownTracker::with_clock(Arc::new(clock.clone())),
            cooldown: Duration::from_secs(5),
        };
        Fixture { _dir: dir, clock, state }
    }

    pub(crate) fn embed(reply: Reply) -> EmbedReply {
        match reply {
            Reply::Embed(embed) => embed,
            Reply::Text(text) => panic!("expected an embed, got {:?}", text),
        }
    }
}
