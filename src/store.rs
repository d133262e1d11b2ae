/*!
 * SQLite-backed pick statistics and user favorites
 */

use std::time::Duration;

use chrono::Utc;
use diesel::{
    connection::SimpleConnection,
    prelude::*,
    r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection},
    SqliteConnection,
};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::models::*;
use crate::select::PickRecorder;

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
pub type SqlitePooledConn = PooledConnection<ConnectionManager<SqliteConnection>>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS character_stats (
        game TEXT NOT NULL,
        character TEXT NOT NULL,
        picks INTEGER NOT NULL DEFAULT 0,
        last_picked TIMESTAMP NOT NULL,
        PRIMARY KEY (game, character)
    );
    CREATE TABLE IF NOT EXISTS user_favorites (
        user_id BIGINT NOT NULL,
        game TEXT NOT NULL,
        character TEXT NOT NULL,
        added_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (user_id, game, character)
    );
";

/// How long a connection waits on another writer before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Connection recycling of file databases, as r2d2 does by default
const MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);
const IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, PartialEq, Eq)]
struct PoolSettings {
    max_size: u32,
    max_lifetime: Option<Duration>,
    idle_timeout: Option<Duration>,
}

impl PoolSettings {
    fn for_url(database_url: &str, max_connections: u32) -> PoolSettings {
        if database_url == ":memory:" {
            // Every connection to `:memory:` is its own database, gone once the connection closes
            PoolSettings { max_size: 1, max_lifetime: None, idle_timeout: None }
        } else {
            PoolSettings {
                max_size: max_connections.max(1),
                max_lifetime: Some(MAX_LIFETIME),
                idle_timeout: Some(IDLE_TIMEOUT),
            }
        }
    }
}

/// Discord snowflakes fit in 63 bits, so the cast round-trips.
fn db_user_id(user_id: u64) -> i64 {
    user_id as i64
}

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (creating if needed) the database at `database_url` and its tables.
    pub fn open(database_url: &str, max_connections: u32) -> Result<Store> {
        let settings = PoolSettings::for_url(database_url, max_connections);
        let max_connections = settings.max_size;

        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(settings.max_size)
            .max_lifetime(settings.max_lifetime)
            .idle_timeout(settings.idle_timeout)
            .connection_customizer(Box::new(ConnectionOptions { busy_timeout: BUSY_TIMEOUT }))
            .build(manager)?;

        pool.get()?.batch_execute(SCHEMA)?;
        info!(database_url, max_connections, "Database tables initialized");

        Ok(Store { pool })
    }

    fn conn(&self) -> Result<SqlitePooledConn> {
        Ok(self.pool.get()?)
    }

    /// Counts one more pick of `character`, creating its row on the first pick.
    #[instrument(skip(self), err)]
    pub fn record_pick(&self, game: &str, character: &str) -> Result<()> {
        let now = Utc::now().naive_utc();
        let mut conn = self.conn()?;

        diesel::insert_into(character_stats::table)
            .values(NewPick { game, character, picks: 1, last_picked: now })
            .on_conflict((character_stats::game, character_stats::character))
            .do_update()
            .set((
                character_stats::picks.eq(character_stats::picks + 1),
                character_stats::last_picked.eq(now),
            ))
            .execute(&mut conn)?;

        debug!("Pick recorded");
        Ok(())
    }

    /// Pick statistics, most picked first. Without a game, rows are grouped by game.
    #[instrument(skip(self), err)]
    pub fn stats(&self, game: Option<&str>) -> Result<Vec<PickStat>> {
        let mut conn = self.conn()?;

        let stats = match game {
            Some(game) => character_stats::table
                .filter(character_stats::game.eq(game))
                .order((character_stats::picks.desc(), character_stats::character.asc()))
                .load::<PickStat>(&mut conn)?,
            None => character_stats::table
                .order((
                    character_stats::game.asc(),
                    character_stats::picks.desc(),
                    character_stats::character.asc(),
                ))
                .load::<PickStat>(&mut conn)?,
        };

        Ok(stats)
    }

    /// Returns false if the user already had this favorite.
    #[instrument(skip(self), err)]
    pub fn add_favorite(&self, user_id: u64, game: &str, character: &str) -> Result<bool> {
        let mut conn = self.conn()?;

        let inserted = diesel::insert_into(user_favorites::table)
            .values(NewFavorite { user_id: db_user_id(user_id), game, character })
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        Ok(inserted > 0)
    }

    /// Returns false if there was nothing to remove.
    #[instrument(skip(self), err)]
    pub fn remove_favorite(&self, user_id: u64, game: &str, character: &str) -> Result<bool> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            user_favorites::table
                .filter(user_favorites::user_id.eq(db_user_id(user_id)))
                .filter(user_favorites::game.eq(game))
                .filter(user_favorites::character.eq(character)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    /// A user's favorites, sorted by game then character.
    #[instrument(skip(self), err)]
    pub fn favorites(&self, user_id: u64) -> Result<Vec<Favorite>> {
        let mut conn = self.conn()?;

        let favorites = user_favorites::table
            .filter(user_favorites::user_id.eq(db_user_id(user_id)))
            .order((user_favorites::game.asc(), user_favorites::character.asc()))
            .load::<Favorite>(&mut conn)?;

        Ok(favorites)
    }
}

impl PickRecorder for Store {
    fn record_pick(&self, game: &str, character: &str) -> Result<()> {
        Store::record_pick(self, game, character)
    }
}
