/*!
 * DB models for the bot
 */

use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable};

pub use crate::schema::{character_stats, user_favorites};

#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct PickStat {
    pub game: String,
    pub character: String,
    pub picks: i32,
    pub last_picked: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = character_stats)]
pub struct NewPick<'a> {
    pub game: &'a str,
    pub character: &'a str,
    pub picks: i32,
    pub last_picked: NaiveDateTime,
}

#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub user_id: i64,
    pub game: String,
    pub character: String,
    pub added_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = user_favorites)]
pub struct NewFavorite<'a> {
    pub user_id: i64,
    pub game: &'a str,
    pub character: &'a str,
}
