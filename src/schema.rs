table! {
    character_stats (game, character) {
        game -> Text,
        character -> Text,
        picks -> Integer,
        last_picked -> Timestamp,
    }
}

table! {
    user_favorites (user_id, game, character) {
        user_id -> BigInt,
        game -> Text,
        character -> Text,
        added_at -> Timestamp,
    }
}

allow_tables_to_appear_in_same_query!(character_stats, user_favorites,);
