/*!
 * Pre-defined messages
 */

use std::time::Duration;

pub const BOT_DESCRIPTION: &str = "A bot that helps you select random characters from various games";

pub const NO_STATS: &str = "No statistics available yet.";

pub const NO_FAVORITES: &str = "You don't have any favorite characters yet.";

/// Discord rejects embed field values longer than this
pub const FIELD_VALUE_LIMIT: usize = 1024;

pub fn cooldown(left: Duration) -> String {
    // Round up so that the user is never told to wait 0 seconds
    let secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
    format!("Please wait {} seconds before using this command again.", secs)
}

pub fn favorite_updated(character: &str, added: bool) -> String {
    let action = if added { "added to" } else { "removed from" };
    format!("**{}** has been {} your favorites.", character, action)
}

pub fn requested_by(name: &str) -> String {
    format!("Requested by {}", name)
}

/// Cuts `value` down to an embed field, marking the cut.
pub fn clip_field(value: String) -> String {
    if value.chars().count() <= FIELD_VALUE_LIMIT {
        return value;
    }
    let mut clipped = value.chars().take(FIELD_VALUE_LIMIT - 1).collect::<String>();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_rounds_up() {
        assert_eq!(
            cooldown(Duration::from_millis(4200)),
            "Please wait 5 seconds before using this command again."
        );
        assert_eq!(
            cooldown(Duration::from_secs(3)),
            "Please wait 3 seconds before using this command again."
        );
    }

    #[test]
    fn long_fields_are_clipped() {
        assert_eq!(clip_field("short".to_owned()), "short");
        let clipped = clip_field("x".repeat(2000));
        assert_eq!(clipped.chars().count(), FIELD_VALUE_LIMIT);
        assert!(clipped.ends_with('…'));
    }
}
