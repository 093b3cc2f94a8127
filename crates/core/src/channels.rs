//! Well-known alert channel and frequency constants.
//!
//! These must match the CHECK constraints on `alert_rules.channel` and
//! `alert_rules.frequency`. Channels are informational: rules record where
//! the user wants to be notified, but the service itself only persists
//! in-app notifications.

/// Stored notification shown in the dashboard's notification bell.
pub const CHANNEL_IN_APP: &str = "in_app";

/// Email delivery (recorded on the rule; no delivery pipeline).
pub const CHANNEL_EMAIL: &str = "email";

/// Mobile/browser push (recorded on the rule; no delivery pipeline).
pub const CHANNEL_PUSH: &str = "push";

pub const FREQUENCY_IMMEDIATE: &str = "immediate";
pub const FREQUENCY_DAILY: &str = "daily";
pub const FREQUENCY_WEEKLY: &str = "weekly";

/// All accepted channel values, in CHECK-constraint order.
pub const CHANNELS: &[&str] = &[CHANNEL_IN_APP, CHANNEL_EMAIL, CHANNEL_PUSH];

/// All accepted frequency values, in CHECK-constraint order.
pub const FREQUENCIES: &[&str] = &[FREQUENCY_IMMEDIATE, FREQUENCY_DAILY, FREQUENCY_WEEKLY];

/// Resolve a client-supplied channel to its stored form.
///
/// Clients commonly send the hyphenated spelling `in-app`; it is accepted
/// as an alias of [`CHANNEL_IN_APP`]. Returns `None` for unknown values.
pub fn canonical_channel(value: &str) -> Option<&'static str> {
    match value {
        CHANNEL_IN_APP | "in-app" => Some(CHANNEL_IN_APP),
        CHANNEL_EMAIL => Some(CHANNEL_EMAIL),
        CHANNEL_PUSH => Some(CHANNEL_PUSH),
        _ => None,
    }
}
