//! Common functionality and types.

use console::Emoji;

pub static STARTING: Emoji<'_, '_> = Emoji("🚀", "");
pub static SUCCESS: Emoji<'_, '_> = Emoji("✅", "");

/// Replacement for values which must not be shown.
pub const REDACTED: &str = "<redacted>";
