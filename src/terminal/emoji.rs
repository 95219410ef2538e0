//! Emoji constants used by `cfworker`.
//!
//! `console` drops the emoji and falls back to the second string when the
//! terminal can't render them.

#![allow(missing_docs)]

use console::Emoji;

pub static EYES: Emoji = Emoji("👀 ", "");
pub static INFO: Emoji = Emoji("💁 ", "");
pub static SLEUTH: Emoji = Emoji("🕵️  ", "");
pub static SPARKLES: Emoji = Emoji("✨ ", "");
pub static SWIRL: Emoji = Emoji("🌀 ", "");
pub static WARN: Emoji = Emoji("⚠️  ", "");
