// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice support for InmoBot.
//!
//! [`normalize`] turns chat-style replies (markdown, emoji, prices, units)
//! into text a synthesizer reads naturally in Spanish. [`speech`] holds the
//! Deepgram and OpenAI backends and the [`SpeechFallback`] chain the voice
//! channel talks to.

pub mod normalize;
pub mod numbers;
pub mod speech;

pub use normalize::{
    CONTINUATION_CUE, DEFAULT_MAX_CHARS, EMPTY_FALLBACK, VoiceNormalizer, adapt_for_channel,
    normalize,
};
pub use speech::{DeepgramSpeech, OpenAiSpeech, SpeechFallback};
