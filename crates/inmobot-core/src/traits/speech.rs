// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech backend trait (speech-to-text and text-to-speech).

use async_trait::async_trait;

use crate::error::InmobotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{SynthesizedAudio, VoiceInfo, VoiceParams};

/// A speech backend able to transcribe and synthesize Spanish audio.
#[async_trait]
pub trait SpeechProvider: PluginAdapter {
    /// Converts recorded audio into text.
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, InmobotError>;

    /// Converts speech-safe text into audio.
    async fn synthesize(
        &self,
        text: &str,
        params: &VoiceParams,
    ) -> Result<SynthesizedAudio, InmobotError>;

    /// Voices this backend offers.
    fn voices(&self) -> &'static [VoiceInfo];
}
