// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rewrites chat-formatted replies into text a synthesizer can read aloud.
//!
//! The pipeline is deterministic and total: any input yields non-empty
//! output ending in terminal punctuation, and normalizing an already
//! normalized text changes nothing but whitespace.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use inmobot_core::Channel;

use crate::numbers::{ordinal, speak_number};

/// Default spoken length limit, in characters.
pub const DEFAULT_MAX_CHARS: usize = 500;

/// Appended when a reply is cut short.
pub const CONTINUATION_CUE: &str = "Para más detalles, pregúntame.";

/// Spoken when nothing readable is left.
pub const EMPTY_FALLBACK: &str = "Lo siento, no tengo una respuesta en este momento.";

/// Pause hint after sentence-ending punctuation.
const SENTENCE_GAP: &str = "  ";

/// A numeric token: digits with optional `.`/`,` groups.
const NUMBER: &str = r"\d+(?:[.,]\d+)*";

static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:[-*_=━─][ \t]*){3,}$").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]*").unwrap());
static ORDINAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(\d{1,2})[.)][ \t]+").unwrap());
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*•+][ \t]+").unwrap());

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s)]+").unwrap());
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z0-9._%+-]+)@([a-z0-9-]+(?:\.[a-z0-9-]+)+)\b").unwrap()
});

static CURRENCY: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(&format!(r"(?i)\bS/\.?\s*({NUMBER})")).unwrap(),
            "$1 soles",
        ),
        (
            Regex::new(&format!(r"(?i)(?:\bUS\$|\bUSD)\s*({NUMBER})")).unwrap(),
            "$1 dólares",
        ),
        (
            Regex::new(&format!(r"({NUMBER})\s*(?:USD|US\$)")).unwrap(),
            "$1 dólares",
        ),
        (
            Regex::new(&format!(r"\$\s*({NUMBER})")).unwrap(),
            "$1 dólares",
        ),
        (Regex::new(&format!(r"€\s*({NUMBER})")).unwrap(), "$1 euros"),
        (Regex::new(&format!(r"({NUMBER})\s*€")).unwrap(), "$1 euros"),
    ]
});

/// Abbreviations and symbols, applied in order.
static EXPANSIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bUS\$", " dólares "),
        (r"(?i)\bS/\.?", " soles "),
        (r"\$", " dólares "),
        (r"€", " euros "),
        (r"m²", " metros cuadrados "),
        (r"(\d)\s*m2\b", "$1 metros cuadrados "),
        (r"\bm2\b", " metros cuadrados "),
        (r"(?i)\bhabs?\.", "habitaciones"),
        (r"(?i)\bdorms?\.", "dormitorios"),
        (r"(?i)\bdptos\.?(\s|$)", "departamentos$1"),
        (r"(?i)\bdpto\.?(\s|$)", "departamento$1"),
        (r"(?i)\bav\.", "avenida"),
        (r"\bSra\.", "señora"),
        (r"\bSr\.", "señor"),
        (r"(?i)\baprox\.", "aproximadamente"),
        (r"(?i)\bn[°º]\s*", "número "),
        (r"/mes\b", " al mes"),
        (r"%", " por ciento"),
        (r"&", " y "),
        (r"@", " arroba "),
        (r"\|", ", "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap());
static NUMBER_WITH_NEXT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"({NUMBER})(\s*)(\p{{L}}+)?")).unwrap());

static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "[",
        r"\x{1F000}-\x{1FAFF}",
        r"\x{2600}-\x{27BF}",
        r"\x{2B00}-\x{2BFF}",
        r"\x{2190}-\x{21FF}",
        r"\x{2300}-\x{23FF}",
        r"\x{2500}-\x{25FF}",
        r"\x{FE00}-\x{FE0F}",
        r"\x{200D}",
        r"\x{20E3}",
        "]+"
    ))
    .unwrap()
});
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").unwrap());
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s][^*]*?)\*|~~(.+?)~~|`([^`]+)`").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap());
static RESIDUAL_MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_~`#>\[\]{}<]").unwrap());

static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.;:!?])").unwrap());
static MISSING_SPACE_AFTER_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,;:!?])(\p{L})").unwrap());
static REPEATED_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?,;:])[.!?,;:]+").unwrap());
static REPEATED_OPENERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([¡¿])[¡¿]+").unwrap());
static DANGLING_OPENER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[¡¿]\s*$").unwrap());
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([.!?])\s+").unwrap());

/// Small words that keep the full "uno" form after a number.
const NO_APOCOPE_BEFORE: [&str; 8] = ["de", "del", "y", "o", "a", "en", "por", "para"];

/// Converts chat text into speech-safe text.
#[derive(Debug, Clone)]
pub struct VoiceNormalizer {
    max_chars: usize,
}

impl Default for VoiceNormalizer {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl VoiceNormalizer {
    /// A normalizer truncating at `max_chars`.
    ///
    /// Limits too short to hold the continuation cue are raised to fit it.
    pub fn new(max_chars: usize) -> Self {
        let floor = CONTINUATION_CUE.chars().count() * 2;
        Self {
            max_chars: max_chars.max(floor),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn normalize(&self, text: &str) -> String {
        let text = strip_line_markup(text);
        let text = expand_links_and_emails(&text);
        let text = expand_symbols(&text);
        let text = numbers_to_words(&text);
        let text = strip_inline_markup(&text);
        let text = join_lines(&text);
        let text = tidy_punctuation(&text);
        let text = self.truncate(&text);
        finish(&text)
    }

    /// Cuts at the last sentence end that fits, else the last word.
    fn truncate(&self, text: &str) -> String {
        if text.chars().count() <= self.max_chars {
            return text.to_string();
        }
        // One char is reserved for the period a word cut appends.
        let budget = self.max_chars - CONTINUATION_CUE.chars().count() - SENTENCE_GAP.len() - 1;
        let head: String = text.chars().take(budget).collect();

        let sentence_cut = head
            .rfind(['.', '!', '?'])
            .filter(|&i| head[..i].chars().count() >= budget / 2)
            .map(|i| head[..=i].to_string());
        let body = sentence_cut.unwrap_or_else(|| {
            let word_cut = head.rfind(' ').unwrap_or(head.len());
            let mut body = head[..word_cut]
                .trim_end_matches([',', ';', ':', ' ', '¿', '¡'])
                .to_string();
            if !body.ends_with(['.', '!', '?']) {
                body.push('.');
            }
            body
        });
        format!("{body}{SENTENCE_GAP}{CONTINUATION_CUE}")
    }
}

/// Normalizes with the default limit.
pub fn normalize(text: &str) -> String {
    VoiceNormalizer::default().normalize(text)
}

/// Normalizes for voice channels and passes text channels through.
pub fn adapt_for_channel(text: &str, channel: Channel) -> String {
    if channel.is_voice() {
        normalize(text)
    } else {
        text.to_string()
    }
}

fn strip_line_markup(text: &str) -> String {
    let text = HORIZONTAL_RULE.replace_all(text, "");
    let text = HEADING.replace_all(&text, "");
    let text = ORDINAL_MARKER.replace_all(&text, |caps: &Captures| {
        let n: u64 = caps[1].parse().unwrap_or(0);
        match ordinal(n) {
            Some(word) => format!("{word}, "),
            None => caps[0].to_string(),
        }
    });
    BULLET.replace_all(&text, "").into_owned()
}

fn expand_links_and_emails(text: &str) -> String {
    let text = MARKDOWN_LINK.replace_all(text, "$1");
    let text = BARE_URL.replace_all(&text, "el enlace");
    EMAIL
        .replace_all(&text, |caps: &Captures| {
            format!(
                "{} arroba {}",
                spoken_address_part(&caps[1]),
                spoken_address_part(&caps[2])
            )
        })
        .into_owned()
}

fn spoken_address_part(part: &str) -> String {
    part.split('.')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" punto ")
        .replace(['_', '-'], " ")
}

fn expand_symbols(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in CURRENCY.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    for (pattern, replacement) in EXPANSIONS.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out
}

fn numbers_to_words(text: &str) -> String {
    let text = CLOCK_TIME.replace_all(text, |caps: &Captures| {
        if &caps[2] == "00" {
            format!("{} en punto", &caps[1])
        } else {
            format!("{} y {}", &caps[1], caps[2].trim_start_matches('0'))
        }
    });
    NUMBER_WITH_NEXT_WORD
        .replace_all(&text, |caps: &Captures| {
            let next = caps.get(3).map(|m| m.as_str());
            let apocope = next.is_some_and(|w| !NO_APOCOPE_BEFORE.contains(&w.to_lowercase().as_str()));
            let spaced = if next.is_some() && caps[2].is_empty() {
                " "
            } else {
                &caps[2]
            };
            format!(
                "{}{}{}",
                speak_number(&caps[1], apocope),
                spaced,
                next.unwrap_or_default()
            )
        })
        .into_owned()
}

fn strip_inline_markup(text: &str) -> String {
    let text = EMOJI.replace_all(text, "");
    let text = BOLD.replace_all(&text, "$1$2");
    let text = ITALIC.replace_all(&text, "$1$2$3");
    let text = HTML_TAG.replace_all(&text, " ");
    RESIDUAL_MARKUP.replace_all(&text, "").into_owned()
}

/// One line per sentence-ish unit: lines without closing punctuation get a
/// period so the break still reads as a pause.
fn join_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.ends_with(['.', '!', '?', ':', ';', ',']) {
                line.to_string()
            } else {
                format!("{line}.")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn tidy_punctuation(text: &str) -> String {
    let text = SPACE_RUN.replace_all(text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = REPEATED_PUNCT.replace_all(&text, "$1");
    let text = MISSING_SPACE_AFTER_PUNCT.replace_all(&text, "$1 $2");
    let text = REPEATED_OPENERS.replace_all(&text, "$1");
    let text = text.trim();
    // A lone leading punctuation mark reads as noise.
    let text = text.trim_start_matches(['.', ',', ';', ':', '!', '?']).trim_start();
    SENTENCE_END
        .replace_all(text, format!("$1{SENTENCE_GAP}").as_str())
        .trim()
        .to_string()
}

fn finish(text: &str) -> String {
    let text = DANGLING_OPENER.replace(text, "");
    let mut text = text
        .trim()
        .trim_end_matches([',', ';', ':'])
        .trim_end()
        .to_string();
    if !text.chars().any(char::is_alphanumeric) {
        return EMPTY_FALLBACK.to_string();
    }
    if !text.ends_with(['.', '!', '?']) {
        text.push('.');
    }
    text
}
