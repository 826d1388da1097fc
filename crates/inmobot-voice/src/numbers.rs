// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spanish number words.
//!
//! Cardinals follow the usual spoken forms: irregular teens, the fused
//! "veinti-" series, "y" joining tens and units from thirty up, "cien"
//! alone versus "ciento" before more digits, and "mil"/"millón" grouping
//! with "uno" shortened to "un" before a multiplier.

const UNITS: [&str; 10] = [
    "cero", "uno", "dos", "tres", "cuatro", "cinco", "seis", "siete", "ocho", "nueve",
];

const TEENS: [&str; 10] = [
    "diez",
    "once",
    "doce",
    "trece",
    "catorce",
    "quince",
    "dieciséis",
    "diecisiete",
    "dieciocho",
    "diecinueve",
];

const TWENTIES: [&str; 10] = [
    "veinte",
    "veintiuno",
    "veintidós",
    "veintitrés",
    "veinticuatro",
    "veinticinco",
    "veintiséis",
    "veintisiete",
    "veintiocho",
    "veintinueve",
];

const TENS: [&str; 10] = [
    "", "", "", "treinta", "cuarenta", "cincuenta", "sesenta", "setenta", "ochenta", "noventa",
];

const HUNDREDS: [&str; 10] = [
    "",
    "ciento",
    "doscientos",
    "trescientos",
    "cuatrocientos",
    "quinientos",
    "seiscientos",
    "setecientos",
    "ochocientos",
    "novecientos",
];

/// Scales above a million, each a factor of 10^6 over the previous one.
const SCALES: [(&str, &str); 3] = [
    ("millón", "millones"),
    ("billón", "billones"),
    ("trillón", "trillones"),
];

const ORDINALS: [&str; 10] = [
    "primero", "segundo", "tercero", "cuarto", "quinto", "sexto", "séptimo", "octavo", "noveno",
    "décimo",
];

/// Digit runs at least this long are read digit by digit (phone numbers).
const SPELL_OUT_DIGITS: usize = 9;

fn below_hundred(n: u64) -> String {
    debug_assert!(n < 100);
    let n = n as usize;
    match n {
        0..=9 => UNITS[n].to_string(),
        10..=19 => TEENS[n - 10].to_string(),
        20..=29 => TWENTIES[n - 20].to_string(),
        _ if n % 10 == 0 => TENS[n / 10].to_string(),
        _ => format!("{} y {}", TENS[n / 10], UNITS[n % 10]),
    }
}

fn below_thousand(n: u64) -> String {
    debug_assert!(n < 1000);
    if n == 100 {
        return "cien".to_string();
    }
    let hundreds = (n / 100) as usize;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, _) => below_hundred(rest),
        (_, 0) => HUNDREDS[hundreds].to_string(),
        _ => format!("{} {}", HUNDREDS[hundreds], below_hundred(rest)),
    }
}

fn below_million(n: u64) -> String {
    debug_assert!(n < 1_000_000);
    let thousands = n / 1000;
    let rest = n % 1000;
    let mut parts = Vec::with_capacity(2);
    match thousands {
        0 => {}
        1 => parts.push("mil".to_string()),
        _ => parts.push(format!("{} mil", apocopate(&below_thousand(thousands)))),
    }
    if rest > 0 || thousands == 0 {
        parts.push(below_thousand(rest));
    }
    parts.join(" ")
}

/// Shortens a trailing "uno" to "un" ("veintiuno" to "veintiún").
pub fn apocopate(words: &str) -> String {
    if let Some(stem) = words.strip_suffix("veintiuno") {
        format!("{stem}veintiún")
    } else if let Some(stem) = words.strip_suffix("uno") {
        format!("{stem}un")
    } else {
        words.to_string()
    }
}

/// The cardinal for `n`, e.g. `200000` → "doscientos mil".
pub fn to_words(n: u64) -> String {
    if n < 1_000_000 {
        return below_million(n);
    }

    let mut groups = Vec::with_capacity(4);
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 1_000_000);
        rest /= 1_000_000;
    }

    let mut parts = Vec::with_capacity(groups.len());
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        if scale == 0 {
            parts.push(below_million(group));
        } else {
            let (singular, plural) = SCALES[scale - 1];
            if group == 1 {
                parts.push(format!("un {singular}"));
            } else {
                parts.push(format!("{} {plural}", apocopate(&below_million(group))));
            }
        }
    }
    parts.join(" ")
}

/// Ordinal list marker for 1 through 10.
pub fn ordinal(n: u64) -> Option<&'static str> {
    match n {
        1..=10 => Some(ORDINALS[(n - 1) as usize]),
        _ => None,
    }
}

/// Reads each digit separately: "600" → "seis cero cero".
pub fn spell_digits(digits: &str) -> String {
    digits
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| UNITS[d as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

fn integer_words(digits: &str, apocope: bool) -> String {
    let long = digits.len() >= SPELL_OUT_DIGITS;
    let leading_zero = digits.len() > 1 && digits.starts_with('0');
    match digits.parse::<u64>() {
        Ok(n) if !long && !leading_zero => {
            let words = to_words(n);
            if apocope { apocopate(&words) } else { words }
        }
        _ => spell_digits(digits),
    }
}

/// Digits that were written with thousands separators: always a quantity,
/// never a phone number, whatever their length.
fn grouped_words(digits: &str, apocope: bool) -> String {
    match digits.parse::<u64>() {
        Ok(n) => {
            let words = to_words(n);
            if apocope { apocopate(&words) } else { words }
        }
        Err(_) => spell_digits(digits),
    }
}

/// Decimal digits after "coma": leading zeros are read one by one.
fn decimal_words(digits: &str) -> String {
    let significant = digits.trim_start_matches('0');
    let zeros = digits.len() - significant.len();
    let mut parts: Vec<String> = std::iter::repeat_n("cero".to_string(), zeros).collect();
    if !significant.is_empty() {
        parts.push(integer_words(significant, false));
    }
    parts.join(" ")
}

/// Thousands grouping with a single separator kind: "200.000", "1,250,000".
fn grouped_integer(parts: &[&str], separators: &[char]) -> Option<String> {
    let uniform = separators.windows(2).all(|w| w[0] == w[1]);
    let first_ok = (1..=3).contains(&parts[0].len());
    let rest_ok = parts[1..].iter().all(|p| p.len() == 3);
    (parts.len() > 1 && uniform && first_ok && rest_ok).then(|| parts.concat())
}

/// Speaks a numeric token such as `200.000`, `2,5` or `600123456`.
///
/// With `apocope`, a trailing "uno" is shortened as it is before a noun.
pub fn speak_number(token: &str, apocope: bool) -> String {
    let separators: Vec<char> = token.chars().filter(|c| matches!(c, '.' | ',')).collect();
    let parts: Vec<&str> = token.split(['.', ',']).collect();

    if parts.len() == 1 {
        return integer_words(token, apocope);
    }
    if let Some(digits) = grouped_integer(&parts, &separators) {
        return grouped_words(&digits, apocope);
    }

    let (int_parts, decimals) = parts.split_at(parts.len() - 1);
    let int_separators = &separators[..separators.len() - 1];
    let integer = if int_parts.len() == 1 {
        Some(integer_words(int_parts[0], false))
    } else {
        grouped_integer(int_parts, int_separators)
            .filter(|_| int_separators.first() != separators.last())
            .map(|digits| grouped_words(&digits, false))
    };
    match integer {
        Some(words) => format!("{words} coma {}", decimal_words(decimals[0])),
        None => parts
            .iter()
            .map(|p| integer_words(p, false))
            .collect::<Vec<_>>()
            .join(" punto "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        let expected = [
            (0, "cero"),
            (1, "uno"),
            (10, "diez"),
            (15, "quince"),
            (16, "dieciséis"),
            (20, "veinte"),
            (21, "veintiuno"),
            (22, "veintidós"),
            (30, "treinta"),
            (31, "treinta y uno"),
            (99, "noventa y nueve"),
        ];
        for (n, words) in expected {
            assert_eq!(to_words(n), words, "{n}");
        }
    }

    #[test]
    fn hundreds() {
        assert_eq!(to_words(100), "cien");
        assert_eq!(to_words(101), "ciento uno");
        assert_eq!(to_words(115), "ciento quince");
        assert_eq!(to_words(500), "quinientos");
        assert_eq!(to_words(999), "novecientos noventa y nueve");
    }

    #[test]
    fn thousands_and_millions() {
        assert_eq!(to_words(1000), "mil");
        assert_eq!(to_words(1001), "mil uno");
        assert_eq!(to_words(2500), "dos mil quinientos");
        assert_eq!(to_words(21_000), "veintiún mil");
        assert_eq!(to_words(31_000), "treinta y un mil");
        assert_eq!(to_words(100_000), "cien mil");
        assert_eq!(to_words(101_000), "ciento un mil");
        assert_eq!(to_words(200_000), "doscientos mil");
        assert_eq!(to_words(1_000_000), "un millón");
        assert_eq!(to_words(1_250_000), "un millón doscientos cincuenta mil");
        assert_eq!(to_words(21_000_000), "veintiún millones");
        assert_eq!(to_words(2_000_001), "dos millones uno");
        assert_eq!(to_words(1_000_000_000), "mil millones");
        assert_eq!(to_words(3_000_000_000_000), "tres billones");
    }

    #[test]
    fn apocope_before_nouns() {
        assert_eq!(apocopate("veintiuno"), "veintiún");
        assert_eq!(apocopate("treinta y uno"), "treinta y un");
        assert_eq!(apocopate("dos"), "dos");
        assert_eq!(speak_number("1", true), "un");
        assert_eq!(speak_number("21", false), "veintiuno");
    }

    #[test]
    fn separators() {
        assert_eq!(speak_number("200.000", false), "doscientos mil");
        assert_eq!(speak_number("250,000", false), "doscientos cincuenta mil");
        assert_eq!(speak_number("2,5", false), "dos coma cinco");
        assert_eq!(speak_number("3.75", false), "tres coma setenta y cinco");
        assert_eq!(speak_number("1,05", false), "uno coma cero cinco");
        assert_eq!(speak_number("3.000,50", false), "tres mil coma cincuenta");
        assert_eq!(speak_number("1.2.3", false), "uno punto dos punto tres");
    }

    #[test]
    fn grouped_amounts_in_the_millions() {
        assert_eq!(speak_number("200.000.000", false), "doscientos millones");
        assert_eq!(speak_number("150,000,000", false), "ciento cincuenta millones");
        assert_eq!(speak_number("1.250.000.000", false), "mil doscientos cincuenta millones");
        assert_eq!(speak_number("21.000.000", true), "veintiún millones");
        assert_eq!(
            speak_number("100.000.000,50", false),
            "cien millones coma cincuenta"
        );
    }

    #[test]
    fn phone_numbers_are_spelled() {
        assert_eq!(
            speak_number("600123456", false),
            "seis cero cero uno dos tres cuatro cinco seis"
        );
        assert_eq!(speak_number("007", false), "cero cero siete");
    }

    #[test]
    fn ordinals() {
        assert_eq!(ordinal(1), Some("primero"));
        assert_eq!(ordinal(3), Some("tercero"));
        assert_eq!(ordinal(10), Some("décimo"));
        assert_eq!(ordinal(11), None);
    }
}
