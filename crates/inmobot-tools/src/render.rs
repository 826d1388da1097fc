// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text rendering of catalog entries and tool results.

use std::fmt::Write as _;

use inmobot_core::types::Objective;
use inmobot_core::Property;

use crate::search::SearchOutcome;

const DESCRIPTION_CHARS: usize = 100;
const FEATURES_SHOWN: usize = 4;

/// `250000` → `$250,000`.
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

fn price_line(property: &Property) -> String {
    match property.price_type.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(kind) => format!("{} ({kind})", format_price(property.price)),
        None => format_price(property.price),
    }
}

/// One catalog entry as a short block.
///
/// The emoji variant suits messaging channels; the plain one is used where
/// symbols would be read aloud or rendered poorly.
pub fn format_property(property: &Property, emoji: bool) -> String {
    let description = truncate_chars(property.description.trim(), DESCRIPTION_CHARS);
    let features = property
        .features
        .iter()
        .take(FEATURES_SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    if emoji {
        let _ = writeln!(out, "📍 **{}** ({})", property.title, property.id);
        let _ = writeln!(out, "💰 {}", price_line(property));
        let _ = writeln!(
            out,
            "🛏️ {} habitaciones | 🚿 {} baños | 📐 {}m²",
            property.bedrooms, property.bathrooms, property.area
        );
        if !description.is_empty() {
            let _ = writeln!(out, "✨ {description}");
        }
        if !features.is_empty() {
            let _ = writeln!(out, "🏢 Incluye: {features}");
        }
    } else {
        let _ = writeln!(out, "**{}** ({})", property.title, property.id);
        let _ = writeln!(out, "Precio: {}", price_line(property));
        let _ = writeln!(
            out,
            "{} habitaciones | {} baños | {}m²",
            property.bedrooms, property.bathrooms, property.area
        );
        if !description.is_empty() {
            let _ = writeln!(out, "{description}");
        }
        if !features.is_empty() {
            let _ = writeln!(out, "Incluye: {features}");
        }
    }
    out
}

const EMPTY_CATALOG: &str = "Por ahora no hay propiedades disponibles en el catálogo. \
Ofrece al cliente guardar sus datos para avisarle cuando haya nuevas opciones.";

/// The whole catalog, sale listings first, then rentals.
///
/// Every property appears exactly once, in catalog order within its group.
pub fn render_catalog(catalog: &[Property], emoji: bool) -> String {
    if catalog.is_empty() {
        return EMPTY_CATALOG.to_string();
    }

    let mut out = format!("Catálogo completo: {} propiedad(es).\n", catalog.len());
    for (objective, heading) in [
        (Objective::Venta, if emoji { "🏷️ En venta" } else { "En venta" }),
        (
            Objective::Alquiler,
            if emoji { "🔑 En alquiler" } else { "En alquiler" },
        ),
    ] {
        let group: Vec<&Property> = catalog.iter().filter(|p| p.objective == objective).collect();
        if group.is_empty() {
            continue;
        }
        let _ = write!(out, "\n{heading} ({}):\n", group.len());
        for property in group {
            out.push('\n');
            out.push_str(&format_property(property, emoji));
        }
    }
    out
}

const NO_MATCHES: &str = "No encontré propiedades que coincidan con esos criterios.";

pub fn render_search(outcome: &SearchOutcome, emoji: bool) -> String {
    match outcome {
        SearchOutcome::Matches { total, shown } => {
            let mut out = format!("Encontré {total} propiedad(es):\n");
            for property in shown {
                out.push('\n');
                out.push_str(&format_property(property, emoji));
            }
            out
        }
        SearchOutcome::Alternatives(alternatives) => {
            let mut out = format!("{NO_MATCHES} Estas opciones podrían interesarle:\n");
            for property in alternatives {
                out.push('\n');
                out.push_str(&format_property(property, emoji));
            }
            out
        }
        SearchOutcome::Nothing => NO_MATCHES.to_string(),
    }
}
