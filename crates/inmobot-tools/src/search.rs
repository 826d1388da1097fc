// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property search over the catalog.

use std::str::FromStr;

use inmobot_core::types::PropertyType;
use inmobot_core::Property;

/// Most results (or alternatives) returned by one search.
pub const MAX_RESULTS: usize = 3;

/// Optional filters; `None`, blank and zero values do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub zone: Option<String>,
    pub property_type: Option<String>,
    pub max_price: Option<u64>,
    pub min_bedrooms: Option<u32>,
}

/// What a search produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Properties matching every filter. `total` counts all matches, while
    /// `shown` holds at most [`MAX_RESULTS`] of them.
    Matches { total: usize, shown: Vec<Property> },
    /// Nothing matched; the closest properties instead.
    Alternatives(Vec<Property>),
    /// Nothing matched and the catalog is empty.
    Nothing,
}

impl SearchCriteria {
    fn zone(&self) -> Option<String> {
        self.zone
            .as_deref()
            .map(|z| z.trim().to_lowercase())
            .filter(|z| !z.is_empty())
    }

    fn property_type(&self) -> Option<&str> {
        self.property_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// One flag per active filter, true when `property` passes it.
    fn checks(&self, property: &Property) -> Vec<bool> {
        let mut checks = Vec::with_capacity(4);
        if let Some(zone) = self.zone() {
            let candidate = property.zone.to_lowercase();
            checks.push(candidate.contains(&zone) || zone.contains(&candidate));
        }
        if let Some(wanted) = self.property_type() {
            checks.push(
                PropertyType::from_str(wanted).is_ok_and(|t| t == property.property_type),
            );
        }
        if let Some(max) = self.max_price.filter(|m| *m > 0) {
            checks.push(property.price <= max);
        }
        if let Some(min) = self.min_bedrooms.filter(|m| *m > 0) {
            checks.push(property.bedrooms >= min);
        }
        checks
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.checks(property).into_iter().all(|ok| ok)
    }

    fn score(&self, property: &Property) -> usize {
        self.checks(property).into_iter().filter(|ok| *ok).count()
    }

    /// Filters `catalog`, falling back to ranked alternatives.
    ///
    /// Alternatives are the properties passing the most filters, cheapest
    /// first among equals.
    pub fn run(&self, catalog: &[Property]) -> SearchOutcome {
        let matches: Vec<&Property> = catalog.iter().filter(|p| self.matches(p)).collect();
        if !matches.is_empty() {
            return SearchOutcome::Matches {
                total: matches.len(),
                shown: matches.into_iter().take(MAX_RESULTS).cloned().collect(),
            };
        }
        if catalog.is_empty() {
            return SearchOutcome::Nothing;
        }

        let mut ranked: Vec<&Property> = catalog.iter().collect();
        ranked.sort_by(|a, b| {
            self.score(b)
                .cmp(&self.score(a))
                .then(a.price.cmp(&b.price))
        });
        SearchOutcome::Alternatives(ranked.into_iter().take(MAX_RESULTS).cloned().collect())
    }
}
