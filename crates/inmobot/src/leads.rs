// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `inmobot leads` command implementation.

use std::sync::Arc;

use colored::Colorize;
use inmobot_config::InmobotConfig;
use inmobot_core::{Channel, InmobotError, Lead, Temperature};
use inmobot_leads::{LeadManager, LeadStats, ScoringPolicy};
use inmobot_storage::JsonLeadStore;

/// Which leads to list. Filters combine.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub hot: bool,
    pub channel: Option<Channel>,
    pub id: Option<String>,
    pub search: Option<String>,
}

pub fn lead_manager(config: &InmobotConfig) -> LeadManager {
    LeadManager::new(
        Arc::new(JsonLeadStore::from_config(&config.storage)),
        ScoringPolicy::new(config.scoring.clone()),
    )
}

/// Leads matching `filter`, most recently updated first.
pub async fn select(manager: &LeadManager, filter: &LeadFilter) -> Result<Vec<Lead>, InmobotError> {
    if let Some(id) = &filter.id {
        return manager
            .get_by_id(id)
            .await
            .map(|lead| vec![lead])
            .ok_or_else(|| InmobotError::NotFound {
                kind: "lead",
                id: id.clone(),
            });
    }

    let mut leads = match (&filter.search, filter.channel) {
        (Some(query), _) => manager.search(query).await,
        (None, Some(channel)) => manager.get_by_channel(channel).await,
        (None, None) if filter.hot => manager.get_hot().await,
        (None, None) => manager.get_all().await,
    };
    if filter.search.is_some()
        && let Some(channel) = filter.channel
    {
        leads.retain(|lead| lead.channel == channel);
    }
    if filter.hot {
        leads.retain(|lead| lead.temperature == Temperature::Hot);
    }
    Ok(leads)
}

pub async fn print_leads(
    manager: &LeadManager,
    filter: &LeadFilter,
    json: bool,
) -> Result<(), InmobotError> {
    let leads = select(manager, filter).await?;

    if json || filter.id.is_some() {
        let rendered = serde_json::to_string_pretty(&leads)
            .map_err(|e| InmobotError::Internal(format!("failed to render leads: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    if leads.is_empty() {
        println!("No leads found.");
        return Ok(());
    }

    println!(
        "{:<36}  {:<8}  {:<20}  {:<12}  {:>5}  {:<8}  {}",
        "ID", "CHANNEL", "NAME", "PHONE", "SCORE", "TEMP", "STATUS"
    );
    for lead in &leads {
        println!("{}", lead_row(lead));
    }
    println!("\n{} lead(s)", leads.len());
    Ok(())
}

fn lead_row(lead: &Lead) -> String {
    let temperature = match lead.temperature {
        Temperature::Hot => lead.temperature.to_string().red().bold(),
        Temperature::Warm => lead.temperature.to_string().yellow(),
        Temperature::Cold => lead.temperature.to_string().blue(),
    };
    format!(
        "{:<36}  {:<8}  {:<20}  {:<12}  {:>5}  {:<8}  {}",
        lead.id,
        lead.channel,
        lead.data.name.as_deref().unwrap_or("-"),
        lead.data.phone.as_deref().unwrap_or("-"),
        lead.score,
        temperature,
        lead.status
    )
}

pub async fn print_stats(manager: &LeadManager, json: bool) -> Result<(), InmobotError> {
    let stats = manager.stats().await;
    if json {
        let rendered = serde_json::to_string_pretty(&stats)
            .map_err(|e| InmobotError::Internal(format!("failed to render stats: {e}")))?;
        println!("{rendered}");
    } else {
        print!("{}", stats_text(&stats));
    }
    Ok(())
}

fn stats_text(stats: &LeadStats) -> String {
    format!(
        "total:    {}\nweb:      {}\ntelegram: {}\nvoice:    {}\nhot:      {}\nwarm:     {}\ncold:     {}\n",
        stats.total, stats.web, stats.telegram, stats.voice, stats.hot, stats.warm, stats.cold
    )
}
