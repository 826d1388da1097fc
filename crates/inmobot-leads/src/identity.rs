// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Matching an interaction to an existing lead.

use inmobot_core::{Lead, LeadDataDelta, LeadIdentity};

/// Which key resolved an interaction to a lead, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKey {
    Session,
    Username,
    Phone,
    Email,
}

impl MatchKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKey::Session => "session",
            MatchKey::Username => "username",
            MatchKey::Phone => "phone",
            MatchKey::Email => "email",
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Finds the lead an interaction belongs to.
///
/// Keys are tried in order (session id, platform username, phone, email)
/// and the first key that matches any lead wins. Returns the index into
/// `leads` and the key that matched.
pub fn resolve(
    leads: &[Lead],
    identity: &LeadIdentity,
    data: &LeadDataDelta,
) -> Option<(usize, MatchKey)> {
    if let Some(session) = non_blank(identity.session_id.as_deref())
        && let Some(idx) = leads.iter().position(|l| l.owns_session(session))
    {
        return Some((idx, MatchKey::Session));
    }

    if let Some(username) = non_blank(identity.platform_username.as_deref())
        && let Some(idx) = leads
            .iter()
            .position(|l| non_blank(l.platform_username.as_deref()) == Some(username))
    {
        return Some((idx, MatchKey::Username));
    }

    if let Some(phone) = non_blank(data.phone.as_deref())
        && let Some(idx) = leads
            .iter()
            .position(|l| non_blank(l.data.phone.as_deref()) == Some(phone))
    {
        return Some((idx, MatchKey::Phone));
    }

    if let Some(email) = non_blank(data.email.as_deref())
        && let Some(idx) = leads
            .iter()
            .position(|l| non_blank(l.data.email.as_deref()) == Some(email))
    {
        return Some((idx, MatchKey::Email));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use inmobot_core::Channel;

    fn lead(id: &str, session: &str) -> Lead {
        Lead::new(
            id.into(),
            Channel::Web,
            &LeadIdentity::session(session),
            Utc::now(),
        )
    }

    #[test]
    fn session_beats_phone() {
        let mut by_phone = lead("a", "s-a");
        by_phone.data.phone = Some("600123456".into());
        let by_session = lead("b", "s-b");
        let leads = vec![by_phone, by_session];

        let data = LeadDataDelta {
            phone: Some("600123456".into()),
            ..LeadDataDelta::default()
        };
        let found = resolve(&leads, &LeadIdentity::session("s-b"), &data);
        assert_eq!(found, Some((1, MatchKey::Session)));
    }

    #[test]
    fn username_then_phone_then_email() {
        let mut a = lead("a", "s-a");
        a.platform_username = Some("juanp".into());
        let mut b = lead("b", "s-b");
        b.data.phone = Some("600123456".into());
        let mut c = lead("c", "s-c");
        c.data.email = Some("ana@example.com".into());
        let leads = vec![a, b, c];

        let identity = LeadIdentity::session("new").with_username("juanp");
        assert_eq!(
            resolve(&leads, &identity, &LeadDataDelta::default()),
            Some((0, MatchKey::Username))
        );

        let data = LeadDataDelta {
            phone: Some(" 600123456 ".into()),
            email: Some("ana@example.com".into()),
            ..LeadDataDelta::default()
        };
        assert_eq!(
            resolve(&leads, &LeadIdentity::session("new"), &data),
            Some((1, MatchKey::Phone))
        );

        let data = LeadDataDelta {
            email: Some("ana@example.com".into()),
            ..LeadDataDelta::default()
        };
        assert_eq!(
            resolve(&leads, &LeadIdentity::session("new"), &data),
            Some((2, MatchKey::Email))
        );
    }

    #[test]
    fn linked_session_resolves() {
        let mut a = lead("a", "s-a");
        a.linked_sessions.push("voice-1".into());
        let found = resolve(
            &[a],
            &LeadIdentity::session("voice-1"),
            &LeadDataDelta::default(),
        );
        assert_eq!(found, Some((0, MatchKey::Session)));
    }

    #[test]
    fn blank_keys_never_match() {
        let mut a = lead("a", "s-a");
        a.data.email = Some(String::new());
        let data = LeadDataDelta {
            email: Some("  ".into()),
            ..LeadDataDelta::default()
        };
        assert_eq!(resolve(&[a], &LeadIdentity::default(), &data), None);
    }
}
