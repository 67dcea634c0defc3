//! Audit log entries and query filters.

use chrono::{DateTime, Utc};
use cmlre_abac::{User, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a request came from. Stamped on every entry a logger writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOrigin {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestOrigin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }
}

/// One recorded user action.
///
/// Entries are created once and never modified. The timestamp serializes
/// as an RFC 3339 (ISO-8601) string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub user_name: String,
    pub action: String,
    pub resource: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl AuditLogEntry {
    /// Builds a fresh entry stamped with a new id and the current time.
    pub fn record(
        user: &User,
        action: &str,
        resource: &str,
        details: Option<serde_json::Value>,
        origin: &RequestOrigin,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            action: action.to_string(),
            resource: resource.to_string(),
            timestamp: Utc::now(),
            details,
            ip_address: origin.ip_address.clone(),
            user_agent: origin.user_agent.clone(),
        }
    }
}

/// Filter over recorded entries. Set fields combine with AND.
#[derive(Debug, Default, Clone)]
pub struct AuditQuery {
    pub user_id: Option<UserId>,
    pub action: Option<String>,
    pub resource: Option<String>,
    pub time_from: Option<DateTime<Utc>>,
    pub time_to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn with_resource(mut self, resource: &str) -> Self {
        self.resource = Some(resource.to_string());
        self
    }

    /// Inclusive on both ends.
    pub fn with_time_range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.time_from = Some(from);
        self.time_to = Some(to);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns whether `entry` satisfies every set field (ignores `limit`).
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(user_id) = &self.user_id {
            if entry.user_id != *user_id {
                return false;
            }
        }

        if let Some(action) = &self.action {
            if entry.action != *action {
                return false;
            }
        }

        if let Some(resource) = &self.resource {
            if entry.resource != *resource {
                return false;
            }
        }

        if let Some(from) = self.time_from {
            if entry.timestamp < from {
                return false;
            }
        }

        if let Some(to) = self.time_to {
            if entry.timestamp > to {
                return false;
            }
        }

        true
    }

    /// Applies the filter and limit to `entries`, keeping insertion order.
    pub fn apply<'a, I>(&self, entries: I) -> Vec<&'a AuditLogEntry>
    where
        I: IntoIterator<Item = &'a AuditLogEntry>,
    {
        let matching = entries.into_iter().filter(|e| self.matches(e));
        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use cmlre_rbac::Role;

    fn user() -> User {
        User::new("1", "Aman Antil", "aman.antil@cmlre.gov.in", Role::Scientist)
    }

    #[test]
    fn test_record_copies_identity() {
        let origin = RequestOrigin::new().with_ip("10.0.0.4");
        let entry = AuditLogEntry::record(&user(), "data_upload", "CTD cast 14", None, &origin);

        assert_eq!(entry.user_id, UserId::from("1"));
        assert_eq!(entry.user_name, "Aman Antil");
        assert_eq!(entry.action, "data_upload");
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.4"));
        assert!(!entry.id.is_nil());
    }

    #[test]
    fn test_entry_timestamp_is_iso8601() {
        let entry = AuditLogEntry::record(&user(), "login", "session", None, &RequestOrigin::new());
        let value = serde_json::to_value(&entry).unwrap();

        let raw = value["timestamp"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(raw).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), entry.timestamp);
        assert_eq!(value["userId"], "1");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_query_filters_combine() {
        let u = user();
        let origin = RequestOrigin::new();
        let entries = vec![
            AuditLogEntry::record(&u, "access_granted", "canViewData", None, &origin),
            AuditLogEntry::record(&u, "access_denied", "canManageUsers", None, &origin),
            AuditLogEntry::record(&u, "access_granted", "canEditData", None, &origin),
        ];

        let query = AuditQuery::default().with_action("access_granted");
        assert_eq!(query.apply(&entries).len(), 2);

        let query = query.with_resource("canEditData");
        assert_eq!(query.apply(&entries).len(), 1);

        let query = AuditQuery::default().with_user("2");
        assert!(query.apply(&entries).is_empty());

        let query = AuditQuery::default().with_limit(1);
        assert_eq!(query.apply(&entries)[0].resource, "canViewData");
    }

    #[test]
    fn test_query_time_range_is_inclusive() {
        let entry = AuditLogEntry::record(&user(), "login", "session", None, &RequestOrigin::new());
        let ts = entry.timestamp;

        assert!(AuditQuery::default().with_time_range(ts, ts).matches(&entry));
        assert!(
            !AuditQuery::default()
                .with_time_range(ts + Duration::seconds(1), ts + Duration::seconds(2))
                .matches(&entry)
        );
    }
}
