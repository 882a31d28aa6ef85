//! Dashboard metrics over app users and their subscriptions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentError, DocumentStore};
use crate::Document;

const WEEK_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    /// Store product id, e.g. "weekly" or "yearly".
    pub plan: String,
    pub status: SubscriptionStatus,
    /// Unix seconds.
    pub expires_at: u64,
}

impl SubscriptionInfo {
    /// Active and not past its expiry at `now`.
    pub fn is_active_at(&self, now: u64) -> bool {
        self.status == SubscriptionStatus::Active && self.expires_at > now
    }
}

/// An app user as recorded by the mobile client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "users")]
pub struct UserAccount {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Unix seconds.
    pub created_at: u64,
    #[serde(default)]
    pub subscription: Option<SubscriptionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_users: usize,
    pub active_subscribers: usize,
    /// Users whose subscription lapsed (expired, cancelled, or past expiry).
    pub lapsed_subscribers: usize,
    pub new_users_last_7_days: usize,
    /// Active subscribers per plan.
    pub by_plan: BTreeMap<String, usize>,
}

impl DashboardMetrics {
    pub fn collect<S: DocumentStore>(store: &S, now: u64) -> Result<Self, DocumentError> {
        let users = store.list_collection::<UserAccount>()?;
        Ok(Self::from_users(&users, now))
    }

    pub fn from_users(users: &[UserAccount], now: u64) -> Self {
        let mut metrics = DashboardMetrics {
            total_users: users.len(),
            ..Default::default()
        };
        let week_ago = now.saturating_sub(WEEK_SECS);

        for user in users {
            if user.created_at >= week_ago {
                metrics.new_users_last_7_days += 1;
            }

            match &user.subscription {
                Some(sub) if sub.is_active_at(now) => {
                    metrics.active_subscribers += 1;
                    *metrics.by_plan.entry(sub.plan.clone()).or_insert(0) += 1;
                }
                Some(_) => metrics.lapsed_subscribers += 1,
                None => {}
            }
        }

        metrics
    }

    /// Share of users with an active subscription, 0.0 for no users.
    pub fn conversion_rate(&self) -> f64 {
        if self.total_users == 0 {
            return 0.0;
        }
        self.active_subscribers as f64 / self.total_users as f64
    }
}
