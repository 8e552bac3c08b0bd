//! Per-day quota on remote classification calls.
//!
//! The counter is an explicit [`QuotaState`] value run through pure
//! functions; where it is kept is up to the injected [`QuotaStore`].

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::storage::StorageError;

/// Production allowance per calendar day.
pub const DAILY_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaState {
    pub count: u32,
    pub window_start: NaiveDate,
    #[serde(default)]
    pub last_request_at: Option<NaiveDateTime>,
}

impl QuotaState {
    /// The state only counts for the day it was opened on.
    fn current(state: Option<&QuotaState>, today: NaiveDate) -> Option<&QuotaState> {
        state.filter(|s| s.window_start == today)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    /// `None` disables counting entirely.
    pub daily_limit: Option<u32>,
    pub min_interval: Option<TimeDelta>,
}

impl QuotaPolicy {
    pub fn production() -> Self {
        Self {
            daily_limit: Some(DAILY_LIMIT),
            min_interval: None,
        }
    }

    pub fn development() -> Self {
        Self {
            daily_limit: None,
            min_interval: None,
        }
    }

    pub fn with_daily_limit(mut self, limit: u32) -> Self {
        self.daily_limit = Some(limit);
        self
    }

    pub fn with_min_interval(mut self, interval: TimeDelta) -> Self {
        self.min_interval = Some(interval);
        self
    }

    pub fn is_unlimited(&self) -> bool {
        self.daily_limit.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    DailyLimitExceeded,
    TooFrequent,
}

/// Gate answer. `remaining` is requests left today when allowed or denied
/// for the daily limit, minutes to wait when denied as too frequent, and
/// absent when unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDecision {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenyReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

/// Requests left today. `None` means unlimited.
pub fn remaining(policy: &QuotaPolicy, state: Option<&QuotaState>, now: NaiveDateTime) -> Option<u32> {
    let limit = policy.daily_limit?;
    let used = QuotaState::current(state, now.date()).map_or(0, |s| s.count);
    Some(limit.saturating_sub(used))
}

pub fn check(policy: &QuotaPolicy, state: Option<&QuotaState>, now: NaiveDateTime) -> QuotaDecision {
    let Some(limit) = policy.daily_limit else {
        return QuotaDecision {
            allowed: true,
            reason: None,
            remaining: None,
        };
    };

    let Some(today) = QuotaState::current(state, now.date()) else {
        return QuotaDecision {
            allowed: true,
            reason: None,
            remaining: Some(limit),
        };
    };

    if today.count >= limit {
        return QuotaDecision {
            allowed: false,
            reason: Some(DenyReason::DailyLimitExceeded),
            remaining: Some(0),
        };
    }

    if let (Some(interval), Some(last)) = (policy.min_interval, today.last_request_at) {
        let elapsed = now - last;
        if elapsed < interval {
            let wait = interval - elapsed;
            let minutes = (wait.num_seconds() + 59) / 60;
            return QuotaDecision {
                allowed: false,
                reason: Some(DenyReason::TooFrequent),
                remaining: Some(u32::try_from(minutes.max(1)).unwrap_or(u32::MAX)),
            };
        }
    }

    QuotaDecision {
        allowed: true,
        reason: None,
        remaining: Some(limit - today.count),
    }
}

/// Count one request. Unlimited policies never count.
pub fn record(policy: &QuotaPolicy, state: Option<QuotaState>, now: NaiveDateTime) -> Option<QuotaState> {
    if policy.is_unlimited() {
        return state;
    }
    let today = now.date();
    let count = match &state {
        Some(s) if s.window_start == today => s.count + 1,
        _ => 1,
    };
    Some(QuotaState {
        count,
        window_start: today,
        last_request_at: Some(now),
    })
}

/// Where the quota state lives between requests.
pub trait QuotaStore: Send {
    fn load(&self) -> Option<QuotaState>;
    fn save(&mut self, state: &QuotaState) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryQuotaStore {
    state: Option<QuotaState>,
}

impl QuotaStore for MemoryQuotaStore {
    fn load(&self) -> Option<QuotaState> {
        self.state.clone()
    }

    fn save(&mut self, state: &QuotaState) -> Result<(), StorageError> {
        self.state = Some(state.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.state = None;
        Ok(())
    }
}

/// Gate in front of remote classification, reading the local clock.
#[derive(Debug)]
pub struct RequestLimiter<S> {
    policy: QuotaPolicy,
    store: S,
}

impl<S: QuotaStore> RequestLimiter<S> {
    pub fn new(policy: QuotaPolicy, store: S) -> Self {
        Self { policy, store }
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    pub fn can_make_request(&self) -> QuotaDecision {
        check(&self.policy, self.store.load().as_ref(), Self::now())
    }

    pub fn increment_request_count(&mut self) -> Result<(), StorageError> {
        match record(&self.policy, self.store.load(), Self::now()) {
            Some(next) if !self.policy.is_unlimited() => self.store.save(&next),
            _ => Ok(()),
        }
    }

    pub fn get_remaining_requests(&self) -> Option<u32> {
        remaining(&self.policy, self.store.load().as_ref(), Self::now())
    }

    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.store.clear()
    }
}
