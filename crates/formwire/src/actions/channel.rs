// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Single-use storage of the last outcome per action and session.
//!
//! A submission that did not redirect publishes its outcome here; the page
//! renderer consumes it once to show inline errors and prefilled values.
//!
//! Entries are spread over a fixed number of shards, each an LRU map behind
//! its own mutex, so unrelated sessions rarely touch the same lock.

use lru::LruCache;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::trace;

use super::id::ActionId;
use super::outcome::InvocationOutcome;
use crate::fields::FormFields;
use crate::session::SessionKey;
use crate::validate::Issue;

const SHARDS: usize = 16;

/// What the page renderer sees after a submission that did not redirect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionState {
    /// The action that ran.
    pub action_id: ActionId,
    /// The submitted fields, for prefilling inputs.
    pub fields: FormFields,
    /// The classified result.
    pub outcome: InvocationOutcome,
}

impl ActionState {
    /// The submitted text for a field.
    pub fn field_text(&self, name: &str) -> Option<&str> {
        self.fields.text(name)
    }

    /// All validation issues.
    pub fn issues(&self) -> &[Issue] {
        self.outcome.issues()
    }

    /// Issues attached to one field path.
    pub fn issues_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues().iter().filter(move |issue| issue.path == path)
    }

    /// The client-safe fault message, if the action faulted.
    pub fn fault_message(&self) -> Option<&str> {
        match &self.outcome {
            InvocationOutcome::Fault(fault) => Some(&fault.message),
            _ => None,
        }
    }
}

/// Channel limits.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Total number of entries kept across all shards.
    pub capacity: usize,
    /// How long an unconsumed entry stays readable.
    pub ttl: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            ttl: Duration::from_secs(300),
        }
    }
}

type Key = (ActionId, SessionKey);

struct Entry {
    state: ActionState,
    stored_at: Instant,
}

/// Bounded, expiring, read-once store keyed by `(ActionId, SessionKey)`.
///
/// # Example
///
/// ```rust
/// use formwire::actions::{ActionId, InvocationOutcome, ResultChannel};
/// use formwire::{FormFields, SessionKey};
///
/// let channel = ResultChannel::default();
/// let id = ActionId::from("0123456789abcdef01234567");
/// let session = SessionKey::new("s1");
///
/// channel.publish(
///     id.clone(),
///     session.clone(),
///     InvocationOutcome::ValidationFailure { issues: vec![] },
///     FormFields::new().with("title", "ab"),
/// );
///
/// assert!(channel.consume(&id, &session).is_some());
/// assert!(channel.consume(&id, &session).is_none());
/// ```
pub struct ResultChannel {
    shards: Vec<Mutex<LruCache<Key, Entry>>>,
    ttl: Duration,
}

impl ResultChannel {
    /// Creates a channel with the given limits.
    pub fn new(config: ChannelConfig) -> Self {
        let per_shard = config.capacity.div_ceil(SHARDS).max(1);
        let per_shard = NonZeroUsize::new(per_shard).unwrap_or(NonZeroUsize::MIN);
        let shards = (0..SHARDS)
            .map(|_| Mutex::new(LruCache::new(per_shard)))
            .collect();
        Self {
            shards,
            ttl: config.ttl,
        }
    }

    /// Stores the outcome of a submission, replacing any earlier one.
    pub fn publish(&self, action_id: ActionId, session: SessionKey, outcome: InvocationOutcome, fields: FormFields) {
        let key = (action_id.clone(), session);
        let entry = Entry {
            state: ActionState {
                action_id,
                fields,
                outcome,
            },
            stored_at: Instant::now(),
        };
        trace!(action = %key.0, "published action state");
        self.shard(&key).put(key, entry);
    }

    /// Removes and returns the stored state. Expired entries count as absent.
    pub fn consume(&self, action_id: &ActionId, session: &SessionKey) -> Option<ActionState> {
        let key = (action_id.clone(), session.clone());
        let entry = self.shard(&key).pop(&key)?;
        if entry.stored_at.elapsed() > self.ttl {
            trace!(action = %action_id, "dropped expired action state");
            return None;
        }
        Some(entry.state)
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| lock(s).len()).sum()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut removed = 0;
        for shard in &self.shards {
            let mut cache = lock(shard);
            let expired: Vec<Key> = cache
                .iter()
                .filter(|(_, entry)| entry.stored_at.elapsed() > self.ttl)
                .map(|(key, _)| key.clone())
                .collect();
            for key in expired {
                cache.pop(&key);
                removed += 1;
            }
        }
        removed
    }

    fn shard(&self, key: &Key) -> MutexGuard<'_, LruCache<Key, Entry>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = (hasher.finish() as usize) % SHARDS;
        lock(&self.shards[index])
    }
}

impl Default for ResultChannel {
    fn default() -> Self {
        Self::new(ChannelConfig::default())
    }
}

// Map operations cannot leave an LRU half-updated, so a poisoned shard is
// still consistent.
fn lock(shard: &Mutex<LruCache<Key, Entry>>) -> MutexGuard<'_, LruCache<Key, Entry>> {
    shard.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::IssueCode;
    use serde_json::Value as JsonValue;
    use std::sync::Arc;

    fn id(n: u8) -> ActionId {
        ActionId::from(format!("{:024x}", n))
    }

    fn failure(message: &str) -> InvocationOutcome {
        InvocationOutcome::ValidationFailure {
            issues: vec![Issue::new("title", IssueCode::TooSmall, message)],
        }
    }

    #[test]
    fn test_consume_is_single_use() {
        let channel = ResultChannel::default();
        let session = SessionKey::new("s1");
        channel.publish(id(1), session.clone(), failure("first"), FormFields::new());
        channel.publish(id(1), session.clone(), failure("second"), FormFields::new().with("title", "ab"));

        let state = channel.consume(&id(1), &session).unwrap();
        assert_eq!(state.issues()[0].message, "second");
        assert_eq!(state.field_text("title"), Some("ab"));
        assert!(channel.consume(&id(1), &session).is_none());
    }

    #[test]
    fn test_keys_are_isolated() {
        let channel = ResultChannel::default();
        channel.publish(id(1), SessionKey::new("a"), failure("a"), FormFields::new());

        assert!(channel.consume(&id(1), &SessionKey::new("b")).is_none());
        assert!(channel.consume(&id(2), &SessionKey::new("a")).is_none());
        assert!(channel.consume(&id(1), &SessionKey::new("a")).is_some());
    }

    #[test]
    fn test_expired_entries_are_absent() {
        let channel = ResultChannel::new(ChannelConfig {
            capacity: 16,
            ttl: Duration::ZERO,
        });
        let session = SessionKey::new("s1");
        channel.publish(id(1), session.clone(), failure("x"), FormFields::new());
        std::thread::sleep(Duration::from_millis(2));

        assert!(channel.consume(&id(1), &session).is_none());
    }

    #[test]
    fn test_purge_expired() {
        let channel = ResultChannel::new(ChannelConfig {
            capacity: 64,
            ttl: Duration::ZERO,
        });
        for n in 0..5 {
            channel.publish(id(n), SessionKey::new("s"), failure("x"), FormFields::new());
        }
        std::thread::sleep(Duration::from_millis(2));

        assert_eq!(channel.purge_expired(), 5);
        assert!(channel.is_empty());
    }

    #[test]
    fn test_capacity_is_bounded() {
        let channel = ResultChannel::new(ChannelConfig {
            capacity: 16,
            ttl: Duration::from_secs(60),
        });
        for n in 0..200u32 {
            channel.publish(
                ActionId::from(format!("{:024x}", n)),
                SessionKey::new("s"),
                failure("x"),
                FormFields::new(),
            );
        }
        assert!(channel.len() <= 16);
    }

    #[test]
    fn test_fault_message() {
        #[derive(Debug)]
        struct Oops;
        impl std::fmt::Display for Oops {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "oops")
            }
        }
        impl std::error::Error for Oops {}

        let channel = ResultChannel::default();
        let session = SessionKey::new("s");
        let outcome = InvocationOutcome::Fault(super::super::outcome::Fault::new("generic", Arc::new(Oops)));
        channel.publish(id(3), session.clone(), outcome, FormFields::new());

        let state = channel.consume(&id(3), &session).unwrap();
        assert_eq!(state.fault_message(), Some("generic"));
        assert!(state.issues().is_empty());

        let ok = ActionState {
            action_id: id(4),
            fields: FormFields::new(),
            outcome: InvocationOutcome::Success { value: JsonValue::Null },
        };
        assert_eq!(ok.fault_message(), None);
    }

    #[test]
    fn test_concurrent_sessions_get_their_own_state() {
        let channel = Arc::new(ResultChannel::default());

        let handles: Vec<_> = (0..8u8)
            .map(|worker| {
                let channel = Arc::clone(&channel);
                std::thread::spawn(move || {
                    for round in 0..100 {
                        let session = SessionKey::new(format!("w{}-r{}", worker, round));
                        let title = format!("{}:{}", worker, round);
                        channel.publish(
                            id(worker),
                            session.clone(),
                            failure(&title),
                            FormFields::new().with("title", title.clone()),
                        );

                        let state = channel.consume(&id(worker), &session).unwrap();
                        assert_eq!(state.action_id, id(worker));
                        assert_eq!(state.field_text("title"), Some(title.as_str()));
                        assert_eq!(state.issues()[0].message, title);
                        assert!(channel.consume(&id(worker), &session).is_none());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(channel.is_empty());
    }
}
