// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Call-Site Registry.
//!
//! Bookkeeping for one instrumented driver object lives here, keyed by the
//! object's [`InstanceId`], never on the driver object itself. Entries hold a
//! weak reference to their instance and are purged once it is dropped.
//!
//! Closures passed to [`CallSiteRegistry::with_state`] run under a shard lock
//! and must not call out to collaborators or the transport.

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::driver::Instance;
use crate::engine_core::constants::call_state::PURGE_THRESHOLD;
use crate::engine_core::models::{CapturedPayload, SecurityEvent};
use crate::engine_core::types::InstanceId;

/// State shared by every call made on one instance.
#[derive(Debug, Default)]
pub struct CallSiteState {
    /// A payload has been captured for this instance
    pub captured: bool,
    pub payload: Option<Arc<CapturedPayload>>,
    /// Execution id of the last enter event sent for this instance
    pub last_execution_id: Option<String>,
    /// Enter events of calls still awaiting completion
    pub in_flight: Vec<Arc<SecurityEvent>>,
}

struct Slot {
    owner: Weak<Instance>,
    state: CallSiteState,
}

pub struct CallSiteRegistry {
    slots: DashMap<InstanceId, Slot>,
    /// Size at which the next new entry triggers a purge
    purge_at: AtomicUsize,
}

impl Default for CallSiteRegistry {
    fn default() -> Self {
        Self {
            slots: DashMap::new(),
            purge_at: AtomicUsize::new(PURGE_THRESHOLD),
        }
    }
}

impl CallSiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` on the state of `instance`, creating it on first use.
    pub fn with_state<R>(
        &self,
        instance: &Arc<Instance>,
        f: impl FnOnce(&mut CallSiteState) -> R,
    ) -> R {
        if !self.slots.contains_key(&instance.id())
            && self.slots.len() >= self.purge_at.load(Ordering::Relaxed)
        {
            self.purge();
            let live = self.slots.len();
            self.purge_at.store(PURGE_THRESHOLD.max(live * 2), Ordering::Relaxed);
        }
        let mut slot = self.slots.entry(instance.id()).or_insert_with(|| Slot {
            owner: Arc::downgrade(instance),
            state: CallSiteState::default(),
        });
        f(&mut slot.state)
    }

    /// Run `f` on existing state only. Returns `None` if the instance was never
    /// seen or has been reclaimed.
    pub fn with_existing<R>(
        &self,
        id: InstanceId,
        f: impl FnOnce(&mut CallSiteState) -> R,
    ) -> Option<R> {
        let mut slot = self.slots.get_mut(&id)?;
        if slot.owner.strong_count() == 0 {
            drop(slot);
            self.slots.remove(&id);
            return None;
        }
        Some(f(&mut slot.state))
    }

    /// Drop entries whose instance no longer exists.
    pub fn purge(&self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.owner.strong_count() > 0);
        let purged = before.saturating_sub(self.slots.len());
        if purged > 0 {
            debug!(purged, "Purged call-site state of reclaimed instances");
        }
        purged
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
