use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Product ids with a cart change currently on the wire.
#[derive(Debug, Clone, Default)]
pub struct InFlightSet {
    ids: Arc<Mutex<HashSet<i64>>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<i64>> {
        self.ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks `id` busy until the returned guard is dropped. `None` if it is
    /// already marked.
    pub fn try_acquire(&self, id: i64) -> Option<InFlightGuard> {
        if self.lock().insert(id) {
            Some(InFlightGuard {
                set: self.clone(),
                id,
            })
        } else {
            None
        }
    }

    pub fn is_busy(&self, id: i64) -> bool {
        self.lock().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    set: InFlightSet,
    id: i64,
}

impl InFlightGuard {
    pub fn id(&self) -> i64 {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.id);
    }
}
