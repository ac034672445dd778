use tokio::sync::RwLock;

/// Cached result of one read query.
///
/// Every fetch takes a ticket before it goes out. A result is kept only if
/// its ticket is newer than the one currently cached and was issued after
/// the last invalidation, so a slow response can never overwrite a newer
/// one or resurrect data from before a mutation.
pub struct QueryCache<T> {
    state: RwLock<CacheState<T>>,
}

struct CacheState<T> {
    value: Option<T>,
    issued: u64,
    applied: u64,
    floor: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl<T: Clone> QueryCache<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CacheState {
                value: None,
                issued: 0,
                applied: 0,
                floor: 0,
            }),
        }
    }

    pub async fn get(&self) -> Option<T> {
        self.state.read().await.value.clone()
    }

    pub async fn begin(&self) -> Ticket {
        let mut state = self.state.write().await;
        state.issued += 1;
        Ticket(state.issued)
    }

    /// Stores `value` if `ticket` is still current. Returns whether it was
    /// stored.
    pub async fn complete(&self, ticket: Ticket, value: T) -> bool {
        let mut state = self.state.write().await;
        if ticket.0 <= state.floor || ticket.0 <= state.applied {
            return false;
        }
        state.value = Some(value);
        state.applied = ticket.0;
        true
    }

    /// Drops the cached value and rejects every fetch already in flight.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.value = None;
        state.floor = state.issued;
    }
}

impl<T: Clone> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
