/// An event stamped with its position in the emission sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped<E> {
    pub seq: u64,
    pub event: E,
}

/// Ordered, typed event log.
///
/// Producers push events as they happen; a consumer (usually the render layer) drains them
/// once per frame. Sequence numbers keep increasing across drains.
#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    events: Vec<Stamped<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            events: Vec::new(),
        }
    }

    /// Records `event` and returns its sequence number.
    pub fn emit(&mut self, event: E) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Stamped { seq, event });
        seq
    }

    pub fn events(&self) -> &[Stamped<E>] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Stamped<E>> {
        std::mem::take(&mut self.events)
    }
}
