//! Line Item Ids

use uuid::Uuid;

use crate::cart::line_item::LineItemId;

/// Hands out ids for new line items.
pub trait IdAllocator {
    /// Allocate an id not handed out before.
    fn next_id(&mut self) -> LineItemId;

    /// Make sure ids already in use (e.g. from a restored cart) are never handed out again.
    fn reserve(&mut self, _used: LineItemId) {}
}

/// Monotonic counter ids, deterministic across runs.
///
/// Ids are UUIDs whose 128-bit value is the counter. Once the counter is
/// exhausted (e.g. after reserving `Uuid::max()`), ids fall back to UUID v7.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    last: u128,
}

impl SequentialIds {
    /// Start counting from one.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self) -> LineItemId {
        let Some(next) = self.last.checked_add(1) else {
            return LineItemId::from_uuid(Uuid::now_v7());
        };

        self.last = next;

        LineItemId::from_uuid(Uuid::from_u128(next))
    }

    fn reserve(&mut self, used: LineItemId) {
        self.last = self.last.max(used.into_uuid().as_u128());
    }
}

/// Time-ordered random ids (UUID v7).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdAllocator for RandomIds {
    fn next_id(&mut self) -> LineItemId {
        LineItemId::from_uuid(Uuid::now_v7())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new();

        assert_eq!(ids.next_id(), LineItemId::from_uuid(Uuid::from_u128(1)));
        assert_eq!(ids.next_id(), LineItemId::from_uuid(Uuid::from_u128(2)));
    }

    #[test]
    fn sequential_ids_skip_reserved() {
        let mut ids = SequentialIds::new();

        ids.reserve(LineItemId::from_uuid(Uuid::from_u128(7)));
        ids.reserve(LineItemId::from_uuid(Uuid::from_u128(3)));

        assert_eq!(ids.next_id(), LineItemId::from_uuid(Uuid::from_u128(8)));
    }

    #[test]
    fn exhausted_counter_still_hands_out_distinct_ids() {
        let mut ids = SequentialIds::new();
        let max = LineItemId::from_uuid(Uuid::max());

        ids.reserve(max);

        let first = ids.next_id();
        let second = ids.next_id();

        assert_ne!(first, max);
        assert_ne!(second, max);
        assert_ne!(first, second);
    }

    #[test]
    fn random_ids_are_distinct() {
        let mut ids = RandomIds;

        assert_ne!(ids.next_id(), ids.next_id());
    }
}
