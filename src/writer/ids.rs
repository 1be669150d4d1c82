//! Sources for the per-component `Uuid` property of the form file.

use uuid::Uuid;

/// Hands out component identifiers. Swap in `SequentialIds` to make
/// archives reproducible.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random decimal identifiers below one billion.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        (Uuid::new_v4().as_u128() % 1_000_000_000).to_string()
    }
}

/// `start`, `start + 1`, …
#[derive(Debug, Clone, Copy)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::starting_at(41);
        assert_eq!(ids.next_id(), "41");
        assert_eq!(ids.next_id(), "42");
    }

    #[test]
    fn random_ids_are_decimal_and_bounded() {
        let mut ids = RandomIds;
        for _ in 0..32 {
            let id: u64 = ids.next_id().parse().expect("decimal id");
            assert!(id < 1_000_000_000);
        }
    }
}
