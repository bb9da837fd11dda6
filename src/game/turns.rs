use crate::state::PlayerId;

/// Seating order of a room and the index of the player whose turn it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOrder {
    seats: Vec<PlayerId>,
    current: usize,
}

impl TurnOrder {
    pub fn push(&mut self, id: PlayerId) {
        self.seats.push(id);
    }

    /// Drops `id` from the order and returns the index it held. The pointer
    /// is shifted so it keeps naming the same player when someone seated
    /// before it leaves.
    pub fn remove(&mut self, id: &PlayerId) -> Option<usize> {
        let idx = self.seats.iter().position(|seat| seat == id)?;
        self.seats.remove(idx);
        if idx < self.current {
            self.current -= 1;
        }
        if self.current >= self.seats.len() {
            self.current = 0;
        }
        Some(idx)
    }

    /// Reverses seating and remaps the pointer onto the same player.
    pub fn reverse(&mut self) {
        if self.seats.is_empty() {
            return;
        }
        let len = self.seats.len();
        self.seats.reverse();
        self.current = (len - self.current - 1) % len;
    }

    /// Scans forward from the seat after the current one, wrapping around,
    /// for a player accepted by `eligible`. The current seat is checked last,
    /// so a lone eligible player keeps the turn.
    pub fn next_eligible(&self, eligible: impl Fn(&PlayerId) -> bool) -> Option<usize> {
        self.scan_from(self.current + 1, eligible)
    }

    /// Like `next_eligible` but starts at `start` itself.
    pub fn scan_from(&self, start: usize, eligible: impl Fn(&PlayerId) -> bool) -> Option<usize> {
        let len = self.seats.len();
        (0..len)
            .map(|step| (start + step) % len)
            .find(|idx| eligible(&self.seats[*idx]))
    }

    pub fn set_current(&mut self, idx: usize) {
        debug_assert!(idx < self.seats.len() || self.seats.is_empty());
        self.current = idx;
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&PlayerId> {
        self.seats.get(self.current)
    }

    pub fn is_current(&self, id: &PlayerId) -> bool {
        self.current() == Some(id)
    }

    pub fn seats(&self) -> &[PlayerId] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}
