//! Load-linked / store-conditional reservation.
//!
//! The core holds at most one reservation: the word address of the last `LL`. `SC`
//! succeeds only if the reservation is still held for the same word, and consumes it
//! either way. Exception dispatch clears the reservation.

use super::unaligned::word_base;

/// Single-address reservation register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reservation(Option<u64>);

impl Reservation {
    /// Records a reservation on the word containing `addr`.
    #[inline]
    pub fn acquire(&mut self, addr: u64) {
        self.0 = Some(word_base(addr));
    }

    /// Drops any reservation.
    #[inline]
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Currently reserved word address, if any.
    #[inline]
    pub const fn address(&self) -> Option<u64> {
        self.0
    }

    /// Checks and consumes the reservation for a store-conditional to `addr`.
    ///
    /// Returns `true` if the store must be performed.
    pub fn try_commit(&mut self, addr: u64) -> bool {
        let held = self.0 == Some(word_base(addr));
        self.0 = None;
        held
    }
}
