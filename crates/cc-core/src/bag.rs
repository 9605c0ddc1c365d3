//! Bag/queue model — §4.4.
//!
//! The bag is a 7-bit set of which piece kinds remain in the current
//! 7-bag; the queue is the ordered sequence of known upcoming pieces.

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use cold_clear_types::PieceKind;

/// Which of the seven piece kinds remain undrawn in the current bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bag {
    bits: u8,
}

const FULL_BAG: u8 = 0b0111_1111;

impl Bag {
    pub fn full() -> Self {
        Self { bits: FULL_BAG }
    }

    /// Build from a client-supplied 7-bit mask (`launch_with_board`'s
    /// `bag_bits`), masking off any bits above the low seven.
    pub fn from_bits(bits: u8) -> Self {
        Self { bits: bits & FULL_BAG }
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn contains(&self, kind: PieceKind) -> bool {
        self.bits & (1 << kind.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    fn remove(&mut self, kind: PieceKind) {
        self.bits &= !(1 << kind.index());
    }

    pub fn remaining(&self) -> ArrayVec<PieceKind, 7> {
        PieceKind::ALL
            .into_iter()
            .filter(|k| self.contains(*k))
            .collect()
    }

    /// Remove `kind` from the bag, refilling to a full bag first if `kind`
    /// is not currently present (or the bag is empty). Returns whether a
    /// refill happened.
    pub fn consume(&mut self, kind: PieceKind) -> bool {
        if self.is_empty() || !self.contains(kind) {
            *self = Self::full();
            self.remove(kind);
            true
        } else {
            self.remove(kind);
            false
        }
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::full()
    }
}

/// Outcome of appending a piece to the queue, for diagnostics/tests: did
/// the bag already contain the piece, or did a refill have to happen
/// first (§7, client-misuse policy: refill rather than reject).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Consumed,
    RefilledThenConsumed,
}

/// The ordered sequence of known upcoming pieces, plus the bag that feeds
/// it.
#[derive(Debug, Clone)]
pub struct Queue {
    pieces: VecDeque<PieceKind>,
    bag: Bag,
}

impl Queue {
    pub fn new(bag: Bag) -> Self {
        Self {
            pieces: VecDeque::new(),
            bag,
        }
    }

    pub fn bag(&self) -> Bag {
        self.bag
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn front(&self) -> Option<PieceKind> {
        self.pieces.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pieces.iter().copied()
    }

    /// Append a known piece. Under speculation the piece is expected to be
    /// in the current bag; per §7/§9(c) a mismatch never rejects the
    /// command — it refills the bag (consuming the piece from the fresh
    /// bag) so bag state stays a well-defined feed for chance-node
    /// expansion. Without speculation the bag is still kept in sync, just
    /// without the caller needing bag membership to hold.
    pub fn add(&mut self, piece: PieceKind) -> AddOutcome {
        let refilled = self.bag.consume(piece);
        self.pieces.push_back(piece);
        if refilled {
            AddOutcome::RefilledThenConsumed
        } else {
            AddOutcome::Consumed
        }
    }

    /// Pop the front piece, called when the root commits a move that
    /// consumes it.
    pub fn advance(&mut self) -> Option<PieceKind> {
        self.pieces.pop_front()
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consuming_present_piece_does_not_refill() {
        let mut bag = Bag::full();
        assert!(!bag.consume(PieceKind::T));
        assert!(!bag.contains(PieceKind::T));
        assert_eq!(bag.remaining().len(), 6);
    }

    #[test]
    fn consuming_absent_piece_refills_then_consumes() {
        let mut bag = Bag::full();
        bag.consume(PieceKind::T);
        // T is gone; consuming it again must refill first.
        assert!(bag.consume(PieceKind::T));
        let remaining = bag.remaining();
        assert_eq!(remaining.len(), 6);
        assert!(!remaining.contains(&PieceKind::T));
    }

    #[test]
    fn queue_add_and_advance_are_fifo() {
        let mut queue = Queue::new(Bag::full());
        queue.add(PieceKind::I);
        queue.add(PieceKind::O);
        assert_eq!(queue.advance(), Some(PieceKind::I));
        assert_eq!(queue.advance(), Some(PieceKind::O));
        assert_eq!(queue.advance(), None);
    }

    #[test]
    fn draining_a_bag_then_adding_mismatched_piece_refills() {
        let mut queue = Queue::new(Bag::full());
        for kind in PieceKind::ALL {
            queue.add(kind);
        }
        assert!(queue.bag().is_empty());

        let outcome = queue.add(PieceKind::T);
        assert_eq!(outcome, AddOutcome::RefilledThenConsumed);
        assert_eq!(queue.bag().remaining().len(), 6);
    }
}
