//! Reversal records for hypergraph contractions.

use hypar_core::{HyperedgeId, HyperedgeWeight, HypernodeId, HypernodeWeight};

/// One primitive mutation performed during a contraction.
///
/// Fixups are recorded in execution order; [`crate::Hypergraph::uncontract`]
/// replays their inverses in reverse order, which restores the incidence and
/// pin arrays to their exact prior layout (the swap positions are part of
/// the record).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixup {
    /// The contracted vertex was swap-removed from `edge`'s live pin prefix;
    /// `pos` is the slot it occupied before the swap.
    PinRemoved {
        /// Hyperedge whose pin list shrank.
        edge: HyperedgeId,
        /// Slot of the removed pin before the swap-to-tail.
        pos: usize,
    },
    /// The contracted vertex's pin entry in `edge` was overwritten in place
    /// with the representative.
    PinReplaced {
        /// Hyperedge whose pin entry was substituted.
        edge: HyperedgeId,
        /// Slot of the substituted pin.
        pos: usize,
    },
    /// `edge` was appended to the live incidence prefix of `node`.
    IncidenceAppended {
        /// Hypernode whose incidence list grew.
        node: HypernodeId,
        /// The appended hyperedge.
        edge: HyperedgeId,
    },
    /// `edge` was swap-removed from the live incidence prefix of `node`;
    /// `pos` is the slot it occupied before the swap.
    IncidenceRemoved {
        /// Hypernode whose incidence list shrank.
        node: HypernodeId,
        /// The removed hyperedge.
        edge: HyperedgeId,
        /// Slot of the removed entry before the swap-to-tail.
        pos: usize,
    },
    /// `edge` was disabled (single-pin or folded parallel hyperedge).
    EdgeDisabled {
        /// The disabled hyperedge.
        edge: HyperedgeId,
    },
    /// The weight of a folded parallel hyperedge was added onto its
    /// representative.
    EdgeWeightAdded {
        /// The representative that absorbed the weight.
        representative: HyperedgeId,
        /// Amount to subtract again on uncontraction.
        amount: HyperedgeWeight,
    },
}

/// Everything required to invert one contraction `u <- v`.
#[derive(Debug, Clone)]
pub struct ContractionMemento {
    /// Representative vertex that absorbed the partner.
    pub u: HypernodeId,
    /// Contracted partner, disabled by the contraction.
    pub v: HypernodeId,
    /// Weight of `v` at contraction time; `u` gained exactly this much.
    pub v_weight: HypernodeWeight,
    /// Ordered log of the primitive mutations.
    pub fixups: Vec<Fixup>,
}
