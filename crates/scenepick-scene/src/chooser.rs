//! Arbitration between candidate hits.
//!
//! Nodes are offered topmost first. Without depth testing the first node
//! offered wins and the search stops. With depth testing, later offers win
//! only when they are strictly nearer; an offer from a node without depth
//! testing still closes the search.

use scenepick_core::{Candidate, NodeId, PickResult};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Held {
    node: NodeId,
    candidate: Candidate,
    distance: f64,
}

/// Keeps the best hit seen so far during one pick.
#[derive(Debug, Clone, Default)]
pub struct PickResultChooser {
    held: Option<Held>,
    closed: bool,
}

impl PickResultChooser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a hit on `node` at `distance`.
    ///
    /// `has_depth_test` is true when the enclosing scene has a depth buffer
    /// and the node's effective depth test is enabled. Returns true if the
    /// offer replaced the held hit.
    pub fn offer(
        &mut self,
        node: NodeId,
        candidate: &Candidate,
        distance: f64,
        has_depth_test: bool,
    ) -> bool {
        if self.closed {
            return false;
        }
        let accepted = match &self.held {
            None => true,
            Some(held) => has_depth_test && distance < held.distance,
        };
        if accepted {
            self.held = Some(Held {
                node,
                candidate: *candidate,
                distance,
            });
        }
        if !has_depth_test {
            self.closed = true;
        }
        log::trace!(
            "offer {node} at {distance}: accepted={accepted} depth_test={has_depth_test} closed={}",
            self.closed
        );
        accepted
    }

    /// Returns true if an offer at `distance` could still be accepted.
    pub fn is_closer(&self, distance: f64) -> bool {
        !self.closed && self.held.map_or(true, |held| distance < held.distance)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_none()
    }

    /// Returns true once no further offer can be accepted.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The held node, candidate and distance.
    pub fn held(&self) -> Option<(NodeId, &Candidate, f64)> {
        self.held
            .as_ref()
            .map(|h| (h.node, &h.candidate, h.distance))
    }

    /// Converts the held hit into a result, or returns `miss` if nothing was hit.
    pub fn into_result(self, miss: PickResult) -> PickResult {
        match self.held {
            Some(held) => PickResult::hit(held.node, &held.candidate, held.distance),
            None => miss,
        }
    }
}
