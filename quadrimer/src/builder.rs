use crate::state::QStateMatrix;
use crate::QsResult;

/// Chains in-place updates on one owned matrix.
///
/// The value-level methods on [`QStateMatrix`] clone per call; a builder
/// threads a pipeline of gates and reductions through a single
/// representation and hands it back with [`finish`](StateBuilder::finish).
#[derive(Clone, Debug)]
pub struct StateBuilder {
    state: QStateMatrix,
}

impl StateBuilder {
    pub(crate) fn new(state: QStateMatrix) -> Self {
        StateBuilder { state }
    }

    pub fn gate_not(mut self, v: u64) -> Self {
        self.state.apply_not(v);
        self
    }

    pub fn gate_ctrl_not(mut self, vc: u64, v: u64) -> QsResult<Self> {
        self.state.apply_ctrl_not(vc, v)?;
        Ok(self)
    }

    pub fn gate_phi(mut self, v: u64, phi: i32) -> Self {
        self.state.apply_phi(v, phi);
        self
    }

    pub fn gate_ctrl_phi(mut self, v1: u64, v2: u64) -> Self {
        self.state.apply_ctrl_phi(v1, v2);
        self
    }

    pub fn gate_h(mut self, v: u64) -> Self {
        self.state.apply_h(v);
        self
    }

    /// Brings the representation to canonical reduced form.
    pub fn reduce(mut self) -> Self {
        self.state.reduce();
        self
    }

    pub fn finish(self) -> QStateMatrix {
        self.state
    }
}
