use thiserror::Error;

/// Errors reported by quadratic state matrix operations.
///
/// The variants split into two families: shape errors, raised when operand
/// dimensions are incompatible, and data errors, raised when operand values
/// are invalid for the requested operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QsError {
    #[error("shape mismatch in {operation}: {left:?} vs {right:?}")]
    ShapeMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("matrix with {rows} row and {cols} column qubits exceeds the limit of {max} per side")]
    TooLarge { rows: usize, cols: usize, max: usize },

    #[error("malformed payload: {0}")]
    BadPayload(&'static str),

    #[error("scalar is not representable as 2^(e/2) * zeta^p")]
    NotRepresentable,

    #[error("matrix is not invertible")]
    NotInvertible,

    #[error("controlled-not selectors overlap, the map would not be unitary")]
    NotUnitary,

    #[error("bit range error: {0}")]
    BitRange(&'static str),

    #[error("matrix has infinite order")]
    InfiniteOrder,

    #[error("no order found up to {0}")]
    OrderNotFound(usize),

    #[error("matrix is not a scalar multiple of a Pauli operator")]
    NotInPauliGroup,
}

impl QsError {
    pub fn shape_mismatch(
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    ) -> Self {
        QsError::ShapeMismatch {
            operation,
            left,
            right,
        }
    }

    /// Whether this is a dimension incompatibility.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            QsError::ShapeMismatch { .. } | QsError::TooLarge { .. }
        )
    }

    /// Whether this is an invalid-operand error other than a shape problem.
    pub fn is_data_error(&self) -> bool {
        !self.is_shape_error()
    }
}
