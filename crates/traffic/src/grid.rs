use thiserror::Error;

/// Uniformly spaced road positions `x_min, x_min + dx, ..., x_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    x_min: f64,
    dx: f64,
    nodes: usize,
}

/// Errors that can occur when building a [`Grid`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GridError {
    #[error("grid spacing must be finite and positive, got {0}")]
    Spacing(f64),

    #[error("domain [{x_min}, {x_max}] must be finite with x_min < x_max")]
    Domain { x_min: f64, x_max: f64 },

    #[error("domain length {length} is not a whole number of {dx} steps")]
    Uneven { length: f64, dx: f64 },

    #[error("grid needs at least 3 nodes, got {0}")]
    TooFewNodes(usize),
}

impl Grid {
    /// Creates a grid covering `[x_min, x_max]` with spacing `dx`.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or non-finite, if `dx` does
    /// not divide the domain into whole steps, or if fewer than 3 nodes
    /// result.
    pub fn new(x_min: f64, x_max: f64, dx: f64) -> Result<Self, GridError> {
        if !dx.is_finite() || dx <= 0.0 {
            return Err(GridError::Spacing(dx));
        }
        if !x_min.is_finite() || !x_max.is_finite() || x_min >= x_max {
            return Err(GridError::Domain { x_min, x_max });
        }

        let length = x_max - x_min;
        let steps = (length / dx).round();
        if (steps * dx - length).abs() > 1e-9 * length {
            return Err(GridError::Uneven { length, dx });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nodes = steps as usize + 1;
        if nodes < 3 {
            return Err(GridError::TooFewNodes(nodes));
        }

        Ok(Self { x_min, dx, nodes })
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes
    }

    /// Always false: a grid has at least 3 nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the spacing between nodes.
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Returns the position of node `index`.
    #[must_use]
    pub fn position(&self, index: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let offset = index as f64 * self.dx;
        self.x_min + offset
    }

    /// Returns all node positions in order.
    #[must_use]
    pub fn positions(&self) -> Vec<f64> {
        (0..self.nodes).map(|i| self.position(i)).collect()
    }

    /// Density `value` strictly left of `front`, empty road from `front` on.
    #[must_use]
    pub fn step_profile(&self, front: f64, value: f64) -> Vec<f64> {
        (0..self.nodes)
            .map(|i| if self.position(i) < front { value } else { 0.0 })
            .collect()
    }
}
