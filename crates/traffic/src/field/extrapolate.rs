/// What a gridded field does with queries outside the sampled envelope.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Extrapolate {
    /// Evaluate past the edges (linear strategy only).
    Enable,
    /// Return this density instead.
    Fill(f64),
    /// Use the nearest point on the edge of the envelope.
    Clamp,
    /// Fail the query.
    #[default]
    Error,
}

impl From<Extrapolate> for ninterp::interpolator::Extrapolate<f64> {
    fn from(value: Extrapolate) -> Self {
        match value {
            Extrapolate::Enable => Self::Enable,
            Extrapolate::Fill(density) => Self::Fill(density),
            Extrapolate::Clamp => Self::Clamp,
            Extrapolate::Error => Self::Error,
        }
    }
}
