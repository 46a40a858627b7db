// =============================================================================
// Local Extrema
// =============================================================================
//
// A point is a local maximum when its price is strictly greater than every
// neighbour it has, and a local minimum when strictly less. Interior points
// have two neighbours, endpoints one. A lone point has none and is never an
// extremum. Equal neighbours never qualify.
// =============================================================================

use crate::types::Observation;

/// Which side of the price action to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremumKind {
    Min,
    Max,
}

impl ExtremumKind {
    /// Strict comparison of `current` against one neighbour.
    fn beats(self, current: f64, neighbour: f64) -> bool {
        match self {
            Self::Min => current < neighbour,
            Self::Max => current > neighbour,
        }
    }
}

/// Return the strict local extrema of `series` in their original order.
///
/// The returned observations are copies of the input ones, not yet windowed.
pub fn local_extrema(series: &[Observation], kind: ExtremumKind) -> Vec<Observation> {
    let mut set = Vec::new();

    for (i, obs) in series.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| series[j].price);
        let next = series.get(i + 1).map(|o| o.price);

        let is_extremum = match (prev, next) {
            (Some(p), Some(n)) => kind.beats(obs.price, p) && kind.beats(obs.price, n),
            (Some(p), None) => kind.beats(obs.price, p),
            (None, Some(n)) => kind.beats(obs.price, n),
            (None, None) => false,
        };

        if is_extremum {
            set.push(*obs);
        }
    }

    set
}
