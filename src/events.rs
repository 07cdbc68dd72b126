//! Finite sample spaces and the basic rules of probability.
//!
//! An [`EventSpace`] is a list of labelled elementary events whose
//! probabilities sum to one. Any subset of them is an [`Event`], and the
//! familiar rules follow from adding up elementary probabilities:
//!
//! | rule | formula |
//! |---|---|
//! | not A | P(¬A) = 1 − P(A) |
//! | A or B | P(A ∪ B) = P(A) + P(B) − P(A ∩ B) |
//! | A and B | P(A ∩ B) = P(A \| B) P(B) |
//!
//! # Examples
//! ```
//! use u_prob::events::EventSpace;
//!
//! let pants = EventSpace::new(vec![
//!     ("blue jeans", 0.5),
//!     ("grey jeans", 0.3),
//!     ("black jeans", 0.1),
//!     ("black suit", 0.0),
//!     ("blue tracksuit", 0.1),
//! ])
//! .unwrap();
//! let jeans = pants.event(&["blue jeans", "grey jeans", "black jeans"]).unwrap();
//! assert!((pants.probability(&jeans) - 0.9).abs() < 1e-12);
//! ```

use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;

use crate::error::{ProbError, Result};
use crate::random::WeightedSampler;

/// Largest allowed deviation of the elementary probabilities' sum from 1.
pub const TOTAL_PROBABILITY_TOLERANCE: f64 = 1e-9;

/// A set of elementary events drawn from one [`EventSpace`].
///
/// Holds positions into the space, so an event is only meaningful with the
/// space that created it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Event {
    members: BTreeSet<usize>,
}

impl Event {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Elementary {
    label: String,
    probability: f64,
}

/// Labelled elementary events with probabilities in `[0, 1]` summing to 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSpace {
    outcomes: Vec<Elementary>,
}

impl EventSpace {
    /// # Errors
    /// [`ProbError::InvalidParameter`] if the list is empty, a label
    /// repeats, a probability is outside `[0, 1]`, or the probabilities do
    /// not sum to 1 within [`TOTAL_PROBABILITY_TOLERANCE`].
    pub fn new<S: Into<String>>(outcomes: Vec<(S, f64)>) -> Result<Self> {
        if outcomes.is_empty() {
            return Err(ProbError::InvalidParameter(
                "sample space needs at least one elementary event".into(),
            ));
        }
        let mut seen = BTreeSet::new();
        let mut elementary = Vec::with_capacity(outcomes.len());
        for (label, probability) in outcomes {
            let label = label.into();
            if !(0.0..=1.0).contains(&probability) {
                return Err(ProbError::InvalidParameter(format!(
                    "P({label}) must be in [0, 1], got {probability}"
                )));
            }
            if !seen.insert(label.clone()) {
                return Err(ProbError::InvalidParameter(format!(
                    "duplicate elementary event '{label}'"
                )));
            }
            elementary.push(Elementary { label, probability });
        }
        let total: f64 = elementary.iter().map(|e| e.probability).sum();
        if (total - 1.0).abs() > TOTAL_PROBABILITY_TOLERANCE {
            return Err(ProbError::InvalidParameter(format!(
                "elementary probabilities must sum to 1, got {total}"
            )));
        }
        tracing::debug!(events = elementary.len(), "built sample space");
        Ok(Self {
            outcomes: elementary,
        })
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Elementary events in construction order.
    pub fn elementary(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.outcomes
            .iter()
            .map(|e| (e.label.as_str(), e.probability))
    }

    /// The event made of the named elementary events.
    ///
    /// # Errors
    /// [`ProbError::InvalidArgument`] for a label not in this space.
    pub fn event(&self, labels: &[&str]) -> Result<Event> {
        let members = labels
            .iter()
            .map(|label| {
                self.position(label).ok_or_else(|| {
                    ProbError::InvalidArgument(format!("unknown elementary event '{label}'"))
                })
            })
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Event { members })
    }

    /// The event containing every elementary event.
    pub fn certain(&self) -> Event {
        Event {
            members: (0..self.len()).collect(),
        }
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.outcomes.iter().position(|e| e.label == label)
    }

    /// Labels of the elementary events in `event`, in space order.
    pub fn labels<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a str> + 'a {
        event
            .members
            .iter()
            .filter_map(|&i| self.outcomes.get(i))
            .map(|e| e.label.as_str())
    }

    /// Sum of the elementary probabilities in `event`.
    pub fn probability(&self, event: &Event) -> f64 {
        event
            .members
            .iter()
            .filter_map(|&i| self.outcomes.get(i))
            .map(|e| e.probability)
            .sum::<f64>()
            .min(1.0)
    }

    pub fn complement(&self, event: &Event) -> Event {
        Event {
            members: (0..self.len())
                .filter(|i| !event.members.contains(i))
                .collect(),
        }
    }

    pub fn union(&self, a: &Event, b: &Event) -> Event {
        Event {
            members: a.members.union(&b.members).copied().collect(),
        }
    }

    pub fn intersection(&self, a: &Event, b: &Event) -> Event {
        Event {
            members: a.members.intersection(&b.members).copied().collect(),
        }
    }

    /// P(a | b) = P(a ∩ b) / P(b).
    ///
    /// # Errors
    /// [`ProbError::InvalidArgument`] if P(b) = 0.
    pub fn conditional(&self, a: &Event, b: &Event) -> Result<f64> {
        let pb = self.probability(b);
        if pb <= 0.0 {
            return Err(ProbError::InvalidArgument(
                "cannot condition on an event with probability 0".into(),
            ));
        }
        Ok((self.probability(&self.intersection(a, b)) / pb).min(1.0))
    }

    /// Draws `n` elementary events, returning their labels.
    ///
    /// Zero-probability events are never drawn.
    pub fn sample<'a, R: Rng + ?Sized>(&'a self, n: usize, rng: &mut R) -> Result<Vec<&'a str>> {
        let weights: Vec<f64> = self.outcomes.iter().map(|e| e.probability).collect();
        let sampler = WeightedSampler::new(&weights).ok_or_else(|| {
            ProbError::InvalidParameter("sample space has no positive probability".into())
        })?;
        Ok((0..n)
            .map(|_| self.outcomes[sampler.sample(&mut *rng)].label.as_str())
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
