//! Seating plan: which two resources each actor needs and in which order it
//! asks for them.
//!
//! Actor `i` sits between resource `i` (its left) and resource `(i + 1) % N`
//! (its right). If every actor reached left-first, each could hold its left
//! resource while waiting on its right one, closing a cycle around the whole
//! ring. A circular wait in a ring needs every actor to lead with the same
//! hand, so a plan in which at least one actor leads with the other hand
//! cannot deadlock. [`validate_plan`] enforces exactly that.

use crate::config::ConfigError;
use crate::framework::ResourceRing;
use crate::model::{ActorId, ResourceIndex};
use serde::{Deserialize, Serialize};

/// Which neighbour an actor reaches for first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

/// How lead hands are assigned around the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Actor `N - 1` leads right, everyone else leads left.
    ///
    /// Every actor then takes its lower-numbered resource first.
    #[default]
    SingleReversal,
    /// Even actors lead left, odd actors lead right.
    Alternating,
}

impl OrderPolicy {
    pub fn lead_for(self, actor: usize, actors: usize) -> Hand {
        match self {
            OrderPolicy::SingleReversal if actor + 1 == actors => Hand::Right,
            OrderPolicy::SingleReversal => Hand::Left,
            OrderPolicy::Alternating if actor % 2 == 0 => Hand::Left,
            OrderPolicy::Alternating => Hand::Right,
        }
    }
}

/// One actor's place at the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    pub actor: ActorId,
    pub left: ResourceIndex,
    pub right: ResourceIndex,
    pub lead: Hand,
}

impl Seat {
    pub fn first(&self) -> ResourceIndex {
        match self.lead {
            Hand::Left => self.left,
            Hand::Right => self.right,
        }
    }

    pub fn second(&self) -> ResourceIndex {
        match self.lead {
            Hand::Left => self.right,
            Hand::Right => self.left,
        }
    }
}

/// Seats one actor per resource of `ring`, with lead hands from `policy`.
pub fn seat_plan(ring: &ResourceRing, policy: OrderPolicy) -> Result<Vec<Seat>, ConfigError> {
    let actors = ring.len();
    let seats = (0..actors)
        .map(|i| {
            Ok(Seat {
                actor: ActorId(i),
                left: ring.index(i)?,
                right: ring.index((i + 1) % actors)?,
                lead: policy.lead_for(i, actors),
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    validate_plan(ring, &seats)?;
    Ok(seats)
}

/// Checks a plan against the ring topology and the ordering rule.
///
/// Seat `i` must be actor `i`, its resources must be slots `i` and
/// `(i + 1) % N` of this ring, and the lead hands must not all agree.
pub fn validate_plan(ring: &ResourceRing, seats: &[Seat]) -> Result<(), ConfigError> {
    let actors = ring.len();
    if seats.len() != actors {
        return Err(ConfigError::MalformedTopology(format!(
            "{} seats for a ring of {} resources",
            seats.len(),
            actors
        )));
    }

    for (i, seat) in seats.iter().enumerate() {
        ring.index(seat.left.get())?;
        ring.index(seat.right.get())?;
        if seat.actor != ActorId(i)
            || seat.left.get() != i
            || seat.right.get() != (i + 1) % actors
        {
            return Err(ConfigError::MalformedTopology(format!(
                "seat {i} holds {} between {} and {}",
                seat.actor, seat.left, seat.right
            )));
        }
    }

    let lead = seats[0].lead;
    if seats.iter().all(|seat| seat.lead == lead) {
        return Err(ConfigError::UniformOrder);
    }
    Ok(())
}
