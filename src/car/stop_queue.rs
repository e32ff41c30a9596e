/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, Floor, FloorStop};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chain {
    Current,
    Next,
    Future,
}

/// Scan-ordered destination queue (collective control).
///
/// Stops are held in three chains: `current` holds the stops served on the
/// present sweep in travel order, `next` holds opposite-direction stops,
/// and `future` holds same-direction stops the car has already passed.
/// When `current` drains the chains rotate and the sweep direction flips,
/// so the car finishes every stop in its direction of travel before
/// reversing and no stop is ever skipped mid-sweep.
#[derive(Debug, Clone, Default)]
pub struct StopQueue {
    sweep: Option<Direction>,
    current: Vec<FloorStop>,
    next: Vec<FloorStop>,
    future: Vec<FloorStop>,
}

impl StopQueue {
    pub fn new() -> StopQueue {
        StopQueue {
            sweep: None,
            current: Vec::new(),
            next: Vec::new(),
            future: Vec::new(),
        }
    }

    /// Sweep direction of the current chain, `Idle` when the queue is empty.
    pub fn sweep(&self) -> Direction {
        match self.sweep {
            Some(direction) if !self.is_empty() => direction,
            _ => Direction::Idle,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.next.is_empty() && self.future.is_empty()
    }

    pub fn len(&self) -> usize {
        self.current.len() + self.next.len() + self.future.len()
    }

    pub fn contains(&self, stop: &FloorStop) -> bool {
        self.current.contains(stop) || self.next.contains(stop) || self.future.contains(stop)
    }

    /// Next stop the car is heading for.
    pub fn head(&self) -> Option<FloorStop> {
        self.current.first().copied()
    }

    /// All queued floors in planned travel order, for snapshots.
    pub fn floors(&self) -> Vec<Floor> {
        self.current
            .iter()
            .chain(self.next.iter())
            .chain(self.future.iter())
            .map(|stop| stop.floor)
            .collect()
    }

    /// Inserts a stop, routing it onto the right chain. `toward` is the
    /// travel direction from the car's position to the stop (`Idle` when
    /// at the same floor). Duplicate (floor, direction) pairs are
    /// rejected; returns whether the stop was inserted.
    pub fn insert(&mut self, stop: FloorStop, toward: Direction) -> bool {
        if self.contains(&stop) {
            return false;
        }

        let chain = match self.sweep() {
            Direction::Idle => {
                let sweep = if stop.direction != Direction::Idle {
                    stop.direction
                } else {
                    toward
                };
                // A cab stop at the car's own floor fixes no direction;
                // the sweep stays unset until a directional stop arrives
                if sweep != Direction::Idle {
                    self.sweep = Some(sweep);
                }
                Chain::Current
            }
            sweep if stop.direction == Direction::Idle => {
                // Cab selection: serve it on this sweep if it is still ahead
                if toward == sweep || toward == Direction::Idle {
                    Chain::Current
                } else {
                    Chain::Next
                }
            }
            sweep if stop.direction == sweep => {
                if toward == sweep || toward == Direction::Idle {
                    Chain::Current
                } else {
                    // Same requested direction, but the floor has been
                    // passed: it belongs to the sweep after next
                    Chain::Future
                }
            }
            _ => Chain::Next,
        };

        self.insert_sorted(chain, stop);
        true
    }

    /// Removes and returns the head of the current chain, rotating chains
    /// (and flipping the sweep) whenever it drains.
    pub fn pop(&mut self) -> Option<FloorStop> {
        if self.current.is_empty() {
            return None;
        }
        let stop = self.current.remove(0);
        if self.current.is_empty() {
            if self.next.is_empty() && self.future.is_empty() {
                self.sweep = None;
            } else {
                while self.current.is_empty() {
                    self.rotate();
                }
            }
        }
        Some(stop)
    }

    pub fn clear(&mut self) {
        self.sweep = None;
        self.current.clear();
        self.next.clear();
        self.future.clear();
    }

    fn rotate(&mut self) {
        self.sweep = self.sweep.map(|d| d.opposite());
        self.current = std::mem::take(&mut self.next);
        self.next = std::mem::take(&mut self.future);
    }

    fn insert_sorted(&mut self, chain: Chain, stop: FloorStop) {
        let direction = match chain {
            Chain::Current | Chain::Future => self.sweep(),
            Chain::Next => self.sweep().opposite(),
        };
        let chain = match chain {
            Chain::Current => &mut self.current,
            Chain::Next => &mut self.next,
            Chain::Future => &mut self.future,
        };
        let pos = chain.partition_point(|s| sort_key(s, direction) <= sort_key(&stop, direction));
        chain.insert(pos, stop);
    }
}

/// Ordering within a chain: ascending floors on an up sweep, descending on
/// a down sweep, with the requested direction as a secondary key so a cab
/// stop at a floor is served before a reversed hall stop at the same floor.
fn sort_key(stop: &FloorStop, direction: Direction) -> (i32, i32) {
    match direction {
        Direction::Down => (-(stop.floor as i32), -stop.direction.value()),
        _ => (stop.floor as i32, stop.direction.value()),
    }
}
