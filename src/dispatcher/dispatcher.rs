/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::car::{CarController, StopOutcome};
use crate::config::TimingConfig;
use crate::shared::{Direction, Floor, FloorStop, HallCall};

/**
 * Owns the building-wide hall-call set and binds each call to exactly one
 * car.
 *
 * A call is admitted once per (floor, direction) pair and assigned to the
 * car minimizing (|floor distance|, car id) among eligible cars: idle
 * cars, and cars whose sweep matches the requested direction with the
 * call floor still ahead on that sweep. Calls with no eligible car stay
 * pending and are re-evaluated on every tick and after every command.
 * Once a car has accepted a call into its stop queue it is never
 * reassigned.
 */
pub struct Dispatcher {
    // Private fields
    pending: Vec<HallCall>,
}

impl Dispatcher {
    pub fn new() -> Dispatcher {
        Dispatcher {
            pending: Vec::new(),
        }
    }

    /// Admits a hall call. Duplicate calls are idempotent; returns whether
    /// the call is new.
    pub fn request(&mut self, floor: Floor, direction: Direction) -> bool {
        if self
            .pending
            .iter()
            .any(|call| call.floor == floor && call.direction == direction)
        {
            info!("floor {} already requested {:?}", floor, direction);
            return false;
        }
        info!("hall call: floor {} going {:?}", floor, direction);
        self.pending.push(HallCall {
            floor,
            direction,
            assigned_to: None,
        });
        true
    }

    pub fn pending(&self) -> &[HallCall] {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Clears the pending call matched by a served stop. Cab stops carry
    /// direction `Idle` and match nothing.
    pub fn complete(&mut self, stop: FloorStop) {
        if stop.direction == Direction::Idle {
            return;
        }
        if let Some(pos) = self
            .pending
            .iter()
            .position(|call| call.floor == stop.floor && call.direction == stop.direction)
        {
            let call = self.pending.remove(pos);
            info!(
                "hall call served: floor {} going {:?} (car {:?})",
                call.floor, call.direction, call.assigned_to
            );
        }
    }

    /// One assignment pass over the unassigned calls. Calls landing on a
    /// car that is already at the floor with open doors are served in
    /// place and cleared immediately.
    pub fn reevaluate(&mut self, cars: &mut [CarController], timing: &TimingConfig) {
        let mut served = Vec::new();
        for (index, call) in self.pending.iter_mut().enumerate() {
            if call.assigned_to.is_some() {
                continue;
            }
            let best = match best_car(cars, call) {
                Some(best) => best,
                None => continue, // every car is busy moving away; retry next tick
            };
            let stop = FloorStop::hall(call.floor, call.direction);
            match cars[best].add_stop(stop, timing) {
                StopOutcome::Served => served.push(index),
                StopOutcome::Queued | StopOutcome::Duplicate => {
                    debug!(
                        "assigned call floor {} {:?} to car {}",
                        call.floor, call.direction, best
                    );
                    call.assigned_to = Some(cars[best].id());
                }
            }
        }
        for index in served.into_iter().rev() {
            let call = self.pending.remove(index);
            info!(
                "hall call served in place: floor {} going {:?}",
                call.floor, call.direction
            );
        }
    }
}

/// Index of the eligible car with the lowest (distance, id) cost, if any.
fn best_car(cars: &[CarController], call: &HallCall) -> Option<usize> {
    cars.iter()
        .enumerate()
        .filter_map(|(index, car)| cost(car, call).map(|cost| (cost, car.id(), index)))
        .min()
        .map(|(_, _, index)| index)
}

/// Eligibility and cost of one car for one call. `None` means the car
/// cannot take the call on its current sweep.
fn cost(car: &CarController, call: &HallCall) -> Option<i32> {
    let eligible = match car.sweep() {
        Direction::Idle => true,
        sweep if sweep == call.direction => {
            let ahead = match sweep {
                Direction::Up => call.floor > car.floor(),
                Direction::Down => call.floor < car.floor(),
                Direction::Idle => unreachable!(),
            };
            ahead || (call.floor == car.floor() && !car.is_moving())
        }
        _ => false,
    };
    eligible.then(|| (call.floor as i32 - car.floor() as i32).abs())
}
