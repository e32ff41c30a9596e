/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::debug;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::car::stop_queue::StopQueue;
use crate::config::TimingConfig;
use crate::shared::{CarId, CarSnapshot, CommandError, Direction, DoorState, Floor, FloorStop};

/**
 * Per-car motion/door state machine, advanced one tick at a time.
 *
 * Each state owns a tick countdown (`phase_ticks`): travelling one floor
 * costs `floor_travel_ticks`, moving the doors costs
 * `door_operation_ticks`, and open doors linger for `door_stay_ticks`
 * before closing. Durations are read from the configuration at every
 * phase entry, so timing changes apply from the next scheduled
 * transition. No transition straddles a tick boundary.
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarState {
    Idle,
    MovingUp,
    MovingDown,
    DoorOpening,
    DoorOpen,
    DoorClosing,
}

/// Observable events produced by one tick, consumed by the building for
/// dispatch re-evaluation and hall-call clearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarEvent {
    /// The car crossed a floor boundary.
    FloorReached(Floor),
    /// The doors reached fully open at a queued stop.
    StopServed(FloorStop),
    /// The stop queue drained and the car parked.
    BecameIdle,
}

/// What happened to a stop handed to `add_stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Accepted into the stop queue (or onto the in-progress door cycle).
    Queued,
    /// Served on the spot: the car is already at the floor with open
    /// doors, the stay timer was restarted.
    Served,
    /// Already queued; nothing to do.
    Duplicate,
}

pub struct CarController {
    // Private fields
    id: CarId,
    floor: Floor,
    state: CarState,
    stops: StopQueue,
    serving: Vec<FloorStop>,
    phase_ticks: u32,
}

impl CarController {
    pub fn new(id: CarId, floor: Floor) -> CarController {
        CarController {
            id,
            floor,
            state: CarState::Idle,
            stops: StopQueue::new(),
            serving: Vec::new(),
            phase_ticks: 0,
        }
    }

    /// Advances the state machine by one tick.
    pub fn tick(&mut self, timing: &TimingConfig) -> Vec<CarEvent> {
        let mut events = Vec::new();
        match self.state {
            CarState::Idle => self.depart(timing, &mut events),

            CarState::MovingUp | CarState::MovingDown => {
                self.phase_ticks -= 1;
                if self.phase_ticks == 0 {
                    self.floor += if self.state == CarState::MovingUp { 1 } else { -1 };
                    events.push(CarEvent::FloorReached(self.floor));
                    debug!("car {} reached floor {}", self.id, self.floor);
                    match self.stops.head() {
                        Some(stop) if stop.floor == self.floor => self.begin_opening(timing),
                        // Re-aim at the head: inserts may have moved it
                        Some(_) => self.depart(timing, &mut events),
                        None => {
                            self.state = CarState::Idle;
                            events.push(CarEvent::BecameIdle);
                        }
                    }
                }
            }

            CarState::DoorOpening => {
                self.phase_ticks -= 1;
                if self.phase_ticks == 0 {
                    self.state = CarState::DoorOpen;
                    self.phase_ticks = timing.door_stay_ticks;
                    debug!("car {} doors opened at floor {}", self.id, self.floor);
                    for stop in self.serving.drain(..) {
                        events.push(CarEvent::StopServed(stop));
                    }
                }
            }

            CarState::DoorOpen => {
                self.phase_ticks = self.phase_ticks.saturating_sub(1);
                if self.phase_ticks == 0 {
                    self.state = CarState::DoorClosing;
                    self.phase_ticks = timing.door_operation_ticks;
                }
            }

            CarState::DoorClosing => {
                self.phase_ticks -= 1;
                if self.phase_ticks == 0 {
                    debug!("car {} doors closed at floor {}", self.id, self.floor);
                    self.depart(timing, &mut events);
                }
            }
        }
        events
    }

    /// Accepts a destination, serving it in place when the car is already
    /// at the floor with its doors in motion or open (a reversal during
    /// `DoorClosing`, a stay-timer restart during `DoorOpen`).
    pub fn add_stop(&mut self, stop: FloorStop, timing: &TimingConfig) -> StopOutcome {
        if stop.floor == self.floor && self.serves_direction(stop.direction) {
            match self.state {
                CarState::DoorOpen => {
                    self.phase_ticks = timing.door_stay_ticks;
                    return StopOutcome::Served;
                }
                CarState::DoorClosing => {
                    self.state = CarState::DoorOpen;
                    self.phase_ticks = timing.door_stay_ticks;
                    debug!("car {} door close reversed by stop at {}", self.id, stop.floor);
                    return StopOutcome::Served;
                }
                CarState::DoorOpening => {
                    if !self.serving.contains(&stop) {
                        self.serving.push(stop);
                    }
                    return StopOutcome::Queued;
                }
                _ => {}
            }
        }

        let toward = if self.is_moving() && stop.floor == self.floor {
            // Mid-segment: the car has already left this floor
            self.direction().opposite()
        } else {
            Direction::between(self.floor, stop.floor)
        };
        if self.stops.insert(stop, toward) {
            debug!("car {} queued stop {:?}", self.id, stop);
            StopOutcome::Queued
        } else {
            StopOutcome::Duplicate
        }
    }

    /// `open_door` command. Restarts the stay timer when already open,
    /// reverses an in-flight close, and is rejected while moving.
    pub fn open_door(&mut self, timing: &TimingConfig) -> Result<(), CommandError> {
        match self.state {
            CarState::MovingUp | CarState::MovingDown => {
                Err(CommandError::IllegalDoorOperation(self.id))
            }
            CarState::DoorOpening => Ok(()),
            CarState::DoorOpen => {
                self.phase_ticks = timing.door_stay_ticks;
                Ok(())
            }
            CarState::DoorClosing => {
                self.state = CarState::DoorOpen;
                self.phase_ticks = timing.door_stay_ticks;
                debug!("car {} door close reversed by open_door", self.id);
                Ok(())
            }
            CarState::Idle => {
                self.state = CarState::DoorOpening;
                self.phase_ticks = timing.door_operation_ticks;
                Ok(())
            }
        }
    }

    /// `close_door` command. Closes open doors early; opening doors cannot
    /// be interrupted; rejected while moving.
    pub fn close_door(&mut self, timing: &TimingConfig) -> Result<(), CommandError> {
        match self.state {
            CarState::MovingUp | CarState::MovingDown => {
                Err(CommandError::IllegalDoorOperation(self.id))
            }
            CarState::DoorOpen => {
                self.state = CarState::DoorClosing;
                self.phase_ticks = timing.door_operation_ticks;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn state(&self) -> CarState {
        self.state
    }

    pub fn stops(&self) -> &StopQueue {
        &self.stops
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, CarState::MovingUp | CarState::MovingDown)
    }

    /// Direction of physical motion.
    pub fn direction(&self) -> Direction {
        match self.state {
            CarState::MovingUp => Direction::Up,
            CarState::MovingDown => Direction::Down,
            _ => Direction::Idle,
        }
    }

    /// Direction the car is committed to serving: the stop queue's sweep,
    /// `Idle` when nothing is queued (any call is then acceptable).
    pub fn sweep(&self) -> Direction {
        self.stops.sweep()
    }

    pub fn door_state(&self) -> DoorState {
        match self.state {
            CarState::DoorOpening => DoorState::Opening,
            CarState::DoorOpen => DoorState::Opened,
            CarState::DoorClosing => DoorState::Closing,
            _ => DoorState::Closed,
        }
    }

    pub fn snapshot(&self) -> CarSnapshot {
        CarSnapshot {
            id: self.id,
            current_floor: self.floor,
            direction: self.direction(),
            door_state: self.door_state(),
            stop_queue: self.stops.floors(),
        }
    }

    fn serves_direction(&self, requested: Direction) -> bool {
        requested == Direction::Idle
            || self.sweep() == Direction::Idle
            || requested == self.sweep()
    }

    /// Heads for the next queued stop, or parks.
    fn depart(&mut self, timing: &TimingConfig, events: &mut Vec<CarEvent>) {
        match self.stops.head() {
            None => {
                if self.state != CarState::Idle {
                    self.state = CarState::Idle;
                    events.push(CarEvent::BecameIdle);
                }
            }
            Some(stop) if stop.floor == self.floor => self.begin_opening(timing),
            Some(stop) => {
                self.state = if stop.floor > self.floor {
                    CarState::MovingUp
                } else {
                    CarState::MovingDown
                };
                self.phase_ticks = timing.floor_travel_ticks;
                debug!(
                    "car {} departing floor {} toward {}",
                    self.id, self.floor, stop.floor
                );
            }
        }
    }

    fn begin_opening(&mut self, timing: &TimingConfig) {
        // One opening serves every stop queued at this floor, so a hall
        // call and a cab selection for the same floor share a door cycle
        while let Some(head) = self.stops.head() {
            if head.floor != self.floor {
                break;
            }
            if let Some(stop) = self.stops.pop() {
                self.serving.push(stop);
            }
        }
        self.state = CarState::DoorOpening;
        self.phase_ticks = timing.door_operation_ticks;
    }
}
