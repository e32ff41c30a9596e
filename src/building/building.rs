/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{info, warn};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::car::{CarController, CarEvent, StopOutcome};
use crate::command::Command;
use crate::config::SimConfig;
use crate::dispatcher::Dispatcher;
use crate::shared::{BuildingSnapshot, CarId, CommandError, Direction, Floor, FloorStop};

/**
 * The whole simulated building: every car controller, the dispatcher,
 * the active configuration and the state publisher.
 *
 * External collaborators drive it through three calls: `execute` applies
 * one parsed command, `tick` advances simulated time by one unit, and
 * `snapshot` materializes the read-only view the GUI renders. The core is
 * single-threaded; the driver queues commands between ticks and applies
 * them in arrival order at the tick boundary.
 */
pub struct Building {
    // Private fields
    config: SimConfig,
    cars: Vec<CarController>,
    dispatcher: Dispatcher,
    publisher: StatePublisher,
    tick_count: u64,
}

impl Building {
    pub fn new(config: SimConfig) -> Result<Building, CommandError> {
        config.validate()?;
        let cars = make_cars(&config);
        Ok(Building {
            config,
            cars,
            dispatcher: Dispatcher::new(),
            publisher: StatePublisher::new(),
            tick_count: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Applies one command. Errors are local to the call: nothing is
    /// mutated on failure and the simulation keeps running.
    pub fn execute(&mut self, command: Command) -> Result<(), CommandError> {
        let timing = self.config.timing;
        match command {
            Command::CallUp(floor) => self.call(floor, Direction::Up)?,
            Command::CallDown(floor) => self.call(floor, Direction::Down)?,
            Command::SelectFloor(car, floor) => {
                if !self.config.floor_in_range(floor) {
                    return Err(CommandError::OutOfRangeFloor(floor));
                }
                let outcome = self.car_mut(car)?.add_stop(FloorStop::cab(floor), &timing);
                if outcome == StopOutcome::Duplicate {
                    info!("floor {} already selected for car {}", floor, car);
                }
                self.dispatcher.reevaluate(&mut self.cars, &timing);
            }
            Command::OpenDoor(car) => {
                self.car_mut(car)?.open_door(&timing)?;
                self.dispatcher.reevaluate(&mut self.cars, &timing);
            }
            Command::CloseDoor(car) => {
                self.car_mut(car)?.close_door(&timing)?;
                self.dispatcher.reevaluate(&mut self.cars, &timing);
            }
            Command::Reset => self.reset(),
            Command::Configure(new) => self.config.apply_update(new)?,
        }
        self.publish();
        Ok(())
    }

    /// Advances simulated time by one unit: every car steps once, served
    /// stops clear their hall calls, then one dispatch re-evaluation pass
    /// runs and a snapshot is published.
    pub fn tick(&mut self) {
        self.tick_count += 1;
        let timing = self.config.timing;

        let mut events = Vec::new();
        for car in &mut self.cars {
            events.extend(car.tick(&timing));
        }
        for event in events {
            if let CarEvent::StopServed(stop) = event {
                self.dispatcher.complete(stop);
            }
        }

        self.dispatcher.reevaluate(&mut self.cars, &timing);
        self.publish();
    }

    pub fn snapshot(&self) -> BuildingSnapshot {
        BuildingSnapshot {
            tick: self.tick_count,
            cars: self.cars.iter().map(|car| car.snapshot()).collect(),
            hall_calls: self.dispatcher.pending().to_vec(),
        }
    }

    /// Registers an observer; it receives a snapshot after every tick and
    /// every state-changing command.
    pub fn subscribe(&mut self) -> cbc::Receiver<BuildingSnapshot> {
        self.publisher.subscribe()
    }

    /// The settings-dialog path for restart-sensitive changes: swaps in a
    /// new configuration and rebuilds the building in one step. Plain
    /// `Configure` rejects car-count and floor-range changes with
    /// `RestartRequired`; this is the accompanying reset.
    pub fn apply_config_and_reset(&mut self, new: SimConfig) -> Result<(), CommandError> {
        new.validate()?;
        self.config = new;
        self.reset();
        self.publish();
        Ok(())
    }

    /// Tears everything down: fresh cars at the bottom floor, idle with
    /// closed doors, and an empty hall-call set.
    fn reset(&mut self) {
        self.cars = make_cars(&self.config);
        self.dispatcher.clear();
        info!("building reset: {} cars", self.config.building.car_count);
    }

    fn call(&mut self, floor: Floor, direction: Direction) -> Result<(), CommandError> {
        if !self.config.floor_in_range(floor) {
            return Err(CommandError::OutOfRangeFloor(floor));
        }
        if self.dispatcher.request(floor, direction) {
            // assignment is re-evaluated on call arrival
            self.dispatcher.reevaluate(&mut self.cars, &self.config.timing);
        }
        Ok(())
    }

    fn car_mut(&mut self, car: CarId) -> Result<&mut CarController, CommandError> {
        self.cars.get_mut(car).ok_or(CommandError::InvalidCar(car))
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.publisher.publish(snapshot);
    }
}

fn make_cars(config: &SimConfig) -> Vec<CarController> {
    (0..config.building.car_count)
        .map(|id| CarController::new(id, config.building.min_floor))
        .collect()
}

/// Fans immutable snapshots out to observers over crossbeam channels.
/// Observers that went away are pruned on the next publish.
pub struct StatePublisher {
    subscribers: Vec<cbc::Sender<BuildingSnapshot>>,
}

impl StatePublisher {
    pub fn new() -> StatePublisher {
        StatePublisher {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> cbc::Receiver<BuildingSnapshot> {
        let (tx, rx) = cbc::unbounded::<BuildingSnapshot>();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, snapshot: BuildingSnapshot) {
        if self.subscribers.is_empty() {
            return;
        }
        let before = self.subscribers.len();
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
        if self.subscribers.len() < before {
            warn!("dropped {} disconnected observer(s)", before - self.subscribers.len());
        }
    }
}
