/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;

/***************************************/
/*       Public data structures        */
/***************************************/
pub type Floor = i16;
pub type CarId = usize;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match *self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }

    /// Direction of travel from one floor to another, `Idle` when equal.
    pub fn between(from: Floor, to: Floor) -> Direction {
        match from.cmp(&to) {
            std::cmp::Ordering::Less => Direction::Up,
            std::cmp::Ordering::Greater => Direction::Down,
            std::cmp::Ordering::Equal => Direction::Idle,
        }
    }

    /// Signed ordering value used by the stop queue sort keys.
    pub fn value(&self) -> i32 {
        match *self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Idle => 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    Closed,
    Opening,
    Opened,
    Closing,
}

/// One entry in a car's stop queue. `direction` is the requested travel
/// direction after arrival: `Up`/`Down` for hall calls, `Idle` for floors
/// selected from inside the car.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorStop {
    pub floor: Floor,
    pub direction: Direction,
}

impl FloorStop {
    pub fn cab(floor: Floor) -> FloorStop {
        FloorStop {
            floor,
            direction: Direction::Idle,
        }
    }

    pub fn hall(floor: Floor, direction: Direction) -> FloorStop {
        FloorStop { floor, direction }
    }
}

/// A pending request from a floor, unique per (floor, direction).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HallCall {
    pub floor: Floor,
    pub direction: Direction,
    pub assigned_to: Option<CarId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarSnapshot {
    pub id: CarId,
    pub current_floor: Floor,
    pub direction: Direction,
    pub door_state: DoorState,
    pub stop_queue: Vec<Floor>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildingSnapshot {
    pub tick: u64,
    pub cars: Vec<CarSnapshot>,
    pub hall_calls: Vec<HallCall>,
}
