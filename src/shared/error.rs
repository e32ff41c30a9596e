/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
use crate::shared::structs::{CarId, Floor};

/// Every way a command or configuration change can be rejected. All variants
/// are recoverable: the offending call fails, nothing else is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unrecognized command token '{0}'")]
    InvalidCommand(String),

    #[error("floor {0} is outside the building")]
    OutOfRangeFloor(Floor),

    #[error("no car with id {0}")]
    InvalidCar(CarId),

    #[error("door command rejected: car {0} is moving")]
    IllegalDoorOperation(CarId),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("changing the car count or floor range requires a reset")]
    RestartRequired,
}
