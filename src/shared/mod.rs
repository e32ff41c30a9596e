pub mod error;
pub mod macros;
pub mod structs;

pub use error::CommandError;
pub use structs::BuildingSnapshot;
pub use structs::CarId;
pub use structs::CarSnapshot;
pub use structs::Direction;
pub use structs::DoorState;
pub use structs::Floor;
pub use structs::FloorStop;
pub use structs::HallCall;
