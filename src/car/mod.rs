pub mod controller;
pub mod stop_queue;

pub use controller::CarController;
pub use controller::CarEvent;
pub use controller::CarState;
pub use controller::StopOutcome;
pub use stop_queue::StopQueue;
