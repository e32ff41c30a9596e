/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::SimConfig;
use crate::shared::{CarId, CommandError, Floor};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CallUp(Floor),
    CallDown(Floor),
    SelectFloor(CarId, Floor),
    OpenDoor(CarId),
    CloseDoor(CarId),
    Reset,
    Configure(SimConfig),
}

/***************************************/
/*             Public API              */
/***************************************/

/// Parses one line of console input against the fixed grammar:
///
/// ```text
/// call_up@F          call_down@F
/// select_floor@C#F   open_door@C   close_door@C
/// reset
/// ```
///
/// Tokens are case-sensitive, `@` and `#` are the only separators. Floor
/// and car bounds are checked against `config` here; parsing never touches
/// simulation state. `Configure` has no textual form, it arrives
/// structured from the settings dialog.
pub fn parse(input: &str, config: &SimConfig) -> Result<Command, CommandError> {
    let input = input.trim();

    let (verb, args) = match input.split_once('@') {
        Some((verb, args)) => (verb, Some(args)),
        None => (input, None),
    };

    match (verb, args) {
        ("reset", None) => Ok(Command::Reset),
        ("call_up", Some(args)) => Ok(Command::CallUp(parse_floor(args, config)?)),
        ("call_down", Some(args)) => Ok(Command::CallDown(parse_floor(args, config)?)),
        ("select_floor", Some(args)) => {
            let (car, floor) = args
                .split_once('#')
                .ok_or_else(|| CommandError::InvalidCommand(args.to_string()))?;
            Ok(Command::SelectFloor(
                parse_car(car, config)?,
                parse_floor(floor, config)?,
            ))
        }
        ("open_door", Some(args)) => Ok(Command::OpenDoor(parse_car(args, config)?)),
        ("close_door", Some(args)) => Ok(Command::CloseDoor(parse_car(args, config)?)),
        _ => Err(CommandError::InvalidCommand(input.to_string())),
    }
}

fn parse_floor(token: &str, config: &SimConfig) -> Result<Floor, CommandError> {
    let floor: Floor = token
        .parse()
        .map_err(|_| CommandError::InvalidCommand(token.to_string()))?;
    if !config.floor_in_range(floor) {
        return Err(CommandError::OutOfRangeFloor(floor));
    }
    Ok(floor)
}

fn parse_car(token: &str, config: &SimConfig) -> Result<CarId, CommandError> {
    let car: CarId = token
        .parse()
        .map_err(|_| CommandError::InvalidCommand(token.to_string()))?;
    if !config.car_in_range(car) {
        return Err(CommandError::InvalidCar(car));
    }
    Ok(car)
}
