/*
 * Unit tests for the building core
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod building_tests {
    use crate::building::Building;
    use crate::command::{parse, Command};
    use crate::config::{BuildingConfig, SimConfig, TimingConfig};
    use crate::shared::{CommandError, DoorState};

    fn config(cars: usize, min: i16, max: i16) -> SimConfig {
        SimConfig {
            building: BuildingConfig {
                car_count: cars,
                min_floor: min,
                max_floor: max,
            },
            timing: TimingConfig {
                floor_travel_ticks: 1,
                door_operation_ticks: 1,
                door_stay_ticks: 1,
            },
        }
    }

    fn building(cars: usize, min: i16, max: i16) -> Building {
        Building::new(config(cars, min, max)).unwrap()
    }

    /// Ticks until a car stands at `floor` with open doors.
    fn run_until_open_at(building: &mut Building, floor: i16) {
        for _ in 0..50 {
            building.tick();
            let snapshot = building.snapshot();
            if snapshot
                .cars
                .iter()
                .any(|car| car.current_floor == floor && car.door_state == DoorState::Opened)
            {
                return;
            }
        }
        panic!("no car opened its doors at floor {}", floor);
    }

    #[test]
    fn test_invalid_configuration_is_rejected_at_construction() {
        // Arrange
        let config = config(0, 0, 3);

        // Act
        let result = Building::new(config);

        // Assert
        assert!(matches!(
            result,
            Err(CommandError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_cars_start_idle_at_the_bottom_floor() {
        // Arrange & Act
        let building = building(3, -1, 3);
        let snapshot = building.snapshot();

        // Assert
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.cars.len(), 3);
        for (id, car) in snapshot.cars.iter().enumerate() {
            assert_eq!(car.id, id);
            assert_eq!(car.current_floor, -1);
            assert_eq!(car.door_state, DoorState::Closed);
            assert!(car.stop_queue.is_empty());
        }
        assert!(snapshot.hall_calls.is_empty());
    }

    #[test]
    fn test_hall_call_is_served_and_cleared() {
        // Arrange: one car at floor 0
        let mut building = building(1, 0, 3);
        let command = parse("call_up@2", building.config()).unwrap();

        // Act
        building.execute(command).unwrap();
        assert_eq!(building.snapshot().hall_calls.len(), 1);
        run_until_open_at(&mut building, 2);

        // Assert
        let snapshot = building.snapshot();
        assert!(snapshot.hall_calls.is_empty());
        assert_eq!(snapshot.cars[0].current_floor, 2);
        assert_eq!(snapshot.cars[0].door_state, DoorState::Opened);
    }

    #[test]
    fn test_select_at_the_served_floor_is_a_no_op() {
        // Arrange: car standing at floor 2 with open doors
        let mut building = building(1, 0, 3);
        building.execute(Command::CallUp(2)).unwrap();
        run_until_open_at(&mut building, 2);

        // Act: the passenger selects the floor they are already at
        let command = parse("select_floor@0#2", building.config()).unwrap();
        building.execute(command).unwrap();

        // Assert: nothing queued, doors still open
        let snapshot = building.snapshot();
        assert!(snapshot.cars[0].stop_queue.is_empty());
        assert_eq!(snapshot.cars[0].door_state, DoorState::Opened);
    }

    #[test]
    fn test_hall_call_clears_on_the_first_opening_despite_a_cab_stop() {
        // Arrange: a hall call and a cab selection for the same floor
        let mut building = building(1, 0, 3);
        building.execute(Command::CallUp(2)).unwrap();
        building.execute(Command::SelectFloor(0, 2)).unwrap();

        // Act
        run_until_open_at(&mut building, 2);

        // Assert: the call is gone the moment the doors first stand open
        let snapshot = building.snapshot();
        assert!(snapshot.hall_calls.is_empty());
        assert!(snapshot.cars[0].stop_queue.is_empty());

        // Assert: one door cycle, then parked; no re-opening at the floor
        for _ in 0..10 {
            building.tick();
            let snapshot = building.snapshot();
            assert_ne!(
                (snapshot.cars[0].door_state, snapshot.cars[0].current_floor),
                (DoorState::Opening, 2),
                "car started a second door cycle at floor 2"
            );
        }
        let snapshot = building.snapshot();
        assert_eq!(snapshot.cars[0].door_state, DoorState::Closed);
    }

    #[test]
    fn test_cab_selection_is_eventually_served() {
        // Arrange
        let mut building = building(1, 0, 3);

        // Act
        building.execute(Command::SelectFloor(0, 3)).unwrap();
        run_until_open_at(&mut building, 3);

        // Assert
        let snapshot = building.snapshot();
        assert_eq!(snapshot.cars[0].current_floor, 3);
        assert!(snapshot.cars[0].stop_queue.is_empty());
    }

    #[test]
    fn test_every_floor_is_reachable_by_hall_call() {
        // Arrange & Act & Assert: run_until_open_at panics on starvation
        for floor in -1..=3 {
            let mut building = building(2, -1, 3);
            building.execute(Command::CallUp(floor)).unwrap();
            run_until_open_at(&mut building, floor);
        }
    }

    #[test]
    fn test_hall_call_is_assigned_to_exactly_one_car() {
        // Arrange
        let mut building = building(2, 0, 3);

        // Act
        building.execute(Command::CallUp(3)).unwrap();

        // Assert: one binding, one queue entry
        let snapshot = building.snapshot();
        assert_eq!(snapshot.hall_calls.len(), 1);
        assert!(snapshot.hall_calls[0].assigned_to.is_some());
        let holders = snapshot
            .cars
            .iter()
            .filter(|car| car.stop_queue.contains(&3))
            .count();
        assert_eq!(holders, 1);
    }

    #[test]
    fn test_out_of_range_floor_is_rejected() {
        // Arrange
        let mut building = building(1, 0, 3);

        // Act
        let call = building.execute(Command::CallUp(7));
        let select = building.execute(Command::SelectFloor(0, -5));

        // Assert
        assert_eq!(call, Err(CommandError::OutOfRangeFloor(7)));
        assert_eq!(select, Err(CommandError::OutOfRangeFloor(-5)));
        assert!(building.snapshot().hall_calls.is_empty());
    }

    #[test]
    fn test_unknown_car_is_rejected() {
        // Arrange
        let mut building = building(1, 0, 3);

        // Act
        let result = building.execute(Command::OpenDoor(4));

        // Assert
        assert_eq!(result, Err(CommandError::InvalidCar(4)));
    }

    #[test]
    fn test_door_command_is_rejected_while_the_car_is_moving() {
        // Arrange: get the car moving
        let mut building = building(1, 0, 3);
        building.execute(Command::SelectFloor(0, 3)).unwrap();
        building.tick();

        // Act
        let result = building.execute(Command::OpenDoor(0));

        // Assert
        assert_eq!(result, Err(CommandError::IllegalDoorOperation(0)));
    }

    #[test]
    fn test_open_door_command_reverses_closing_doors() {
        // Arrange: drive the doors into their closing phase
        let mut building = building(1, 0, 3);
        building.execute(Command::OpenDoor(0)).unwrap();
        building.tick(); // opening done
        building.tick(); // stay expired, now closing
        assert_eq!(building.snapshot().cars[0].door_state, DoorState::Closing);

        // Act
        building.execute(Command::OpenDoor(0)).unwrap();

        // Assert: fully open again without an opening phase
        assert_eq!(building.snapshot().cars[0].door_state, DoorState::Opened);
    }

    #[test]
    fn test_reset_restores_the_initial_state() {
        // Arrange: calls in flight and a car away from home
        let mut building = building(2, 0, 3);
        building.execute(Command::CallUp(3)).unwrap();
        building.execute(Command::SelectFloor(1, 2)).unwrap();
        for _ in 0..3 {
            building.tick();
        }

        // Act
        building.execute(Command::Reset).unwrap();

        // Assert
        let snapshot = building.snapshot();
        assert!(snapshot.hall_calls.is_empty());
        for car in &snapshot.cars {
            assert_eq!(car.current_floor, 0);
            assert_eq!(car.door_state, DoorState::Closed);
            assert!(car.stop_queue.is_empty());
        }
    }

    #[test]
    fn test_timing_update_applies_without_a_reset() {
        // Arrange
        let mut building = building(1, 0, 3);
        let mut new = building.config().clone();
        new.timing.floor_travel_ticks = 5;

        // Act
        let result = building.execute(Command::Configure(new));

        // Assert
        assert_eq!(result, Ok(()));
        assert_eq!(building.config().timing.floor_travel_ticks, 5);
    }

    #[test]
    fn test_invalid_timing_update_is_rejected_and_changes_nothing() {
        // Arrange: a bad and a good timing value in the same update
        let mut building = building(1, 0, 3);
        let before = building.config().clone();
        let mut new = before.clone();
        new.timing.floor_travel_ticks = 0;
        new.timing.door_stay_ticks = 9;

        // Act
        let result = building.execute(Command::Configure(new));

        // Assert: all-or-nothing, the valid part did not apply either
        assert!(matches!(result, Err(CommandError::InvalidConfiguration(_))));
        assert_eq!(building.config(), &before);
    }

    #[test]
    fn test_car_count_change_requires_a_restart() {
        // Arrange
        let mut building = building(2, 0, 3);
        building.execute(Command::CallUp(2)).unwrap();
        let before = building.snapshot();
        let mut new = building.config().clone();
        new.building.car_count = 4;

        // Act
        let result = building.execute(Command::Configure(new));

        // Assert: rejected, and nothing about the simulation changed
        assert_eq!(result, Err(CommandError::RestartRequired));
        assert_eq!(building.config().building.car_count, 2);
        let after = building.snapshot();
        assert_eq!(after.cars.len(), before.cars.len());
        assert_eq!(after.hall_calls, before.hall_calls);
    }

    #[test]
    fn test_floor_range_change_requires_a_restart() {
        // Arrange
        let mut building = building(1, 0, 3);
        let mut new = building.config().clone();
        new.building.max_floor = 9;

        // Act
        let result = building.execute(Command::Configure(new));

        // Assert
        assert_eq!(result, Err(CommandError::RestartRequired));
        assert_eq!(building.config().building.max_floor, 3);
    }

    #[test]
    fn test_apply_config_and_reset_rebuilds_the_building() {
        // Arrange
        let mut building = building(1, 0, 3);
        building.execute(Command::CallUp(2)).unwrap();

        // Act
        building.apply_config_and_reset(config(3, -2, 5)).unwrap();

        // Assert
        let snapshot = building.snapshot();
        assert_eq!(snapshot.cars.len(), 3);
        assert!(snapshot.hall_calls.is_empty());
        for car in &snapshot.cars {
            assert_eq!(car.current_floor, -2);
        }
    }

    #[test]
    fn test_subscribers_receive_a_snapshot_per_tick_and_command() {
        // Arrange
        let mut building = building(1, 0, 3);
        let receiver = building.subscribe();

        // Act
        building.execute(Command::CallUp(2)).unwrap();
        building.tick();
        building.tick();

        // Assert
        let snapshots: Vec<_> = receiver.try_iter().collect();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].tick, 0);
        assert_eq!(snapshots[2].tick, 2);
        assert_eq!(snapshots[0].hall_calls.len(), 1);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        // Arrange
        let mut building = building(1, 0, 3);
        building.execute(Command::CallUp(2)).unwrap();

        // Act
        let json = serde_json::to_string(&building.snapshot()).unwrap();

        // Assert
        assert!(json.contains("\"hallCalls\""));
        assert!(json.contains("\"currentFloor\""));
        assert!(json.contains("\"doorState\":\"closed\""));
    }
}
