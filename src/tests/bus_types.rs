use crate::tests::cases::{powell, twelve_bus};
use crate::{bus_type, bus_types, Bus, BusType, ConfigurationError};

#[test]
fn classification() {
    let case = twelve_bus();
    let (refbus, pv, pq) = bus_types(&case.bus, 1).unwrap();
    assert_eq!(refbus, 0);
    assert_eq!(pv, vec![1, 2, 5, 7]);
    assert_eq!(pq, vec![3, 4, 6, 8, 9, 10, 11]);

    assert_eq!(bus_type(&case.bus[0], 1), BusType::Slack);
    assert_eq!(bus_type(&case.bus[0], 2), BusType::PV);
    assert_eq!(bus_type(&case.bus[2], 1), BusType::PV);
    assert_eq!(bus_type(&case.bus[3], 1), BusType::PQ);
}

#[test]
fn generation_without_voltage_is_pv() {
    let bus = Bus {
        number: 4,
        pg: Some(10.0),
        ..Default::default()
    };
    assert_eq!(bus_type(&bus, 1), BusType::PV);
}

#[test]
fn slack_must_match_one_bus() {
    assert_eq!(
        bus_types(&powell().bus, 7).unwrap_err(),
        ConfigurationError::SlackBus {
            number: 7,
            found: 0
        }
    );

    let bus = vec![Bus::with_voltage(1, 1.0), Bus::with_voltage(1, 1.0)];
    assert_eq!(
        bus_types(&bus, 1).unwrap_err(),
        ConfigurationError::SlackBus {
            number: 1,
            found: 2
        }
    );
}

#[test]
fn display() {
    assert_eq!(BusType::Slack.to_string(), "Slack");
    assert_eq!(BusType::PQ.to_string(), "PQ");
}
