use crate::{Bus, Case, Line};

#[track_caller]
pub(crate) fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} got {} (tolerance {})",
        expected,
        actual,
        tol
    );
}

#[track_caller]
pub(crate) fn assert_all_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tol,
            "[{}]: expected {} got {} (tolerance {})",
            i,
            e,
            a,
            tol
        );
    }
}

/// Five bus system from Powell, "Power System Load Flow Analysis", Fig. 3.1.
/// Bus 1 is the slack bus; every other bus is a load bus.
pub(crate) fn powell() -> Case {
    Case::new(
        vec![
            Bus::with_voltage(1, 1.0),
            Bus::pq(2, 40.0, 20.0),
            Bus::pq(3, 25.0, 15.0),
            Bus::pq(4, 40.0, 20.0),
            Bus::pq(5, 50.0, 20.0),
        ],
        vec![
            Line::new(1, 2, 0.05, 0.11, 0.02),
            Line::new(1, 3, 0.05, 0.11, 0.02),
            Line::new(1, 5, 0.03, 0.08, 0.02),
            Line::new(2, 3, 0.04, 0.09, 0.02),
            Line::new(2, 5, 0.04, 0.09, 0.02),
            Line::new(3, 4, 0.06, 0.13, 0.03),
            Line::new(4, 5, 0.04, 0.09, 0.02),
        ],
    )
}

/// Twelve bus system with a double circuit between buses 1 and 2.
///
/// Bus 1 is the slack bus, buses 2, 3, 6 and 8 hold their voltage.
pub(crate) fn twelve_bus() -> Case {
    let bus = vec![
        Bus::with_voltage(1, 1.06),
        Bus::pv(2, 40.0, 1.045, 21.7, 12.7),
        Bus {
            number: 3,
            pd: 94.2,
            qd: 19.0,
            pg: None,
            vm: Some(1.01),
        },
        Bus::pq(4, 47.8, -3.9),
        Bus::pq(5, 7.6, 1.6),
        Bus {
            number: 6,
            pd: 11.2,
            qd: 7.5,
            pg: None,
            vm: Some(1.07),
        },
        Bus::pq(7, 0.0, 0.0),
        Bus::with_voltage(8, 1.09),
        Bus::pq(9, 29.5, 16.6),
        Bus::pq(10, 9.0, 5.8),
        Bus::pq(11, 3.5, 1.8),
        Bus::pq(12, 6.1, 1.6),
    ];
    let line = vec![
        Line::new(1, 2, 0.03876, 0.11834, 0.0264).rated(120.0),
        Line::new(1, 2, 0.03876, 0.11834, 0.0264).rated(120.0),
        Line::new(1, 5, 0.05403, 0.22304, 0.0492).rated(100.0),
        Line::new(2, 3, 0.04699, 0.19797, 0.0438).rated(100.0),
        Line::new(2, 4, 0.05811, 0.17632, 0.0340).rated(80.0),
        Line::new(2, 5, 0.05695, 0.17388, 0.0346).rated(80.0),
        Line::new(3, 4, 0.06701, 0.17103, 0.0128).rated(60.0),
        Line::new(4, 5, 0.01335, 0.04211, 0.0).rated(80.0),
        Line::new(4, 7, 0.0, 0.20912, 0.0).rated(60.0),
        Line::new(5, 6, 0.0, 0.25202, 0.0).rated(60.0),
        Line::new(6, 9, 0.09498, 0.19890, 0.0).rated(30.0),
        Line::new(6, 10, 0.12291, 0.25581, 0.0).rated(30.0),
        Line::new(6, 11, 0.06615, 0.13027, 0.0).rated(30.0),
        Line::new(7, 8, 0.03181, 0.08450, 0.0).rated(30.0),
        Line::new(7, 12, 0.12711, 0.27038, 0.0).rated(30.0),
        Line::new(8, 9, 0.08205, 0.19207, 0.0).rated(30.0),
        Line::new(10, 11, 0.22092, 0.19988, 0.0).rated(20.0),
        Line::new(11, 12, 0.17093, 0.34802, 0.0).rated(20.0),
    ];
    Case::new(bus, line)
}
