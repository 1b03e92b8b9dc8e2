use crate::tests::cases::{assert_all_close, assert_close, powell, twelve_bus};
use crate::{
    runpf, Bus, BusType, Case, ConfigurationError, Line, PFOptions, PFOptionsBuilder,
    PowerFlowError, State,
};

#[test]
fn powell_case() {
    let res = runpf(&powell(), &PFOptions::default()).unwrap();
    assert_eq!(res.status, State::Converged);
    assert!(res.converged());
    assert!(!res.provisional);
    assert_eq!(res.iterations, 3);

    let vm: Vec<f64> = res.bus.iter().map(|b| b.vm).collect();
    let va: Vec<f64> = res.bus.iter().map(|b| b.va).collect();
    assert_all_close(&vm, &[1.0, 0.955324, 0.954838, 0.933366, 0.953416], 1e-6);
    assert_all_close(&va, &[0.0, -2.4044, -2.3634, -3.6481, -2.6884], 1e-4);

    assert_close(res.mismatch.p_mw, 0.032603, 1e-5);
    assert_close(res.mismatch.q_mvar, 0.015658, 1e-5);
}

#[test]
fn twelve_bus_case() {
    let res = runpf(&twelve_bus(), &PFOptions::default()).unwrap();
    assert!(res.converged());
    assert!(res.iterations <= 50);
    assert_eq!(res.iterations, 3);

    for b in &res.bus {
        assert!(
            (0.9..=1.1).contains(&b.vm),
            "bus {} voltage {}",
            b.number,
            b.vm
        );
    }
    let vm: Vec<f64> = res.bus.iter().map(|b| b.vm).collect();
    assert_all_close(
        &vm,
        &[
            1.06, 1.045, 1.01, 1.03656, 1.04053, 1.07, 1.07681, 1.09, 1.05225, 1.05269, 1.06242,
            1.06409,
        ],
        1e-5,
    );

    // Slack and PV magnitudes never move.
    assert_eq!(res.bus(1).unwrap().vm, 1.06);
    assert_eq!(res.bus(1).unwrap().va, 0.0);
    assert_eq!(res.bus(2).unwrap().vm, 1.045);
    assert_eq!(res.bus(3).unwrap().vm, 1.01);
    assert_eq!(res.bus(6).unwrap().vm, 1.07);
    assert_eq!(res.bus(8).unwrap().vm, 1.09);

    assert_eq!(res.bus(1).unwrap().bus_type, BusType::Slack);
    assert_eq!(res.bus(8).unwrap().bus_type, BusType::PV);
    assert_eq!(res.bus(12).unwrap().bus_type, BusType::PQ);
}

#[test]
fn flat_start_without_load() {
    let case = Case::new(
        vec![
            Bus::with_voltage(1, 1.0),
            Bus::pq(2, 0.0, 0.0),
            Bus::pq(3, 0.0, 0.0),
        ],
        vec![
            Line::new(1, 2, 0.02, 0.1, 0.0),
            Line::new(2, 3, 0.01, 0.05, 0.0),
            Line::new(1, 3, 0.03, 0.2, 0.0),
        ],
    );
    let res = runpf(&case, &PFOptions::default()).unwrap();
    assert!(res.converged());
    assert_eq!(res.iterations, 1);
    assert_close(res.mismatch.p_mw, 0.0, 1e-9);
    assert_close(res.mismatch.q_mvar, 0.0, 1e-9);
    assert!(res.bus.iter().all(|b| b.vm == 1.0 && b.va == 0.0));
}

#[test]
fn start_values() {
    let case = Case::new(
        vec![Bus::pq(1, 0.0, 0.0), Bus::pq(2, 0.0, 0.0)],
        vec![Line::new(1, 2, 0.0, 0.1, 0.0)],
    );
    let opt = PFOptionsBuilder::default()
        .vm_start(1.02)
        .va_start(-5.0)
        .build()
        .unwrap();
    let res = runpf(&case, &opt).unwrap();
    assert!(res.converged());
    assert_close(res.bus(1).unwrap().vm, 1.02, 1e-12);
    assert_close(res.bus(1).unwrap().va, -5.0, 1e-12);
    assert_close(res.bus(2).unwrap().vm, 1.02, 1e-9);
    assert_close(res.bus(2).unwrap().va, -5.0, 1e-9);
}

#[test]
fn sparse_bus_numbers() {
    let case = Case::new(
        vec![
            Bus::pq(30, 10.0, 5.0),
            Bus::with_voltage(10, 1.0),
            Bus::pq(20, 10.0, 5.0),
        ],
        vec![
            Line::new(10, 20, 0.01, 0.1, 0.0),
            Line::new(20, 30, 0.01, 0.1, 0.0),
        ],
    );
    let opt = PFOptionsBuilder::default().slack_bus(10).build().unwrap();
    let res = runpf(&case, &opt).unwrap();
    assert!(res.converged());
    assert_eq!(
        res.bus.iter().map(|b| b.number).collect::<Vec<_>>(),
        vec![10, 20, 30]
    );
    assert_eq!((res.line[1].from_bus, res.line[1].to_bus), (20, 30));
    // voltage drops away from the source
    assert!(res.bus(30).unwrap().vm < res.bus(20).unwrap().vm);
    assert!(res.bus(20).unwrap().vm < 1.0);
}

#[test]
fn deterministic() {
    let opt = PFOptions::default();
    let a = runpf(&twelve_bus(), &opt).unwrap();
    let b = runpf(&twelve_bus(), &opt).unwrap();
    assert_eq!(a, b);
}

#[test]
fn base_invariance() {
    // Same physical network on a 200 MVA base.
    let mut scaled = powell();
    for ln in scaled.line.iter_mut() {
        ln.r *= 2.0;
        ln.x *= 2.0;
        ln.b /= 2.0;
    }
    let opt = PFOptionsBuilder::default().base_mva(200.0).build().unwrap();

    let a = runpf(&powell(), &PFOptions::default()).unwrap();
    let b = runpf(&scaled, &opt).unwrap();
    assert_eq!(a.iterations, b.iterations);
    for (x, y) in a.bus.iter().zip(&b.bus) {
        assert_close(x.vm, y.vm, 1e-9);
        assert_close(x.va, y.va, 1e-7);
    }
    for (x, y) in a.line.iter().zip(&b.line) {
        assert_close(x.pf, y.pf, 1e-6);
        assert_close(x.qt, y.qt, 1e-6);
    }
}

#[test]
fn iteration_cap() {
    let opt = PFOptionsBuilder::default().max_it(1).build().unwrap();
    let res = runpf(&powell(), &opt).unwrap();
    assert_eq!(res.status, State::MaxIterationsExceeded);
    assert!(!res.converged());
    assert!(res.provisional);
    assert_eq!(res.iterations, 1);
    assert_close(res.mismatch.p_mw, 3.612438, 1e-5);
    assert_close(res.mismatch.q_mvar, 2.164101, 1e-5);

    // analysis still runs on the last state
    assert_eq!(res.bus.len(), 5);
    assert_eq!(res.line.len(), 7);
    assert_close(res.bus(4).unwrap().vm, 0.938446, 1e-6);
}

#[test]
fn converged_at_iteration_cap() {
    let opt = PFOptionsBuilder::default().max_it(2).build().unwrap();
    let res = runpf(&powell(), &opt).unwrap();
    assert_eq!(res.status, State::Converged);
    assert!(!res.provisional);
    assert_eq!(res.iterations, 2);
    assert_all_close(
        &res.bus.iter().map(|b| b.vm).collect::<Vec<_>>(),
        &[1.0, 0.955324, 0.954838, 0.933366, 0.953416],
        1e-6,
    );
}

#[test]
fn configuration_errors() {
    let opt = PFOptions::default();

    let mut case = powell();
    case.line.push(Line::new(2, 99, 0.01, 0.1, 0.0));
    assert_eq!(
        runpf(&case, &opt).unwrap_err(),
        PowerFlowError::Configuration(ConfigurationError::UnknownBus {
            line: 8,
            from: 2,
            to: 99,
            bus: 99
        })
    );

    let opt7 = PFOptionsBuilder::default().slack_bus(7).build().unwrap();
    assert_eq!(
        runpf(&powell(), &opt7).unwrap_err(),
        PowerFlowError::Configuration(ConfigurationError::SlackBus {
            number: 7,
            found: 0
        })
    );

    let mut case = powell();
    case.bus.push(Bus::pq(6, 1.0, 1.0));
    case.bus.push(Bus::pq(7, 1.0, 1.0));
    case.line.push(Line::new(6, 7, 0.01, 0.1, 0.0));
    assert_eq!(
        runpf(&case, &opt).unwrap_err(),
        PowerFlowError::Configuration(ConfigurationError::Islanded(vec![6, 7]))
    );

    let bad = PFOptions {
        max_it: 0,
        ..Default::default()
    };
    assert!(matches!(
        runpf(&powell(), &bad),
        Err(PowerFlowError::Configuration(
            ConfigurationError::InvalidOption(_)
        ))
    ));
}

#[test]
fn singular_jacobian() {
    let case = Case::new(
        vec![Bus::with_voltage(1, 1.0), Bus::pv(2, 10.0, 1.0, 0.0, 0.0)],
        vec![Line::new(1, 2, 0.1, 0.0, 0.0)],
    );
    let err = runpf(&case, &PFOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "numerical error: singular Jacobian at iteration 1");
}

#[test]
fn json_report() {
    let res = runpf(&powell(), &PFOptions::default()).unwrap();
    let v = serde_json::to_value(&res).unwrap();
    assert_eq!(v["status"], "Converged");
    assert_eq!(v["iterations"], 3);
    assert_eq!(v["bus"][3]["number"], 4);
    assert_eq!(v["bus"][3]["violation"], "Under");
    assert_eq!(v["bus"][1]["bus_type"], "PQ");
    assert_eq!(v["options"]["slack_bus"], 1);
}
