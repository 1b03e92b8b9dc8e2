use std::time::Instant;

use crate::debug::format_rect_vec;
use crate::newton::*;
use crate::{
    bus_type, bus_types, make_sbus, pfsoln, BusType, Case, ConfigurationError, Network, PFOptions,
    PowerFlowError, PowerFlowResults,
};

/// Runs a Newton-Raphson power flow on `case` and analyses the final state.
///
/// Configuration problems are reported before any iteration runs. Hitting
/// the iteration cap is not an error: the results come back with status
/// [`State::MaxIterationsExceeded`] and are marked provisional.
pub fn runpf(case: &Case, opt: &PFOptions) -> Result<PowerFlowResults, PowerFlowError> {
    opt.validate()?;

    let net = Network::new(case)?;

    // get bus index lists of each type of bus
    let (refbus, pv, pq) = bus_types(&net.bus, opt.slack_bus)?;

    let islanded = net.unreachable_from(refbus);
    if !islanded.is_empty() {
        return Err(ConfigurationError::Islanded(islanded).into());
    }

    // initial state
    let va0 = vec![opt.va_start_rad(); net.nb()];
    let vm0: Vec<f64> = net
        .bus
        .iter()
        .map(|b| match bus_type(b, opt.slack_bus) {
            BusType::Slack | BusType::PV => b.vm.unwrap_or(opt.vm_start),
            BusType::PQ => opt.vm_start,
        })
        .collect();

    // complex bus power injections (generation - load)
    let s_bus = make_sbus(opt.base_mva, &net.bus);
    log::debug!("Sbus: {}", format_rect_vec(&s_bus));

    let t0 = Instant::now();
    let progress = LogProgress { order: &net.order };
    let solver = NewtonPF::new(&net.y_bus, &s_bus, vm0, va0, &pv, &pq, opt);
    let solver = newtonpf(solver, Some(&progress))?;
    log::debug!("power flow solved in {:?}", t0.elapsed());

    let types: Vec<BusType> = net.bus.iter().map(|b| bus_type(b, opt.slack_bus)).collect();

    Ok(pfsoln(&net, &types, &solver, opt))
}
