use num_complex::Complex64;

use crate::{
    power_injections, BusResult, BusType, FinalMismatch, LineResult, Network, NewtonPF, PFOptions,
    PowerFlowResults, State, Totals, VoltageViolation,
};

/// Updates bus, generator and line quantities from the final voltage state
/// of a solve.
///
/// Runs whether or not the solver converged; a state that has not
/// converged yields results marked provisional. Violations are logged as
/// warnings.
pub fn pfsoln(
    net: &Network,
    bus_type: &[BusType],
    solver: &NewtonPF,
    opt: &PFOptions,
) -> PowerFlowResults {
    let base_mva = opt.base_mva;
    let (vm, va) = (solver.vm(), solver.va());
    let provisional = solver.state() != State::Converged;
    let tag = if provisional { " (provisional)" } else { "" };

    let (p, q) = power_injections(&net.y_bus, vm, va);

    let bus: Vec<BusResult> = net
        .bus
        .iter()
        .enumerate()
        .map(|(i, b)| {
            // inj S + local Sd
            let (pg, qg) = match bus_type[i] {
                BusType::Slack => (Some(p[i] * base_mva + b.pd), Some(q[i] * base_mva + b.qd)),
                BusType::PV => (Some(b.pg.unwrap_or(0.0)), Some(q[i] * base_mva + b.qd)),
                BusType::PQ => (None, None),
            };

            let violation = if vm[i] < opt.vmin {
                Some(VoltageViolation::Under)
            } else if vm[i] > opt.vmax {
                Some(VoltageViolation::Over)
            } else {
                None
            };
            if violation.is_some() {
                log::warn!(
                    "bus {} voltage {:.4} p.u. outside [{}, {}]{}",
                    b.number,
                    vm[i],
                    opt.vmin,
                    opt.vmax,
                    tag
                );
            }

            BusResult {
                number: b.number,
                bus_type: bus_type[i],
                vm: vm[i],
                va: va[i].to_degrees(),
                pd: b.pd,
                qd: b.qd,
                pg,
                qg,
                violation,
            }
        })
        .collect();

    let v: Vec<Complex64> = vm
        .iter()
        .zip(va)
        .map(|(&m, &a)| Complex64::from_polar(m, a))
        .collect();

    let line: Vec<LineResult> = net
        .branch
        .iter()
        .map(|br| {
            let (i_f, i_t) = br.currents(&v);
            let s_f = v[br.f] * i_f.conj() * base_mva;
            let s_t = v[br.t] * i_t.conj() * base_mva;
            let loss = s_f + s_t;

            let s_max = s_f.norm().max(s_t.norm());
            let loading = br.rate_a.filter(|&r| r > 0.0).map(|r| 100.0 * s_max / r);
            let overloaded = loading.map_or(false, |l| l > 100.0);

            let (from_bus, to_bus) = (net.order.int2ext(br.f), net.order.int2ext(br.t));
            if overloaded {
                log::warn!(
                    "line {} ({}-{}) loaded to {:.1}% of its rating{}",
                    br.line,
                    from_bus,
                    to_bus,
                    loading.unwrap_or_default(),
                    tag
                );
            }

            LineResult {
                line: br.line,
                from_bus,
                to_bus,
                pf: s_f.re,
                qf: s_f.im,
                pt: s_t.re,
                qt: s_t.im,
                loss_mw: loss.re,
                loss_mvar: loss.im,
                s_max,
                loading,
                overloaded,
            }
        })
        .collect();

    let mut totals = Totals::default();
    for b in &bus {
        totals.pg += b.pg.unwrap_or_default();
        totals.qg += b.qg.unwrap_or_default();
        totals.pd += b.pd;
        totals.qd += b.qd;
    }
    for l in &line {
        totals.loss_mw += l.loss_mw;
        totals.loss_mvar += l.loss_mvar;
    }

    let m = solver.mismatch();
    let mismatch = FinalMismatch {
        p_mw: m.p_mw,
        p_bus: m.p_bus.map(|i| net.order.int2ext(i)),
        q_mvar: m.q_mvar,
        q_bus: m.q_bus.map(|i| net.order.int2ext(i)),
    };

    PowerFlowResults {
        status: solver.state(),
        iterations: solver.iteration(),
        mismatch,
        provisional,
        bus,
        line,
        totals,
        options: opt.clone(),
    }
}
