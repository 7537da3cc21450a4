#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::cones::ConeSet;
use crate::solver::{Info, ProblemData, Residuals, Settings, SolverStatus};
use std::io::Write;

// ---------------
// verbose console output
// ---------------

const HEADER: [&str; 8] = [
    " Iter ", " pri res ", " dua res ", " rel gap ", " pri obj ", " dua obj ", "  kappa  ",
    " time (s)",
];

// header titles joined by '|' separators
fn _line_len() -> usize {
    HEADER.iter().map(|h| h.len() + 1).sum::<usize>() - 1
}

fn _rule(out: &mut impl Write, c: char) -> std::io::Result<()> {
    for _ in 0.._line_len() {
        write!(out, "{}", c)?;
    }
    writeln!(out)
}

pub(crate) fn print_header<T: FloatT>(
    data: &ProblemData<T>,
    cones: &ConeSet<T>,
    settings: &Settings<T>,
    method: &str,
) -> std::io::Result<()> {
    let mut out = std::io::stdout();
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    _rule(&mut out, '-')?;
    writeln!(out, "\n\tsplitcone v{} - splitting conic solver", VERSION)?;
    writeln!(out, "\t(c) the splitcone developers\n")?;
    _rule(&mut out, '-')?;

    writeln!(out, "method: {}", method)?;
    writeln!(
        out,
        "EPS = {:.2e}, ALPHA = {:.2}, MAX_ITERS = {}, NORMALIZE = {}",
        settings.eps, settings.alpha, settings.max_iter, settings.normalize as u8
    )?;
    writeln!(
        out,
        "variables n = {}, constraints m = {}, non-zeros in A = {}",
        data.n,
        data.m,
        data.A.nnz()
    )?;
    if settings.warm_start {
        writeln!(out, "using variable warm-starting")?;
    }

    writeln!(out, "cones:\tzero / dual free vars: {}", cones.zero_dims())?;
    writeln!(out, "\tlinear vars: {}", cones.nonnegative_dims())?;
    writeln!(
        out,
        "\tsoc vars: {}, soc blks: {}",
        cones.soc_dims(),
        cones.soc_count()
    )?;

    _rule(&mut out, '-')?;
    for h in HEADER[0..HEADER.len() - 1].iter() {
        write!(out, "{}|", h)?;
    }
    writeln!(out, "{}", HEADER[HEADER.len() - 1])?;
    _rule(&mut out, '=')?;

    out.flush()
}

pub(crate) fn print_summary<T: FloatT>(
    iter: u32,
    r: &Residuals<T>,
    time: f64,
) -> std::io::Result<()> {
    let mut out = std::io::stdout();

    write!(out, "{:>5}|", iter)?;
    write!(out, " {:>8.2e} ", r.res_pri)?;
    write!(out, " {:>8.2e} ", r.res_dual)?;
    write!(out, " {:>8.2e} ", r.rel_gap)?;
    write!(out, " {:>8.2e} ", r.ctx)?;
    write!(out, " {:>8.2e} ", -r.bty)?;
    write!(out, " {:>8.2e} ", r.kap)?;
    writeln!(out, " {:>8.2e}", time)?;

    out.flush()
}

pub(crate) fn print_footer<T: FloatT>(
    info: &Info<T>,
    settings: &Settings<T>,
    linsys_summary: Option<String>,
) -> std::io::Result<()> {
    let mut out = std::io::stdout();

    _rule(&mut out, '-')?;
    writeln!(out, "Status: {}", info.status_string())?;
    if info.hit_max_iters {
        writeln!(out, "Hit MAX_ITERS = {}, solution may be inaccurate", settings.max_iter)?;
    }
    writeln!(out, "Time taken: {:.4} seconds", info.solve_time)?;

    if let Some(summary) = linsys_summary {
        writeln!(out, "{}", summary)?;
    }

    _rule(&mut out, '-')?;

    match info.status {
        SolverStatus::Infeasible => {
            writeln!(out, "Certificate of primal infeasibility:")?;
            writeln!(out, "|A'y|_2 * |b|_2 = {:.4e}", info.res_dual)?;
            writeln!(out, "dist(y, K*) = 0")?;
            writeln!(out, "b'y = {:.4}", info.dobj)?;
        }
        SolverStatus::Unbounded => {
            writeln!(out, "Certificate of dual infeasibility:")?;
            writeln!(out, "|Ax + s|_2 * |c|_2 = {:.4e}", info.res_pri)?;
            writeln!(out, "dist(s, K) = 0")?;
            writeln!(out, "c'x = {:.4}", info.pobj)?;
        }
        _ => {
            writeln!(out, "Error metrics:")?;
            writeln!(out, "|Ax + s - b|_2 / (1 + |b|_2) = {:.4e}", info.res_pri)?;
            writeln!(out, "|A'y + c|_2 / (1 + |c|_2) = {:.4e}", info.res_dual)?;
            writeln!(
                out,
                "|c'x + b'y| / (1 + |c'x| + |b'y|) = {:.4e}",
                info.rel_gap
            )?;
            writeln!(out, "dist(s, K) = 0, dist(y, K*) = 0, s'y = 0")?;
            _rule(&mut out, '-')?;
            writeln!(out, "c'x = {:.4}, -b'y = {:.4}", info.pobj, info.dobj)?;
        }
    }
    _rule(&mut out, '=')?;

    out.flush()
}
