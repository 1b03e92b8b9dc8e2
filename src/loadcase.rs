use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::{Bus, Case, Line};

/// Row of a bus table file. Empty cells are absent values.
#[derive(Debug, Deserialize)]
struct BusRow {
    bus: usize,
    load_mw: Option<f64>,
    load_mvar: Option<f64>,
    gen_mw: Option<f64>,
    voltage_pu: Option<f64>,
}

impl From<BusRow> for Bus {
    fn from(row: BusRow) -> Self {
        Bus {
            number: row.bus,
            pd: row.load_mw.unwrap_or_default(),
            qd: row.load_mvar.unwrap_or_default(),
            pg: row.gen_mw,
            vm: row.voltage_pu,
        }
    }
}

/// Row of a line table file.
#[derive(Debug, Deserialize)]
struct LineRow {
    from: usize,
    to: usize,
    r_pu: f64,
    x_pu: f64,
    b_pu: Option<f64>,
    rate_mva: Option<f64>,
}

impl From<LineRow> for Line {
    fn from(row: LineRow) -> Self {
        Line {
            from_bus: row.from,
            to_bus: row.to,
            r: row.r_pu,
            x: row.x_pu,
            b: row.b_pu.unwrap_or_default(),
            rate_a: row.rate_mva,
        }
    }
}

fn read_table<T, R>(path: &Path) -> Result<Vec<R>>
where
    T: for<'de> Deserialize<'de>,
    R: From<T>,
{
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("unable to open {}", path.display()))?;

    rdr.deserialize::<T>()
        .enumerate()
        .map(|(i, row)| {
            row.map(R::from)
                .with_context(|| format!("{}: bad record {}", path.display(), i + 1))
        })
        .collect()
}

/// Reads a case from a bus table and a line table in CSV format.
///
/// Bus columns: `bus,load_mw,load_mvar,gen_mw,voltage_pu`.
/// Line columns: `from,to,r_pu,x_pu,b_pu,rate_mva`.
pub fn load_case(bus_path: &Path, line_path: &Path) -> Result<Case> {
    let bus = read_table::<BusRow, Bus>(bus_path)?;
    let line = read_table::<LineRow, Line>(line_path)?;
    Ok(Case::new(bus, line))
}

/// Reads a case in PowerViz text format and returns it with the power
/// base (MVA) from its `Misc` section.
///
/// Zero generation, voltage target and rating values are read as absent.
pub fn load_powerviz(path: &Path) -> Result<(Case, f64)> {
    let text =
        fs::read_to_string(path).with_context(|| format!("unable to read {}", path.display()))?;
    parse_powerviz(&text).with_context(|| format!("unable to parse {}", path.display()))
}

fn parse_powerviz(text: &str) -> Result<(Case, f64)> {
    let misc = section(text, "Misc")?;
    let base_mva: f64 = misc
        .first()
        .and_then(|row| row.first())
        .ok_or_else(|| anyhow!("Misc section has no power base"))?
        .parse()
        .context("invalid power base")?;

    let bus = section(text, "Bus")?
        .iter()
        .enumerate()
        .map(|(i, row)| bus_row(row).with_context(|| format!("Bus row {}", i + 1)))
        .collect::<Result<Vec<Bus>>>()?;

    let line = section(text, "Line")?
        .iter()
        .enumerate()
        .map(|(i, row)| line_row(row).with_context(|| format!("Line row {}", i + 1)))
        .collect::<Result<Vec<Line>>>()?;

    Ok((Case::new(bus, line), base_mva))
}

fn nonzero(v: f64) -> Option<f64> {
    if v == 0.0 {
        None
    } else {
        Some(v)
    }
}

// Number, Name, Area, Type, Vm, Va, PLoad, QLoad, PGen, QGen, VoltTarget, ...
fn bus_row(row: &[&str]) -> Result<Bus> {
    Ok(Bus {
        number: field(row, 0)?,
        pd: field(row, 6)?,
        qd: field(row, 7)?,
        pg: nonzero(field(row, 8)?),
        vm: nonzero(field(row, 10)?),
    })
}

// Number, FromBusNo, ToBusNo, TapLocation, R, X, B, RateNormal, ...
fn line_row(row: &[&str]) -> Result<Line> {
    Ok(Line {
        from_bus: field(row, 1)?,
        to_bus: field(row, 2)?,
        r: field(row, 4)?,
        x: field(row, 5)?,
        b: field(row, 6)?,
        rate_a: nonzero(field(row, 7)?),
    })
}

/// Whitespace separated rows between `name` and `End name`, without the
/// column header row.
fn section<'a>(text: &'a str, name: &str) -> Result<Vec<Vec<&'a str>>> {
    let end = format!("End {}", name);
    let mut lines = text.lines().map(str::trim);

    lines
        .by_ref()
        .find(|l| *l == name)
        .ok_or_else(|| anyhow!("missing {} section", name))?;
    lines.next(); // column headers

    let mut rows = Vec::new();
    for l in lines {
        if l == end {
            return Ok(rows);
        }
        if !l.is_empty() {
            rows.push(l.split_whitespace().collect());
        }
    }
    Err(anyhow!("{} section is not terminated by '{}'", name, end))
}

fn field<T>(row: &[&str], i: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let s = row
        .get(i)
        .ok_or_else(|| anyhow!("missing column {}", i + 1))?;
    s.parse()
        .with_context(|| format!("invalid value '{}' in column {}", s, i + 1))
}
