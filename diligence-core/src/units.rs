//! Unit conversion over a fixed table.
//!
//! Simple units convert linearly through a base unit per dimension
//! (J, W, kg, USD, fraction, s). Temperatures are affine and convert through
//! kelvin. Rates such as `$/MWh` or `%/yr` convert numerator and denominator
//! independently.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::UnitError;

/// Physical (or financial) dimension of a simple unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Energy,
    Power,
    Mass,
    Currency,
    Ratio,
    Time,
    Temperature,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Energy => "energy",
            Dimension::Power => "power",
            Dimension::Mass => "mass",
            Dimension::Currency => "currency",
            Dimension::Ratio => "ratio",
            Dimension::Time => "time",
            Dimension::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

/// The dimension of a possibly compound unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Simple(Dimension),
    Rate {
        numerator: Dimension,
        denominator: Dimension,
    },
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Simple(d) => write!(f, "{d}"),
            Quantity::Rate {
                numerator,
                denominator,
            } => write!(f, "{numerator}/{denominator}"),
        }
    }
}

struct UnitDef {
    keys: &'static [&'static str],
    dimension: Dimension,
    /// Multiply by this to reach the base unit.
    factor: f64,
    /// Added after scaling; non-zero only for temperatures.
    offset: f64,
}

const fn unit(keys: &'static [&'static str], dimension: Dimension, factor: f64) -> UnitDef {
    UnitDef {
        keys,
        dimension,
        factor,
        offset: 0.0,
    }
}

const SECONDS_PER_YEAR: f64 = 31_557_600.0;

static UNITS: &[UnitDef] = &[
    // Energy, base J
    unit(&["j", "joule", "joules"], Dimension::Energy, 1.0),
    unit(&["kj"], Dimension::Energy, 1e3),
    unit(&["mj"], Dimension::Energy, 1e6),
    unit(&["gj"], Dimension::Energy, 1e9),
    unit(&["tj"], Dimension::Energy, 1e12),
    unit(&["wh"], Dimension::Energy, 3.6e3),
    unit(&["kwh"], Dimension::Energy, 3.6e6),
    unit(&["mwh"], Dimension::Energy, 3.6e9),
    unit(&["gwh"], Dimension::Energy, 3.6e12),
    unit(&["twh"], Dimension::Energy, 3.6e15),
    unit(&["btu"], Dimension::Energy, 1_055.056),
    unit(&["mmbtu"], Dimension::Energy, 1.055_056e9),
    unit(&["therm", "therms"], Dimension::Energy, 1.055_056e8),
    unit(&["kcal"], Dimension::Energy, 4_184.0),
    // Power, base W
    unit(&["w", "watt", "watts"], Dimension::Power, 1.0),
    unit(&["kw", "kwe", "kwth"], Dimension::Power, 1e3),
    unit(&["mw", "mwe", "mwth"], Dimension::Power, 1e6),
    unit(&["gw", "gwe"], Dimension::Power, 1e9),
    unit(&["hp"], Dimension::Power, 745.699_872),
    // Mass, base kg
    unit(&["g", "gram", "grams"], Dimension::Mass, 1e-3),
    unit(&["kg"], Dimension::Mass, 1.0),
    unit(&["t", "tonne", "tonnes", "metricton", "mt"], Dimension::Mass, 1e3),
    unit(&["lb", "lbs"], Dimension::Mass, 0.453_592_37),
    unit(&["shortton", "ton", "tons"], Dimension::Mass, 907.184_74),
    // Currency scale, base USD
    unit(&["$", "usd", "dollars"], Dimension::Currency, 1.0),
    unit(&["$k", "k$", "kusd", "thousandusd"], Dimension::Currency, 1e3),
    unit(
        &["$m", "m$", "$mm", "musd", "millionusd", "million"],
        Dimension::Currency,
        1e6,
    ),
    unit(
        &["$b", "b$", "busd", "billionusd", "billion"],
        Dimension::Currency,
        1e9,
    ),
    // Ratio, base fraction
    unit(&["fraction", "ratio", "x"], Dimension::Ratio, 1.0),
    unit(&["%", "percent", "pct"], Dimension::Ratio, 1e-2),
    unit(&["bps", "basispoints"], Dimension::Ratio, 1e-4),
    unit(&["ppm"], Dimension::Ratio, 1e-6),
    // Time, base s
    unit(&["s", "sec", "second", "seconds"], Dimension::Time, 1.0),
    unit(&["min", "minute", "minutes"], Dimension::Time, 60.0),
    unit(&["h", "hr", "hour", "hours"], Dimension::Time, 3_600.0),
    unit(&["d", "day", "days"], Dimension::Time, 86_400.0),
    unit(&["month", "months", "mo"], Dimension::Time, SECONDS_PER_YEAR / 12.0),
    unit(
        &["yr", "year", "years", "a", "annum", "y"],
        Dimension::Time,
        SECONDS_PER_YEAR,
    ),
    // Temperature, base K
    UnitDef {
        keys: &["k", "kelvin"],
        dimension: Dimension::Temperature,
        factor: 1.0,
        offset: 0.0,
    },
    UnitDef {
        keys: &["c", "°c", "degc", "celsius"],
        dimension: Dimension::Temperature,
        factor: 1.0,
        offset: 273.15,
    },
    UnitDef {
        keys: &["f", "°f", "degf", "fahrenheit"],
        dimension: Dimension::Temperature,
        factor: 5.0 / 9.0,
        offset: 459.67 * 5.0 / 9.0,
    },
];

fn normalize(unit: &str) -> String {
    unit.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn lookup(key: &str, original: &str) -> Result<&'static UnitDef, UnitError> {
    UNITS
        .iter()
        .find(|def| def.keys.contains(&key))
        .ok_or_else(|| UnitError::UnknownUnit {
            unit: original.to_string(),
        })
}

enum Parsed {
    Simple(&'static UnitDef),
    Rate(&'static UnitDef, &'static UnitDef),
}

impl Parsed {
    fn quantity(&self) -> Quantity {
        match self {
            Parsed::Simple(def) => Quantity::Simple(def.dimension),
            Parsed::Rate(num, den) => Quantity::Rate {
                numerator: num.dimension,
                denominator: den.dimension,
            },
        }
    }
}

fn parse(unit: &str) -> Result<Parsed, UnitError> {
    let key = normalize(unit);
    if let Some((num, den)) = key.split_once('/') {
        let num_def = lookup(num, unit)?;
        let den_def = lookup(den, unit)?;
        if num_def.offset != 0.0 || den_def.offset != 0.0 {
            // Affine units have no meaning inside a rate.
            return Err(UnitError::UnknownUnit {
                unit: unit.to_string(),
            });
        }
        return Ok(Parsed::Rate(num_def, den_def));
    }
    lookup(&key, unit).map(Parsed::Simple)
}

/// Whether a unit string is understood by the conversion table.
pub fn is_known(unit: &str) -> bool {
    parse(unit).is_ok()
}

/// The dimension of a unit string.
pub fn dimension_of(unit: &str) -> Result<Quantity, UnitError> {
    parse(unit).map(|p| p.quantity())
}

/// Convert `value` from one unit to another.
///
/// Identical unit spellings (after normalization) return the value unchanged.
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    if !value.is_finite() {
        return Err(UnitError::NonFinite { value });
    }
    if normalize(from) == normalize(to) {
        return Ok(value);
    }

    let source = parse(from)?;
    let target = parse(to)?;
    let mismatch = UnitError::IncompatibleDimensions {
        from: from.to_string(),
        to: to.to_string(),
        from_dimension: source.quantity().to_string(),
        to_dimension: target.quantity().to_string(),
    };
    if source.quantity() != target.quantity() {
        return Err(mismatch);
    }

    let converted = match (source, target) {
        (Parsed::Simple(src), Parsed::Simple(dst)) => {
            let base = value * src.factor + src.offset;
            (base - dst.offset) / dst.factor
        }
        (Parsed::Rate(src_num, src_den), Parsed::Rate(dst_num, dst_den)) => {
            value * (src_num.factor / dst_num.factor) * (dst_den.factor / src_den.factor)
        }
        _ => return Err(mismatch),
    };

    if converted.is_finite() {
        Ok(converted)
    } else {
        Err(UnitError::NonFinite { value: converted })
    }
}
