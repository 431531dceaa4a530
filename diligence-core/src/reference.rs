//! Physics reference tables: constants, named thermodynamic limits, and
//! published benchmark ranges for energy-conversion technologies.
//!
//! Everything here is read-only data, built once on first access and shared
//! across threads without locking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::PhysicsError;

/// Physical constants in SI units unless the name says otherwise.
pub mod constants {
    /// Boltzmann constant in eV/K.
    pub const BOLTZMANN_EV: f64 = 8.617_333_262e-5;
    /// Elementary charge in C.
    pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
    /// Planck constant in eV·s.
    pub const PLANCK_EV: f64 = 4.135_667_696e-15;
    /// Speed of light in m/s.
    pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e8;
    /// Stefan–Boltzmann constant in W/(m²·K⁴).
    pub const STEFAN_BOLTZMANN: f64 = 5.670_374_419e-8;
    /// Effective blackbody temperature of the solar photosphere in K.
    pub const SUN_TEMPERATURE_K: f64 = 5778.0;
    /// Solid-angle dilution of sunlight at the Earth's orbit, (R_sun / 1 AU)².
    pub const SOLAR_DILUTION: f64 = 2.16e-5;
    /// Standard reference cell / ambient temperature in K.
    pub const AMBIENT_TEMPERATURE_K: f64 = 300.0;
    /// Reversible water-splitting voltage at 25 °C (ΔG / 2F) in V.
    pub const WATER_REVERSIBLE_VOLTAGE: f64 = 1.229;
    /// Thermoneutral water-splitting voltage at 25 °C (ΔH_HHV / 2F) in V.
    pub const WATER_THERMONEUTRAL_VOLTAGE: f64 = 1.481;
    /// Betz limit on the fraction of wind kinetic power a rotor can extract.
    pub const BETZ_LIMIT: f64 = 16.0 / 27.0;
    /// Sea-level standard air density in kg/m³.
    pub const AIR_DENSITY: f64 = 1.225;
    /// Standard gravity in m/s².
    pub const GRAVITY: f64 = 9.806_65;
}

/// A benchmark range with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRange {
    pub min: f64,
    pub max: f64,
    pub source: String,
    pub year: u16,
}

impl BenchmarkRange {
    pub fn new(min: f64, max: f64, source: impl Into<String>, year: u16) -> Self {
        Self {
            min,
            max,
            source: source.into(),
            year,
        }
    }

    /// Whether `value` lies inside the inclusive range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Midpoint of the range.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// A named physical ceiling that no real device can exceed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsLimit {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub citation: String,
}

impl PhysicsLimit {
    fn new(name: &str, value: f64, unit: &str, citation: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            unit: unit.to_string(),
            citation: citation.to_string(),
        }
    }
}

/// Energy-conversion technologies with published benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Technology {
    SolarPv,
    OnshoreWind,
    OffshoreWind,
    HydrothermalLiquefaction,
    Pyrolysis,
    Gasification,
    AnaerobicDigestion,
    PemElectrolysis,
    AlkalineElectrolysis,
    SolidOxideElectrolysis,
    PemFuelCell,
    LithiumIonStorage,
    FlowBatteryStorage,
    PumpedHydro,
    CombinedCycleGas,
    Geothermal,
    HeatPump,
}

impl Technology {
    pub const ALL: [Technology; 17] = [
        Technology::SolarPv,
        Technology::OnshoreWind,
        Technology::OffshoreWind,
        Technology::HydrothermalLiquefaction,
        Technology::Pyrolysis,
        Technology::Gasification,
        Technology::AnaerobicDigestion,
        Technology::PemElectrolysis,
        Technology::AlkalineElectrolysis,
        Technology::SolidOxideElectrolysis,
        Technology::PemFuelCell,
        Technology::LithiumIonStorage,
        Technology::FlowBatteryStorage,
        Technology::PumpedHydro,
        Technology::CombinedCycleGas,
        Technology::Geothermal,
        Technology::HeatPump,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::SolarPv => "solar-pv",
            Technology::OnshoreWind => "onshore-wind",
            Technology::OffshoreWind => "offshore-wind",
            Technology::HydrothermalLiquefaction => "hydrothermal-liquefaction",
            Technology::Pyrolysis => "pyrolysis",
            Technology::Gasification => "gasification",
            Technology::AnaerobicDigestion => "anaerobic-digestion",
            Technology::PemElectrolysis => "pem-electrolysis",
            Technology::AlkalineElectrolysis => "alkaline-electrolysis",
            Technology::SolidOxideElectrolysis => "solid-oxide-electrolysis",
            Technology::PemFuelCell => "pem-fuel-cell",
            Technology::LithiumIonStorage => "lithium-ion-storage",
            Technology::FlowBatteryStorage => "flow-battery-storage",
            Technology::PumpedHydro => "pumped-hydro",
            Technology::CombinedCycleGas => "combined-cycle-gas",
            Technology::Geothermal => "geothermal",
            Technology::HeatPump => "heat-pump",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Technology {
    type Err = PhysicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let tech = match key.as_str() {
            "solarpv" | "solar" | "pv" | "photovoltaic" | "photovoltaics" => Technology::SolarPv,
            "onshorewind" | "wind" | "windturbine" => Technology::OnshoreWind,
            "offshorewind" => Technology::OffshoreWind,
            "hydrothermalliquefaction" | "htl" => Technology::HydrothermalLiquefaction,
            "pyrolysis" | "fastpyrolysis" => Technology::Pyrolysis,
            "gasification" | "biomassgasification" => Technology::Gasification,
            "anaerobicdigestion" | "ad" | "biogas" => Technology::AnaerobicDigestion,
            "pemelectrolysis" | "pemelectrolyzer" | "electrolysis" => Technology::PemElectrolysis,
            "alkalineelectrolysis" | "alkalineelectrolyzer" | "awe" => {
                Technology::AlkalineElectrolysis
            }
            "solidoxideelectrolysis" | "soec" => Technology::SolidOxideElectrolysis,
            "pemfuelcell" | "fuelcell" | "pemfc" => Technology::PemFuelCell,
            "lithiumionstorage" | "lithiumion" | "liion" | "battery" => {
                Technology::LithiumIonStorage
            }
            "flowbatterystorage" | "flowbattery" | "vanadiumflow" | "vrfb" => {
                Technology::FlowBatteryStorage
            }
            "pumpedhydro" | "pumpedstorage" | "phs" => Technology::PumpedHydro,
            "combinedcyclegas" | "combinedcycle" | "ccgt" | "ngcc" => Technology::CombinedCycleGas,
            "geothermal" => Technology::Geothermal,
            "heatpump" | "heatpumps" => Technology::HeatPump,
            _ => return Err(PhysicsError::UnknownTechnology(s.to_string())),
        };
        Ok(tech)
    }
}

/// Published benchmarks for one technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyBenchmarks {
    pub technology: Technology,
    /// What the efficiency figure measures (basis and boundary).
    pub efficiency_basis: String,
    pub efficiency_unit: String,
    pub efficiency: BenchmarkRange,
    pub ceiling: PhysicsLimit,
    pub capex_unit: String,
    pub capex: BenchmarkRange,
    pub levelized_cost_unit: String,
    pub levelized_cost: BenchmarkRange,
    /// Capacity factor in percent, where meaningful.
    pub capacity_factor: Option<BenchmarkRange>,
    pub lifetime_years: BenchmarkRange,
}

/// Single-junction detailed-balance limit under AM1.5G.
pub static SHOCKLEY_QUEISSER: LazyLock<PhysicsLimit> = LazyLock::new(|| {
    PhysicsLimit::new(
        "single-junction photovoltaic efficiency",
        33.7,
        "%",
        "Shockley & Queisser, J. Appl. Phys. 32, 510 (1961); AM1.5G, Rühle, Sol. Energy 130 (2016)",
    )
});

/// Maximum power coefficient of an ideal actuator disc.
pub static BETZ: LazyLock<PhysicsLimit> = LazyLock::new(|| {
    PhysicsLimit::new(
        "wind power coefficient",
        constants::BETZ_LIMIT * 100.0,
        "%",
        "Betz, Z. gesamte Turbinenwesen 26 (1920)",
    )
});

/// Net energy efficiency ceiling for hydrothermal liquefaction.
pub static HTL_CEILING: LazyLock<PhysicsLimit> = LazyLock::new(|| {
    PhysicsLimit::new(
        "net energy efficiency",
        85.0,
        "%",
        "PNNL-27186 HTL design case energy balance (2018); Gollakota et al., Renew. Sustain. Energy Rev. 81 (2018)",
    )
});

/// ΔG/ΔH(HHV) for a hydrogen fuel cell at 25 °C.
pub static FUEL_CELL_CEILING: LazyLock<PhysicsLimit> = LazyLock::new(|| {
    PhysicsLimit::new(
        "fuel cell thermodynamic efficiency (HHV)",
        constants::WATER_REVERSIBLE_VOLTAGE / constants::WATER_THERMONEUTRAL_VOLTAGE * 100.0,
        "%",
        "Larminie & Dicks, Fuel Cell Systems Explained, 2nd ed. (2003)",
    )
});

static BENCHMARKS: LazyLock<Vec<TechnologyBenchmarks>> = LazyLock::new(build_benchmarks);

/// Look up the benchmarks for a technology.
pub fn benchmarks(technology: Technology) -> &'static TechnologyBenchmarks {
    // The table is built from `Technology::ALL`, so every variant has an entry.
    &BENCHMARKS[technology as usize]
}

/// All benchmark entries in `Technology::ALL` order.
pub fn all_benchmarks() -> &'static [TechnologyBenchmarks] {
    &BENCHMARKS
}

/// Named physics limits used by the claim rules.
pub fn physics_limits() -> [&'static PhysicsLimit; 4] {
    [&SHOCKLEY_QUEISSER, &BETZ, &HTL_CEILING, &FUEL_CELL_CEILING]
}

fn carnot_ceiling(hot_k: f64, cold_k: f64, what: &str) -> PhysicsLimit {
    PhysicsLimit::new(
        what,
        (1.0 - cold_k / hot_k) * 100.0,
        "%",
        &format!("Carnot limit between {hot_k} K and {cold_k} K"),
    )
}

fn build_benchmarks() -> Vec<TechnologyBenchmarks> {
    const NREL_ATB: &str = "NREL Annual Technology Baseline";
    const LAZARD: &str = "Lazard Levelized Cost of Energy+";
    const PNNL: &str = "PNNL techno-economic design cases";
    const IEA_H2: &str = "IEA Global Hydrogen Review";
    const PNNL_STORAGE: &str = "PNNL Energy Storage Grand Challenge Cost and Performance";

    let entry = |technology: Technology,
                 efficiency_basis: &str,
                 efficiency_unit: &str,
                 efficiency: BenchmarkRange,
                 ceiling: PhysicsLimit,
                 capex_unit: &str,
                 capex: BenchmarkRange,
                 levelized_cost_unit: &str,
                 levelized_cost: BenchmarkRange,
                 capacity_factor: Option<BenchmarkRange>,
                 lifetime_years: BenchmarkRange| TechnologyBenchmarks {
        technology,
        efficiency_basis: efficiency_basis.to_string(),
        efficiency_unit: efficiency_unit.to_string(),
        efficiency,
        ceiling,
        capex_unit: capex_unit.to_string(),
        capex,
        levelized_cost_unit: levelized_cost_unit.to_string(),
        levelized_cost,
        capacity_factor,
        lifetime_years,
    };

    let mut table = Vec::with_capacity(Technology::ALL.len());

    table.push(entry(
        Technology::SolarPv,
        "commercial module efficiency, STC",
        "%",
        BenchmarkRange::new(15.0, 23.0, NREL_ATB, 2023),
        SHOCKLEY_QUEISSER.clone(),
        "$/kW",
        BenchmarkRange::new(800.0, 1400.0, NREL_ATB, 2023),
        "$/MWh",
        BenchmarkRange::new(24.0, 96.0, LAZARD, 2023),
        Some(BenchmarkRange::new(15.0, 30.0, NREL_ATB, 2023)),
        BenchmarkRange::new(25.0, 35.0, NREL_ATB, 2023),
    ));
    table.push(entry(
        Technology::OnshoreWind,
        "rotor power coefficient at rated conditions",
        "%",
        BenchmarkRange::new(35.0, 48.0, NREL_ATB, 2023),
        BETZ.clone(),
        "$/kW",
        BenchmarkRange::new(1300.0, 1900.0, NREL_ATB, 2023),
        "$/MWh",
        BenchmarkRange::new(24.0, 75.0, LAZARD, 2023),
        Some(BenchmarkRange::new(25.0, 50.0, NREL_ATB, 2023)),
        BenchmarkRange::new(20.0, 30.0, NREL_ATB, 2023),
    ));
    table.push(entry(
        Technology::OffshoreWind,
        "rotor power coefficient at rated conditions",
        "%",
        BenchmarkRange::new(40.0, 50.0, NREL_ATB, 2023),
        BETZ.clone(),
        "$/kW",
        BenchmarkRange::new(3000.0, 5000.0, NREL_ATB, 2023),
        "$/MWh",
        BenchmarkRange::new(72.0, 140.0, LAZARD, 2023),
        Some(BenchmarkRange::new(40.0, 55.0, NREL_ATB, 2023)),
        BenchmarkRange::new(25.0, 30.0, NREL_ATB, 2023),
    ));
    table.push(entry(
        Technology::HydrothermalLiquefaction,
        "biocrude energy recovery net of process energy, HHV",
        "%",
        BenchmarkRange::new(55.0, 75.0, PNNL, 2018),
        HTL_CEILING.clone(),
        "$/kW",
        BenchmarkRange::new(2500.0, 5500.0, PNNL, 2018),
        "$/GGE",
        BenchmarkRange::new(2.5, 5.0, PNNL, 2018),
        Some(BenchmarkRange::new(85.0, 92.0, PNNL, 2018)),
        BenchmarkRange::new(20.0, 30.0, PNNL, 2018),
    ));
    table.push(entry(
        Technology::Pyrolysis,
        "bio-oil energy recovery net of process energy, HHV",
        "%",
        BenchmarkRange::new(55.0, 70.0, PNNL, 2015),
        PhysicsLimit::new(
            "net energy efficiency",
            80.0,
            "%",
            "Bridgwater, Biomass Bioenergy 38 (2012)",
        ),
        "$/kW",
        BenchmarkRange::new(2000.0, 4500.0, PNNL, 2015),
        "$/GGE",
        BenchmarkRange::new(3.0, 6.0, PNNL, 2015),
        Some(BenchmarkRange::new(85.0, 90.0, PNNL, 2015)),
        BenchmarkRange::new(20.0, 30.0, PNNL, 2015),
    ));
    table.push(entry(
        Technology::Gasification,
        "cold gas efficiency",
        "%",
        BenchmarkRange::new(60.0, 80.0, NREL_ATB, 2021),
        PhysicsLimit::new(
            "cold gas efficiency",
            85.0,
            "%",
            "Higman & van der Burgt, Gasification, 2nd ed. (2008)",
        ),
        "$/kW",
        BenchmarkRange::new(3000.0, 6000.0, NREL_ATB, 2021),
        "$/MWh",
        BenchmarkRange::new(80.0, 160.0, LAZARD, 2023),
        Some(BenchmarkRange::new(80.0, 90.0, NREL_ATB, 2021)),
        BenchmarkRange::new(20.0, 30.0, NREL_ATB, 2021),
    ));
    table.push(entry(
        Technology::AnaerobicDigestion,
        "biogas energy recovery of feedstock volatile solids",
        "%",
        BenchmarkRange::new(35.0, 60.0, "IEA Bioenergy Task 37", 2020),
        PhysicsLimit::new(
            "biogas energy recovery",
            70.0,
            "%",
            "Buswell stoichiometric methane potential, Symons & Buswell (1933)",
        ),
        "$/kW",
        BenchmarkRange::new(4000.0, 7500.0, NREL_ATB, 2021),
        "$/MWh",
        BenchmarkRange::new(70.0, 150.0, LAZARD, 2023),
        Some(BenchmarkRange::new(80.0, 90.0, NREL_ATB, 2021)),
        BenchmarkRange::new(15.0, 25.0, NREL_ATB, 2021),
    ));
    table.push(entry(
        Technology::PemElectrolysis,
        "system efficiency, HHV",
        "%",
        BenchmarkRange::new(65.0, 80.0, IEA_H2, 2023),
        PhysicsLimit::new(
            "electrolyzer efficiency at thermoneutral voltage (HHV)",
            100.0,
            "%",
            "ΔH_HHV / 2F = 1.481 V thermoneutral voltage",
        ),
        "$/kW",
        BenchmarkRange::new(1000.0, 1800.0, IEA_H2, 2023),
        "$/kg",
        BenchmarkRange::new(4.0, 7.0, IEA_H2, 2023),
        Some(BenchmarkRange::new(40.0, 95.0, IEA_H2, 2023)),
        BenchmarkRange::new(20.0, 30.0, IEA_H2, 2023),
    ));
    table.push(entry(
        Technology::AlkalineElectrolysis,
        "system efficiency, HHV",
        "%",
        BenchmarkRange::new(63.0, 77.0, IEA_H2, 2023),
        PhysicsLimit::new(
            "electrolyzer efficiency at thermoneutral voltage (HHV)",
            100.0,
            "%",
            "ΔH_HHV / 2F = 1.481 V thermoneutral voltage",
        ),
        "$/kW",
        BenchmarkRange::new(700.0, 1400.0, IEA_H2, 2023),
        "$/kg",
        BenchmarkRange::new(3.5, 6.5, IEA_H2, 2023),
        Some(BenchmarkRange::new(40.0, 95.0, IEA_H2, 2023)),
        BenchmarkRange::new(20.0, 30.0, IEA_H2, 2023),
    ));
    table.push(entry(
        Technology::SolidOxideElectrolysis,
        "electrical efficiency with external heat, HHV",
        "%",
        BenchmarkRange::new(80.0, 95.0, IEA_H2, 2023),
        PhysicsLimit::new(
            "electrolyzer electrical efficiency (HHV)",
            100.0,
            "%",
            "ΔH_HHV / 2F = 1.481 V thermoneutral voltage",
        ),
        "$/kW",
        BenchmarkRange::new(2000.0, 5600.0, IEA_H2, 2023),
        "$/kg",
        BenchmarkRange::new(4.5, 8.0, IEA_H2, 2023),
        Some(BenchmarkRange::new(60.0, 95.0, IEA_H2, 2023)),
        BenchmarkRange::new(10.0, 20.0, IEA_H2, 2023),
    ));
    table.push(entry(
        Technology::PemFuelCell,
        "stack electrical efficiency, LHV",
        "%",
        BenchmarkRange::new(40.0, 60.0, "US DOE Hydrogen Program Record", 2020),
        FUEL_CELL_CEILING.clone(),
        "$/kW",
        BenchmarkRange::new(1000.0, 3000.0, "US DOE Hydrogen Program Record", 2020),
        "$/MWh",
        BenchmarkRange::new(120.0, 300.0, LAZARD, 2023),
        Some(BenchmarkRange::new(30.0, 90.0, NREL_ATB, 2021)),
        BenchmarkRange::new(5.0, 10.0, "US DOE Hydrogen Program Record", 2020),
    ));
    table.push(entry(
        Technology::LithiumIonStorage,
        "AC round-trip efficiency",
        "%",
        BenchmarkRange::new(85.0, 95.0, PNNL_STORAGE, 2022),
        PhysicsLimit::new(
            "battery DC round-trip efficiency",
            98.0,
            "%",
            "Coulombic and voltage efficiency bound, PNNL-33283 (2022)",
        ),
        "$/kWh",
        BenchmarkRange::new(250.0, 450.0, PNNL_STORAGE, 2022),
        "$/MWh",
        BenchmarkRange::new(120.0, 250.0, LAZARD, 2023),
        Some(BenchmarkRange::new(10.0, 25.0, PNNL_STORAGE, 2022)),
        BenchmarkRange::new(10.0, 20.0, PNNL_STORAGE, 2022),
    ));
    table.push(entry(
        Technology::FlowBatteryStorage,
        "AC round-trip efficiency",
        "%",
        BenchmarkRange::new(65.0, 80.0, PNNL_STORAGE, 2022),
        PhysicsLimit::new(
            "flow battery DC round-trip efficiency",
            90.0,
            "%",
            "Vanadium redox voltage efficiency bound, PNNL-33283 (2022)",
        ),
        "$/kWh",
        BenchmarkRange::new(350.0, 700.0, PNNL_STORAGE, 2022),
        "$/MWh",
        BenchmarkRange::new(150.0, 300.0, LAZARD, 2023),
        Some(BenchmarkRange::new(10.0, 30.0, PNNL_STORAGE, 2022)),
        BenchmarkRange::new(20.0, 30.0, PNNL_STORAGE, 2022),
    ));
    table.push(entry(
        Technology::PumpedHydro,
        "AC round-trip efficiency",
        "%",
        BenchmarkRange::new(70.0, 85.0, PNNL_STORAGE, 2022),
        PhysicsLimit::new(
            "pumped hydro round-trip efficiency",
            90.0,
            "%",
            "Pump-turbine hydraulic efficiency bound, PNNL-33283 (2022)",
        ),
        "$/kW",
        BenchmarkRange::new(1500.0, 4000.0, PNNL_STORAGE, 2022),
        "$/MWh",
        BenchmarkRange::new(100.0, 200.0, LAZARD, 2023),
        Some(BenchmarkRange::new(10.0, 30.0, PNNL_STORAGE, 2022)),
        BenchmarkRange::new(50.0, 100.0, PNNL_STORAGE, 2022),
    ));
    table.push(entry(
        Technology::CombinedCycleGas,
        "net electrical efficiency, LHV",
        "%",
        BenchmarkRange::new(50.0, 63.0, NREL_ATB, 2023),
        carnot_ceiling(1700.0, 300.0, "combined cycle Carnot limit"),
        "$/kW",
        BenchmarkRange::new(900.0, 1300.0, NREL_ATB, 2023),
        "$/MWh",
        BenchmarkRange::new(39.0, 101.0, LAZARD, 2023),
        Some(BenchmarkRange::new(40.0, 60.0, NREL_ATB, 2023)),
        BenchmarkRange::new(30.0, 40.0, NREL_ATB, 2023),
    ));
    table.push(entry(
        Technology::Geothermal,
        "net electrical efficiency of brine heat",
        "%",
        BenchmarkRange::new(10.0, 17.0, NREL_ATB, 2023),
        carnot_ceiling(450.0, 300.0, "geothermal Carnot limit"),
        "$/kW",
        BenchmarkRange::new(3000.0, 6000.0, NREL_ATB, 2023),
        "$/MWh",
        BenchmarkRange::new(61.0, 102.0, LAZARD, 2023),
        Some(BenchmarkRange::new(80.0, 95.0, NREL_ATB, 2023)),
        BenchmarkRange::new(30.0, 50.0, NREL_ATB, 2023),
    ));
    table.push(entry(
        Technology::HeatPump,
        "seasonal coefficient of performance",
        "COP",
        BenchmarkRange::new(2.5, 4.5, "IEA Heat Pumps Report", 2022),
        PhysicsLimit::new(
            "Carnot coefficient of performance",
            308.15 / (308.15 - 273.15),
            "COP",
            "Carnot heat pump between 0 °C source and 35 °C sink",
        ),
        "$/kW",
        BenchmarkRange::new(500.0, 1500.0, "IEA Heat Pumps Report", 2022),
        "$/MWh",
        BenchmarkRange::new(40.0, 120.0, "IEA Heat Pumps Report", 2022),
        Some(BenchmarkRange::new(20.0, 40.0, "IEA Heat Pumps Report", 2022)),
        BenchmarkRange::new(15.0, 25.0, "IEA Heat Pumps Report", 2022),
    ));

    table
}
