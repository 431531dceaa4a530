//! Built-in validation rule table.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    ClaimCategory, ClaimPattern, ConfidenceLevel, NamedBenchmark, PhysicsCeiling, RedFlag,
    RiskLevel, ValidationMethod, ValidationRule,
};
use crate::efficiency::{ConversionProcess, EfficiencyModel};
use crate::reference::{
    self, BETZ, BenchmarkRange, FUEL_CELL_CEILING, HTL_CEILING, PhysicsLimit, SHOCKLEY_QUEISSER,
    Technology,
};

static RULES: LazyLock<Vec<ValidationRule>> = LazyLock::new(build_default_rules);

/// The rule table, in match order (specific rules first).
pub fn rules() -> &'static [ValidationRule] {
    &RULES
}

fn regex(pattern: &str) -> ClaimPattern {
    // Patterns are compile-time literals covered by the rule table tests.
    ClaimPattern::Regex(Regex::new(pattern).expect("built-in claim pattern compiles"))
}

fn ceiling_from(limit: &PhysicsLimit) -> PhysicsCeiling {
    PhysicsCeiling {
        metric: limit.name.clone(),
        maximum: limit.value,
        unit: limit.unit.clone(),
        citation: limit.citation.clone(),
    }
}

fn efficiency_benchmark(name: &str, technology: Technology) -> NamedBenchmark {
    let entry = reference::benchmarks(technology);
    NamedBenchmark {
        name: name.to_string(),
        unit: entry.efficiency_unit.clone(),
        range: entry.efficiency.clone(),
    }
}

fn flag(condition: &str) -> RedFlag {
    RedFlag {
        condition: condition.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::vec_init_then_push)]
fn build_default_rules() -> Vec<ValidationRule> {
    let mut rules = Vec::new();

    rules.push(ValidationRule {
        id: "solar-pv-efficiency".into(),
        pattern: regex(
            r"(?i)\b(?:solar|photovoltaic|pv|perovskite)\b.*efficien|efficien.*\b(?:solar|photovoltaic|pv|perovskite)\b",
        ),
        category: ClaimCategory::Efficiency,
        method: ValidationMethod::PhysicsBound,
        benchmarks: vec![
            efficiency_benchmark("commercial module efficiency", Technology::SolarPv),
            NamedBenchmark {
                name: "record single-junction cell efficiency".into(),
                unit: "%".into(),
                range: BenchmarkRange::new(26.0, 27.5, "NREL Best Research-Cell Efficiency Chart", 2024),
            },
        ],
        ceiling: Some(ceiling_from(&SHOCKLEY_QUEISSER)),
        model: Some(EfficiencyModel::DetailedBalance),
        interpretation: "Single-junction cells cannot exceed the detailed-balance limit; tandem or concentrator claims must say so explicitly.".into(),
        steps: strings(&[
            "Confirm whether the figure is cell, module or system efficiency",
            "Confirm test conditions (STC, AM1.5G, concentration)",
            "Compare with the NREL best research-cell chart for the same architecture",
        ]),
        risk: RiskLevel::High,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("No independent certification of the efficiency measurement"),
            flag("Laboratory cell result presented as module efficiency"),
            flag("Device area and stability not reported"),
        ],
        data_requests: strings(&[
            "Independent I-V test certificate (NREL, Fraunhofer ISE or equivalent)",
            "Module datasheet with STC ratings and temperature coefficients",
        ]),
    });

    rules.push(ValidationRule {
        id: "wind-power-coefficient".into(),
        pattern: regex(
            r"(?i)\b(?:wind|rotor|blade)s?\b.*(?:efficien|power coefficient|capture)|(?:efficien|power coefficient).*\bwind\b",
        ),
        category: ClaimCategory::Efficiency,
        method: ValidationMethod::PhysicsBound,
        benchmarks: vec![
            efficiency_benchmark("onshore rotor power coefficient", Technology::OnshoreWind),
            efficiency_benchmark("offshore rotor power coefficient", Technology::OffshoreWind),
        ],
        ceiling: Some(ceiling_from(&BETZ)),
        model: Some(EfficiencyModel::WindTurbine),
        interpretation: "No open rotor can extract more than 16/27 of the kinetic energy flux through its swept area.".into(),
        steps: strings(&[
            "Check the power curve against IEC 61400-12 measurements",
            "Confirm the reference area is the full swept area",
        ]),
        risk: RiskLevel::High,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("Efficiency quoted without a measured power curve"),
            flag("Ducted or shrouded design compared against rotor area only"),
        ],
        data_requests: strings(&[
            "IEC 61400-12 power performance test report",
            "Rotor diameter and rated wind speed",
        ]),
    });

    rules.push(ValidationRule {
        id: "electrolyzer-efficiency".into(),
        pattern: regex(
            r"(?i)electroly[sz]\w*.*efficien|efficien.*electroly[sz]|hydrogen production efficien",
        ),
        category: ClaimCategory::Efficiency,
        method: ValidationMethod::PhysicsBound,
        benchmarks: vec![
            efficiency_benchmark("PEM system efficiency (HHV)", Technology::PemElectrolysis),
            efficiency_benchmark(
                "alkaline system efficiency (HHV)",
                Technology::AlkalineElectrolysis,
            ),
            efficiency_benchmark(
                "solid oxide system efficiency (HHV)",
                Technology::SolidOxideElectrolysis,
            ),
        ],
        ceiling: Some(PhysicsCeiling {
            metric: "electrolysis system efficiency (HHV, electricity only)".into(),
            maximum: 100.0,
            unit: "%".into(),
            citation: "First law: 39.4 kWh/kg H2 (HHV) at the thermoneutral voltage of 1.481 V".into(),
        }),
        model: Some(EfficiencyModel::Electrolyzer),
        interpretation: "Above-100% HHV figures require uncounted heat input; LHV and HHV bases differ by 18%.".into(),
        steps: strings(&[
            "Identify the heating-value basis (LHV or HHV)",
            "Check whether balance-of-plant loads are included",
            "Convert to kWh per kg H2 and compare with 39.4 kWh/kg",
        ]),
        risk: RiskLevel::High,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("Heating-value basis not stated"),
            flag("Stack efficiency presented as system efficiency"),
            flag("No degradation data at rated current density"),
        ],
        data_requests: strings(&[
            "Polarization curve and operating current density",
            "System energy consumption in kWh/kg H2 including balance of plant",
        ]),
    });

    rules.push(ValidationRule {
        id: "fuel-cell-efficiency".into(),
        pattern: regex(r"(?i)fuel[\s-]?cells?\b.*efficien|efficien.*fuel[\s-]?cell"),
        category: ClaimCategory::Efficiency,
        method: ValidationMethod::PhysicsBound,
        benchmarks: vec![efficiency_benchmark(
            "PEM fuel cell system efficiency",
            Technology::PemFuelCell,
        )],
        ceiling: Some(ceiling_from(&FUEL_CELL_CEILING)),
        model: Some(EfficiencyModel::FuelCell),
        interpretation: "Electrical efficiency is bounded by ΔG/ΔH; combined heat and power figures count heat too.".into(),
        steps: strings(&[
            "Separate electrical efficiency from combined heat and power efficiency",
            "Confirm the heating-value basis",
        ]),
        risk: RiskLevel::High,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("CHP efficiency quoted as electrical efficiency"),
            flag("Heating-value basis not stated"),
        ],
        data_requests: strings(&["Polarization curve and stack voltage at rated power"]),
    });

    rules.push(ValidationRule {
        id: "storage-round-trip".into(),
        pattern: regex(
            r"(?i)round[\s-]?trip|\b(?:battery|batteries|storage)\b.*efficien|efficien.*\b(?:battery|storage)\b",
        ),
        category: ClaimCategory::Efficiency,
        method: ValidationMethod::Benchmark,
        benchmarks: vec![
            efficiency_benchmark("lithium-ion AC round trip", Technology::LithiumIonStorage),
            efficiency_benchmark("flow battery AC round trip", Technology::FlowBatteryStorage),
            efficiency_benchmark("pumped hydro round trip", Technology::PumpedHydro),
        ],
        ceiling: Some(PhysicsCeiling {
            metric: "electrochemical round-trip efficiency (DC)".into(),
            maximum: 98.0,
            unit: "%".into(),
            citation: "Best reported lithium-ion DC round trip, PNNL Energy Storage Grand Challenge (2022)".into(),
        }),
        model: None,
        interpretation: "Round trip must be quoted AC-to-AC at a stated C-rate and temperature.".into(),
        steps: strings(&[
            "Confirm AC or DC boundary",
            "Confirm C-rate, depth of discharge and ambient temperature",
        ]),
        risk: RiskLevel::Medium,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("DC efficiency presented as AC round trip"),
            flag("Test C-rate not disclosed"),
        ],
        data_requests: strings(&["Round-trip test report with C-rate and auxiliary loads"]),
    });

    rules.push(ValidationRule {
        id: "htl-conversion-efficiency".into(),
        pattern: regex(
            r"(?i)\b(?:conversion|biocrude|bio-crude|liquefaction|htl|energy recovery)\b.*efficien|efficien\w*.*\b(?:biocrude|bio-crude|liquefaction|htl|conversion)\b",
        ),
        category: ClaimCategory::Efficiency,
        method: ValidationMethod::PhysicsBound,
        benchmarks: vec![
            efficiency_benchmark("HTL net energy efficiency", Technology::HydrothermalLiquefaction),
            efficiency_benchmark("fast pyrolysis net energy efficiency", Technology::Pyrolysis),
        ],
        ceiling: Some(ceiling_from(&HTL_CEILING)),
        model: Some(EfficiencyModel::Thermochemical(ConversionProcess::Htl)),
        interpretation: "Net energy efficiency counts biocrude energy out minus process energy in, over feedstock energy; mass yield and carbon efficiency are different quantities.".into(),
        steps: strings(&[
            "Determine whether the figure is mass yield, carbon efficiency or energy efficiency",
            "Obtain the full energy balance including process heat",
            "Compare with PNNL HTL design cases",
        ]),
        risk: RiskLevel::Critical,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("Process heat and power excluded from the energy balance"),
            flag("Mass yield conflated with energy efficiency"),
            flag("Results from batch reactors extrapolated to continuous operation"),
        ],
        data_requests: strings(&[
            "Complete mass and energy balance for a continuous run",
            "Feedstock and biocrude higher heating values",
        ]),
    });

    rules.push(ValidationRule {
        id: "heat-pump-cop".into(),
        pattern: regex(r"(?i)heat[\s-]?pump|\bcop\b|coefficient of performance"),
        category: ClaimCategory::Performance,
        method: ValidationMethod::Benchmark,
        benchmarks: vec![NamedBenchmark {
            name: "seasonal COP, air-source".into(),
            unit: reference::benchmarks(Technology::HeatPump).efficiency_unit.clone(),
            range: reference::benchmarks(Technology::HeatPump).efficiency.clone(),
        }],
        ceiling: None,
        model: None,
        interpretation: "COP is bounded by the Carnot COP of the source and sink temperatures.".into(),
        steps: strings(&["Obtain source and sink temperatures for the quoted COP"]),
        risk: RiskLevel::Medium,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![flag("COP quoted without source and sink temperatures")],
        data_requests: strings(&["Test report to EN 14511 or AHRI 550/590"]),
    });

    rules.push(ValidationRule {
        id: "heat-engine-efficiency".into(),
        pattern: regex(
            r"(?i)\b(?:thermal|heat engine|gas turbine|steam turbine|combined cycle|power plant|cycle)\b.*efficien|efficien.*\b(?:thermal|heat engine|turbine|power cycle)\b",
        ),
        category: ClaimCategory::Efficiency,
        method: ValidationMethod::PhysicsBound,
        benchmarks: vec![efficiency_benchmark(
            "combined-cycle net efficiency (LHV)",
            Technology::CombinedCycleGas,
        )],
        ceiling: None,
        model: Some(EfficiencyModel::HeatEngine),
        interpretation: "Any heat engine is bounded by the Carnot efficiency of its reservoir temperatures.".into(),
        steps: strings(&[
            "Obtain peak cycle and heat rejection temperatures",
            "Compare with the Carnot and Curzon–Ahlborn efficiencies",
        ]),
        risk: RiskLevel::High,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("Reservoir temperatures not disclosed"),
            flag("Gross output quoted instead of net"),
        ],
        data_requests: strings(&["Heat balance diagram with temperatures and net output"]),
    });

    rules.push(ValidationRule {
        id: "carbon-neutrality".into(),
        pattern: regex(
            r"(?i)carbon[\s-]?(?:neutral|negative|free)|net[\s-]?zero|climate[\s-]?(?:neutral|positive)",
        ),
        category: ClaimCategory::Environmental,
        method: ValidationMethod::DataRequest,
        benchmarks: Vec::new(),
        ceiling: None,
        model: None,
        interpretation: "Neutrality requires a cradle-to-grave lifecycle boundary with every offset disclosed.".into(),
        steps: strings(&[
            "Obtain an ISO 14040/14044 lifecycle assessment",
            "Check system boundary and functional unit",
            "Separate avoided emissions and purchased offsets from operational emissions",
        ]),
        risk: RiskLevel::High,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("No cradle-to-grave lifecycle assessment"),
            flag("Neutrality relies on offsets or unverified credits"),
            flag("Scope 3 emissions excluded from the boundary"),
            flag("Biogenic carbon counted as zero without land-use change analysis"),
        ],
        data_requests: strings(&[
            "Third-party reviewed lifecycle assessment (ISO 14040/14044)",
            "Scope 1, 2 and 3 emissions inventory",
            "Registry records for any offsets",
        ]),
    });

    rules.push(ValidationRule {
        id: "zero-emissions".into(),
        pattern: regex(r"(?i)zero[\s-]?emissions?|emissions?[\s-]free|no emissions"),
        category: ClaimCategory::Environmental,
        method: ValidationMethod::DataRequest,
        benchmarks: Vec::new(),
        ceiling: None,
        model: None,
        interpretation: "Usually true only at the point of use; upstream and manufacturing emissions remain.".into(),
        steps: strings(&["Identify the emission boundary the claim applies to"]),
        risk: RiskLevel::Medium,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("Only tailpipe or stack emissions considered"),
            flag("Electricity or hydrogen supply emissions ignored"),
        ],
        data_requests: strings(&["Lifecycle emissions per functional unit"]),
    });

    rules.push(ValidationRule {
        id: "cost-competitiveness".into(),
        pattern: regex(
            r"(?i)cost[\s-]?competitive|cost parity|grid parity|cheaper than|lower cost than|\blcoe\b|levelized cost|\$\s*\d+(?:\.\d+)?\s*/\s*(?:kwh|mwh|kg|gal|gge)",
        ),
        category: ClaimCategory::Cost,
        method: ValidationMethod::Benchmark,
        benchmarks: Vec::new(),
        ceiling: None,
        model: None,
        interpretation: "Cost claims are meaningful only with the discount rate, capacity factor and year of the comparison.".into(),
        steps: strings(&[
            "Rebuild the levelized cost from capex, opex, capacity factor and discount rate",
            "Compare with Lazard LCOE+ and NREL ATB for the same year",
        ]),
        risk: RiskLevel::High,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("Nth-of-a-kind cost presented as current cost"),
            flag("Subsidies or tax credits embedded in the figure"),
            flag("Discount rate not disclosed"),
        ],
        data_requests: strings(&[
            "Techno-economic model with capex, opex and financing assumptions",
            "Vendor quotes supporting the capital cost",
        ]),
    });

    rules.push(ValidationRule {
        id: "scalability".into(),
        pattern: regex(
            r"(?i)scal(?:able|ability|e[\s-]?up)|commercial[\s-]scale|gigawatt|mass production|gigafactory",
        ),
        category: ClaimCategory::Scalability,
        method: ValidationMethod::ExpertReview,
        benchmarks: Vec::new(),
        ceiling: None,
        model: None,
        interpretation: "Scale-up risk rises with each order of magnitude beyond the largest unit operated.".into(),
        steps: strings(&[
            "Identify the largest unit operated and its run hours",
            "Check critical material and supply-chain constraints",
        ]),
        risk: RiskLevel::Medium,
        default_confidence: ConfidenceLevel::Low,
        red_flags: vec![
            flag("Largest demonstrated unit not disclosed"),
            flag("Critical materials supply not assessed"),
        ],
        data_requests: strings(&["Scale-up roadmap with unit sizes and run hours"]),
    });

    rules.push(ValidationRule {
        id: "technology-readiness".into(),
        pattern: regex(
            r"(?i)\btrl\b|technology readiness|commercially (?:ready|available|proven|viable)|market[\s-]ready|field[\s-]proven",
        ),
        category: ClaimCategory::Maturity,
        method: ValidationMethod::DataRequest,
        benchmarks: Vec::new(),
        ceiling: None,
        model: None,
        interpretation: "TRL 7+ requires a prototype demonstrated in an operational environment.".into(),
        steps: strings(&[
            "Map evidence to DOE TRL definitions",
            "Confirm hours of operation in a relevant environment",
        ]),
        risk: RiskLevel::Medium,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("No operating hours in a relevant environment"),
            flag("No paying customer or offtake agreement"),
        ],
        data_requests: strings(&["Pilot or demonstration operating logs"]),
    });

    rules.push(ValidationRule {
        id: "capacity-factor".into(),
        pattern: regex(r"(?i)capacity factor|availability|uptime"),
        category: ClaimCategory::Performance,
        method: ValidationMethod::Benchmark,
        benchmarks: Vec::new(),
        ceiling: Some(PhysicsCeiling {
            metric: "capacity factor".into(),
            maximum: 100.0,
            unit: "%".into(),
            citation: "Definition: annual energy over nameplate power times 8760 h".into(),
        }),
        model: None,
        interpretation: "Capacity factor is resource-limited for variable renewables.".into(),
        steps: strings(&["Obtain metered annual generation and nameplate rating"]),
        risk: RiskLevel::Medium,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![flag("Modeled rather than metered output")],
        data_requests: strings(&["Twelve months of metered output"]),
    });

    rules.push(ValidationRule {
        id: "lifetime-degradation".into(),
        pattern: regex(
            r"(?i)lifetime|life[\s-]?span|cycle life|degradation|warranty|\d+\s*(?:years|cycles)\b",
        ),
        category: ClaimCategory::Durability,
        method: ValidationMethod::Benchmark,
        benchmarks: Vec::new(),
        ceiling: None,
        model: None,
        interpretation: "Lifetime claims need accelerated testing with a validated acceleration factor or field history.".into(),
        steps: strings(&[
            "Obtain accelerated aging protocol and results",
            "Compare warranty terms with the claimed lifetime",
        ]),
        risk: RiskLevel::Medium,
        default_confidence: ConfidenceLevel::Medium,
        red_flags: vec![
            flag("Lifetime extrapolated from short tests"),
            flag("Warranty shorter than claimed lifetime"),
        ],
        data_requests: strings(&["Accelerated life test report", "Warranty terms"]),
    });

    rules.push(ValidationRule {
        id: "generic-efficiency".into(),
        pattern: regex(r"(?i)efficien"),
        category: ClaimCategory::Efficiency,
        method: ValidationMethod::PhysicsBound,
        benchmarks: Vec::new(),
        ceiling: Some(PhysicsCeiling {
            metric: "energy conversion efficiency".into(),
            maximum: 100.0,
            unit: "%".into(),
            citation: "First law of thermodynamics".into(),
        }),
        model: None,
        interpretation: "Identify the conversion process and system boundary before comparing.".into(),
        steps: strings(&["Identify input and output energy forms and the system boundary"]),
        risk: RiskLevel::Medium,
        default_confidence: ConfidenceLevel::Low,
        red_flags: vec![flag("System boundary not defined")],
        data_requests: strings(&["Energy balance for the claimed process"]),
    });

    rules
}
