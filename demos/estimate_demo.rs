use std::error::Error;

use subsystem_cost::allocation::MassAllocation;
use subsystem_cost::calibration::MISSION_PROFILES;
use subsystem_cost::sheet::{DD_COST_COLUMN, FLIGHT_UNIT_COST_COLUMN, TOTAL_COST_COLUMN, WEIGHT_COLUMN};
use subsystem_cost::{AmcmModel, AnalysisSession, Cell, EstimatorConfig, InflationIndex, MassUnit, RawSheet};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
base_year = 1999
target_year = 2025
mass_unit = "kg"

[amcm]
quantity = 2
dry_mass = 450.0
mission_type = 3
ioc_year = 2028
difficulty = 3
"#;

fn structural_sheet() -> RawSheet {
    let mut sheet = RawSheet::new(
        "Structural/Mechanical Group",
        &["Mission", "WBS Element", WEIGHT_COLUMN, DD_COST_COLUMN, FLIGHT_UNIT_COST_COLUMN, TOTAL_COST_COLUMN],
    );
    sheet.push_row(vec!["Apollo".into(), "Structure".into(), 100.0.into(), 10.0.into(), 5.0.into(), 15.0.into()]);
    sheet.push_row(vec!["Gemini".into(), "Structure".into(), 200.0.into(), 20.0.into(), 15.0.into(), 35.0.into()]);
    sheet.push_row(vec!["Gemini".into(), "Mechanisms".into(), 50.0.into(), 4.0.into(), 1.0.into(), Cell::Empty]);
    sheet.push_row(vec!["Skylab".into(), "Deployables".into(), 80.0.into(), "TBD".into(), 3.0.into(), Cell::Empty]);
    sheet
}

fn thermal_sheet() -> RawSheet {
    let mut sheet = RawSheet::new("Thermal Control", &["Mission", "Component", WEIGHT_COLUMN]);
    sheet.push_row(vec!["Apollo".into(), "Radiator".into(), 40.0.into()]);
    sheet
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Subsystem Cost Estimate Demo ===\n");

    let config = EstimatorConfig::from_toml_str(CONFIG)?;
    let index = InflationIndex::fallback();
    let sheets = [structural_sheet(), thermal_sheet()];

    for raw in &sheets {
        let summary = raw.summary();
        println!("{}: {} missions, {} rows", raw.name, summary.missions, summary.rows);
    }

    let structural = sheets[0].resolve()?;
    let mut session = AnalysisSession::new(config.clone());
    session.add_merge(&structural, "Mechanisms & Deployables", &["Mechanisms", "Deployables"])?;
    session.set_allocation(
        &structural.name,
        MassAllocation::new(180.0, MassUnit::Kilograms)
            .with_group("Structure", 120.0)
            .with_group("Mechanisms & Deployables", 60.0),
    );

    let report = session.analyze(&sheets, &index)?;
    println!(
        "\nRevision {} | escalation {} -> {} (x{:.3})",
        report.revision, report.escalation.base_year, report.escalation.target_year, report.escalation.factor
    );

    for analysis in &report.analyses {
        println!("\n{}", analysis.sheet);
        println!("{}", "-".repeat(40));
        for est in &analysis.estimates {
            println!(
                "  {:<28} n={} mass={:>8.1} lbs  total={:>8.2}  adjusted={:>8.2}",
                est.group, est.count, est.user_mass_lbs, est.total_cost_new, est.adjusted.total_cost_new
            );
        }
        for converted in analysis.in_currency(&config.currency) {
            println!(
                "  {:<28} adjusted={:>8.2} {}",
                converted.group, converted.costs.total_cost_new, converted.currency
            );
        }
        for caveat in &analysis.caveats {
            println!("  caveat: {caveat:?}");
        }
    }

    for skipped in &report.skipped {
        println!("\nSkipped {}: {}", skipped.sheet, skipped.reason);
    }

    println!(
        "\nRollup: {:.2} (reference year), {:.2} (adjusted)",
        report.rollup.total_cost(),
        report.rollup.adjusted_total_cost()
    );

    println!("\n=== AMCM ===");
    let input = config.amcm_input()?;
    let target = report.escalation.target_year;
    let result = AmcmModel::default().estimate(&input, &index, target)?;
    println!(
        "{} ({}), {:.0} lbs / {:.0} kg",
        result.mission_type,
        input.difficulty.display_name(),
        result.weight_lbs,
        result.weight_kg
    );
    println!(
        "Base {:.2} M ({}) -> {:.2} M ({}), adjustment {:+.2} M",
        result.base_cost,
        result.reference_year,
        result.adjusted_cost,
        target,
        result.inflation_adjustment()
    );
    println!("{} mission profiles available", MISSION_PROFILES.len());

    Ok(())
}
