use crate::safety::SafetyLimits;
use crate::simulation::DosingPlan;
use crate::error::VancoResult;
use std::path::Path;
use std::fs::File;
use log::info;

pub fn save_results<P: AsRef<Path>>(plan: &DosingPlan, limits: &SafetyLimits, output_dir: P) -> VancoResult<()> {
    let output_path = output_dir.as_ref();

    save_dose_table(plan, &output_path.join("dose_table.csv"))?;

    // Only written when a regimen was selected
    save_concentration_data(plan, &output_path.join("concentrations.csv"))?;

    save_plan_summary(plan, &output_path.join("dosing_plan.json"))?;

    generate_report(plan, limits, output_path)?;

    info!("All results saved to {:?}", output_path);
    Ok(())
}

fn save_dose_table<P: AsRef<Path>>(plan: &DosingPlan, path: P) -> VancoResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "FREQUENCY", "DOSE_MG", "MG_PER_KG", "AUC24", "PEAK", "TROUGH", "ASSESSMENT", "DOSE_LIMITS"
    ])?;

    for reviewed in &plan.candidates {
        let c = &reviewed.candidate;
        writer.write_record(&[
            plan.frequency.to_string(),
            c.dose_mg.to_string(),
            c.mg_per_kg.to_string(),
            format!("{:.1}", c.auc24),
            format!("{:.2}", c.peak),
            format!("{:.2}", c.trough),
            format!("{:?}", reviewed.assessment),
            format!("{:?}", reviewed.dose_limits),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn save_concentration_data<P: AsRef<Path>>(plan: &DosingPlan, path: P) -> VancoResult<()> {
    let Some(selected) = &plan.selected else {
        return Ok(());
    };

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["TIME", "CONCENTRATION"])?;

    for obs in &selected.curve.observations {
        writer.write_record(&[obs.time.to_string(), format!("{:.3}", obs.concentration)])?;
    }

    writer.flush()?;
    Ok(())
}

fn save_plan_summary<P: AsRef<Path>>(plan: &DosingPlan, path: P) -> VancoResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, plan)?;
    Ok(())
}

/// Markdown summary of the calculation.
pub fn generate_report<P: AsRef<Path>>(plan: &DosingPlan, limits: &SafetyLimits, output_dir: P) -> VancoResult<()> {
    let report_path = output_dir.as_ref().join("dosing_report.md");

    let mut table = String::new();
    for reviewed in &plan.candidates {
        let c = &reviewed.candidate;
        table.push_str(&format!(
            "| {} mg ({} mg/kg) | {:.0} | {:.1} | {:.1} | {:?} |\n",
            c.dose_mg, c.mg_per_kg, c.auc24, c.peak, c.trough, reviewed.assessment
        ));
    }

    let selected = match &plan.selected {
        Some(s) => format!(
            "- **Regimen**: {} mg {} (over {} hr), {:?}\n\
             - **AUC24**: {:.1} mcg*hr/mL\n\
             - **Peak**: {:.1} mcg/mL\n\
             - **Trough**: {:.1} mcg/mL\n\
             - **Trough target** ({} mcg/mL): {}\n\
             - **Curve Cmax**: {:.1} mcg/mL at {} h, {} of {} points in the trough target\n",
            s.evaluation.dose_mg,
            plan.frequency,
            s.evaluation.infusion_hours,
            s.source,
            s.evaluation.auc24,
            s.evaluation.peak,
            s.evaluation.trough,
            limits.target_trough,
            if limits.target_trough.contains(s.evaluation.trough) { "met" } else { "not met" },
            s.curve.max_concentration(),
            s.curve.time_to_max().unwrap_or(0.0),
            s.curve.points_within(&limits.target_trough),
            s.curve.observations.len(),
        ),
        None => "No candidate reached the suggested AUC24 band.\n".to_string(),
    };

    let report_content = format!(
        r#"# Vancomycin Dosing Report

Generated: {}

## Patient Metrics
- **Sex**: {}
- **Age**: {} yrs
- **Total BW**: {:.1} kg
- **Ideal BW**: {:.1} kg
- **Adjusted BW**: {:.1} kg
- **BSA**: {:.2} m2
- **CrCl**: {:.1} mL/min ({:?})

## PK Parameters
- **Vd**: {:.2} L
- **CL**: {:.3} L/hr
- **k**: {:.4} 1/hr (half-life {:.1} hr)

## Candidate Doses ({})
| Dose | AUC24 | Peak | Trough | Assessment |
|------|-------|------|--------|------------|
{}
## Selected Regimen
{}"#,
        plan.generated_at.to_rfc3339(),
        plan.covariates.sex,
        plan.covariates.age_years,
        plan.covariates.weight_kg,
        plan.metrics.ideal_body_weight,
        plan.metrics.adjusted_body_weight,
        plan.metrics.body_surface_area,
        plan.metrics.creatinine_clearance,
        plan.renal_status,
        plan.pk.vd,
        plan.pk.cl,
        plan.pk.k,
        plan.pk.half_life(),
        plan.frequency,
        table,
        selected,
    );

    std::fs::write(report_path, report_content)?;
    Ok(())
}
