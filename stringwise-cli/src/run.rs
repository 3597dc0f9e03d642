use serde::Serialize;
use stringwise_components::{
    CentralInverterSizing, CentralSizingResult, DataQualityIssue, SizingError, StringSizing,
    StringSizingResult,
};
use stringwise_core::Component;
use tracing::{debug, info, warn};
use uom::si::{electric_potential::volt, power::kilowatt};

use crate::project::Job;

/// Engine output for either kind of job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Strings(StringSizingResult),
    Central(CentralSizingResult),
}

/// Runs a job through the engine, logging each stage.
///
/// # Errors
///
/// Returns the engine's [`SizingError`] unchanged.
pub fn run(job: Job) -> Result<Report, SizingError> {
    match job {
        Job::Strings(request) => StringSizing
            .inspect(
                |request| {
                    debug!(
                        capacity_kw = request.target.power().get::<kilowatt>(),
                        policy = ?request.options.policy,
                        "sizing strings"
                    );
                },
                log_strings,
            )
            .call(request)
            .map(Report::Strings),

        Job::Central(request) => CentralInverterSizing
            .inspect(
                |request| {
                    debug!(
                        capacity_kw = request.sizing.target.power().get::<kilowatt>(),
                        total_inverters = request.layout.total_inverters.get(),
                        "sizing central-inverter plant"
                    );
                },
                log_central,
            )
            .call(request)
            .map(Report::Central),
    }
}

fn log_strings(result: &StringSizingResult) {
    info!(
        modules_per_string = result.modules_per_string.get(),
        total_string_count = result.total_string_count,
        total_modules = result.total_modules,
        string_voc_at_coldest_v = result.string_voc_at_coldest.get::<volt>(),
        installed_kw = result.capacity.installed_capacity.get::<kilowatt>(),
        "strings sized"
    );
    if result.string_length.practical_limit_applied {
        info!("string length capped by the practical module limit");
    }
    if result.string_length.exceeds_practical_limit {
        warn!(
            modules_per_string = result.modules_per_string.get(),
            "MPPT window needs more modules per string than the practical limit"
        );
    }
    log_data_quality(&result.data_quality_issues);
}

fn log_central(result: &CentralSizingResult) {
    log_strings(&result.strings);

    let allocation = &result.allocation;
    info!(
        total_dcdb = allocation.total_dcdb_in_system,
        strings_per_dcdb = allocation.strings_per_dcdb,
        strings_per_mppt = allocation.strings_per_mppt,
        utilization_percent = ?allocation.mppt_utilization_percent,
        "strings distributed"
    );
    if !result.is_valid() {
        warn!(
            strings_per_dcdb = allocation.strings_per_dcdb,
            dcdb_slot_capacity = allocation.dcdb_slot_capacity,
            "DCDBs are overfilled; add inverters or DCDBs, or reduce capacity"
        );
    }
    for advisory in &result.advisories {
        warn!("{advisory}");
    }
}

fn log_data_quality(issues: &[DataQualityIssue]) {
    for issue in issues {
        warn!(record = %issue.record, field = issue.field, assumed = issue.assumed, "{issue}");
    }
}
