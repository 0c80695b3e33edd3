//! 出力用の整形

use crate::usecase::controller::{ActivateReport, InstallReport, StatusReport};

pub fn render_install(report: &InstallReport) -> String {
    let mut out = format!(
        "Installed {} ({} resources)",
        report.cache_name,
        report.stored.len()
    );
    for key in &report.stored {
        out.push_str("\n  ");
        out.push_str(key);
    }
    out
}

pub fn render_activate(report: &ActivateReport) -> String {
    if report.deleted.is_empty() {
        format!("Activated {}", report.cache_name)
    } else {
        format!(
            "Activated {} (deleted: {})",
            report.cache_name,
            report.deleted.join(", ")
        )
    }
}

pub fn render_status(report: &StatusReport) -> String {
    let snapshots = if report.snapshots.is_empty() {
        "(none)".to_string()
    } else {
        report.snapshots.join(", ")
    };
    let controller = report
        .controller
        .as_ref()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "(none)".to_string());
    format!(
        "Cache name: {}\nState: {}\nSnapshots: {}\nController: {}",
        report.cache_name, report.state, snapshots, controller
    )
}
