//! Terminal output for resolved projects and finished builds.

use compforge_adapters::{Component, Sdk};
use compforge_core::builder::BuildSummary;
use compforge_core::project::{BuildOutcome, Project};

use crate::formatting::{
    format_duration, print_key_value, print_project_table, print_section_header,
    print_success, print_summary_box, ProjectRow, SectionStyle,
};

pub(super) fn print_projects(sdks: &[Sdk], components: &[Component]) {
    if sdks.is_empty() && components.is_empty() {
        return;
    }
    print_section_header("Projects", SectionStyle::Primary);

    let rows: Vec<ProjectRow> = sdks
        .iter()
        .map(|sdk| project_row("SDK", sdk))
        .chain(components.iter().map(|c| project_row("Component", c)))
        .collect();
    print_project_table(&rows);
    println!();
}

fn project_row(role: &'static str, project: &dyn Project) -> ProjectRow {
    ProjectRow {
        role,
        build_system: project.build_system().tool_name(),
        src_dir: project.src_dir().display().to_string(),
    }
}

fn count_successes(outcomes: &[BuildOutcome]) -> usize {
    outcomes.iter().filter(|o| o.is_success()).count()
}

pub(super) fn print_build_summary(summary: &BuildSummary) {
    println!();
    print_summary_box(
        "Build Summary",
        &[
            ("Workers", &summary.pool_size.to_string()),
            ("SDKs", &count_successes(&summary.sdks).to_string()),
            ("Components", &count_successes(&summary.components).to_string()),
            ("Duration", &format_duration(summary.duration.as_secs_f64())),
        ],
    );
    println!();

    match &summary.plugin_output_dir {
        Some(dir) => {
            print_success("Build complete");
            print_key_value("Component packages written to:", &dir.display().to_string());
        }
        None => print_success("Build complete"),
    }
}
