//! The build command.

mod report;
mod setup;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use compforge_adapters::{classifier, clean_build};
use compforge_core::builder::{Parallelism, ProjectBuilder};
use compforge_core::config::{BuildSettings, ForgeConfig};
use compforge_core::project::Project;
use tracing::{debug, warn};

use crate::formatting::{print_section_header, SectionStyle};

/// Options for one run, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    pub cpp_sdk_src: Option<PathBuf>,
    pub java_sdk_src: Option<PathBuf>,
    pub python_sdk_src: Option<PathBuf>,
    pub build_dir: PathBuf,
    pub component_search_path: Option<String>,
    pub components: Option<String>,
    pub package_json: Option<PathBuf>,
    pub clean: bool,
    pub clean_only: bool,
    pub parallel: Option<Parallelism>,
    pub jobs: Option<Parallelism>,
    pub config: Option<PathBuf>,
}

pub fn cmd_build(args: BuildArgs) -> Result<()> {
    setup::print_argument_warnings(&args);

    let config = ForgeConfig::load_or_default(args.config.as_deref())?;
    let make_jobs = args.jobs.unwrap_or_else(|| config.jobs());
    let parallelism = args.parallel.unwrap_or_else(|| config.parallelism());
    let settings = Arc::new(BuildSettings::new(&args.build_dir, make_jobs, &config));
    debug!(?settings, ?parallelism, "Resolved settings");

    let classifier = classifier(&settings.tools);
    let resolved = setup::locate_components(&args, &classifier)?;
    let toolchain = setup::verify_toolchain(&args, &resolved, &settings)?;
    let sdks = setup::create_sdks(&args, &settings, &toolchain)?;
    let components = setup::create_components(&resolved, &settings, &toolchain)?;

    report::print_projects(&sdks, &components);

    if args.clean || args.clean_only {
        print_section_header("Cleaning", SectionStyle::Secondary);
        let projects: Vec<&dyn Project> = sdks
            .iter()
            .map(|sdk| sdk as &dyn Project)
            .chain(components.iter().map(|c| c as &dyn Project))
            .collect();
        clean_build(&settings, &classifier, &projects)?;
    }
    if args.clean_only {
        return Ok(());
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_clone = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || {
        cancel_clone.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to set signal handler: {}", e);
    }

    print_section_header("Building", SectionStyle::Primary);
    let builder = ProjectBuilder::new(parallelism).with_cancel_flag(cancel);
    let summary = builder.build_projects(&sdks, &components, &settings.plugin_output_dir())?;

    report::print_build_summary(&summary);
    Ok(())
}
