use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use compforge_core::build_system::BuildSystem;
use compforge_core::builder::{Parallelism, ProjectBuilder};
use compforge_core::error::{Error, Result};
use compforge_core::project::Project;
use tempfile::TempDir;

/// Records every build into a shared log.
struct FakeProject {
    src_dir: PathBuf,
    fail: bool,
    delay: Duration,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeProject {
    fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            src_dir: PathBuf::from("/src").join(name),
            fail: false,
            delay: Duration::ZERO,
            log: Arc::clone(log),
        }
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn slow(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    fn name(&self) -> String {
        self.src_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

impl Project for FakeProject {
    fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    fn build_system(&self) -> BuildSystem {
        BuildSystem::Cmake
    }

    fn build(&self) -> Result<()> {
        std::thread::sleep(self.delay);
        self.log.lock().unwrap().push(self.name());
        if self.fail {
            Err(Error::ToolFailed {
                command: format!("make install ({})", self.name()),
                status: Some(2),
            })
        } else {
            Ok(())
        }
    }
}

fn new_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn test_nothing_to_build() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("plugin-packages");
    let none: Vec<FakeProject> = Vec::new();

    let summary = ProjectBuilder::new(Parallelism::Unbounded)
        .build_projects(&none, &none, &output)
        .unwrap();

    assert_eq!(summary.pool_size, 0);
    assert!(summary.plugin_output_dir.is_none());
    assert!(!output.exists());
}

#[test]
fn test_sequential_builds_in_submission_order() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("plugin-packages");
    let log = new_log();
    let sdks = vec![FakeProject::new("cpp-sdk", &log), FakeProject::new("java-sdk", &log)];
    let components = vec![
        FakeProject::new("A", &log),
        FakeProject::new("B", &log),
        FakeProject::new("C", &log),
    ];

    let summary = ProjectBuilder::new(Parallelism::Limited(1))
        .build_projects(&sdks, &components, &output)
        .unwrap();

    assert_eq!(summary.pool_size, 1);
    assert_eq!(entries(&log), vec!["cpp-sdk", "java-sdk", "A", "B", "C"]);
    assert_eq!(summary.sdks.len(), 2);
    assert_eq!(summary.components.len(), 3);
    assert!(output.is_dir());
}

#[test]
fn test_sequential_sdk_failure_stops_before_components() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("plugin-packages");
    let log = new_log();
    let sdks = vec![FakeProject::new("cpp-sdk", &log).failing()];
    let components = vec![FakeProject::new("A", &log)];

    let err = ProjectBuilder::new(Parallelism::Limited(1))
        .build_projects(&sdks, &components, &output)
        .unwrap_err();

    assert_eq!(entries(&log), vec!["cpp-sdk"]);
    assert!(!output.exists());
    match err {
        Error::Build(failure) => assert_eq!(failure.src_dir, PathBuf::from("/src/cpp-sdk")),
        other => panic!("expected a single build failure, got {}", other),
    }
}

#[test]
fn test_sequential_component_failure_is_fail_fast() {
    let temp_dir = TempDir::new().unwrap();
    let log = new_log();
    let sdks: Vec<FakeProject> = Vec::new();
    let components = vec![
        FakeProject::new("A", &log).failing(),
        FakeProject::new("B", &log),
    ];

    let err = ProjectBuilder::new(Parallelism::Limited(1))
        .build_projects(&sdks, &components, &temp_dir.path().join("out"))
        .unwrap_err();

    assert_eq!(entries(&log), vec!["A"]);
    assert_eq!(
        err.to_string(),
        "An error occurred while trying to build /src/A: \
         Command 'make install (A)' returned non-zero exit status 2."
    );
}

#[test]
fn test_parallel_reports_every_failure_in_submission_order() {
    let temp_dir = TempDir::new().unwrap();
    let log = new_log();
    let sdks: Vec<FakeProject> = Vec::new();
    let components = vec![
        FakeProject::new("A", &log).failing().slow(30),
        FakeProject::new("B", &log),
        FakeProject::new("C", &log).failing(),
    ];

    let err = ProjectBuilder::new(Parallelism::Unbounded)
        .build_projects(&sdks, &components, &temp_dir.path().join("out"))
        .unwrap_err();

    // Siblings of a failure still run.
    let mut built = entries(&log);
    built.sort();
    assert_eq!(built, vec!["A", "B", "C"]);

    match err {
        Error::BuildFailures(failures) => {
            let dirs: Vec<PathBuf> = failures.iter().map(|f| f.src_dir.clone()).collect();
            assert_eq!(dirs, vec![PathBuf::from("/src/A"), PathBuf::from("/src/C")]);
        }
        other => panic!("expected aggregated failures, got {}", other),
    }
}

#[test]
fn test_parallel_sdk_wave_drains_before_components() {
    let temp_dir = TempDir::new().unwrap();
    let log = new_log();
    let sdks = vec![
        FakeProject::new("slow-sdk", &log).slow(50),
        FakeProject::new("fast-sdk", &log),
    ];
    let components = vec![FakeProject::new("A", &log), FakeProject::new("B", &log)];

    let summary = ProjectBuilder::new(Parallelism::Limited(4))
        .build_projects(&sdks, &components, &temp_dir.path().join("out"))
        .unwrap();

    assert_eq!(summary.pool_size, 2);
    let built = entries(&log);
    let last_sdk = built.iter().rposition(|n| n.ends_with("-sdk")).unwrap();
    let first_component = built.iter().position(|n| !n.ends_with("-sdk")).unwrap();
    assert!(last_sdk < first_component, "build order was {:?}", built);
    assert!(summary.components.iter().all(|o| o.is_success()));
}

#[test]
fn test_parallel_sdk_failure_prevents_components() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out");
    let log = new_log();
    let sdks = vec![
        FakeProject::new("cpp-sdk", &log).failing(),
        FakeProject::new("java-sdk", &log),
    ];
    let components = vec![FakeProject::new("A", &log)];

    let err = ProjectBuilder::new(Parallelism::Unbounded)
        .build_projects(&sdks, &components, &output)
        .unwrap_err();

    assert!(matches!(err, Error::BuildFailures(ref f) if f.len() == 1));
    assert!(!entries(&log).contains(&"A".to_string()));
    assert!(!output.exists());
}

#[test]
fn test_cancelled_run_skips_unstarted_projects() {
    let temp_dir = TempDir::new().unwrap();
    let log = new_log();
    let cancel = Arc::new(AtomicBool::new(false));
    cancel.store(true, Ordering::SeqCst);
    let sdks: Vec<FakeProject> = Vec::new();
    let components = vec![FakeProject::new("A", &log), FakeProject::new("B", &log)];

    let err = ProjectBuilder::new(Parallelism::Limited(1))
        .with_cancel_flag(Arc::clone(&cancel))
        .build_projects(&sdks, &components, &temp_dir.path().join("out"))
        .unwrap_err();

    assert!(entries(&log).is_empty());
    match err {
        Error::Cancelled(skipped) => assert_eq!(
            skipped,
            vec![PathBuf::from("/src/A"), PathBuf::from("/src/B")]
        ),
        other => panic!("expected cancellation, got {}", other),
    }
}
