//! Two-wave build scheduling: SDKs first, then components.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::project::{BuildOutcome, Project};

/// Upper bound on simultaneous builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    Limited(usize),
    Unbounded,
}

impl Parallelism {
    /// Number of workers needed when at most `max_possible` projects can
    /// build at the same time.
    pub fn pool_size(&self, max_possible: usize) -> usize {
        match self {
            Parallelism::Limited(limit) => max_possible.min((*limit).max(1)),
            Parallelism::Unbounded => max_possible,
        }
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Parallelism::Limited(1)
    }
}

/// Outcomes of a completed run.
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub pool_size: usize,
    pub sdks: Vec<BuildOutcome>,
    pub components: Vec<BuildOutcome>,
    /// Set when the component wave ran.
    pub plugin_output_dir: Option<PathBuf>,
    pub duration: Duration,
}

/// Builds SDK projects, then component projects, on a bounded worker pool.
///
/// With a pool size of one, projects build strictly in order and the first
/// failure stops the run. With more workers, every project of a wave is
/// submitted at once, the wave is drained, and all failures are reported
/// together.
pub struct ProjectBuilder {
    parallelism: Parallelism,
    cancel: Arc<AtomicBool>,
}

impl ProjectBuilder {
    pub fn new(parallelism: Parallelism) -> Self {
        Self {
            parallelism,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares an interrupt flag. Once it is raised, projects that have not
    /// started are skipped; running builds are never killed.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// Runs the SDK wave to completion, creates `plugin_output_dir`, then
    /// runs the component wave.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Build`] for the first failure in sequential mode,
    /// [`Error::BuildFailures`] listing every failure of a wave in parallel
    /// mode, or [`Error::Cancelled`] when the run was interrupted.
    pub fn build_projects<S: Project, C: Project>(
        &self,
        sdks: &[S],
        components: &[C],
        plugin_output_dir: &Path,
    ) -> Result<BuildSummary> {
        let start = Instant::now();
        let mut summary = BuildSummary::default();
        if sdks.is_empty() && components.is_empty() {
            return Ok(summary);
        }

        let pool_size = self
            .parallelism
            .pool_size(sdks.len().max(components.len()));
        summary.pool_size = pool_size;

        let pool = if pool_size > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(pool_size)
                .thread_name(|i| format!("compforge-build-{}", i))
                .build()
                .map_err(|e| Error::WorkerPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        info!(pool_size, sdks = sdks.len(), components = components.len(), "Starting build");

        summary.sdks = self.build_wave(pool.as_ref(), sdks)?;

        if !components.is_empty() {
            std::fs::create_dir_all(plugin_output_dir)?;
            summary.components = self.build_wave(pool.as_ref(), components)?;
            summary.plugin_output_dir = Some(plugin_output_dir.to_path_buf());
        }

        summary.duration = start.elapsed();
        Ok(summary)
    }

    fn build_wave<P: Project>(
        &self,
        pool: Option<&rayon::ThreadPool>,
        projects: &[P],
    ) -> Result<Vec<BuildOutcome>> {
        match pool {
            Some(pool) => self.build_parallel(pool, projects),
            None => self.build_sequential(projects),
        }
    }

    fn build_sequential<P: Project>(&self, projects: &[P]) -> Result<Vec<BuildOutcome>> {
        let mut outcomes = Vec::with_capacity(projects.len());
        for (idx, project) in projects.iter().enumerate() {
            if self.is_cancelled() {
                let skipped = projects[idx..]
                    .iter()
                    .map(|p| p.src_dir().to_path_buf())
                    .collect();
                return Err(Error::Cancelled(skipped));
            }

            let outcome = self.run_one(project);
            if let BuildOutcome::Failure(failure) = outcome {
                return Err(Error::Build(failure));
            }
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    fn build_parallel<P: Project>(
        &self,
        pool: &rayon::ThreadPool,
        projects: &[P],
    ) -> Result<Vec<BuildOutcome>> {
        let (tx, rx) = channel::unbounded();

        pool.scope(|scope| {
            for (idx, project) in projects.iter().enumerate() {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let outcome = if self.is_cancelled() {
                        BuildOutcome::Skipped {
                            src_dir: project.src_dir().to_path_buf(),
                        }
                    } else {
                        self.run_one(project)
                    };
                    let _ = tx.send((idx, outcome));
                });
            }
        });
        drop(tx);

        let mut indexed: Vec<(usize, BuildOutcome)> = rx.iter().collect();
        indexed.sort_by_key(|(idx, _)| *idx);
        let outcomes: Vec<BuildOutcome> = indexed.into_iter().map(|(_, o)| o).collect();

        let failures: Vec<_> = outcomes
            .iter()
            .filter_map(|o| match o {
                BuildOutcome::Failure(failure) => Some(failure.clone()),
                _ => None,
            })
            .collect();
        if !failures.is_empty() {
            return Err(Error::BuildFailures(failures));
        }

        let skipped: Vec<_> = outcomes
            .iter()
            .filter(|o| matches!(o, BuildOutcome::Skipped { .. }))
            .map(|o| o.src_dir().to_path_buf())
            .collect();
        if !skipped.is_empty() {
            return Err(Error::Cancelled(skipped));
        }

        Ok(outcomes)
    }

    fn run_one<P: Project>(&self, project: &P) -> BuildOutcome {
        info!(
            src_dir = %project.src_dir().display(),
            build_system = %project.build_system(),
            "Building"
        );
        let started = Instant::now();
        let outcome = BuildOutcome::capture(project);
        match &outcome {
            BuildOutcome::Failure(failure) => {
                error!(src_dir = %failure.src_dir.display(), "{}", failure.message)
            }
            _ => info!(
                src_dir = %project.src_dir().display(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Finished"
            ),
        }
        outcome
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}
