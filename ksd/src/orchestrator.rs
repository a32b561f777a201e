use crate::{
    descriptor::{DescriptorFetcher, FetchError},
    episode::{Episode, EpisodeSubtitles, Show, SubtitleEntry},
    progress,
    summary::RunSummary,
    token::{TokenError, TokenExtractor},
    utils,
};
use kdam::{Bar, BarExt};
use log::{debug, error, info, warn};
use std::{collections::BTreeSet, sync::Arc};
use tokio::task::{JoinError, JoinSet};

/// Lifecycle of one episode task. Variants are declared in the order a task
/// moves through them, a task never goes back to an earlier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskState {
    Pending,
    TokenCapturing,
    TokenCaptured,
    TokenTimeout,
    DescriptorFetching,
    DescriptorReady,
    DescriptorFailed,
    Done,
}

#[derive(Debug)]
pub enum Outcome {
    Descriptor(Vec<SubtitleEntry>),
    NoToken(TokenError),
    FetchFailed(FetchError),
    /// The task panicked, the message of the panic.
    Aborted(String),
}

/// What happened to a single episode.
#[derive(Debug)]
pub struct TaskReport {
    pub title: Arc<str>,
    pub episode: Episode,
    pub outcome: Outcome,
    pub trail: Vec<TaskState>,
}

impl TaskReport {
    pub fn key(&self) -> (&str, u32) {
        (&self.title, self.episode.number)
    }

    pub fn descriptor(&self) -> Option<&[SubtitleEntry]> {
        match &self.outcome {
            Outcome::Descriptor(x) => Some(x),
            _ => None,
        }
    }
}

/// Reports of every task of a run, in completion order.
#[derive(Debug, Default)]
pub struct Run {
    pub reports: Vec<TaskReport>,
    pub summary: RunSummary,
}

impl Run {
    fn push(&mut self, report: TaskReport) {
        self.summary.tasks += 1;

        match &report.outcome {
            Outcome::Descriptor(_) => self.summary.descriptors += 1,
            Outcome::NoToken(_) => self.summary.token_timeouts += 1,
            Outcome::FetchFailed(e) if e.is_malformed() => self.summary.malformed_responses += 1,
            Outcome::FetchFailed(_) => self.summary.network_errors += 1,
            Outcome::Aborted(_) => self.summary.aborted_tasks += 1,
        }

        self.reports.push(report);
    }

    /// Successful descriptors sorted by file system title and episode number.
    pub fn into_descriptors(self) -> Vec<EpisodeSubtitles> {
        let mut descriptors = self
            .reports
            .into_iter()
            .filter_map(|report| match report.outcome {
                Outcome::Descriptor(entries) => Some(EpisodeSubtitles {
                    title: report.title.to_string(),
                    number: report.episode.number,
                    entries,
                }),
                _ => None,
            })
            .collect::<Vec<_>>();

        descriptors.sort_by_cached_key(|x| (utils::sanitize(&x.title), x.number));
        descriptors
    }
}

/// Runs token capture and descriptor fetch for many episodes, at most
/// `workers` at a time.
pub struct Orchestrator<E, F> {
    extractor: Arc<E>,
    fetcher: Arc<F>,
    workers: usize,
}

impl<E: TokenExtractor, F: DescriptorFetcher> Orchestrator<E, F> {
    pub fn new(extractor: E, fetcher: F, workers: usize) -> Self {
        Self {
            extractor: Arc::new(extractor),
            fetcher: Arc::new(fetcher),
            workers: workers.max(1),
        }
    }

    /// Submit one task per episode whose number passes `filter`
    /// (`None` accepts all) and wait for all of them.
    pub async fn run(&self, shows: &[Show], filter: Option<&BTreeSet<u32>>) -> Run {
        let total = shows
            .iter()
            .flat_map(|x| &x.episodes)
            .filter(|x| filter.is_none_or(|filter| filter.contains(&x.number)))
            .count();
        let mut run = Run::default();
        let mut set = JoinSet::new();
        let mut pb = progress::bar("Capturing", total, " ep");

        info!("Capturing subtitle descriptors for {} episodes", total);

        for show in shows {
            let title = Arc::<str>::from(show.title.as_str());

            for episode in &show.episodes {
                if filter.is_some_and(|filter| !filter.contains(&episode.number)) {
                    continue;
                }

                while set.len() >= self.workers {
                    if let Some(result) = set.join_next().await {
                        collect(&mut run, &mut pb, result);
                    }
                }

                set.spawn(supervise(
                    self.extractor.clone(),
                    self.fetcher.clone(),
                    title.clone(),
                    *episode,
                ));
            }
        }

        while let Some(result) = set.join_next().await {
            collect(&mut run, &mut pb, result);
        }

        run
    }
}

fn collect(run: &mut Run, pb: &mut Bar, result: Result<TaskReport, JoinError>) {
    match result {
        Ok(report) => {
            match &report.outcome {
                Outcome::Descriptor(x) => debug!(
                    "{} episode {}: {} subtitles",
                    report.title,
                    report.episode.number,
                    x.len()
                ),
                Outcome::NoToken(e) => warn!(
                    "{} episode {}: no token ({})",
                    report.title, report.episode.number, e
                ),
                Outcome::FetchFailed(e) => warn!(
                    "{} episode {}: {}",
                    report.title, report.episode.number, e
                ),
                Outcome::Aborted(e) => error!(
                    "{} episode {}: task panicked ({})",
                    report.title, report.episode.number, e
                ),
            }

            run.push(report);
        }
        Err(e) => error!("episode task panicked: {}", e),
    }

    let _ = pb.update(1);
}

struct Task {
    title: Arc<str>,
    episode: Episode,
    trail: Vec<TaskState>,
}

impl Task {
    fn new(title: Arc<str>, episode: Episode) -> Self {
        Self {
            title,
            episode,
            trail: vec![TaskState::Pending],
        }
    }

    fn advance(&mut self, state: TaskState) {
        debug_assert!(self.trail.last().is_none_or(|x| *x < state));
        debug!("{} episode {}: {:?}", self.title, self.episode.number, state);
        self.trail.push(state);
    }

    fn finish(mut self, outcome: Outcome) -> TaskReport {
        self.advance(TaskState::Done);
        TaskReport {
            title: self.title,
            episode: self.episode,
            outcome,
            trail: self.trail,
        }
    }
}

/// Run the task in its own tokio task so a panic still yields a report for
/// its episode.
async fn supervise<E: TokenExtractor, F: DescriptorFetcher>(
    extractor: Arc<E>,
    fetcher: Arc<F>,
    title: Arc<str>,
    episode: Episode,
) -> TaskReport {
    match tokio::spawn(execute(extractor, fetcher, title.clone(), episode)).await {
        Ok(report) => report,
        Err(e) => TaskReport {
            title,
            episode,
            outcome: Outcome::Aborted(e.to_string()),
            trail: vec![TaskState::Pending, TaskState::Done],
        },
    }
}

async fn execute<E: TokenExtractor, F: DescriptorFetcher>(
    extractor: Arc<E>,
    fetcher: Arc<F>,
    title: Arc<str>,
    episode: Episode,
) -> TaskReport {
    let mut task = Task::new(title, episode);
    task.advance(TaskState::TokenCapturing);

    let captured = {
        let title = task.title.clone();

        tokio::task::spawn_blocking(move || extractor.extract(&episode, &title))
            .await
            .unwrap_or_else(|e| Err(TokenError::Browser(e.to_string())))
    };

    let token = match captured {
        Ok(token) => {
            task.advance(TaskState::TokenCaptured);
            token
        }
        Err(e) => {
            task.advance(TaskState::TokenTimeout);
            return task.finish(Outcome::NoToken(e));
        }
    };

    task.advance(TaskState::DescriptorFetching);

    match fetcher.fetch(&episode, &task.title, token).await {
        Ok(entries) => {
            task.advance(TaskState::DescriptorReady);
            task.finish(Outcome::Descriptor(entries))
        }
        Err(e) => {
            task.advance(TaskState::DescriptorFailed);
            task.finish(Outcome::FetchFailed(e))
        }
    }
}
