//! Sequential suite execution and the per-case pass/fail report.

use std::fmt;
use std::time::{Duration, Instant};

use crate::cases::ContractCase;
use crate::config::SuiteConfig;
use crate::error::CaseFailure;
use crate::session::ContractSession;
use crate::transport::Transport;

#[derive(Debug)]
pub struct CaseOutcome {
    pub case: ContractCase,
    pub result: Result<(), CaseFailure>,
    pub elapsed: Duration,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, case: ContractCase) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| o.case == case)
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = (ContractCase, &CaseFailure)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|err| (o.case, err)))
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            let ms = outcome.elapsed.as_millis();
            match &outcome.result {
                Ok(()) => writeln!(f, "PASS {} ({ms} ms)", outcome.case)?,
                Err(err) => writeln!(f, "FAIL {} ({ms} ms): {err}", outcome.case)?,
            }
        }
        write!(f, "{} passed, {} failed", self.passed(), self.failed())
    }
}

/// Run every case against `config.base_url` over real HTTP, one fresh session
/// per case.
pub fn run_suite(config: &SuiteConfig) -> SuiteReport {
    run_suite_with(&ContractCase::ALL, |_| ContractSession::open(config))
}

/// Run `cases` in order, acquiring each case's session from `open`. A failed
/// case is recorded and the next one still runs.
pub fn run_suite_with<T, F>(cases: &[ContractCase], mut open: F) -> SuiteReport
where
    T: Transport,
    F: FnMut(ContractCase) -> ContractSession<T>,
{
    let outcomes = cases
        .iter()
        .map(|&case| run_case(case, open(case)))
        .collect();
    SuiteReport { outcomes }
}

fn run_case<T: Transport>(case: ContractCase, session: ContractSession<T>) -> CaseOutcome {
    let started = Instant::now();
    let result = case.run(&session);
    drop(session);
    let elapsed = started.elapsed();

    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    match &result {
        Ok(()) => tracing::info!(case = case.name(), elapsed_ms, "case passed"),
        Err(err) => tracing::warn!(case = case.name(), elapsed_ms, error = %err, "case failed"),
    }

    CaseOutcome {
        case,
        result,
        elapsed,
    }
}
