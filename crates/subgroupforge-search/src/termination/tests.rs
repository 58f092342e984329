//! Tests for termination conditions.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::statistics::StatisticsCollector;

fn scope() -> SearchScope {
    SearchScope::new(Arc::new(StatisticsCollector::new()))
}

#[test]
fn test_time_termination() {
    let scope = scope();
    assert!(!TimeTermination::seconds(3600).is_terminated(&scope));
    assert!(TimeTermination::new(Duration::ZERO).is_terminated(&scope));
}

#[test]
fn test_time_termination_after_sleep() {
    let scope = scope();
    let term = TimeTermination::millis(5);
    std::thread::sleep(Duration::from_millis(10));
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_external_termination() {
    let flag = Arc::new(AtomicBool::new(false));
    let term = ExternalTermination::new(Arc::clone(&flag));
    let scope = scope();

    assert!(!term.is_terminated(&scope));
    term.request();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_evaluation_count_termination() {
    let scope = scope();
    let term = EvaluationCountTermination::new(2);
    scope.statistics().record_candidate(false);
    assert!(!term.is_terminated(&scope));
    scope.statistics().record_candidate(true);
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_or_termination() {
    let flag = Arc::new(AtomicBool::new(false));
    let term = OrTermination((
        TimeTermination::seconds(3600),
        ExternalTermination::new(Arc::clone(&flag)),
    ));
    let scope = scope();

    assert!(!term.is_terminated(&scope));
    flag.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_boxed_termination() {
    let term: Box<dyn Termination> = Box::new(TimeTermination::new(Duration::ZERO));
    assert!(term.is_terminated(&scope()));
}
