use std::sync::Arc;

use mastery_core::exam::ExamSession;
use mastery_core::model::{ExamDifficulty, Question, QuestionId, TaskId, WeaknessRecord};
use mastery_core::time::{fixed_clock, fixed_now};
use services::insight_service::InsightService;
use services::{Clock, ExamWorkflowService};
use storage::repository::{InMemoryRepository, StorageError, WeaknessRepository};

fn question(id: u32, correct: usize, task: Option<&str>) -> Question {
    Question::new(
        QuestionId::new(format!("q{id}")),
        format!("Scenario {id}: what should the project manager do first?"),
        vec![
            "Escalate to the sponsor".into(),
            "Collaborate with the team".into(),
            "Update the risk register".into(),
            "Re-baseline the schedule".into(),
        ],
        correct,
        "The servant leader collaborates before escalating.",
        "People",
        task.map(TaskId::new),
    )
    .unwrap()
}

fn workflow(repo: &InMemoryRepository) -> ExamWorkflowService {
    // Insight generation is disabled in tests; sessions are seeded directly.
    ExamWorkflowService::new(
        fixed_clock(),
        Arc::new(InsightService::new(None)),
        Arc::new(repo.clone()),
    )
}

fn three_question_session() -> ExamSession {
    let questions = vec![
        question(1, 1, Some("p2")),
        question(2, 1, Some("pr8")),
        question(3, 2, None),
    ];
    ExamSession::new(questions, ExamDifficulty::Easy, fixed_now()).unwrap()
}

#[tokio::test]
async fn finished_session_commits_wrong_tasks_on_close() {
    let repo = InMemoryRepository::new();
    let service = workflow(&repo);

    let mut session = three_question_session();
    session.acknowledge().unwrap();

    // Q1 correct, Q2 wrong (pr8), Q3 correct.
    for answer in [1, 0, 2] {
        session.select_option(answer).unwrap();
        session.submit().unwrap();
        session.advance().unwrap();
    }
    assert!(session.is_finished());

    let report = service.close_exam(session).await.unwrap().unwrap();
    assert_eq!(report.score, 67);
    assert_eq!(report.wrong_task_ids, vec![TaskId::new("pr8")]);

    let weakness = service.weakness().await.unwrap();
    assert_eq!(weakness.failures(&TaskId::new("pr8")), 1);
    assert_eq!(weakness.failures(&TaskId::new("p2")), 0);
}

#[tokio::test]
async fn cancelled_session_records_nothing() {
    let repo = InMemoryRepository::new();
    let service = workflow(&repo);

    let mut session = three_question_session();
    session.acknowledge().unwrap();
    session.select_option(0).unwrap();
    session.submit().unwrap(); // wrong answer on p2
    session.advance().unwrap();

    // Abandon after question 1, before Finished.
    let report = service.close_exam(session).await.unwrap();
    assert!(report.is_none());

    let weakness = service.weakness().await.unwrap();
    assert!(weakness.is_empty());
}

#[tokio::test]
async fn expired_session_commits_only_submitted_failures() {
    let repo = InMemoryRepository::new();
    let service = workflow(&repo);

    let mut session = three_question_session();
    session.acknowledge().unwrap();
    session.select_option(0).unwrap();
    session.submit().unwrap(); // wrong answer on p2
    session.advance().unwrap();

    // Time out mid-question-2: the unanswered questions add nothing.
    while !session.is_finished() {
        session.tick();
    }

    let report = service.close_exam(session).await.unwrap().unwrap();
    assert_eq!(report.time_remaining, 0);
    assert_eq!(report.wrong_task_ids, vec![TaskId::new("p2")]);

    let weakness = service.weakness().await.unwrap();
    assert_eq!(weakness.failures(&TaskId::new("p2")), 1);
    assert_eq!(weakness.failures(&TaskId::new("pr8")), 0);
}

#[tokio::test]
async fn repeated_failures_accumulate_across_sessions() {
    let repo = InMemoryRepository::new();
    let service = workflow(&repo);

    for _ in 0..2 {
        let mut session = three_question_session();
        session.acknowledge().unwrap();
        for _ in 0..3 {
            session.select_option(0).unwrap();
            session.submit().unwrap();
            session.advance().unwrap();
        }
        service.close_exam(session).await.unwrap();
    }

    let weakness = service.weakness().await.unwrap();
    assert_eq!(weakness.failures(&TaskId::new("p2")), 2);
    assert_eq!(weakness.failures(&TaskId::new("pr8")), 2);
}

#[tokio::test]
async fn start_exam_fails_cleanly_when_generator_is_unconfigured() {
    let repo = InMemoryRepository::new();
    let service = workflow(&repo);

    let err = service
        .start_exam(&["People".into()], ExamDifficulty::Easy)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        services::ExamWorkflowError::Insight(services::InsightError::Disabled)
    ));

    // A failed start leaves no trace in the weakness record.
    let weakness = repo.load_failures().await.unwrap();
    assert!(weakness.is_empty());
}

struct FailingWeaknessRepo;

#[async_trait::async_trait]
impl WeaknessRepository for FailingWeaknessRepo {
    async fn load_failures(&self) -> Result<WeaknessRecord, StorageError> {
        Err(StorageError::Connection("disk gone".into()))
    }

    async fn add_failures(&self, _task_ids: &[TaskId]) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk gone".into()))
    }
}

#[tokio::test]
async fn storage_failure_on_close_surfaces_as_error() {
    let service = ExamWorkflowService::new(
        fixed_clock(),
        Arc::new(InsightService::new(None)),
        Arc::new(FailingWeaknessRepo),
    );

    let mut session = three_question_session();
    session.acknowledge().unwrap();
    for _ in 0..3 {
        session.select_option(0).unwrap();
        session.submit().unwrap();
        session.advance().unwrap();
    }

    let err = service.close_exam(session).await.unwrap_err();
    assert!(matches!(err, services::ExamWorkflowError::Storage(_)));
}

// Clock is re-exported for callers wiring their own services.
#[test]
fn clock_reexport_is_usable() {
    let clock = Clock::fixed(fixed_now());
    assert_eq!(clock.now(), fixed_now());
}
