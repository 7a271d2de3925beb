//! End-to-end engine tests: purchase scenarios and concurrency properties.

use futures::future::join_all;
use pointsledger::db::init_db;
use pointsledger::{
    Actor, Config, LedgerEngine, LedgerError, Repository, StudentId, SubjectId, SubjectStatus,
    TeacherId, TimeMs, TransactionStatus, TransactionType,
};
use std::sync::Arc;
use tempfile::TempDir;

fn test_config() -> Config {
    Config {
        port: 0,
        database_path: ":memory:".to_string(),
        teacher_share_percent: 70,
        signup_credit: 100,
        max_conflict_retries: 10,
    }
}

async fn setup_engine() -> (LedgerEngine, Arc<Repository>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));
    let engine = LedgerEngine::new(repo.clone(), test_config());
    (engine, repo, temp_dir)
}

async fn student_credit(repo: &Repository, id: &str) -> u64 {
    match repo.find_actor(id).await.unwrap() {
        Some(Actor::Student(s)) => s.credit,
        other => panic!("expected student, got {:?}", other),
    }
}

#[tokio::test]
async fn test_full_purchase_flow_records_audit_trail() {
    let (engine, repo, _temp) = setup_engine().await;

    let student = StudentId::new("s-1".to_string());
    let teacher = TeacherId::new("t-1".to_string());
    let subject = SubjectId::new("sub-1".to_string());
    repo.create_student(&student, 100, TimeMs::new(0)).await.unwrap();
    repo.create_teacher(&teacher, TimeMs::new(0)).await.unwrap();
    repo.create_subject(&subject, "Maths", "Algebra", 60, SubjectStatus::Active)
        .await
        .unwrap();
    repo.assign_teacher(&subject, &teacher, TimeMs::new(0)).await.unwrap();

    let txn = engine.purchase_subject(&student, &subject).await.unwrap();

    // the committed transaction is the proof of success
    assert_eq!(txn.txn_type, TransactionType::SubjectBuy);
    assert_eq!(txn.status, TransactionStatus::Completed);
    assert_eq!(txn.amount, 60);
    assert_eq!(txn.teacher_cut, 42);
    assert_eq!(txn.company_cut, 18);

    // and it is retrievable from both sides of the trade
    let student_txns = repo.list_transactions("s-1").await.unwrap();
    assert_eq!(student_txns.len(), 1);
    assert_eq!(student_txns[0].id, txn.id);

    assert!(repo.is_enrolled(&student, &subject).await.unwrap());
    assert_eq!(student_credit(&repo, "s-1").await, 40);

    let t = repo.get_teacher(&teacher).await.unwrap().unwrap();
    assert_eq!(t.withdrawable, 42);
}

#[tokio::test]
async fn test_concurrent_purchases_same_pair_single_success() {
    let (engine, repo, _temp) = setup_engine().await;

    let student = StudentId::new("s-1".to_string());
    let teacher = TeacherId::new("t-1".to_string());
    let subject = SubjectId::new("sub-1".to_string());
    repo.create_student(&student, 1000, TimeMs::new(0)).await.unwrap();
    repo.create_teacher(&teacher, TimeMs::new(0)).await.unwrap();
    repo.create_subject(&subject, "Maths", "", 60, SubjectStatus::Active)
        .await
        .unwrap();
    repo.assign_teacher(&subject, &teacher, TimeMs::new(0)).await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            let student = student.clone();
            let subject = subject.clone();
            tokio::spawn(async move { engine.purchase_subject(&student, &subject).await })
        })
        .collect();

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one purchase must win");
    for result in &results {
        if let Err(err) = result {
            assert!(
                matches!(err, LedgerError::AlreadyEnrolled),
                "losers must fail AlreadyEnrolled, got {:?}",
                err
            );
        }
    }

    // exactly one debit
    assert_eq!(student_credit(&repo, "s-1").await, 940);
    assert_eq!(repo.list_transactions("s-1").await.unwrap().len(), 1);

    let stored = repo.get_subject(&subject).await.unwrap().unwrap();
    assert_eq!(stored.stats.total_sales, 1);
    assert_eq!(stored.stats.students_enrolled, 1);
}

#[tokio::test]
async fn test_concurrent_purchases_never_overdraw() {
    let (engine, repo, _temp) = setup_engine().await;

    // 100 credits, five subjects at 40 each: at most two can succeed.
    let student = StudentId::new("s-1".to_string());
    repo.create_student(&student, 100, TimeMs::new(0)).await.unwrap();

    let mut subjects = Vec::new();
    for i in 0..5 {
        let subject = SubjectId::new(format!("sub-{}", i));
        repo.create_subject(&subject, &format!("S{}", i), "", 40, SubjectStatus::Active)
            .await
            .unwrap();
        subjects.push(subject);
    }

    let tasks: Vec<_> = subjects
        .iter()
        .map(|subject| {
            let engine = engine.clone();
            let student = student.clone();
            let subject = subject.clone();
            tokio::spawn(async move { engine.purchase_subject(&student, &subject).await })
        })
        .collect();

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 2, "only two 40-point purchases fit in 100");
    for result in &results {
        if let Err(err) = result {
            assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        }
    }

    assert_eq!(student_credit(&repo, "s-1").await, 20);
    assert_eq!(repo.list_transactions("s-1").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_sum_conservation_across_students_and_teachers() {
    let (engine, repo, _temp) = setup_engine().await;

    let t1 = TeacherId::new("t-1".to_string());
    let t2 = TeacherId::new("t-2".to_string());
    repo.create_teacher(&t1, TimeMs::new(0)).await.unwrap();
    repo.create_teacher(&t2, TimeMs::new(0)).await.unwrap();

    let shared = SubjectId::new("shared".to_string());
    repo.create_subject(&shared, "Shared", "", 101, SubjectStatus::Active)
        .await
        .unwrap();
    repo.assign_teacher(&shared, &t1, TimeMs::new(1)).await.unwrap();
    repo.assign_teacher(&shared, &t2, TimeMs::new(2)).await.unwrap();

    let solo = SubjectId::new("solo".to_string());
    repo.create_subject(&solo, "Solo", "", 60, SubjectStatus::Active)
        .await
        .unwrap();
    repo.assign_teacher(&solo, &t1, TimeMs::new(3)).await.unwrap();

    let mut total_paid = 0u64;
    let mut company_total = 0u64;
    for i in 0..4 {
        let student = StudentId::new(format!("s-{}", i));
        repo.create_student(&student, 500, TimeMs::new(0)).await.unwrap();
        for subject in [&shared, &solo] {
            let txn = engine.purchase_subject(&student, subject).await.unwrap();
            total_paid += txn.amount;
            company_total += txn.company_cut;
        }
    }

    let e1 = repo.get_teacher(&t1).await.unwrap().unwrap().total_earnings;
    let e2 = repo.get_teacher(&t2).await.unwrap().unwrap().total_earnings;
    assert_eq!(e1 + e2 + company_total, total_paid);

    // remainder policy: first-listed teacher of the shared subject gets 36 per sale
    assert_eq!(e1, 4 * (36 + 42));
    assert_eq!(e2, 4 * 35);
}

#[tokio::test]
async fn test_withdrawal_scenario_d_then_settle_cycle() {
    let (engine, repo, _temp) = setup_engine().await;

    let student = StudentId::new("s-1".to_string());
    let teacher = TeacherId::new("t-1".to_string());
    repo.create_student(&student, 500, TimeMs::new(0)).await.unwrap();
    repo.create_teacher(&teacher, TimeMs::new(0)).await.unwrap();

    // earn 150 withdrawable via sales (price 214 at 70% rounds to 150)
    let subject = SubjectId::new("sub-1".to_string());
    repo.create_subject(&subject, "Maths", "", 214, SubjectStatus::Active)
        .await
        .unwrap();
    repo.assign_teacher(&subject, &teacher, TimeMs::new(0)).await.unwrap();
    engine.purchase_subject(&student, &subject).await.unwrap();

    let t = repo.get_teacher(&teacher).await.unwrap().unwrap();
    assert_eq!(t.withdrawable, 150);

    // Scenario D: over-withdrawal fails, balance unchanged
    let err = engine.request_withdrawal(&teacher, 200).await.unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    let t = repo.get_teacher(&teacher).await.unwrap().unwrap();
    assert_eq!(t.withdrawable, 150);

    // a valid request moves funds into the pending payout
    let txn = engine.request_withdrawal(&teacher, 120).await.unwrap();
    assert_eq!(txn.status, TransactionStatus::Pending);
    let t = repo.get_teacher(&teacher).await.unwrap().unwrap();
    assert_eq!(t.withdrawable, 30);

    // payout failure restores the funds
    engine
        .settle_withdrawal(txn.id, TransactionStatus::Failed)
        .await
        .unwrap();
    let t = repo.get_teacher(&teacher).await.unwrap().unwrap();
    assert_eq!(t.withdrawable, 150);
}

#[tokio::test]
async fn test_transactions_listed_in_creation_order() {
    let (engine, repo, _temp) = setup_engine().await;

    let student = StudentId::new("s-1".to_string());
    repo.create_student(&student, 1000, TimeMs::new(0)).await.unwrap();

    let mut expected = Vec::new();
    for i in 0..3 {
        let subject = SubjectId::new(format!("sub-{}", i));
        repo.create_subject(&subject, &format!("S{}", i), "", 10, SubjectStatus::Active)
            .await
            .unwrap();
        let txn = engine.purchase_subject(&student, &subject).await.unwrap();
        expected.push(txn.id);
    }

    let listed: Vec<i64> = repo
        .list_transactions("s-1")
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(listed, expected);
}
