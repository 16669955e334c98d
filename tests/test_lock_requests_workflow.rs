mod common;

use serde_json::json;

use common::*;
use polly_triage::triage::workflow::RunStatus;
use polly_triage::Environment;

#[tokio::test]
async fn test_pricing_failure_is_isolated_per_id() {
    let transport = FakeTransport::new();
    transport.ok(
        &lock_requests_path("L1"),
        json!([
            lock_body(3, "2024-03-01T00:00:00Z", "pe-1"),
            lock_body(2, "2024-02-01T00:00:00Z", "pe-2"),
            lock_body(1, "2024-01-01T00:00:00Z", "pe-1"),
            lock_body(4, "2024-04-01T00:00:00Z", "")
        ]),
    );
    transport.ok(&pricing_path("pe-1"), scenario_body(700, &["C30"]));
    transport.status(&pricing_path("pe-2"), 500, json!({"detail": "engine down"}));
    let session = session(&transport);

    let state = session.lock_requests().run(Environment::Stage, "t", "L1").await;

    assert_eq!(state.status, RunStatus::Succeeded);
    assert!(state.error.is_none());
    assert_eq!(state.locks.len(), 4);
    // 去重后只请求两次
    assert_eq!(transport.count_prefix("/api/v2/pe/pricing-scenarios/"), 2);
    assert_eq!(state.pricing_by_pe_request_id.len(), 2);
    let pe1 = state.pricing_by_pe_request_id["pe-1"].as_ref().expect("pe-1 pricing");
    assert_eq!(pe1.borrower.fico, Some(700.0));
    assert_eq!(pe1.borrower.annual_income, Some(120000.0));
    assert!(state.pricing_by_pe_request_id["pe-2"].is_none());
}

#[tokio::test]
async fn test_primary_failure_skips_pricing() {
    let transport = FakeTransport::new();
    transport.status(&lock_requests_path("L1"), 404, json!({"detail": "Loan not found"}));
    let session = session(&transport);

    let state = session.lock_requests().run(Environment::Stage, "t", "L1").await;

    assert_eq!(state.status, RunStatus::Failed);
    assert!(state.attempted);
    assert!(state.locks.is_empty());
    assert!(state.pricing_by_pe_request_id.is_empty());
    assert_eq!(state.error.and_then(|e| e.status()), Some(404));
    assert_eq!(transport.requested_paths().len(), 1);
}

#[tokio::test]
async fn test_diffs_follow_chronology_but_keep_display_order() {
    let transport = FakeTransport::new();
    transport.ok(
        &lock_requests_path("L1"),
        json!([
            lock_body(1, "2024-01-01", "pe-1"),
            lock_body(2, "2024-03-01", "pe-2"),
            lock_body(3, "2024-02-01", "pe-3")
        ]),
    );
    transport.ok(&pricing_path("pe-1"), scenario_body(700, &["A", "B"]));
    transport.ok(&pricing_path("pe-2"), scenario_body(740, &["A", "C"]));
    transport.ok(&pricing_path("pe-3"), scenario_body(720, &["A", "C"]));
    let session = session(&transport);

    let state = session.lock_requests().run(Environment::Stage, "t", "L1").await;
    let diffs = state.pricing_diffs();

    assert_eq!(diffs.len(), 3);
    assert!(diffs[0].is_none());

    // id 2 (03-01) 对比 id 3 (02-01)
    let second = diffs[1].as_ref().expect("diff for id 2");
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].path, "borrower.fico");
    assert_eq!((second[0].previous.as_str(), second[0].current.as_str()), ("720", "740"));

    // id 3 (02-01) 对比 id 1 (01-01)
    let third = diffs[2].as_ref().expect("diff for id 3");
    let paths: Vec<&str> = third.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(paths, vec!["borrower.fico", "search.productCodes"]);
    assert_eq!(third[1].previous, "A, B");
    assert_eq!(third[1].current, "A, C");
}

#[tokio::test]
async fn test_stale_run_does_not_overwrite_newer_run() {
    let transport = FakeTransport::new();
    transport.ok(&lock_requests_path("OLD"), json!([lock_body(1, "2024-01-01", "pe-old")]));
    transport.ok(&pricing_path("pe-old"), scenario_body(600, &[]));
    transport.ok(&lock_requests_path("NEW"), json!([lock_body(9, "2024-06-01", "pe-new")]));
    transport.ok(&pricing_path("pe-new"), scenario_body(800, &[]));
    let gate = transport.gate(&lock_requests_path("OLD"));
    let session = session(&transport);
    let workflow = session.lock_requests();

    let old_run = workflow.run(Environment::Stage, "t", "OLD");
    let new_run = async {
        let state = workflow.run(Environment::Stage, "t", "NEW").await;
        gate.notify_one();
        state
    };
    let (old_state, new_state) = tokio::join!(old_run, new_run);

    assert_eq!(new_state.locks[0].id, 9);
    // 过期的一轮返回自己的数据，但不写入共享状态
    assert_eq!(old_state.locks[0].id, 1);
    assert!(old_state.pricing_by_pe_request_id.contains_key("pe-old"));
    let current = workflow.snapshot();
    assert_eq!(current.status, RunStatus::Succeeded);
    assert_eq!(current.locks.len(), 1);
    assert_eq!(current.locks[0].id, 9);
    assert!(current.pricing_by_pe_request_id.contains_key("pe-new"));
    assert!(!current.pricing_by_pe_request_id.contains_key("pe-old"));
}

#[tokio::test]
async fn test_reset_clears_state() {
    let transport = FakeTransport::new();
    transport.ok(&lock_requests_path("L1"), json!([lock_body(1, "2024-01-01", "")]));
    let session = session(&transport);

    let state = session.lock_requests().run(Environment::Stage, "t", "L1").await;
    assert_eq!(state.locks.len(), 1);
    assert_eq!(state.pricing_diffs(), vec![None]);

    session.lock_requests().reset();
    let state = session.lock_requests().snapshot();
    assert_eq!(state.status, RunStatus::Idle);
    assert!(!state.attempted);
    assert!(state.locks.is_empty());
}

#[tokio::test]
async fn test_state_is_cleared_before_next_request_is_answered() {
    let transport = FakeTransport::new();
    transport.ok(&lock_requests_path("L1"), json!([lock_body(1, "2024-01-01", "pe-1")]));
    transport.ok(&pricing_path("pe-1"), scenario_body(700, &["A"]));
    let session = session(&transport);
    let workflow = session.lock_requests();

    let first = workflow.run(Environment::Stage, "t", "L1").await;
    assert_eq!(first.locks.len(), 1);
    assert_eq!(first.pricing_by_pe_request_id.len(), 1);

    transport.status(&lock_requests_path("L1"), 500, json!({"detail": "boom"}));
    let gate = transport.gate(&lock_requests_path("L1"));
    let observe = async {
        while transport.count_prefix(&lock_requests_path("L1")) < 2 {
            tokio::task::yield_now().await;
        }
        let pending = workflow.snapshot();
        assert_eq!(pending.status, RunStatus::Running);
        assert!(pending.is_loading());
        assert!(pending.attempted);
        assert!(pending.locks.is_empty());
        assert!(pending.pricing_by_pe_request_id.is_empty());
        assert!(pending.error.is_none());
        gate.notify_one();
    };
    let (second, _) = tokio::join!(workflow.run(Environment::Stage, "t", "L1"), observe);

    assert_eq!(second.status, RunStatus::Failed);
    assert_eq!(second.error.and_then(|e| e.status()), Some(500));
    assert!(second.locks.is_empty());
    assert_eq!(transport.count_prefix(&pricing_path("pe-1")), 1);
}
