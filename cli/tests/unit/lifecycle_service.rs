//! Lifecycle service tests: profile gating, argv construction, exit codes,
//! and container state transitions against a stateful fake.

#![allow(clippy::expect_used)]

use svc_cli::application::services::lifecycle::{self, LifecycleRequest};
use svc_cli::application::services::status;
use svc_cli::domain::compose::LifecycleFlags;
use svc_cli::domain::error::ServiceError;
use svc_cli::domain::operation::{ContainerState, Operation};

use crate::helpers::{FakeCompose, RecordingRunner, project, registry, strings};

fn request(names: &[&str], profiles: &[&str]) -> LifecycleRequest {
    LifecycleRequest {
        names: strings(names),
        profiles: strings(profiles),
        flags: LifecycleFlags::default(),
    }
}

async fn apply(runner: &RecordingRunner, op: Operation, req: &LifecycleRequest) -> anyhow::Result<i32> {
    lifecycle::apply(runner, &project(), &registry(), op, req).await
}

// ── Profile gating ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_up_without_names_never_passes_a_profile() {
    let runner = RecordingRunner::new();
    let code = apply(&runner, Operation::Up, &request(&[], &[])).await.expect("up");
    assert_eq!(code, 0);
    assert_eq!(runner.calls(), ["docker compose -f docker-compose.yml up -d"]);
}

#[tokio::test]
async fn test_up_named_profiled_service_without_profile_fails_before_invoking() {
    let runner = RecordingRunner::new();
    let err = apply(&runner, Operation::Up, &request(&["analyzer"], &[]))
        .await
        .expect_err("gated");
    assert_eq!(
        err.downcast_ref::<ServiceError>(),
        Some(&ServiceError::ProfileInactive {
            service: "analyzer".to_string(),
            profile: "schedule".to_string(),
        })
    );
    assert!(err.to_string().contains("svc up --profile schedule analyzer"));
    assert!(runner.calls().is_empty(), "nothing may run when gating refuses");
}

#[tokio::test]
async fn test_up_with_schedule_profile_starts_analyzer() {
    let runner = RecordingRunner::new();
    apply(&runner, Operation::Up, &request(&["analyzer"], &["schedule"]))
        .await
        .expect("up");
    assert_eq!(
        runner.calls(),
        ["docker compose -f docker-compose.yml --profile schedule up -d analyzer"]
    );
}

#[tokio::test]
async fn test_restart_and_start_are_gated_like_up() {
    for op in [Operation::Start, Operation::Restart] {
        let runner = RecordingRunner::new();
        let err = apply(&runner, op, &request(&["analyzer"], &[]))
            .await
            .expect_err("gated");
        assert!(matches!(
            err.downcast_ref::<ServiceError>(),
            Some(ServiceError::ProfileInactive { .. })
        ));
        assert!(runner.calls().is_empty());
    }
}

#[tokio::test]
async fn test_non_activating_operations_enable_the_profile_implicitly() {
    for op in [Operation::Stop, Operation::Pause, Operation::Unpause] {
        let runner = RecordingRunner::new();
        apply(&runner, op, &request(&["analyzer"], &[])).await.expect("op");
        assert_eq!(
            runner.calls(),
            [format!(
                "docker compose -f docker-compose.yml --profile schedule {} analyzer",
                op.verb()
            )]
        );
    }
}

#[tokio::test]
async fn test_down_covers_every_profile_and_keeps_volumes() {
    let runner = RecordingRunner::new();
    apply(&runner, Operation::Down, &request(&[], &[])).await.expect("down");
    assert_eq!(
        runner.calls(),
        ["docker compose -f docker-compose.yml --profile schedule down"]
    );
}

#[tokio::test]
async fn test_down_volumes_flag() {
    let runner = RecordingRunner::new();
    let req = LifecycleRequest {
        flags: LifecycleFlags {
            volumes: true,
            ..LifecycleFlags::default()
        },
        ..LifecycleRequest::default()
    };
    apply(&runner, Operation::Down, &req).await.expect("down");
    assert!(runner.calls()[0].ends_with("down --volumes"));
}

// ── Name resolution ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unknown_service_lists_known_names() {
    let runner = RecordingRunner::new();
    let err = apply(&runner, Operation::Stop, &request(&["web"], &[]))
        .await
        .expect_err("unknown");
    let msg = err.to_string();
    assert!(msg.contains("Unknown service 'web'"));
    assert!(msg.contains("server, analyzer, rsshub, browserless"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_duplicate_names_collapse_in_first_seen_order() {
    let runner = RecordingRunner::new();
    apply(&runner, Operation::Restart, &request(&["rsshub", "server", "rsshub"], &[]))
        .await
        .expect("restart");
    assert_eq!(
        runner.calls(),
        ["docker compose -f docker-compose.yml restart rsshub server"]
    );
}

#[tokio::test]
async fn test_up_flags_are_forwarded() {
    let runner = RecordingRunner::new();
    let req = LifecycleRequest {
        names: strings(&["server"]),
        flags: LifecycleFlags {
            build: true,
            force_recreate: true,
            ..LifecycleFlags::default()
        },
        ..LifecycleRequest::default()
    };
    apply(&runner, Operation::Up, &req).await.expect("up");
    assert_eq!(
        runner.calls(),
        ["docker compose -f docker-compose.yml up -d --build --force-recreate server"]
    );
}

// ── Exit codes ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_orchestrator_exit_code_is_returned_verbatim() {
    let runner = RecordingRunner::with_status(17);
    let code = apply(&runner, Operation::Up, &request(&["server"], &[]))
        .await
        .expect("up");
    assert_eq!(code, 17);
}

#[tokio::test]
async fn test_exec_builds_no_tty_invocation_and_returns_code() {
    let runner = RecordingRunner::with_status(3);
    let code = lifecycle::exec(
        &runner,
        &project(),
        &registry(),
        "server",
        true,
        &strings(&["python", "-m", "pytest"]),
    )
    .await
    .expect("exec");
    assert_eq!(code, 3);
    assert_eq!(
        runner.calls(),
        ["docker compose -f docker-compose.yml exec -T server python -m pytest"]
    );
}

#[tokio::test]
async fn test_exec_without_command_is_rejected() {
    let runner = RecordingRunner::new();
    let err = lifecycle::exec(&runner, &project(), &registry(), "server", false, &[])
        .await
        .expect_err("empty command");
    assert!(err.downcast_ref::<ServiceError>().is_some());
    assert!(runner.calls().is_empty());
}

// ── State transitions ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_pause_then_unpause_keeps_the_same_running_container() {
    let fake = FakeCompose::new(registry());
    let up = request(&["server"], &[]);
    lifecycle::apply(&fake, &project(), &registry(), Operation::Up, &up)
        .await
        .expect("up");
    let before = fake.container("server").expect("created");
    assert_eq!(before.state, ContainerState::Running);

    let code = lifecycle::apply(&fake, &project(), &registry(), Operation::Pause, &up)
        .await
        .expect("pause");
    assert_eq!(code, 0);
    assert_eq!(fake.container("server").expect("kept").state, ContainerState::Paused);

    let code = lifecycle::apply(&fake, &project(), &registry(), Operation::Unpause, &up)
        .await
        .expect("unpause");
    assert_eq!(code, 0);

    let rows = status::container_states(&fake, &project(), &registry())
        .await
        .expect("ps");
    let server = rows.iter().find(|r| r.service == "server").expect("listed");
    assert_eq!(server.state, ContainerState::Running);
    assert_eq!(server.id, before.id, "container must not be recreated");
}

#[tokio::test]
async fn test_bare_up_leaves_analyzer_without_a_container() {
    let fake = FakeCompose::new(registry());
    lifecycle::apply(&fake, &project(), &registry(), Operation::Up, &request(&[], &[]))
        .await
        .expect("up");
    assert!(fake.container("server").is_some());
    assert!(fake.container("rsshub").is_some());
    assert!(fake.container("browserless").is_some());
    assert!(fake.container("analyzer").is_none());
}

#[tokio::test]
async fn test_stop_then_start_preserves_the_container() {
    let fake = FakeCompose::running(&["rsshub"]);
    let id = fake.container("rsshub").expect("running").id;
    let req = request(&["rsshub"], &[]);
    lifecycle::apply(&fake, &project(), &registry(), Operation::Stop, &req)
        .await
        .expect("stop");
    assert_eq!(fake.container("rsshub").expect("kept").state, ContainerState::Exited);
    lifecycle::apply(&fake, &project(), &registry(), Operation::Start, &req)
        .await
        .expect("start");
    let after = fake.container("rsshub").expect("kept");
    assert_eq!(after.state, ContainerState::Running);
    assert_eq!(after.id, id);
}

#[tokio::test]
async fn test_unpause_of_running_container_reports_orchestrator_failure() {
    let fake = FakeCompose::running(&["server"]);
    let code = lifecycle::apply(
        &fake,
        &project(),
        &registry(),
        Operation::Unpause,
        &request(&["server"], &[]),
    )
    .await
    .expect("spawned");
    assert_eq!(code, 1);
}
