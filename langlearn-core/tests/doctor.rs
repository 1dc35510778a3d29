use langlearn_core::doctor::{
    CheckStatus, CHECK_AUDIO_TOOL, CHECK_CREDENTIALS, CHECK_OUTPUT_DIR, CHECK_PERMISSIONS,
    CHECK_PLAYBACK, CHECK_RUNTIME,
};
use langlearn_core::mock::{MockBehavior, MockStitcher};
use langlearn_core::settings::Settings;


use fixture::Fixture;

#[tokio::test]
async fn test_healthy_environment() {
    let fixture = Fixture::new();

    let report = fixture.service.doctor(None).await;

    assert!(report.is_healthy(), "{report}");
    for name in [
        CHECK_RUNTIME,
        CHECK_AUDIO_TOOL,
        CHECK_CREDENTIALS,
        CHECK_PERMISSIONS,
        CHECK_OUTPUT_DIR,
    ] {
        assert_eq!(report.check(name).unwrap().status, CheckStatus::Pass, "{name}");
    }

    // The fixture player does not exist; playback is optional
    let playback = report.check(CHECK_PLAYBACK).unwrap();
    assert_eq!(playback.status, CheckStatus::Skip);
    assert!(!playback.required);
}

#[tokio::test]
async fn test_missing_audio_tool_fails() {
    let fixture = Fixture::with_stitcher(MockStitcher::unavailable());

    let report = fixture.service.doctor(None).await;

    let audio = report.check(CHECK_AUDIO_TOOL).unwrap();
    assert_eq!(audio.status, CheckStatus::Fail);
    assert!(audio.detail.contains("not found"));
    assert!(!report.is_healthy());
    assert!(report.to_string().contains("[FAIL] audio tool"));
}

#[tokio::test]
async fn test_audio_tool_check_ignores_credentials() {
    let fixture = Fixture::with_mock_behavior(MockBehavior::NoCredentials);

    let report = fixture.service.doctor(None).await;

    assert_eq!(
        report.check(CHECK_AUDIO_TOOL).unwrap().status,
        CheckStatus::Pass
    );
    assert_eq!(
        report.check(CHECK_CREDENTIALS).unwrap().status,
        CheckStatus::Fail
    );
    assert!(!report.is_healthy());
}

#[tokio::test]
async fn test_denied_permissions_fail() {
    let fixture = Fixture::with_mock_behavior(MockBehavior::AlwaysProviderError {
        message: "AccessDeniedException: not authorized to perform polly:DescribeVoices"
            .to_string(),
    });

    let report = fixture.service.doctor(None).await;

    let permissions = report.check(CHECK_PERMISSIONS).unwrap();
    assert_eq!(permissions.status, CheckStatus::Fail);
    assert!(permissions.detail.contains("AccessDeniedException"));
}

#[tokio::test]
async fn test_hanging_provider_times_out() {
    let fixture = Fixture::with_mock_behavior(MockBehavior::Hang);

    let report = fixture.service.doctor(None).await;

    let permissions = report.check(CHECK_PERMISSIONS).unwrap();
    assert_eq!(permissions.status, CheckStatus::Fail);
    assert!(permissions.detail.contains("timed out"), "{}", permissions.detail);
}

#[tokio::test]
async fn test_missing_output_dir_fails() {
    let fixture = Fixture::with_settings(Settings::default());
    let missing = fixture.dir().join("does-not-exist");

    let report = fixture.service.doctor(Some(missing)).await;

    assert_eq!(
        report.check(CHECK_OUTPUT_DIR).unwrap().status,
        CheckStatus::Fail
    );
    assert!(!report.is_healthy());
    assert!(!fixture.dir().join("does-not-exist").exists());
}
