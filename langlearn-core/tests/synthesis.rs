use std::time::Duration;

use langlearn_core::mock::{MockSpeechProvider, MockStitcher};
use langlearn_core::params::{BatchParams, PairParams, SynthesizeParams, VoicesParams};
use langlearn_core::tts::ssml;
use langlearn_core::types::{PairRequest, PauseDuration, SpeechRate, SynthesisRequest};
use langlearn_core::TtsError;


use fixture::Fixture;

fn say(text: &str) -> SynthesizeParams {
    SynthesizeParams {
        text: text.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_single_synthesis_writes_file() {
    let fixture = Fixture::new();

    let result = fixture.service.synthesize(say("hello")).await.unwrap();

    assert!(result.file_path.starts_with(fixture.dir()));
    assert!(result.duration_ms > 0);
    assert_eq!(result.voice, "Joanna");
    assert_eq!(result.text, "hello");
    let bytes = std::fs::read(&result.file_path).unwrap();
    assert!(!bytes.is_empty());
    assert_eq!(fixture.written_files(), vec![result.file_path]);
}

#[tokio::test]
async fn test_explicit_output_path() {
    let fixture = Fixture::new();
    let output = fixture.dir().join("lessons").join("one.mp3");

    let result = fixture
        .service
        .synthesize(SynthesizeParams {
            text: "Hallo".to_string(),
            voice: Some("hans".to_string()),
            output: Some(output.clone()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(result.file_path, output);
    assert!(output.exists());
    assert_eq!(result.voice, "Hans");
}

#[tokio::test]
async fn test_identical_requests_are_byte_identical() {
    let fixture = Fixture::new();
    let synth = fixture.service.synthesizer();
    let request = SynthesisRequest::new("Guten Morgen", "hans", SpeechRate::default());

    let first = synth.synthesize(&request).await.unwrap();
    let second = synth.synthesize(&request).await.unwrap();

    assert!(!first.audio.data.is_empty());
    assert_eq!(first.audio.data, second.audio.data);
}

#[tokio::test]
async fn test_voice_names_are_case_insensitive() {
    let fixture = Fixture::new();

    let mut voices = Vec::new();
    for name in ["Daniel", "daniel", "DANIEL"] {
        let result = fixture
            .service
            .synthesize(SynthesizeParams {
                text: "Guten Tag".to_string(),
                voice: Some(name.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        voices.push(result.voice);
    }

    assert_eq!(voices, vec!["Daniel", "Daniel", "Daniel"]);
    assert_eq!(fixture.provider.describe_calls(), 1);
}

#[tokio::test]
async fn test_unknown_voice_is_rejected() {
    let fixture = Fixture::new();

    let err = fixture
        .service
        .synthesize(SynthesizeParams {
            text: "hello".to_string(),
            voice: Some("nonexistent".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TtsError::UnknownVoice { .. }));
    assert!(err.to_string().contains("Available:"));
    assert_eq!(fixture.provider.synthesize_calls(), 0);
}

#[tokio::test]
async fn test_rate_validated_before_any_provider_call() {
    let fixture = Fixture::new();

    for rate in [0, 250] {
        let err = fixture
            .service
            .synthesize(SynthesizeParams {
                text: "hello".to_string(),
                rate: Some(rate),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::InvalidRate(r) if r == rate));
    }
    assert_eq!(fixture.provider.describe_calls(), 0);
    assert_eq!(fixture.provider.synthesize_calls(), 0);

    let result = fixture
        .service
        .synthesize(SynthesizeParams {
            text: "hello".to_string(),
            rate: Some(90),
            ..Default::default()
        })
        .await;
    assert!(result.is_ok());
    assert!(fixture.provider.inputs()[0].ssml.contains("rate=\"90%\""));
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let fixture = Fixture::new();

    let err = fixture.service.synthesize(say("  \n ")).await.unwrap_err();

    assert!(matches!(err, TtsError::EmptyInput));
    assert!(fixture.written_files().is_empty());
}

#[tokio::test]
async fn test_pair_duration_is_sum_of_legs_and_pause() {
    let fixture = Fixture::new();
    let synth = fixture.service.synthesizer();
    let rate = SpeechRate::default();
    let first = SynthesisRequest::new("good morning", "joanna", rate);
    let second = SynthesisRequest::new("Guten Morgen", "hans", rate);

    let leg1 = synth.synthesize(&first).await.unwrap();
    let leg2 = synth.synthesize(&second).await.unwrap();
    let pair = synth
        .synthesize_pair(&PairRequest {
            first,
            second,
            pause: PauseDuration::from_millis(800).unwrap(),
        })
        .await
        .unwrap();

    let expected = leg1.audio.duration + Duration::from_millis(800) + leg2.audio.duration;
    let diff = if pair.audio.duration > expected {
        pair.audio.duration - expected
    } else {
        expected - pair.audio.duration
    };
    assert!(diff <= Duration::from_millis(5), "diff was {diff:?}");
    assert_eq!(pair.voice, "Joanna+Hans");
}

#[tokio::test]
async fn test_pair_order_is_first_then_second() {
    let fixture = Fixture::new();

    let result = fixture
        .service
        .synthesize_pair(PairParams {
            text1: "good morning".to_string(),
            text2: "Guten Morgen".to_string(),
            voice1: Some("joanna".to_string()),
            voice2: Some("hans".to_string()),
            pause_ms: Some(250),
            ..Default::default()
        })
        .await
        .unwrap();

    let inputs = fixture.provider.inputs();
    assert_eq!(inputs.len(), 2);
    assert!(inputs[0].ssml.contains("good morning"));
    assert!(inputs[1].ssml.contains("Guten Morgen"));

    // The mock stitcher keeps input bytes in order, so the file must start
    // with the first leg and end with the second.
    let rate = SpeechRate::default();
    let first = MockSpeechProvider::render(&ssml::wrap_with_rate("good morning", rate));
    let second = MockSpeechProvider::render(&ssml::wrap_with_rate("Guten Morgen", rate));
    let written = std::fs::read(&result.file_path).unwrap();
    assert!(written.starts_with(&first));
    assert!(written.ends_with(&second));
    assert_eq!(result.text, "good morning | Guten Morgen");
}

#[tokio::test]
async fn test_pause_out_of_range_is_rejected() {
    let fixture = Fixture::new();

    let err = fixture
        .service
        .synthesize_pair(PairParams {
            text1: "strong".to_string(),
            text2: "stark".to_string(),
            pause_ms: Some(60_000),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TtsError::InvalidPause(60_000)));
    assert_eq!(fixture.provider.synthesize_calls(), 0);
}

#[tokio::test]
async fn test_voice_listing_filters_by_language() {
    let fixture = Fixture::new();

    let german = fixture
        .service
        .voices(VoicesParams {
            language: Some("DE".to_string()),
        })
        .await
        .unwrap();
    assert!(!german.is_empty());
    assert!(german.iter().all(|v| v.language_code == "de-DE"));

    let all = fixture.service.voices(VoicesParams::default()).await.unwrap();
    assert!(all.len() > german.len());
}

#[tokio::test]
async fn test_pair_with_unknown_second_voice_sends_nothing() {
    let fixture = Fixture::new();

    let err = fixture
        .service
        .synthesize_pair(PairParams {
            text1: "good morning".to_string(),
            text2: "Guten Morgen".to_string(),
            voice1: Some("joanna".to_string()),
            voice2: Some("nonexistent".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TtsError::UnknownVoice { .. }));
    assert_eq!(fixture.provider.synthesize_calls(), 0);
    assert!(fixture.written_files().is_empty());
}

#[tokio::test]
async fn test_missing_audio_tool_writes_nothing() {
    let fixture = Fixture::with_stitcher(MockStitcher::unavailable());

    let err = fixture
        .service
        .synthesize_pair(PairParams {
            text1: "good morning".to_string(),
            text2: "Guten Morgen".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TtsError::StitchFailed(_)));

    let err = fixture
        .service
        .synthesize_batch(BatchParams {
            texts: vec!["eins".to_string(), "zwei".to_string()],
            merge: true,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TtsError::StitchFailed(_)));

    assert!(fixture.written_files().is_empty());
}
