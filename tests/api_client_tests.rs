//! Backend client integration tests against a mock server

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use vocawork::application::ports::{BackendError, JobBackend, VoiceBackend};
use vocawork::domain::jobs::{JobDraft, JobFilter, Language};
use vocawork::domain::recording::{AudioEncoding, AudioFragment, AudioPayload};
use vocawork::infrastructure::VocaworkClient;

fn job_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "company": "Acme",
        "location": "Pune",
        "salary": "₹15,000/month",
        "skills": ["driving"],
        "contact": "+91 98765 43210",
        "description": "Day shifts",
        "posted_date": "2024-03-01T10:00:00"
    })
}

async fn client(server: &MockServer) -> VocaworkClient {
    VocaworkClient::new(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap()
}

/// Matches a binary body containing `needle`
fn body_has(needle: &'static [u8]) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
    move |request: &Request| request.body.windows(needle.len()).any(|w| w == needle)
}

fn short_recording() -> AudioPayload {
    let samples: Vec<i16> = (0..4_800).map(|i| ((i % 100) * 200) as i16).collect();
    AudioPayload::from_fragments(
        &[AudioFragment::from_samples(&samples)],
        AudioEncoding::Pcm16Mono { sample_rate: 48_000 },
    )
}

#[tokio::test]
async fn lists_all_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([job_json("1", "Driver"), job_json("2", "Cook")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let jobs = client(&server).await.list_jobs(&JobFilter::default()).await.unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].title, "Driver");
    assert_eq!(jobs[1].skills, vec!["driving"]);
}

#[tokio::test]
async fn search_sends_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .and(query_param("query", "delivery driver"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([job_json("3", "Delivery Driver")])))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = client(&server)
        .await
        .list_jobs(&JobFilter::keyword("delivery driver"))
        .await
        .unwrap();

    assert_eq!(jobs[0].id, "3");
}

#[tokio::test]
async fn location_filter_is_sent_alongside_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .and(query_param("query", "driver"))
        .and(query_param("location", "Pune"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([job_json("4", "Driver")])))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = client(&server)
        .await
        .list_jobs(&JobFilter::new(" driver ", "Pune"))
        .await
        .unwrap();

    assert_eq!(jobs[0].id, "4");
}

#[tokio::test]
async fn creates_job_from_validated_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/jobs"))
        .and(body_partial_json(json!({
            "title": "Cook",
            "skills": ["baking", "hygiene"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Job created successfully",
            "job": job_json("9", "Cook")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = JobDraft {
        title: "Cook".to_string(),
        company: "Hotel".to_string(),
        location: "Chennai".to_string(),
        salary: "₹18,000/month".to_string(),
        skills: "baking, , hygiene".to_string(),
        contact: "hr@hotel.example".to_string(),
        description: "Kitchen work".to_string(),
    };
    let job = client(&server)
        .await
        .create_job(&draft.validate().unwrap())
        .await
        .unwrap();

    assert_eq!(job.id, "9");
}

#[tokio::test]
async fn delete_of_missing_job_reports_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/jobs/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Job not found"})))
        .mount(&server)
        .await;

    let err = client(&server).await.delete_job("42").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.server_message(), Some("Job not found"));
}

#[tokio::test]
async fn server_error_without_body_has_no_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let err = client(&server).await.list_jobs(&JobFilter::default()).await.unwrap_err();

    assert!(matches!(err, BackendError::Server { status: 500, message: None }));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = VocaworkClient::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();

    let err = client.list_jobs(&JobFilter::default()).await.unwrap_err();

    assert!(matches!(err, BackendError::Network(_)));
}

#[tokio::test]
async fn voice_upload_is_multipart_wav_with_language() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-voice"))
        .and(body_has(b"name=\"language\"\r\n\r\nta\r\n"))
        .and(body_has(b"filename=\"recording.wav\""))
        .and(body_has(b"RIFF"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transcript": "driver job in Chennai",
            "intent": {"job_role": "driver", "location": "chennai", "original_text": "driver job in Chennai"},
            "jobs": [job_json("5", "Driver")],
            "audio_url": "/api/audio/reply_1.mp3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .await
        .process_voice(&short_recording(), Language::Tamil)
        .await
        .unwrap();

    assert_eq!(result.transcript, "driver job in Chennai");
    assert_eq!(result.intent.location, "chennai");
    assert_eq!(result.jobs.len(), 1);
    assert_eq!(
        result.audio_url,
        Some(format!("{}/api/audio/reply_1.mp3", server.uri()))
    );
}

#[tokio::test]
async fn voice_rejection_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-voice"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Could not transcribe audio"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .process_voice(&short_recording(), Language::English)
        .await
        .unwrap_err();

    assert_eq!(err.server_message(), Some("Could not transcribe audio"));
}

#[tokio::test]
async fn missing_reply_audio_stays_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-voice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transcript": "cook",
            "intent": {},
            "jobs": []
        })))
        .mount(&server)
        .await;

    let result = client(&server)
        .await
        .process_voice(&short_recording(), Language::Hindi)
        .await
        .unwrap();

    assert!(result.audio_url.is_none());
    assert!(result.jobs.is_empty());
}

#[tokio::test]
async fn health_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2024-03-01T10:00:00",
            "gemini_configured": true
        })))
        .mount(&server)
        .await;

    let health = client(&server).await.health().await.unwrap();

    assert!(health.is_healthy());
    assert!(health.gemini_configured);
}
