//! Result of a spoken job query

use serde::{Deserialize, Serialize};

use super::job::Job;

/// Structured intent the backend extracted from the transcript.
///
/// Any field may be empty when the backend could not tell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceIntent {
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub original_text: String,
}

impl VoiceIntent {
    /// True when neither a role nor a location was recognised
    pub fn is_empty(&self) -> bool {
        self.job_role.is_empty() && self.location.is_empty()
    }
}

/// Everything one voice submission produced.
///
/// Each successful submission replaces the previous result wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceQueryResult {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub intent: VoiceIntent,
    #[serde(default)]
    pub jobs: Vec<Job>,
    /// Location of the synthesized spoken reply, if one was produced
    #[serde(default)]
    pub audio_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_response() {
        let json = r#"{
            "transcript": "I need a software developer job in Bangalore",
            "intent": {
                "job_role": "software developer",
                "location": "bangalore",
                "skills": [],
                "original_text": "I need a software developer job in Bangalore"
            },
            "jobs": [],
            "audio_url": "/api/audio/reply.mp3"
        }"#;

        let result: VoiceQueryResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.intent.job_role, "software developer");
        assert_eq!(result.audio_url.as_deref(), Some("/api/audio/reply.mp3"));
        assert!(result.jobs.is_empty());
    }

    #[test]
    fn null_audio_url_is_none() {
        let json = r#"{"transcript":"hi","intent":{},"jobs":[],"audio_url":null}"#;
        let result: VoiceQueryResult = serde_json::from_str(json).unwrap();
        assert!(result.audio_url.is_none());
        assert!(result.intent.is_empty());
    }
}
