//! Captured audio value objects

use std::fmt;

/// Sample rate of the uploaded voice query
pub const UPLOAD_SAMPLE_RATE: u32 = 16_000;

/// The single encoding voice payloads are captured in:
/// little-endian signed 16-bit mono PCM at the device sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioEncoding {
    Pcm16Mono { sample_rate: u32 },
}

impl AudioEncoding {
    pub const fn sample_rate(&self) -> u32 {
        match self {
            Self::Pcm16Mono { sample_rate } => *sample_rate,
        }
    }

    /// MIME type of the uploaded file
    pub const fn mime_type(&self) -> &'static str {
        "audio/wav"
    }

    /// File name of the uploaded file
    pub const fn file_name(&self) -> &'static str {
        "recording.wav"
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pcm16Mono { sample_rate } => write!(f, "pcm_s16le mono @ {} Hz", sample_rate),
        }
    }
}

/// One chunk of raw audio as delivered by the input device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFragment(Vec<u8>);

impl AudioFragment {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Fragment from mono samples
    pub fn from_samples(samples: &[i16]) -> Self {
        Self(samples.iter().flat_map(|s| s.to_le_bytes()).collect())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A finalized recording, ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    bytes: Vec<u8>,
    encoding: AudioEncoding,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>, encoding: AudioEncoding) -> Self {
        Self { bytes, encoding }
    }

    /// Join fragments in the order given, without gaps
    pub fn from_fragments(fragments: &[AudioFragment], encoding: AudioEncoding) -> Self {
        let total = fragments.iter().map(AudioFragment::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for fragment in fragments {
            bytes.extend_from_slice(fragment.as_bytes());
        }
        Self { bytes, encoding }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn encoding(&self) -> AudioEncoding {
        self.encoding
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Decode the payload into samples. A trailing odd byte is ignored.
    pub fn samples(&self) -> Vec<i16> {
        self.bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    /// Recorded length in milliseconds
    pub fn duration_ms(&self) -> u64 {
        let rate = u64::from(self.encoding.sample_rate());
        if rate == 0 {
            return 0;
        }
        (self.bytes.len() as u64 / 2) * 1000 / rate
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PCM_16K: AudioEncoding = AudioEncoding::Pcm16Mono {
        sample_rate: UPLOAD_SAMPLE_RATE,
    };

    #[test]
    fn concatenates_in_given_order() {
        let fragments = vec![
            AudioFragment::new(vec![1, 2]),
            AudioFragment::new(vec![3]),
            AudioFragment::new(vec![]),
            AudioFragment::new(vec![4, 5, 6]),
        ];
        let payload = AudioPayload::from_fragments(&fragments, PCM_16K);
        assert_eq!(payload.bytes(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn no_fragments_gives_empty_payload() {
        let payload = AudioPayload::from_fragments(&[], PCM_16K);
        assert!(payload.bytes().is_empty());
        assert_eq!(payload.duration_ms(), 0);
    }

    #[test]
    fn fragment_from_samples_is_little_endian() {
        let fragment = AudioFragment::from_samples(&[1, -2]);
        assert_eq!(fragment.as_bytes(), &[0x01, 0x00, 0xfe, 0xff]);
    }

    #[test]
    fn samples_decode_and_drop_trailing_byte() {
        let payload = AudioPayload::new(vec![0x01, 0x00, 0xfe, 0xff, 0x7f], PCM_16K);
        assert_eq!(payload.samples(), vec![1, -2]);
    }

    #[test]
    fn duration_follows_sample_rate() {
        let payload = AudioPayload::new(vec![0; 32_000], PCM_16K);
        assert_eq!(payload.duration_ms(), 1000);
    }

    #[test]
    fn human_readable_size() {
        assert_eq!(AudioPayload::new(vec![0; 500], PCM_16K).human_readable_size(), "500 B");
        assert_eq!(AudioPayload::new(vec![0; 2048], PCM_16K).human_readable_size(), "2.0 KB");
    }

    #[test]
    fn encoding_upload_metadata() {
        assert_eq!(PCM_16K.mime_type(), "audio/wav");
        assert_eq!(PCM_16K.file_name(), "recording.wav");
        assert_eq!(PCM_16K.sample_rate(), 16_000);
    }
}
