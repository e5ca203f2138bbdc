//! WAV packaging for voice uploads
//!
//! The backend accepts wav, mp3, ogg, m4a and webm. Recordings are sent as
//! 16-bit mono WAV at 16kHz, resampled from the device rate when needed.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use rubato::{FftFixedIn, Resampler};

use crate::domain::recording::{AudioPayload, UPLOAD_SAMPLE_RATE};

const RESAMPLE_CHUNK: usize = 1024;

/// WAV encoding errors
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("WAV write failed: {0}")]
    Write(#[from] hound::Error),
}

/// Package a finalized recording as a WAV file
pub fn encode_wav(payload: &AudioPayload) -> Result<Vec<u8>, EncodingError> {
    let samples = resample(&payload.samples(), payload.encoding().sample_rate(), UPLOAD_SAMPLE_RATE)?;

    let spec = WavSpec {
        channels: 1,
        sample_rate: UPLOAD_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Resample mono PCM between rates
pub fn resample(samples: &[i16], from: u32, to: u32) -> Result<Vec<i16>, EncodingError> {
    if from == to || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let input: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();
    let expected_len = (input.len() as f64 * to as f64 / from as f64).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(from as usize, to as usize, RESAMPLE_CHUNK, 2, 1)
        .map_err(|e| EncodingError::Resample(e.to_string()))?;

    let mut output = Vec::with_capacity(expected_len);
    let mut position = 0;
    while position < input.len() {
        let needed = resampler.input_frames_next();
        let end = (position + needed).min(input.len());
        let mut chunk = input[position..end].to_vec();
        chunk.resize(needed, 0.0);

        let processed = resampler
            .process(&[chunk], None)
            .map_err(|e| EncodingError::Resample(e.to_string()))?;
        output.extend(
            processed[0]
                .iter()
                .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16),
        );
        position = end;
    }

    output.truncate(expected_len);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::{AudioEncoding, AudioFragment};

    fn tone(sample_rate: u32, millis: u32) -> Vec<i16> {
        let count = (sample_rate * millis / 1000) as usize;
        (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (f32::sin(2.0 * std::f32::consts::PI * 440.0 * t) * 12000.0) as i16
            })
            .collect()
    }

    fn payload(samples: &[i16], sample_rate: u32) -> AudioPayload {
        AudioPayload::from_fragments(
            &[AudioFragment::from_samples(samples)],
            AudioEncoding::Pcm16Mono { sample_rate },
        )
    }

    #[test]
    fn wav_has_riff_header_and_upload_rate() {
        let wav = encode_wav(&payload(&tone(16_000, 250), 16_000)).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");

        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, UPLOAD_SAMPLE_RATE);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 4000);
    }

    #[test]
    fn same_rate_keeps_samples() {
        let samples = vec![1i16, -2, 3, -4];
        let wav = encode_wav(&payload(&samples, 16_000)).unwrap();
        let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn device_rate_is_converted() {
        let wav = encode_wav(&payload(&tone(48_000, 500), 48_000)).unwrap();
        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16_000);
        assert_eq!(reader.len(), 8000);
    }

    #[test]
    fn empty_recording_is_a_valid_file() {
        let empty = AudioPayload::new(Vec::new(), AudioEncoding::Pcm16Mono { sample_rate: 44_100 });
        let wav = encode_wav(&empty).unwrap();
        let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
        assert_eq!(reader.len(), 0);
    }

    #[test]
    fn resample_output_length_follows_ratio() {
        let out = resample(&tone(44_100, 1000), 44_100, 16_000).unwrap();
        assert_eq!(out.len(), 16_000);
    }
}
