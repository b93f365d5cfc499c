//! Signal loading from MAT files, JSON containers and WAV files
//!
//! MAT and JSON input hold two named numeric fields: the time axis and the
//! samples. Each field may be a row or column vector; in JSON that is a flat
//! array or a single-row nested array (`[[...]]`).

use super::Signal;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Names of the two fields in a JSON container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    /// Time axis field
    pub time: String,
    /// Sample field
    pub samples: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            time: "x".to_string(),
            samples: "v".to_string(),
        }
    }
}

/// Load a signal, picking the format from the file extension
pub fn load_signal(path: &Path, fields: &FieldNames) -> Result<Signal> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("wav") => load_wav(path),
        Some("json") => load_json(path, fields),
        Some("mat") => load_mat(path, fields),
        other => Err(AnalysisError::config(format!(
            "unsupported input format {:?} for {}",
            other.unwrap_or(""),
            path.display()
        ))),
    }
}

/// Load a two-field JSON container
pub fn load_json(path: &Path, fields: &FieldNames) -> Result<Signal> {
    let text = std::fs::read_to_string(path)?;
    let signal = parse_json(&text, fields)?;
    tracing::info!(
        path = %path.display(),
        samples = signal.len(),
        sample_rate = signal.sample_rate(),
        "loaded JSON signal"
    );
    Ok(signal)
}

/// Parse a two-field JSON container from text
pub fn parse_json(text: &str, fields: &FieldNames) -> Result<Signal> {
    let doc: Value = serde_json::from_str(text)?;
    let times = numeric_field(&doc, &fields.time)?;
    let samples = numeric_field(&doc, &fields.samples)?;
    Signal::with_time_axis(samples, times)
}

fn numeric_field(doc: &Value, name: &str) -> Result<Vec<f64>> {
    let field = doc
        .get(name)
        .ok_or_else(|| AnalysisError::config(format!("input has no field '{name}'")))?;

    let row = match field.as_array() {
        Some(outer) if outer.len() == 1 && outer[0].is_array() => &outer[0],
        Some(_) => field,
        None => {
            return Err(AnalysisError::config(format!(
                "field '{name}' is not an array"
            )))
        }
    };

    row.as_array()
        .into_iter()
        .flatten()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                AnalysisError::config(format!("field '{name}' holds a non-numeric value: {v}"))
            })
        })
        .collect()
}

/// Load a MATLAB level 5 MAT file
pub fn load_mat(path: &Path, fields: &FieldNames) -> Result<Signal> {
    let file = BufReader::new(File::open(path)?);
    let signal = parse_mat(file, fields)?;
    tracing::info!(
        path = %path.display(),
        samples = signal.len(),
        sample_rate = signal.sample_rate(),
        "loaded MAT signal"
    );
    Ok(signal)
}

/// Parse a MAT file holding the time axis and samples as two vectors
pub fn parse_mat<R: Read>(reader: R, fields: &FieldNames) -> Result<Signal> {
    let mat = matfile::MatFile::parse(reader).map_err(|e| AnalysisError::MatFile(format!("{e:?}")))?;
    let times = mat_vector(&mat, &fields.time)?;
    let samples = mat_vector(&mat, &fields.samples)?;
    Signal::with_time_axis(samples, times)
}

fn mat_vector(mat: &matfile::MatFile, name: &str) -> Result<Vec<f64>> {
    let array = mat
        .find_by_name(name)
        .ok_or_else(|| AnalysisError::config(format!("MAT file has no variable '{name}'")))?;

    let size = array.size();
    if size.iter().filter(|&&d| d > 1).count() > 1 {
        return Err(AnalysisError::config(format!(
            "variable '{name}' has shape {size:?}, expected a vector"
        )));
    }

    match array.data() {
        matfile::NumericData::Double { real, .. } => Ok(real.clone()),
        matfile::NumericData::Single { real, .. } => Ok(real.iter().map(|&v| f64::from(v)).collect()),
        _ => Err(AnalysisError::config(format!(
            "variable '{name}' is not a floating-point array"
        ))),
    }
}

/// Load a WAV file, averaging channels to mono
///
/// Integer PCM is scaled to [-1, 1).
pub fn load_wav(path: &Path) -> Result<Signal> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 * scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let samples: Vec<f64> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f64>() / frame.len() as f64)
        .collect();

    tracing::info!(
        path = %path.display(),
        samples = samples.len(),
        channels,
        sample_rate = spec.sample_rate,
        "loaded WAV signal"
    );

    Signal::with_sample_rate(samples, spec.sample_rate as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("spectral-explorer-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_parse_flat_json() {
        let text = r#"{"x": [0.25, 0.5, 0.75, 1.0], "v": [0.1, -0.2, 0.3, -0.4]}"#;
        let signal = parse_json(text, &FieldNames::default()).unwrap();

        assert_eq!(signal.samples(), &[0.1, -0.2, 0.3, -0.4]);
        assert!((signal.sample_rate() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_row_matrix_json() {
        let text = r#"{"t": [[0.5, 1.0]], "s": [[1, 2]]}"#;
        let fields = FieldNames {
            time: "t".to_string(),
            samples: "s".to_string(),
        };
        let signal = parse_json(text, &fields).unwrap();
        assert_eq!(signal.samples(), &[1.0, 2.0]);
        assert_eq!(signal.times(), &[0.5, 1.0]);
    }

    #[test]
    fn test_parse_json_errors() {
        let fields = FieldNames::default();
        assert!(matches!(
            parse_json(r#"{"x": [1.0]}"#, &fields),
            Err(AnalysisError::Configuration(_))
        ));
        assert!(matches!(
            parse_json(r#"{"x": [1.0], "v": ["a"]}"#, &fields),
            Err(AnalysisError::Configuration(_))
        ));
        assert!(matches!(
            parse_json(r#"{"x": 1.0, "v": [1.0]}"#, &fields),
            Err(AnalysisError::Configuration(_))
        ));
        assert!(matches!(parse_json("not json", &fields), Err(AnalysisError::Json(_))));
    }

    #[test]
    fn test_load_stereo_int_wav() {
        let path = temp_path("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &(l, r) in &[(16384i16, 0i16), (-16384, -16384), (0, 32767)] {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();

        let signal = load_signal(&path, &FieldNames::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(signal.len(), 3);
        assert_eq!(signal.sample_rate(), 8000.0);
        assert!((signal.samples()[0] - 0.25).abs() < 1e-9);
        assert!((signal.samples()[1] + 0.5).abs() < 1e-9);
        assert!((signal.samples()[2] - 32767.0 / 65536.0).abs() < 1e-9);
    }

    /// Level 5 MAT file with one 1×N double row per variable
    fn mat_bytes(vars: &[(&str, &[f64])]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut text = b"MATLAB 5.0 MAT-file".to_vec();
        text.resize(116, b' ');
        out.extend_from_slice(&text);
        out.extend_from_slice(&[0u8; 8]);
        out.extend_from_slice(&0x0100u16.to_le_bytes());
        out.extend_from_slice(b"IM");

        let u32s = |out: &mut Vec<u8>, values: &[u32]| {
            for v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        };

        for (name, values) in vars {
            let name_len = name.len() as u32;
            let name_padded = (name_len + 7) / 8 * 8;
            let data_len = 8 * values.len() as u32;
            let total = 16 + 16 + 8 + name_padded + 8 + data_len;

            u32s(&mut out, &[14, total]);
            u32s(&mut out, &[6, 8, 6, 0]);
            u32s(&mut out, &[5, 8, 1, values.len() as u32]);
            u32s(&mut out, &[1, name_len]);
            out.extend_from_slice(name.as_bytes());
            out.resize(out.len() + (name_padded - name_len) as usize, 0);
            u32s(&mut out, &[9, data_len]);
            for v in values.iter() {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        out
    }

    #[test]
    fn test_load_mat_row_vectors() {
        let path = temp_path("handel.mat");
        let bytes = mat_bytes(&[("x", &[0.25, 0.5, 0.75, 1.0]), ("v", &[0.1, -0.2, 0.3, -0.4])]);
        std::fs::write(&path, bytes).unwrap();

        let signal = load_signal(&path, &FieldNames::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(signal.samples(), &[0.1, -0.2, 0.3, -0.4]);
        assert_eq!(signal.times(), &[0.25, 0.5, 0.75, 1.0]);
        assert!((signal.sample_rate() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_mat_missing_variable() {
        let bytes = mat_bytes(&[("x", &[0.5, 1.0])]);
        let result = parse_mat(&bytes[..], &FieldNames::default());
        assert!(matches!(result, Err(AnalysisError::Configuration(_))));

        let garbage = parse_mat(&b"not a mat file"[..], &FieldNames::default());
        assert!(matches!(garbage, Err(AnalysisError::MatFile(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load_signal(Path::new("recording.flac"), &FieldNames::default());
        assert!(matches!(result, Err(AnalysisError::Configuration(_))));
    }
}
