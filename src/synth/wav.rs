//! Minimal RIFF/WAVE reader and writer for integer PCM

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Errors from reading or writing WAV data
#[derive(Debug)]
pub enum WavError {
    Io(io::Error),
    /// Missing the `RIFF....WAVE` header
    NotRiff,
    /// A required chunk (`fmt ` or `data`) is absent
    MissingChunk(&'static str),
    /// Compressed or otherwise non-PCM encoding
    Unsupported(String),
    /// Data ended in the middle of a header or chunk
    Truncated,
}

impl fmt::Display for WavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WavError::Io(e) => write!(f, "i/o error: {}", e),
            WavError::NotRiff => write!(f, "not a RIFF/WAVE file"),
            WavError::MissingChunk(id) => write!(f, "missing '{}' chunk", id),
            WavError::Unsupported(what) => write!(f, "unsupported format: {}", what),
            WavError::Truncated => write!(f, "file is truncated"),
        }
    }
}

impl std::error::Error for WavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WavError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for WavError {
    fn from(e: io::Error) -> Self {
        WavError::Io(e)
    }
}

const PCM_FORMAT: u16 = 1;

/// Integer PCM audio with its raw little-endian sample bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavFile {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Interleaved sample bytes
    pub data: Vec<u8>,
}

impl WavFile {
    /// Wrap interleaved 16-bit samples
    pub fn from_pcm16(channels: u16, sample_rate: u32, samples: &[i16]) -> Self {
        let data = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self {
            channels,
            sample_rate,
            bits_per_sample: 16,
            data,
        }
    }

    /// Bytes per sample of one channel
    pub fn sample_width(&self) -> u16 {
        self.bits_per_sample.div_ceil(8)
    }

    fn block_align(&self) -> u16 {
        self.channels * self.sample_width()
    }

    /// Number of sample frames (one sample per channel)
    pub fn frames(&self) -> usize {
        match self.block_align() {
            0 => 0,
            align => self.data.len() / align as usize,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Interleaved samples, `None` unless the file is 16-bit
    pub fn samples_i16(&self) -> Option<Vec<i16>> {
        if self.bits_per_sample != 16 {
            return None;
        }
        Some(
            self.data
                .chunks_exact(2)
                .map(|b| i16::from_le_bytes([b[0], b[1]]))
                .collect(),
        )
    }

    /// Serialize as a canonical 44-byte-header WAV file
    pub fn encode(&self) -> Vec<u8> {
        let data_len = self.data.len() as u32;
        let pad = data_len % 2;
        let mut out = Vec::with_capacity(44 + self.data.len() + pad as usize);

        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len + pad).to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&PCM_FORMAT.to_le_bytes());
        out.extend_from_slice(&self.channels.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        let byte_rate = self.sample_rate * self.block_align() as u32;
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&self.block_align().to_le_bytes());
        out.extend_from_slice(&self.bits_per_sample.to_le_bytes());

        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.extend_from_slice(&self.data);
        if pad == 1 {
            out.push(0);
        }
        out
    }

    /// Parse a WAV file, skipping chunks other than `fmt ` and `data`
    pub fn decode(bytes: &[u8]) -> Result<Self, WavError> {
        if bytes.len() < 12 {
            return Err(if bytes.starts_with(b"RIFF") || bytes.is_empty() {
                WavError::Truncated
            } else {
                WavError::NotRiff
            });
        }
        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(WavError::NotRiff);
        }

        let mut format: Option<(u16, u32, u16)> = None;
        let mut data: Option<&[u8]> = None;
        let mut pos = 12;

        while pos + 8 <= bytes.len() {
            let id = &bytes[pos..pos + 4];
            let len = read_u32(bytes, pos + 4)? as usize;
            let body_start = pos + 8;
            let body_end = body_start.checked_add(len).ok_or(WavError::Truncated)?;

            match id {
                b"fmt " => {
                    if len < 16 || body_end > bytes.len() {
                        return Err(WavError::Truncated);
                    }
                    let tag = read_u16(bytes, body_start)?;
                    if tag != PCM_FORMAT {
                        return Err(WavError::Unsupported(format!("format tag {:#06x}", tag)));
                    }
                    let channels = read_u16(bytes, body_start + 2)?;
                    let sample_rate = read_u32(bytes, body_start + 4)?;
                    let bits = read_u16(bytes, body_start + 14)?;
                    if channels == 0 || bits == 0 {
                        return Err(WavError::Unsupported(format!(
                            "{} channels at {} bits",
                            channels, bits
                        )));
                    }
                    format = Some((channels, sample_rate, bits));
                }
                b"data" => {
                    if body_end > bytes.len() {
                        return Err(WavError::Truncated);
                    }
                    data = Some(&bytes[body_start..body_end]);
                }
                _ => {}
            }

            // Chunks are word aligned
            pos = body_end + (len % 2);
        }

        let (channels, sample_rate, bits_per_sample) =
            format.ok_or(WavError::MissingChunk("fmt "))?;
        let data = data.ok_or(WavError::MissingChunk("data"))?;

        Ok(Self {
            channels,
            sample_rate,
            bits_per_sample,
            data: data.to_vec(),
        })
    }

    pub fn read(path: &Path) -> Result<Self, WavError> {
        let bytes = fs::read(path)?;
        Self::decode(&bytes)
    }

    pub fn write(&self, path: &Path) -> Result<(), WavError> {
        fs::write(path, self.encode())?;
        Ok(())
    }
}

fn read_u16(bytes: &[u8], at: usize) -> Result<u16, WavError> {
    bytes
        .get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(WavError::Truncated)
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32, WavError> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(WavError::Truncated)
}
