//! Soundtrack assets on disk and in memory
//!
//! The base track is only ever synthesized when its file is missing. Stereo
//! variants are derived from whatever 16-bit base file is on disk, so a
//! hand-edited base flows into every variant.

use std::fs;
use std::path::{Path, PathBuf};

use super::bgm::{self, SAMPLE_RATE};
use super::variants::{self, StereoTrack};
use super::wav::{WavError, WavFile};
use crate::settings::SoundtrackVariant;

/// Sibling path of `base` for the given variant (`urgent_bgm.wav` → `urgent_bgm_punchy.wav`)
pub fn variant_path(base: &Path, variant: SoundtrackVariant) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "urgent_bgm".to_string());
    let suffix = match variant {
        SoundtrackVariant::Urgent => return base.to_path_buf(),
        SoundtrackVariant::Punchy => "punchy",
        SoundtrackVariant::Rhythmic => "rhythmic",
        SoundtrackVariant::MetallicStereo => "metallic_stereo",
        SoundtrackVariant::Dynamic => "dynamic",
    };
    base.with_file_name(format!("{}_{}.wav", stem, suffix))
}

/// Synthesize the mono base track
pub fn render_base() -> WavFile {
    WavFile::from_pcm16(1, SAMPLE_RATE, &bgm::render_pcm())
}

/// Derive a stereo variant from a mono 16-bit base, `None` if the base is not 16-bit
pub fn render_variant(base: &WavFile, variant: SoundtrackVariant) -> Option<WavFile> {
    let samples = base.samples_i16()?;
    let mono = bgm::from_pcm16(&samples);
    let sr = base.sample_rate;
    let track: StereoTrack = match variant {
        SoundtrackVariant::Punchy => variants::punchy(&mono, sr),
        SoundtrackVariant::Rhythmic => variants::rhythmic(&mono, sr),
        SoundtrackVariant::MetallicStereo => variants::metallic_stereo(&mono, sr),
        SoundtrackVariant::Dynamic => variants::dynamic(&mono, sr),
        SoundtrackVariant::Urgent => return Some(base.clone()),
    };
    Some(WavFile::from_pcm16(2, sr, &track.to_pcm16()))
}

/// Synthesize a soundtrack entirely in memory
pub fn render(variant: SoundtrackVariant) -> WavFile {
    let base = render_base();
    render_variant(&base, variant).unwrap_or(base)
}

/// Write the base track to `path` unless a file is already there
pub fn ensure_urgent_bgm(path: &Path) -> Result<PathBuf, WavError> {
    if path.exists() {
        log::debug!("{} already exists", path.display());
        return Ok(path.to_path_buf());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let wav = render_base();
    wav.write(path)?;
    log::info!(
        "Generated {} ({:.1}s at {} Hz)",
        path.display(),
        wav.duration_secs(),
        wav.sample_rate
    );
    Ok(path.to_path_buf())
}

/// Ensure the base track, then write the punchy, rhythmic and metallic
/// stereo variants next to it
///
/// Returns every path produced, base first. Variants are skipped when the
/// base is not 16-bit.
pub fn ensure_urgent_bgm_variants(path: &Path) -> Result<Vec<PathBuf>, WavError> {
    let base_path = ensure_urgent_bgm(path)?;
    let mut created = vec![base_path.clone()];

    let base = WavFile::read(&base_path)?;
    if base.bits_per_sample != 16 {
        log::warn!(
            "{} is {}-bit; skipping stereo variants",
            base_path.display(),
            base.bits_per_sample
        );
        return Ok(created);
    }

    for variant in [
        SoundtrackVariant::Punchy,
        SoundtrackVariant::Rhythmic,
        SoundtrackVariant::MetallicStereo,
    ] {
        if let Some(path) = write_variant(&base, &base_path, variant)? {
            created.push(path);
        }
    }
    Ok(created)
}

/// Ensure the base track, then write the dynamic stereo variant
///
/// Returns the base path when the base is not 16-bit.
pub fn ensure_urgent_bgm_dynamic(path: &Path) -> Result<PathBuf, WavError> {
    let base_path = ensure_urgent_bgm(path)?;
    let base = WavFile::read(&base_path)?;
    let written = write_variant(&base, &base_path, SoundtrackVariant::Dynamic)?;
    Ok(written.unwrap_or(base_path))
}

/// Every soundtrack file in `dir`, generating what is missing
pub fn generate_all(dir: &Path) -> Result<Vec<PathBuf>, WavError> {
    let base = dir.join(SoundtrackVariant::Urgent.file_name());
    let mut paths = ensure_urgent_bgm_variants(&base)?;
    let dynamic = ensure_urgent_bgm_dynamic(&base)?;
    if !paths.contains(&dynamic) {
        paths.push(dynamic);
    }
    Ok(paths)
}

fn write_variant(
    base: &WavFile,
    base_path: &Path,
    variant: SoundtrackVariant,
) -> Result<Option<PathBuf>, WavError> {
    let Some(wav) = render_variant(base, variant) else {
        log::warn!(
            "{} is not 16-bit; skipping {}",
            base_path.display(),
            variant.as_str()
        );
        return Ok(None);
    };
    let path = variant_path(base_path, variant);
    wav.write(&path)?;
    log::info!("Generated {} variant at {}", variant.as_str(), path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fresh scratch directory per test
    fn scratch_dir(name: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "airdrop-soundtrack-{}-{}-{}",
            std::process::id(),
            name,
            n
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    /// Small 16-bit mono file standing in for a synthesized base
    fn write_short_base(path: &Path) -> WavFile {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let samples: Vec<i16> = (0..2000).map(|i| ((i % 100) * 300 - 15000) as i16).collect();
        let wav = WavFile::from_pcm16(1, 8000, &samples);
        wav.write(path).unwrap();
        wav
    }

    #[test]
    fn test_variant_paths() {
        let base = Path::new("assets/sounds/urgent_bgm.wav");
        assert_eq!(variant_path(base, SoundtrackVariant::Urgent), base);
        assert_eq!(
            variant_path(base, SoundtrackVariant::MetallicStereo),
            Path::new("assets/sounds/urgent_bgm_metallic_stereo.wav")
        );
        for variant in SoundtrackVariant::ALL {
            let path = variant_path(base, variant);
            assert_eq!(path.file_name().unwrap().to_str().unwrap(), variant.file_name());
        }
    }

    #[test]
    fn test_existing_base_is_kept() {
        let dir = scratch_dir("keep");
        let path = dir.join("urgent_bgm.wav");
        let original = write_short_base(&path);

        ensure_urgent_bgm(&path).unwrap();
        assert_eq!(WavFile::read(&path).unwrap(), original);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_variants_derive_from_disk() {
        let dir = scratch_dir("variants");
        let path = dir.join("urgent_bgm.wav");
        write_short_base(&path);

        let created = ensure_urgent_bgm_variants(&path).unwrap();
        assert_eq!(created.len(), 4);
        assert_eq!(created[0], path);
        for variant_file in &created[1..] {
            let wav = WavFile::read(variant_file).unwrap();
            assert_eq!(wav.channels, 2);
            assert_eq!(wav.sample_rate, 8000);
            assert_eq!(wav.frames(), 2000);
        }

        let dynamic = ensure_urgent_bgm_dynamic(&path).unwrap();
        assert_eq!(dynamic, dir.join("urgent_bgm_dynamic.wav"));
        assert_eq!(WavFile::read(&dynamic).unwrap().channels, 2);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_eight_bit_base_skips_variants() {
        let dir = scratch_dir("eight-bit");
        let path = dir.join("urgent_bgm.wav");
        fs::create_dir_all(&dir).unwrap();
        WavFile {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 8,
            data: vec![128; 800],
        }
        .write(&path)
        .unwrap();

        assert_eq!(ensure_urgent_bgm_variants(&path).unwrap(), vec![path.clone()]);
        assert_eq!(ensure_urgent_bgm_dynamic(&path).unwrap(), path);
        assert!(!dir.join("urgent_bgm_punchy.wav").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_generates_base_into_new_directory() {
        let dir = scratch_dir("fresh").join("nested");
        let path = dir.join("urgent_bgm.wav");

        ensure_urgent_bgm(&path).unwrap();
        let wav = WavFile::read(&path).unwrap();
        assert_eq!(wav.channels, 1);
        assert_eq!(wav.sample_rate, SAMPLE_RATE);
        assert_eq!(wav.frames(), bgm::sample_count());
        let _ = fs::remove_dir_all(dir.parent().unwrap());
    }
}
