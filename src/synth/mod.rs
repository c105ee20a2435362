//! Procedural soundtrack
//!
//! Pure signal generation plus a small WAV codec. Runs the same natively
//! (the asset tool) and in the browser (rendered once at startup).

pub mod bgm;
pub mod dsp;
pub mod soundtrack;
pub mod variants;
pub mod wav;

pub use soundtrack::{
    ensure_urgent_bgm, ensure_urgent_bgm_dynamic, ensure_urgent_bgm_variants, generate_all,
    render, variant_path,
};
pub use wav::{WavError, WavFile};
