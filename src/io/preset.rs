//! TOML presets for [`KickParams`].
//!
//! A preset mirrors the parameter struct; any missing field takes its
//! default, so a file holding only `[envelope] decay = 0.4` is valid.

use std::{fs, path::Path};

use tracing::info;

use crate::{synth::params::KickParams, KickError};

pub fn parse_preset(text: &str) -> Result<KickParams, KickError> {
    Ok(toml::from_str(text)?)
}

pub fn to_toml_string(params: &KickParams) -> Result<String, KickError> {
    Ok(toml::to_string_pretty(params)?)
}

pub fn load_preset(path: impl AsRef<Path>) -> Result<KickParams, KickError> {
    let path = path.as_ref();
    let params = parse_preset(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), "loaded preset");
    Ok(params)
}

pub fn save_preset(path: impl AsRef<Path>, params: &KickParams) -> Result<(), KickError> {
    let path = path.as_ref();
    fs::write(path, to_toml_string(params)?)?;
    info!(path = %path.display(), "saved preset");
    Ok(())
}
