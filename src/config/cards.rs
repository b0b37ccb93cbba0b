//! Card template configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Card template configuration
///
/// Templates are compiled into the binary; setting `template_dir` loads
/// them from disk instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardsConfig {
    /// Directory holding `<template>.json` files
    pub template_dir: Option<PathBuf>,
}
