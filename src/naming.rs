// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filename and image-type checks shared by the store and the web layer

use std::path::{Component, Path};

use crate::{Result, SwipeError};

/// Extensions listed as pending images (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Check whether a filename carries a supported image extension
pub fn is_supported_image(name: &str) -> bool {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) => SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Validate a client-supplied filename.
///
/// The name must be a single plain path component: anything that would
/// resolve outside the pending directory is rejected.
pub fn validate_filename(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        return Err(SwipeError::InvalidRequest("Filename required".to_string()));
    }

    if name.contains(&['/', '\\', '\0'][..]) {
        return Err(SwipeError::InvalidRequest(format!("Invalid filename: {}", name)));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(SwipeError::InvalidRequest(format!("Invalid filename: {}", name))),
    }
}
