// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::{Component, Path};

use swipesort::naming::{is_supported_image, validate_filename};

fuzz_target!(|name: &str| {
    if let Ok(valid) = validate_filename(name) {
        // Accepted names never leave the directory they are joined onto
        let joined = Path::new("pending").join(valid);
        assert_eq!(joined.parent(), Some(Path::new("pending")));
        assert!(joined.components().all(|c| matches!(c, Component::Normal(_))));
    }
    let _ = is_supported_image(name);
});
