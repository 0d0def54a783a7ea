//! Utility functions for image processing
//!
//! This module provides helpers shared by the pipeline stages:
//! - Grayscale conversion (RGB to luminance)
//! - Threshold binarization and strip statistics
//! - Byte-scaled HSV conversion

/// Global thresholding and strip statistics
pub mod binarization;
/// RGB to luminance
pub mod grayscale;
/// RGB to byte-scaled HSV
pub mod hsv;
