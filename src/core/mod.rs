/// Core module for macro classification
///
/// This module contains the classifier, the rule table it applies and the
/// result types it produces.

pub mod analyzer;
pub mod patterns;
pub mod result;
