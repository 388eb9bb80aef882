//! Integral solver built on top of the symbolic engine.
/// method label guessed from the input text
pub mod classifier;
/// the full pipeline from raw text to a serializable result
pub mod integral_solver;
/// text rewrites turning user notation into parser syntax
pub mod normalizer;
/// rules reference and canonical example problems
pub mod rules;
/// canned explanation lines
pub mod steps;
