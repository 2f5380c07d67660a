/// Data analysis for the meetbouten export pipeline.
///
/// Submodules:
/// - `zakking` — groups flat rows by address, orders them
///   chronologically, and computes the derived recent settlement rate.

pub mod zakking;
