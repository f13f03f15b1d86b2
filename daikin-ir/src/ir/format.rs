mod daikin_arc;

pub use daikin_arc::{DaikinArc, DaikinArcLegacy, InvalidProtocolRevision, ProtocolRevision};
