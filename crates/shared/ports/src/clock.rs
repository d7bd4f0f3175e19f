use wardops_core::SimTime;

/// Port for reading simulated time
///
/// Display layers (slider, digital clock, marker lanes) depend on this
/// rather than on the concrete playback state machine.
pub trait Clock: Send + Sync {
    /// Get the current simulated time according to this clock
    fn now(&self) -> SimTime;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
