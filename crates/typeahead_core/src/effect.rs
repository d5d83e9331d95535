use crate::CycleId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Drop the armed delay for `cycle` before it fires.
    CancelDelay { cycle: CycleId },
    /// Arm the delay coordinator; it reports back with `Msg::DelayElapsed`.
    ArmDelay { cycle: CycleId },
    /// Invoke the query source; it reports back with `Msg::QueryResolved`.
    Fetch { cycle: CycleId, query: String },
}
