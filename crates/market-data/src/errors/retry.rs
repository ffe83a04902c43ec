/// Classification for failover policy.
///
/// Used to determine how the resolver should respond to errors from providers.
///
/// | Class | Try Next Provider? | Count Toward Failure Threshold? |
/// |-------|-------------------|--------------------------------|
/// | `Never` | No | No |
/// | `FailoverWithPenalty` | Yes | Yes |
/// | `NextProvider` | Yes | No |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// The answer is authoritative (e.g. unknown instrument). Stop here.
    Never,

    /// Failover to the next provider and record a failure against this one.
    ///
    /// Used for timeouts, outages and undecodable payloads. Once a provider
    /// accumulates enough consecutive failures it is disabled for the
    /// cool-down window.
    FailoverWithPenalty,

    /// Try the next provider without recording any penalty.
    ///
    /// Used when this provider simply cannot serve the operation.
    NextProvider,
}
