/// Classification for retry policy.
///
/// | Class | Retry? |
/// |-------|--------|
/// | `Never` | No, the request itself is wrong |
/// | `WithBackoff` | Yes, after a short delay |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - unknown symbol, bad range, invalid data.
    Never,

    /// Transient failure (timeout, outage). A later attempt may succeed.
    WithBackoff,
}

impl RetryClass {
    pub fn is_retryable(self) -> bool {
        matches!(self, RetryClass::WithBackoff)
    }
}
