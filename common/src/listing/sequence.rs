/// Token identifying one asynchronous operation within a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Monotonic request sequencing: the explicit cancellation-token pattern.
///
/// Each stream that can be superseded (the main list fetch, the suggestion
/// fetch, each debounce timer) owns one sequencer. Starting an operation
/// issues a token; issuing again invalidates every earlier token. A
/// completion commits its result only if its token is still current, so a
/// late response from an outpaced request is discarded even though nothing
/// was ever "aborted" at the transport level.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    current: u64,
}

impl RequestSequencer {
    pub fn new() -> RequestSequencer {
        RequestSequencer::default()
    }

    /// Starts a new operation, superseding all outstanding ones.
    pub fn issue(&mut self) -> RequestToken {
        self.current += 1;
        RequestToken(self.current)
    }

    /// True while no newer operation has started.
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.current
    }

    /// Invalidates every outstanding token without starting a new
    /// operation (e.g. when cached data made the fetch unnecessary).
    pub fn invalidate_all(&mut self) {
        self.current += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_is_current_until_superseded() {
        let mut seq = RequestSequencer::new();
        let a = seq.issue();
        assert!(seq.is_current(a));

        let b = seq.issue();
        assert!(!seq.is_current(a));
        assert!(seq.is_current(b));
    }

    #[test]
    fn older_completion_is_a_no_op() {
        // Fetch A starts, then fetch B starts before A resolves. Whichever
        // order the responses land in, only B's may commit.
        let mut seq = RequestSequencer::new();
        let mut displayed = "initial";

        let token_a = seq.issue();
        let token_b = seq.issue();

        // B lands first and commits.
        if seq.is_current(token_b) {
            displayed = "from B";
        }
        // A lands late and must not overwrite.
        if seq.is_current(token_a) {
            displayed = "from A";
        }
        assert_eq!(displayed, "from B");
    }

    #[test]
    fn invalidate_all_kills_outstanding_tokens() {
        let mut seq = RequestSequencer::new();
        let token = seq.issue();
        seq.invalidate_all();
        assert!(!seq.is_current(token));
    }
}
