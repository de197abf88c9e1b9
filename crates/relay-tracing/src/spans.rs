//! Span builder helpers for relay instrumentation.

/// Span for one inbound `/api/sofascore` request.
///
/// Usage: `let span = relay_request_span!(request_id, selector);`
///
/// `selector` is the raw query value (or "-" when absent). `sport` is
/// recorded after the selector parses; `outcome` once the handler knows
/// whether it relayed, rejected or failed.
#[macro_export]
macro_rules! relay_request_span {
    ($request_id:expr, $selector:expr) => {
        tracing::info_span!(
            "relay_request",
            request_id = %$request_id,
            selector = %$selector,
            sport = tracing::field::Empty,
            outcome = tracing::field::Empty,
        )
    };
}

/// Span for the single outbound GET to the upstream.
#[macro_export]
macro_rules! upstream_fetch_span {
    ($request_id:expr, $url:expr) => {
        tracing::info_span!(
            "upstream_fetch",
            request_id = %$request_id,
            url = %$url,
            status = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        )
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_span_macros_build_without_subscriber() {
        let request = relay_request_span!("abc", "nba");
        request.record("sport", "nba");
        request.record("outcome", "relayed");
        let fetch = upstream_fetch_span!("abc", "https://www.sofascore.com/basketball/nba");
        fetch.record("status", 200_u16);
        fetch.record("latency_ms", 12_u64);
    }
}
