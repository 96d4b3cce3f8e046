//! Continue a caller's trace from W3C `traceparent` headers.

use opentelemetry::{Context, global, propagation::Extractor, trace::TraceContextExt as _};
use salvo::http::{HeaderMap, HeaderName};

/// Read-only view of request headers for the text map propagator.
struct Carrier<'a>(&'a HeaderMap);

impl Extractor for Carrier<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

/// The remote parent, when the headers carry a valid span context.
///
/// Extraction starts from an empty context so a request without trace
/// headers never attaches to whatever span is current in-process.
pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    let remote = global::get_text_map_propagator(|propagator| {
        propagator.extract_with_context(&Context::new(), &Carrier(headers))
    });

    let valid = remote.span().span_context().is_valid();

    valid.then_some(remote)
}
