//! Prometheus metrics: HTTP traffic plus shop events (checkouts, payment
//! confirmations, voucher redemptions).

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const PREFIX: &str = "driftworks_json";

const DURATION_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    checkouts_total: IntCounterVec,
    payment_confirmations_total: IntCounterVec,
    voucher_redemptions_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

/// Keeps the in-flight gauge raised for as long as it lives.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let Some(metrics) = metrics() else {
            return Self { tracked: false };
        };

        metrics.requests_in_flight.inc();

        Self { tracked: true }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code_label = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class(status_code), status_code_label.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a finished checkout: `payment_required`, `completed`, `replayed` or
/// `rejected`.
pub(crate) fn record_checkout(outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics.checkouts_total.with_label_values(&[outcome]).inc();
    }
}

/// Count a payment webhook: `created`, `replayed`, `ignored` or `failed`.
pub(crate) fn record_payment_confirmation(outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .payment_confirmations_total
            .with_label_values(&[outcome])
            .inc();
    }
}

/// Count a redemption attempt: `redeemed`, `already_redeemed`, `expired`,
/// `not_active` or `failed`.
pub(crate) fn record_voucher_redemption(outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .voucher_redemptions_total
            .with_label_values(&[outcome])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("failed to build metrics content type: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn metrics() -> Option<&'static Metrics> {
    METRICS.get_or_init(build_metrics).as_ref()
}

fn counter(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> Result<IntCounterVec, prometheus::Error> {
    let metric = IntCounterVec::new(Opts::new(format!("{PREFIX}_{name}"), help), labels)?;

    register(registry, &metric)?;

    Ok(metric)
}

fn register<C>(registry: &Registry, metric: &C) -> Result<(), prometheus::Error>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(metric.clone()))
}

fn try_build_metrics() -> Result<Metrics, prometheus::Error> {
    let registry = Registry::new();

    let requests_total = counter(
        &registry,
        "http_requests_total",
        "Total HTTP requests partitioned by method, route, status class, and status code.",
        &["method", "route", "status_class", "status_code"],
    )?;

    let request_duration_seconds = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds partitioned by method and route.",
        )
        .buckets(DURATION_BUCKETS.to_vec()),
        &["method", "route"],
    )?;

    register(&registry, &request_duration_seconds)?;

    let requests_in_flight = IntGauge::with_opts(Opts::new(
        format!("{PREFIX}_http_requests_in_flight"),
        "Current number of in-flight HTTP requests.",
    ))?;

    register(&registry, &requests_in_flight)?;

    let checkouts_total = counter(
        &registry,
        "checkouts_total",
        "Checkouts partitioned by outcome.",
        &["outcome"],
    )?;

    let payment_confirmations_total = counter(
        &registry,
        "payment_confirmations_total",
        "Payment webhooks partitioned by outcome.",
        &["outcome"],
    )?;

    let voucher_redemptions_total = counter(
        &registry,
        "voucher_redemptions_total",
        "Voucher redemption attempts partitioned by outcome.",
        &["outcome"],
    )?;

    Ok(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        checkouts_total,
        payment_confirmations_total,
        voucher_redemptions_total,
    })
}

fn build_metrics() -> Option<Metrics> {
    try_build_metrics()
        .inspect_err(|source| error!("failed to build metrics registry: {source}"))
        .ok()
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    async fn scrape() -> TestResult<String> {
        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        Ok(TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?)
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_metrics() -> TestResult {
        observe_request("POST", "/staff/vouchers/{voucher}/redeem", 200, 0.042);
        observe_request("POST", "/staff/vouchers/{voucher}/redeem", 409, 0.013);

        let response = scrape().await?;

        assert!(
            response.contains("driftworks_json_http_requests_total"),
            "expected requests_total metric in response"
        );
        assert!(
            response.contains("driftworks_json_http_request_duration_seconds"),
            "expected request_duration metric in response"
        );
        assert!(
            response.contains("driftworks_json_http_requests_in_flight"),
            "expected in-flight metric in response"
        );
        assert!(
            response.contains(r#"status_class="4xx""#),
            "expected status class label in response"
        );

        Ok(())
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_shop_events() -> TestResult {
        record_checkout("payment_required");
        record_payment_confirmation("created");
        record_voucher_redemption("expired");

        let response = scrape().await?;

        assert!(
            response.contains(r#"driftworks_json_checkouts_total{outcome="payment_required"}"#),
            "expected checkout counter in response"
        );
        assert!(
            response.contains(r#"driftworks_json_payment_confirmations_total{outcome="created"}"#),
            "expected payment confirmation counter in response"
        );
        assert!(
            response.contains(r#"driftworks_json_voucher_redemptions_total{outcome="expired"}"#),
            "expected redemption counter in response"
        );

        Ok(())
    }

    #[test]
    fn status_classes() {
        assert_eq!(status_class(202), "2xx");
        assert_eq!(status_class(410), "4xx");
        assert_eq!(status_class(502), "5xx");
        assert_eq!(status_class(99), "other");
    }
}
