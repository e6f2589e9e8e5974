use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, HistogramVec, register_counter, register_counter_vec,
    register_gauge, register_histogram_vec,
};

// Registration only fails on a duplicate name, which would be a bug here
lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("mail_gateway_requests_total", "Total number of requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter = register_counter!(
        "mail_gateway_rate_limited_total",
        "Requests rejected by the rate limiter"
    )
    .unwrap();
    pub static ref EMAILS_SENT: CounterVec = register_counter_vec!(
        "mail_gateway_emails_sent_total",
        "Emails accepted by a transport",
        &["method"]
    )
    .unwrap();
    pub static ref EMAILS_FAILED: CounterVec = register_counter_vec!(
        "mail_gateway_emails_failed_total",
        "Emails a transport failed to send",
        &["method"]
    )
    .unwrap();
    pub static ref SEND_LATENCY: HistogramVec = register_histogram_vec!(
        "mail_gateway_send_latency_seconds",
        "Transport send latency in seconds",
        &["method"]
    )
    .unwrap();
    pub static ref TRACKED_CLIENTS: Gauge = register_gauge!(
        "mail_gateway_rate_limit_clients",
        "Client ids currently tracked by the rate limiter"
    )
    .unwrap();
}
