use std::{
    collections::HashMap,
    sync::{Mutex, OnceLock},
};

static METRICS: OnceLock<Mutex<MetricsState>> = OnceLock::new();

#[derive(Default)]
struct MetricsState {
    total: u64,
    errors: u64,
    per_endpoint: HashMap<&'static str, u64>,
    per_endpoint_err: HashMap<&'static str, u64>,
    // 上游成功/失败与时延统计（毫秒），按服务名
    upstream_ok: HashMap<&'static str, u64>,
    upstream_err: HashMap<&'static str, u64>,
    upstream_latency_sum_ms: u128,
    // 简易直方图分桶（毫秒）：<50, <100, <250, <500, <1000, >=1000
    upstream_hist_buckets: [u64; 6],
    // 账户名解析结果
    verification_primary: u64,
    verification_fallback: u64,
    rate_limited: u64,
}

fn state() -> std::sync::MutexGuard<'static, MetricsState> {
    let lock = METRICS.get_or_init(|| Mutex::new(MetricsState::default()));
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(), // 避免因锁污染导致 panic
    }
}

pub fn count_ok(endpoint: &'static str) {
    let mut s = state();
    s.total += 1;
    *s.per_endpoint.entry(endpoint).or_insert(0) += 1;
}

pub fn count_err(endpoint: &'static str) {
    let mut s = state();
    s.total += 1;
    s.errors += 1;
    *s.per_endpoint.entry(endpoint).or_insert(0) += 1;
    *s.per_endpoint_err.entry(endpoint).or_insert(0) += 1;
}

pub fn observe_upstream_latency_ms(provider: &'static str, ms: u128, ok: bool) {
    let mut s = state();
    if ok {
        *s.upstream_ok.entry(provider).or_insert(0) += 1;
    } else {
        *s.upstream_err.entry(provider).or_insert(0) += 1;
    }
    s.upstream_latency_sum_ms += ms;
    let idx = match ms {
        0..=49 => 0,
        50..=99 => 1,
        100..=249 => 2,
        250..=499 => 3,
        500..=999 => 4,
        _ => 5,
    };
    s.upstream_hist_buckets[idx] += 1;
}

pub fn count_verification(fallback: bool) {
    let mut s = state();
    if fallback {
        s.verification_fallback += 1;
    } else {
        s.verification_primary += 1;
    }
}

pub fn count_rate_limited() {
    state().rate_limited += 1;
}

pub fn render_prometheus() -> String {
    let s = state();
    let mut out = String::new();
    out.push_str("# HELP miles_requests_total Total API requests\n");
    out.push_str("# TYPE miles_requests_total counter\n");
    out.push_str(&format!("miles_requests_total {}\n", s.total));

    out.push_str("# HELP miles_errors_total Total API error responses\n");
    out.push_str("# TYPE miles_errors_total counter\n");
    out.push_str(&format!("miles_errors_total {}\n", s.errors));

    out.push_str("# HELP miles_endpoint_requests_total Requests per endpoint\n");
    out.push_str("# TYPE miles_endpoint_requests_total counter\n");
    for (k, v) in s.per_endpoint.iter() {
        out.push_str(&format!(
            "miles_endpoint_requests_total{{endpoint=\"{}\"}} {}\n",
            k, v
        ));
    }

    out.push_str("# HELP miles_endpoint_errors_total Errors per endpoint\n");
    out.push_str("# TYPE miles_endpoint_errors_total counter\n");
    for (k, v) in s.per_endpoint_err.iter() {
        out.push_str(&format!(
            "miles_endpoint_errors_total{{endpoint=\"{}\"}} {}\n",
            k, v
        ));
    }

    // 上游统计
    out.push_str("# HELP miles_upstream_requests_total Upstream requests\n");
    out.push_str("# TYPE miles_upstream_requests_total counter\n");
    for (k, v) in s.upstream_ok.iter() {
        out.push_str(&format!(
            "miles_upstream_requests_total{{provider=\"{}\",result=\"ok\"}} {}\n",
            k, v
        ));
    }
    for (k, v) in s.upstream_err.iter() {
        out.push_str(&format!(
            "miles_upstream_requests_total{{provider=\"{}\",result=\"err\"}} {}\n",
            k, v
        ));
    }

    out.push_str("# HELP miles_upstream_latency_ms_sum Sum of upstream latency in ms\n");
    out.push_str("# TYPE miles_upstream_latency_ms_sum counter\n");
    out.push_str(&format!(
        "miles_upstream_latency_ms_sum {}\n",
        s.upstream_latency_sum_ms
    ));

    out.push_str("# HELP miles_upstream_latency_ms_bucket Upstream latency histogram buckets\n");
    out.push_str("# TYPE miles_upstream_latency_ms_bucket histogram\n");
    let bounds = [50, 100, 250, 500, 1000];
    let mut cumulative = 0u64;
    for (i, bound) in bounds.iter().enumerate() {
        cumulative += s.upstream_hist_buckets[i];
        out.push_str(&format!(
            "miles_upstream_latency_ms_bucket{{le=\"{}\"}} {}\n",
            bound, cumulative
        ));
    }
    // +Inf 桶
    out.push_str(&format!(
        "miles_upstream_latency_ms_bucket{{le=\"+Inf\"}} {}\n",
        s.upstream_hist_buckets.iter().sum::<u64>()
    ));

    out.push_str("# HELP miles_verifications_total Resolved account names by source\n");
    out.push_str("# TYPE miles_verifications_total counter\n");
    out.push_str(&format!(
        "miles_verifications_total{{source=\"primary\"}} {}\n",
        s.verification_primary
    ));
    out.push_str(&format!(
        "miles_verifications_total{{source=\"fallback\"}} {}\n",
        s.verification_fallback
    ));

    out.push_str("# HELP miles_rate_limited_total Requests rejected by the rate limiter\n");
    out.push_str("# TYPE miles_rate_limited_total counter\n");
    out.push_str(&format!("miles_rate_limited_total {}\n", s.rate_limited));

    out
}
