use std::sync::atomic::{AtomicI64, Ordering};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

static LAST_CREATED_AT: AtomicI64 = AtomicI64::new(0);

/// Strictly increasing creation timestamp (milliseconds).
///
/// Falls back to `last + 1` when the wall clock has not moved (or moved
/// backwards) since the previous call, so records created in the same
/// millisecond still sort in creation order.
pub fn next_created_at() -> i64 {
    let now = now_millis();
    let mut last = LAST_CREATED_AT.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_CREATED_AT.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_created_at_is_strictly_increasing() {
        let stamps: Vec<i64> = (0..1000).map(|_| next_created_at()).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }
}
