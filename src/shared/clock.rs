//! Wall clock in epoch millis, the unit every meeting timestamp uses.

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
