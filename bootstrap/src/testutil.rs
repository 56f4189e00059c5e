//! 测试辅助

/// 从 Prometheus 文本中读取无标签计数器的值
pub fn counter_value(rendered: &str, name: &str) -> Option<u64> {
    rendered.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some(metric), Some(value)) if metric == name => value.parse().ok(),
            _ => None,
        }
    })
}
