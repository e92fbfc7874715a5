//! 샘플 값 해석.
//!
//! 고정 패밀리는 값 맵의 유일한 항목을 숫자로 읽고,
//! 동적 패밀리는 `{k=v}` 요약 문자열을 다시 파싱한다.

use eggsink_core::models::record::MetricValue;
use eggsink_core::models::sample::RawSample;
use serde_json::Value;

use crate::routes::Transform;

/// JSON 값 → 숫자
///
/// 호스트가 숫자를 문자열로 넘기는 경우도 허용한다.
pub fn to_metric_value(value: &Value) -> Result<MetricValue, String> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(MetricValue::Int(i)),
            None => n
                .as_f64()
                .map(MetricValue::Float)
                .ok_or_else(|| format!("숫자 변환 불가: {n}")),
        },
        Value::String(s) => parse_numeric(s),
        other => Err(format!("숫자가 아닌 값: {other}")),
    }
}

fn parse_numeric(raw: &str) -> Result<MetricValue, String> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(MetricValue::Int(i));
    }
    parse_finite_f64(raw).map(MetricValue::Float)
}

fn parse_finite_f64(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        Ok(f) => Err(format!("유한하지 않은 값: {f}")),
        Err(e) => Err(format!("숫자 파싱 실패 '{raw}': {e}")),
    }
}

/// 고정 패밀리 샘플의 값: 값 맵에 항목이 정확히 하나여야 한다
pub fn single_value(sample: &RawSample) -> Result<MetricValue, String> {
    let mut iter = sample.values.values();
    match (iter.next(), iter.next()) {
        (Some(value), None) => to_metric_value(value),
        (None, _) => Err("값 없음".to_string()),
        (Some(_), Some(_)) => Err(format!("값이 {}개: 하나만 허용", sample.values.len())),
    }
}

/// 변환 적용
pub fn apply(transform: Transform, value: MetricValue) -> MetricValue {
    match transform {
        Transform::Identity => value,
        Transform::Scale(divisor) => MetricValue::Float(value.as_f64() / divisor),
    }
}

/// 동적 패밀리의 `{k=v}` 요약에서 (k, v) 추출
///
/// 값 맵이 이미 요약 문자열 하나만 담고 있으면 그것을, 아니면 맵의 문자열 표현을 파싱한다.
pub fn summary_pair(sample: &RawSample) -> Result<(String, String), String> {
    let summary = match sample.values.values().next() {
        Some(Value::String(s)) if sample.values.len() == 1 && is_braced(s.trim()) => {
            s.trim().to_string()
        }
        _ => sample.summary_string(),
    };

    let inner = summary
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| format!("요약 형식 아님: {summary}"))?;
    let (key, value) = inner
        .split_once('=')
        .ok_or_else(|| format!("'=' 없음: {summary}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("빈 키: {summary}"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn is_braced(s: &str) -> bool {
    s.starts_with('{') && s.ends_with('}')
}

/// 동적 패밀리 값 타입 결정
///
/// 키에 "Size"가 들어 있으면 i64, "Load"이면 실수, 그 외는 i32 범위 정수.
pub fn typed_summary_value(key: &str, raw: &str) -> Result<MetricValue, String> {
    if key.contains("Size") {
        raw.parse::<i64>()
            .map(MetricValue::Int)
            .map_err(|e| format!("{key}={raw}: i64 파싱 실패: {e}"))
    } else if key == "Load" {
        parse_finite_f64(raw).map(MetricValue::Float)
    } else {
        raw.parse::<i32>()
            .map(|v| MetricValue::Int(i64::from(v)))
            .map_err(|e| format!("{key}={raw}: i32 파싱 실패: {e}"))
    }
}
