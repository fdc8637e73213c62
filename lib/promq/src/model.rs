//! Prometheus HTTP API response models.
//!
//! Every endpoint answers with a [`ResponseEnvelope`]. Expression queries
//! carry [`QueryData`], whose samples are positional `[timestamp, "value"]`
//! arrays decoded through the tuple codec. Native histogram samples and
//! buckets are positional arrays too.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::TupleArray;

/// Series labels, `__name__` included.
pub type Labels = BTreeMap<String, String>;

/// Status field of the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request succeeded and `data` is set.
    Success,
    /// The request failed; `error_type` and `error` describe why.
    Error,
}

/// Envelope wrapping every Prometheus API response.
///
/// ```json
/// {"status": "error", "errorType": "bad_data", "error": "invalid parameter \"query\""}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    /// Outcome of the request.
    pub status: ResponseStatus,
    /// Payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Prometheus error category (`bad_data`, `timeout`, `execution`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Human readable error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Non-fatal warnings, e.g. partial results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> ResponseEnvelope<T> {
    /// Returns `true` if `status` is `success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Take the payload, if any.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Payload of the expression query endpoints.
///
/// Deserialization keeps the location of a bad sample in the error path
/// (`data.result[3].value`), whatever the order of `resultType` and `result`
/// in the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryData {
    /// Result, tagged by `resultType`.
    #[serde(flatten)]
    pub result: QueryResult,
    /// Query statistics, sent when the request asks for `stats`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<serde_json::Value>,
}

impl QueryData {
    /// Payload without statistics.
    #[must_use]
    pub const fn new(result: QueryResult) -> Self {
        Self {
            result,
            stats: None,
        }
    }

    /// The `resultType` name.
    #[must_use]
    pub const fn result_type(&self) -> &'static str {
        self.result.result_type()
    }

    /// Series of a vector result, if this is one.
    #[must_use]
    pub fn as_vector(&self) -> Option<&[InstantSeries]> {
        self.result.as_vector()
    }

    /// Series of a matrix result, if this is one.
    #[must_use]
    pub fn as_matrix(&self) -> Option<&[RangeSeries]> {
        self.result.as_matrix()
    }

    /// Sample of a scalar or string result.
    #[must_use]
    pub const fn as_sample(&self) -> Option<&Sample> {
        self.result.as_sample()
    }

    /// Drop the statistics and keep the result.
    #[must_use]
    pub fn into_result(self) -> QueryResult {
        self.result
    }
}

impl From<QueryResult> for QueryData {
    fn from(result: QueryResult) -> Self {
        Self::new(result)
    }
}

impl<'de> Deserialize<'de> for QueryData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(QueryDataVisitor)
    }
}

struct QueryDataVisitor;

impl<'de> Visitor<'de> for QueryDataVisitor {
    type Value = QueryData;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a query result object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<QueryData, A::Error> {
        let mut result_type = None;
        let mut result = None;
        let mut early_result: Option<serde_json::Value> = None;
        let mut stats = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "resultType" => result_type = Some(map.next_value::<ResultType>()?),
                "result" => match result_type {
                    Some(kind) => result = Some(map.next_value_seed(kind)?),
                    None => early_result = Some(map.next_value()?),
                },
                "stats" => stats = map.next_value()?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let kind = result_type.ok_or_else(|| <A::Error as de::Error>::missing_field("resultType"))?;
        let result = match (result, early_result) {
            (Some(result), _) => result,
            (None, Some(value)) => kind
                .deserialize(value)
                .map_err(<A::Error as de::Error>::custom)?,
            (None, None) => return Err(<A::Error as de::Error>::missing_field("result")),
        };
        Ok(QueryData { result, stats })
    }
}

/// `resultType` values, used to pick how `result` decodes.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ResultType {
    Matrix,
    Vector,
    Scalar,
    String,
}

impl<'de> DeserializeSeed<'de> for ResultType {
    type Value = QueryResult;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<QueryResult, D::Error> {
        Ok(match self {
            Self::Matrix => QueryResult::Matrix(Deserialize::deserialize(deserializer)?),
            Self::Vector => QueryResult::Vector(Deserialize::deserialize(deserializer)?),
            Self::Scalar => QueryResult::Scalar(Deserialize::deserialize(deserializer)?),
            Self::String => QueryResult::String(Deserialize::deserialize(deserializer)?),
        })
    }
}

/// Result of an expression query, tagged by `resultType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
pub enum QueryResult {
    /// Range query result: one series per label set, many samples each.
    Matrix(Vec<RangeSeries>),
    /// Instant query result: one sample per label set.
    Vector(Vec<InstantSeries>),
    /// A single numeric sample.
    Scalar(Sample),
    /// A single string sample.
    String(Sample),
}

impl QueryResult {
    /// The `resultType` name.
    #[must_use]
    pub const fn result_type(&self) -> &'static str {
        match self {
            Self::Matrix(_) => "matrix",
            Self::Vector(_) => "vector",
            Self::Scalar(_) => "scalar",
            Self::String(_) => "string",
        }
    }

    /// Series of a vector result, if this is one.
    #[must_use]
    pub fn as_vector(&self) -> Option<&[InstantSeries]> {
        match self {
            Self::Vector(series) => Some(series),
            _ => None,
        }
    }

    /// Series of a matrix result, if this is one.
    #[must_use]
    pub fn as_matrix(&self) -> Option<&[RangeSeries]> {
        match self {
            Self::Matrix(series) => Some(series),
            _ => None,
        }
    }

    /// Sample of a scalar or string result.
    #[must_use]
    pub const fn as_sample(&self) -> Option<&Sample> {
        match self {
            Self::Scalar(sample) | Self::String(sample) => Some(sample),
            _ => None,
        }
    }
}

/// One series of an instant vector.
///
/// A float series carries `value`, a native histogram series carries
/// `histogram`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstantSeries {
    /// Series labels.
    pub metric: Labels,
    /// Float sample at the evaluation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Sample>,
    /// Native histogram sample at the evaluation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramSample>,
}

/// One series of a range matrix.
///
/// Float samples and native histogram samples are listed separately, each
/// in time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSeries {
    /// Series labels.
    pub metric: Labels,
    /// Float samples.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Sample>,
    /// Native histogram samples.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub histograms: Vec<HistogramSample>,
}

/// A `[timestamp, {histogram}]` pair.
#[derive(Debug, Clone, PartialEq, TupleArray)]
pub struct HistogramSample {
    /// Unix timestamp in seconds.
    pub timestamp: f64,
    /// Histogram at that time.
    pub histogram: NativeHistogram,
}

/// Native histogram as rendered by the HTTP API. Numbers are quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeHistogram {
    /// Observation count.
    pub count: String,
    /// Sum of observations.
    pub sum: String,
    /// Populated buckets; absent when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buckets: Vec<HistogramBucket>,
}

/// A `[boundaries, "lower", "upper", "count"]` bucket.
///
/// `boundaries` tells which bounds are inclusive: 0 open left, 1 open
/// right, 2 open both, 3 closed both.
#[derive(Debug, Clone, PartialEq, TupleArray)]
pub struct HistogramBucket {
    /// Boundary rule.
    pub boundaries: u8,
    /// Lower bound.
    pub lower: String,
    /// Upper bound.
    pub upper: String,
    /// Observations in the bucket.
    pub count: String,
}

/// A `[timestamp, "value"]` pair.
///
/// The timestamp is Unix seconds with millisecond precision. The value is
/// kept as sent, since Prometheus quotes it to carry `NaN` and infinities.
#[derive(Debug, Clone, PartialEq, TupleArray)]
pub struct Sample {
    /// Unix timestamp in seconds.
    pub timestamp: f64,
    /// Sample value as sent by the server.
    pub value: String,
}

impl Sample {
    /// Create a sample.
    #[must_use]
    pub fn new(timestamp: f64, value: impl Into<String>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }

    /// Parse the value as a float, accepting `NaN`, `+Inf`, `-Inf`.
    ///
    /// Returns `None` for string samples that are not numbers.
    #[must_use]
    pub fn value_f64(&self) -> Option<f64> {
        match self.value.as_str() {
            "+Inf" | "Inf" => Some(f64::INFINITY),
            "-Inf" => Some(f64::NEG_INFINITY),
            "NaN" => Some(f64::NAN),
            other => other.parse().ok(),
        }
    }

    /// Timestamp as a UTC date time, truncated to milliseconds.
    ///
    /// Returns `None` if the timestamp is out of range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        let millis = (self.timestamp * 1000.0).round();
        if !millis.is_finite() {
            return None;
        }
        DateTime::from_timestamp_millis(millis as i64)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use chrono::TimeZone;

    use super::*;
    use crate::from_json;

    #[test]
    fn decode_vector() {
        let body = br#"{
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [
                    {"metric": {"__name__": "up", "job": "prometheus", "instance": "localhost:9090"}, "value": [1435781451.781, "1"]},
                    {"metric": {"__name__": "up", "job": "node", "instance": "localhost:9100"}, "value": [1435781451.781, "0"]}
                ]
            }
        }"#;

        let envelope: ResponseEnvelope<QueryData> = from_json(body).expect("decode");
        check!(envelope.is_success());
        check!(envelope.warnings.is_empty());

        let_assert!(Some(data) = envelope.data);
        check!(data.stats.is_none());
        let_assert!(QueryResult::Vector(series) = data.into_result());
        check!(series.len() == 2);
        check!(series[0].metric["job"] == "prometheus");
        check!(series[0].value == Some(Sample::new(1_435_781_451.781, "1")));
        check!(series[1].value.as_ref().and_then(Sample::value_f64) == Some(0.0));
        check!(series[1].histogram.is_none());
    }

    #[test]
    fn decode_vector_with_histogram_series() {
        let body = br#"{
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [
                    {"metric": {"__name__": "up"}, "value": [1.0, "1"]},
                    {"metric": {"__name__": "rpc_latency_seconds"}, "histogram": [1.0, {
                        "count": "12",
                        "sum": "3.5",
                        "buckets": [[0, "0.5", "1", "7"], [3, "1", "2", "5"]]
                    }]}
                ]
            }
        }"#;

        let envelope: ResponseEnvelope<QueryData> = from_json(body).expect("decode");
        let data = envelope.data.expect("data");
        let series = data.as_vector().expect("vector");
        check!(series.len() == 2);
        check!(series[0].value == Some(Sample::new(1.0, "1")));

        check!(series[1].value.is_none());
        let_assert!(Some(HistogramSample { timestamp, histogram }) = &series[1].histogram);
        check!(*timestamp == 1.0);
        check!(histogram.count == "12");
        check!(histogram.sum == "3.5");
        check!(
            histogram.buckets[1]
                == HistogramBucket {
                    boundaries: 3,
                    lower: "1".into(),
                    upper: "2".into(),
                    count: "5".into(),
                }
        );
    }

    #[test]
    fn decode_matrix_with_histograms() {
        let body = br#"{"resultType":"matrix","result":[
            {"metric":{"job":"api"},"histograms":[[10.0,{"count":"1","sum":"0.2"}],[25.0,{"count":"3","sum":"0.9"}]]}
        ]}"#;

        let data: QueryData = from_json(body).expect("decode");
        let series = data.as_matrix().expect("matrix");
        check!(series[0].values.is_empty());
        check!(series[0].histograms.len() == 2);
        check!(series[0].histograms[1].histogram.count == "3");
        check!(series[0].histograms[1].histogram.buckets.is_empty());
    }

    #[test]
    fn decode_stats() {
        let body = br#"{
            "resultType": "vector",
            "result": [],
            "stats": {"timings": {"evalTotalTime": 0.0012}, "samples": {"totalQueryableSamples": 4}}
        }"#;

        let data: QueryData = from_json(body).expect("decode");
        check!(data.as_vector() == Some(&[][..]));
        let_assert!(Some(stats) = &data.stats);
        check!(stats["samples"]["totalQueryableSamples"] == 4);
    }

    #[test]
    fn result_before_result_type() {
        let body = br#"{"result":[1.0,"7"],"resultType":"scalar","extra":true}"#;

        let data: QueryData = from_json(body).expect("decode");
        check!(data.into_result() == QueryResult::Scalar(Sample::new(1.0, "7")));
    }

    #[test]
    fn missing_result_type() {
        let result = from_json::<QueryData>(br#"{"result":[]}"#);

        let_assert!(Err(crate::Error::JsonDeserialization { message, .. }) = result);
        check!(message.contains("resultType"));
    }

    #[test]
    fn decode_matrix() {
        let body = br#"{
            "status": "success",
            "data": {
                "resultType": "matrix",
                "result": [
                    {"metric": {"__name__": "up", "job": "node"}, "values": [[1435781430.781, "1"], [1435781445.781, "1"], [1435781460.781, "0"]]}
                ]
            }
        }"#;

        let envelope: ResponseEnvelope<QueryData> = from_json(body).expect("decode");
        let data = envelope.data.expect("data");
        check!(data.result_type() == "matrix");

        let series = data.as_matrix().expect("matrix");
        check!(series.len() == 1);
        let values: Vec<_> = series[0].values.iter().filter_map(Sample::value_f64).collect();
        check!(values == [1.0, 1.0, 0.0]);
    }

    #[test]
    fn decode_scalar_and_string() {
        let body = br#"{"status":"success","data":{"resultType":"scalar","result":[1435781451.781,"42.5"]}}"#;
        let envelope: ResponseEnvelope<QueryData> = from_json(body).expect("decode");
        let_assert!(Some(QueryResult::Scalar(sample)) = envelope.data.map(QueryData::into_result));
        check!(sample.value_f64() == Some(42.5));

        let body = br#"{"status":"success","data":{"resultType":"string","result":[1435781451.781,"hello"]}}"#;
        let envelope: ResponseEnvelope<QueryData> = from_json(body).expect("decode");
        let_assert!(Some(QueryResult::String(sample)) = envelope.data.map(QueryData::into_result));
        check!(sample.value == "hello");
        check!(sample.value_f64().is_none());
    }

    #[test]
    fn decode_error_envelope() {
        let body = br#"{"status":"error","errorType":"bad_data","error":"1:5: parse error: unexpected end of input"}"#;

        let envelope: ResponseEnvelope<QueryData> = from_json(body).expect("decode");
        check!(envelope.status == ResponseStatus::Error);
        check!(envelope.data.is_none());
        check!(envelope.error_type.as_deref() == Some("bad_data"));
        check!(envelope.error.as_deref() == Some("1:5: parse error: unexpected end of input"));
    }

    #[test]
    fn decode_warnings() {
        let body = br#"{"status":"success","data":["__name__","job"],"warnings":["partial response"]}"#;

        let envelope: ResponseEnvelope<Vec<String>> = from_json(body).expect("decode");
        check!(envelope.warnings == ["partial response"]);
        check!(envelope.into_data() == Some(vec!["__name__".to_string(), "job".to_string()]));
    }

    #[test]
    fn malformed_sample_reports_path() {
        let body = br#"{"status":"success","data":{"resultType":"vector","result":[{"metric":{},"value":[1435781451.781]}]}}"#;

        let result: crate::Result<ResponseEnvelope<QueryData>> = from_json(body);
        let_assert!(Err(crate::Error::JsonDeserialization { path, message }) = result);
        check!(path == "data.result[0].value");
        check!(message.contains("unexpected number of tuple values: expected 2, actual 1"));
    }

    #[test]
    fn special_float_values() {
        check!(Sample::new(0.0, "+Inf").value_f64() == Some(f64::INFINITY));
        check!(Sample::new(0.0, "Inf").value_f64() == Some(f64::INFINITY));
        check!(Sample::new(0.0, "-Inf").value_f64() == Some(f64::NEG_INFINITY));
        check!(Sample::new(0.0, "NaN").value_f64().is_some_and(f64::is_nan));
        check!(Sample::new(0.0, "1e-3").value_f64() == Some(0.001));
    }

    #[test]
    fn sample_time() {
        let sample = Sample::new(1_435_781_451.781, "1");
        let expected = Utc
            .timestamp_millis_opt(1_435_781_451_781)
            .single()
            .expect("valid");
        check!(sample.time() == Some(expected));

        check!(Sample::new(f64::NAN, "1").time().is_none());
    }

    #[test]
    fn sample_serializes_as_array() {
        let json = serde_json::to_string(&Sample::new(1.5, "2")).expect("encode");
        check!(json == r#"[1.5,"2"]"#);
    }

    #[test]
    fn query_data_serializes_tagged() {
        let data = QueryData::new(QueryResult::Scalar(Sample::new(10.0, "3")));
        let json = serde_json::to_value(&data).expect("encode");
        check!(json == serde_json::json!({"resultType": "scalar", "result": [10.0, "3"]}));

        let data = QueryData {
            stats: Some(serde_json::json!({"timings": {}})),
            ..QueryData::new(QueryResult::Vector(vec![]))
        };
        let json = serde_json::to_value(&data).expect("encode");
        check!(json == serde_json::json!({"resultType": "vector", "result": [], "stats": {"timings": {}}}));
    }
}
