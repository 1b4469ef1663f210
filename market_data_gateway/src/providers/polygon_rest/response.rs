use serde::Deserialize;

/// One aggregate record as sent upstream. `t` is epoch milliseconds.
#[derive(Deserialize, Debug)]
pub struct AggregateBar {
    #[serde(rename = "t")]
    pub timestamp: i64,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
}

#[derive(Deserialize, Debug)]
pub struct AggregatesResponse {
    pub status: String,
    /// Absent when the window holds no bars.
    #[serde(default)]
    pub results: Vec<AggregateBar>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AggregatesResponse {
    /// `OK` and `DELAYED` carry data; anything else is an upstream refusal.
    pub fn is_ok(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "DELAYED")
    }

    pub fn error_detail(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "no error message".to_string())
    }
}
