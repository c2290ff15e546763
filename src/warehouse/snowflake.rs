//! Snowflake client over the REST endpoints used by the official drivers.
//!
//! A session is opened with a username/password login, queries run
//! synchronously with results requested in JSON row-set form, and the
//! session is deleted on close.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use super::{Warehouse, WarehouseError, WarehouseSession};
use crate::data::model::{CellValue, StatTable};

const CLIENT_APP_ID: &str = "heritage-explorer";
const USER_AGENT: &str = concat!("heritage-explorer/", env!("CARGO_PKG_VERSION"));

/// Connection parameters, normally read from `SNOWFLAKE_*` variables.
#[derive(Clone, PartialEq, Eq)]
pub struct SnowflakeConfig {
    /// Account identifier, e.g. `xy12345.ap-south-1`.
    pub account: String,
    pub user: String,
    pub password: String,
    pub warehouse: Option<String>,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub role: Option<String>,
    /// Overrides `https://<account>.snowflakecomputing.com`.
    pub base_url: Option<String>,
}

impl fmt::Debug for SnowflakeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeConfig")
            .field("account", &self.account)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("role", &self.role)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SnowflakeConfig {
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.snowflakecomputing.com", self.account),
        }
    }

    /// Account name without region or cloud suffix.
    pub fn account_name(&self) -> &str {
        self.account.split('.').next().unwrap_or(&self.account)
    }

    fn login_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("request_id", Uuid::new_v4().to_string())];
        let optional = [
            ("warehouse", &self.warehouse),
            ("databaseName", &self.database),
            ("schemaName", &self.schema),
            ("roleName", &self.role),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                params.push((key, value.clone()));
            }
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    code: Option<JsonValue>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    rowtype: Vec<RowType>,
    #[serde(default)]
    rowset: Option<Vec<Vec<Option<String>>>>,
    #[serde(rename = "queryResultFormat", default)]
    query_result_format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RowType {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    scale: Option<i64>,
}

// ---------------------------------------------------------------------------
// Warehouse / session
// ---------------------------------------------------------------------------

pub struct SnowflakeWarehouse {
    client: Client,
    config: SnowflakeConfig,
}

impl fmt::Debug for SnowflakeWarehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeWarehouse")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SnowflakeWarehouse {
    pub fn new(config: SnowflakeConfig) -> Result<Self, WarehouseError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(WarehouseError::HttpClient)?;
        Ok(Self { client, config })
    }
}

impl Warehouse for SnowflakeWarehouse {
    type Session = SnowflakeSession;

    fn connect(&self) -> Result<SnowflakeSession, WarehouseError> {
        let base_url = self.config.base_url();
        let body = json!({
            "data": {
                "CLIENT_APP_ID": CLIENT_APP_ID,
                "CLIENT_APP_VERSION": env!("CARGO_PKG_VERSION"),
                "ACCOUNT_NAME": self.config.account_name(),
                "LOGIN_NAME": self.config.user,
                "PASSWORD": self.config.password,
                "SESSION_PARAMETERS": { "QUERY_RESULT_FORMAT": "JSON" },
            }
        });

        log::debug!(
            "Logging in to {base_url} as {} (account {})",
            self.config.user,
            self.config.account_name()
        );
        let response = self
            .client
            .post(format!("{base_url}/session/v1/login-request"))
            .query(&self.config.login_params())
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .map_err(|source| WarehouseError::Transport {
                endpoint: "login",
                source,
            })?;

        let data = read_envelope("login", response)?;
        let login: LoginData = decode("login", data)?;

        Ok(SnowflakeSession {
            client: self.client.clone(),
            base_url,
            token: login.token,
            sequence: 0,
        })
    }
}

pub struct SnowflakeSession {
    client: Client,
    base_url: String,
    token: String,
    sequence: u64,
}

impl SnowflakeSession {
    fn authorization(&self) -> String {
        format!("Snowflake Token=\"{}\"", self.token)
    }
}

impl WarehouseSession for SnowflakeSession {
    fn query(&mut self, sql: &str) -> Result<StatTable, WarehouseError> {
        self.sequence += 1;
        let body = json!({
            "sqlText": sql,
            "asyncExec": false,
            "sequenceId": self.sequence,
            "isInternal": false,
        });

        let response = self
            .client
            .post(format!("{}/queries/v1/query-request", self.base_url))
            .query(&[("requestId", Uuid::new_v4().to_string())])
            .header(ACCEPT, "application/snowflake")
            .header(AUTHORIZATION, self.authorization())
            .json(&body)
            .send()
            .map_err(|source| WarehouseError::Transport {
                endpoint: "query",
                source,
            })?;

        let data = read_envelope("query", response)?;
        rowset_to_table(decode("query", data)?)
    }

    fn close(self) -> Result<(), WarehouseError> {
        let response = self
            .client
            .post(format!("{}/session", self.base_url))
            .query(&[("delete", "true")])
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.authorization())
            .send()
            .map_err(|source| WarehouseError::Transport {
                endpoint: "close",
                source,
            })?;
        read_envelope("close", response).map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn read_envelope(endpoint: &'static str, response: Response) -> Result<JsonValue, WarehouseError> {
    let status = response.status();
    if !status.is_success() {
        return Err(WarehouseError::Status { endpoint, status });
    }

    let envelope: Envelope = response.json().map_err(|e| WarehouseError::Malformed {
        endpoint,
        details: e.to_string(),
    })?;

    if !envelope.success {
        let code = match envelope.code {
            Some(JsonValue::String(s)) => s,
            Some(JsonValue::Null) | None => "unknown".to_string(),
            Some(other) => other.to_string(),
        };
        return Err(WarehouseError::Rejected {
            endpoint,
            code,
            message: envelope
                .message
                .unwrap_or_else(|| "no message".to_string()),
        });
    }
    Ok(envelope.data.unwrap_or(JsonValue::Null))
}

fn decode<T: for<'de> Deserialize<'de>>(
    endpoint: &'static str,
    data: JsonValue,
) -> Result<T, WarehouseError> {
    serde_json::from_value(data).map_err(|e| WarehouseError::Malformed {
        endpoint,
        details: e.to_string(),
    })
}

fn rowset_to_table(data: QueryData) -> Result<StatTable, WarehouseError> {
    let Some(rowset) = data.rowset else {
        let format = data
            .query_result_format
            .unwrap_or_else(|| "unknown".to_string());
        return Err(WarehouseError::Malformed {
            endpoint: "query",
            details: format!("no JSON row set (result format {format})"),
        });
    };

    let rows = rowset
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&data.rowtype)
                .map(|(raw, column)| convert_cell(raw, column))
                .collect()
        })
        .collect();
    let names = data.rowtype.iter().map(|c| c.name.clone()).collect();
    Ok(StatTable::from_rows(names, rows))
}

/// Convert one JSON row-set cell using its column type. Values that do not
/// parse as their declared type are kept as text.
fn convert_cell(raw: Option<String>, column: &RowType) -> CellValue {
    let Some(raw) = raw else {
        return CellValue::Null;
    };
    let parsed = match column.kind.to_ascii_lowercase().as_str() {
        "fixed" if column.scale.unwrap_or(0) == 0 => raw.parse().ok().map(CellValue::Integer),
        "fixed" | "real" => raw.parse().ok().map(CellValue::Float),
        "boolean" => match raw.as_str() {
            "1" | "true" | "TRUE" => Some(CellValue::Bool(true)),
            "0" | "false" | "FALSE" => Some(CellValue::Bool(false)),
            _ => None,
        },
        "date" => raw.parse().ok().and_then(epoch_days).map(CellValue::Date),
        "timestamp_ntz" | "timestamp_ltz" => epoch_seconds_date(&raw, 0).map(CellValue::Date),
        "timestamp_tz" => timestamp_tz_date(&raw).map(CellValue::Date),
        _ => None,
    };
    parsed.unwrap_or(CellValue::Text(raw))
}

fn epoch_days(days: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(days.checked_mul(86_400)?, 0).map(|dt| dt.date_naive())
}

/// Date of `"<seconds>.<nanos>"` after shifting by `offset_minutes`.
fn epoch_seconds_date(raw: &str, offset_minutes: i64) -> Option<NaiveDate> {
    let seconds = raw.split('.').next()?.parse::<i64>().ok()?;
    let shifted = seconds.checked_add(offset_minutes.checked_mul(60)?)?;
    DateTime::from_timestamp(shifted, 0).map(|dt| dt.date_naive())
}

/// `timestamp_tz` cells are `"<seconds>.<nanos> <offset + 1440>"`, offset in
/// minutes; the date is taken in the value's own zone.
fn timestamp_tz_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split_whitespace();
    let seconds = parts.next()?;
    let offset = match parts.next() {
        Some(encoded) => encoded.parse::<i64>().ok()? - 1440,
        None => 0,
    };
    epoch_seconds_date(seconds, offset)
}
