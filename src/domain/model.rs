use crate::utils::error::LookupError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const WIRE_STREET: &str = "logradouro";
pub const WIRE_NEIGHBORHOOD: &str = "bairro";
pub const WIRE_CITY: &str = "localidade";
pub const WIRE_STATE: &str = "uf";
pub const WIRE_ERROR_FLAG: &str = "erro";

const ADDRESS_FIELDS: [&str; 4] = [WIRE_STREET, WIRE_NEIGHBORHOOD, WIRE_CITY, WIRE_STATE];

/// Caller-supplied CEP. Forwarded to the lookup service untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PostalCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for PostalCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized address handed back to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Renders one line per part: street, neighborhood, then "city, state".
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = Vec::new();

        for part in [&self.street, &self.neighborhood].into_iter().flatten() {
            if !part.is_empty() {
                lines.push(part.clone());
            }
        }

        let city = self.city.as_deref().filter(|c| !c.is_empty());
        let state = self.state.as_deref().filter(|s| !s.is_empty());
        match (city, state) {
            (Some(city), Some(state)) => lines.push(format!("{}, {}", city, state)),
            (Some(only), None) | (None, Some(only)) => lines.push(only.to_string()),
            (None, None) => {}
        }

        write!(f, "{}", lines.join("\n"))
    }
}

/// Raw lookup payload, kept with its wire field names exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntry(Map<String, Value>);

impl HistoryEntry {
    pub fn new(raw: Map<String, Value>) -> Self {
        Self(raw)
    }

    pub fn logradouro(&self) -> Option<&str> {
        self.field(WIRE_STREET)
    }

    pub fn bairro(&self) -> Option<&str> {
        self.field(WIRE_NEIGHBORHOOD)
    }

    pub fn localidade(&self) -> Option<&str> {
        self.field(WIRE_CITY)
    }

    pub fn uf(&self) -> Option<&str> {
        self.field(WIRE_STATE)
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_raw(self) -> Map<String, Value> {
        self.0
    }

    /// Maps the wire fields onto the model field names.
    pub fn to_address(&self) -> Address {
        Address {
            street: self.logradouro().map(str::to_string),
            neighborhood: self.bairro().map(str::to_string),
            city: self.localidade().map(str::to_string),
            state: self.uf().map(str::to_string),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(HistoryEntry),
    NotFound,
}

/// Classifies a decoded lookup payload.
///
/// The service answers unknown codes with `{"erro": true}` (older deployments
/// send the string `"true"`). A payload without any of the four address fields
/// is treated the same way. Anything that is not a JSON object is malformed.
pub fn classify_response(payload: Value) -> Result<LookupOutcome, LookupError> {
    let raw = match payload {
        Value::Object(raw) => raw,
        other => {
            return Err(LookupError::MalformedResponse {
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            })
        }
    };

    let flagged = match raw.get(WIRE_ERROR_FLAG) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
        _ => false,
    };
    if flagged {
        return Ok(LookupOutcome::NotFound);
    }

    // 只有字串欄位才算地址，數字或物件對應不到 Address
    let has_address = ADDRESS_FIELDS
        .iter()
        .any(|field| raw.get(*field).is_some_and(Value::is_string));
    if !has_address {
        return Ok(LookupOutcome::NotFound);
    }

    Ok(LookupOutcome::Found(HistoryEntry::new(raw)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
