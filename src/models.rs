use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Wire names of the mill features, in the column order the model was trained on.
pub const FEATURE_NAMES: [&str; 8] = [
    "velocidad_sag_rpm",
    "flujo_de_agua_m3_h",
    "ugm1",
    "ugm2",
    "ugm3",
    "porc_grueso",
    "porc_intermedio",
    "porc_fino",
];

/// One set of SAG mill readings. Absent or `null` fields decode to zero.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PredictionInput {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub velocidad_sag_rpm: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub flujo_de_agua_m3_h: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub ugm1: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub ugm2: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub ugm3: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub porc_grueso: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub porc_intermedio: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub porc_fino: f64,
}

impl PredictionInput {
    /// Decodes a request body. Only a JSON object is accepted, and a repeated
    /// key keeps its last value. A bare `null` leaves every reading at zero.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Null => Ok(PredictionInput::default()),
            object @ Value::Object(_) => serde_json::from_value(object),
            other => Err(serde_json::Error::custom(format!(
                "expected a JSON object, found {}",
                kind(&other)
            ))),
        }
    }

    /// Values in model order. Must stay aligned with [`FEATURE_NAMES`].
    pub fn to_array(&self) -> [f64; 8] {
        [
            self.velocidad_sag_rpm,
            self.flujo_de_agua_m3_h,
            self.ugm1,
            self.ugm2,
            self.ugm3,
            self.porc_grueso,
            self.porc_intermedio,
            self.porc_fino,
        ]
    }

    /// Renders the readings as the single CSV line the endpoint expects.
    ///
    /// `f64`'s `Display` is the shortest representation that round-trips and
    /// never switches to exponent notation, so the same input always yields
    /// the same bytes.
    pub fn to_csv_row(&self) -> String {
        self.to_array()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionOutput {
    pub predicted_rendimiento_t_h: f64,
    pub model_used: String,
}

impl PredictionOutput {
    pub fn new(prediction: f64, endpoint: &str) -> Self {
        PredictionOutput {
            predicted_rendimiento_t_h: prediction,
            model_used: endpoint.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            error: message.into(),
        }
    }
}
