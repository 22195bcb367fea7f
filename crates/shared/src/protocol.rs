use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::{MatchId, PaymentMethod, RideId};

/// Body of `GET /customer/poll/{request_id}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResponse {
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub matches: Vec<MatchPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ride: Option<RidePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MatchId>,
    #[serde(rename = "driver__user__username", default)]
    pub driver_username: Option<String>,
    pub status: String,
    pub distance_to_pickup_km: Decimal,
    pub eta_to_pickup_min: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidePayload {
    pub id: RideId,
    #[serde(default)]
    pub driver: Option<String>,
    pub status: String,
}

/// One poll snapshot. Each result replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResult {
    pub status: String,
    pub matches: Vec<MatchRecord>,
    pub ride: Option<RideRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub id: Option<MatchId>,
    pub driver_name: String,
    pub status: String,
    pub distance_to_pickup_km: Decimal,
    pub eta_to_pickup_min: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RideRecord {
    pub id: RideId,
    pub driver_name: Option<String>,
    pub status: String,
}

impl From<PollResponse> for PollResult {
    fn from(value: PollResponse) -> Self {
        Self {
            status: value.status,
            matches: value
                .matches
                .into_iter()
                .map(|m| MatchRecord {
                    id: m.id,
                    driver_name: m.driver_username.unwrap_or_default(),
                    status: m.status,
                    distance_to_pickup_km: m.distance_to_pickup_km,
                    eta_to_pickup_min: m.eta_to_pickup_min,
                })
                .collect(),
            ride: value.ride.map(|r| RideRecord {
                id: r.id,
                driver_name: r.driver,
                status: r.status,
            }),
        }
    }
}

/// Urlencoded body of `POST /customer/request/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RideRequestSubmission {
    pub pickup_address: String,
    pub dropoff_address: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub dropoff_lat: f64,
    pub dropoff_lng: f64,
    pub payment_method: PaymentMethod,
    pub city: String,
    pub vehicle_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrfmiddlewaretoken: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A decimal field as the server sent it. Some serializers emit decimals as
/// JSON strings; the text is kept so `"2.30"` displays as `2.30`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decimal {
    value: f64,
    text: String,
}

impl Decimal {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<f64> for Decimal {
    fn from(value: f64) -> Self {
        Self {
            value,
            text: value.to_string(),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumberOrString {
            Number(f64),
            Text(String),
        }

        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(value) => Ok(Decimal::from(value)),
            NumberOrString::Text(raw) => {
                let text = raw.trim();
                let value = text
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid decimal '{raw}'")))?;
                Ok(Decimal {
                    value,
                    text: text.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_searching_response() {
        let body = r#"{"status":"searching","matches":[{"driver__user__username":"alice","status":"pending","distance_to_pickup_km":2.3,"eta_to_pickup_min":5}],"ride":null}"#;
        let result: PollResult = serde_json::from_str::<PollResponse>(body)
            .expect("decode")
            .into();

        assert_eq!(result.status, "searching");
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].driver_name, "alice");
        assert_eq!(result.matches[0].distance_to_pickup_km.value(), 2.3);
        assert_eq!(result.matches[0].eta_to_pickup_min.as_str(), "5");
        assert!(result.ride.is_none());
    }

    #[test]
    fn missing_or_null_matches_decode_as_empty() {
        let missing: PollResponse = serde_json::from_str(r#"{"status":"OPEN"}"#).expect("decode");
        assert!(missing.matches.is_empty());
        let null: PollResponse =
            serde_json::from_str(r#"{"status":"OPEN","matches":null}"#).expect("decode");
        assert!(null.matches.is_empty());
    }

    #[test]
    fn accepts_decimal_strings_and_match_ids() {
        let body = r#"{"status":"OPEN","matches":[{"id":9,"driver__user__username":"carol","status":"PENDING","distance_to_pickup_km":"1.25","eta_to_pickup_min":"4"}]}"#;
        let response: PollResponse = serde_json::from_str(body).expect("decode");
        assert_eq!(response.matches[0].id, Some(MatchId(9)));
        assert_eq!(response.matches[0].distance_to_pickup_km.value(), 1.25);
        assert_eq!(response.matches[0].eta_to_pickup_min.value(), 4.0);
    }

    #[test]
    fn decimal_strings_keep_server_text() {
        let decimal: Decimal = serde_json::from_str(r#"" 2.30 ""#).expect("decode");
        assert_eq!(decimal.value(), 2.3);
        assert_eq!(decimal.to_string(), "2.30");
        assert!(serde_json::from_str::<Decimal>(r#""near""#).is_err());
        assert!(serde_json::from_str::<Decimal>(r#""NaN""#).is_err());
    }

    #[test]
    fn rejects_response_without_status() {
        assert!(serde_json::from_str::<PollResponse>(r#"{"matches":[]}"#).is_err());
    }

    #[test]
    fn ride_driver_may_be_null() {
        let body = r#"{"status":"MATCHED","ride":{"id":3,"driver":null,"status":"REQUESTED"}}"#;
        let result: PollResult = serde_json::from_str::<PollResponse>(body)
            .expect("decode")
            .into();
        let ride = result.ride.expect("ride");
        assert_eq!(ride.id, RideId(3));
        assert_eq!(ride.driver_name, None);
    }
}
