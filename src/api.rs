use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;

/// The one query this app sends. Page, status and species are the only
/// variables; everything else about the request shape is fixed.
pub const CHARACTERS_QUERY: &str = "\
query GetCharacters($page: Int, $status: String, $species: String) {
  characters(page: $page, filter: { status: $status, species: $species }) {
    info {
      next
    }
    results {
      id
      name
      status
      species
      gender
      origin {
        name
      }
    }
  }
}";

/// Status constraint sent with the query. `All` sends an empty string,
/// which the remote API treats as "no constraint".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Alive,
    Dead,
    Unknown,
}

impl StatusFilter {
    /// Wire value for the `status` query variable.
    pub fn query_value(&self) -> &'static str {
        match self {
            StatusFilter::All => "",
            StatusFilter::Alive => "alive",
            StatusFilter::Dead => "dead",
            StatusFilter::Unknown => "unknown",
        }
    }

    /// Parse a user-supplied value. Both "" and "all" mean `All`.
    pub fn parse(value: &str) -> Option<StatusFilter> {
        match value.to_lowercase().as_str() {
            "" | "all" => Some(StatusFilter::All),
            "alive" => Some(StatusFilter::Alive),
            "dead" => Some(StatusFilter::Dead),
            "unknown" => Some(StatusFilter::Unknown),
            _ => None,
        }
    }

    /// Next option in selector order (All, Alive, Dead, Unknown), wrapping.
    pub fn next(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Alive,
            StatusFilter::Alive => StatusFilter::Dead,
            StatusFilter::Dead => StatusFilter::Unknown,
            StatusFilter::Unknown => StatusFilter::All,
        }
    }

    /// Previous option in selector order, wrapping.
    pub fn prev(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Unknown,
            StatusFilter::Alive => StatusFilter::All,
            StatusFilter::Dead => StatusFilter::Alive,
            StatusFilter::Unknown => StatusFilter::Dead,
        }
    }
}

/// Committed filter state. Mutating either field resets pagination.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterFilter {
    pub status: StatusFilter,
    pub species: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Origin {
    pub name: String,
}

/// One character record as returned by the API. Immutable once fetched;
/// identity is the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub status: String,
    pub species: String,
    pub gender: String,
    pub origin: Origin,
}

/// Pagination marker: `next` is the next page number, absent on the last
/// page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageInfo {
    pub next: Option<u32>,
}

/// One page of results plus its pagination marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharactersPage {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'static str,
    variables: QueryVariables<'a>,
}

#[derive(Debug, Serialize)]
struct QueryVariables<'a> {
    page: u32,
    status: &'a str,
    species: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    characters: Option<CharactersPage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Failures talking to the characters endpoint. The UI collapses all of
/// them into one localized message; the variants exist for logs and tests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// HTTP client for the characters endpoint.
#[derive(Debug, Clone)]
pub struct CharacterClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CharacterClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.api_url.clone(),
        })
    }

    /// Fetch one page of characters matching `filter`.
    pub async fn fetch_page(
        &self,
        page: u32,
        filter: &CharacterFilter,
    ) -> Result<CharactersPage, ApiError> {
        let request = QueryRequest {
            query: CHARACTERS_QUERY,
            variables: QueryVariables {
                page,
                status: filter.status.query_value(),
                species: &filter.species,
            },
        };

        debug!(
            page,
            status = request.variables.status,
            species = request.variables.species,
            "requesting characters page"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let body = response.text().await?;
        let envelope: ResponseEnvelope =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

        if let Some(error) = envelope.errors.first() {
            return Err(ApiError::GraphQl(error.message.clone()));
        }

        envelope
            .data
            .and_then(|data| data.characters)
            .ok_or_else(|| ApiError::Decode("response carried no characters field".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Query Document Tests ====================

    #[test]
    fn test_query_requests_all_table_columns() {
        for field in ["id", "name", "status", "species", "gender", "origin"] {
            assert!(CHARACTERS_QUERY.contains(field), "missing field {field}");
        }
        assert!(CHARACTERS_QUERY.contains("info"));
        assert!(CHARACTERS_QUERY.contains("next"));
    }

    #[test]
    fn test_query_takes_page_status_species_variables() {
        assert!(CHARACTERS_QUERY.contains("$page: Int"));
        assert!(CHARACTERS_QUERY.contains("$status: String"));
        assert!(CHARACTERS_QUERY.contains("$species: String"));
    }

    // ==================== Variable Serialization Tests ====================

    #[test]
    fn test_variables_for_unconstrained_filter() {
        let filter = CharacterFilter::default();
        let request = QueryRequest {
            query: CHARACTERS_QUERY,
            variables: QueryVariables {
                page: 1,
                status: filter.status.query_value(),
                species: &filter.species,
            },
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&request).expect("serialize"))
                .expect("valid JSON");

        assert_eq!(json["variables"]["page"], 1);
        assert_eq!(json["variables"]["status"], "");
        assert_eq!(json["variables"]["species"], "");
    }

    #[test]
    fn test_variables_carry_committed_filter() {
        let filter = CharacterFilter {
            status: StatusFilter::Alive,
            species: "human".to_string(),
        };
        let request = QueryRequest {
            query: CHARACTERS_QUERY,
            variables: QueryVariables {
                page: 3,
                status: filter.status.query_value(),
                species: &filter.species,
            },
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&request).expect("serialize"))
                .expect("valid JSON");

        assert_eq!(json["variables"]["page"], 3);
        assert_eq!(json["variables"]["status"], "alive");
        assert_eq!(json["variables"]["species"], "human");
    }

    // ==================== StatusFilter Tests ====================

    #[test]
    fn test_status_filter_wire_values() {
        assert_eq!(StatusFilter::All.query_value(), "");
        assert_eq!(StatusFilter::Alive.query_value(), "alive");
        assert_eq!(StatusFilter::Dead.query_value(), "dead");
        assert_eq!(StatusFilter::Unknown.query_value(), "unknown");
    }

    #[test]
    fn test_status_filter_parse_roundtrip() {
        for status in [
            StatusFilter::All,
            StatusFilter::Alive,
            StatusFilter::Dead,
            StatusFilter::Unknown,
        ] {
            assert_eq!(StatusFilter::parse(status.query_value()), Some(status));
        }
        assert_eq!(StatusFilter::parse("ALIVE"), Some(StatusFilter::Alive));
        assert_eq!(StatusFilter::parse("all"), Some(StatusFilter::All));
        assert_eq!(StatusFilter::parse("ghost"), None);
    }

    #[test]
    fn test_status_filter_cycle_covers_all_options() {
        let mut status = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(status);
            status = status.next();
        }
        assert_eq!(status, StatusFilter::All);
        assert_eq!(seen.len(), 4);
        for option in seen {
            assert_eq!(option.next().prev(), option);
        }
    }

    // ==================== Envelope Deserialization Tests ====================

    #[test]
    fn test_envelope_happy_path() {
        let json = r#"{
            "data": {
                "characters": {
                    "info": { "next": 2 },
                    "results": [
                        {
                            "id": "1",
                            "name": "Rick Sanchez",
                            "status": "Alive",
                            "species": "Human",
                            "gender": "Male",
                            "origin": { "name": "Earth (C-137)" }
                        }
                    ]
                }
            }
        }"#;

        let envelope: ResponseEnvelope = serde_json::from_str(json).expect("deserialize");
        assert!(envelope.errors.is_empty());

        let page = envelope.data.unwrap().characters.unwrap();
        assert_eq!(page.info.next, Some(2));
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name, "Rick Sanchez");
        assert_eq!(page.results[0].origin.name, "Earth (C-137)");
    }

    #[test]
    fn test_envelope_last_page_has_no_next() {
        let json = r#"{
            "data": {
                "characters": {
                    "info": { "next": null },
                    "results": []
                }
            }
        }"#;

        let envelope: ResponseEnvelope = serde_json::from_str(json).expect("deserialize");
        let page = envelope.data.unwrap().characters.unwrap();
        assert_eq!(page.info.next, None);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_envelope_with_graphql_errors() {
        let json = r#"{
            "data": null,
            "errors": [ { "message": "400: Bad Request" } ]
        }"#;

        let envelope: ResponseEnvelope = serde_json::from_str(json).expect("deserialize");
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].message, "400: Bad Request");
        assert!(envelope.data.is_none());
    }

    // ==================== Character Struct Tests ====================

    #[test]
    fn test_character_roundtrip() {
        let original = Character {
            id: "2".to_string(),
            name: "Morty Smith".to_string(),
            status: "Alive".to_string(),
            species: "Human".to_string(),
            gender: "Male".to_string(),
            origin: Origin {
                name: "unknown".to_string(),
            },
        };

        let json = serde_json::to_string(&original).expect("serialize");
        let restored: Character = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(original.id, restored.id);
        assert_eq!(original.name, restored.name);
        assert_eq!(original.status, restored.status);
        assert_eq!(original.origin.name, restored.origin.name);
    }

    // ==================== Error Display Tests ====================

    #[test]
    fn test_api_error_messages() {
        let graphql = ApiError::GraphQl("404: Not Found".to_string());
        assert!(graphql.to_string().contains("404: Not Found"));

        let decode = ApiError::Decode("expected value".to_string());
        assert!(decode.to_string().contains("malformed"));
    }
}
