//! Tool schema offered to the model and parsing of its tool invocations.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::foundation::ValidationError;
use crate::domain::travel::{ActivityQuery, FlightQuery, HotelQuery, SearchParams};

/// Definition of a tool the model may invoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    name: String,
    description: String,
    parameters_schema: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters_schema(&self) -> &serde_json::Value {
        &self.parameters_schema
    }

    /// Converts to Anthropic tool format.
    pub fn to_anthropic_format(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "description": self.description,
            "input_schema": self.parameters_schema
        })
    }
}

/// The closed set of tools this agent understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelTool {
    SearchFlights,
    SearchHotels,
    SearchActivities,
    CreateItinerary,
}

impl TravelTool {
    pub fn name(&self) -> &'static str {
        match self {
            TravelTool::SearchFlights => "search_flights",
            TravelTool::SearchHotels => "search_hotels",
            TravelTool::SearchActivities => "search_activities",
            TravelTool::CreateItinerary => "create_itinerary",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "search_flights" => Some(TravelTool::SearchFlights),
            "search_hotels" => Some(TravelTool::SearchHotels),
            "search_activities" => Some(TravelTool::SearchActivities),
            "create_itinerary" => Some(TravelTool::CreateItinerary),
            _ => None,
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        match self {
            TravelTool::SearchFlights => ToolDefinition::new(
                self.name(),
                "Search for flights between two airports on a given date",
                json!({
                    "type": "object",
                    "required": ["origin", "destination", "departure_date"],
                    "properties": {
                        "origin": { "type": "string", "description": "IATA code of the departure airport" },
                        "destination": { "type": "string", "description": "IATA code of the arrival airport" },
                        "departure_date": { "type": "string", "format": "date" },
                        "return_date": { "type": "string", "format": "date" },
                        "adults": { "type": "integer", "minimum": 1, "maximum": 9, "default": 1 }
                    }
                }),
            ),
            TravelTool::SearchHotels => ToolDefinition::new(
                self.name(),
                "Search for hotels in a city for a stay",
                json!({
                    "type": "object",
                    "required": ["city", "check_in", "check_out"],
                    "properties": {
                        "city": { "type": "string" },
                        "check_in": { "type": "string", "format": "date" },
                        "check_out": { "type": "string", "format": "date" },
                        "guests": { "type": "integer", "minimum": 1, "maximum": 9, "default": 1 }
                    }
                }),
            ),
            TravelTool::SearchActivities => ToolDefinition::new(
                self.name(),
                "Search for tours and activities at a destination",
                json!({
                    "type": "object",
                    "required": ["location"],
                    "properties": {
                        "location": { "type": "string" },
                        "date": { "type": "string", "format": "date" },
                        "participants": { "type": "integer", "minimum": 1, "maximum": 9, "default": 1 },
                        "interests": { "type": "array", "items": { "type": "string" } }
                    }
                }),
            ),
            TravelTool::CreateItinerary => ToolDefinition::new(
                self.name(),
                "Draft a day-by-day itinerary for a destination",
                json!({
                    "type": "object",
                    "required": ["destination", "days"],
                    "properties": {
                        "destination": { "type": "string" },
                        "days": { "type": "integer", "minimum": 1, "maximum": 30 },
                        "interests": { "type": "array", "items": { "type": "string" } }
                    }
                }),
            ),
        }
    }
}

/// Every tool definition offered to the model.
pub fn travel_tools() -> Vec<ToolDefinition> {
    [
        TravelTool::SearchFlights,
        TravelTool::SearchHotels,
        TravelTool::SearchActivities,
        TravelTool::CreateItinerary,
    ]
    .iter()
    .map(TravelTool::definition)
    .collect()
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned invocation id.
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    pub fn tool(&self) -> Option<TravelTool> {
        TravelTool::from_name(&self.name)
    }

    fn parse<T: for<'de> Deserialize<'de>>(&self) -> Result<T, ValidationError> {
        serde_json::from_value(self.arguments.clone())
            .map_err(|e| ValidationError::invalid_format(self.name.clone(), e.to_string()))
    }
}

/// Arguments of a `create_itinerary` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub destination: String,
    pub days: u32,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl ItineraryRequest {
    pub fn from_tool_call(call: &ToolCall) -> Result<Self, ValidationError> {
        let request: Self = call.parse()?;
        if request.destination.trim().is_empty() {
            return Err(ValidationError::missing_parameter("destination"));
        }
        if request.days == 0 || request.days > 30 {
            return Err(ValidationError::out_of_range("days", 1, 30, request.days as i64));
        }
        Ok(request)
    }
}

/// Collects the search tool invocations into one set of search parameters.
///
/// Non-search tools are skipped. Arguments that do not match the tool's
/// schema, or fail validation, are reported as errors.
pub fn search_params_from_tool_calls(calls: &[ToolCall]) -> Result<SearchParams, ValidationError> {
    let mut params = SearchParams::default();
    for call in calls {
        match call.tool() {
            Some(TravelTool::SearchFlights) => {
                let query: FlightQuery = call.parse()?;
                query.validate()?;
                params.flights = Some(query);
            }
            Some(TravelTool::SearchHotels) => {
                let query: HotelQuery = call.parse()?;
                query.validate()?;
                params.hotels = Some(query);
            }
            Some(TravelTool::SearchActivities) => {
                let query: ActivityQuery = call.parse()?;
                query.validate()?;
                params.activities = Some(query);
            }
            Some(TravelTool::CreateItinerary) | None => {}
        }
    }
    Ok(params)
}
