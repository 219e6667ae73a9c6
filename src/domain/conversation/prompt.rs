//! Prompt text sent to the language model.

use super::ToolDefinition;

const ROLE: &str = "You are an expert AI travel agent. Your role is to:
1. Understand customer travel needs and preferences
2. Search for flights, hotels, and activities
3. Create personalized itineraries
4. Handle bookings and payments
5. Provide 24/7 customer support

Always be helpful, accurate, and proactive.
Ask clarifying questions when needed.
Present options clearly with prices.
Confirm details before booking.
When you have enough detail to search, call the matching search tools.
Use IATA codes for airports and ISO dates (YYYY-MM-DD).";

/// Instruction appended when asking the model to present search results.
pub const PRESENTATION_INSTRUCTIONS: &str = "Present these options to the customer in a friendly, \
personalized way. Number the options within each category, show every price, mention any category \
that could not be searched, and finish by asking which options they would like to book or whether \
they want different options.";

/// Builds the system prompt listing the tools available to the model.
pub fn system_prompt(tools: &[ToolDefinition]) -> String {
    if tools.is_empty() {
        return ROLE.to_string();
    }
    let listing: Vec<String> = tools
        .iter()
        .map(|t| format!("- {}: {}", t.name(), t.description()))
        .collect();
    format!("{}\n\nYou have access to these tools:\n{}", ROLE, listing.join("\n"))
}

/// Builds the user-turn prompt asking the model to present offers.
///
/// `offers` and `preferences` are pre-rendered blocks.
pub fn presentation_prompt(offers: &str, preferences: &str, unavailable: &[String]) -> String {
    let mut prompt = format!("Search results:\n{}\n", offers);
    if !preferences.is_empty() {
        prompt.push_str(&format!("\nCustomer preferences and history:\n{}\n", preferences));
    }
    if !unavailable.is_empty() {
        prompt.push_str(&format!(
            "\nThese categories could not be searched right now: {}\n",
            unavailable.join(", ")
        ));
    }
    prompt.push('\n');
    prompt.push_str(PRESENTATION_INSTRUCTIONS);
    prompt
}
