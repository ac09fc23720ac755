//! Text rendering for tool results.

use crate::services::endpoint::EndpointDescriptor;
use serde_json::Value;

pub const CONFIGURED_MESSAGE: &str = "DigitalOcean API configured successfully";

pub fn endpoint_line(endpoint: &EndpointDescriptor) -> String {
    format!(
        "• {} {} - {} ({})",
        endpoint.method, endpoint.path, endpoint.summary, endpoint.operation_id
    )
}

fn endpoint_lines(endpoints: &[&EndpointDescriptor]) -> String {
    endpoints
        .iter()
        .map(|endpoint| endpoint_line(endpoint))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn endpoint_list(endpoints: &[&EndpointDescriptor]) -> String {
    format!(
        "Found {} endpoints:\n\n{}",
        endpoints.len(),
        endpoint_lines(endpoints)
    )
}

pub fn search_results(query: &str, endpoints: &[&EndpointDescriptor]) -> String {
    format!(
        "Found {} endpoints matching \"{}\":\n\n{}",
        endpoints.len(),
        query,
        endpoint_lines(endpoints)
    )
}

pub fn endpoint_details(endpoint: &EndpointDescriptor) -> String {
    let parameters = if endpoint.parameters.is_empty() {
        "  None".to_string()
    } else {
        endpoint
            .parameters
            .iter()
            .map(|p| {
                format!(
                    "  • {} ({}): {} {} - {}",
                    p.name,
                    p.location,
                    p.kind,
                    if p.required { "(required)" } else { "(optional)" },
                    p.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let details = format!(
        "**{} {}**\n\n\
         **Operation ID:** {}\n\n\
         **Summary:** {}\n\n\
         **Description:** {}\n\n\
         **Tags:** {}\n\n\
         **Parameters:**\n{}",
        endpoint.method,
        endpoint.path,
        endpoint.operation_id,
        endpoint.summary,
        endpoint.description,
        endpoint.tags.join(", "),
        parameters
    );
    details.trim().to_string()
}

pub fn tag_list(tags: &[String]) -> String {
    let lines = tags
        .iter()
        .map(|tag| format!("• {}", tag))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Available tags:\n\n{}", lines)
}

pub fn api_result(result: &Value) -> String {
    let pretty = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
    format!("API call successful:\n\n{}", pretty)
}
