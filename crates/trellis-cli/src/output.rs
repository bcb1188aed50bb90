use serde::Serialize;
use serde_json::json;
use trellis_domain::CommandOutput;

#[derive(Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub count: usize,
}

pub fn success<T: Serialize>(data: T) -> anyhow::Result<String> {
    let response = CliResponse {
        success: true,
        api_version: env!("CARGO_PKG_VERSION"),
        data: Some(data),
        error: None,
    };
    Ok(serde_json::to_string(&response)?)
}

pub fn list<T: Serialize>(items: Vec<T>) -> anyhow::Result<String> {
    let count = items.len();
    success(ListResponse { items, count })
}

pub fn error(message: &str) -> anyhow::Result<String> {
    let response: CliResponse<()> = CliResponse {
        success: false,
        api_version: env!("CARGO_PKG_VERSION"),
        data: None,
        error: Some(message.to_string()),
    };
    Ok(serde_json::to_string(&response)?)
}

/// Renders a command result as one JSON line.
pub fn render(output: CommandOutput) -> anyhow::Result<String> {
    match output {
        CommandOutput::Boards(items) => list(items),
        CommandOutput::Lists(items) => list(items),
        CommandOutput::Cards(items) => list(items),
        CommandOutput::Comments(items) => list(items),
        CommandOutput::Candidates(items) => list(items),
        CommandOutput::Board(board) => success(board),
        CommandOutput::List(entry) => success(entry),
        CommandOutput::Card(card) => success(card),
        CommandOutput::Comment(comment) => success(comment),
        CommandOutput::Path(path) => success(json!({ "path": path })),
    }
}
