use serde::Serialize;
use serde_json::json;

use crate::client::ClientError;

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!("{}", pretty(&err));
    std::process::exit(4);
}

pub fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

/// Print a successful payload to stdout. Returns exit code 0.
pub fn print_ok<T: Serialize>(value: &T) -> i32 {
    println!("{}", pretty(value));
    0
}

/// Print a failed request to stderr and return its exit code.
pub fn print_client_error(err: &ClientError) -> i32 {
    eprintln!("{}", pretty(&err.to_json()));
    err.exit_code()
}
