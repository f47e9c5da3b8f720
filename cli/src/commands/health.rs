use crate::client::ApiClient;
use crate::util::{print_client_error, print_ok};

pub async fn run(client: &ApiClient) -> i32 {
    match client.health().await {
        Ok(body) => print_ok(&body),
        Err(e) => print_client_error(&e),
    }
}
