use super::{hash_password, server, Action};
use anyhow::Result;

pub(super) async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Server(args) => server::execute(args).await,
        Action::HashPassword(args) => hash_password::execute(&args),
    }
}
