use std::path::Path;
use std::sync::Arc;

use moit_core::agent::AgentClient;
use moit_core::objects::FsObjectStore;
use moit_core::storage::Storage;

use crate::server::AppState;
use crate::session::SessionManager;

/// Create a test AppState backed by an in-memory database and a caller-owned
/// upload directory. `agent_url` may point at a mock agent or at a port with
/// nothing listening when the test never reaches the agent.
pub async fn create_test_state(agent_url: &str, upload_dir: &Path) -> AppState {
    let storage = Storage::connect(":memory:").await.expect("in-memory db");
    let objects =
        FsObjectStore::new(upload_dir, "http://localhost:3000/uploads").expect("object store");

    AppState {
        storage: Arc::new(storage),
        sessions: SessionManager::new(),
        agent: Arc::new(AgentClient::new(agent_url).expect("agent client")),
        objects: Arc::new(objects),
    }
}
