//! Store traits for path-addressed state access

use crate::error::StateResult;
use crate::vertex::Vertex;

/// Render a path the way errors and logs print it (`accounts/0xab..`)
pub fn display_path(path: &[&str]) -> String {
    path.join("/")
}

/// Path-addressed tree of state vertices
///
/// `set` creates any missing intermediate vertices, mirroring how the kernel
/// seeds `block`, `blockchain` and `accounts/<address>` under one root.
pub trait StateStore {
    /// Place `node` at `path`, replacing whatever was there
    fn set(&mut self, path: &[&str], node: Vertex) -> StateResult<()>;

    /// Get the vertex at `path`
    fn get(&self, path: &[&str]) -> StateResult<&Vertex>;

    /// Get the vertex at `path` mutably
    fn get_mut(&mut self, path: &[&str]) -> StateResult<&mut Vertex>;

    /// Check whether a vertex exists at `path`
    fn contains(&self, path: &[&str]) -> bool {
        self.get(path).is_ok()
    }
}
