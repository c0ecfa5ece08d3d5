use larder_core::paths::DataPaths;

/// Stateless serving layer: the only shared state is where the staged and
/// processed datasets live on disk.
#[derive(Clone)]
pub struct AppState {
    pub paths: DataPaths,
}
