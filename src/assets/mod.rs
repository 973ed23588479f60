//! Asynchronous asset tasks
//!
//! The environment texture and the rook mesh arrive on a later frame than the
//! synchronous scene setup. Each outstanding load is an entity carrying an
//! [`AssetTask`]; a per-task system polls it with [`poll_load`] every frame and
//! runs its completion handler once the asset is available, or
//! [`fail_task`] if the server reports a failure. There is no retry, no
//! timeout and no cancellation: a failed load simply never shows up.

use crate::core::SceneError;
use bevy::asset::LoadState;
use bevy::prelude::*;

/// An outstanding load of one asset
#[derive(Component, Debug)]
pub struct AssetTask<A: Asset> {
    pub handle: Handle<A>,
    /// Short description used in log lines
    pub label: String,
}

impl<A: Asset> AssetTask<A> {
    pub fn new(handle: Handle<A>, label: impl Into<String>) -> Self {
        Self {
            handle,
            label: label.into(),
        }
    }
}

/// Result of polling a load
#[derive(Debug)]
pub enum LoadOutcome<'a, A: Asset> {
    /// Still in flight
    Pending,
    /// Asset is in its collection
    Ready(&'a A),
    /// The asset server gave up on it
    Failed(SceneError),
}

/// Poll a handle without blocking
///
/// An asset already present in `assets` is ready whether it came from the
/// server or was inserted directly.
pub fn poll_load<'a, A: Asset>(
    server: &AssetServer,
    assets: &'a Assets<A>,
    handle: &Handle<A>,
) -> LoadOutcome<'a, A> {
    if let Some(asset) = assets.get(handle) {
        return LoadOutcome::Ready(asset);
    }

    match server.load_state(handle) {
        LoadState::Failed(error) => LoadOutcome::Failed(SceneError::AssetLoad {
            path: handle
                .path()
                .map(|path| path.to_string())
                .unwrap_or_else(|| format!("{:?}", handle.id())),
            reason: error.to_string(),
        }),
        _ => LoadOutcome::Pending,
    }
}

/// Shared failure handler: log and drop the task
///
/// The scene carries on without the asset.
pub fn fail_task(commands: &mut Commands, task: Entity, label: &str, error: &SceneError) {
    warn!("[ASSETS] {} will not appear: {}", label, error);
    commands.entity(task).despawn();
}
