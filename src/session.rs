//! Session command surface coordinating assets, modes, and metrics.
//!
//! The adapter is the system's API boundary for a host UI: it owns the
//! preview state, validates commands, and broadcasts defensive copies to
//! subscribers after every mutation.

use log::{debug, info};

use crate::assets::{builtin_assets, ArtifactLoader, CachingArtifactLoader, TryOnAsset};
use crate::constants::DEFAULT_FPS_TARGET;
use crate::metrics::{MetricsSnapshot, MetricsTracker};
use crate::state::{CameraStatus, DeviceProfile, PreviewMode, PreviewState};
use crate::{Error, Result};

/// Inputs for starting a session
#[derive(Debug, Clone)]
pub struct InitializeSessionInput {
    pub asset_id: String,
    pub device_profile: DeviceProfile,
}

/// Inputs for switching the active asset
#[derive(Debug, Clone)]
pub struct SwitchAssetInput {
    pub asset_id: String,
}

/// Mode toggle request. The camera status override is used when a
/// permission failure forces the photo fallback.
#[derive(Debug, Clone)]
pub struct ToggleModeInput {
    pub mode: String,
    pub camera_status: Option<CameraStatus>,
}

/// Successful initialization summary returned to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeSessionResponse {
    /// Operating FPS target for the asset
    pub fps_target: u32,
    /// Advisory notes declared by the asset, if any
    pub notes: Option<String>,
}

/// Handle returned by `subscribe`, consumed by `unsubscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PreviewState)>;

/// Collaborators and tunables injected into a session adapter
pub struct SessionOptions {
    pub assets: Vec<TryOnAsset>,
    pub loader: Box<dyn ArtifactLoader>,
    pub metrics: MetricsTracker,
    pub default_fps_target: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            assets: builtin_assets(),
            loader: Box::new(CachingArtifactLoader::warm()),
            metrics: MetricsTracker::default(),
            default_fps_target: DEFAULT_FPS_TARGET,
        }
    }
}

/// Finite-state session object behind the host UI
pub struct SessionAdapter {
    assets: Vec<TryOnAsset>,
    loader: Box<dyn ArtifactLoader>,
    metrics: MetricsTracker,
    state: PreviewState,
    fps_target: u32,
    default_fps_target: u32,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_listener: u64,
}

impl Default for SessionAdapter {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl SessionAdapter {
    #[must_use]
    pub fn new(options: SessionOptions) -> Self {
        let mut state = PreviewState::initial();
        if let Some(first) = options.assets.first() {
            state.active_asset_id = first.id.clone();
        }

        Self {
            assets: options.assets,
            loader: options.loader,
            metrics: options.metrics,
            state,
            fps_target: options.default_fps_target,
            default_fps_target: options.default_fps_target,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Start a session for an asset on a device profile.
    ///
    /// Resolves the asset (unknown id rejects with code 422 and leaves
    /// prior state untouched), preloads its artifacts, clears metrics and
    /// frame history, and enters live mode with the camera marked ready.
    pub fn initialize_session(
        &mut self,
        input: &InitializeSessionInput,
    ) -> Result<InitializeSessionResponse> {
        let asset = self.find_asset(&input.asset_id)?.clone();
        self.loader.preload(&asset)?;

        self.state.active_asset_id = asset.id.clone();
        self.state.device_profile = input.device_profile;
        self.state.camera_status = CameraStatus::Ready;
        self.state.mode = PreviewMode::Live;
        self.state.fps_history.clear();
        self.state.last_frame_timestamp = None;

        self.fps_target = asset
            .model_config
            .fps_target
            .unwrap_or(self.default_fps_target);
        self.metrics.reset();

        info!(
            "session initialized for {} on {:?}",
            asset.id, input.device_profile
        );
        self.emit();

        Ok(InitializeSessionResponse {
            fps_target: self.fps_target,
            notes: asset.model_config.notes.clone(),
        })
    }

    /// Switch the active asset, preserving device profile and camera
    /// status. Metrics and frame history start over, and the FPS target
    /// follows the new asset.
    pub fn switch_asset(&mut self, input: &SwitchAssetInput) -> Result<()> {
        let asset = self.find_asset(&input.asset_id)?.clone();
        self.loader.preload(&asset)?;

        self.state.active_asset_id = asset.id.clone();
        self.state.fps_history.clear();
        self.state.last_frame_timestamp = None;

        self.fps_target = asset.model_config.fps_target.unwrap_or(self.fps_target);
        self.metrics.reset();

        debug!("switched asset to {}", asset.id);
        self.emit();
        Ok(())
    }

    /// Change preview mode, optionally overriding camera status in the
    /// same step. Unrecognized modes are rejected with code 400.
    pub fn toggle_mode(&mut self, input: &ToggleModeInput) -> Result<()> {
        let mode: PreviewMode = input.mode.parse()?;

        self.state.mode = mode;
        if let Some(status) = input.camera_status {
            self.state.camera_status = status;
        }

        debug!("preview mode set to {mode}");
        self.emit();
        Ok(())
    }

    /// Record one rendered frame and republish the frame-history portion
    /// of the state.
    pub fn record_frame(&mut self, timestamp: Option<f64>) {
        self.metrics.record_frame(timestamp);
        self.state.fps_history = self.metrics.fps_history();
        self.state.last_frame_timestamp = self.metrics.last_frame_timestamp();
        self.emit();
    }

    /// Current rolling FPS / latency snapshot
    #[must_use]
    pub fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Metrics snapshot against an explicit clock reading
    #[must_use]
    pub fn metrics_at(&self, now_ms: f64) -> MetricsSnapshot {
        self.metrics.snapshot_at(now_ms)
    }

    /// Defensive copy of the current state
    #[must_use]
    pub fn get_state(&self) -> PreviewState {
        self.state.clone()
    }

    /// Operating FPS target of the active asset
    #[must_use]
    pub fn fps_target(&self) -> u32 {
        self.fps_target
    }

    /// Registered catalog, in declaration order
    #[must_use]
    pub fn assets(&self) -> &[TryOnAsset] {
        &self.assets
    }

    /// Register a listener. It is called immediately with a copy of the
    /// current state and again after every mutation, in registration
    /// order.
    pub fn subscribe(&mut self, mut listener: impl FnMut(&PreviewState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener);
        self.next_listener += 1;

        let snapshot = self.state.clone();
        listener(&snapshot);

        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; unknown ids are ignored
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    fn find_asset(&self, asset_id: &str) -> Result<&TryOnAsset> {
        self.assets
            .iter()
            .find(|asset| asset.id == asset_id)
            .ok_or_else(|| Error::UnknownAsset(asset_id.to_string()))
    }

    fn emit(&mut self) {
        let snapshot = self.state.clone();
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}
