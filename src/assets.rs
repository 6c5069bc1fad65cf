//! Try-on asset registry and artifact preloading.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::mapping::AssetKind;
use crate::Result;

/// How an asset's visual is applied to the preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaType {
    /// Plain 2D overlay image
    Overlay,
    /// Shader-driven full-face effect
    Shader,
    /// 2D overlay anchored to the feet
    FootOverlay,
}

/// Paths to the wasm runtime backing a detection model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasmPaths {
    pub binary_path: String,
    pub worker_path: String,
}

/// Detection model configuration declared by an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetModelConfig {
    pub task_asset_path: String,
    pub wasm: WasmPaths,
    /// Declared operating FPS target; the session default applies if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps_target: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One entry of the try-on catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryOnAsset {
    pub id: String,
    pub label: String,
    pub kind: AssetKind,
    pub media_type: MediaType,
    pub source_uri: String,
    pub model_config: AssetModelConfig,
    pub accessibility_hint_id: String,
    pub requires_camera: bool,
}

/// The builtin demo catalog
#[must_use]
pub fn builtin_assets() -> Vec<TryOnAsset> {
    vec![
        TryOnAsset {
            id: "glasses".to_string(),
            label: "Glasses".to_string(),
            kind: AssetKind::Glasses,
            media_type: MediaType::Overlay,
            source_uri: "/assets/glasses-overlay.svg".to_string(),
            model_config: AssetModelConfig {
                task_asset_path: "/mediapipe/face_landmarker.task".to_string(),
                wasm: WasmPaths {
                    binary_path: "/mediapipe/vision_wasm_internal.wasm".to_string(),
                    worker_path: "/mediapipe/vision_wasm_internal.js".to_string(),
                },
                fps_target: Some(60),
                notes: Some("Face landmarks drive the glasses overlay".to_string()),
            },
            accessibility_hint_id: "hint-glasses".to_string(),
            requires_camera: true,
        },
        TryOnAsset {
            id: "makeup".to_string(),
            label: "Makeup".to_string(),
            kind: AssetKind::Makeup,
            media_type: MediaType::Shader,
            source_uri: "/assets/makeup-overlay.svg".to_string(),
            model_config: AssetModelConfig {
                task_asset_path: "/mediapipe/image_segmenter_deeplab_v3.tflite".to_string(),
                wasm: WasmPaths {
                    binary_path: "/mediapipe/vision_wasm_internal.wasm".to_string(),
                    worker_path: "/mediapipe/vision_wasm_internal.js".to_string(),
                },
                fps_target: Some(45),
                notes: Some(
                    "Face landmarks combined with the segmenter build the makeup mask".to_string(),
                ),
            },
            accessibility_hint_id: "hint-makeup".to_string(),
            requires_camera: true,
        },
        TryOnAsset {
            id: "shoes".to_string(),
            label: "Shoes".to_string(),
            kind: AssetKind::Shoes,
            media_type: MediaType::FootOverlay,
            source_uri: "/assets/shoes-overlay.svg".to_string(),
            model_config: AssetModelConfig {
                task_asset_path: "/mediapipe/pose_landmarker_full.task".to_string(),
                wasm: WasmPaths {
                    binary_path: "/mediapipe/vision_wasm_internal.wasm".to_string(),
                    worker_path: "/mediapipe/vision_wasm_internal.js".to_string(),
                },
                fps_target: Some(50),
                notes: Some("Pose landmarks anchor the 2D shoe overlay".to_string()),
            },
            accessibility_hint_id: "hint-shoes".to_string(),
            requires_camera: true,
        },
    ]
}

/// Fetches one artifact by URI
pub type ArtifactFetcher = Box<dyn FnMut(&str) -> Result<()>>;

/// Preloads an asset's artifacts before a session uses them
pub trait ArtifactLoader {
    fn preload(&mut self, asset: &TryOnAsset) -> Result<()>;
}

/// Loader that fetches each asset's artifacts once and remembers them.
///
/// Fetching is delegated to an injected function so hosts can plug in
/// HTTP, a service-worker cache, or a test probe.
pub struct CachingArtifactLoader {
    fetcher: ArtifactFetcher,
    loaded: HashSet<String>,
}

impl CachingArtifactLoader {
    #[must_use]
    pub fn new(fetcher: ArtifactFetcher) -> Self {
        Self {
            fetcher,
            loaded: HashSet::new(),
        }
    }

    /// Loader that assumes artifacts are already available locally
    #[must_use]
    pub fn warm() -> Self {
        Self::new(Box::new(|_| Ok(())))
    }

    #[must_use]
    pub fn is_loaded(&self, asset_id: &str) -> bool {
        self.loaded.contains(asset_id)
    }
}

impl Default for CachingArtifactLoader {
    fn default() -> Self {
        Self::warm()
    }
}

impl ArtifactLoader for CachingArtifactLoader {
    fn preload(&mut self, asset: &TryOnAsset) -> Result<()> {
        if self.loaded.contains(&asset.id) {
            return Ok(());
        }

        (self.fetcher)(&asset.model_config.task_asset_path)?;
        (self.fetcher)(&asset.model_config.wasm.binary_path)?;
        (self.fetcher)(&asset.model_config.wasm.worker_path)?;

        self.loaded.insert(asset.id.clone());
        Ok(())
    }
}
