//! Editor-side layout loop: text in, laid-out scene out.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use indexmap::IndexMap;

use elkweb_core::{
    Diagnostic, EditorConfig, ElkNode, SceneGraph, apply_defaults, parse_graph, transform,
};

use crate::error::{LayoutError, SessionError};
use crate::protocol::{Action, ChangeLayoutVersionAction};

/// An external layout engine. Receives a graph without geometry and resolves to the same graph
/// with positions, sizes and edge routes filled in.
pub trait LayoutEngine {
    fn layout(&self, graph: ElkNode) -> LocalBoxFuture<'_, Result<ElkNode, LayoutError>>;
}

impl<F> LayoutEngine for F
where
    F: Fn(ElkNode) -> Result<ElkNode, LayoutError>,
{
    fn layout(&self, graph: ElkNode) -> LocalBoxFuture<'_, Result<ElkNode, LayoutError>> {
        futures::future::ready(self(graph)).boxed_local()
    }
}

/// Layout engines by version name, in registration order.
pub struct LayoutVersionRegistry {
    engines: IndexMap<String, Box<dyn LayoutEngine>>,
    default_version: String,
}

impl LayoutVersionRegistry {
    pub const DEFAULT_VERSION: &'static str = "snapshot";

    pub fn new() -> Self {
        Self::with_default_version(Self::DEFAULT_VERSION)
    }

    pub fn with_default_version(version: impl Into<String>) -> Self {
        Self {
            engines: IndexMap::new(),
            default_version: version.into(),
        }
    }

    pub fn register(&mut self, version: impl Into<String>, engine: impl LayoutEngine + 'static) {
        self.engines.insert(version.into(), Box::new(engine));
    }

    pub fn with_engine(
        mut self,
        version: impl Into<String>,
        engine: impl LayoutEngine + 'static,
    ) -> Self {
        self.register(version, engine);
        self
    }

    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(String::as_str)
    }

    pub fn contains(&self, version: &str) -> bool {
        self.engines.contains_key(version)
    }

    pub fn get(&self, version: &str) -> Result<&dyn LayoutEngine, SessionError> {
        self.engines
            .get(version)
            .map(|engine| engine.as_ref())
            .ok_or_else(|| SessionError::UnknownLayoutVersion(version.to_string()))
    }
}

impl Default for LayoutVersionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the last good scene and the diagnostics of the last update.
///
/// Results are applied in completion order; an update that finishes late overwrites a newer one.
pub struct LayoutSession {
    config: EditorConfig,
    registry: LayoutVersionRegistry,
    version: String,
    scene: Option<SceneGraph>,
    diagnostics: Vec<Diagnostic>,
}

impl LayoutSession {
    pub fn new(config: EditorConfig, registry: LayoutVersionRegistry) -> Self {
        let version = configured_version(&config, &registry).to_string();
        Self {
            config,
            registry,
            version,
            scene: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &LayoutVersionRegistry {
        &self.registry
    }

    pub fn layout_version(&self) -> &str {
        &self.version
    }

    pub fn set_layout_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
        tracing::info!(version = %self.version, "layout version selected");
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Parses, lays out and transforms `text`.
    ///
    /// On failure the previous scene stays in place and the error is also recorded as a
    /// diagnostic.
    pub async fn update_model(&mut self, text: &str) -> Result<&SceneGraph, SessionError> {
        let result = self.compute(text).await;
        match result {
            Ok(scene) => {
                self.diagnostics.clear();
                Ok(&*self.scene.insert(scene))
            }
            Err(err) => {
                tracing::warn!(version = %self.version, error = %err, "model update failed");
                self.diagnostics = vec![err.diagnostic()];
                Err(err)
            }
        }
    }

    /// Handles `versionChange`. Returns whether the action was consumed.
    pub fn handle_action(&mut self, action: &Action) -> bool {
        match action.to_typed::<ChangeLayoutVersionAction>() {
            Ok(Some(change)) => {
                let version = change.version.unwrap_or_else(|| {
                    configured_version(&self.config, &self.registry).to_string()
                });
                self.set_layout_version(version);
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed versionChange");
                false
            }
        }
    }

    async fn compute(&self, text: &str) -> Result<SceneGraph, SessionError> {
        let mut graph = parse_graph(text)?;
        if self.config.apply_defaults() {
            apply_defaults(&mut graph, &self.config.default_sizes());
        }
        let engine = self.registry.get(&self.version)?;
        let laid_out = engine.layout(graph).await?;
        Ok(transform(&laid_out)?)
    }
}

fn configured_version<'a>(
    config: &'a EditorConfig,
    registry: &'a LayoutVersionRegistry,
) -> &'a str {
    config
        .layout_version()
        .unwrap_or(registry.default_version())
}
