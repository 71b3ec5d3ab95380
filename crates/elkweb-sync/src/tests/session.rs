use crate::{
    Action, ChangeLayoutVersionAction, LayoutEngine, LayoutError, LayoutSession,
    LayoutVersionRegistry, SessionError, TypedAction,
};
use elkweb_core::{EditorConfig, ElkNode, SceneElement};
use futures::FutureExt;
use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use serde_json::json;

fn identity(graph: ElkNode) -> Result<ElkNode, LayoutError> {
    Ok(graph)
}

fn broken(_: ElkNode) -> Result<ElkNode, LayoutError> {
    Err(LayoutError::new("engine crashed"))
}

/// Places top-level nodes on a horizontal line, `gap` apart.
struct RowLayout {
    gap: f64,
}

impl LayoutEngine for RowLayout {
    fn layout(&self, mut graph: ElkNode) -> LocalBoxFuture<'_, Result<ElkNode, LayoutError>> {
        async move {
            for (i, child) in graph.children.iter_mut().enumerate() {
                child.x = Some(i as f64 * self.gap);
                child.y = Some(0.0);
            }
            Ok(graph)
        }
        .boxed_local()
    }
}

fn session() -> LayoutSession {
    let registry = LayoutVersionRegistry::new()
        .with_engine("snapshot", RowLayout { gap: 50.0 })
        .with_engine("0.2.0", identity)
        .with_engine("broken", broken);
    LayoutSession::new(EditorConfig::default(), registry)
}

const TWO_NODES: &str = r#"{ id: "root", children: [ { id: "n1" }, { id: "n2", width: 40 } ] }"#;

#[test]
fn update_model_sizes_lays_out_and_transforms() {
    let mut session = session();
    let scene = block_on(session.update_model(TWO_NODES)).unwrap();

    let Some(SceneElement::Node(n2)) = scene.find("n2") else {
        panic!("missing n2");
    };
    assert_eq!((n2.position.x, n2.position.y), (50.0, 0.0));
    assert_eq!((n2.size.width, n2.size.height), (40.0, 30.0));
    assert!(session.diagnostics().is_empty());
}

#[test]
fn failed_update_keeps_previous_scene() {
    let mut session = session();
    block_on(session.update_model(TWO_NODES)).unwrap();
    let before = session.scene().cloned();

    let err = block_on(session.update_model("{\n  id: \"root\",\n  children: [ { id: } ]\n}"))
        .unwrap_err();
    assert!(matches!(err, SessionError::Parse(_)));
    assert_eq!(session.scene().cloned(), before);

    let diagnostics = session.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 3);

    block_on(session.update_model(TWO_NODES)).unwrap();
    assert!(session.diagnostics().is_empty());
}

#[test]
fn transform_errors_become_diagnostics() {
    let mut session = session();
    let err = block_on(session.update_model(r#"{ children: [ { id: "a" }, { id: "a" } ] }"#))
        .unwrap_err();
    assert!(matches!(err, SessionError::Transform(_)));
    assert_eq!(session.diagnostics()[0].message, "Duplicate id: a.");
    assert_eq!(session.diagnostics()[0].line, 0);
    assert!(session.scene().is_none());
}

#[test]
fn external_layout_failure_is_propagated() {
    let mut session = session();
    session.set_layout_version("broken");
    let err = block_on(session.update_model(TWO_NODES)).unwrap_err();
    assert_eq!(
        err,
        SessionError::ExternalLayoutFailure(LayoutError::new("engine crashed"))
    );
    assert_eq!(session.diagnostics()[0].message, "layout failed: engine crashed");
}

#[test]
fn unknown_version_is_reported() {
    let mut session = session();
    session.set_layout_version("0.1.0");
    let err = block_on(session.update_model(TWO_NODES)).unwrap_err();
    assert_eq!(err.to_string(), "Unknown layouter version: 0.1.0.");
}

#[test]
fn version_change_action_switches_engines() {
    let mut session = session();
    assert_eq!(session.layout_version(), "snapshot");

    let action = ChangeLayoutVersionAction::new("0.2.0").into_action().unwrap();
    assert!(session.handle_action(&action));
    assert_eq!(session.layout_version(), "0.2.0");

    let scene = block_on(session.update_model(TWO_NODES)).unwrap();
    let Some(SceneElement::Node(n2)) = scene.find("n2") else {
        panic!("missing n2");
    };
    assert_eq!(n2.position.x, 0.0);

    let reset = Action::new(ChangeLayoutVersionAction::KIND);
    assert!(session.handle_action(&reset));
    assert_eq!(session.layout_version(), "snapshot");

    assert!(!session.handle_action(&Action::new("fit")));
    let malformed = Action::new(ChangeLayoutVersionAction::KIND).with("version", json!(3));
    assert!(!session.handle_action(&malformed));
    assert_eq!(session.layout_version(), "snapshot");
}

#[test]
fn defaults_can_be_switched_off() {
    let config = EditorConfig::from_json5_str("{ applyDefaults: false }").unwrap();
    let registry = LayoutVersionRegistry::new().with_engine("snapshot", identity);
    let mut session = LayoutSession::new(config, registry);

    let scene = block_on(session.update_model(TWO_NODES)).unwrap();
    let Some(SceneElement::Node(n1)) = scene.find("n1") else {
        panic!("missing n1");
    };
    assert_eq!((n1.size.width, n1.size.height), (0.0, 0.0));
}

#[test]
fn registry_keeps_registration_order() {
    let session = session();
    let versions: Vec<&str> = session.registry().versions().collect();
    assert_eq!(versions, vec!["snapshot", "0.2.0", "broken"]);
    assert!(session.registry().contains("0.2.0"));
    assert_eq!(session.registry().default_version(), "snapshot");
}
