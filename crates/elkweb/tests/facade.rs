#[test]
fn core_api_is_reexported() {
    let scene = elkweb::transform_str(r#"{ id: "g", children: [ { id: "n1" } ] }"#).unwrap();
    assert_eq!(scene.id, "g");
    assert_eq!(elkweb::EditorConfig::default().client_id(), "sprotty");
}

#[cfg(feature = "sync")]
#[test]
fn local_synchronizer_is_listening() {
    use elkweb::sync::{Action, ActionMessage, RenderPipeline, local_synchronizer};

    #[derive(Default)]
    struct Count(usize);

    impl RenderPipeline for Count {
        fn accept(&mut self, _message: ActionMessage) {
            self.0 += 1;
        }
    }

    let config = elkweb::EditorConfig::default();
    let (mut sync, inbound, remote) = local_synchronizer(&config, Count::default());
    assert!(sync.is_listening());

    remote
        .accept(&ActionMessage::new("sprotty", Action::new("updateModel")))
        .unwrap();
    remote.close();
    futures::executor::block_on(sync.run(inbound));
    assert_eq!(sync.pipeline().0, 1);
}
