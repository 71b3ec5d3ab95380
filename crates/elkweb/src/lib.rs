#![forbid(unsafe_code)]

//! `elkweb` turns laid-out ELK JSON graphs into renderer-ready diagram scenes.
//!
//! # Features
//!
//! - `sync`: live synchronization with a remote layout service (`elkweb::sync`)

pub use elkweb_core::*;

#[cfg(feature = "sync")]
pub mod sync {
    pub use elkweb_sync::*;

    /// A synchronizer already listening on an in-memory channel, with the inbound event stream
    /// to drive it and the remote endpoint to feed it.
    pub fn local_synchronizer<P: RenderPipeline>(
        config: &crate::EditorConfig,
        pipeline: P,
    ) -> (DiagramSynchronizer<LocalChannel, P>, EventStream, RemoteEndpoint) {
        let (client, inbound, remote) = local_channel();
        let mut synchronizer = DiagramSynchronizer::from_config(config, pipeline);
        synchronizer.listen(client);
        (synchronizer, inbound, remote)
    }
}
