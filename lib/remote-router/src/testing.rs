//! In-process plugin host doubles for router tests

use async_trait::async_trait;
use remote_core::{
    ArgIndex, CallId, ConfigStorage, EndpointId, EndpointRegistry, LocalMethodCall, MethodCall,
    PluginHostRemote, PluginId, PluginPackage, ProxyNameDefinition, RemoteError, RemoteResult,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// A call observed by a [`RecordingRemote`]
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedCall {
    Load { plugin: PluginId, storage: ConfigStorage },
    Activate { plugin: PluginId },
    Invoke(MethodCall),
    InvokeLocal(LocalMethodCall),
    DefineExports {
        target: EndpointId,
        plugin: PluginId,
        definitions: Vec<ProxyNameDefinition>,
    },
    DefinePackage { plugin: PluginId, package: PluginPackage },
}

/// Records every call it receives, then answers with `reply` or `failure`
pub struct RecordingRemote {
    endpoint: EndpointId,
    calls: mpsc::UnboundedSender<(EndpointId, RecordedCall)>,
    reply: Value,
    failure: Option<RemoteError>,
}

impl RecordingRemote {
    fn record(&self, call: RecordedCall) -> RemoteResult<()> {
        let _ = self.calls.send((self.endpoint.clone(), call));
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PluginHostRemote for RecordingRemote {
    async fn load_plugin(&self, plugin_id: &PluginId, storage: &ConfigStorage) -> RemoteResult<()> {
        self.record(RecordedCall::Load {
            plugin: plugin_id.clone(),
            storage: storage.clone(),
        })
    }

    async fn activate_plugin(&self, plugin_id: &PluginId) -> RemoteResult<()> {
        self.record(RecordedCall::Activate {
            plugin: plugin_id.clone(),
        })
    }

    async fn invoke_method(
        &self,
        caller: &EndpointId,
        plugin_id: &PluginId,
        call_id: CallId,
        entry_name: &str,
        args: Vec<Value>,
    ) -> RemoteResult<Value> {
        self.record(RecordedCall::Invoke(MethodCall {
            caller: caller.clone(),
            plugin_id: plugin_id.clone(),
            call_id,
            entry_name: entry_name.to_string(),
            args,
        }))?;
        Ok(self.reply.clone())
    }

    async fn invoke_local_method(
        &self,
        call_id: CallId,
        arg_index: ArgIndex,
        args: Vec<Value>,
    ) -> RemoteResult<Value> {
        self.record(RecordedCall::InvokeLocal(LocalMethodCall {
            call_id,
            arg_index,
            args,
        }))?;
        Ok(self.reply.clone())
    }

    async fn define_exports(
        &self,
        target: &EndpointId,
        plugin_id: &PluginId,
        definitions: &[ProxyNameDefinition],
    ) -> RemoteResult<()> {
        self.record(RecordedCall::DefineExports {
            target: target.clone(),
            plugin: plugin_id.clone(),
            definitions: definitions.to_vec(),
        })
    }

    async fn define_package(
        &self,
        plugin_id: &PluginId,
        package: &PluginPackage,
    ) -> RemoteResult<()> {
        self.record(RecordedCall::DefinePackage {
            plugin: plugin_id.clone(),
            package: package.clone(),
        })
    }
}

/// A host whose calls never complete
pub struct StalledRemote;

#[async_trait]
impl PluginHostRemote for StalledRemote {
    async fn load_plugin(&self, _: &PluginId, _: &ConfigStorage) -> RemoteResult<()> {
        std::future::pending().await
    }

    async fn activate_plugin(&self, _: &PluginId) -> RemoteResult<()> {
        std::future::pending().await
    }

    async fn invoke_method(
        &self,
        _: &EndpointId,
        _: &PluginId,
        _: CallId,
        _: &str,
        _: Vec<Value>,
    ) -> RemoteResult<Value> {
        std::future::pending().await
    }

    async fn invoke_local_method(
        &self,
        _: CallId,
        _: ArgIndex,
        _: Vec<Value>,
    ) -> RemoteResult<Value> {
        std::future::pending().await
    }

    async fn define_exports(
        &self,
        _: &EndpointId,
        _: &PluginId,
        _: &[ProxyNameDefinition],
    ) -> RemoteResult<()> {
        std::future::pending().await
    }

    async fn define_package(&self, _: &PluginId, _: &PluginPackage) -> RemoteResult<()> {
        std::future::pending().await
    }
}

/// Registry of recording hosts sharing one call log
pub struct Hosts {
    pub registry: Arc<EndpointRegistry>,
    tx: mpsc::UnboundedSender<(EndpointId, RecordedCall)>,
    rx: mpsc::UnboundedReceiver<(EndpointId, RecordedCall)>,
}

impl Hosts {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            registry: Arc::new(EndpointRegistry::new()),
            tx,
            rx,
        }
    }

    /// Register hosts answering with their own id
    pub async fn with_ids(ids: &[&str]) -> Self {
        let hosts = Self::new();
        for id in ids {
            hosts.add(id, Value::from(*id)).await;
        }
        hosts
    }

    pub async fn add(&self, id: &str, reply: Value) {
        self.add_remote(id, reply, None).await;
    }

    pub async fn add_failing(&self, id: &str, failure: RemoteError) {
        self.add_remote(id, Value::Null, Some(failure)).await;
    }

    pub async fn add_stalled(&self, id: &str) {
        self.registry.register(id.into(), Arc::new(StalledRemote)).await;
    }

    async fn add_remote(&self, id: &str, reply: Value, failure: Option<RemoteError>) {
        let remote = RecordingRemote {
            endpoint: id.into(),
            calls: self.tx.clone(),
            reply,
            failure,
        };
        self.registry.register(id.into(), Arc::new(remote)).await;
    }

    /// Wait for the next recorded call
    pub async fn next_call(&mut self) -> (EndpointId, RecordedCall) {
        tokio::time::timeout(Duration::from_secs(1), self.rx.recv())
            .await
            .expect("timed out waiting for a remote call")
            .expect("call log closed")
    }

    /// Calls recorded so far, without waiting
    pub fn drain(&mut self) -> Vec<(EndpointId, RecordedCall)> {
        let mut calls = Vec::new();
        while let Ok(call) = self.rx.try_recv() {
            calls.push(call);
        }
        calls
    }

    /// Wait for `count` calls and return them ordered by endpoint
    pub async fn next_calls(&mut self, count: usize) -> Vec<(EndpointId, RecordedCall)> {
        let mut calls = Vec::with_capacity(count);
        for _ in 0..count {
            calls.push(self.next_call().await);
        }
        calls.sort_by(|a, b| a.0.cmp(&b.0));
        calls
    }
}
