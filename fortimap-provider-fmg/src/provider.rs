//! FortiManager Provider implementation
//!
//! Owns the client and configuration and routes each lifecycle verb to the
//! adapter registered for the resource type. `exec_workspace_action` is
//! routed to the lock protocol instead.

use std::collections::BTreeMap;

use fortimap_core::adapter::{ReadOutcome, ResourceAdapter, Session};
use fortimap_core::client::ConfigClient;
use fortimap_core::config::ProviderConfig;
use fortimap_core::error::{ProviderError, ProviderResult};
use fortimap_core::params::ImportOptions;
use fortimap_core::resource::ResourceData;
use fortimap_core::schema::{ObjectDescriptor, SchemaError};
use fortimap_core::workspace::WorkspaceActionResource;

use crate::resources::{self, EXEC_WORKSPACE_ACTION};

/// FortiManager Provider
pub struct FmgProvider<C> {
    client: C,
    config: ProviderConfig,
    import: ImportOptions,
    adapters: BTreeMap<String, ResourceAdapter>,
    workspace: WorkspaceActionResource,
}

/// Handler selected for one resource type
enum Target<'a> {
    Object(&'a ResourceAdapter),
    Workspace(&'a WorkspaceActionResource),
}

impl<C: ConfigClient> FmgProvider<C> {
    /// Create a new FortiManager Provider
    pub fn new(client: C, config: ProviderConfig) -> Result<Self, SchemaError> {
        let adapters = resources::adapters()?
            .into_iter()
            .map(|adapter| (adapter.resource_type().to_string(), adapter))
            .collect();

        log::debug!(
            "FortiManager provider: adom={} workspace_mode={:?} retries={}",
            config.adom,
            config.workspace_mode,
            config.retries
        );

        Ok(Self {
            client,
            config,
            import: ImportOptions::new(),
            adapters,
            workspace: WorkspaceActionResource::new()?,
        })
    }

    /// Supply addressing parameters for objects adopted by import
    pub fn with_import_options(mut self, import: ImportOptions) -> Self {
        self.import = import;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn session(&self) -> Session<'_> {
        Session::new(&self.client, &self.config, &self.import)
    }

    fn target(&self, resource_type: &str) -> ProviderResult<Target<'_>> {
        if resource_type == EXEC_WORKSPACE_ACTION {
            return Ok(Target::Workspace(&self.workspace));
        }
        self.adapters
            .get(resource_type)
            .map(Target::Object)
            .ok_or_else(|| ProviderError::UnknownResourceType(resource_type.to_string()))
    }

    pub fn resource_type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        names.push(EXEC_WORKSPACE_ACTION);
        names
    }

    pub fn descriptor(&self, resource_type: &str) -> Option<&ObjectDescriptor> {
        match self.target(resource_type).ok()? {
            Target::Object(adapter) => Some(adapter.descriptor()),
            Target::Workspace(workspace) => Some(workspace.descriptor()),
        }
    }

    pub async fn read_resource(&self, data: &mut ResourceData) -> ProviderResult<ReadOutcome> {
        let session = self.session();
        match self.target(&data.resource_type)? {
            Target::Object(adapter) => adapter.read(&session, data).await,
            Target::Workspace(workspace) => workspace.read(&session, data).await,
        }
    }

    pub async fn create_resource(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let session = self.session();
        match self.target(&data.resource_type)? {
            Target::Object(adapter) => adapter.create(&session, data).await,
            Target::Workspace(workspace) => workspace.create(&session, data).await,
        }
    }

    pub async fn update_resource(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let session = self.session();
        match self.target(&data.resource_type)? {
            Target::Object(adapter) => adapter.update(&session, data).await,
            Target::Workspace(workspace) => workspace.update(&session, data).await,
        }
    }

    pub async fn delete_resource(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let session = self.session();
        match self.target(&data.resource_type)? {
            Target::Object(adapter) => adapter.delete(&session, data).await,
            Target::Workspace(workspace) => workspace.delete(&session, data).await,
        }
    }

    pub async fn import_resource(&self, resource_type: &str, id: &str) -> ProviderResult<Option<ResourceData>> {
        match self.target(resource_type)? {
            Target::Object(adapter) => adapter.import(&self.session(), id).await,
            Target::Workspace(_) => Err(ProviderError::configuration(format!(
                "{} cannot be imported",
                EXEC_WORKSPACE_ACTION
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortimap_core::client::{MemoryClient, RecordedCall};
    use fortimap_core::config::WorkspaceMode;
    use fortimap_core::encode::REDACTED;
    use fortimap_core::params::{ParamContext, WorkspaceParams};
    use fortimap_core::resource::{Attributes, Value};
    use fortimap_core::workspace::WorkspaceOp;
    use serde_json::json;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn client() -> MemoryClient {
        MemoryClient::new()
            .with_key("SystemSdwanService", "id")
            .with_key("WirelessControllerWtp", "wtp-id")
            .with_key("ZtnaWebProxy", "name")
    }

    fn device_vdom() -> ParamContext {
        ParamContext::new().with("device", "FGT-A").with("vdom", "root")
    }

    fn scoped(resource_type: &str) -> ResourceData {
        ResourceData::new(resource_type)
            .with_config("device_name", "FGT-A")
            .with_config("device_vdom", "root")
    }

    fn block(entries: &[(&str, Value)]) -> Value {
        let attributes: Attributes = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Value::Map(attributes)
    }

    fn created_body(client: &MemoryClient) -> serde_json::Value {
        client
            .calls()
            .into_iter()
            .find_map(|call| match call {
                RecordedCall::Create { body, .. } => Some(body),
                _ => None,
            })
            .unwrap()
    }

    fn updated_body(client: &MemoryClient) -> serde_json::Value {
        client
            .calls()
            .into_iter()
            .find_map(|call| match call {
                RecordedCall::Update { body, .. } => Some(body),
                _ => None,
            })
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_resource_type() {
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();
        let mut data = ResourceData::new("firewall_policy");
        let err = provider.create_resource(&mut data).await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResourceType(ref t) if t == "firewall_policy"));
        assert!(provider.client().calls().is_empty());
    }

    #[tokio::test]
    async fn sdwan_service_create_encodes_wire_names() {
        init_logger();
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();

        let sla = Value::List(vec![block(&[
            ("health_check", Value::from("dc-ping")),
            ("id", Value::Int(1)),
        ])]);
        let mut data = scoped("system_sdwan_service")
            .with_config("fosid", 7)
            .with_config("name", "to-dc")
            .with_config("mode", "sla")
            .with_config("dst", Value::List(vec![Value::from("dc-net")]))
            .with_config("priority_members", Value::List(vec![Value::from("1"), Value::from("2")]))
            .with_config("sla", sla);
        provider.create_resource(&mut data).await.unwrap();

        assert_eq!(data.id.as_deref(), Some("7"));
        assert_eq!(
            created_body(provider.client()),
            json!({
                "dst": ["dc-net"],
                "id": 7,
                "mode": "sla",
                "name": "to-dc",
                "priority-members": ["1", "2"],
                "sla": [{"health-check": "dc-ping", "id": 1}]
            })
        );
        assert_eq!(data.state.get("mode"), Some(&Value::from("sla")));
        assert_eq!(data.state.get("device_vdom"), Some(&Value::from("root")));
    }

    #[tokio::test]
    async fn sdwan_service_read_sorts_subtables_when_configured() {
        let client = client();
        client.seed(
            "SystemSdwanService",
            &device_vdom(),
            "3",
            json!({"id": 3, "name": "svc", "sla": [{"id": 9, "health-check": "b"}, {"id": 2, "health-check": "a"}]}),
        );
        let config = ProviderConfig {
            sort_subtables: true,
            ..ProviderConfig::default()
        };
        let provider = FmgProvider::new(client, config).unwrap();

        let mut data = scoped("system_sdwan_service").with_id("3");
        assert_eq!(provider.read_resource(&mut data).await.unwrap(), ReadOutcome::Found);
        let ids: Vec<Option<&Value>> = data.state["sla"]
            .as_list()
            .unwrap()
            .iter()
            .map(|item| item.as_map().and_then(|m| m.get("id")))
            .collect();
        assert_eq!(ids, vec![Some(&Value::Int(2)), Some(&Value::Int(9))]);
    }

    #[tokio::test]
    async fn wtp_create_with_single_objects_and_sensitive_password() {
        init_logger();
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();

        let radio_1 = Value::List(vec![block(&[
            ("override_txpower", Value::from("enable")),
            ("power_level", Value::Int(60)),
        ])]);
        let mut data = scoped("wireless_controller_wtp")
            .with_config("wtp_id", "FP231FTF20000001")
            .with_config("wtp_profile", "FAP231F-default")
            .with_config("login_passwd", "s3cret")
            .with_config("radio_1", radio_1)
            .with_config("radio_2", Value::List(vec![]));
        provider.create_resource(&mut data).await.unwrap();

        let body = created_body(provider.client());
        assert_eq!(body["wtp-profile"], json!(["FAP231F-default"]));
        assert_eq!(body["radio-1"], json!({"override-txpower": "enable", "power-level": 60}));
        assert!(body.get("radio-2").is_none());
        assert!(body.get("lan").is_none());

        let descriptor = provider.descriptor("wireless_controller_wtp").unwrap();
        let redacted = fortimap_core::encode::redact(descriptor, &body);
        assert_eq!(redacted["login-passwd"], json!(REDACTED));

        assert_eq!(data.id.as_deref(), Some("FP231FTF20000001"));
        assert_eq!(data.state.get("wtp_profile"), Some(&Value::from("FAP231F-default")));
        assert_eq!(data.state["radio_1"].as_list().map(|l| l.len()), Some(1));
    }

    #[tokio::test]
    async fn wtp_split_tunneling_acl_round_trips_ip_mask() {
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();
        let acl = Value::List(vec![block(&[
            ("id", Value::Int(1)),
            ("dest_ip", Value::from("10.10.0.0 255.255.0.0")),
        ])]);
        let mut data = scoped("wireless_controller_wtp")
            .with_config("wtp_id", "FP231FTF20000002")
            .with_config("split_tunneling_acl", acl.clone());
        provider.create_resource(&mut data).await.unwrap();

        let body = created_body(provider.client());
        assert_eq!(
            body["split-tunneling-acl"],
            json!([{"dest-ip": ["10.10.0.0", "255.255.0.0"], "id": 1}])
        );
        assert_eq!(data.state.get("split_tunneling_acl"), Some(&acl));
    }

    #[tokio::test]
    async fn wtp_split_tunneling_acl_accepts_slash_mask() {
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();
        let acl = Value::List(vec![block(&[
            ("id", Value::Int(1)),
            ("dest_ip", Value::from("10.10.0.0/255.255.0.0")),
        ])]);
        let mut data = scoped("wireless_controller_wtp")
            .with_config("wtp_id", "FP231FTF20000003")
            .with_config("split_tunneling_acl", acl);
        provider.create_resource(&mut data).await.unwrap();

        let body = created_body(provider.client());
        assert_eq!(
            body["split-tunneling-acl"],
            json!([{"dest-ip": ["10.10.0.0", "255.255.0.0"], "id": 1}])
        );
    }

    #[tokio::test]
    async fn wtp_invalid_power_level_is_rejected_before_any_call() {
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();
        let radio_1 = Value::List(vec![block(&[("power_level", Value::Int(150))])]);
        let mut data = scoped("wireless_controller_wtp")
            .with_config("wtp_id", "FP231FTF20000001")
            .with_config("radio_1", radio_1);

        let err = provider.create_resource(&mut data).await.unwrap_err();
        assert!(err.to_string().contains("radio_1.0.power_level"));
        assert!(provider.client().calls().is_empty());
    }

    #[tokio::test]
    async fn ztna_web_proxy_nested_gateway() {
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();

        let realservers = Value::List(vec![block(&[
            ("id", Value::Int(1)),
            ("ip", Value::from("10.1.1.10")),
            ("port", Value::Int(8443)),
        ])]);
        let ciphers = Value::List(vec![block(&[
            ("priority", Value::Int(1)),
            ("cipher", Value::from("TLS-AES-256-GCM-SHA384")),
            ("versions", Value::List(vec![Value::from("tls-1.3")])),
        ])]);
        let quic = Value::List(vec![block(&[("max_idle_timeout", Value::Int(30000))])]);
        let gateway = Value::List(vec![block(&[
            ("id", Value::Int(1)),
            ("service", Value::from("https")),
            ("ldb_method", Value::from("round-robin")),
            ("realservers", realservers),
            ("ssl_cipher_suites", ciphers),
            ("quic", quic),
        ])]);
        let mut data = scoped("ztna_web_proxy")
            .with_config("name", "proxy1")
            .with_config("vip", "ztna-vip")
            .with_config("api_gateway", gateway);
        provider.create_resource(&mut data).await.unwrap();

        let body = created_body(provider.client());
        assert_eq!(
            body["api-gateway"],
            json!([{
                "id": 1,
                "ldb-method": "round-robin",
                "quic": {"max-idle-timeout": 30000},
                "realservers": [{"id": 1, "ip": "10.1.1.10", "port": 8443}],
                "service": "https",
                "ssl-cipher-suites": [{"cipher": "TLS-AES-256-GCM-SHA384", "priority": 1, "versions": ["tls-1.3"]}],
                "url-map": "/"
            }])
        );
        assert_eq!(body["vip"], json!(["ztna-vip"]));
        assert_eq!(data.id.as_deref(), Some("proxy1"));
    }

    #[tokio::test]
    async fn ztna_web_proxy_malformed_gateway_is_rejected() {
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();
        let gateway = Value::List(vec![Value::from("not-a-block")]);
        let mut data = scoped("ztna_web_proxy")
            .with_config("name", "proxy1")
            .with_config("api_gateway", gateway);

        let err = provider.create_resource(&mut data).await.unwrap_err();
        assert!(matches!(err, ProviderError::Validation { .. }));
        assert!(provider.client().calls().is_empty());
    }

    #[tokio::test]
    async fn interface_ipv6_import_uses_import_options() {
        let client = client();
        let params = ParamContext::new().with("device", "FGT-A").with("interface", "port1");
        client.seed(
            "SystemInterfaceIpv6",
            &params,
            "SystemInterfaceIpv6",
            json!({
                "autoconf": 1,
                "ip6-address": "2001:db8::1/64",
                "ip6-allowaccess": ["ping", "https"],
                "ip6-extra-addr": [],
                "ip6-mode": "static",
                "ip6-upstream-interface": ["wan1"]
            }),
        );
        let import = ImportOptions::parse(&["device_name=FGT-A", "interface=port1"]).unwrap();
        let provider = FmgProvider::new(client, ProviderConfig::default())
            .unwrap()
            .with_import_options(import);

        let data = provider
            .import_resource("system_interface_ipv6", "SystemInterfaceIpv6")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(data.state.get("autoconf"), Some(&Value::from("enable")));
        assert_eq!(data.state.get("ip6_upstream_interface"), Some(&Value::from("wan1")));
        assert_eq!(data.state.get("interface"), Some(&Value::from("port1")));
        assert!(!data.state.contains_key("ip6_extra_addr"));
    }

    #[tokio::test]
    async fn interface_ipv6_import_without_interface_fails() {
        let import = ImportOptions::parse(&["device_name=FGT-A"]).unwrap();
        let provider = FmgProvider::new(client(), ProviderConfig::default())
            .unwrap()
            .with_import_options(import);

        let err = provider
            .import_resource("system_interface_ipv6", "SystemInterfaceIpv6")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingParameter { ref name } if name == "interface"));
    }

    #[tokio::test]
    async fn interface_ipv6_singleton_identity() {
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();
        let mut data = ResourceData::new("system_interface_ipv6")
            .with_config("device_name", "FGT-A")
            .with_config("interface", "port1")
            .with_config("ip6_address", "2001:db8::1/64");
        provider.create_resource(&mut data).await.unwrap();

        assert_eq!(data.id.as_deref(), Some("SystemInterfaceIpv6"));
        assert_eq!(data.state.get("ip6_mode"), Some(&Value::from("static")));
    }

    #[tokio::test]
    async fn workspace_mode_passes_adom_to_object_calls() {
        let config = ProviderConfig {
            adom: "branch".to_string(),
            workspace_mode: WorkspaceMode::Workspace,
            ..ProviderConfig::default()
        };
        let provider = FmgProvider::new(client(), config).unwrap();

        let mut lock = ResourceData::new(EXEC_WORKSPACE_ACTION).with_config("action", "lockbegin");
        provider.create_resource(&mut lock).await.unwrap();

        let mut data = scoped("ztna_web_proxy").with_config("name", "proxy1");
        provider.create_resource(&mut data).await.unwrap();

        let mut unlock = ResourceData::new(EXEC_WORKSPACE_ACTION).with_config("action", "lockend");
        provider.create_resource(&mut unlock).await.unwrap();

        let calls = provider.client().calls();
        assert!(matches!(&calls[0], RecordedCall::Workspace { adom, op: WorkspaceOp::Lock, .. } if adom == "branch"));
        assert!(matches!(
            &calls[1],
            RecordedCall::Create { workspace, .. } if *workspace == WorkspaceParams::adom("branch")
        ));
        assert_eq!(
            provider.client().workspace_ops(),
            vec![WorkspaceOp::Lock, WorkspaceOp::Commit, WorkspaceOp::Unlock]
        );
    }

    #[tokio::test]
    async fn workspace_action_cannot_be_imported() {
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();
        let err = provider
            .import_resource(EXEC_WORKSPACE_ACTION, "workspaceactionrootlockbegin")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[tokio::test]
    async fn ztna_web_proxy_update_leaves_nested_computed_values_alone() {
        let client = client();
        client.seed(
            "ZtnaWebProxy",
            &device_vdom(),
            "proxy1",
            json!({"name": "proxy1", "api-gateway": [{"id": 1, "ldb-method": "static", "http-cookie-generation": 3}]}),
        );
        let provider = FmgProvider::new(client, ProviderConfig::default()).unwrap();

        let mut data = scoped("ztna_web_proxy").with_id("proxy1");
        provider.read_resource(&mut data).await.unwrap();
        data.config.insert("name".to_string(), Value::from("proxy1"));
        data.config.insert(
            "api_gateway".to_string(),
            Value::List(vec![block(&[
                ("id", Value::Int(1)),
                ("ldb_method", Value::from("round-robin")),
            ])]),
        );
        provider.client().clear_calls();

        provider.update_resource(&mut data).await.unwrap();
        assert_eq!(
            updated_body(provider.client()),
            json!({
                "api-gateway": [{"id": 1, "ldb-method": "round-robin", "url-map": "/"}],
                "name": "proxy1"
            })
        );
    }

    #[tokio::test]
    async fn sdwan_service_update_sends_cleared_sla_field() {
        let client = client();
        client.seed(
            "SystemSdwanService",
            &device_vdom(),
            "7",
            json!({"id": 7, "name": "svc", "sla": [{"id": 1, "health-check": "a"}, {"id": 2, "health-check": "b"}]}),
        );
        let provider = FmgProvider::new(client, ProviderConfig::default()).unwrap();

        let mut data = scoped("system_sdwan_service").with_id("7");
        provider.read_resource(&mut data).await.unwrap();
        data.config.insert("fosid".to_string(), Value::Int(7));
        data.config.insert("name".to_string(), Value::from("svc"));
        data.config.insert(
            "sla".to_string(),
            Value::List(vec![
                block(&[("id", Value::Int(1))]),
                block(&[("id", Value::Int(2)), ("health_check", Value::from("b"))]),
            ]),
        );
        provider.client().clear_calls();

        provider.update_resource(&mut data).await.unwrap();
        let body = updated_body(provider.client());
        assert_eq!(
            body["sla"],
            json!([{"health-check": "", "id": 1}, {"health-check": "b", "id": 2}])
        );
        assert_eq!(body["name"], json!("svc"));
    }

    #[tokio::test]
    async fn ztna_web_proxy_update_sends_whole_realserver_entries() {
        let client = client();
        client.seed(
            "ZtnaWebProxy",
            &device_vdom(),
            "proxy1",
            json!({"name": "proxy1", "api-gateway": [{"id": 1, "realservers": [
                {"id": 1, "ip": "10.0.0.1", "weight": 0},
                {"id": 2, "ip": "10.0.0.2", "weight": 5}
            ]}]}),
        );
        let provider = FmgProvider::new(client, ProviderConfig::default()).unwrap();

        let mut data = scoped("ztna_web_proxy").with_id("proxy1");
        provider.read_resource(&mut data).await.unwrap();
        let realservers = Value::List(vec![
            block(&[("id", Value::Int(1)), ("ip", Value::from("10.0.0.1")), ("weight", Value::Int(0))]),
            block(&[("id", Value::Int(2)), ("ip", Value::from("10.0.0.2")), ("weight", Value::Int(10))]),
        ]);
        data.config.insert("name".to_string(), Value::from("proxy1"));
        data.config.insert(
            "api_gateway".to_string(),
            Value::List(vec![block(&[("id", Value::Int(1)), ("realservers", realservers)])]),
        );
        provider.client().clear_calls();

        provider.update_resource(&mut data).await.unwrap();
        assert_eq!(
            updated_body(provider.client())["api-gateway"][0]["realservers"],
            json!([
                {"id": 1, "ip": "10.0.0.1", "weight": 0},
                {"id": 2, "ip": "10.0.0.2", "weight": 10}
            ])
        );
    }

    #[tokio::test]
    async fn delete_then_read_reports_gone() {
        let provider = FmgProvider::new(client(), ProviderConfig::default()).unwrap();
        let mut data = scoped("ztna_web_proxy").with_config("name", "proxy1");
        provider.create_resource(&mut data).await.unwrap();

        let mut stale = data.clone();
        provider.delete_resource(&mut data).await.unwrap();
        assert!(!data.exists());

        assert_eq!(provider.read_resource(&mut stale).await.unwrap(), ReadOutcome::Gone);
        assert!(!stale.exists());
    }
}
