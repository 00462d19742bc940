//! 组合层的端到端集成测试
//!
//! 夹具组件由过程宏登记，扫描与引导都走全局登记表

use composition_integration_tests::fixtures::providers::{
    AnthropicChatModel, HttpGateway, LocalVectorStore, OpenAiChatModel,
};
use composition_integration_tests::fixtures::services::PromptService;
use di_abstractions::{BeanContainer, ComponentScanner, ProviderRegistry};
use infrastructure_common::{BootstrapError, MarkerKind, RegistryError, TypeInfo};
use infrastructure_composition::{AgentRuntime, ComponentScannerImpl};
use std::io::Write;
use std::sync::Arc;

const PROVIDERS: &str = "composition_integration_tests::fixtures::providers";
const SERVICES: &str = "composition_integration_tests::fixtures::services";
const CONFLICT: &str = "composition_integration_tests::fixtures::conflict";
const FAILOVER: &str = "composition_integration_tests::fixtures::failover";
const OPTIONAL: &str = "composition_integration_tests::fixtures::optional";

#[test]
fn test_bootstrap_wires_and_registers_providers() {
    let runtime = AgentRuntime::builder()
        .scan_module(PROVIDERS)
        .scan_module(SERVICES)
        .build()
        .bootstrap()
        .unwrap();

    // 上下文按类型与名称提供查询
    let service = runtime.context().get_bean::<PromptService>().unwrap();
    assert_eq!(service.template_count, 0);
    let openai = runtime.context().get_bean::<OpenAiChatModel>().unwrap();
    let gateway = runtime.context().get_bean::<HttpGateway>().unwrap();
    assert!(Arc::ptr_eq(&openai.gateway, &gateway));
    assert!(runtime.context().get_bean_by_name("openai").is_ok());

    // 注册表按 (类别, 名称) 提供查询
    let providers = runtime.providers();
    assert!(providers.get::<OpenAiChatModel>("llm", "openai").is_some());
    assert!(providers
        .get::<AnthropicChatModel>("llm", "anthropic")
        .is_some());
    assert!(providers.get::<LocalVectorStore>("storage", "local").is_some());
    // 类型不匹配与未注册一样返回 None
    assert!(providers.get::<LocalVectorStore>("llm", "openai").is_none());
    assert!(providers.get::<OpenAiChatModel>("llm", "ollama").is_none());

    let llm = providers.get_all("llm");
    assert_eq!(llm.len(), 2);
    assert!(llm.contains_key("openai"));
    assert!(llm.contains_key("anthropic"));

    let status = runtime.status();
    assert_eq!(status.component_count, 5);
    assert_eq!(status.provider_count, 3);

    runtime.shutdown();
}

#[test]
fn test_marker_scan_resolves_meta_indirection() {
    let scanner = ComponentScannerImpl::new();

    // 派生标记的组件按基础标记扫描可见
    let components = scanner.scan_for_marker(MarkerKind::Component);
    assert!(components.contains(&TypeInfo::of::<PromptService>()));
    assert!(components.contains(&TypeInfo::of::<OpenAiChatModel>()));
    assert!(components.contains(&TypeInfo::of::<HttpGateway>()));

    // 按派生标记扫描仅命中自身
    let services = scanner.scan_for_marker(MarkerKind::Service);
    assert!(services.contains(&TypeInfo::of::<PromptService>()));
    assert!(!services.contains(&TypeInfo::of::<OpenAiChatModel>()));

    let llm = scanner.scan_for_marker(MarkerKind::LlmProvider);
    assert!(llm.contains(&TypeInfo::of::<OpenAiChatModel>()));
    assert!(llm.contains(&TypeInfo::of::<AnthropicChatModel>()));
    assert!(!llm.contains(&TypeInfo::of::<PromptService>()));
}

#[test]
fn test_provider_buckets_cover_fixture_categories() {
    let scanner = ComponentScannerImpl::new();
    let buckets = scanner.scan_providers();

    assert!(buckets["llm"].contains(&TypeInfo::of::<OpenAiChatModel>()));
    assert!(buckets["llm"].contains(&TypeInfo::of::<AnthropicChatModel>()));
    assert!(buckets["storage"].contains(&TypeInfo::of::<LocalVectorStore>()));
    // 可选后端缺失的向量化提供者在扫描阶段被跳过
    assert!(!buckets.contains_key("embedding"));
}

#[test]
fn test_scan_is_idempotent_over_the_registry() {
    let scanner = ComponentScannerImpl::new();
    let first = scanner.scan(PROVIDERS);
    let second = scanner.scan(PROVIDERS);
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn test_unknown_module_scans_empty_and_bootstrap_continues() {
    let scanner = ComponentScannerImpl::new();
    assert!(scanner.scan("composition_integration_tests::fixtures::absent").is_empty());

    // 缺失模块不致命，引导得到空运行时
    let runtime = AgentRuntime::builder()
        .scan_module("composition_integration_tests::fixtures::absent")
        .build()
        .bootstrap()
        .unwrap();
    assert_eq!(runtime.status().component_count, 0);
}

#[test]
fn test_optional_backend_is_skipped_without_aborting() {
    let runtime = AgentRuntime::builder()
        .scan_module(OPTIONAL)
        .scan_module(PROVIDERS)
        .build()
        .bootstrap()
        .unwrap();

    // milvus 被跳过，其余组件不受影响
    assert_eq!(runtime.status().component_count, 4);
    assert!(runtime.providers().get_all("embedding").is_empty());
    assert_eq!(runtime.providers().get_all("llm").len(), 2);
}

#[test]
fn test_duplicate_enabled_providers_abort_bootstrap() {
    let err = AgentRuntime::builder()
        .scan_module(CONFLICT)
        .build()
        .bootstrap()
        .unwrap_err();

    match err {
        BootstrapError::Registry {
            source: RegistryError::DuplicateRegistration { category, name, .. },
        } => {
            assert_eq!(category, "tool");
            assert_eq!(name, "dup");
        }
        other => panic!("意外的错误类型: {other:?}"),
    }
}

#[test]
fn test_disabled_descriptor_yields_single_live_provider() {
    use composition_integration_tests::fixtures::failover::PrimaryStore;

    let runtime = AgentRuntime::builder()
        .scan_module(FAILOVER)
        .build()
        .bootstrap()
        .unwrap();

    // 同键的两个描述符只有启用者生效
    assert_eq!(runtime.status().provider_count, 1);
    assert!(runtime
        .providers()
        .get::<PrimaryStore>("storage", "primary")
        .is_some());
}

#[test]
fn test_config_file_drives_scan_and_overrides() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
scan_modules = ["{PROVIDERS}"]

[components.anthropic]
enabled = false
"#
    )
    .unwrap();

    let runtime = AgentRuntime::builder()
        .with_config_file(file.path())
        .unwrap()
        .build()
        .bootstrap()
        .unwrap();

    // 扫描模块来自配置文件，anthropic 被配置禁用
    let llm = runtime.providers().get_all("llm");
    assert_eq!(llm.len(), 1);
    assert!(llm.contains_key("openai"));
    assert_eq!(runtime.status().component_count, 3);
}

#[test]
fn test_missing_config_file_is_rejected_by_builder() {
    let result = AgentRuntime::builder().with_config_file("/nonexistent/aster.toml");
    assert!(matches!(result, Err(BootstrapError::Config { .. })));
}
