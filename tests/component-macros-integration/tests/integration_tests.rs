//! 组件宏的集成测试

use component_macros::{component, llm_provider, service, storage_provider};
use di_abstractions::RegisterableComponent;
use infrastructure_common::{descriptor_entries, Component, MarkerKind, TypeInfo};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
#[component]
pub struct TokenCounter;

#[derive(Debug)]
#[service(priority = 100)]
pub struct ConversationService {
    pub counter: Arc<TokenCounter>,
    pub turn_limit: usize,
}

#[derive(Debug)]
#[llm_provider(name = "ollama", priority = -5)]
pub struct OllamaChatModel {
    pub counter: Arc<TokenCounter>,
}

#[derive(Debug)]
#[storage_provider(name = "memory", disabled)]
pub struct InMemoryStore;

/// 在全局登记表中查找指定名称的描述符
fn descriptor_by_name(name: &str) -> Option<infrastructure_common::ComponentDescriptor> {
    descriptor_entries()
        .into_iter()
        .filter_map(|entry| (entry.load)().ok())
        .find(|descriptor| descriptor.name == name)
}

#[test]
fn test_component_trait_implementation() {
    let counter = TokenCounter;
    // 名称缺省按类型简名首字母小写推导
    assert_eq!(counter.name(), "tokenCounter");
    assert_eq!(counter.priority(), 0);
    assert!(counter.is_enabled());

    let store = InMemoryStore;
    assert_eq!(store.name(), "memory");
    assert!(!store.is_enabled());
}

#[test]
fn test_arc_fields_become_dependencies_in_order() {
    assert_eq!(TokenCounter::dependencies(), Vec::<TypeInfo>::new());
    assert_eq!(
        ConversationService::dependencies(),
        vec![TypeInfo::of::<TokenCounter>()]
    );
    assert_eq!(
        OllamaChatModel::dependencies(),
        vec![TypeInfo::of::<TokenCounter>()]
    );
}

#[test]
fn test_construct_fills_non_dependency_fields_with_defaults() {
    let counter: Arc<dyn Any + Send + Sync> = Arc::new(TokenCounter);
    let service = ConversationService::construct(vec![counter]).unwrap();
    assert_eq!(service.turn_limit, 0);
    assert_eq!(service.counter.name(), "tokenCounter");
}

#[test]
fn test_construct_rejects_missing_dependencies() {
    let err = ConversationService::construct(Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        infrastructure_common::DependencyError::CreationFailed { .. }
    ));
}

#[test]
fn test_ctor_registration_submits_descriptors() {
    let ollama = descriptor_by_name("ollama").expect("ollama 应已登记");
    assert_eq!(ollama.marker, MarkerKind::LlmProvider);
    assert_eq!(ollama.priority, -5);
    assert!(ollama.enabled);
    assert_eq!(ollama.provider_key(), Some(("llm", "ollama")));
    assert_eq!(ollama.type_info.id, std::any::TypeId::of::<OllamaChatModel>());

    let conversation = descriptor_by_name("conversationService").expect("服务应已登记");
    assert_eq!(conversation.marker, MarkerKind::Service);
    assert_eq!(conversation.priority, 100);
    // 派生标记隐含基础组件标记
    assert!(conversation.marker.matches(MarkerKind::Component));

    let memory = descriptor_by_name("memory").expect("禁用组件同样登记");
    assert!(!memory.enabled);
}

#[test]
fn test_entry_construct_round_trips_through_type_erasure() {
    let entry = descriptor_entries()
        .into_iter()
        .find(|entry| {
            (entry.load)()
                .map(|d| d.name == "ollama")
                .unwrap_or(false)
        })
        .expect("ollama 应已登记");

    assert_eq!((entry.dependencies)(), vec![TypeInfo::of::<TokenCounter>()]);

    let counter: Arc<dyn Any + Send + Sync> = Arc::new(TokenCounter);
    let instance = (entry.construct)(vec![counter]).unwrap();
    assert!(instance.downcast::<OllamaChatModel>().is_ok());
}
