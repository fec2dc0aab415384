//! 基于派生宏和配置文件的字段注入集成测试

use config_impl::{file_source, InlineSource};
use di_abstractions::{
    AssignError, AutoInjectable, ConstructorPanicked, ImplementationProvider, InjectionPoint,
    ProvidedInstance, TypeInfo,
};
use di_impl::{ImplementationCatalog, ImplementationRegistry, Injector};
use infrastructure_common::{BindingError, InfrastructureError, InstantiationCause};
use std::error::Error as _;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub trait Logger: Send + Sync {
    fn log(&self, message: &str) -> String;

    fn implementation(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

pub trait PaymentGateway: Send + Sync {
    fn charge(&self, cents: u64) -> Result<String, String>;
}

#[derive(Default)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) -> String {
        format!("[console] {message}")
    }
}

/// 只能通过两个参数构造的日志实现
pub struct PooledLogger {
    size: usize,
    prefix: String,
}

impl PooledLogger {
    pub fn new(size: usize, prefix: impl Into<String>) -> Self {
        Self {
            size,
            prefix: prefix.into(),
        }
    }
}

impl Logger for PooledLogger {
    fn log(&self, message: &str) -> String {
        format!("[{}#{}] {message}", self.prefix, self.size)
    }
}

/// `Default` 实现会 panic 的日志实现
pub struct ExplodingLogger;

impl Default for ExplodingLogger {
    fn default() -> Self {
        panic!("日志文件句柄耗尽")
    }
}

impl Logger for ExplodingLogger {
    fn log(&self, message: &str) -> String {
        message.to_string()
    }
}

static GATEWAYS_CREATED: AtomicUsize = AtomicUsize::new(0);

pub struct StripeGateway {
    id: usize,
}

impl Default for StripeGateway {
    fn default() -> Self {
        Self {
            id: GATEWAYS_CREATED.fetch_add(1, Ordering::SeqCst),
        }
    }
}

impl PaymentGateway for StripeGateway {
    fn charge(&self, cents: u64) -> Result<String, String> {
        Ok(format!("stripe-{}:{cents}", self.id))
    }
}

#[derive(Default, AutoInjectable)]
pub struct CheckoutService {
    #[auto_inject(key = "org.example.Logger")]
    logger: Option<Arc<dyn Logger>>,
    #[auto_inject(key = "org.example.PaymentGateway")]
    gateway: Option<Arc<dyn PaymentGateway>>,
    currency: String,
}

#[derive(Default, AutoInjectable)]
pub struct ReportJob {
    #[auto_inject(key = "org.example.Logger")]
    logger: Option<Arc<dyn Logger>>,
}

#[derive(Default, AutoInjectable)]
pub struct TypeKeyedService {
    #[auto_inject]
    logger: Option<Arc<dyn Logger>>,
}

#[derive(Default, AutoInjectable)]
pub struct StaticPage {
    title: String,
}

fn catalog() -> ImplementationCatalog {
    let mut catalog = ImplementationCatalog::new();
    catalog
        .register_named::<ConsoleLogger>("org.example.ConsoleLogger")
        .provides::<dyn Logger>(|logger| logger as Arc<dyn Logger>);
    catalog
        .declare::<PooledLogger>("org.example.PooledLogger")
        .provides::<dyn Logger>(|logger| logger as Arc<dyn Logger>);
    catalog
        .register_named::<StripeGateway>("org.example.StripeGateway")
        .provides::<dyn PaymentGateway>(|gateway| gateway as Arc<dyn PaymentGateway>);
    catalog
        .register_named::<ExplodingLogger>("org.example.ExplodingLogger")
        .provides::<dyn Logger>(|logger| logger as Arc<dyn Logger>);
    catalog
        .register_with::<ConsoleLogger, _, _>("org.example.FlakyLogger", || {
            Err("日志目录不可写")
        })
        .provides::<dyn Logger>(|logger| logger as Arc<dyn Logger>);
    catalog
}

fn injector(content: &str) -> (TempDir, Injector) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(Injector::DEFAULT_RESOURCE_NAME), content).unwrap();
    let injector = Injector::from_resource_dir(dir.path(), catalog()).unwrap();
    (dir, injector)
}

const BINDINGS: &str = "\
# 支付网关
org.example.PaymentGateway=org.example.StripeGateway
org.example.Logger=org.example.ConsoleLogger
";

#[test]
fn test_logger_bound_to_console_logger() {
    let (_dir, injector) = injector("org.example.Logger=org.example.ConsoleLogger\n");

    let mut job = ReportJob::default();
    injector.inject(&mut job).unwrap();

    let logger = job.logger.as_ref().unwrap();
    assert_eq!(logger.implementation(), std::any::type_name::<ConsoleLogger>());
    assert_eq!(logger.log("done"), "[console] done");
}

#[test]
fn test_empty_registry_reports_unresolved_binding() {
    let (_dir, injector) = injector("");
    assert!(injector.registry().is_empty());

    let mut job = ReportJob::default();
    let error = injector.inject(&mut job).err().unwrap();

    assert!(matches!(error, BindingError::UnresolvedBinding { .. }));
    assert_eq!(error.field(), "logger");
    assert_eq!(error.type_name(), "org.example.Logger");
    assert!(error.to_string().contains("org.example.Logger"));
    assert!(job.logger.is_none());
}

#[test]
fn test_two_argument_constructor_is_instantiation_failure() {
    let (_dir, injector) = injector("org.example.Logger=org.example.PooledLogger\n");

    let mut job = ReportJob::default();
    let error = injector.inject(&mut job).err().unwrap();

    match &error {
        BindingError::InstantiationFailure {
            field,
            implementation,
            cause: InstantiationCause::NoDefaultConstructor { .. },
            ..
        } => {
            assert_eq!(*field, "logger");
            assert_eq!(implementation, "org.example.PooledLogger");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(error.to_string().contains("logger"));
    assert!(error.source().is_some());

    // 手动构造仍然可用
    let pooled = PooledLogger::new(4, "pool");
    assert_eq!(pooled.log("x"), "[pool#4] x");
}

#[test]
fn test_unknown_implementation_is_instantiation_failure() {
    let (_dir, injector) = injector("org.example.Logger=org.example.FileLogger\n");

    let mut job = ReportJob::default();
    match injector.inject(&mut job) {
        Err(BindingError::InstantiationFailure {
            cause: InstantiationCause::ImplementationNotFound { implementation },
            ..
        }) => assert_eq!(implementation, "org.example.FileLogger"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_all_marked_fields_bound_and_unmarked_untouched() -> anyhow::Result<()> {
    let (_dir, injector) = injector(BINDINGS);

    let mut service = CheckoutService {
        currency: "EUR".to_string(),
        ..Default::default()
    };
    injector.inject(&mut service)?;

    let gateway = service.gateway.as_ref().expect("gateway injected");
    let receipt = gateway.charge(250).map_err(anyhow::Error::msg)?;
    assert!(receipt.ends_with(":250"));
    assert!(service.logger.is_some());
    assert_eq!(service.currency, "EUR");
    Ok(())
}

#[test]
fn test_no_marked_fields_is_noop() {
    let (_dir, injector) = injector("");

    let mut page = StaticPage {
        title: "home".to_string(),
    };
    injector.inject(&mut page).unwrap();

    assert_eq!(page.title, "home");
}

#[test]
fn test_partial_mutation_is_preserved() {
    let (_dir, injector) = injector("org.example.Logger=org.example.ConsoleLogger\n");

    let mut service = CheckoutService::default();
    let error = injector.inject(&mut service).err().unwrap();

    assert_eq!(error.field(), "gateway");
    assert_eq!(error.type_name(), "org.example.PaymentGateway");
    assert!(service.logger.is_some());
    assert!(service.gateway.is_none());
}

#[test]
fn test_re_injection_replaces_instances() {
    let (_dir, injector) = injector(BINDINGS);

    let mut service = CheckoutService::default();
    injector.inject(&mut service).unwrap();
    let first_logger = service.logger.clone().unwrap();
    let first_gateway = service.gateway.clone().unwrap();

    injector.inject(&mut service).unwrap();

    assert!(!Arc::ptr_eq(&first_logger, service.logger.as_ref().unwrap()));
    assert!(!Arc::ptr_eq(&first_gateway, service.gateway.as_ref().unwrap()));
}

#[test]
fn test_each_target_gets_its_own_instance() {
    let (_dir, injector) = injector(BINDINGS);

    let mut first = CheckoutService::default();
    let mut second = CheckoutService::default();
    injector.inject(&mut first).unwrap();
    injector.inject(&mut second).unwrap();

    let a = first.gateway.as_ref().unwrap().charge(1).unwrap();
    let b = second.gateway.as_ref().unwrap().charge(1).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_default_key_uses_contract_path() {
    // 属性文件中的 `:` 是分隔符，需要转义
    let key = TypeInfo::of::<dyn Logger>().binding_key().replace(':', "\\:");
    let content = format!("{key}=org.example.ConsoleLogger\n");
    let injector = Injector::new(&InlineSource::new(content), catalog()).unwrap();

    let mut service = TypeKeyedService::default();
    injector.inject(&mut service).unwrap();
    assert!(service.logger.is_some());
}

#[test]
fn test_dotted_and_path_keys_are_equivalent() {
    let injector = Injector::new(
        &InlineSource::new("org\\:\\:example\\:\\:Logger = org::example::ConsoleLogger\n"),
        catalog(),
    )
    .unwrap();

    let mut job = ReportJob::default();
    injector.inject(&mut job).unwrap();
    assert!(job.logger.is_some());
}

#[test]
fn test_verify_reports_every_problem() {
    let (_dir, injector) = injector("org.example.Logger=org.example.PooledLogger\n");

    let errors = injector.verify::<CheckoutService>().err().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], BindingError::InstantiationFailure { .. }));
    assert!(matches!(errors[1], BindingError::UnresolvedBinding { .. }));

    let (_dir, injector) = injector_ok();
    assert!(injector.verify::<CheckoutService>().is_ok());
}

fn injector_ok() -> (TempDir, Injector) {
    injector(BINDINGS)
}

#[test]
fn test_json_and_toml_sources() {
    let dir = TempDir::new().unwrap();

    let json = dir.path().join("bindings.json");
    let document = serde_json::json!({
        "org": { "example": {
            "Logger": "org.example.ConsoleLogger",
            "PaymentGateway": "org.example.StripeGateway"
        } }
    });
    fs::write(&json, document.to_string()).unwrap();

    let toml = dir.path().join("bindings.toml");
    fs::write(
        &toml,
        "[org.example]\nLogger = \"org.example.ConsoleLogger\"\nPaymentGateway = \"org.example.StripeGateway\"\n",
    )
    .unwrap();

    for path in [json, toml] {
        let source = file_source(&path);
        let injector = Injector::new(source.as_ref(), catalog()).unwrap();

        let mut service = CheckoutService::default();
        injector.inject(&mut service).unwrap();
        assert!(service.logger.is_some() && service.gateway.is_some());
    }
}

#[test]
fn test_builder_strict_mode() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(Injector::DEFAULT_RESOURCE_NAME),
        "org.example.Logger=org.example.FileLogger\norg.example.PaymentGateway=not a type\n",
    )
    .unwrap();

    let result = Injector::builder()
        .with_resource_dir(dir.path())
        .with_catalog(catalog())
        .strict(true)
        .build();

    match result {
        Err(InfrastructureError::ConfigError { source }) => {
            let message = source.to_string();
            assert!(message.contains("org.example.FileLogger"));
            assert!(message.contains("not a type"));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }

    let lenient = Injector::builder()
        .with_resource_dir(dir.path())
        .with_catalog(catalog())
        .build()
        .unwrap();
    assert_eq!(lenient.registry().len(), 2);
}

#[test]
fn test_injector_from_prebuilt_registry() {
    let registry = ImplementationRegistry::load(&InlineSource::new(BINDINGS)).unwrap();
    let injector = Injector::from_registry(registry, catalog());

    let mut service = CheckoutService::default();
    injector.inject(&mut service).unwrap();
    assert!(service.gateway.is_some());
}

#[test]
fn test_failing_constructor_names_the_field() {
    let (_dir, injector) = injector("org.example.Logger=org.example.FlakyLogger\n");

    let mut job = ReportJob::default();
    match injector.inject(&mut job) {
        Err(BindingError::InstantiationFailure {
            field,
            implementation,
            cause: InstantiationCause::ConstructorFailed { source, .. },
            ..
        }) => {
            assert_eq!(field, "logger");
            assert_eq!(implementation, "org.example.FlakyLogger");
            assert_eq!(source.to_string(), "日志目录不可写");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert!(job.logger.is_none());
}

#[test]
fn test_panicking_default_is_instantiation_failure() {
    let (_dir, injector) = injector("org.example.Logger=org.example.ExplodingLogger\n");

    let mut job = ReportJob::default();
    match injector.inject(&mut job) {
        Err(BindingError::InstantiationFailure {
            field,
            cause: InstantiationCause::ConstructorFailed { source, .. },
            ..
        }) => {
            assert_eq!(field, "logger");
            let panicked = source.downcast_ref::<ConstructorPanicked>().unwrap();
            assert_eq!(panicked.message(), "日志文件句柄耗尽");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert!(job.logger.is_none());
}

/// 无论请求什么契约都返回支付网关的提供者
struct GatewayOnlyProvider;

impl ImplementationProvider for GatewayOnlyProvider {
    fn contains(&self, _implementation: &str) -> bool {
        true
    }

    fn check(&self, _implementation: &str, _point: &InjectionPoint) -> Result<(), InstantiationCause> {
        Ok(())
    }

    fn instantiate(
        &self,
        _implementation: &str,
        _point: &InjectionPoint,
    ) -> Result<ProvidedInstance, InstantiationCause> {
        let gateway: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::default());
        Ok(ProvidedInstance::new(gateway))
    }

    fn name(&self) -> &str {
        "GatewayOnlyProvider"
    }
}

#[test]
fn test_custom_provider_with_wrong_contract_is_assignment_failure() {
    let injector = Injector::builder()
        .with_source(InlineSource::new(BINDINGS))
        .with_provider(GatewayOnlyProvider)
        .strict(true)
        .build()
        .unwrap();
    assert_eq!(injector.provider().name(), "GatewayOnlyProvider");

    let mut service = CheckoutService::default();
    match injector.inject(&mut service) {
        Err(BindingError::InstantiationFailure {
            field,
            cause: InstantiationCause::Assignment(AssignError::TypeMismatch { expected, .. }),
            ..
        }) => {
            assert_eq!(field, "logger");
            assert!(expected.contains("Logger"));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    assert!(service.logger.is_none());
}
