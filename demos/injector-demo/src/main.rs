//! 字段注入示例
//!
//! 从 `config.properties` 加载绑定，为结构体的标记字段注入实现。
//!
//! ```text
//! RUST_LOG=debug cargo run -p injector-demo [配置目录]
//! ```

use di_abstractions::AutoInjectable;
use di_impl::{ImplementationCatalog, Injector};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

pub trait PaymentGateway: Send + Sync {
    fn charge(&self, order: &str, cents: u64) -> String;
}

pub trait Clock: Send + Sync {
    fn now_secs(&self) -> u64;
}

#[derive(Default)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("[console] {message}");
    }
}

#[derive(Default)]
pub struct StripeGateway;

impl PaymentGateway for StripeGateway {
    fn charge(&self, order: &str, cents: u64) -> String {
        format!("stripe:{order}:{cents}")
    }
}

#[derive(Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

/// 结账服务
#[derive(Default, AutoInjectable)]
pub struct CheckoutService {
    #[auto_inject(key = "org.example.Logger")]
    logger: Option<Arc<dyn Logger>>,
    #[auto_inject(key = "org.example.PaymentGateway")]
    gateway: Option<Arc<dyn PaymentGateway>>,
    #[auto_inject]
    clock: Option<Arc<dyn Clock>>,
    currency: String,
}

impl CheckoutService {
    fn checkout(&self, order: &str, cents: u64) -> anyhow::Result<String> {
        let (Some(logger), Some(gateway), Some(clock)) = (&self.logger, &self.gateway, &self.clock)
        else {
            anyhow::bail!("CheckoutService 尚未注入");
        };

        let receipt = gateway.charge(order, cents);
        logger.log(&format!(
            "{} 订单 {order} 支付 {cents} {} -> {receipt}",
            clock.now_secs(),
            self.currency
        ));
        Ok(receipt)
    }
}

/// 审计任务，依赖未配置的绑定
#[derive(Default, AutoInjectable)]
pub struct AuditJob {
    #[auto_inject(key = "org.example.Logger")]
    logger: Option<Arc<dyn Logger>>,
    #[auto_inject(key = "org.example.AuditStore")]
    store: Option<Arc<dyn Logger>>,
}

fn catalog() -> ImplementationCatalog {
    let mut catalog = ImplementationCatalog::new();
    catalog
        .register_named::<ConsoleLogger>("org.example.ConsoleLogger")
        .provides::<dyn Logger>(|logger| logger as Arc<dyn Logger>);
    catalog
        .register_named::<StripeGateway>("org.example.StripeGateway")
        .provides::<dyn PaymentGateway>(|gateway| gateway as Arc<dyn PaymentGateway>);
    catalog
        .register::<SystemClock>()
        .provides::<dyn Clock>(|clock| clock as Arc<dyn Clock>);
    catalog
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let resource_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    println!("=== 加载绑定配置 ===");
    let injector = Injector::builder()
        .with_resource_dir(&resource_dir)
        .with_catalog(catalog())
        .strict(true)
        .build()?;
    info!("注入器就绪: {:?}", injector);
    println!("{}", serde_json::to_string_pretty(injector.registry())?);

    println!("\n=== 注入结账服务 ===");
    injector
        .verify::<CheckoutService>()
        .map_err(|errors| anyhow::anyhow!("检查失败: {} 个问题", errors.len()))?;

    let mut service = CheckoutService {
        currency: "CNY".to_string(),
        ..Default::default()
    };
    injector.inject(&mut service)?;
    println!("收据: {}", service.checkout("A-1001", 4200)?);

    println!("\n=== 注入审计任务（部分失败） ===");
    let mut job = AuditJob::default();
    if let Err(error) = injector.inject(&mut job) {
        println!("注入失败: {error}");
        println!(
            "已注入字段保留: logger={}, store={}",
            job.logger.is_some(),
            job.store.is_some()
        );
    }

    Ok(())
}
