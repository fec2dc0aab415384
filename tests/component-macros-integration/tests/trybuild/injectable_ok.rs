use di_abstractions::{AutoInjectable, Injectable, ProvidedInstance};
use std::sync::Arc;

pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, _message: &str) {}
}

#[derive(Default, AutoInjectable)]
struct OkService {
    #[auto_inject]
    logger: Option<Arc<dyn Logger>>,
    #[auto_inject(key = "org.example.Logger")]
    audit: Option<Arc<dyn Logger>>,
    name: String,
}

#[derive(AutoInjectable)]
struct Empty;

fn main() {
    let points = OkService::injection_points();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].binding_key(), "org.example.Logger");
    assert!(Empty::injection_points().is_empty());

    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger);
    let mut service = OkService::default();
    service
        .assign("logger", ProvidedInstance::new(logger))
        .unwrap();
    service.logger.as_ref().unwrap().log("ok");
    assert!(service.audit.is_none());
    assert!(service.name.is_empty());
}
