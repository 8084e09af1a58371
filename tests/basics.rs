use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use interpose::{
    Construct, DiError, DiResult, Implementation, Injector, Resolver, ServiceCollection,
};

#[test]
fn concrete_singleton_is_shared() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(Arc::new(42usize));
    sc.add_singleton(Arc::new("hello".to_string()));

    let sp = sc.build();

    let num1 = sp.get_required::<usize>();
    let num2 = sp.get_required::<usize>();
    let str1 = sp.get_required::<String>();

    assert_eq!(*num1, 42);
    assert_eq!(*str1, "hello");
    assert!(Arc::ptr_eq(&num1, &num2));
}

#[test]
fn factory_resolves_dependencies() {
    struct Config {
        port: u16,
    }

    struct Server {
        config: Arc<Config>,
        name: String,
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Arc::new(Config { port: 8080 }));
    sc.add_singleton_factory::<Server, _>(|injector| {
        Ok(Arc::new(Server {
            config: injector.get::<Config>()?,
            name: "MyServer".to_string(),
        }))
    });

    let sp = sc.build();
    let server = sp.get_required::<Server>();

    assert_eq!(server.config.port, 8080);
    assert_eq!(server.name, "MyServer");
}

#[test]
fn transient_creates_new_instances() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<String, _>(move |_| {
        let n = counter_clone.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Arc::new(format!("instance-{}", n)))
    });

    let sp = sc.build();

    let a = sp.get_required::<String>();
    let b = sp.get_required::<String>();

    assert_eq!(&*a, "instance-1");
    assert_eq!(&*b, "instance-2");
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn scoped_is_cached_per_scope() {
    struct RequestId(usize);

    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<RequestId, _>(move |_| {
        Ok(Arc::new(RequestId(
            counter_clone.fetch_add(1, Ordering::SeqCst) + 1,
        )))
    });

    let sp = sc.build();
    let scope1 = sp.create_scope();
    let scope2 = sp.create_scope();

    let a = scope1.get_required::<RequestId>();
    let b = scope1.get_required::<RequestId>();
    let c = scope2.get_required::<RequestId>();

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(a.0, 1);
    assert_eq!(c.0, 2);
}

#[test]
fn singletons_are_shared_across_scopes() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(Arc::new(7u32));

    let sp = sc.build();
    let root = sp.get_required::<u32>();
    let scoped = sp.create_scope().get_required::<u32>();

    assert!(Arc::ptr_eq(&root, &scoped));
}

#[test]
fn scoped_from_root_is_rejected() {
    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<String, _>(|_| Ok(Arc::new("scoped".to_string())));

    let sp = sc.build();
    assert!(matches!(
        sp.get::<String>(),
        Err(DiError::WrongLifetime(_))
    ));
}

#[test]
fn missing_registration_is_not_found() {
    let sp = ServiceCollection::new().build();
    assert!(matches!(sp.get::<String>(), Err(DiError::NotFound(_))));
}

#[test]
fn impl_type_is_constructed_with_dependencies() {
    struct Config {
        url: String,
    }

    struct Database {
        config: Arc<Config>,
    }

    impl Construct for Database {
        fn construct(injector: &Injector<'_>) -> DiResult<Self> {
            Ok(Database {
                config: injector.get::<Config>()?,
            })
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Arc::new(Config {
        url: "postgres://localhost".to_string(),
    }));
    sc.add_singleton_impl::<Database, Database>();

    let sp = sc.build();
    let db = sp.get_required::<Database>();
    assert_eq!(db.config.url, "postgres://localhost");
}

#[test]
fn self_registered_impl_type_constructs_once() {
    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct Widget;

    impl Construct for Widget {
        fn construct(_: &Injector<'_>) -> DiResult<Self> {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            Ok(Widget)
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton_impl::<Widget, Widget>();

    let sp = sc.build();
    let a = sp.get_required::<Widget>();
    let b = sp.get_required::<Widget>();

    // Materializing the registration constructs directly instead of
    // resolving Widget's key, which is this registration itself.
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);
}

#[test]
fn broken_registration_is_not_replaced_by_construction() {
    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    struct MissingDep;

    struct SystemClock {
        value: u64,
    }

    impl Clock for SystemClock {
        fn now(&self) -> u64 {
            self.value
        }
    }

    impl Construct for SystemClock {
        fn construct(_: &Injector<'_>) -> DiResult<Self> {
            Ok(SystemClock { value: 0 })
        }
    }

    impl Implementation<dyn Clock> for SystemClock {
        fn into_contract(self: Arc<Self>) -> Arc<dyn Clock> {
            self
        }
    }

    let mut sc = ServiceCollection::new();
    // SystemClock is registered, but its factory cannot resolve.
    sc.add_singleton_factory::<SystemClock, _>(|injector| {
        let _ = injector.get::<MissingDep>()?;
        Ok(Arc::new(SystemClock { value: 42 }))
    });
    sc.add_singleton_impl::<dyn Clock, SystemClock>();

    let sp = sc.build();
    // The failing registration propagates; a freshly constructed
    // SystemClock is never substituted for it.
    assert!(matches!(sp.get::<dyn Clock>(), Err(DiError::NotFound(_))));
}

#[test]
fn collection_debug_lists_descriptors() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(Arc::new(42usize));

    let rendered = format!("{:?}", sc);
    assert!(rendered.contains("usize"));
    assert!(rendered.contains("Singleton"));
}

#[test]
fn impl_type_prefers_registered_instance_over_construction() {
    trait Clock: Send + Sync {
        fn tick(&self) -> usize;
    }

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct FixedClock {
        value: usize,
    }

    impl Clock for FixedClock {
        fn tick(&self) -> usize {
            self.value
        }
    }

    impl Construct for FixedClock {
        fn construct(_: &Injector<'_>) -> DiResult<Self> {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            Ok(FixedClock { value: 0 })
        }
    }

    impl Implementation<dyn Clock> for FixedClock {
        fn into_contract(self: Arc<Self>) -> Arc<dyn Clock> {
            self
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Arc::new(FixedClock { value: 7 }));
    sc.add_singleton_impl::<dyn Clock, FixedClock>();

    let sp = sc.build();
    let clock = sp.get_required::<dyn Clock>();

    // Resolved from the existing FixedClock registration, not constructed.
    assert_eq!(clock.tick(), 7);
    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 0);
}

#[test]
fn cyclic_factory_exceeds_depth() {
    struct Chain(#[allow(dead_code)] Arc<Chain>);

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<Chain, _>(|injector| {
        let inner = injector.get::<Chain>()?;
        Ok(Arc::new(Chain(inner)))
    });

    let sp = sc.build();
    assert!(matches!(
        sp.get::<Chain>(),
        Err(DiError::DepthExceeded(_))
    ));
}
