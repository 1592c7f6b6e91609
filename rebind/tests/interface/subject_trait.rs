use std::sync::Arc;

use rebind::{args, Class, MethodTable, Session, Subject, Value};

trait Greeter {
    fn greet(&self, name: &str) -> String;
}

/// Type that routes its trait methods through its method table.
struct Person {
    table: MethodTable,
}

impl Person {
    fn class() -> Arc<Class> {
        let class = Class::new("Person");
        class.define("greet", |inv| {
            let name = inv.args.get(0).and_then(Value::as_str).unwrap_or("stranger");

            Ok(Value::from(format!("Hello, {name}")))
        });

        class
    }

    fn new(class: &Arc<Class>) -> Arc<Self> {
        Arc::new(Self {
            table: MethodTable::with_class(class.clone()),
        })
    }
}

impl Subject for Person {
    fn method_table(&self) -> &MethodTable {
        &self.table
    }

    fn describe(&self) -> String {
        format!("#<Person:{}>", self.subject_id())
    }
}

impl Greeter for Person {
    fn greet(&self, name: &str) -> String {
        self.send("greet", args![name])
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_default()
    }
}

fn welcome(greeter: &dyn Greeter) -> String {
    format!("{}!", greeter.greet("Ada"))
}

#[test]
fn doubles_only_affect_one_instance() {
    let session = Session::new();
    let class = Person::class();
    let alice = Person::new(&class);
    let bob = Person::new(&class);

    session
        .probe(&alice, "greet")
        .forward_then(|ret| Ok(Value::from(ret.as_str().unwrap_or_default().to_uppercase())));

    assert_eq!("HELLO, ADA!", welcome(&*alice));
    assert_eq!("Hello, Ada!", welcome(&*bob));

    session.verify_all().unwrap();

    assert_eq!("Hello, Ada!", welcome(&*alice));
    assert!(!alice.method_table().has_own_method("greet"));
}

#[test]
fn class_changes_are_seen_after_reset() {
    let session = Session::new();
    let class = Person::class();
    let alice = Person::new(&class);

    session.stub(&alice, "greet").returns("Hi");
    assert_eq!("Hi!", welcome(&*alice));

    session.reset_all();
    class.define("greet", |_| Ok(Value::from("Howdy")));

    assert_eq!("Howdy!", welcome(&*alice));
}
