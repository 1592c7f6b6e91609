//! `rebind` intercepts one selector on one subject instance, routes its calls
//! to declared doubles, counts them and verifies the counts at teardown.
//!
//! ```
//! use rebind::{args, Object, Session, Subject, Value};
//!
//! let session = Session::new();
//! let obj = Object::new("calculator");
//!
//! session.stub(&obj, "total").returns(42);
//!
//! assert_eq!(Value::Int(42), obj.send("total", args![1, 2]).unwrap());
//! assert_eq!(Value::Int(42), obj.send("total", ()).unwrap());
//!
//! session.verify_all().unwrap();
//! assert!(!obj.responds_to("total"));
//! ```

pub mod action;
pub mod args;
pub mod builder;
pub mod config;
pub mod dispatch;
pub mod double;
pub mod error;
pub mod local_context;
pub mod matcher;
pub mod object;
pub mod point;
pub mod registry;
pub mod session;
pub mod subject;
pub mod times;
pub mod value;

pub use action::Action;
pub use args::{Args, Block, Invocation};
pub use builder::{mock, probe, stub, DoubleBuilder};
pub use config::Config;
pub use dispatch::DispatchEngine;
pub use double::{Double, DoubleKind};
pub use error::{Error, Result, TimesCalledViolation, VerificationFailed, ViolationKind};
pub use local_context::LocalSession;
pub use matcher::Matcher;
pub use object::Object;
pub use point::{InterceptionPoint, Phase};
pub use registry::IdentityRegistry;
pub use session::{Scope, Session};
pub use subject::{
    method, next_subject_id, Class, Interceptor, Method, MethodTable, Responder, Selector, Subject,
    SubjectId, SubjectRef,
};
pub use times::{Times, TimesRange};
pub use value::{Value, ValueKind};
