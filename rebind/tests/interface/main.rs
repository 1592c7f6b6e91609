mod lifecycle;
mod local_session;
mod responder;
mod scenario;
mod shared_subject;
mod subject_trait;
