mod dispatch_request;
mod resolve_query;

pub use dispatch_request::DispatchRequestUseCase;
pub use resolve_query::ResolveQueryUseCase;
