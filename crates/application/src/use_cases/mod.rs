pub mod dns;

// Re-export use cases
pub use dns::{DispatchRequestUseCase, ResolveQueryUseCase};
