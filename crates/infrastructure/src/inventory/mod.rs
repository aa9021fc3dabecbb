pub mod kubernetes;
pub mod static_list;

pub use kubernetes::KubernetesIngressInventory;
pub use static_list::StaticHostnameInventory;
