mod host_matcher;

pub use host_matcher::HostMatcher;
