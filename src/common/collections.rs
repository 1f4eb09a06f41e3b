pub use rustc_hash::FxBuildHasher as BuildHasher;

pub type HashMap<K, V> = std::collections::HashMap<K, V, BuildHasher>;
