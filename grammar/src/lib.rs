pub mod grammar;

mod action;
mod params;
mod span;

pub use self::action::*;
pub use self::grammar::*;
pub use self::params::*;
pub use self::span::*;

#[cfg(not(debug_assertions))]
pub type Map<K, V> = fnv::FnvHashMap<K, V>;

#[cfg(debug_assertions)]
pub type Map<K, V> = indexmap::IndexMap<K, V>;

#[cfg(not(debug_assertions))]
pub type BiMap<K, V> = bimap::BiHashMap<K, V>;

#[cfg(debug_assertions)]
pub type BiMap<K, V> = bimap::BiBTreeMap<K, V>;
