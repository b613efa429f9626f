//! Hash collection aliases. FxHash is measurably faster than SipHash for
//! the short string keys (article ids, tokens) this engine churns through.

pub use rustc_hash::{FxHashMap, FxHashSet};
