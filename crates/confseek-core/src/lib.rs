//! confseek-core: Setting selection and record search over configuration trees
//!
//! This crate navigates an already-loaded configuration tree by dot-path,
//! then optionally searches the selected subsection (a flat mapping or a
//! list of records) for an entry matching a field/value predicate.
//!
//! # Example
//!
//! ```rust
//! use confseek_core::{Key, Lookup, Resolver, Value};
//!
//! let yaml = r#"
//! database:
//!   host: localhost
//!   port: 5432
//! "#;
//!
//! let tree: Value = serde_yaml::from_str(yaml).unwrap();
//! let database = Resolver::new(&tree).select_setting("database").unwrap();
//!
//! assert_eq!(database.evaluate("host").value().and_then(Value::as_str), Some("localhost"));
//! assert_eq!(
//!     database.with_key_output(true).search("port", Some(Value::Integer(5432))),
//!     Lookup::Key(Key::Name("port"))
//! );
//! ```

pub mod error;
pub mod resolver;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use resolver::{Lookup, Resolver};
pub use value::{Key, Value};
