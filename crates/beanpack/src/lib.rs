//! Length-prefixed, type-tagged binary codec with runtime type-directed
//! decoding.
//!
//! The wire format is the MessagePack encoding restricted to ten tag kinds
//! (nil, boolean, two integer widths, two float widths, string, binary,
//! array, map; no extension family). Decoding is driven by a requested
//! [`TargetType`] and a [`TypeResolver`] that supplies record shapes, value
//! transforms, scalar conversion and construction at runtime — the shape of
//! the output graph is decided per call, not per program.
//!
//! ```
//! use beanpack::{decode, TargetType, SchemaResolver, RecordShape, Value};
//!
//! let resolver = SchemaResolver::new()
//!     .record(RecordShape::new("Person").field("name", TargetType::CharSequence));
//! // {"name": "Bob"}
//! let input = [0x81, 0xa4, b'n', b'a', b'm', b'e', 0xa3, b'B', b'o', b'b'];
//! let person = decode(&input, &TargetType::record("Person"), &resolver).unwrap();
//! match person {
//!     Value::Record(record) => {
//!         assert_eq!(record.get("name"), Some(&Value::Str("Bob".into())));
//!     }
//!     other => panic!("expected a record, got {other:?}"),
//! }
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod reader;
pub mod resolver;
pub mod tag;
pub mod types;
pub mod util;
pub mod value;

pub use decoder::{Decoder, PathSegment};
pub use encoder::Encoder;
pub use error::DecodeError;
pub use reader::TagReader;
pub use resolver::{BuilderSwap, Parent, SchemaResolver, TypeResolver, ValueSwap};
pub use tag::Kind;
pub use types::{FieldShape, NumberKind, RecordShape, TargetType};
pub use util::{decode, decode_any, encode};
pub use value::{Record, Value};
